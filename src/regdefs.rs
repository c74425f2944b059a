// regdefs.rs - Public constants, limits and compile options.
//
// Error codes follow the usual layout: 0 is success, -1 a plain mismatch,
// -2..-99 runtime and internal conditions, -100..-999 pattern errors.

use bitflags::bitflags;

// === Limits ===

/// Capture slots per match, including group 0.
pub const NSUBEXP: usize = 32;

/// Depth of the operator and operand stacks used while compiling.
pub const NSTACK: usize = 20;

/// Character classes per program.
pub const NCLASS: usize = 16;

/// Ranges a single bracket expression may list before merging.
pub const NCCRANGE: usize = 32;

/// Thread list capacity of the first simulation attempt.
pub const LIST_SIZE: usize = 10;

/// Thread list capacity of the retry after an overflow.
pub const BIG_LIST_SIZE: usize = 10 * LIST_SIZE;

/// Scratch instructions reserved per pattern byte. Only a sizing hint for
/// the first allocation; the buffer grows if a pattern needs more.
pub const INST_ALLOC_FACTOR: usize = 6;

// === Result Codes ===

pub const REG_NORMAL: i32 = 0;
pub const REG_MISMATCH: i32 = -1;

pub const REGERR_THREAD_LIST_OVERFLOW: i32 = -15;
pub const REGERR_PARSE_DEPTH_LIMIT_OVER: i32 = -16;
pub const REGERR_OPERATOR_STACK_UNDERFLOW: i32 = -11;
pub const REGERR_UNKNOWN_OPERATOR: i32 = -12;
pub const REGERR_DANGLING_INSTRUCTION: i32 = -13;
pub const REGERR_INVALID_ARGUMENT: i32 = -30;

pub const REGERR_END_PATTERN_AT_ESCAPE: i32 = -104;
pub const REGERR_MALFORMED_CHAR_CLASS: i32 = -110;
pub const REGERR_INVERTED_RANGE_IN_CHAR_CLASS: i32 = -111;
pub const REGERR_TOO_MANY_RANGES_IN_CHAR_CLASS: i32 = -112;
pub const REGERR_MISSING_OPERAND: i32 = -113;
pub const REGERR_UNMATCHED_CLOSE_PARENTHESIS: i32 = -117;
pub const REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS: i32 = -118;
pub const REGERR_TOO_MANY_CAPTURES: i32 = -210;
pub const REGERR_TOO_MANY_CHAR_CLASSES: i32 = -211;

pub const REGERR_INVALID_UTF8: i32 = -400;

#[inline]
pub fn reg_is_pattern_error(code: i32) -> bool {
    code <= -100 && code > -1000
}

// === Options ===

bitflags! {
    /// Compile options.
    ///
    /// The empty set compiles `.` so that it does not match `\n`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexOptions: u32 {
        /// `.` also matches `\n`.
        const DOT_MATCHES_NEWLINE = 1 << 0;
        /// Every codepoint of the pattern is a literal; nothing is an operator.
        const LITERAL = 1 << 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_error_range() {
        assert!(reg_is_pattern_error(REGERR_MISSING_OPERAND));
        assert!(reg_is_pattern_error(REGERR_TOO_MANY_CAPTURES));
        assert!(!reg_is_pattern_error(REGERR_THREAD_LIST_OVERFLOW));
        assert!(!reg_is_pattern_error(REG_MISMATCH));
    }

    #[test]
    fn default_options_are_empty() {
        let opts = RegexOptions::default();
        assert!(!opts.contains(RegexOptions::DOT_MATCHES_NEWLINE));
        assert!(!opts.contains(RegexOptions::LITERAL));
    }
}
