// error.rs - Error type for compiling and running patterns.
//
// Groups the numeric codes of regdefs.rs into semantic variants while
// keeping the code around for callers that log or compare it.

use std::fmt;

use crate::regdefs::*;
use crate::regerror::{error_code_to_format, error_code_to_str};

/// Error type for regex compilation and matching operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexError {
    /// Malformed pattern.
    Syntax { code: i32, message: String },
    /// Pattern bytes are not valid UTF-8.
    Encoding { code: i32, message: String },
    /// Operator or operand stack exceeded its fixed depth.
    ParseDepthLimitOver,
    /// More parenthesized groups than capture slots.
    TooManyCaptures,
    /// More bracket expressions than a program can hold.
    TooManyCharClasses,
    /// The simulation overflowed even the enlarged thread lists.
    ThreadListOverflow,
    /// Invalid argument passed to a function.
    InvalidArgument,
    /// Internal engine bug (should not occur in correct usage).
    InternalBug { code: i32, message: String },
    /// Other error not covered by specific variants.
    Other(i32),
}

impl fmt::Display for RegexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegexError::Syntax { message, .. } => write!(f, "syntax error: {}", message),
            RegexError::Encoding { message, .. } => write!(f, "encoding error: {}", message),
            RegexError::ParseDepthLimitOver => write!(f, "parse depth limit over"),
            RegexError::TooManyCaptures => write!(f, "too many sub-expressions"),
            RegexError::TooManyCharClasses => write!(f, "too many character classes"),
            RegexError::ThreadListOverflow => write!(f, "thread list overflow"),
            RegexError::InvalidArgument => write!(f, "invalid argument"),
            RegexError::InternalBug { message, .. } => write!(f, "internal error: {}", message),
            RegexError::Other(code) => write!(f, "error code {}", code),
        }
    }
}

impl std::error::Error for RegexError {}

impl From<i32> for RegexError {
    fn from(code: i32) -> Self {
        match code {
            REGERR_PARSE_DEPTH_LIMIT_OVER => RegexError::ParseDepthLimitOver,
            REGERR_TOO_MANY_CAPTURES => RegexError::TooManyCaptures,
            REGERR_TOO_MANY_CHAR_CLASSES => RegexError::TooManyCharClasses,
            REGERR_THREAD_LIST_OVERFLOW => RegexError::ThreadListOverflow,
            REGERR_INVALID_ARGUMENT => RegexError::InvalidArgument,

            REGERR_OPERATOR_STACK_UNDERFLOW
            | REGERR_UNKNOWN_OPERATOR
            | REGERR_DANGLING_INSTRUCTION => RegexError::InternalBug {
                code,
                message: error_code_to_format(code).to_string(),
            },

            REGERR_INVALID_UTF8 => RegexError::Encoding {
                code,
                message: error_code_to_format(code).to_string(),
            },

            c if reg_is_pattern_error(c) => RegexError::Syntax {
                code: c,
                message: error_code_to_format(c).to_string(),
            },

            _ => RegexError::Other(code),
        }
    }
}

impl RegexError {
    /// Build an error whose message takes a parameter, such as the
    /// operator in `missing operand for '|'`.
    pub fn with_param(code: i32, param: &str) -> Self {
        match RegexError::from(code) {
            RegexError::Syntax { code, .. } => RegexError::Syntax {
                code,
                message: error_code_to_str(code, Some(param)),
            },
            other => other,
        }
    }

    /// Returns the numeric error code.
    pub fn code(&self) -> i32 {
        match self {
            RegexError::ParseDepthLimitOver => REGERR_PARSE_DEPTH_LIMIT_OVER,
            RegexError::TooManyCaptures => REGERR_TOO_MANY_CAPTURES,
            RegexError::TooManyCharClasses => REGERR_TOO_MANY_CHAR_CLASSES,
            RegexError::ThreadListOverflow => REGERR_THREAD_LIST_OVERFLOW,
            RegexError::InvalidArgument => REGERR_INVALID_ARGUMENT,
            RegexError::Syntax { code, .. } => *code,
            RegexError::Encoding { code, .. } => *code,
            RegexError::InternalBug { code, .. } => *code,
            RegexError::Other(code) => *code,
        }
    }

    /// True for errors raised while compiling a pattern.
    pub fn is_compile_error(&self) -> bool {
        !matches!(
            self,
            RegexError::ThreadListOverflow | RegexError::InvalidArgument | RegexError::Other(_)
        )
    }
}
