// regerror.rs - Error code to string conversion.
//
// Maps the numeric codes of regdefs.rs to human-readable messages.

use crate::regdefs::*;

/// Get the format string for an error code.
pub fn error_code_to_format(code: i32) -> &'static str {
    match code {
        REG_NORMAL => "success",
        REG_MISMATCH => "mismatch",
        REGERR_THREAD_LIST_OVERFLOW => "thread list overflow",
        REGERR_PARSE_DEPTH_LIMIT_OVER => "operator stack overflow, pattern nested too deeply",
        REGERR_OPERATOR_STACK_UNDERFLOW => "operator stack underflow (bug)",
        REGERR_UNKNOWN_OPERATOR => "unknown operator in reduction (bug)",
        REGERR_DANGLING_INSTRUCTION => "instruction without successor (bug)",
        REGERR_INVALID_ARGUMENT => "invalid argument",
        REGERR_END_PATTERN_AT_ESCAPE => "end pattern at escape",
        REGERR_MALFORMED_CHAR_CLASS => "malformed '[]'",
        REGERR_INVERTED_RANGE_IN_CHAR_CLASS => "inverted range in char-class",
        REGERR_TOO_MANY_RANGES_IN_CHAR_CLASS => "too many ranges in char-class",
        REGERR_MISSING_OPERAND => "missing operand for '%n'",
        REGERR_UNMATCHED_CLOSE_PARENTHESIS => "unmatched right parenthesis",
        REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS => "unmatched left parenthesis",
        REGERR_TOO_MANY_CAPTURES => "too many sub-expressions",
        REGERR_TOO_MANY_CHAR_CLASSES => "too many character classes",
        REGERR_INVALID_UTF8 => "invalid utf8 characters in string",
        _ => "undefined error code",
    }
}

/// Check if an error code message carries a `%n` parameter.
pub fn error_code_needs_param(code: i32) -> bool {
    matches!(code, REGERR_MISSING_OPERAND)
}

/// Convert an error code to a human-readable string.
/// For parameterized errors, pass the parameter text in `param`.
pub fn error_code_to_str(code: i32, param: Option<&str>) -> String {
    let fmt = error_code_to_format(code);

    if error_code_needs_param(code) {
        fmt.replace("%n", param.unwrap_or(""))
    } else {
        fmt.to_string()
    }
}
