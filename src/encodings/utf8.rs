// encodings/utf8.rs - UTF-8 codepoint primitives.
// RFC 3629 range: U+0000 - U+10FFFF, at most four bytes per codepoint.

use crate::error::RegexError;
use crate::regdefs::REGERR_INVALID_UTF8;

/// Codepoint substituted for undecodable subject bytes.
pub const REPLACEMENT_CHARACTER: u32 = 0xfffd;

// === UTF-8 Helpers ===

#[inline]
fn utf8_istail(c: u8) -> bool {
    (c & 0xc0) == 0x80
}

/// Octets that never appear in well-formed UTF-8: the overlong leads
/// 0xc0/0xc1 and everything from 0xf5 upward.
#[inline]
pub fn is_forbidden(octet: u8) -> bool {
    matches!(octet, 0xc0 | 0xc1 | 0xf5..=0xff)
}

// === EncLen Table ===
// Maps first byte to character length. Tail bytes and forbidden octets map
// to 1 so a lossy decoder always makes progress.

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// Byte length of the sequence introduced by `lead`.
#[inline]
pub fn enc_len(lead: u8) -> usize {
    ENC_LEN_UTF8[lead as usize] as usize
}

/// Byte width of `code` once encoded, or `None` past U+10FFFF.
pub fn code_width(code: u32) -> Option<usize> {
    match code {
        0..=0x7f => Some(1),
        0x80..=0x7ff => Some(2),
        0x800..=0xffff => Some(3),
        0x1_0000..=0x10_ffff => Some(4),
        _ => None,
    }
}

fn decode_at(s: &[u8], pos: usize) -> Option<(u32, usize)> {
    let lead = *s.get(pos)?;
    if is_forbidden(lead) || utf8_istail(lead) {
        return None;
    }
    let len = enc_len(lead);
    if len == 1 {
        return Some((lead as u32, 1));
    }
    let tail = s.get(pos + 1..pos + len)?;
    let mut code = (lead as u32) & ((1u32 << (7 - len)) - 1);
    for &b in tail {
        if !utf8_istail(b) {
            return None;
        }
        code = (code << 6) | (b & 0x3f) as u32;
    }
    Some((code, len))
}

/// Decode the codepoint at `pos`, returning it with its byte width.
///
/// Forbidden octets, stray tail bytes and truncated sequences are errors.
/// Used for patterns, which must be well formed.
pub fn decode(s: &[u8], pos: usize) -> Result<(u32, usize), RegexError> {
    decode_at(s, pos).ok_or_else(|| RegexError::from(REGERR_INVALID_UTF8))
}

/// Decode the codepoint at `pos`, substituting U+FFFD (width 1) for
/// anything undecodable. `pos` must be in bounds.
#[inline]
pub fn decode_lossy(s: &[u8], pos: usize) -> (u32, usize) {
    if s[pos] < 0x80 {
        return (s[pos] as u32, 1);
    }
    decode_at(s, pos).unwrap_or((REPLACEMENT_CHARACTER, 1))
}

/// Encode `code` into `buf`, returning the number of bytes written, or
/// `None` if `code` is out of range.
pub fn encode(code: u32, buf: &mut [u8; 4]) -> Option<usize> {
    let width = code_width(code)?;
    match width {
        1 => buf[0] = code as u8,
        2 => {
            buf[0] = ((code >> 6) & 0x1f) as u8 | 0xc0;
            buf[1] = (code & 0x3f) as u8 | 0x80;
        }
        3 => {
            buf[0] = ((code >> 12) & 0x0f) as u8 | 0xe0;
            buf[1] = ((code >> 6) & 0x3f) as u8 | 0x80;
            buf[2] = (code & 0x3f) as u8 | 0x80;
        }
        _ => {
            buf[0] = ((code >> 18) & 0x07) as u8 | 0xf0;
            buf[1] = ((code >> 12) & 0x3f) as u8 | 0x80;
            buf[2] = ((code >> 6) & 0x3f) as u8 | 0x80;
            buf[3] = (code & 0x3f) as u8 | 0x80;
        }
    }
    Some(width)
}

/// Validate a byte string with the same rules the pattern lexer applies.
pub fn is_valid(s: &[u8]) -> bool {
    let mut p = 0;
    while p < s.len() {
        match decode_at(s, p) {
            Some((_, len)) => p += len,
            None => return false,
        }
    }
    true
}

/// Simple one-to-one lowercase mapping; codepoints without one map to themselves.
pub fn to_lower(code: u32) -> u32 {
    map_case(code, |c| c.to_lowercase())
}

/// Simple one-to-one uppercase mapping; codepoints without one map to themselves.
pub fn to_upper(code: u32) -> u32 {
    map_case(code, |c| c.to_uppercase())
}

fn map_case<I, F>(code: u32, f: F) -> u32
where
    I: Iterator<Item = char>,
    F: Fn(char) -> I,
{
    let Some(c) = char::from_u32(code) else {
        return code;
    };
    let mut mapped = f(c);
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => m as u32,
        _ => code,
    }
}
