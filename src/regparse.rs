// regparse.rs - Pattern lexer and bracket-expression builder.
//
// Turns pattern bytes into a token stream for the compiler. Character
// classes are built here and kept by the lexer until the compiler takes
// them over.

use crate::encodings::utf8;
use crate::error::RegexError;
use crate::regdefs::*;
use crate::regint::{CharClass, ClassId, CodeRange};

const NEWLINE: u32 = '\n' as u32;

/// One lexical unit of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// Literal codepoint.
    Rune(u32),
    /// `.` without `DOT_MATCHES_NEWLINE`.
    Any,
    /// `.` with `DOT_MATCHES_NEWLINE`.
    AnyNl,
    Bol,
    Eol,
    /// `[...]`
    CClass(ClassId),
    /// `[^...]`
    NCClass(ClassId),
    Or,
    Star,
    Plus,
    Quest,
    LBra,
    RBra,
    End,
}

// === Lexer ===

pub struct Lexer<'p> {
    pattern: &'p [u8],
    pos: usize,
    options: RegexOptions,
    done: bool,
    classes: Vec<CharClass>,
}

impl<'p> Lexer<'p> {
    pub fn new(pattern: &'p [u8], options: RegexOptions) -> Self {
        Lexer {
            pattern,
            pos: 0,
            options,
            done: false,
            classes: Vec::new(),
        }
    }

    /// Byte offset of the next unread codepoint.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Hand the classes built so far to the caller.
    pub fn into_classes(self) -> Vec<CharClass> {
        self.classes
    }

    /// Read one codepoint, resolving a backslash escape. Returns the
    /// codepoint and whether it was quoted, or `None` at end of pattern.
    fn next_char(&mut self) -> Result<Option<(u32, bool)>, RegexError> {
        if self.done || self.pos >= self.pattern.len() {
            self.done = true;
            return Ok(None);
        }

        let (c, len) = utf8::decode(self.pattern, self.pos)?;
        self.pos += len;
        if c != '\\' as u32 {
            return Ok(Some((c, false)));
        }

        if self.pos >= self.pattern.len() {
            return Err(RegexError::from(REGERR_END_PATTERN_AT_ESCAPE));
        }
        let (c, len) = utf8::decode(self.pattern, self.pos)?;
        self.pos += len;
        Ok(Some((c, true)))
    }

    /// Produce the next token. Once `End` has been returned every later
    /// call returns `End` again.
    pub fn next_token(&mut self) -> Result<Token, RegexError> {
        let Some((c, quoted)) = self.next_char()? else {
            return Ok(Token::End);
        };

        if quoted || self.options.contains(RegexOptions::LITERAL) {
            return Ok(Token::Rune(c));
        }

        let tok = match char::from_u32(c) {
            Some('*') => Token::Star,
            Some('?') => Token::Quest,
            Some('+') => Token::Plus,
            Some('|') => Token::Or,
            Some('(') => Token::LBra,
            Some(')') => Token::RBra,
            Some('^') => Token::Bol,
            Some('$') => Token::Eol,
            Some('.') => {
                if self.options.contains(RegexOptions::DOT_MATCHES_NEWLINE) {
                    Token::AnyNl
                } else {
                    Token::Any
                }
            }
            Some('[') => return self.parse_char_class(),
            _ => Token::Rune(c),
        };
        Ok(tok)
    }

    // === Bracket Expressions ===

    /// Parse the body of `[...]`; the opening bracket is already consumed.
    ///
    /// A leading unquoted `^` negates the class and also puts `\n` into the
    /// range list, so a negated class never matches a newline. `a-b` works
    /// by widening the most recent range, which means `-` right after the
    /// negation marker widens that implicit newline range.
    fn parse_char_class(&mut self) -> Result<Token, RegexError> {
        if self.classes.len() >= NCLASS {
            return Err(RegexError::from(REGERR_TOO_MANY_CHAR_CLASSES));
        }

        let mut ranges: Vec<CodeRange> = Vec::new();
        let mut negated = false;

        let mut next = self.next_char()?;
        if next == Some(('^' as u32, false)) {
            negated = true;
            ranges.push(CodeRange::new(NEWLINE, NEWLINE));
            next = self.next_char()?;
        }

        loop {
            let Some((c, quoted)) = next else {
                return Err(RegexError::from(REGERR_MALFORMED_CHAR_CLASS));
            };

            if !quoted && c == ']' as u32 {
                break;
            }

            if !quoted && c == '-' as u32 {
                let Some(last) = ranges.last_mut() else {
                    return Err(RegexError::from(REGERR_MALFORMED_CHAR_CLASS));
                };
                let high = match self.next_char()? {
                    None => return Err(RegexError::from(REGERR_MALFORMED_CHAR_CLASS)),
                    Some((h, false)) if h == ']' as u32 => {
                        return Err(RegexError::from(REGERR_MALFORMED_CHAR_CLASS))
                    }
                    Some((h, _)) => h,
                };
                if high < last.low {
                    return Err(RegexError::from(REGERR_INVERTED_RANGE_IN_CHAR_CLASS));
                }
                last.high = high;
            } else {
                if ranges.len() >= NCCRANGE {
                    return Err(RegexError::from(REGERR_TOO_MANY_RANGES_IN_CHAR_CLASS));
                }
                ranges.push(CodeRange::new(c, c));
            }

            next = self.next_char()?;
        }

        let id = self.classes.len();
        self.classes.push(CharClass::from_ranges(ranges));
        Ok(if negated {
            Token::NCClass(id)
        } else {
            Token::CClass(id)
        })
    }
}
