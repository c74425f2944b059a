// api.rs - Idiomatic Rust API for runeregex.
//
// Wraps the compiler and simulator (compile, exec_at) with Rust-native
// types: Regex, RegexBuilder, Match, Captures, FindIter. Every search
// returns a Result so a simulation failure is never mistaken for a miss.

use std::ops::Range;

use crate::encodings::utf8;
use crate::error::RegexError;
use crate::regcomp::compile;
use crate::regdefs::RegexOptions;
use crate::regexec::{exec_at, ExecConfig, Region};
use crate::regint::Program;

/// A compiled regular expression.
///
/// # Examples
///
/// ```
/// use runeregex::api::Regex;
///
/// let re = Regex::new("[0-9]+").unwrap();
/// assert!(re.is_match("hello 42").unwrap());
///
/// let m = re.find("hello 42").unwrap().unwrap();
/// assert_eq!(m.as_str(), Some("42"));
/// assert_eq!(m.start(), 6);
/// assert_eq!(m.end(), 8);
/// ```
pub struct Regex {
    prog: Program,
    options: RegexOptions,
    config: ExecConfig,
}

impl Regex {
    /// Compile a pattern with default options (`.` does not match `\n`).
    pub fn new(pattern: &str) -> Result<Regex, RegexError> {
        Self::new_bytes(pattern.as_bytes())
    }

    /// Compile a pattern from raw bytes. The bytes must be valid UTF-8.
    pub fn new_bytes(pattern: &[u8]) -> Result<Regex, RegexError> {
        RegexBuilder::from_bytes(pattern).build()
    }

    /// Create a [`RegexBuilder`] for fine-grained control over compilation.
    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    fn search_at(&self, text: &[u8], start: usize) -> Result<Option<Region>, RegexError> {
        exec_at(&self.prog, text, start, &self.config)
    }

    /// Return the leftmost-longest match in `text`.
    pub fn find<'t>(&self, text: &'t str) -> Result<Option<Match<'t>>, RegexError> {
        self.find_bytes(text.as_bytes())
    }

    /// Return the leftmost-longest match in `text` (as bytes).
    ///
    /// Bytes that are not valid UTF-8 are read as U+FFFD, one byte each.
    pub fn find_bytes<'t>(&self, text: &'t [u8]) -> Result<Option<Match<'t>>, RegexError> {
        self.find_at_bytes(text, 0)
    }

    /// Like [`find_bytes`](Self::find_bytes), starting the search at byte
    /// offset `start`. `^` still sees the byte before `start`.
    pub fn find_at_bytes<'t>(
        &self,
        text: &'t [u8],
        start: usize,
    ) -> Result<Option<Match<'t>>, RegexError> {
        let region = self.search_at(text, start)?;
        Ok(region
            .and_then(|r| r.group(0))
            .map(|range| Match::new(text, range)))
    }

    /// Check whether `text` matches the pattern anywhere.
    pub fn is_match(&self, text: &str) -> Result<bool, RegexError> {
        self.is_match_bytes(text.as_bytes())
    }

    /// Check whether `text` (as bytes) matches the pattern anywhere.
    pub fn is_match_bytes(&self, text: &[u8]) -> Result<bool, RegexError> {
        Ok(self.search_at(text, 0)?.is_some())
    }

    /// Return the match with all capture groups.
    pub fn captures<'t>(&self, text: &'t str) -> Result<Option<Captures<'t>>, RegexError> {
        self.captures_bytes(text.as_bytes())
    }

    /// Return the match with all capture groups (bytes).
    pub fn captures_bytes<'t>(&self, text: &'t [u8]) -> Result<Option<Captures<'t>>, RegexError> {
        let region = self.search_at(text, 0)?;
        Ok(region.map(|region| Captures { text, region }))
    }

    /// Iterate over all non-overlapping matches in `text`.
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> FindIter<'r, 't> {
        self.find_iter_bytes(text.as_bytes())
    }

    /// Iterate over all non-overlapping matches in `text` (as bytes).
    pub fn find_iter_bytes<'r, 't>(&'r self, text: &'t [u8]) -> FindIter<'r, 't> {
        FindIter {
            regex: self,
            text,
            pos: 0,
            last_end: None,
            done: false,
        }
    }

    /// Return the number of capture groups in the pattern (excluding group 0).
    pub fn captures_len(&self) -> usize {
        self.prog.num_groups()
    }

    /// Options the pattern was compiled with.
    pub fn options(&self) -> RegexOptions {
        self.options
    }

    /// Access the compiled program.
    pub fn as_program(&self) -> &Program {
        &self.prog
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Regex")
            .field("options", &self.options)
            .field("instructions", &self.prog.len())
            .finish_non_exhaustive()
    }
}

// === RegexBuilder ===

/// Builder for compiling a [`Regex`] with custom options.
///
/// # Examples
///
/// ```
/// use runeregex::api::Regex;
///
/// let re = Regex::builder("a.c")
///     .dot_matches_newline(true)
///     .build()
///     .unwrap();
/// assert!(re.is_match("a\nc").unwrap());
/// ```
pub struct RegexBuilder {
    pattern: Vec<u8>,
    options: RegexOptions,
    config: ExecConfig,
}

impl RegexBuilder {
    /// Create a new builder for the given pattern.
    pub fn new(pattern: &str) -> Self {
        Self::from_bytes(pattern.as_bytes())
    }

    /// Create a new builder for a pattern given as bytes.
    pub fn from_bytes(pattern: &[u8]) -> Self {
        RegexBuilder {
            pattern: pattern.to_vec(),
            options: RegexOptions::empty(),
            config: ExecConfig::default(),
        }
    }

    /// Enable or disable `.` matching `\n`.
    pub fn dot_matches_newline(mut self, yes: bool) -> Self {
        self.options.set(RegexOptions::DOT_MATCHES_NEWLINE, yes);
        self
    }

    /// Treat every pattern codepoint as a literal.
    pub fn literal(mut self, yes: bool) -> Self {
        self.options.set(RegexOptions::LITERAL, yes);
        self
    }

    /// Replace the whole option set.
    pub fn options(mut self, options: RegexOptions) -> Self {
        self.options = options;
        self
    }

    /// Thread list capacity of the first search attempt.
    pub fn thread_list_size(mut self, size: usize) -> Self {
        self.config.list_size = size;
        self
    }

    /// Thread list capacity of the retry after an overflow.
    pub fn big_thread_list_size(mut self, size: usize) -> Self {
        self.config.big_list_size = size;
        self
    }

    /// Compile the pattern into a [`Regex`].
    pub fn build(self) -> Result<Regex, RegexError> {
        if self.config.list_size == 0 || self.config.big_list_size == 0 {
            return Err(RegexError::InvalidArgument);
        }
        let prog = compile(&self.pattern, self.options)?;
        Ok(Regex {
            prog,
            options: self.options,
            config: self.config,
        })
    }
}

// === Match ===

/// A single match result referencing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t [u8],
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    fn new(text: &'t [u8], range: Range<usize>) -> Self {
        Match {
            text,
            start: range.start,
            end: range.end,
        }
    }

    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Byte range of the match.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text as a byte slice.
    pub fn as_bytes(&self) -> &'t [u8] {
        &self.text[self.start..self.end]
    }

    /// The matched text as a `&str`, or `None` if the matched bytes are not
    /// valid UTF-8. Always `Some` for matches found in a `&str`.
    pub fn as_str(&self) -> Option<&'t str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Owned copy of the matched text; invalid bytes become U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// Returns the length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the match is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. Groups 1..N correspond to `(...)` in the
/// pattern; groups after the last one that took part are not counted.
pub struct Captures<'t> {
    text: &'t [u8],
    region: Region,
}

impl<'t> Captures<'t> {
    /// Get capture group `i`, or `None` if the group did not participate.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        self.region.group(i).map(|range| Match::new(self.text, range))
    }

    /// Owned text of group `i`, or `None` if the group did not participate.
    pub fn text(&self, i: usize) -> Option<String> {
        self.region.group_text(self.text, i)
    }

    /// Number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        self.region.num_groups()
    }

    /// Returns `true` if there are no capture groups (never the case for a
    /// real match).
    pub fn is_empty(&self) -> bool {
        self.region.num_groups() == 0
    }

    /// Iterate over all capture groups.
    pub fn iter(&self) -> CapturesIter<'_, 't> {
        CapturesIter {
            captures: self,
            index: 0,
        }
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

impl std::fmt::Debug for Captures<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for i in 0..self.len() {
            list.entry(&self.get(i).map(|m| m.range()));
        }
        list.finish()
    }
}

// === CapturesIter ===

/// Iterator over capture groups in a [`Captures`].
pub struct CapturesIter<'c, 't> {
    captures: &'c Captures<'t>,
    index: usize,
}

impl<'c, 't> Iterator for CapturesIter<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_> {}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
///
/// After an empty match the next search starts one codepoint further on,
/// and an empty match right where the previous match ended is skipped
/// (`a*` over `"aab"` yields `0..2` and `3..3`). A search error is yielded
/// once and ends the iteration.
pub struct FindIter<'r, 't> {
    regex: &'r Regex,
    text: &'t [u8],
    pos: usize,
    last_end: Option<usize>,
    done: bool,
}

impl<'r, 't> FindIter<'r, 't> {
    /// Move `pos` one codepoint past `at`, or finish at the end of the text.
    fn step_past(&mut self, at: usize) {
        if at < self.text.len() {
            let (_, width) = utf8::decode_lossy(self.text, at);
            self.pos = at + width;
        } else {
            self.done = true;
        }
    }
}

impl<'r, 't> Iterator for FindIter<'r, 't> {
    type Item = Result<Match<'t>, RegexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let m = match self.regex.find_at_bytes(self.text, self.pos) {
                Ok(Some(m)) => m,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            if m.is_empty() {
                self.step_past(m.end());
                if self.last_end == Some(m.start()) {
                    continue;
                }
            } else {
                self.pos = m.end();
            }
            self.last_end = Some(m.end());
            return Some(Ok(m));
        }
        None
    }
}

// === Convenience ===

/// Compile `pattern` with default options and test it against `subject`.
///
/// Compile and simulation errors both count as "no match".
pub fn matches(pattern: &str, subject: &str) -> bool {
    Regex::new(pattern)
        .and_then(|re| re.is_match(subject))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_new_and_find() {
        let re = Regex::new("[0-9]+").unwrap();
        let m = re.find("hello 42 world").unwrap().unwrap();
        assert_eq!(m.as_str(), Some("42"));
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
    }

    #[test]
    fn regex_no_match() {
        let re = Regex::new("[0-9]+").unwrap();
        assert!(re.find("no digits here").unwrap().is_none());
    }

    #[test]
    fn regex_is_match() {
        let re = Regex::new("hello").unwrap();
        assert!(re.is_match("say hello").unwrap());
        assert!(!re.is_match("say goodbye").unwrap());
    }

    #[test]
    fn regex_captures() {
        let re = Regex::new("([0-9]+)-([0-9]+)-([0-9]+)").unwrap();
        let caps = re.captures("date: 2026-02-14").unwrap().unwrap();
        assert_eq!(caps.get(0).unwrap().as_str(), Some("2026-02-14"));
        assert_eq!(caps.get(1).unwrap().as_str(), Some("2026"));
        assert_eq!(caps.get(2).unwrap().as_str(), Some("02"));
        assert_eq!(caps.text(3).as_deref(), Some("14"));
        assert!(caps.get(4).is_none());
        assert_eq!(caps.len(), 4);
    }

    #[test]
    fn regex_captures_len() {
        let re = Regex::new("(a)(b)(c)").unwrap();
        assert_eq!(re.captures_len(), 3);
    }

    #[test]
    fn regex_find_iter() {
        let re = Regex::new("[0-9]+").unwrap();
        let found: Vec<String> = re
            .find_iter("1 + 22 = 333")
            .map(|m| m.unwrap().text())
            .collect();
        assert_eq!(found, vec!["1", "22", "333"]);
    }

    #[test]
    fn regex_builder_literal() {
        let re = Regex::builder("a.b*").literal(true).build().unwrap();
        assert!(re.is_match("xa.b*y").unwrap());
        assert!(!re.is_match("axbbb").unwrap());
        assert_eq!(re.options(), RegexOptions::LITERAL);
    }

    #[test]
    fn regex_invalid_pattern() {
        let err = Regex::new("(unclosed").unwrap_err();
        assert!(matches!(err, RegexError::Syntax { .. }));
    }

    #[test]
    fn builder_rejects_zero_capacity() {
        let err = Regex::builder("a").thread_list_size(0).build().unwrap_err();
        assert_eq!(err, RegexError::InvalidArgument);
    }

    #[test]
    fn match_as_bytes() {
        let re = Regex::new("world").unwrap();
        let m = re.find("hello world").unwrap().unwrap();
        assert_eq!(m.as_bytes(), b"world");
    }

    #[test]
    fn captures_iter() {
        let re = Regex::new("(a)(b)?(c)").unwrap();
        let caps = re.captures("ac").unwrap().unwrap();
        let items: Vec<_> = caps.iter().collect();
        // group 2 did not participate but group 3 did
        assert_eq!(items.len(), 4);
        assert!(items[0].is_some());
        assert!(items[1].is_some());
        assert!(items[2].is_none());
        assert!(items[3].is_some());
    }

    #[test]
    fn empty_match_find_iter() {
        let re = Regex::new("").unwrap();
        let found: Vec<_> = re.find_iter("ab").map(|m| m.unwrap()).collect();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].start(), 0);
        assert_eq!(found[1].start(), 1);
        assert_eq!(found[2].start(), 2);
    }

    #[test]
    fn find_iter_steps_over_multibyte_after_empty_match() {
        let re = Regex::new("x*").unwrap();
        let starts: Vec<usize> = re
            .find_iter("éx")
            .map(|m| m.unwrap().start())
            .collect();
        assert_eq!(starts, vec![0, 2]);
    }

    #[test]
    fn find_iter_skips_empty_match_after_previous_match() {
        let re = Regex::new("a*").unwrap();
        let ranges: Vec<_> = re
            .find_iter("aab")
            .map(|m| m.unwrap().range())
            .collect();
        assert_eq!(ranges, vec![0..2, 3..3]);
    }

    #[test]
    fn find_iter_yields_errors_once() {
        let re = Regex::builder("(a|b)*c")
            .thread_list_size(1)
            .big_thread_list_size(1)
            .build()
            .unwrap();
        let mut it = re.find_iter("abc");
        assert_eq!(it.next(), Some(Err(RegexError::ThreadListOverflow)));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn convenience_matches() {
        assert!(matches("^abc$", "abc"));
        assert!(!matches("^abc$", "xabc"));
        assert!(!matches("(a", "a"));
    }

    #[test]
    fn debug_formats() {
        let re = Regex::new("(a)b").unwrap();
        assert!(format!("{:?}", re).starts_with("Regex"));
        let caps = re.captures("ab").unwrap().unwrap();
        assert_eq!(format!("{:?}", caps), "[Some(0..2), Some(0..1)]");
    }
}
