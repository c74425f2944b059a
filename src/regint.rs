// regint.rs - Internal types: instructions, character classes, programs,
// capture state.

use std::fmt;

use crate::regdefs::NSUBEXP;

/// Index of an instruction inside its program.
pub type InstId = usize;

/// Index of a character class inside its program.
pub type ClassId = usize;

// === CodeRange / CharClass ===

/// Inclusive codepoint range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeRange {
    pub low: u32,
    pub high: u32,
}

impl CodeRange {
    pub fn new(low: u32, high: u32) -> Self {
        CodeRange { low, high }
    }

    #[inline]
    pub fn contains(&self, c: u32) -> bool {
        self.low <= c && c <= self.high
    }
}

/// Sorted, non-overlapping, non-touching list of ranges.
///
/// Negation is not stored here: a negated bracket expression compiles to an
/// `NCClass` instruction over the same kind of class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CharClass {
    ranges: Box<[CodeRange]>,
}

impl CharClass {
    /// Sort `ranges` on their start and coalesce overlapping or adjacent spans.
    pub fn from_ranges(mut ranges: Vec<CodeRange>) -> Self {
        ranges.sort_by_key(|r| r.low);

        let mut merged: Vec<CodeRange> = Vec::with_capacity(ranges.len());
        for r in ranges {
            match merged.last_mut() {
                Some(last) if r.low <= last.high.saturating_add(1) => {
                    if r.high > last.high {
                        last.high = r.high;
                    }
                }
                _ => merged.push(r),
            }
        }

        CharClass {
            ranges: merged.into_boxed_slice(),
        }
    }

    pub fn ranges(&self) -> &[CodeRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, c: u32) -> bool {
        // ranges are sorted and disjoint
        self.ranges
            .binary_search_by(|r| {
                if r.high < c {
                    std::cmp::Ordering::Less
                } else if r.low > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

// === Inst ===

/// One node of the instruction graph.
///
/// Codepoint-consuming instructions (`Rune`, `CClass`, `NCClass`, `Any`,
/// `AnyNl`) advance a thread into the next step; everything else is
/// resolved within the current step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inst {
    Rune { c: u32, next: InstId },
    CClass { class: ClassId, next: InstId },
    NCClass { class: ClassId, next: InstId },
    /// Any codepoint except `\n`.
    Any { next: InstId },
    /// Any codepoint.
    AnyNl { next: InstId },
    Bol { next: InstId },
    Eol { next: InstId },
    /// Two-way fork. `left` is followed at once, `right` is queued behind
    /// the threads already scheduled for this step. For `a|b` the first
    /// alternative sits on `right`; for the quantifiers `right` is the body.
    Or { left: InstId, right: InstId },
    Nop { next: InstId },
    LBra { group: usize, next: InstId },
    RBra { group: usize, next: InstId },
    End,
}

impl Inst {
    /// Sequential successor; for `Or` the left branch.
    pub(crate) fn next(&self) -> Option<InstId> {
        match *self {
            Inst::Rune { next, .. }
            | Inst::CClass { next, .. }
            | Inst::NCClass { next, .. }
            | Inst::Any { next }
            | Inst::AnyNl { next }
            | Inst::Bol { next }
            | Inst::Eol { next }
            | Inst::Nop { next }
            | Inst::LBra { next, .. }
            | Inst::RBra { next, .. } => Some(next),
            Inst::Or { left, .. } => Some(left),
            Inst::End => None,
        }
    }
}

// === Program ===

/// A compiled pattern. Immutable; one program may be run from many threads.
#[derive(Clone, Debug)]
pub struct Program {
    pub(crate) insts: Box<[Inst]>,
    pub(crate) classes: Vec<CharClass>,
    pub(crate) start: InstId,
    pub(crate) num_groups: usize,
}

impl Program {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn start(&self) -> InstId {
        self.start
    }

    #[inline]
    pub fn inst(&self, id: InstId) -> &Inst {
        &self.insts[id]
    }

    pub fn insts(&self) -> &[Inst] {
        &self.insts
    }

    pub fn classes(&self) -> &[CharClass] {
        &self.classes
    }

    #[inline]
    pub fn class(&self, id: ClassId) -> &CharClass {
        &self.classes[id]
    }

    /// Parenthesized groups in the pattern, not counting group 0.
    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// True if every match must begin at a line start.
    pub fn starts_with_bol(&self) -> bool {
        matches!(self.insts[self.start], Inst::Bol { .. })
    }
}

fn fmt_code(f: &mut fmt::Formatter<'_>, c: u32) -> fmt::Result {
    match char::from_u32(c) {
        Some(ch) if !ch.is_control() => write!(f, "{}", ch),
        _ => write!(f, "\\u{{{:x}}}", c),
    }
}

fn fmt_class(f: &mut fmt::Formatter<'_>, class: &CharClass, negated: bool) -> fmt::Result {
    write!(f, "[")?;
    if negated {
        write!(f, "^")?;
    }
    for r in class.ranges() {
        fmt_code(f, r.low)?;
        if r.low != r.high {
            write!(f, "-")?;
            fmt_code(f, r.high)?;
        }
    }
    write!(f, "]")
}

/// Program listing, one instruction per line.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "start: {}", self.start)?;
        for (i, inst) in self.insts.iter().enumerate() {
            write!(f, "{:4}: ", i)?;
            match *inst {
                Inst::Rune { c, next } => {
                    write!(f, "rune    ")?;
                    fmt_code(f, c)?;
                    writeln!(f, " -> {}", next)?;
                }
                Inst::CClass { class, next } => {
                    write!(f, "cclass  ")?;
                    fmt_class(f, &self.classes[class], false)?;
                    writeln!(f, " -> {}", next)?;
                }
                Inst::NCClass { class, next } => {
                    write!(f, "ncclass ")?;
                    fmt_class(f, &self.classes[class], true)?;
                    writeln!(f, " -> {}", next)?;
                }
                Inst::Any { next } => writeln!(f, "any     -> {}", next)?,
                Inst::AnyNl { next } => writeln!(f, "anynl   -> {}", next)?,
                Inst::Bol { next } => writeln!(f, "bol     -> {}", next)?,
                Inst::Eol { next } => writeln!(f, "eol     -> {}", next)?,
                Inst::Or { left, right } => writeln!(f, "or      -> {}, {}", left, right)?,
                Inst::Nop { next } => writeln!(f, "nop     -> {}", next)?,
                Inst::LBra { group, next } => writeln!(f, "lbra    {} -> {}", group, next)?,
                Inst::RBra { group, next } => writeln!(f, "rbra    {} -> {}", group, next)?,
                Inst::End => writeln!(f, "end")?,
            }
        }
        Ok(())
    }
}

// === Capture State ===

/// Byte offsets of one capture group. Either end is `None` until the
/// simulation stamps it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl Span {
    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Capture history of one simulation thread. A plain value: forking a
/// thread copies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureState {
    pub spans: [Span; NSUBEXP],
}

impl Default for CaptureState {
    fn default() -> Self {
        CaptureState {
            spans: [Span::default(); NSUBEXP],
        }
    }
}

impl CaptureState {
    /// Fresh state for a thread seeded at byte offset `at`.
    pub fn starting_at(at: usize) -> Self {
        let mut state = CaptureState::default();
        state.spans[0].start = Some(at);
        state
    }

    #[inline]
    pub fn match_start(&self) -> Option<usize> {
        self.spans[0].start
    }

    #[inline]
    pub fn match_end(&self) -> Option<usize> {
        self.spans[0].end
    }

    /// Number of groups up to and including the highest one that was set.
    pub fn group_count(&self) -> usize {
        self.spans
            .iter()
            .rposition(Span::is_set)
            .map_or(0, |i| i + 1)
    }
}
