// regexec.rs - NFA simulator.
//
// Runs a Program over a subject one codepoint at a time, keeping every live
// path in a thread list instead of backtracking. Threads are deduplicated by
// instruction, so a step never holds more threads than the program has
// instructions. Thread lists have a fixed capacity; when the first attempt
// runs out of room the whole search is repeated once with a larger one.

use std::ops::Range;

use log::debug;
use memchr::memchr;
use smallvec::SmallVec;

use crate::encodings::utf8;
use crate::error::RegexError;
use crate::regdefs::*;
use crate::regint::*;

const NEWLINE: u32 = '\n' as u32;

// ============================================================================
// Configuration
// ============================================================================

/// Thread list capacities used by a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecConfig {
    /// Capacity of the first attempt.
    pub list_size: usize,
    /// Capacity of the single retry after an overflow.
    pub big_list_size: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        ExecConfig {
            list_size: LIST_SIZE,
            big_list_size: BIG_LIST_SIZE,
        }
    }
}

impl ExecConfig {
    fn validate(&self) -> Result<(), RegexError> {
        if self.list_size == 0 || self.big_list_size == 0 {
            return Err(RegexError::InvalidArgument);
        }
        Ok(())
    }
}

// ============================================================================
// Thread lists
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct Thread {
    pc: InstId,
    caps: CaptureState,
}

/// A thread list ran out of room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Overflow;

struct ThreadList {
    threads: SmallVec<[Thread; LIST_SIZE]>,
    capacity: usize,
}

impl ThreadList {
    fn with_capacity(capacity: usize) -> Self {
        ThreadList {
            threads: SmallVec::new(),
            capacity,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.threads.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    fn clear(&mut self) {
        self.threads.clear();
    }

    /// Schedule `pc` with a copy of `caps`. If a thread already sits on `pc`
    /// it keeps its place; it only takes over `caps` when those start
    /// earlier.
    fn add(&mut self, pc: InstId, caps: &CaptureState) -> Result<(), Overflow> {
        if let Some(t) = self.threads.iter_mut().find(|t| t.pc == pc) {
            if caps.match_start() < t.caps.match_start() {
                t.caps = *caps;
            }
            return Ok(());
        }
        if self.threads.len() >= self.capacity {
            return Err(Overflow);
        }
        self.threads.push(Thread { pc, caps: *caps });
        Ok(())
    }
}

// ============================================================================
// Match results
// ============================================================================

/// Capture spans of one match. Group 0 is the whole match; groups after
/// the last one that took part in the match are not kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    spans: SmallVec<[Span; 4]>,
}

impl Region {
    fn from_state(state: &CaptureState) -> Self {
        let n = state.group_count();
        Region {
            spans: state.spans[..n].iter().copied().collect(),
        }
    }

    /// Number of reported groups, group 0 included.
    pub fn num_groups(&self) -> usize {
        self.spans.len()
    }

    /// Byte range of group `n`, or `None` if it did not take part.
    pub fn group(&self, n: usize) -> Option<Range<usize>> {
        let span = self.spans.get(n)?;
        match (span.start, span.end) {
            (Some(start), Some(end)) if start <= end => Some(start..end),
            _ => None,
        }
    }

    /// Owned copy of the text of group `n` in `subject`.
    pub fn group_text(&self, subject: &[u8], n: usize) -> Option<String> {
        let bytes = subject.get(self.group(n)?)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
}

// ============================================================================
// Simulation
// ============================================================================

#[inline]
fn at_line_start(subject: &[u8], s: usize) -> bool {
    s == 0 || subject[s - 1] == b'\n'
}

/// Keep the leftmost match, and of two starting at the same place the
/// longer one.
fn renew_match(best: &mut Option<CaptureState>, candidate: &CaptureState) {
    let better = match best {
        None => true,
        Some(b) => {
            candidate.match_start() < b.match_start()
                || (candidate.match_start() == b.match_start()
                    && candidate.match_end() > b.match_end())
        }
    };
    if better {
        *best = Some(*candidate);
    }
}

/// One full search from byte offset `start` with lists of `capacity`.
fn run(
    prog: &Program,
    subject: &[u8],
    start: usize,
    capacity: usize,
) -> Result<Option<CaptureState>, Overflow> {
    let mut clist = ThreadList::with_capacity(capacity);
    let mut nlist = ThreadList::with_capacity(capacity);
    let mut best: Option<CaptureState> = None;
    let mut matched = false;

    let anchored = prog.starts_with_bol();
    let mut check_start = anchored;
    let mut s = start;

    loop {
        // nothing alive: jump to the next line start
        if check_start && !at_line_start(subject, s) {
            match memchr(b'\n', &subject[s..]) {
                Some(i) => s += i + 1,
                None => return Ok(best),
            }
        }

        let (r, width) = if s < subject.len() {
            let (c, w) = utf8::decode_lossy(subject, s);
            (Some(c), w)
        } else {
            (None, 0)
        };

        nlist.clear();
        if !matched {
            clist.add(prog.start(), &CaptureState::starting_at(s))?;
        }

        let mut i = 0;
        while i < clist.len() {
            let Thread { mut pc, mut caps } = clist.threads[i];
            i += 1;

            loop {
                match *prog.inst(pc) {
                    Inst::Rune { c, next } => {
                        if r == Some(c) {
                            nlist.add(next, &caps)?;
                        }
                        break;
                    }
                    Inst::CClass { class, next } => {
                        if r.is_some_and(|r| prog.class(class).contains(r)) {
                            nlist.add(next, &caps)?;
                        }
                        break;
                    }
                    Inst::NCClass { class, next } => {
                        if r.is_some_and(|r| !prog.class(class).contains(r)) {
                            nlist.add(next, &caps)?;
                        }
                        break;
                    }
                    Inst::Any { next } => {
                        if r.is_some_and(|r| r != NEWLINE) {
                            nlist.add(next, &caps)?;
                        }
                        break;
                    }
                    Inst::AnyNl { next } => {
                        if r.is_some() {
                            nlist.add(next, &caps)?;
                        }
                        break;
                    }
                    Inst::Bol { next } => {
                        if !at_line_start(subject, s) {
                            break;
                        }
                        pc = next;
                    }
                    Inst::Eol { next } => {
                        if r.is_some_and(|r| r != NEWLINE) {
                            break;
                        }
                        pc = next;
                    }
                    Inst::LBra { group, next } => {
                        caps.spans[group].start = Some(s);
                        pc = next;
                    }
                    Inst::RBra { group, next } => {
                        caps.spans[group].end = Some(s);
                        pc = next;
                    }
                    Inst::Or { left, right } => {
                        // right branch runs later in this same step
                        clist.add(right, &caps)?;
                        pc = left;
                    }
                    Inst::Nop { next } => pc = next,
                    Inst::End => {
                        matched = true;
                        caps.spans[0].end = Some(s);
                        renew_match(&mut best, &caps);
                        break;
                    }
                }
            }
        }

        if r.is_none() || (matched && nlist.is_empty()) {
            break;
        }
        check_start = anchored && nlist.is_empty();
        s += width;
        std::mem::swap(&mut clist, &mut nlist);
    }

    Ok(best)
}

// ============================================================================
// Entry points
// ============================================================================

/// Search `subject` for the leftmost-longest match of `prog`.
pub fn exec(prog: &Program, subject: &[u8]) -> Result<Option<Region>, RegexError> {
    exec_at(prog, subject, 0, &ExecConfig::default())
}

pub fn exec_with_config(
    prog: &Program,
    subject: &[u8],
    config: &ExecConfig,
) -> Result<Option<Region>, RegexError> {
    exec_at(prog, subject, 0, config)
}

/// Search from byte offset `start`. Offsets in the result are relative to
/// the whole subject, and `^` still sees the byte before `start`.
pub fn exec_at(
    prog: &Program,
    subject: &[u8],
    start: usize,
    config: &ExecConfig,
) -> Result<Option<Region>, RegexError> {
    config.validate()?;
    if start > subject.len() {
        return Err(RegexError::InvalidArgument);
    }

    let found = match run(prog, subject, start, config.list_size) {
        Ok(found) => found,
        Err(Overflow) => {
            debug!(
                "thread list overflow at capacity {}, retrying with {}",
                config.list_size, config.big_list_size
            );
            run(prog, subject, start, config.big_list_size)
                .map_err(|_| RegexError::ThreadListOverflow)?
        }
    };

    Ok(found.map(|state| Region::from_state(&state)))
}
