// regcomp.rs - Compiler: converts a token stream into an instruction graph.
//
// Operator-precedence parsing with two bounded stacks. Operands are graph
// fragments (first/last instruction); reducing an operator wires fragments
// together. A final pass strips NOP instructions out of every edge and seals
// the graph into an immutable Program.

use log::{debug, trace};
use smallvec::SmallVec;

use crate::error::RegexError;
use crate::regdefs::*;
use crate::regint::*;
use crate::regparse::{Lexer, Token};

// ============================================================================
// Operators
// ============================================================================

/// Operators in increasing binding strength. `Sentinel` sits at the bottom
/// of the operator stack; `Start` is only used as a reduction threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Operator {
    Sentinel,
    Start,
    RBra,
    LBra,
    Or,
    Cat,
    Star,
    Plus,
    Quest,
}

impl Operator {
    /// Name used in "missing operand" messages.
    fn symbol(self) -> &'static str {
        match self {
            Operator::LBra => "(",
            Operator::RBra => ")",
            Operator::Or => "|",
            Operator::Star => "*",
            Operator::Plus => "+",
            Operator::Quest => "?",
            Operator::Cat => "concatenation",
            Operator::Sentinel | Operator::Start => "",
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct StackedOp {
    op: Operator,
    // group number current when the operator was pushed
    subid: usize,
}

/// Partially built subgraph. `last` is the instruction whose successor is
/// still open.
#[derive(Clone, Copy, Debug)]
struct Frag {
    first: InstId,
    last: InstId,
}

// ============================================================================
// Scratch instructions
// ============================================================================

#[derive(Clone, Copy, Debug)]
enum Kind {
    Rune(u32),
    CClass(ClassId),
    NCClass(ClassId),
    Any,
    AnyNl,
    Bol,
    Eol,
    Or { right: InstId },
    Nop,
    LBra(usize),
    RBra(usize),
    End,
}

/// Instruction under construction. `next` stays `None` until a reduction
/// links it; for `Or` it is the left branch.
#[derive(Clone, Copy, Debug)]
struct PendingInst {
    kind: Kind,
    next: Option<InstId>,
}

impl Kind {
    fn from_token(tok: Token) -> Option<Kind> {
        match tok {
            Token::Rune(c) => Some(Kind::Rune(c)),
            Token::Any => Some(Kind::Any),
            Token::AnyNl => Some(Kind::AnyNl),
            Token::Bol => Some(Kind::Bol),
            Token::Eol => Some(Kind::Eol),
            Token::CClass(id) => Some(Kind::CClass(id)),
            Token::NCClass(id) => Some(Kind::NCClass(id)),
            _ => None,
        }
    }
}

// ============================================================================
// Compiler state
// ============================================================================

struct Compiler {
    insts: Vec<PendingInst>,
    operators: SmallVec<[StackedOp; NSTACK]>,
    operands: SmallVec<[Frag; NSTACK]>,
    nbra: usize,
    cursubid: usize,
    lastwasand: bool,
}

impl Compiler {
    fn new(pattern_len: usize) -> Self {
        Compiler {
            insts: Vec::with_capacity(INST_ALLOC_FACTOR * (pattern_len + 1)),
            operators: SmallVec::new(),
            operands: SmallVec::new(),
            nbra: 0,
            cursubid: 0,
            lastwasand: false,
        }
    }

    fn new_inst(&mut self, kind: Kind) -> InstId {
        self.insts.push(PendingInst { kind, next: None });
        self.insts.len() - 1
    }

    #[inline]
    fn link(&mut self, from: InstId, to: InstId) {
        self.insts[from].next = Some(to);
    }

    fn push_operator(&mut self, op: Operator) -> Result<(), RegexError> {
        if self.operators.len() >= NSTACK {
            return Err(RegexError::from(REGERR_PARSE_DEPTH_LIMIT_OVER));
        }
        self.operators.push(StackedOp {
            op,
            subid: self.cursubid,
        });
        Ok(())
    }

    fn push_operand(&mut self, first: InstId, last: InstId) -> Result<(), RegexError> {
        if self.operands.len() >= NSTACK {
            return Err(RegexError::from(REGERR_PARSE_DEPTH_LIMIT_OVER));
        }
        self.operands.push(Frag { first, last });
        Ok(())
    }

    fn pop_operand(&mut self, op: Operator) -> Result<Frag, RegexError> {
        self.operands
            .pop()
            .ok_or_else(|| RegexError::with_param(REGERR_MISSING_OPERAND, op.symbol()))
    }

    /// Reduce operators whose priority is at least `pri`. With `RBra` the
    /// reduction runs down to and including the innermost open group.
    fn eval_until(&mut self, pri: Operator) -> Result<(), RegexError> {
        loop {
            let top = match self.operators.last() {
                Some(s) => s.op,
                None => return Err(RegexError::from(REGERR_OPERATOR_STACK_UNDERFLOW)),
            };
            if pri != Operator::RBra && top < pri {
                return Ok(());
            }

            let StackedOp { op, subid } = match self.operators.pop() {
                Some(s) => s,
                None => return Err(RegexError::from(REGERR_OPERATOR_STACK_UNDERFLOW)),
            };

            match op {
                Operator::LBra => {
                    let body = self.pop_operand(op)?;
                    let close = self.new_inst(Kind::RBra(subid));
                    self.link(body.last, close);
                    let open = self.new_inst(Kind::LBra(subid));
                    self.link(open, body.first);
                    self.push_operand(open, close)?;
                    return Ok(());
                }
                Operator::Or => {
                    let right = self.pop_operand(op)?;
                    let left = self.pop_operand(op)?;
                    let join = self.new_inst(Kind::Nop);
                    self.link(right.last, join);
                    self.link(left.last, join);
                    // the first alternative is queued, the second followed at once
                    let fork = self.new_inst(Kind::Or { right: left.first });
                    self.link(fork, right.first);
                    self.push_operand(fork, join)?;
                }
                Operator::Cat => {
                    let right = self.pop_operand(op)?;
                    let left = self.pop_operand(op)?;
                    self.link(left.last, right.first);
                    self.push_operand(left.first, right.last)?;
                }
                Operator::Star => {
                    let body = self.pop_operand(op)?;
                    let fork = self.new_inst(Kind::Or { right: body.first });
                    self.link(body.last, fork);
                    self.push_operand(fork, fork)?;
                }
                Operator::Plus => {
                    let body = self.pop_operand(op)?;
                    let fork = self.new_inst(Kind::Or { right: body.first });
                    self.link(body.last, fork);
                    self.push_operand(body.first, fork)?;
                }
                Operator::Quest => {
                    let body = self.pop_operand(op)?;
                    let skip = self.new_inst(Kind::Nop);
                    let fork = self.new_inst(Kind::Or { right: body.first });
                    self.link(fork, skip);
                    self.link(body.last, skip);
                    self.push_operand(fork, skip)?;
                }
                Operator::Sentinel | Operator::Start | Operator::RBra => {
                    return Err(RegexError::from(REGERR_UNKNOWN_OPERATOR));
                }
            }
        }
    }

    fn operator(&mut self, op: Operator) -> Result<(), RegexError> {
        if op == Operator::RBra {
            if self.nbra == 0 {
                return Err(RegexError::from(REGERR_UNMATCHED_CLOSE_PARENTHESIS));
            }
            self.nbra -= 1;
        }

        if op == Operator::LBra {
            self.cursubid += 1;
            if self.cursubid >= NSUBEXP {
                return Err(RegexError::from(REGERR_TOO_MANY_CAPTURES));
            }
            self.nbra += 1;
            if self.lastwasand {
                self.operator(Operator::Cat)?;
            }
        } else {
            self.eval_until(op)?;
        }

        if op != Operator::RBra {
            self.push_operator(op)?;
        }

        self.lastwasand = matches!(
            op,
            Operator::Star | Operator::Quest | Operator::Plus | Operator::RBra
        );
        Ok(())
    }

    fn operand(&mut self, kind: Kind) -> Result<(), RegexError> {
        if self.lastwasand {
            // implicit concatenation
            self.operator(Operator::Cat)?;
        }
        let id = self.new_inst(kind);
        self.push_operand(id, id)?;
        self.lastwasand = true;
        Ok(())
    }
}

// ============================================================================
// Optimization
// ============================================================================

/// Follow `target` through any chain of NOPs.
fn skip_nops(insts: &[PendingInst], mut target: InstId) -> InstId {
    while let PendingInst {
        kind: Kind::Nop,
        next: Some(next),
    } = insts[target]
    {
        target = next;
    }
    target
}

/// Rewrite every edge past NOPs and seal the scratch instructions.
/// NOPs stay in the array but nothing reaches them any more.
fn optimize(
    insts: Vec<PendingInst>,
    classes: Vec<CharClass>,
    start: InstId,
    num_groups: usize,
) -> Result<Program, RegexError> {
    let mut sealed = Vec::with_capacity(insts.len());
    for inst in &insts {
        let next = inst.next.map(|n| skip_nops(&insts, n));
        let sealed_inst = match (inst.kind, next) {
            (Kind::End, _) => Inst::End,
            (Kind::Or { right }, Some(left)) => Inst::Or {
                left,
                right: skip_nops(&insts, right),
            },
            (Kind::Rune(c), Some(next)) => Inst::Rune { c, next },
            (Kind::CClass(class), Some(next)) => Inst::CClass { class, next },
            (Kind::NCClass(class), Some(next)) => Inst::NCClass { class, next },
            (Kind::Any, Some(next)) => Inst::Any { next },
            (Kind::AnyNl, Some(next)) => Inst::AnyNl { next },
            (Kind::Bol, Some(next)) => Inst::Bol { next },
            (Kind::Eol, Some(next)) => Inst::Eol { next },
            (Kind::Nop, Some(next)) => Inst::Nop { next },
            (Kind::LBra(group), Some(next)) => Inst::LBra { group, next },
            (Kind::RBra(group), Some(next)) => Inst::RBra { group, next },
            (_, None) => return Err(RegexError::from(REGERR_DANGLING_INSTRUCTION)),
        };
        sealed.push(sealed_inst);
    }

    Ok(Program {
        insts: sealed.into_boxed_slice(),
        classes,
        start: skip_nops(&insts, start),
        num_groups,
    })
}

// ============================================================================
// Entry point
// ============================================================================

/// Compile `pattern` into a program.
///
/// The pattern must be valid UTF-8; `options` selects literal mode and
/// whether `.` matches a newline.
pub fn compile(pattern: &[u8], options: RegexOptions) -> Result<Program, RegexError> {
    let mut lexer = Lexer::new(pattern, options);
    let mut c = Compiler::new(pattern.len());

    c.push_operator(Operator::Sentinel)?;
    loop {
        let tok = lexer.next_token()?;
        match tok {
            Token::End => break,
            Token::Or => c.operator(Operator::Or)?,
            Token::Star => c.operator(Operator::Star)?,
            Token::Plus => c.operator(Operator::Plus)?,
            Token::Quest => c.operator(Operator::Quest)?,
            Token::LBra => c.operator(Operator::LBra)?,
            Token::RBra => c.operator(Operator::RBra)?,
            operand => match Kind::from_token(operand) {
                Some(kind) => c.operand(kind)?,
                None => return Err(RegexError::from(REGERR_UNKNOWN_OPERATOR)),
            },
        }
    }

    // close the last expression, then append the accepting instruction
    c.eval_until(Operator::Start)?;
    c.operand(Kind::End)?;
    c.eval_until(Operator::Start)?;

    if c.nbra != 0 {
        return Err(RegexError::from(
            REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS,
        ));
    }

    let start = match c.operands.pop() {
        Some(frag) => frag.first,
        None => return Err(RegexError::from(REGERR_OPERATOR_STACK_UNDERFLOW)),
    };

    let prog = optimize(c.insts, lexer.into_classes(), start, c.cursubid)?;

    debug!(
        "compiled {:?}: {} instructions, {} classes, {} groups",
        String::from_utf8_lossy(pattern),
        prog.len(),
        prog.classes().len(),
        prog.num_groups()
    );
    trace!("{}", prog);

    Ok(prog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(pattern: &str) -> Program {
        compile(pattern.as_bytes(), RegexOptions::empty()).unwrap()
    }

    fn comp_err(pattern: &str) -> RegexError {
        compile(pattern.as_bytes(), RegexOptions::empty()).unwrap_err()
    }

    /// Instructions reachable from the start, visiting both fork branches.
    fn reachable(prog: &Program) -> Vec<InstId> {
        let mut seen = vec![false; prog.len()];
        let mut stack = vec![prog.start()];
        while let Some(id) = stack.pop() {
            if seen[id] {
                continue;
            }
            seen[id] = true;
            match *prog.inst(id) {
                Inst::Or { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
                inst => stack.extend(inst.next()),
            }
        }
        (0..prog.len()).filter(|&i| seen[i]).collect()
    }

    #[test]
    fn literal_chain() {
        let prog = comp("ab");
        let a = prog.start();
        let Inst::Rune { c, next: b } = *prog.inst(a) else {
            panic!("expected rune");
        };
        assert_eq!(c, 'a' as u32);
        let Inst::Rune { c, next: end } = *prog.inst(b) else {
            panic!("expected rune");
        };
        assert_eq!(c, 'b' as u32);
        assert_eq!(*prog.inst(end), Inst::End);
        assert_eq!(prog.num_groups(), 0);
    }

    #[test]
    fn empty_pattern_is_just_end() {
        let prog = comp("");
        assert_eq!(*prog.inst(prog.start()), Inst::End);
    }

    #[test]
    fn no_reachable_nops() {
        for pat in ["a|b", "a?", "(a|b)c", "x(y|z)?w", "a|b|c", "(a?)?"] {
            let prog = comp(pat);
            for id in reachable(&prog) {
                assert!(
                    !matches!(prog.inst(id), Inst::Nop { .. }),
                    "nop reachable in {}:\n{}",
                    pat,
                    prog
                );
            }
        }
    }

    #[test]
    fn star_loops_back() {
        let prog = comp("a*");
        let Inst::Or { left, right } = *prog.inst(prog.start()) else {
            panic!("expected fork");
        };
        assert_eq!(*prog.inst(left), Inst::End);
        assert_eq!(
            *prog.inst(right),
            Inst::Rune {
                c: 'a' as u32,
                next: prog.start()
            }
        );
    }

    #[test]
    fn alternation_queues_first_alternative() {
        let prog = comp("a|b");
        let Inst::Or { left, right } = *prog.inst(prog.start()) else {
            panic!("expected fork");
        };
        let Inst::Rune { c, .. } = *prog.inst(right) else {
            panic!("expected rune");
        };
        assert_eq!(c, 'a' as u32);
        let Inst::Rune { c, .. } = *prog.inst(left) else {
            panic!("expected rune");
        };
        assert_eq!(c, 'b' as u32);
    }

    #[test]
    fn plus_enters_body_first() {
        let prog = comp("a+");
        let Inst::Rune { next: fork, .. } = *prog.inst(prog.start()) else {
            panic!("expected rune");
        };
        assert_eq!(
            *prog.inst(fork),
            Inst::Or {
                left: prog.insts().len() - 1,
                right: prog.start()
            }
        );
    }

    #[test]
    fn groups_are_numbered_left_to_right() {
        let prog = comp("(a)(b(c))");
        assert_eq!(prog.num_groups(), 3);
        let mut groups: Vec<usize> = prog
            .insts()
            .iter()
            .filter_map(|i| match *i {
                Inst::LBra { group, .. } => Some(group),
                _ => None,
            })
            .collect();
        groups.sort_unstable();
        assert_eq!(groups, vec![1, 2, 3]);

        let Inst::LBra { group, .. } = *prog.inst(prog.start()) else {
            panic!("expected group start");
        };
        assert_eq!(group, 1);
    }

    #[test]
    fn classes_move_into_program() {
        let prog = comp("[a-c][^x]");
        assert_eq!(prog.classes().len(), 2);
        assert!(matches!(prog.inst(prog.start()), Inst::CClass { class: 0, .. }));
    }

    #[test]
    fn bol_start() {
        assert!(comp("^abc").starts_with_bol());
        assert!(!comp("a^").starts_with_bol());
    }

    #[test]
    fn unmatched_parentheses() {
        assert_eq!(comp_err("(a").code(), REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
        assert_eq!(comp_err("a)").code(), REGERR_UNMATCHED_CLOSE_PARENTHESIS);
        assert_eq!(comp_err("((a)").code(), REGERR_END_PATTERN_WITH_UNMATCHED_PARENTHESIS);
    }

    #[test]
    fn missing_operands() {
        assert_eq!(
            comp_err("*a").to_string(),
            "syntax error: missing operand for '*'"
        );
        assert_eq!(
            comp_err("a|").to_string(),
            "syntax error: missing operand for '|'"
        );
        assert_eq!(comp_err("()").code(), REGERR_MISSING_OPERAND);
        assert_eq!(comp_err("|a").code(), REGERR_MISSING_OPERAND);
    }

    #[test]
    fn too_many_groups() {
        let pat = "(a)".repeat(NSUBEXP);
        assert_eq!(comp_err(&pat), RegexError::TooManyCaptures);
        let pat = "(a)".repeat(NSUBEXP - 1);
        assert_eq!(comp(&pat).num_groups(), NSUBEXP - 1);
    }

    #[test]
    fn nesting_limit() {
        let pat = format!("{}a{}", "(".repeat(NSTACK), ")".repeat(NSTACK));
        assert_eq!(comp_err(&pat), RegexError::ParseDepthLimitOver);
    }

    #[test]
    fn lexer_errors_propagate() {
        assert_eq!(comp_err("[a-").code(), REGERR_MALFORMED_CHAR_CLASS);
        assert!(matches!(
            compile(&[b'a', 0xff], RegexOptions::empty()).unwrap_err(),
            RegexError::Encoding { .. }
        ));
    }

    #[test]
    fn compile_is_deterministic() {
        let a = comp("(a|b)*c[^d-f]+$");
        let b = comp("(a|b)*c[^d-f]+$");
        assert_eq!(a.insts(), b.insts());
        assert_eq!(a.classes(), b.classes());
        assert_eq!(a.start(), b.start());
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn scratch_buffer_is_trimmed() {
        let prog = comp("abc");
        // three runes and the end instruction
        assert_eq!(prog.len(), 4);
    }
}
