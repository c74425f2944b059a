//! # runeregex
//!
//! UTF-8 aware regular expressions. A pattern is compiled into an
//! instruction graph by an operator-precedence parser, and the graph is run
//! by a Thompson NFA simulator: no backtracking, leftmost-longest matches,
//! and capture groups tracked per simulation thread.
//!
//! Supported syntax: literal codepoints, `\` escapes, `.`, `^`, `$`, `*`,
//! `+`, `?`, `|`, `(...)` (up to 31 groups) and bracket classes `[...]` /
//! `[^...]`. A negated class never matches `\n`.
//!
//! ## Quick Start
//!
//! ```rust
//! use runeregex::prelude::*;
//!
//! let re = Regex::new("[0-9]+-[0-9]+-[0-9]+").unwrap();
//! let m = re.find("Date: 2026-02-12").unwrap().unwrap();
//! assert_eq!(m.as_str(), Some("2026-02-12"));
//! assert_eq!(m.start(), 6);
//! ```
//!
//! For fine-grained control, use [`RegexBuilder`](api::RegexBuilder):
//!
//! ```rust
//! use runeregex::prelude::*;
//!
//! let re = Regex::builder("a.c")
//!     .dot_matches_newline(true)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("a\nc").unwrap());
//! ```
//!
//! ## Low-Level API
//!
//! The compiler and simulator can also be driven directly:
//!
//! ```rust
//! use runeregex::regcomp::compile;
//! use runeregex::regdefs::RegexOptions;
//! use runeregex::regexec::exec;
//!
//! let prog = compile(b"(ab)+c", RegexOptions::empty()).unwrap();
//! let region = exec(&prog, b"xababc").unwrap().unwrap();
//! assert_eq!(region.group(0), Some(1..6));
//! assert_eq!(region.group(1), Some(3..5));
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`regdefs`] | Limits, error codes, compile options |
//! | [`regint`] | Instructions, classes, programs, capture state |
//! | [`encodings`] | UTF-8 codepoint primitives |
//! | [`regparse`] | Pattern lexer and bracket expressions |
//! | [`regcomp`] | Token stream to instruction graph |
//! | [`regexec`] | NFA simulator |
//! | [`regerror`] | Error messages |
//! | [`api`] | `Regex`, `Match`, `Captures`, iterators |

pub mod api;
pub mod encodings;
pub mod error;
pub mod prelude;
pub mod regcomp;
pub mod regdefs;
pub mod regerror;
pub mod regexec;
pub mod regint;
pub mod regparse;
