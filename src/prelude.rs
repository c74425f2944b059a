// prelude.rs - Convenient re-exports for the idiomatic API.
//
//! # Prelude
//!
//! ```
//! use runeregex::prelude::*;
//!
//! let re = Regex::new("[0-9]+").unwrap();
//! let m = re.find("answer: 42").unwrap().unwrap();
//! assert_eq!(m.as_str(), Some("42"));
//! assert!(matches("^ans", "answer"));
//! ```

pub use crate::api::{matches, Captures, CapturesIter, FindIter, Match, Regex, RegexBuilder};
pub use crate::error::RegexError;
pub use crate::regdefs::RegexOptions;
