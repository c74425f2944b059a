// encodings/mod.rs - Codepoint primitives.
// Patterns and subjects are always UTF-8.

pub mod utf8;
