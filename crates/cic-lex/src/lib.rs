//! cic-lex - Lexical analyzer for the CI language.
//!
//! This crate turns CI source text into a stream of [`Token`]s. The lexer is
//! hand-written and direct-coded: one small function per token family,
//! dispatched on the first character. It owns three sub-modes beyond plain
//! code:
//!
//! - **Interpolated strings** (`$"a{x}b"`): the lexer returns the literal
//!   prefix and a marker that an argument follows; the parser parses the
//!   argument and calls back into the lexer to continue the string.
//! - **Documentation comments** (`///`): consecutive lines are coalesced
//!   into a single token whose decoded value the parser attaches to the
//!   following declaration.
//! - **Verbatim capture**: while a capture buffer is attached (used for
//!   `native { ... }` blocks), every consumed character is also appended to
//!   the buffer.
//!
//! The published state is the current [`Token`], the 1-based line it started
//! on, and the input filename. Any lexical failure aborts with a
//! [`ParseError`](cic_util::ParseError).

pub mod cursor;
pub mod lexer;
pub mod token;

#[cfg(test)]
mod edge_cases;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::Token;
