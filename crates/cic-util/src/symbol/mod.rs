//! Interned string symbols.
//!
//! A [`Symbol`] is a 4-byte handle into a global string table. The same
//! string always interns to the same symbol, so name comparison is an
//! integer comparison and AST nodes stay small regardless of identifier
//! length.

mod interner;

use std::fmt;

use interner::STRING_TABLE;

/// An interned string.
///
/// # Examples
///
/// ```
/// use cic_util::Symbol;
///
/// let a = Symbol::intern("main");
/// let b = Symbol::intern("main");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "main");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// Index into the global string table.
    index: u32,
}

static_assertions::assert_eq_size!(Symbol, u32);

impl Symbol {
    /// Intern a string, returning its symbol.
    ///
    /// Thread-safe; repeated calls with the same string return the same
    /// symbol.
    pub fn intern(string: &str) -> Self {
        Self {
            index: STRING_TABLE.intern(string),
        }
    }

    /// Get the string this symbol was interned from.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was not produced by [`Symbol::intern`].
    pub fn as_str(self) -> &'static str {
        STRING_TABLE
            .get(self.index)
            .expect("symbol index not present in the string table")
    }

    /// Raw table index, for debugging and serialization.
    pub fn as_u32(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
