//! Interned strings.
//!
//! Identifiers and string literals are interned once and referred to by a
//! small copyable `Symbol` handle afterwards. Interning makes name
//! comparison an integer comparison and lets tokens, AST nodes, IR
//! instructions and the VM's global table all share one allocation per
//! distinct string.
//!
//! Interned strings live for the duration of the process; the table never
//! shrinks. That is the right trade-off for a compiler-shaped workload
//! where the set of distinct names is small and stable.

mod interner;

use std::fmt;

use interner::STRING_TABLE;

/// A handle to an interned string.
///
/// Two symbols are equal exactly when the strings they were interned from
/// are equal.
///
/// # Examples
///
/// ```
/// use rillc_util::Symbol;
///
/// let a = Symbol::intern("count");
/// let b = Symbol::intern("count");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "count");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    /// Intern a string, returning its symbol.
    ///
    /// Interning the same string twice returns the same symbol.
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// The interned string.
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.resolve(self.index())
    }

    /// The raw table index, exposed for the interner.
    pub(crate) const fn new(index: u32) -> Self {
        Symbol(index)
    }

    pub(crate) const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}
