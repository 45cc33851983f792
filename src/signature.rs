// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::fingerprint::SymbolCode;
use rustc_hash::FxHashMap;

/// Interns symbol names to strictly positive [`SymbolCode`]s.
///
/// Codes are handed out densely starting at 1, in interning order. Whether a
/// symbol is a predicate is decided by its first interning.
///
/// The index itself only ever sees codes; this table exists so terms can be
/// built (and printed back) by name.
///
/// # Examples
///
/// ```
/// use fp_index::Signature;
///
/// let mut sig = Signature::new();
/// let f = sig.intern("f");
/// let p = sig.intern_predicate("p");
///
/// assert_eq!(f, sig.intern("f"));
/// assert_eq!(Some("p"), sig.name(p));
/// assert!(sig.is_predicate(p));
/// assert!(!sig.is_predicate(f));
/// ```
#[derive(Debug, Default)]
pub struct Signature {
    codes: FxHashMap<String, SymbolCode>,
    names: Vec<String>,
    predicates: Vec<bool>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name` as a function symbol and returns its code.
    ///
    /// Returns the existing code if the name is already known.
    pub fn intern(&mut self, name: &str) -> SymbolCode {
        self.intern_impl(name, false)
    }

    /// Interns `name` as a predicate symbol and returns its code.
    ///
    /// Returns the existing code if the name is already known.
    pub fn intern_predicate(&mut self, name: &str) -> SymbolCode {
        self.intern_impl(name, true)
    }

    fn intern_impl(&mut self, name: &str, predicate: bool) -> SymbolCode {
        if let Some(&code) = self.codes.get(name) {
            return code;
        }

        self.names.push(name.to_owned());
        self.predicates.push(predicate);

        let code = self.names.len() as SymbolCode;
        self.codes.insert(name.to_owned(), code);
        code
    }

    /// The code of an already-interned name.
    #[must_use]
    pub fn code(&self, name: &str) -> Option<SymbolCode> {
        self.codes.get(name).copied()
    }

    /// The name behind `code`, if the code was handed out by this table.
    #[must_use]
    pub fn name(&self, code: SymbolCode) -> Option<&str> {
        code.checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| self.names.get(idx))
            .map(String::as_str)
    }

    /// Returns `true` if `code` was interned as a predicate symbol.
    #[must_use]
    pub fn is_predicate(&self, code: SymbolCode) -> bool {
        code.checked_sub(1)
            .and_then(|idx| usize::try_from(idx).ok())
            .and_then(|idx| self.predicates.get(idx))
            .copied()
            .unwrap_or(false)
    }

    /// Number of interned symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no symbol has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
