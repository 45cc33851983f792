// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Compatibility retrieval over the fingerprint trie.
//!
//! Both traversals walk the trie in lock-step with the query fingerprint and,
//! per position, only descend into children that may still lead to a
//! compatible leaf. They are sound over-approximations: every stored term
//! that truly unifies with (resp. matches) the query is reached, plus
//! possibly some that do not. Refining the candidates with real unification
//! or matching is the caller's job.

use crate::fingerprint::{Fingerprint, SymbolCode, ANY_VAR, BELOW_VAR, NOT_IN_TERM};
use crate::tree::FpTree;

impl<P> FpTree<P> {
    /// Appends the payloads of all leaves whose fingerprints are
    /// unification-compatible with `fingerprint` to `collect`.
    ///
    /// Returns the number of payloads appended. Each leaf is reached over at
    /// most one path, so no duplicates arise.
    pub fn find_unifiable<'t>(
        &'t self,
        fingerprint: &Fingerprint,
        collect: &mut Vec<&'t P>,
    ) -> usize {
        self.unifiable_rec(fingerprint.samples(), collect)
    }

    fn unifiable_rec<'t>(&'t self, key: &[SymbolCode], collect: &mut Vec<&'t P>) -> usize {
        let Some((&query, rest)) = key.split_first() else {
            return self.yield_payload(collect);
        };

        let mut hits = 0;

        if query > 0 {
            // A symbol at the query position unifies with the same symbol,
            // with a variable, and with anything below a variable.
            if let Some(child) = self.f_alternatives.get(&query) {
                hits += child.unifiable_rec(rest, collect);
            }
            if let Some(child) = self.any_var.as_deref() {
                hits += child.unifiable_rec(rest, collect);
            }
            if let Some(child) = self.below_var.as_deref() {
                hits += child.unifiable_rec(rest, collect);
            }
        } else if query == NOT_IN_TERM {
            // The position exists in no instance of the query term, so it
            // cannot unify with an existing position. Stored below-var terms
            // qualify: their instances may lack the position as well.
            if let Some(child) = self.f_alternatives.get(&NOT_IN_TERM) {
                hits += child.unifiable_rec(rest, collect);
            }
            if let Some(child) = self.below_var.as_deref() {
                hits += child.unifiable_rec(rest, collect);
            }
        } else {
            hits += self.variable_query_rec(query, rest, collect, Self::unifiable_rec);
        }

        hits
    }

    /// Appends the payloads of all leaves whose fingerprints are
    /// match-compatible with `fingerprint` (stored terms that may be
    /// instances of the query) to `collect`.
    ///
    /// Returns the number of payloads appended.
    pub fn find_matchable<'t>(
        &'t self,
        fingerprint: &Fingerprint,
        collect: &mut Vec<&'t P>,
    ) -> usize {
        self.matchable_rec(fingerprint.samples(), collect)
    }

    fn matchable_rec<'t>(&'t self, key: &[SymbolCode], collect: &mut Vec<&'t P>) -> usize {
        let Some((&query, rest)) = key.split_first() else {
            return self.yield_payload(collect);
        };

        let mut hits = 0;

        if query > 0 {
            // Matching is asymmetric: a symbol in the pattern can only be
            // matched by the very same symbol in the instance.
            if let Some(child) = self.f_alternatives.get(&query) {
                hits += child.matchable_rec(rest, collect);
            }
        } else if query == NOT_IN_TERM {
            // An absent pattern position cannot match an existing one, but
            // instantiating a stored below-var position may make it absent.
            if let Some(child) = self.f_alternatives.get(&NOT_IN_TERM) {
                hits += child.matchable_rec(rest, collect);
            }
            if let Some(child) = self.below_var.as_deref() {
                hits += child.matchable_rec(rest, collect);
            }
        } else {
            hits += self.variable_query_rec(query, rest, collect, Self::matchable_rec);
        }

        hits
    }

    // Shared variable-position case: a query variable (or a position below
    // one) is compatible with every stored alternative, except that ANY_VAR
    // requires the position to actually exist in the stored term, which rules
    // out the NOT_IN_TERM edge. NOT_IN_TERM is the only negative
    // f_alternatives key, so starting the range at 1 skips exactly that edge.
    fn variable_query_rec<'t>(
        &'t self,
        query: SymbolCode,
        rest: &[SymbolCode],
        collect: &mut Vec<&'t P>,
        descend: fn(&'t Self, &[SymbolCode], &mut Vec<&'t P>) -> usize,
    ) -> usize {
        debug_assert!(query == ANY_VAR || query == BELOW_VAR);

        let mut hits = 0;

        if let Some(child) = self.any_var.as_deref() {
            hits += descend(child, rest, collect);
        }
        if let Some(child) = self.below_var.as_deref() {
            hits += descend(child, rest, collect);
        }

        let lowest_key = if query == BELOW_VAR { SymbolCode::MIN } else { 1 };
        for child in self.f_alternatives.range(lowest_key..).map(|(_, c)| c) {
            hits += descend(child, rest, collect);
        }

        hits
    }

    fn yield_payload<'t>(&'t self, collect: &mut Vec<&'t P>) -> usize {
        if let Some(payload) = &self.payload {
            collect.push(payload);
            1
        } else {
            0
        }
    }
}
