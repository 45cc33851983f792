// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::fingerprint::{Fingerprint, SymbolCode, ANY_VAR, BELOW_VAR};
use std::collections::BTreeMap;

/// A node of the fingerprint trie.
///
/// The path from the root to a node spells out a fingerprint prefix; nodes at
/// full fingerprint depth carry the payloads. Branching is split into three
/// categories per the sampling markers:
///
/// * `f_alternatives` — sparse map over concrete symbol codes, plus the
///   dedicated [`NOT_IN_TERM`](crate::NOT_IN_TERM) key,
/// * `below_var` — the [`BELOW_VAR`](crate::BELOW_VAR) child,
/// * `any_var` — the [`ANY_VAR`](crate::ANY_VAR) child.
///
/// `f_alternatives` is an ordered map so that walks are deterministic
/// (ascending key order; the `NOT_IN_TERM` key is negative and therefore
/// comes first).
///
/// Payloads are opaque to the trie; it stores them, hands out mutable access,
/// and drops them with the tree. Term-keyed use goes through
/// [`FpIndex`](crate::FpIndex); the trie itself is keyed by [`Fingerprint`]s.
#[derive(Debug)]
pub struct FpTree<P> {
    pub(crate) f_alternatives: BTreeMap<SymbolCode, FpTree<P>>,
    pub(crate) below_var: Option<Box<FpTree<P>>>,
    pub(crate) any_var: Option<Box<FpTree<P>>>,

    /// Number of direct children across all three categories.
    ///
    /// Kept in sync on every attach and detach; pruning relies on it.
    count: usize,

    pub(crate) payload: Option<P>,
}

impl<P> Default for FpTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> FpTree<P> {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            f_alternatives: BTreeMap::new(),
            below_var: None,
            any_var: None,
            count: 0,
            payload: None,
        }
    }

    /// This node's payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    /// Mutable access to this node's payload slot.
    pub fn payload_mut(&mut self) -> &mut Option<P> {
        &mut self.payload
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.count
    }

    /// The child reached via `sample`, if present.
    ///
    /// [`BELOW_VAR`](crate::BELOW_VAR) and [`ANY_VAR`](crate::ANY_VAR) route
    /// to the dedicated slots, every other sample (including
    /// [`NOT_IN_TERM`](crate::NOT_IN_TERM)) goes through `f_alternatives`.
    #[must_use]
    pub fn child(&self, sample: SymbolCode) -> Option<&Self> {
        if sample == BELOW_VAR {
            self.below_var.as_deref()
        } else if sample == ANY_VAR {
            self.any_var.as_deref()
        } else {
            self.f_alternatives.get(&sample)
        }
    }

    pub(crate) fn child_mut(&mut self, sample: SymbolCode) -> Option<&mut Self> {
        if sample == BELOW_VAR {
            self.below_var.as_deref_mut()
        } else if sample == ANY_VAR {
            self.any_var.as_deref_mut()
        } else {
            self.f_alternatives.get_mut(&sample)
        }
    }

    fn child_or_attach(&mut self, sample: SymbolCode) -> &mut Self {
        if sample == BELOW_VAR {
            if self.below_var.is_none() {
                self.count += 1;
            }
            self.below_var.get_or_insert_with(Box::default)
        } else if sample == ANY_VAR {
            if self.any_var.is_none() {
                self.count += 1;
            }
            self.any_var.get_or_insert_with(Box::default)
        } else {
            if !self.f_alternatives.contains_key(&sample) {
                self.count += 1;
            }
            self.f_alternatives.entry(sample).or_default()
        }
    }

    fn detach_child(&mut self, sample: SymbolCode) -> Option<Self> {
        let detached = if sample == BELOW_VAR {
            self.below_var.take().map(|node| *node)
        } else if sample == ANY_VAR {
            self.any_var.take().map(|node| *node)
        } else {
            self.f_alternatives.remove(&sample)
        };

        if detached.is_some() {
            self.count -= 1;
        }

        detached
    }

    /// Descends along `fingerprint`, creating missing children, and returns
    /// the terminal node for payload mutation.
    ///
    /// Never modifies an existing payload.
    pub fn insert(&mut self, fingerprint: &Fingerprint) -> &mut Self {
        let mut node = self;

        for &sample in fingerprint.samples() {
            node = node.child_or_attach(sample);
        }

        node
    }

    /// Descends along `fingerprint` without creating anything.
    #[must_use]
    pub fn find(&self, fingerprint: &Fingerprint) -> Option<&Self> {
        let mut node = self;

        for &sample in fingerprint.samples() {
            node = node.child(sample)?;
        }

        Some(node)
    }

    /// Mutable variant of [`FpTree::find`].
    pub fn find_mut(&mut self, fingerprint: &Fingerprint) -> Option<&mut Self> {
        let mut node = self;

        for &sample in fingerprint.samples() {
            node = node.child_mut(sample)?;
        }

        Some(node)
    }

    /// Removes the path spelled by `fingerprint`, pruning bottom-up.
    ///
    /// A subtree is detached iff it carries no payload and has no children
    /// left; pruning stops at the first shared ancestor. The root itself
    /// always survives. Removing an absent path is a no-op, as is removing a
    /// path whose terminal node still carries payload.
    pub fn remove(&mut self, fingerprint: &Fingerprint) {
        self.remove_rec(fingerprint.samples());
    }

    // Returns whether the parent should detach this subtree.
    fn remove_rec(&mut self, key: &[SymbolCode]) -> bool {
        let Some((&sample, rest)) = key.split_first() else {
            return self.payload.is_none();
        };

        let detach = self
            .child_mut(sample)
            .is_some_and(|child| child.remove_rec(rest));

        if detach {
            self.detach_child(sample);
        }

        self.count == 0 && self.payload.is_none()
    }

    /// Number of live nodes in this subtree, including the node itself.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .f_alternatives
            .values()
            .map(Self::node_count)
            .sum::<usize>()
            + self.below_var.as_deref().map_or(0, Self::node_count)
            + self.any_var.as_deref().map_or(0, Self::node_count)
    }

    /// Visits every payload-carrying node in deterministic order.
    ///
    /// The visitor receives the path from the root (samples, in order) and
    /// the payload. Children are visited with `f_alternatives` in ascending
    /// key order first, then the `below_var` child, then the `any_var` child;
    /// a node's own payload is visited before its children (only relevant for
    /// the root, which carries the payload under the empty fingerprint
    /// scheme).
    pub fn for_each_leaf<F: FnMut(&[SymbolCode], &P)>(&self, mut visitor: F) {
        let mut path = Vec::new();
        self.walk(&mut path, &mut visitor);
    }

    fn walk<F: FnMut(&[SymbolCode], &P)>(&self, path: &mut Vec<SymbolCode>, visitor: &mut F) {
        if let Some(payload) = &self.payload {
            visitor(path, payload);
        }

        for (&sample, child) in &self.f_alternatives {
            path.push(sample);
            child.walk(path, visitor);
            path.pop();
        }
        if let Some(child) = self.below_var.as_deref() {
            path.push(BELOW_VAR);
            child.walk(path, visitor);
            path.pop();
        }
        if let Some(child) = self.any_var.as_deref() {
            path.push(ANY_VAR);
            child.walk(path, visitor);
            path.pop();
        }
    }
}
