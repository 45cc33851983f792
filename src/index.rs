// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::fingerprint::{Fingerprint, SymbolCode};
use crate::scheme::FingerprintScheme;
use crate::stats::mean_stddev;
use crate::term::Term;
use crate::tree::FpTree;
use std::collections::BTreeSet;
use std::io::Write;

/// Opaque leaf payload.
///
/// Payload internals belong to the caller (typically some collection of
/// terms or clause positions); the index only ever asks how many entries a
/// payload holds, for statistics and printing. Term-keyed operations place
/// no bound on the payload type at all.
pub trait Payload {
    /// Number of entries in this payload.
    fn len(&self) -> usize;

    /// Returns `true` if the payload holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Payload for Vec<T> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}

impl<T> Payload for BTreeSet<T> {
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }
}

/// Payload-size distribution across the leaves of an index.
///
/// Returned by [`FpIndex::distribution`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distribution {
    /// Number of payload-carrying leaves.
    pub leaves: usize,

    /// Mean payload size.
    pub mean: f64,

    /// Population standard deviation of the payload sizes.
    pub stddev: f64,
}

impl std::fmt::Display for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:5} leaves, {:6.2}+/-{:.3} terms/leaf",
            self.leaves, self.mean, self.stddev,
        )
    }
}

/// A fingerprint index over first-order terms.
///
/// Pairs a [`FingerprintScheme`] with a fingerprint trie ([`FpTree`]) and
/// exposes term-keyed operations: terms with equal fingerprints share a
/// single leaf whose payload `P` is managed by the caller.
///
/// The index is plain owned data, built for single-threaded use; wrap it in
/// a lock if it must be shared across threads.
///
/// # Examples
///
/// ```
/// use fp_index::{FingerprintScheme, FpIndex, SimpleTerm};
///
/// let mut index: FpIndex<Vec<u64>> = FpIndex::new(FingerprintScheme::Fp3D);
///
/// // f(a), f(b)
/// let f_a = SimpleTerm::function(1, vec![SimpleTerm::constant(2)]);
/// let f_b = SimpleTerm::function(1, vec![SimpleTerm::constant(3)]);
/// index.insert(&f_a).get_or_insert_with(Vec::new).push(100);
/// index.insert(&f_b).get_or_insert_with(Vec::new).push(101);
///
/// // f(X) unifies with both
/// let query = SimpleTerm::function(1, vec![SimpleTerm::variable(0)]);
/// let mut candidates = Vec::new();
/// assert_eq!(2, index.find_unifiable(&query, &mut candidates));
/// ```
pub struct FpIndex<P> {
    scheme: FingerprintScheme,
    root: FpTree<P>,
}

impl<P> FpIndex<P> {
    /// Creates an empty index sampling with `scheme`.
    #[must_use]
    pub fn new(scheme: FingerprintScheme) -> Self {
        Self {
            scheme,
            root: FpTree::new(),
        }
    }

    /// The scheme this index samples terms with.
    #[must_use]
    pub fn scheme(&self) -> &FingerprintScheme {
        &self.scheme
    }

    /// The root of the underlying fingerprint trie.
    #[must_use]
    pub fn tree(&self) -> &FpTree<P> {
        &self.root
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.child_count() == 0 && self.root.payload().is_none()
    }

    fn fingerprint<T: Term>(&self, term: &T) -> Fingerprint {
        let fingerprint = self.scheme.fingerprint(term);
        debug_assert_eq!(
            self.scheme.sample_count(),
            fingerprint.len(),
            "{} produced a fingerprint of unexpected length",
            self.scheme.name(),
        );
        fingerprint
    }

    /// Inserts `term`'s fingerprint class and returns the payload slot of
    /// its leaf.
    ///
    /// An existing payload is left untouched; the caller decides how to fold
    /// the new term in.
    pub fn insert<T: Term>(&mut self, term: &T) -> &mut Option<P> {
        let fingerprint = self.fingerprint(term);
        log::trace!("insert: fingerprint {fingerprint}");
        self.root.insert(&fingerprint).payload_mut()
    }

    /// The payload stored for `term`'s fingerprint class, if any.
    #[must_use]
    pub fn get<T: Term>(&self, term: &T) -> Option<&P> {
        self.root.find(&self.fingerprint(term)).and_then(FpTree::payload)
    }

    /// Mutable variant of [`FpIndex::get`].
    pub fn get_mut<T: Term>(&mut self, term: &T) -> Option<&mut P> {
        let fingerprint = self.fingerprint(term);
        self.root
            .find_mut(&fingerprint)
            .and_then(|node| node.payload_mut().as_mut())
    }

    /// Removes `term`'s path from the trie if its leaf carries no payload.
    ///
    /// Callers empty the payload (usually when the last entry for the class
    /// is retracted) and then call this to prune the path. Idempotent;
    /// removing an unknown term is a no-op.
    pub fn remove<T: Term>(&mut self, term: &T) {
        let fingerprint = self.fingerprint(term);
        log::trace!("remove: fingerprint {fingerprint}");
        self.root.remove(&fingerprint);
    }

    /// Appends the payloads of all fingerprint classes that are
    /// unification-compatible with `term` to `collect`.
    ///
    /// Returns the number of payloads appended. This is a sound
    /// over-approximation; the caller refines the candidates with real
    /// unification.
    pub fn find_unifiable<'t, T: Term>(&'t self, term: &T, collect: &mut Vec<&'t P>) -> usize {
        self.root.find_unifiable(&self.fingerprint(term), collect)
    }

    /// Appends the payloads of all fingerprint classes whose terms may be
    /// instances of `term` to `collect`.
    ///
    /// Returns the number of payloads appended. This is a sound
    /// over-approximation; the caller refines the candidates with real
    /// matching.
    pub fn find_matchable<'t, T: Term>(&'t self, term: &T, collect: &mut Vec<&'t P>) -> usize {
        self.root.find_matchable(&self.fingerprint(term), collect)
    }

    /// Walks all payload-carrying leaves in deterministic order, invoking
    /// `leaf_printer` with the leaf's root path and payload.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `leaf_printer`; remaining leaves
    /// are skipped.
    pub fn print<W, F>(&self, out: &mut W, mut leaf_printer: F) -> std::io::Result<()>
    where
        W: Write,
        F: FnMut(&mut W, &[SymbolCode], &P) -> std::io::Result<()>,
    {
        let mut result = Ok(());

        self.root.for_each_leaf(|path, payload| {
            if result.is_ok() {
                result = leaf_printer(out, path, payload);
            }
        });

        result
    }
}

impl<P: Payload> FpIndex<P> {
    /// Collects the payload-size distribution across all leaves.
    #[must_use]
    pub fn distribution(&self) -> Distribution {
        let mut sizes = Vec::new();
        self.root.for_each_leaf(|_, payload| sizes.push(payload.len()));

        let (mean, stddev) = mean_stddev(&sizes);

        Distribution {
            leaves: sizes.len(),
            mean,
            stddev,
        }
    }

    /// Prints one line per payload-carrying leaf, followed by a summary.
    ///
    /// Leaf lines have the form `# <path>:<n> terms` with the path printed
    /// as dot-separated symbol codes and markers; the summary line is
    /// `# <E> entries, <L> leaves, <avg> entries/leaf`.
    ///
    /// # Errors
    ///
    /// Returns any error reported by `out`.
    pub fn distribution_print<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut entries = 0_usize;
        let mut leaves = 0_usize;

        self.print(out, |out, path, payload| {
            entries += payload.len();
            leaves += 1;

            write!(out, "# ")?;
            for (idx, sample) in path.iter().enumerate() {
                if idx > 0 {
                    write!(out, ".")?;
                }
                write!(out, "{sample}")?;
            }
            writeln!(out, ":{} terms", payload.len())
        })?;

        let average = if leaves == 0 {
            0.0
        } else {
            entries as f64 / leaves as f64
        };
        writeln!(out, "# {entries} entries, {leaves} leaves, {average:.6} entries/leaf")
    }
}

#[cfg(test)]
mod tests {
    use super::{Distribution, FpIndex};
    use crate::scheme::FingerprintScheme;
    use crate::term::SimpleTerm;
    use test_log::test;

    const F: i64 = 1;
    const G: i64 = 2;
    const A: i64 = 3;
    const B: i64 = 4;

    fn f_a() -> SimpleTerm {
        SimpleTerm::function(F, vec![SimpleTerm::constant(A)])
    }

    fn f_b() -> SimpleTerm {
        SimpleTerm::function(F, vec![SimpleTerm::constant(B)])
    }

    fn f_var() -> SimpleTerm {
        SimpleTerm::function(F, vec![SimpleTerm::variable(0)])
    }

    fn insert_term(index: &mut FpIndex<Vec<u64>>, term: &SimpleTerm, id: u64) {
        index.insert(term).get_or_insert_with(Vec::new).push(id);
    }

    #[test]
    fn insert_then_get() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &f_a(), 1);

        assert_eq!(Some(&vec![1]), index.get(&f_a()));
        assert_eq!(None, index.get(&f_b()));
        assert!(!index.is_empty());
    }

    #[test]
    fn equal_fingerprints_share_a_bucket() {
        // under FP1 only the head symbol is sampled, so f(a) and f(b)
        // collide
        let mut index = FpIndex::new(FingerprintScheme::Fp1);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &f_b(), 2);

        assert_eq!(Some(&vec![1, 2]), index.get(&f_a()));
        assert_eq!(Some(&vec![1, 2]), index.get(&f_b()));
    }

    #[test]
    fn unifiable_retrieval_covers_all_candidates() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &f_b(), 2);

        let mut candidates = Vec::new();
        assert_eq!(2, index.find_unifiable(&f_var(), &mut candidates));

        let mut ids: Vec<u64> = candidates.into_iter().flatten().copied().collect();
        ids.sort_unstable();
        assert_eq!(vec![1, 2], ids);
    }

    #[test]
    fn matchable_retrieval_respects_pattern_asymmetry() {
        // g(a, a) is an instance of g(X, Y)
        let g_a_a = SimpleTerm::function(
            G,
            vec![SimpleTerm::constant(A), SimpleTerm::constant(A)],
        );
        let g_x_y = SimpleTerm::function(
            G,
            vec![SimpleTerm::variable(0), SimpleTerm::variable(1)],
        );

        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &g_a_a, 1);

        let mut candidates = Vec::new();
        assert_eq!(1, index.find_matchable(&g_x_y, &mut candidates));

        // the reverse direction must not use the stored term as a pattern
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &g_x_y, 2);

        let mut candidates = Vec::new();
        assert_eq!(0, index.find_matchable(&g_a_a, &mut candidates));
    }

    #[test]
    fn constants_do_not_unify_with_differently_headed_queries() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &SimpleTerm::constant(A), 1);

        let mut candidates = Vec::new();
        assert_eq!(0, index.find_unifiable(&f_var(), &mut candidates));
    }

    #[test]
    fn variables_unify_with_everything_stored() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &SimpleTerm::constant(B), 2);
        insert_term(&mut index, &SimpleTerm::variable(3), 3);

        let mut candidates = Vec::new();
        assert_eq!(3, index.find_unifiable(&SimpleTerm::variable(0), &mut candidates));
    }

    #[test]
    fn remove_prunes_after_payload_is_emptied() {
        let mut index: FpIndex<Vec<u64>> = FpIndex::new(FingerprintScheme::Fp3D);
        let before = index.tree().node_count();

        insert_term(&mut index, &f_a(), 1);
        assert!(index.tree().node_count() > before);

        // still referenced: remove must keep the path
        index.remove(&f_a());
        assert_eq!(Some(&vec![1]), index.get(&f_a()));

        *index.insert(&f_a()) = None;
        index.remove(&f_a());
        assert_eq!(before, index.tree().node_count());
        assert!(index.is_empty());

        // idempotent
        index.remove(&f_a());
        assert_eq!(before, index.tree().node_count());
    }

    #[test]
    fn get_mut_mutates_in_place() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &f_a(), 1);

        index.get_mut(&f_a()).expect("payload exists").push(2);
        assert_eq!(Some(&vec![1, 2]), index.get(&f_a()));
    }

    #[test]
    fn fp0_collects_everything_in_the_root() {
        let mut index = FpIndex::new(FingerprintScheme::Fp0);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &SimpleTerm::variable(0), 2);

        assert_eq!(1, index.tree().node_count());

        let mut candidates = Vec::new();
        assert_eq!(1, index.find_unifiable(&f_b(), &mut candidates));
        assert_eq!(Some(&vec![1, 2]), candidates.first().copied());
    }

    #[test]
    fn distribution_over_known_payloads() {
        let mut index = FpIndex::new(FingerprintScheme::Fp1);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &f_b(), 2);
        insert_term(&mut index, &SimpleTerm::constant(A), 3);

        let Distribution {
            leaves,
            mean,
            stddev,
        } = index.distribution();

        assert_eq!(2, leaves);
        assert!((mean - 1.5).abs() < f64::EPSILON);
        assert!((stddev - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn distribution_of_empty_index() {
        let index: FpIndex<Vec<u64>> = FpIndex::new(FingerprintScheme::Fp7);
        let distribution = index.distribution();

        assert_eq!(0, distribution.leaves);
        assert_eq!(0.0, distribution.mean);
        assert_eq!(0.0, distribution.stddev);
    }

    #[test]
    fn distribution_display_format() {
        let distribution = Distribution {
            leaves: 2,
            mean: 1.5,
            stddev: 0.5,
        };
        assert_eq!(
            "    2 leaves,   1.50+/-0.500 terms/leaf",
            distribution.to_string()
        );
    }

    #[test]
    fn distribution_print_format() {
        let mut index = FpIndex::new(FingerprintScheme::Fp3D);
        insert_term(&mut index, &f_a(), 1);
        insert_term(&mut index, &SimpleTerm::variable(0), 2);

        let mut out = Vec::new();
        index.distribution_print(&mut out).expect("write to vec");

        let printed = String::from_utf8(out).expect("utf-8");
        assert_eq!(
            "# 1.3.-3:1 terms\n# -1.-2.-2:1 terms\n# 2 entries, 2 leaves, 1.000000 entries/leaf\n",
            printed
        );
    }

    #[test]
    fn distribution_print_of_empty_index() {
        let index: FpIndex<Vec<u64>> = FpIndex::new(FingerprintScheme::Fp3D);

        let mut out = Vec::new();
        index.distribution_print(&mut out).expect("write to vec");

        let printed = String::from_utf8(out).expect("utf-8");
        assert_eq!("# 0 entries, 0 leaves, 0.000000 entries/leaf\n", printed);
    }

    #[test]
    fn custom_leaf_printer() {
        let mut index = FpIndex::new(FingerprintScheme::Fp1);
        insert_term(&mut index, &f_a(), 1);

        let mut out = Vec::new();
        index
            .print(&mut out, |out, path, payload: &Vec<u64>| {
                use std::io::Write;
                writeln!(out, "{path:?} -> {payload:?}")
            })
            .expect("write to vec");

        assert_eq!("[1] -> [1]\n", String::from_utf8(out).expect("utf-8"));
    }
}
