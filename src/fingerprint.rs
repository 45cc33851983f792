// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::term::Term;

/// Identifier of a function or predicate symbol.
///
/// Legitimate symbol codes are strictly positive. The negative range is
/// reserved for the sampling markers [`ANY_VAR`], [`BELOW_VAR`] and
/// [`NOT_IN_TERM`].
pub type SymbolCode = i64;

/// The sampled position exists in the term and holds a variable.
pub const ANY_VAR: SymbolCode = -1;

/// The sampled position lies strictly below a variable.
///
/// An instance of the term may or may not have a symbol there.
pub const BELOW_VAR: SymbolCode = -2;

/// The sampled position does not exist in the term
/// (some argument index on the way is out of arity).
pub const NOT_IN_TERM: SymbolCode = -3;

/// Samples `term` at `position`.
///
/// Walks down the term one argument index at a time and returns the head
/// symbol code found at the end of the walk, or the marker that describes
/// why the walk ended early:
///
/// * a variable on the way cuts the walk short with [`BELOW_VAR`],
/// * an argument index at or beyond the current arity yields [`NOT_IN_TERM`],
/// * a variable at the end of the walk yields [`ANY_VAR`].
///
/// Sampling is pure and total over all (term, position) pairs.
///
/// # Examples
///
/// ```
/// use fp_index::{sample_at, SimpleTerm, ANY_VAR, BELOW_VAR, NOT_IN_TERM};
///
/// // f(g(a), X)
/// let term = SimpleTerm::function(
///     1,
///     vec![
///         SimpleTerm::function(2, vec![SimpleTerm::constant(3)]),
///         SimpleTerm::variable(0),
///     ],
/// );
///
/// assert_eq!(1, sample_at(&term, &[]));
/// assert_eq!(3, sample_at(&term, &[0, 0]));
/// assert_eq!(ANY_VAR, sample_at(&term, &[1]));
/// assert_eq!(BELOW_VAR, sample_at(&term, &[1, 0]));
/// assert_eq!(NOT_IN_TERM, sample_at(&term, &[2]));
/// ```
pub fn sample_at<T: Term>(term: &T, position: &[usize]) -> SymbolCode {
    let mut current = term;

    for &index in position {
        if current.is_variable() {
            return BELOW_VAR;
        }
        match current.argument(index) {
            Some(argument) => current = argument,
            None => return NOT_IN_TERM,
        }
    }

    if current.is_variable() {
        ANY_VAR
    } else {
        current.symbol()
    }
}

/// A term fingerprint: the samples of a term at the ordered positions of
/// some [`FingerprintScheme`](crate::FingerprintScheme).
///
/// Sample order is significant and fixed by the scheme, and two fingerprints
/// produced by the same scheme always have the same length. Terms with equal
/// fingerprints land in the same bucket of a
/// [`FpIndex`](crate::FpIndex).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<SymbolCode>);

impl Fingerprint {
    /// Creates a fingerprint from raw samples.
    ///
    /// Mostly useful for driving the trie directly; term-keyed code should
    /// let a scheme compute fingerprints instead.
    #[must_use]
    pub fn new(samples: Vec<SymbolCode>) -> Self {
        Self(samples)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the fingerprint has no samples (the `FP0` scheme).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The samples, in scheme order.
    #[must_use]
    pub fn samples(&self) -> &[SymbolCode] {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<")?;
        for (idx, sample) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ",")?;
            }
            write!(f, "{sample}")?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::{sample_at, Fingerprint, ANY_VAR, BELOW_VAR, NOT_IN_TERM};
    use crate::term::SimpleTerm;
    use test_log::test;

    const F: i64 = 1;
    const G: i64 = 2;
    const A: i64 = 3;

    // g(f(a), X)
    fn example_term() -> SimpleTerm {
        SimpleTerm::function(
            G,
            vec![
                SimpleTerm::function(F, vec![SimpleTerm::constant(A)]),
                SimpleTerm::variable(0),
            ],
        )
    }

    #[test]
    fn sample_empty_position_is_head() {
        assert_eq!(G, sample_at(&example_term(), &[]));
    }

    #[test]
    fn sample_descends_arguments() {
        assert_eq!(F, sample_at(&example_term(), &[0]));
        assert_eq!(A, sample_at(&example_term(), &[0, 0]));
    }

    #[test]
    fn sample_variable_is_any_var() {
        assert_eq!(ANY_VAR, sample_at(&example_term(), &[1]));
        assert_eq!(ANY_VAR, sample_at(&SimpleTerm::variable(7), &[]));
    }

    #[test]
    fn sample_under_variable_is_below_var() {
        assert_eq!(BELOW_VAR, sample_at(&example_term(), &[1, 0]));
        assert_eq!(BELOW_VAR, sample_at(&SimpleTerm::variable(7), &[0, 0, 0]));
    }

    #[test]
    fn sample_out_of_arity_is_not_in_term() {
        assert_eq!(NOT_IN_TERM, sample_at(&example_term(), &[2]));
        assert_eq!(NOT_IN_TERM, sample_at(&example_term(), &[0, 0, 0]));
    }

    #[test]
    fn markers_are_distinct_and_never_symbol_codes() {
        let markers = [ANY_VAR, BELOW_VAR, NOT_IN_TERM];
        for (idx, a) in markers.iter().enumerate() {
            assert!(*a < 0);
            for b in markers.iter().skip(idx + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_format() {
        assert_eq!("<>", Fingerprint::new(Vec::new()).to_string());
        assert_eq!(
            "<2,3,-3>",
            Fingerprint::new(vec![G, A, NOT_IN_TERM]).to_string()
        );
    }
}
