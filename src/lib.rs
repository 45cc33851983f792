// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A K.I.S.S. implementation of fingerprint indexing for first-order terms.
//!
//! ##### NOTE
//!
//! > This crate only provides the candidate index, not a prover. Retrieval
//! > is a sound over-approximation: every stored term that truly unifies
//! > with (or matches) the query is returned, along with possibly some that
//! > do not. Refining candidates with real unification or matching is the
//! > caller's job.
//!
//! ##### About
//!
//! Inference rules like rewriting, paramodulation and subsumption all need
//! to enumerate, out of a huge pool of stored terms, the few that could
//! interact with a query term. A linear scan is prohibitive; a fingerprint
//! index makes the enumeration cheap.
//!
//! A [`FingerprintScheme`] compresses a term into a short [`Fingerprint`]:
//! the symbols found at a fixed list of sample positions, with markers for
//! positions holding a variable ([`ANY_VAR`]), lying below a variable
//! ([`BELOW_VAR`]), or absent from the term ([`NOT_IN_TERM`]). Fingerprints
//! key a trie ([`FpTree`]) whose leaves carry caller-managed payloads, and
//! compatibility traversals enumerate all leaves that could hold unification
//! or matching partners, pruning whole subtries per sample position.
//!
//! Terms enter through the [`FpIndex`] facade, which works with any type
//! implementing [`Term`] ([`SimpleTerm`] is a ready-made one).
//!
//! # Example usage
//!
//! ```
//! use fp_index::{FingerprintScheme, FpIndex, SimpleTerm};
//!
//! // Schemes are typically chosen by configuration name;
//! // unknown names and "NoIndex" yield None.
//! let scheme = FingerprintScheme::from_name("FP3D").expect("known scheme");
//! let mut index: FpIndex<Vec<u64>> = FpIndex::new(scheme);
//!
//! let f = 1;
//! let a = 2;
//! let b = 3;
//!
//! // Index f(a) and f(b) under the ids 10 and 11
//! let f_a = SimpleTerm::function(f, vec![SimpleTerm::constant(a)]);
//! let f_b = SimpleTerm::function(f, vec![SimpleTerm::constant(b)]);
//! index.insert(&f_a).get_or_insert_with(Vec::new).push(10);
//! index.insert(&f_b).get_or_insert_with(Vec::new).push(11);
//!
//! // Both are candidates for unification with f(X)
//! let query = SimpleTerm::function(f, vec![SimpleTerm::variable(0)]);
//! let mut candidates = Vec::new();
//! assert_eq!(2, index.find_unifiable(&query, &mut candidates));
//!
//! // A constant with a different head is not
//! index.insert(&SimpleTerm::constant(b));
//! let mut candidates = Vec::new();
//! assert_eq!(0, index.find_unifiable(&SimpleTerm::constant(a), &mut candidates));
//! ```

#![doc(html_logo_url = "https://raw.githubusercontent.com/fjall-rs/fp-index/main/logo.png")]
#![doc(html_favicon_url = "https://raw.githubusercontent.com/fjall-rs/fp-index/main/logo.png")]
#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::option_if_let_else)]

mod fingerprint;
mod index;
mod retrieval;
mod scheme;
mod signature;
mod stats;
mod term;
mod tree;

pub use {
    fingerprint::{sample_at, Fingerprint, SymbolCode, ANY_VAR, BELOW_VAR, NOT_IN_TERM},
    index::{Distribution, FpIndex, Payload},
    scheme::{FingerprintScheme, FlexPositions},
    signature::Signature,
    term::{SimpleTerm, Term},
    tree::FpTree,
};
