// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::fingerprint::{sample_at, Fingerprint};
use crate::term::Term;

// Preset position tables. Positions are 0-based argument index sequences,
// the empty position samples the term's head.
const FP0_POSITIONS: &[&[usize]] = &[];
const FP1_POSITIONS: &[&[usize]] = &[&[]];
const FP2_POSITIONS: &[&[usize]] = &[&[], &[0]];
const FP3D_POSITIONS: &[&[usize]] = &[&[], &[0], &[0, 0]];
const FP3W_POSITIONS: &[&[usize]] = &[&[], &[0], &[1]];
const FP4D_POSITIONS: &[&[usize]] = &[&[], &[0], &[0, 0], &[0, 0, 0]];
const FP4W_POSITIONS: &[&[usize]] = &[&[], &[0], &[1], &[2]];
const FP4M_POSITIONS: &[&[usize]] = &[&[], &[0], &[1], &[0, 0]];
const FP7_POSITIONS: &[&[usize]] = &[&[], &[0], &[1], &[0, 0], &[0, 1], &[1, 0], &[1, 1]];

#[rustfmt::skip]
const FP4X2_2_POSITIONS: &[&[usize]] = &[
    &[], &[0], &[1], &[2], &[3],
    &[0, 0], &[0, 1], &[0, 2],
    &[1, 0], &[1, 1], &[1, 2],
    &[2, 0], &[2, 1], &[2, 2],
    &[0, 0, 0], &[1, 0, 0],
];

/// Ordered sample positions for [`FingerprintScheme::Flex`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlexPositions(Vec<Vec<usize>>);

impl FlexPositions {
    /// Creates a position list from owned positions.
    #[must_use]
    pub fn new(positions: Vec<Vec<usize>>) -> Self {
        Self(positions)
    }

    /// Number of positions (= samples per fingerprint).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no position is sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A fingerprint function: an ordered list of positions to sample a term at.
///
/// Deeper and wider schemes discriminate better but cost more per operation;
/// which one pays off depends on the term distribution. `FP7` tends to be a
/// good default for general first-order problems.
///
/// Schemes are usually picked by configuration name through
/// [`FingerprintScheme::from_name`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FingerprintScheme {
    /// No samples at all; every term lands in the same bucket.
    Fp0,

    /// Samples the head only, abstracted to 1 for predicate heads and 2 for
    /// function heads. Only separates the two symbol kinds.
    FpFp,

    /// Samples the head symbol.
    Fp1,

    /// Samples at `ε, 0`.
    Fp2,

    /// Samples at `ε, 0, 0.0` (deep).
    Fp3D,

    /// Samples at `ε, 0, 1` (wide).
    Fp3W,

    /// Samples at `ε, 0, 0.0, 0.0.0` (deep).
    Fp4D,

    /// Samples at `ε, 0, 1, 2` (wide).
    Fp4W,

    /// Samples at `ε, 0, 1, 0.0` (mixed).
    Fp4M,

    /// Samples at `ε, 0, 1, 0.0, 0.1, 1.0, 1.1`.
    Fp7,

    /// Sixteen samples up to depth 3 over the first four argument positions.
    Fp4X22,

    /// Samples a caller-supplied position list.
    Flex(FlexPositions),
}

impl FingerprintScheme {
    /// All accepted scheme names, including `NoIndex`.
    ///
    /// Useful for enumerating valid spellings in configuration surfaces.
    pub const NAMES: &'static [&'static str] = &[
        "FP0", "FPfp", "FP1", "FP2", "FP3D", "FP3W", "FP4D", "FP4W", "FP4M", "FP7", "FP4X2_2",
        "FP3DFlex", "NoIndex",
    ];

    /// Resolves a scheme by its configuration name.
    ///
    /// `"NoIndex"` and unknown names resolve to `None`, which callers should
    /// treat as "do not build an index".
    ///
    /// # Examples
    ///
    /// ```
    /// use fp_index::FingerprintScheme;
    ///
    /// assert_eq!(Some(FingerprintScheme::Fp7), FingerprintScheme::from_name("FP7"));
    /// assert_eq!(None, FingerprintScheme::from_name("NoIndex"));
    /// assert_eq!(None, FingerprintScheme::from_name("FP9000"));
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "FP0" => Some(Self::Fp0),
            "FPfp" => Some(Self::FpFp),
            "FP1" => Some(Self::Fp1),
            "FP2" => Some(Self::Fp2),
            "FP3D" => Some(Self::Fp3D),
            "FP3W" => Some(Self::Fp3W),
            "FP4D" => Some(Self::Fp4D),
            "FP4W" => Some(Self::Fp4W),
            "FP4M" => Some(Self::Fp4M),
            "FP7" => Some(Self::Fp7),
            "FP4X2_2" => Some(Self::Fp4X22),
            "FP3DFlex" => Some(Self::Flex(FlexPositions::new(vec![
                vec![],
                vec![0],
                vec![0, 0],
            ]))),
            _ => None,
        }
    }

    /// The scheme's configuration name.
    ///
    /// Flexible schemes all report `"FPFlex"`; there is no reverse mapping
    /// onto the preset names they may happen to coincide with.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fp0 => "FP0",
            Self::FpFp => "FPfp",
            Self::Fp1 => "FP1",
            Self::Fp2 => "FP2",
            Self::Fp3D => "FP3D",
            Self::Fp3W => "FP3W",
            Self::Fp4D => "FP4D",
            Self::Fp4W => "FP4W",
            Self::Fp4M => "FP4M",
            Self::Fp7 => "FP7",
            Self::Fp4X22 => "FP4X2_2",
            Self::Flex(_) => "FPFlex",
        }
    }

    /// The ordered positions this scheme samples.
    #[must_use]
    pub fn positions(&self) -> Vec<&[usize]> {
        match self {
            Self::Flex(positions) => positions.0.iter().map(Vec::as_slice).collect(),
            preset => preset.preset_positions().to_vec(),
        }
    }

    /// Number of samples in every fingerprint this scheme produces.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        match self {
            Self::Flex(positions) => positions.len(),
            preset => preset.preset_positions().len(),
        }
    }

    /// Computes the fingerprint of `term`.
    #[must_use]
    pub fn fingerprint<T: Term>(&self, term: &T) -> Fingerprint {
        match self {
            Self::FpFp => {
                let sample = sample_at(term, &[]);
                let sample = if sample > 0 {
                    if term.is_predicate() {
                        1
                    } else {
                        2
                    }
                } else {
                    sample
                };
                Fingerprint::new(vec![sample])
            }
            Self::Flex(positions) => Fingerprint::new(
                positions
                    .0
                    .iter()
                    .map(|position| sample_at(term, position))
                    .collect(),
            ),
            preset => Fingerprint::new(
                preset
                    .preset_positions()
                    .iter()
                    .map(|position| sample_at(term, position))
                    .collect(),
            ),
        }
    }

    // Callers route `Flex` before consulting the preset tables.
    fn preset_positions(&self) -> &'static [&'static [usize]] {
        match self {
            Self::Fp0 => FP0_POSITIONS,
            Self::FpFp | Self::Fp1 => FP1_POSITIONS,
            Self::Fp2 => FP2_POSITIONS,
            Self::Fp3D => FP3D_POSITIONS,
            Self::Fp3W => FP3W_POSITIONS,
            Self::Fp4D => FP4D_POSITIONS,
            Self::Fp4W => FP4W_POSITIONS,
            Self::Fp4M => FP4M_POSITIONS,
            Self::Fp7 => FP7_POSITIONS,
            Self::Fp4X22 => FP4X2_2_POSITIONS,
            Self::Flex(_) => &[],
        }
    }
}
