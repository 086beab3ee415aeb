//! Turn sketch similarity into an evolutionary distance estimate.
//!
//! The Mash distance models k-mer survival under a Poisson substitution
//! process: if a fraction `j` of k-mers is shared (the Jaccard estimate from
//! the sketches), the per-site mutation rate is `-ln(2j / (1 + j)) / k`.
//! See Ondov et al., "Mash: fast genome and metagenome distance estimation
//! using MinHash", Genome Biology (2016).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::sketch::minhash::KmerSketch;
use crate::{Error, Result};

/// The metrics available for comparing two sketches.
///
/// All validation lives in [`KmerSketch::jaccard`] and [`mash_distance`];
/// dispatch only routes, so no variant can bypass the compatibility checks.
/// New metrics are added here as new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Raw Jaccard similarity estimate in [0, 1].
    Jaccard,
    /// Mash distance: Jaccard transformed into a per-site mutation rate.
    Mash,
}

impl DistanceMetric {
    pub fn compute(&self, a: &KmerSketch, b: &KmerSketch) -> Result<f64> {
        match self {
            DistanceMetric::Jaccard => a.jaccard(b),
            DistanceMetric::Mash => {
                let jaccard = a.jaccard(b)?;
                debug!("jaccard estimate {} for k={}", jaccard, a.ksize());
                mash_distance(jaccard, a.ksize())
            }
        }
    }
}

/// Jaccard similarity estimate between two compatible sketches.
pub fn similarity(a: &KmerSketch, b: &KmerSketch) -> Result<f64> {
    DistanceMetric::Jaccard.compute(a, b)
}

/// Mash distance between two compatible sketches.
pub fn distance(a: &KmerSketch, b: &KmerSketch) -> Result<f64> {
    DistanceMetric::Mash.compute(a, b)
}

/// Transform a Jaccard similarity into a Mash distance for k-mer length
/// `ksize`.
///
/// `jaccard` outside [0, 1] (including NaN) is rejected with
/// [`Error::InvalidSimilarity`]. A similarity of exactly zero means no
/// shared k-mers were observed, and the distance is not estimable from
/// sketches of this size: that returns [`Error::UndefinedDistance`] rather
/// than an infinite sentinel. A similarity of 1.0 gives exactly 0.0 through
/// the formula.
pub fn mash_distance(jaccard: f64, ksize: u32) -> Result<f64> {
    if !(0.0..=1.0).contains(&jaccard) {
        return Err(Error::InvalidSimilarity { value: jaccard });
    }
    if jaccard == 0.0 {
        return Err(Error::UndefinedDistance);
    }

    Ok(-(2.0 * jaccard / (1.0 + jaccard)).ln() / ksize as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mash_distance_identical() {
        let res = mash_distance(1.0, 21).unwrap();
        assert_eq!(res, 0.0);
    }

    #[test]
    fn test_mash_distance_zero_jaccard() {
        match mash_distance(0.0, 21) {
            Err(Error::UndefinedDistance) => (),
            other => panic!("expected UndefinedDistance, got {:?}", other),
        }
    }

    #[test]
    fn test_mash_distance_out_of_range() {
        for bad in [-0.1, 1.5, f64::NAN] {
            match mash_distance(bad, 21) {
                Err(Error::InvalidSimilarity { .. }) => (),
                other => panic!("expected InvalidSimilarity, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_mash_distance_value() {
        // j=0.6, k=21: -(1/21) * ln(1.2/1.6)
        let res = mash_distance(0.6, 21).unwrap();
        let expected = -(0.75f64).ln() / 21.0;
        assert!((res - expected).abs() < f64::EPSILON);
        assert!((res - 0.01370).abs() < 1e-5);
    }

    #[test]
    fn test_mash_distance_positive() {
        for j in [0.01, 0.1, 0.5, 0.9, 0.999] {
            let d = mash_distance(j, 31).unwrap();
            assert!(d > 0.0, "distance for j={} should be positive", j);
        }
    }

    #[test]
    fn test_mash_distance_monotonic_in_jaccard() {
        let mut last = f64::INFINITY;
        for j in [0.1, 0.2, 0.4, 0.6, 0.8, 1.0] {
            let d = mash_distance(j, 21).unwrap();
            assert!(d < last, "distance must decrease as jaccard grows");
            last = d;
        }
    }
}
