//! Diversity statistics over full sequence sets.
//!
//! Unlike the sketch comparisons in [`crate::distance`], these operate on
//! complete, equal-length sequences: the pairwise mutation-count matrix and
//! the aggregates derived from it (mean pairwise differences and nucleotide
//! diversity, π per Nei & Li 1979).

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{Error, Result};

/// Count substitutions between two equal-length sequences.
pub fn count_mutations(a: &[u8], b: &[u8]) -> Result<u64> {
    if a.len() != b.len() {
        return Err(Error::MismatchSeqLengths {
            l1: a.len(),
            l2: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count() as u64)
}

/// Full symmetric matrix of pairwise mutation counts.
pub fn pairwise_mutations<S>(seqs: &[S]) -> Result<Vec<Vec<u64>>>
where
    S: AsRef<[u8]> + Sync,
{
    let n = seqs.len();

    #[cfg(feature = "parallel")]
    let rows = (0..n).into_par_iter();
    #[cfg(not(feature = "parallel"))]
    let rows = 0..n;

    rows.map(|i| {
        (0..n)
            .map(|j| {
                if i == j {
                    Ok(0)
                } else {
                    count_mutations(seqs[i].as_ref(), seqs[j].as_ref())
                }
            })
            .collect()
    })
    .collect()
}

/// Average mutation count over all unordered sequence pairs.
pub fn mean_pairwise_mutations<S>(seqs: &[S]) -> Result<f64>
where
    S: AsRef<[u8]> + Sync,
{
    let n = seqs.len();
    if n < 2 {
        return Ok(0.0);
    }

    let matrix = pairwise_mutations(seqs)?;
    let total: u64 = matrix
        .iter()
        .enumerate()
        .map(|(i, row)| row[i + 1..].iter().sum::<u64>())
        .sum();

    Ok(total as f64 / (n * (n - 1) / 2) as f64)
}

/// Nucleotide diversity: mean pairwise differences per site.
pub fn nucleotide_diversity<S>(seqs: &[S]) -> Result<f64>
where
    S: AsRef<[u8]> + Sync,
{
    if seqs.len() < 2 {
        return Ok(0.0);
    }

    let length = seqs[0].as_ref().len();
    if length == 0 {
        return Ok(0.0);
    }

    Ok(mean_pairwise_mutations(seqs)? / length as f64)
}
