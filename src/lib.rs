//! # Compare genomic sequences with MinHash k-mer sketches.
//!
//! sketchdist builds compact [MinHash sketches][0] from DNA sequences and
//! compares them to estimate how far two genomes have diverged. A sketch
//! retains the smallest `num` hash values over all k-mers of a sequence;
//! two sketches of equal size and k-mer length can then be intersected to
//! estimate the Jaccard similarity of the underlying k-mer sets, and that
//! similarity can be transformed into a per-site mutation rate under the
//! Mash Poisson model.
//!
//! [0]: https://en.wikipedia.org/wiki/MinHash
//!
//! The comparison entry points live in [`distance`]: pick a
//! [`distance::DistanceMetric`] or call [`distance::similarity`] /
//! [`distance::distance`] directly. Sketch construction lives in
//! [`sketch::minhash`], and sequence-level diversity statistics (which work
//! on full sequences rather than sketches) in [`diversity`].

pub mod errors;
pub use errors::SketchDistError as Error;

pub mod distance;
pub mod diversity;
pub mod encodings;
pub mod sketch;

use murmurhash3::murmurhash3_x64_128;

pub type Result<T> = std::result::Result<T, Error>;

type HashIntoType = u64;

pub fn _hash_murmur(kmer: &[u8], seed: u64) -> u64 {
    murmurhash3_x64_128(kmer, seed).0
}
