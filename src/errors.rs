use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchDistError {
    #[error("different ksizes cannot be compared: {k1} != {k2}")]
    MismatchKSizes { k1: u32, k2: u32 },

    #[error("must have same number of hashes: {s1} != {s2}")]
    MismatchSketchSize { s1: usize, s2: usize },

    #[error("mismatch in seed; comparison fail")]
    MismatchSeed,

    #[error("no shared hashes between sketches; distance is not estimable")]
    UndefinedDistance,

    #[error("similarity must be within [0, 1], got {value}")]
    InvalidSimilarity { value: f64 },

    #[error("sequences must have equal lengths: {l1} != {l2}")]
    MismatchSeqLengths { l1: usize, l2: usize },

    #[error("invalid DNA character in input k-mer: {message}")]
    InvalidDNA { message: String },

    #[error(transparent)]
    SerdeError(#[from] serde_json::error::Error),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}
