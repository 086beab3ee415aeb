pub mod minhash;

pub use minhash::KmerSketch;
