//! Bottom-`num` MinHash sketches of k-mer content.
//!
//! A [`KmerSketch`] keeps the `num` smallest murmur64 hash values over all
//! canonical k-mers of the sequences added to it. Keeping `mins` sorted
//! ascending is load-bearing: the comparison scan in [`KmerSketch::jaccard`]
//! assumes it and produces garbage (not an error) on unordered input, so
//! every construction path here maintains the ordering.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io;

use log::trace;
use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::encodings::{revcomp, VALID};
use crate::HashIntoType;
use crate::_hash_murmur;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct KmerSketch {
    num: u32,
    ksize: u32,

    #[builder(default = 42u64)]
    seed: u64,

    /// Must be ascending and free of duplicates if supplied via the builder.
    #[builder(default)]
    mins: Vec<HashIntoType>,
}

impl Default for KmerSketch {
    fn default() -> KmerSketch {
        KmerSketch {
            num: 1000,
            ksize: 21,
            seed: 42,
            mins: Vec::with_capacity(1000),
        }
    }
}

impl Serialize for KmerSketch {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut partial = serializer.serialize_struct("KmerSketch", 5)?;
        partial.serialize_field("num", &self.num)?;
        partial.serialize_field("ksize", &self.ksize)?;
        partial.serialize_field("seed", &self.seed)?;
        partial.serialize_field("mins", &self.mins)?;
        partial.serialize_field("md5sum", &self.md5sum())?;
        partial.end()
    }
}

impl<'de> Deserialize<'de> for KmerSketch {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TempSketch {
            num: u32,
            ksize: u32,
            seed: u64,
            mins: Vec<u64>,
        }

        let tmp = TempSketch::deserialize(deserializer)?;

        // The comparison scan requires ascending, duplicate-free mins;
        // re-sort on load rather than trusting the input.
        let mut mins = tmp.mins;
        mins.sort_unstable();
        mins.dedup();

        Ok(KmerSketch {
            num: tmp.num,
            ksize: tmp.ksize,
            seed: tmp.seed,
            mins,
        })
    }
}

impl KmerSketch {
    pub fn new(num: u32, ksize: u32, seed: u64) -> KmerSketch {
        KmerSketch {
            num,
            ksize,
            seed,
            mins: Vec::with_capacity(num as usize),
        }
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn ksize(&self) -> u32 {
        self.ksize
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> usize {
        self.mins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mins.is_empty()
    }

    pub fn clear(&mut self) {
        self.mins.clear();
    }

    pub fn mins(&self) -> Vec<u64> {
        self.mins.clone()
    }

    pub fn iter_mins(&self) -> impl Iterator<Item = &u64> {
        self.mins.iter()
    }

    pub fn md5sum(&self) -> String {
        let mut buffer = String::with_capacity(20);

        let mut md5_ctx = md5::Context::new();
        write!(&mut buffer, "{}", self.ksize).unwrap();
        md5_ctx.consume(&buffer);
        buffer.clear();
        for x in &self.mins {
            write!(&mut buffer, "{}", x).unwrap();
            md5_ctx.consume(&buffer);
            buffer.clear();
        }
        format!("{:x}", md5_ctx.compute())
    }

    pub fn add_hash(&mut self, hash: HashIntoType) {
        if self.num == 0 {
            // why did you create this sketch? it will always be empty...
            return;
        }

        let current_max = match self.mins.last() {
            Some(&x) => x,
            None => u64::MAX,
        };

        if hash < current_max || (self.mins.len() as u32) < self.num {
            // "good" hash - smaller than the current largest entry, or
            // still have space available
            let pos = match self.mins.binary_search(&hash) {
                Ok(p) => p,
                Err(p) => p,
            };

            if pos == self.mins.len() {
                // at end - must still be growing, we know the list won't
                // get too long
                self.mins.push(hash);
            } else if self.mins[pos] != hash {
                // didn't find hash in mins, so inserting somewhere
                // in the middle; shrink list if needed.
                self.mins.insert(pos, hash);
                if self.mins.len() > (self.num as usize) {
                    self.mins.pop();
                }
            }
        }
    }

    pub fn add_many(&mut self, hashes: &[u64]) -> Result<()> {
        for min in hashes {
            self.add_hash(*min);
        }
        Ok(())
    }

    pub fn add_word(&mut self, word: &[u8]) {
        let hash = _hash_murmur(word, self.seed);
        self.add_hash(hash);
    }

    /// Add every k-mer of `seq`, hashing the lexicographically smaller of
    /// the k-mer and its reverse complement. With `force`, k-mers containing
    /// a non-ACGT character are skipped instead of erroring out.
    pub fn add_sequence(&mut self, seq: &[u8], force: bool) -> Result<()> {
        let ksize = self.ksize as usize;
        if seq.len() < ksize {
            return Ok(());
        }

        let sequence = seq.to_ascii_uppercase();
        let rc = revcomp(&sequence);
        let len = sequence.len();

        for i in 0..=len - ksize {
            let kmer = &sequence[i..i + ksize];

            if !kmer.iter().all(|&c| VALID[c as usize]) {
                if force {
                    continue;
                }
                return Err(Error::InvalidDNA {
                    message: String::from_utf8_lossy(kmer).into(),
                });
            }

            // kmer at position i maps to rc[len - ksize - i..len - i]
            let krc = &rc[len - ksize - i..len - i];
            let canonical = if kmer < krc { kmer } else { krc };
            self.add_hash(_hash_murmur(canonical, self.seed));
        }

        trace!(
            "added {} bp to sketch, {} hashes retained",
            len,
            self.mins.len()
        );
        Ok(())
    }

    pub fn check_compatible(&self, other: &KmerSketch) -> Result<()> {
        if self.ksize != other.ksize {
            return Err(Error::MismatchKSizes {
                k1: self.ksize,
                k2: other.ksize,
            });
        }
        if self.size() != other.size() {
            return Err(Error::MismatchSketchSize {
                s1: self.size(),
                s2: other.size(),
            });
        }
        if self.seed != other.seed {
            return Err(Error::MismatchSeed);
        }
        Ok(())
    }

    /// Count hash values present in both sketches.
    pub fn count_common(&self, other: &KmerSketch) -> Result<u64> {
        self.check_compatible(other)?;
        Ok(intersection_size(self.mins.iter(), other.mins.iter()))
    }

    /// Estimate the Jaccard similarity of the two underlying k-mer sets.
    ///
    /// For two bottom sketches of equal size `s` sharing `matches` hashes,
    /// the effective union observed by the merge scan has `2s - matches`
    /// elements, so the estimate is `matches / (2s - matches)` rather than
    /// the naive `matches / s`. Full agreement returns exactly 1.0.
    pub fn jaccard(&self, other: &KmerSketch) -> Result<f64> {
        self.check_compatible(other)?;

        let matches = intersection_size(self.mins.iter(), other.mins.iter());
        let size = self.size() as u64;

        if matches == size {
            Ok(1.0)
        } else {
            Ok(matches as f64 / (2 * size - matches) as f64)
        }
    }

    pub fn to_writer<W>(&self, writer: &mut W) -> Result<()>
    where
        W: io::Write,
    {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R>(rdr: R) -> Result<KmerSketch>
    where
        R: io::Read,
    {
        let sketch = serde_json::from_reader(rdr)?;
        Ok(sketch)
    }
}

/// Merge scan over two ascending sequences, counting equal pairs.
/// Stops as soon as either side is exhausted.
fn intersection_size<'a>(
    me_iter: impl Iterator<Item = &'a u64>,
    other_iter: impl Iterator<Item = &'a u64>,
) -> u64 {
    let mut me = me_iter.peekable();
    let mut other = other_iter.peekable();
    let mut common = 0;

    loop {
        match (me.peek(), other.peek()) {
            (Some(ref left_key), Some(ref right_key)) => match left_key.cmp(right_key) {
                Ordering::Less => {
                    me.next();
                }
                Ordering::Greater => {
                    other.next();
                }
                Ordering::Equal => {
                    other.next();
                    me.next();
                    common += 1;
                }
            },
            _ => break,
        };
    }
    common
}
