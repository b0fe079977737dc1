//! Class layout of the support-vector arrays
//!
//! Support vectors are stored grouped by class. `ClassLayout` turns the
//! per-class counts into prefix-sum offsets and precomputes, for every
//! one-vs-one pair, which slices of the support vectors and which
//! coefficient rows its decision function reads.

use std::ops::Range;

/// Slice view of one pairwise decision function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSlice {
    /// Internal index of the first class (the one a positive value votes for)
    pub first: usize,
    /// Internal index of the second class
    pub second: usize,
    /// Support vectors of the first class
    pub first_range: Range<usize>,
    /// Support vectors of the second class
    pub second_range: Range<usize>,
    /// Coefficient row read for the first class's support vectors
    pub first_row: usize,
    /// Coefficient row read for the second class's support vectors
    pub second_row: usize,
}

impl PairSlice {
    /// Support-vector indices taking part in this decision function, with the
    /// coefficient row each one reads
    pub fn members(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.first_range
            .clone()
            .map(move |v| (v, self.first_row))
            .chain(self.second_range.clone().map(move |v| (v, self.second_row)))
    }
}

/// Prefix-sum table of class boundaries plus the per-pair views
#[derive(Debug, Clone)]
pub struct ClassLayout {
    starts: Vec<usize>,
    counts: Vec<usize>,
    pairs: Vec<PairSlice>,
}

impl ClassLayout {
    /// Layout of a one-vs-one classifier
    ///
    /// The pair (i, j) with i < j reads row j - 1 for class i's support
    /// vectors and row i for class j's; pairs are enumerated (0,1), (0,2), ...,
    /// (1,2), ...
    pub fn one_vs_one(counts: &[usize]) -> Self {
        let class_count = counts.len();
        let starts: Vec<usize> = counts
            .iter()
            .scan(0, |offset, &count| {
                let start = *offset;
                *offset += count;
                Some(start)
            })
            .collect();

        let mut pairs = Vec::with_capacity(pair_count(class_count));
        for i in 0..class_count {
            for j in (i + 1)..class_count {
                pairs.push(PairSlice {
                    first: i,
                    second: j,
                    first_range: starts[i]..starts[i] + counts[i],
                    second_range: starts[j]..starts[j] + counts[j],
                    first_row: j - 1,
                    second_row: i,
                });
            }
        }

        Self {
            starts,
            counts: counts.to_vec(),
            pairs,
        }
    }

    /// Layout of a regression or one-class model: a single decision function
    /// over every support vector, reading coefficient row 0
    pub fn single(total_support_vectors: usize) -> Self {
        Self {
            starts: Vec::new(),
            counts: Vec::new(),
            pairs: vec![PairSlice {
                first: 0,
                second: 1,
                first_range: 0..total_support_vectors,
                second_range: total_support_vectors..total_support_vectors,
                first_row: 0,
                second_row: 0,
            }],
        }
    }

    pub fn pairs(&self) -> &[PairSlice] {
        &self.pairs
    }

    /// Support vectors of an internal class index
    pub fn class_range(&self, class: usize) -> Option<Range<usize>> {
        let start = *self.starts.get(class)?;
        Some(start..start + self.counts[class])
    }
}

/// Number of unordered class pairs
pub fn pair_count(class_count: usize) -> usize {
    class_count * class_count.saturating_sub(1) / 2
}
