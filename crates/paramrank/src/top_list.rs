//! Bounded list of the best scores seen during a pass.
//!
//! The list keeps at most `capacity` entries ordered by descending score.
//! Admission is gated by a threshold that starts at `0.0` and, once the list
//! has overflowed for the first time, tracks the lowest score still retained.
//! While the list is filling up, any positive score is admitted and placed
//! by rank.
//!
//! Entries with equal scores keep their arrival order: a newcomer is placed
//! after every retained entry whose score is greater than or equal to its own.

use std::{cmp::Ordering, num::NonZeroUsize};

use serde::Serialize;

/// A score together with the index of the result file it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedScore {
    pub score: f64,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct TopList {
    capacity: NonZeroUsize,
    entries: Vec<RankedScore>,
    threshold: f64,
}

impl TopList {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            // one spare slot for the entry that is inserted and then dropped
            entries: Vec::with_capacity(capacity.get() + 1),
            threshold: 0.0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Score an incoming entry must exceed to be considered.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[must_use]
    pub fn entries(&self) -> &[RankedScore] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.score)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|e| e.index)
    }

    /// Offers a score to the list.
    ///
    /// Returns the rank the entry was retained at, or `None` if it did not
    /// pass the threshold or fell off the end of a full list.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::num::NonZeroUsize;
    /// # use paramrank::top_list::TopList;
    /// let mut top = TopList::new(NonZeroUsize::new(2).unwrap());
    /// assert_eq!(top.offer(5.0, 0), Some(0));
    /// assert_eq!(top.offer(9.0, 1), Some(0));
    /// assert_eq!(top.offer(2.0, 2), None);
    /// assert_eq!(top.threshold(), 5.0);
    /// ```
    pub fn offer(&mut self, score: f64, index: usize) -> Option<usize> {
        if score.partial_cmp(&self.threshold) != Some(Ordering::Greater) {
            return None;
        }

        let capacity = self.capacity.get();
        let mut rank = usize::min(capacity, self.entries.len());
        while rank > 0 && score > self.entries[rank - 1].score {
            rank -= 1;
        }
        self.entries.insert(rank, RankedScore { score, index });

        if self.entries.len() > capacity {
            self.threshold = self.entries[capacity - 1].score;
            self.entries.truncate(capacity);
        }

        (rank < capacity).then_some(rank)
    }
}
