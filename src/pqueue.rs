use std::collections::VecDeque;

const NUM_BUCKETS: usize = 4096;
const NUM_WORDS: usize = NUM_BUCKETS / 64;

/// Highest priority the queue accepts.
pub const MAX_PRIORITY: usize = NUM_BUCKETS - 1;

/// Bucketed min-priority queue with O(1) pop-min.
///
/// Items of equal priority come out in insertion order. Priorities must lie
/// within `0..=MAX_PRIORITY`.
pub struct PriorityQueue<T> {
    buckets: Vec<VecDeque<T>>,
    // bit i of bitmap[w] set <=> bucket w*64+i non-empty; bit w of summary set <=> bitmap[w] != 0
    bitmap: [u64; NUM_WORDS],
    summary: u64,
    len: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            buckets: (0..NUM_BUCKETS).map(|_| VecDeque::new()).collect(),
            bitmap: [0; NUM_WORDS],
            summary: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, priority: usize, item: T) {
        assert!(priority <= MAX_PRIORITY, "priority must be <= {}", MAX_PRIORITY);
        self.buckets[priority].push_back(item);
        self.len += 1;

        let word_idx = priority / 64;
        let bit_idx = priority % 64;
        self.bitmap[word_idx] |= 1u64 << bit_idx;
        self.summary |= 1u64 << word_idx;
    }

    /// Remove the oldest item of the lowest priority, returning it with its priority.
    pub fn pop_min(&mut self) -> Option<(usize, T)> {
        if self.summary == 0 {
            return None;
        }
        let word_idx = self.summary.trailing_zeros() as usize;
        let bit_idx = self.bitmap[word_idx].trailing_zeros() as usize;
        let priority = word_idx * 64 + bit_idx;

        let item = self.buckets[priority].pop_front()?;
        self.len -= 1;

        if self.buckets[priority].is_empty() {
            self.bitmap[word_idx] &= !(1u64 << bit_idx);
            if self.bitmap[word_idx] == 0 {
                self.summary &= !(1u64 << word_idx);
            }
        }

        Some((priority, item))
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
