use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A frontier entry: a cell index with the priority it was pushed at.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Entry {
    pub f: u32,
    pub seq: u64,
    pub idx: usize,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest (f, seq) first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of cell indices ordered by `(f_score, insertion order)`.
///
/// Equal `f_score` entries come out in the order they went in. Membership is
/// tracked separately from the heap, so a cell whose priority has been
/// lowered may leave an outdated entry behind; callers compare the popped
/// `f` against their own score table to spot those.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    members: Vec<bool>,
    next_seq: u64,
}

impl Frontier {
    /// An empty frontier for a grid of `len` cells.
    pub fn new(len: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            members: vec![false; len],
            next_seq: 0,
        }
    }

    /// Insert `idx` with priority `f` and mark it a member.
    pub fn push(&mut self, f: u32, idx: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { f, seq, idx });
        if let Some(m) = self.members.get_mut(idx) {
            *m = true;
        }
    }

    /// Remove and return the lowest entry. Membership is left untouched.
    pub fn pop_min(&mut self) -> Option<Entry> {
        self.heap.pop()
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.members.get(idx).copied().unwrap_or(false)
    }

    /// Drop `idx` from the membership set.
    #[inline]
    pub fn remove(&mut self, idx: usize) {
        if let Some(m) = self.members.get_mut(idx) {
            *m = false;
        }
    }

    /// Whether no entries (live or outdated) remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued entries, outdated ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
