use std::collections::HashSet;

/// Listing ids already emitted during this run
///
/// Never reset between pairs: once an id is inserted it is never written again.
#[derive(Debug, Clone, Default)]
pub struct DedupSet {
    seen: HashSet<String>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an id, returning `true` if it had not been seen before
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Successful API calls made during this run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounter(u64);

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.0 += 1;
    }

    /// Folds one pair's request count into the run total
    pub fn add(&mut self, requests: u64) {
        self.0 += requests;
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Mutable state threaded through every pair of a run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub seen: DedupSet,
    pub requests: RequestCounter,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }
}
