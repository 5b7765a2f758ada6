use std::collections::{HashSet, VecDeque};

/// Insertion-ordered set of listing IDs already handled
///
/// When the set grows past `capacity`, the oldest IDs are evicted until
/// `retain` remain. An evicted ID counts as new again if it reappears.
#[derive(Debug, Clone)]
pub struct SeenIds {
    order: VecDeque<String>,
    members: HashSet<String>,
    capacity: usize,
    retain: usize,
}

impl SeenIds {
    /// Creates an empty set
    ///
    /// `retain` is clamped to `capacity`.
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            order: VecDeque::new(),
            members: HashSet::new(),
            capacity,
            retain: retain.min(capacity),
        }
    }

    /// Creates a set holding `ids` in order, oldest first
    pub fn from_ids<I>(ids: I, capacity: usize, retain: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = Self::new(capacity, retain);
        for id in ids {
            seen.insert(id);
        }
        seen
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    /// Inserts an ID, returning true if it was not already present
    pub fn insert(&mut self, id: String) -> bool {
        if self.members.contains(&id) {
            return false;
        }

        self.members.insert(id.clone());
        self.order.push_back(id);

        if self.order.len() > self.capacity {
            self.evict();
        }
        true
    }

    fn evict(&mut self) {
        let excess = self.order.len().saturating_sub(self.retain);
        for id in self.order.drain(..excess) {
            self.members.remove(&id);
        }
        tracing::debug!("Evicted {} seen IDs, {} retained", excess, self.order.len());
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// IDs from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
