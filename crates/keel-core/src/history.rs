//! Fixed-capacity history windows.
//!
//! Every per-variable history a session keeps (information, entropy,
//! complexity, void magnitude, risk, decision routes, regimes) is a
//! [`HistoryWindow`]: an ordered FIFO sequence that evicts its oldest entry
//! once capacity is reached. Windows are serialized into session snapshots;
//! capacity is re-imposed on deserialization so an oversized or hand-edited
//! snapshot cannot grow a window past its configured bound.

use std::collections::VecDeque;

use serde::{Deserialize, Deserializer, Serialize};

/// A bounded, ordered sequence with FIFO eviction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryWindow<T> {
    /// Creates an empty window holding at most `capacity` entries.
    ///
    /// A zero capacity is coerced to 1 so that `push` always retains the
    /// most recent entry.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Appends an entry, evicting the oldest if the window is full.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the window holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest entry, if any.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    /// Newest entry, if any.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    /// Entry `n` places before the newest (`nth_back(0)` is the newest).
    #[must_use]
    pub fn nth_back(&self, n: usize) -> Option<&T> {
        self.items.iter().rev().nth(n)
    }

    /// Iterates oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Iterates over the trailing `n` entries, oldest of those first.
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        let skip = self.items.len().saturating_sub(n);
        self.items.iter().skip(skip)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for HistoryWindow<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw<T> {
            items: VecDeque<T>,
            capacity: usize,
        }

        let raw = Raw::<T>::deserialize(deserializer)?;
        let capacity = raw.capacity.max(1);
        let mut items = raw.items;
        // Re-impose the bound: keep the newest entries.
        while items.len() > capacity {
            items.pop_front();
        }
        Ok(Self { items, capacity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut window = HistoryWindow::new(3);
        for n in 0..5 {
            window.push(n);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.front(), Some(&2));
        assert_eq!(window.back(), Some(&4));
    }

    #[test]
    fn nth_back_counts_from_newest() {
        let mut window = HistoryWindow::new(4);
        for n in 0..4 {
            window.push(n);
        }
        assert_eq!(window.nth_back(0), Some(&3));
        assert_eq!(window.nth_back(1), Some(&2));
        assert_eq!(window.nth_back(4), None);
    }

    #[test]
    fn tail_returns_trailing_entries_in_order() {
        let mut window = HistoryWindow::new(10);
        for n in 0..6 {
            window.push(n);
        }
        let tail: Vec<i32> = window.tail(3).copied().collect();
        assert_eq!(tail, vec![3, 4, 5]);
        // Asking for more than we have yields everything.
        assert_eq!(window.tail(100).count(), 6);
    }

    #[test]
    fn zero_capacity_is_coerced() {
        let mut window = HistoryWindow::new(0);
        window.push(1);
        window.push(2);
        assert_eq!(window.len(), 1);
        assert_eq!(window.back(), Some(&2));
    }

    #[test]
    fn deserialize_reimposes_capacity() {
        let json = r#"{"items": [1, 2, 3, 4, 5], "capacity": 2}"#;
        let window: HistoryWindow<i32> = serde_json::from_str(json).unwrap();
        assert_eq!(window.len(), 2);
        assert_eq!(window.front(), Some(&4));
        assert_eq!(window.back(), Some(&5));
    }

    #[test]
    fn serde_round_trip() {
        let mut window = HistoryWindow::new(3);
        window.push("a".to_string());
        window.push("b".to_string());
        let json = serde_json::to_string(&window).unwrap();
        let restored: HistoryWindow<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, window);
    }
}
