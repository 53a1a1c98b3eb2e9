//! fixed-capacity FIFO ring used for per-sensor reading history.
//!
//! backing storage is an array of `N` slots plus a head index (oldest
//! element) and a count. pushing into a full ring overwrites the oldest slot
//! and advances the head, so eviction is O(1) and order never changes.

/// ring of at most `N` items, iterated oldest first
#[derive(Debug, Clone)]
pub struct HistoryRing<T, const N: usize> {
    slots: [Option<T>; N],
    head: usize,
    len: usize,
}

impl<T, const N: usize> HistoryRing<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            head: 0,
            len: 0,
        }
    }

    #[cfg(test)]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// append `item`, returning the evicted oldest item if the ring was full
    pub fn push(&mut self, item: T) -> Option<T> {
        if N == 0 {
            return Some(item);
        }

        if self.len < N {
            let tail = (self.head + self.len) % N;
            self.slots[tail] = Some(item);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.head].replace(item);
            self.head = (self.head + 1) % N;
            evicted
        }
    }

    /// items oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % N].as_ref())
    }
}

impl<T: Clone, const N: usize> HistoryRing<T, N> {
    /// owned copy of the contents, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T, const N: usize> Default for HistoryRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_in_order() {
        let mut ring: HistoryRing<u32, 4> = HistoryRing::new();
        assert!(ring.is_empty());
        for i in 0..3 {
            assert_eq!(ring.push(i), None);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut ring: HistoryRing<u32, 3> = HistoryRing::new();
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert_eq!(ring.push(4), Some(1));
        assert_eq!(ring.push(5), Some(2));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.to_vec(), vec![3, 4, 5]);
    }

    #[test]
    fn test_thirty_one_pushes_keep_last_thirty() {
        let mut ring: HistoryRing<u32, 30> = HistoryRing::new();
        for i in 1..=31 {
            ring.push(i);
        }
        assert_eq!(ring.len(), 30);
        assert_eq!(ring.to_vec(), (2..=31).collect::<Vec<_>>());
    }

    #[test]
    fn test_wraps_many_times() {
        let mut ring: HistoryRing<usize, 5> = HistoryRing::new();
        for i in 0..1003 {
            ring.push(i);
            assert!(ring.len() <= ring.capacity());
        }
        assert_eq!(ring.to_vec(), vec![998, 999, 1000, 1001, 1002]);
    }
}
