//! Bounded, bucketed priority container.
//!
//! Items are grouped into buckets by heuristic value. The smallest occupied
//! bucket supplies [`pop`](Frontier::pop); when a push takes the container
//! past its capacity, one item is evicted from the largest occupied bucket.
//! Within a bucket items leave in insertion order.
//!
//! Every id lives in exactly one bucket at a time. [`update`](Frontier::update)
//! only ever moves an id to a strictly smaller bucket.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Outcome of [`Frontier::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update<K, T, H> {
    /// The id was already stored in an equal or better bucket; nothing changed.
    Unchanged,
    /// The item was stored. `evicted` holds the item dropped to respect
    /// capacity, if any.
    Stored { evicted: Option<(K, T, H)> },
}

/// Bucketed priority container keyed by item id.
#[derive(Debug, Clone)]
pub struct Frontier<K, T, H> {
    /// Heuristic bucket -> (insertion sequence -> (id, item)).
    buckets: BTreeMap<H, BTreeMap<u64, (K, T)>>,
    /// Id -> (bucket, insertion sequence).
    index: HashMap<K, (H, u64)>,
    next_seq: u64,
    max_size: Option<usize>,
}

impl<K, T, H> Default for Frontier<K, T, H>
where
    K: Hash + Eq + Clone,
    H: Ord + Copy,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K, T, H> Frontier<K, T, H>
where
    K: Hash + Eq + Clone,
    H: Ord + Copy,
{
    /// Create a frontier holding at most `max_size` items.
    pub fn new(max_size: usize) -> Self {
        Self {
            buckets: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            max_size: Some(max_size),
        }
    }

    /// Create a frontier without a capacity limit.
    pub fn unbounded() -> Self {
        Self {
            buckets: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            max_size: None,
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Configured capacity, `None` if unbounded.
    pub fn capacity(&self) -> Option<usize> {
        self.max_size
    }

    /// Insert `item` under `id` in bucket `heuristic`.
    ///
    /// An id already present is moved (its old entry is replaced). If the
    /// container then exceeds its capacity, one item is evicted from the
    /// largest occupied bucket and returned.
    pub fn push(&mut self, item: T, id: K, heuristic: H) -> Option<(K, T, H)> {
        self.remove(&id);

        let seq = self.next_seq;
        self.next_seq += 1;
        self.buckets
            .entry(heuristic)
            .or_default()
            .insert(seq, (id.clone(), item));
        self.index.insert(id, (heuristic, seq));

        match self.max_size {
            Some(max) if self.index.len() > max => self.pop_worst(),
            _ => None,
        }
    }

    /// Remove and return the oldest item of the smallest occupied bucket.
    pub fn pop(&mut self) -> Option<(K, T, H)> {
        let heuristic = *self.buckets.keys().next()?;
        self.take_oldest(heuristic)
    }

    /// Remove and return an item from bucket `heuristic`, falling back to
    /// [`pop`](Frontier::pop) when that bucket is empty or absent.
    pub fn pop_from(&mut self, heuristic: H) -> Option<(K, T, H)> {
        if self.buckets.contains_key(&heuristic) {
            return self.take_oldest(heuristic);
        }
        self.pop()
    }

    /// Remove and return the oldest item of the largest occupied bucket.
    pub fn pop_worst(&mut self) -> Option<(K, T, H)> {
        let heuristic = *self.buckets.keys().next_back()?;
        self.take_oldest(heuristic)
    }

    /// Store `item` under `id` unless `id` already sits in a bucket no
    /// larger than `heuristic`.
    pub fn update(&mut self, item: T, id: K, heuristic: H) -> Update<K, T, H> {
        match self.index.get(&id) {
            Some(&(current, _)) if heuristic >= current => Update::Unchanged,
            _ => Update::Stored {
                evicted: self.push(item, id, heuristic),
            },
        }
    }

    /// Remove `id`, returning its item and bucket.
    pub fn remove(&mut self, id: &K) -> Option<(T, H)> {
        let (heuristic, seq) = self.index.remove(id)?;
        let bucket = self.buckets.get_mut(&heuristic)?;
        let (_, item) = bucket.remove(&seq)?;
        if bucket.is_empty() {
            self.buckets.remove(&heuristic);
        }
        Some((item, heuristic))
    }

    /// Item and bucket stored under `id`.
    pub fn get(&self, id: &K) -> Option<(&T, H)> {
        let &(heuristic, seq) = self.index.get(id)?;
        let (_, item) = self.buckets.get(&heuristic)?.get(&seq)?;
        Some((item, heuristic))
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// The item [`pop`](Frontier::pop) would return, without removing it.
    pub fn peek(&self) -> Option<(&K, &T, H)> {
        let (&heuristic, bucket) = self.buckets.iter().next()?;
        let (_, (id, item)) = bucket.iter().next()?;
        Some((id, item, heuristic))
    }

    /// Smallest occupied bucket.
    pub fn min_bucket(&self) -> Option<H> {
        self.buckets.keys().next().copied()
    }

    /// Largest occupied bucket.
    pub fn max_bucket(&self) -> Option<H> {
        self.buckets.keys().next_back().copied()
    }

    /// Number of items in bucket `heuristic`.
    pub fn bucket_len(&self, heuristic: H) -> usize {
        self.buckets.get(&heuristic).map_or(0, BTreeMap::len)
    }

    /// All items in pop order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &T, H)> {
        self.buckets.iter().flat_map(|(&heuristic, bucket)| {
            bucket.values().map(move |(id, item)| (id, item, heuristic))
        })
    }

    fn take_oldest(&mut self, heuristic: H) -> Option<(K, T, H)> {
        let bucket = self.buckets.get_mut(&heuristic)?;
        let (_, (id, item)) = bucket.pop_first()?;
        if bucket.is_empty() {
            self.buckets.remove(&heuristic);
        }
        self.index.remove(&id);
        Some((id, item, heuristic))
    }
}
