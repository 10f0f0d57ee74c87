//! ChainSet: unordered set of unique keys over a separately chained table.

use crate::cursor::{Cursor, IntoIter, Iter};
use crate::dump::Dump;
use crate::growth::GrowthPolicy;
use crate::reentrancy::DebugReentrancy;
use crate::table::{EntryKey, Table};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Initial capacity used when `N` is not given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 7;

/// A set of unique keys stored in `capacity` buckets, each bucket a
/// singly linked chain of entries.
///
/// `N` is the bucket count a new or cleared set starts with; the table only
/// grows from there, as decided by its `GrowthPolicy`. Keys are hashed once
/// on insertion; rebuilding the table reuses the stored hash.
pub struct ChainSet<K, S = DefaultHashBuilder, const N: usize = DEFAULT_INITIAL_CAPACITY> {
    hasher: S,
    policy: GrowthPolicy,
    table: Table<K>,
    reentrancy: DebugReentrancy,
}

/// Returned by `ChainSet::try_insert` when an equal key is already present.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertError<K> {
    /// The rejected key, handed back unchanged.
    DuplicateKey(K),
}

impl<K> InsertError<K> {
    pub fn into_key(self) -> K {
        match self {
            InsertError::DuplicateKey(k) => k,
        }
    }
}

impl<K> fmt::Display for InsertError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey(_) => f.write_str("key already present in set"),
        }
    }
}

impl<K: fmt::Debug> std::error::Error for InsertError<K> {}

impl<K, const N: usize> ChainSet<K, DefaultHashBuilder, N>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self::with_hasher_and_policy(Default::default(), policy)
    }
}

impl<K, S, const N: usize> Default for ChainSet<K, S, N>
where
    S: Default,
{
    fn default() -> Self {
        Self::empty(S::default(), GrowthPolicy::default())
    }
}

impl<K, S, const N: usize> ChainSet<K, S, N> {
    const INITIAL_CAPACITY: usize = {
        assert!(N > 0, "ChainSet needs an initial capacity of at least one bucket");
        N
    };

    fn empty(hasher: S, policy: GrowthPolicy) -> Self {
        assert!(
            policy.is_valid(),
            "growth policy {policy:?} needs a finite, positive load factor"
        );
        Self {
            hasher,
            policy,
            table: Table::with_capacity(Self::INITIAL_CAPACITY),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Current bucket count. Never below `N`, and only reset by `clear`.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Cursor on the first key in iteration order, or `end()` when empty.
    pub fn begin(&self) -> Cursor<'_, K> {
        Cursor::first(&self.table)
    }

    pub fn end(&self) -> Cursor<'_, K> {
        Cursor::end()
    }

    /// Keys in bucket order, each chain newest first.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.table)
    }

    /// Drop every key and go back to `N` buckets.
    pub fn clear(&mut self) {
        let old = {
            let _g = self.reentrancy.enter("clear");
            core::mem::replace(&mut self.table, Table::with_capacity(Self::INITIAL_CAPACITY))
        };
        // keys drop once the guard is released
        drop(old);
    }

    /// Renders every bucket and its chain; see `Dump`.
    pub fn dump(&self) -> Dump<'_, K> {
        Dump::new(&self.table)
    }

    /// Check the structural invariants against a fresh walk of the table.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: Eq + Hash,
        S: BuildHasher,
    {
        let cap = self.table.capacity();
        assert!(cap >= N, "capacity {cap} fell below initial {N}");
        let mut walked = 0;
        for bucket in 0..cap {
            for (_, e) in self.table.chain(bucket) {
                assert_eq!(e.hash, self.hasher.hash_one(&e.key), "stale stored hash");
                assert_eq!(self.table.bucket_of(e.hash), bucket, "entry in wrong bucket");
                walked += 1;
            }
        }
        assert_eq!(walked, self.len(), "len disagrees with chain walk");
        let keys: Vec<&K> = self.iter().collect();
        for (i, a) in keys.iter().enumerate() {
            assert!(!keys[i + 1..].contains(a), "duplicate key in table");
        }
    }
}

impl<K, S, const N: usize> ChainSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::empty(hasher, GrowthPolicy::default())
    }

    /// Panics if `policy` carries a load factor that is not finite and positive.
    pub fn with_hasher_and_policy(hasher: S, policy: GrowthPolicy) -> Self {
        Self::empty(hasher, policy)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Insert `key` unless an equal key is present.
    ///
    /// Returns a cursor on the key now in the set and whether it was
    /// inserted. On a duplicate nothing changes and `key` is dropped.
    pub fn insert(&mut self, key: K) -> (Cursor<'_, K>, bool) {
        let ((bucket, entry), inserted) = {
            let _g = self.reentrancy.enter("insert");
            let hash = self.make_hash(&key);
            match self.table.search(hash, &key) {
                Some(pos) => (pos, false),
                None => (link(&mut self.table, self.policy, hash, key), true),
            }
        };
        (Cursor::at(&self.table, bucket, entry), inserted)
    }

    /// Like `insert`, but a duplicate hands `key` back in the error.
    pub fn try_insert(&mut self, key: K) -> Result<Cursor<'_, K>, InsertError<K>> {
        let (bucket, entry) = {
            let _g = self.reentrancy.enter("try_insert");
            let hash = self.make_hash(&key);
            if self.table.search(hash, &key).is_some() {
                return Err(InsertError::DuplicateKey(key));
            }
            link(&mut self.table, self.policy, hash, key)
        };
        Ok(Cursor::at(&self.table, bucket, entry))
    }

    /// Cursor on the key equal to `q`, or `end()`.
    pub fn find<Q>(&self, q: &Q) -> Cursor<'_, K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = self.make_hash(q);
        match self.table.search(hash, q) {
            Some((bucket, entry)) => Cursor::at(&self.table, bucket, entry),
            None => Cursor::end(),
        }
    }

    /// 1 if a key equal to `q` is present, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("count");
        let hash = self.make_hash(q);
        self.table.search(hash, q).map_or(0, |_| 1)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.count(q) == 1
    }

    /// The stored key equal to `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let hash = self.make_hash(q);
        self.table
            .search(hash, q)
            .map(|(_, entry)| &self.table.entry(entry).key)
    }

    /// Remove the key equal to `q` and return it. Capacity is unchanged.
    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("take");
        let hash = self.make_hash(q);
        self.table.unlink(hash, q)
    }

    /// Remove the key equal to `q`; returns how many keys were removed (0 or 1).
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(q).map_or(0, |_| 1)
    }

    /// Replace the contents with `keys`; later duplicates are skipped.
    pub fn assign<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.clear();
        self.extend(keys);
    }
}

/// Prepend a key known to be absent, then grow if the policy asks for it.
/// Returns where the key ended up.
fn link<K>(table: &mut Table<K>, policy: GrowthPolicy, hash: u64, key: K) -> (usize, EntryKey) {
    let pos = table.push_front(hash, key);
    if !policy.should_grow(table.capacity(), table.len()) {
        return pos;
    }
    let target = policy.grown_capacity(table.capacity(), table.len());
    table
        .rebuild(target, pos.1)
        .expect("entry just inserted must survive the rebuild")
}

impl<K, S, const N: usize> Clone for ChainSet<K, S, N>
where
    K: Clone,
    S: Clone,
{
    /// Fresh table at `N` buckets, keys reinserted in the source's
    /// iteration order.
    fn clone(&self) -> Self {
        let mut out = Self::empty(self.hasher.clone(), self.policy);
        for (hash, key) in self.table.ordered() {
            link(&mut out.table, out.policy, hash, key.clone());
        }
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.hasher.clone_from(&source.hasher);
        self.policy = source.policy;
        for (hash, key) in source.table.ordered() {
            link(&mut self.table, self.policy, hash, key.clone());
        }
    }
}

/// Content equality: same length and every key of `self` is in `other`.
/// Capacity, chain order, `N` and growth policy do not matter.
impl<K, S1, S2, const N: usize, const M: usize> PartialEq<ChainSet<K, S2, M>> for ChainSet<K, S1, N>
where
    K: Eq + Hash,
    S1: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &ChainSet<K, S2, M>) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k))
    }
}

impl<K, S, const N: usize> Eq for ChainSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K: fmt::Debug, S, const N: usize> fmt::Debug for ChainSet<K, S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S, const N: usize> Extend<K> for ChainSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        for key in keys {
            self.insert(key);
        }
    }
}

impl<'a, K, S, const N: usize> Extend<&'a K> for ChainSet<K, S, N>
where
    K: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, keys: I) {
        self.extend(keys.into_iter().copied());
    }
}

impl<K, S, const N: usize> FromIterator<K> for ChainSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(keys);
        set
    }
}

impl<K, const N: usize, const M: usize> From<[K; M]> for ChainSet<K, DefaultHashBuilder, N>
where
    K: Eq + Hash,
{
    fn from(keys: [K; M]) -> Self {
        keys.into_iter().collect()
    }
}

impl<'a, K, S, const N: usize> IntoIterator for &'a ChainSet<K, S, N> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

impl<K, S, const N: usize> IntoIterator for ChainSet<K, S, N> {
    type Item = K;
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> IntoIter<K> {
        IntoIter::new(self.table)
    }
}
