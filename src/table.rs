//! Table: bucket heads over a handle-indexed entry arena.
//!
//! Chains are singly linked through `slotmap` keys instead of owning
//! pointers, so dropping a table is a flat walk over the arena no matter
//! how long a chain gets. Every handle reachable from `heads` refers to a
//! live slot; indexing `entries` with such a handle cannot fail.

use core::borrow::Borrow;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle of one entry in a table's arena.
    pub(crate) struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<K> {
    pub(crate) key: K,
    pub(crate) hash: u64,
    pub(crate) next: Option<EntryKey>,
}

#[derive(Debug)]
pub(crate) struct Table<K> {
    heads: Box<[Option<EntryKey>]>,
    entries: SlotMap<EntryKey, Entry<K>>,
}

impl<K> Table<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            heads: vec![None; capacity].into_boxed_slice(),
            entries: SlotMap::with_key(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.heads.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub(crate) fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    #[cfg(test)]
    pub(crate) fn head(&self, bucket: usize) -> Option<EntryKey> {
        self.heads[bucket]
    }

    #[inline]
    pub(crate) fn entry(&self, k: EntryKey) -> &Entry<K> {
        &self.entries[k]
    }

    /// Walk one bucket head to tail.
    pub(crate) fn chain(&self, bucket: usize) -> Chain<'_, K> {
        Chain {
            table: self,
            cur: self.heads[bucket],
        }
    }

    /// First non-empty bucket in `from..until`, with its head.
    pub(crate) fn first_occupied(&self, from: usize, until: usize) -> Option<(usize, EntryKey)> {
        let until = until.min(self.capacity());
        (from..until).find_map(|b| self.heads[b].map(|k| (b, k)))
    }

    /// Locate the entry equal to `q` in the bucket selected by `hash`.
    pub(crate) fn search<Q>(&self, hash: u64, q: &Q) -> Option<(usize, EntryKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = self.bucket_of(hash);
        self.chain(bucket)
            .find(|(_, e)| e.hash == hash && e.key.borrow() == q)
            .map(|(k, _)| (bucket, k))
    }

    /// Prepend a new entry to its chain. The caller guarantees the key is
    /// not already present.
    pub(crate) fn push_front(&mut self, hash: u64, key: K) -> (usize, EntryKey) {
        let bucket = self.bucket_of(hash);
        let next = self.heads[bucket];
        let k = self.entries.insert(Entry { key, hash, next });
        self.heads[bucket] = Some(k);
        (bucket, k)
    }

    /// Unlink and return the key equal to `q`.
    ///
    /// One routine covers every position: the predecessor's `next` is
    /// relinked when there is one, the bucket head otherwise.
    pub(crate) fn unlink<Q>(&mut self, hash: u64, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let bucket = self.bucket_of(hash);
        let mut prev: Option<EntryKey> = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let e = &self.entries[k];
            if e.hash == hash && e.key.borrow() == q {
                let next = e.next;
                match prev {
                    None => self.heads[bucket] = next,
                    Some(p) => self.entries[p].next = next,
                }
                return self.entries.remove(k).map(|e| e.key);
            }
            prev = cur;
            cur = e.next;
        }
        None
    }

    /// Consume the table, yielding `(hash, key)` in bucket-then-chain order.
    pub(crate) fn into_ordered(mut self) -> Vec<(u64, K)> {
        let mut out = Vec::with_capacity(self.len());
        for bucket in 0..self.capacity() {
            let mut cur = self.heads[bucket].take();
            while let Some(k) = cur {
                let Some(e) = self.entries.remove(k) else {
                    break;
                };
                cur = e.next;
                out.push((e.hash, e.key));
            }
        }
        out
    }

    /// Rebuild at `capacity`: swap in a fresh table, then drain the old one
    /// in bucket-then-chain order, prepending every entry into the new
    /// chains. Returns the new position of `follow`.
    pub(crate) fn rebuild(&mut self, capacity: usize, follow: EntryKey) -> Option<(usize, EntryKey)> {
        let mut old = core::mem::replace(self, Table::with_capacity(capacity));
        self.entries.reserve(old.len());
        let mut followed = None;
        for bucket in 0..old.capacity() {
            let mut cur = old.heads[bucket].take();
            while let Some(k) = cur {
                let Some(e) = old.entries.remove(k) else {
                    break;
                };
                cur = e.next;
                let pos = self.push_front(e.hash, e.key);
                if k == follow {
                    followed = Some(pos);
                }
            }
        }
        followed
    }

    /// `(hash, &key)` in bucket-then-chain order.
    pub(crate) fn ordered(&self) -> impl Iterator<Item = (u64, &K)> + '_ {
        (0..self.capacity()).flat_map(move |b| self.chain(b).map(|(_, e)| (e.hash, &e.key)))
    }
}

/// Head-to-tail walk over one chain.
pub(crate) struct Chain<'a, K> {
    table: &'a Table<K>,
    cur: Option<EntryKey>,
}

impl<'a, K> Iterator for Chain<'a, K> {
    type Item = (EntryKey, &'a Entry<K>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cur?;
        let e = self.table.entry(k);
        self.cur = e.next;
        Some((k, e))
    }
}
