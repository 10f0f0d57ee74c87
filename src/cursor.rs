//! Positions inside a `ChainSet` and the iterators built on them.
//!
//! Traversal order is bucket 0 upward, each chain head to tail, which
//! makes the most recently inserted key of a bucket come first.
//!
//! A `Cursor` borrows the set it points into, so the set cannot be mutated
//! while any cursor is alive: entries a cursor refers to are never freed
//! or moved underneath it.

use crate::table::{EntryKey, Table};
use core::fmt;
use core::iter::FusedIterator;

struct Position<'a, K> {
    table: &'a Table<K>,
    bucket: usize,
    entry: EntryKey,
    // capacity when the cursor was created; bounds the bucket scan
    capacity: usize,
}

impl<K> Clone for Position<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Position<'_, K> {}

/// A position on one live key of a set, or the end sentinel.
pub struct Cursor<'a, K> {
    pos: Option<Position<'a, K>>,
}

impl<K> Clone for Cursor<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Cursor<'_, K> {}

impl<'a, K> Cursor<'a, K> {
    /// The end sentinel. Every end cursor compares equal to every other.
    pub const fn end() -> Self {
        Cursor { pos: None }
    }

    pub(crate) fn at(table: &'a Table<K>, bucket: usize, entry: EntryKey) -> Self {
        Cursor {
            pos: Some(Position {
                table,
                bucket,
                entry,
                capacity: table.capacity(),
            }),
        }
    }

    /// Cursor on the first key of `table`, or end when it is empty.
    pub(crate) fn first(table: &'a Table<K>) -> Self {
        match table.first_occupied(0, table.capacity()) {
            Some((bucket, entry)) => Cursor::at(table, bucket, entry),
            None => Cursor::end(),
        }
    }

    pub fn is_end(&self) -> bool {
        self.pos.is_none()
    }

    /// The key under the cursor; `None` at end.
    pub fn get(&self) -> Option<&'a K> {
        self.pos.map(|p| &p.table.entry(p.entry).key)
    }

    /// Bucket index of the key under the cursor; `None` at end.
    pub fn bucket(&self) -> Option<usize> {
        self.pos.map(|p| p.bucket)
    }

    /// Step to the next key: the successor in the chain, else the head of
    /// the next non-empty bucket, else end. Advancing end stays at end.
    pub fn advance(&mut self) {
        let Some(p) = self.pos else {
            return;
        };
        if let Some(next) = p.table.entry(p.entry).next {
            self.pos = Some(Position { entry: next, ..p });
            return;
        }
        self.pos = p
            .table
            .first_occupied(p.bucket + 1, p.capacity)
            .map(|(bucket, entry)| Position {
                bucket,
                entry,
                ..p
            });
    }
}

impl<K> PartialEq for Cursor<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.pos, &other.pos) {
            (None, None) => true,
            (Some(a), Some(b)) => core::ptr::eq(a.table, b.table) && a.entry == b.entry,
            _ => false,
        }
    }
}

impl<K> Eq for Cursor<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for Cursor<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            None => f.write_str("Cursor(end)"),
            Some(p) => f
                .debug_struct("Cursor")
                .field("bucket", &p.bucket)
                .field("key", &p.table.entry(p.entry).key)
                .finish(),
        }
    }
}

/// Iterator over the keys of a `ChainSet`, in cursor order.
pub struct Iter<'a, K> {
    cursor: Cursor<'a, K>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    pub(crate) fn new(table: &'a Table<K>) -> Self {
        Iter {
            cursor: Cursor::first(table),
            remaining: table.len(),
        }
    }
}

impl<K> Clone for Iter<'_, K> {
    fn clone(&self) -> Self {
        Iter {
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.get()?;
        self.cursor.advance();
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

impl<K: fmt::Debug> fmt::Debug for Iter<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator over the keys of a `ChainSet`, in cursor order.
pub struct IntoIter<K> {
    inner: std::vec::IntoIter<(u64, K)>,
}

impl<K> IntoIter<K> {
    pub(crate) fn new(table: Table<K>) -> Self {
        IntoIter {
            inner: table.into_ordered().into_iter(),
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(_, k)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for IntoIter<K> {}
impl<K> FusedIterator for IntoIter<K> {}
