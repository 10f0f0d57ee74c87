//! Bucket-by-bucket rendering of a set's table, for debugging only.
//!
//! ```text
//! size = 3 capacity = 5
//! [0]: free
//! [1]: 11 -> 6
//! [2]: 2
//! [3]: free
//! [4]: free
//! ```
//!
//! The layout is not stable and must not be parsed.

use crate::table::Table;
use core::fmt;

/// `Display` adapter returned by `ChainSet::dump`.
pub struct Dump<'a, K> {
    table: &'a Table<K>,
}

impl<'a, K> Dump<'a, K> {
    pub(crate) fn new(table: &'a Table<K>) -> Self {
        Dump { table }
    }
}

impl<K: fmt::Display> fmt::Display for Dump<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.table;
        writeln!(f, "size = {} capacity = {}", t.len(), t.capacity())?;
        for bucket in 0..t.capacity() {
            write!(f, "[{bucket}]: ")?;
            let mut chain = t.chain(bucket).peekable();
            if chain.peek().is_none() {
                writeln!(f, "free")?;
                continue;
            }
            let mut first = true;
            for (_, e) in chain {
                if !first {
                    f.write_str(" -> ")?;
                }
                first = false;
                write!(f, "{}", e.key)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
