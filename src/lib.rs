//! chain-set: an unordered set of unique keys backed by a hash table with
//! separate chaining.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: average O(1) insert, lookup and erase with no ordering
//!   guarantees, over a storage layout simple enough to dump and reason
//!   about bucket by bucket.
//! - Layers:
//!   - Table<K>: bucket heads plus a `slotmap` arena of entries; each
//!     entry holds its key, its hash and the handle of the next entry in
//!     its chain.
//!   - ChainSet<K, S, N>: public API; owns the hasher, the growth policy
//!     and the table, and rebuilds the table when the policy asks for it.
//!   - Cursor / Iter / IntoIter: traversal in bucket-then-chain order.
//!
//! Constraints
//! - Single-threaded: `!Sync`; `Send` when `K` and `S` are.
//! - Unique keys; a duplicate insert is a no-op reported as `false`.
//! - Chains link through arena handles, so teardown never recurses.
//! - `N` (the initial bucket count) must be at least 1; checked at compile
//!   time.
//!
//! Storage and growth
//! - New entries are prepended to their chain, so within a bucket the most
//!   recently inserted key comes first.
//! - After each insert the `GrowthPolicy` decides whether to grow. The new
//!   capacity steps through `c * 2 + 1` until the policy is satisfied, then
//!   a fresh table replaces the old one and every entry is relinked in the
//!   old table's iteration order.
//! - Capacity never shrinks; `clear` resets it to `N`.
//!
//! Hasher and rehashing invariants
//! - Each entry stores a precomputed `u64` hash; rebuilding and cloning
//!   reuse it and never call `K: Hash` again.
//!
//! Reentrancy policy
//! - Entry points that run `K: Hash`/`K: Eq` hold a debug-only reentrancy
//!   guard. Keys removed by `erase`/`clear` are dropped after the guard is
//!   released, so `Drop` for `K` may call back into the set.
//!
//! Cursor validity
//! - A `Cursor` borrows its set; no mutation can happen while one is
//!   alive. Dereferencing the end cursor yields `None`.

mod chain_set;
mod chain_set_proptest;
pub mod cursor;
pub mod dump;
pub mod growth;
mod reentrancy;
mod table;

// Public surface
pub use chain_set::{ChainSet, InsertError, DEFAULT_INITIAL_CAPACITY};
pub use cursor::{Cursor, IntoIter, Iter};
pub use dump::Dump;
pub use growth::GrowthPolicy;
