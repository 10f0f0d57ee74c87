//! Debug-only reentrancy guard.
//!
//! `ChainSet` calls into user code (`K: Hash`, `K: Eq`) while a chain walk
//! or relink is in flight. A key whose `Eq` reaches back into the same set
//! would observe a half-linked chain, so debug builds record which
//! operation holds the set and panic on nested entry, naming both
//! operations. In release builds the guard compiles to nothing.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-set reentrancy tracker. Guard entry points with
/// `let _g = self.reentrancy.enter("op");`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Sync in every profile, not just when `active` exists.
    _nosync: PhantomData<Cell<()>>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosync: PhantomData,
        }
    }

    /// Enter a guarded section for `op`. In debug builds, panics if another
    /// operation on the same set has not finished yet.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(held) = self.active.get() {
                panic!("reentrant call into ChainSet::{op} while ChainSet::{held} is in progress");
            }
            self.active.set(Some(op));
            return ReentrancyGuard { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ReentrancyGuard { _z: PhantomData };
        }
    }

    /// Name of the operation currently holding the guard, if any.
    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard returned by `DebugReentrancy::enter`.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    #[cfg(not(debug_assertions))]
    _z: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter("insert");
        }
        let _g = r.enter("find");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn guard_records_and_releases_operation() {
        let r = DebugReentrancy::new();
        assert_eq!(r.active(), None);
        {
            let _g = r.enter("erase");
            assert_eq!(r.active(), Some("erase"));
        }
        assert_eq!(r.active(), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_naming_both_operations() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("insert");
            let _inner = r.enter("count");
        }));
        let err = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("ChainSet::count"), "message was {msg:?}");
        assert!(msg.contains("ChainSet::insert"), "message was {msg:?}");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter("insert");
        let _g2 = r.enter("count");
        let (_g1, _g2) = (_g1, _g2);
    }
}
