//! Parent query-builder context that clauses report compiled boosts into

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::boost::FilterBoost;

/// Ordered collector of compiled filter boosts
///
/// This is the minimal contract a clause needs from its parent builder: a
/// place to record compiled boosts, in report order. Rendering the overall
/// query tree is the consumer's concern.
#[derive(Clone, Debug, Default)]
pub struct QueryRoot {
    boosts: Vec<FilterBoost>,
}

impl QueryRoot {
    /// Create an empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compiled boost
    pub fn record_boost(&mut self, boost: FilterBoost) {
        self.boosts.push(boost);
    }

    /// Recorded boosts, in report order
    pub fn boosts(&self) -> &[FilterBoost] {
        &self.boosts
    }

    /// True if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.boosts.is_empty()
    }
}

/// Cheap handle to the parent query tree
///
/// Every clause derived from one ancestor carries a clone of the same
/// handle; `Clone` copies the handle, not the root.
#[derive(Clone, Debug, Default)]
pub struct BaseHandle {
    root: Rc<RefCell<QueryRoot>>,
}

impl BaseHandle {
    /// Handle to a fresh, detached root
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compiled boost into the root
    pub fn record_boost(&self, boost: FilterBoost) {
        self.root.borrow_mut().record_boost(boost);
    }

    /// Read view of the root; keep it short-lived
    pub fn root(&self) -> Ref<'_, QueryRoot> {
        self.root.borrow()
    }

    /// True if both handles point at the same root
    pub fn shares_root(&self, other: &BaseHandle) -> bool {
        Rc::ptr_eq(&self.root, &other.root)
    }
}
