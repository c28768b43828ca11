//! A mounted filterable view.
//!
//! [`FilterView`] owns the [`FilterState`] for as long as it is mounted and
//! keeps the location mirrored through a [`QuerySync`]. Every mutation
//! changes the state and the location inside one `&mut self` call, so the
//! two are never observed disagreeing.
//!
//! # History discipline
//!
//! The location is a mirror, not an event log. The first edit that changes
//! the state opens an editing session and pushes one history entry; every
//! further edit in that session replaces it. The session closes on
//! [`FilterView::commit_session`] or on external navigation. Going back
//! after a session therefore restores the state from before it began.
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use urlfilter::{CriterionSpec, FilterView, MemoryHistory, QuerySync, Schema};
//!
//! let schema = Arc::new(Schema::new([CriterionSpec::text("region", "Region")]).unwrap());
//! let data: Vec<BTreeMap<String, String>> = Vec::new();
//!
//! let sync = QuerySync::new(schema, MemoryHistory::new(""));
//! let mut view = FilterView::mount(&data, sync);
//!
//! for typed in ["T", "To", "Tok"] {
//!     view.edit("region", typed);
//! }
//! assert_eq!(view.navigator().entries(), ["", "region=Tok"]);
//!
//! view.back();
//! assert!(view.state().is_empty());
//! ```

use tracing::debug;

use crate::evaluate::FilterEvaluator;
use crate::navigator::{History, Navigator};
use crate::state::{Edit, FilterState};
use crate::sync::QuerySync;
use crate::traits::Filterable;

/// The view that owns a filter state over a borrowed dataset.
#[derive(Debug)]
pub struct FilterView<'d, R, N> {
    dataset: &'d [R],
    state: FilterState,
    sync: QuerySync<N>,
    session_open: bool,
}

impl<'d, R, N: Navigator> FilterView<'d, R, N> {
    /// Mounts the view, reading the initial state from the location.
    ///
    /// The location is not rewritten on mount; malformed parameters stay in
    /// the URL until the first edit.
    pub fn mount(dataset: &'d [R], sync: QuerySync<N>) -> Self {
        let state = sync.read_location();
        debug!(active = state.active_count(), "mounted filter view");
        FilterView {
            dataset,
            state,
            sync,
            session_open: false,
        }
    }

    /// The current filter state.
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The dataset this view filters.
    pub fn dataset(&self) -> &'d [R] {
        self.dataset
    }

    /// The serialized form of the current state.
    pub fn query(&self) -> String {
        self.sync.serialize(&self.state)
    }

    /// The synchronization adapter.
    pub fn sync(&self) -> &QuerySync<N> {
        &self.sync
    }

    /// The navigator behind the adapter.
    pub fn navigator(&self) -> &N {
        self.sync.navigator()
    }

    /// The navigator, mutably.
    ///
    /// Changing the location through it is external navigation: follow up
    /// with [`FilterView::sync_from_location`].
    pub fn navigator_mut(&mut self) -> &mut N {
        self.sync.navigator_mut()
    }

    /// Returns `true` while an editing session holds the current entry.
    pub fn in_session(&self) -> bool {
        self.session_open
    }

    /// Applies one user edit and mirrors it to the location.
    ///
    /// Returns `true` if the state changed. Edits that normalize to the
    /// current value touch neither the state nor the location.
    pub fn edit(&mut self, key: &str, edit: impl Into<Edit>) -> bool {
        let next = self.state.update(key, edit);
        self.replace_state(next)
    }

    /// Clears every criterion as a single edit.
    pub fn clear_all(&mut self) -> bool {
        let next = self.state.clear_all();
        self.replace_state(next)
    }

    /// Ends the current editing session.
    ///
    /// The next state-changing edit pushes a new history entry.
    pub fn commit_session(&mut self) {
        if self.session_open {
            debug!("closing editing session");
        }
        self.session_open = false;
    }

    /// Resets the state from the location after external navigation.
    ///
    /// Call this when the host reports that the location changed without
    /// going through the view (back/forward, a pasted link). Returns `true`
    /// if the state changed.
    pub fn sync_from_location(&mut self) -> bool {
        self.session_open = false;
        let next = self.sync.read_location();
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Unmounts the view, returning the navigator.
    pub fn unmount(self) -> N {
        self.sync.into_navigator()
    }

    fn replace_state(&mut self, next: FilterState) -> bool {
        if next == self.state {
            return false;
        }
        let location = self.sync.location_for(&next);
        if self.session_open {
            self.sync.apply_to_location(&location);
        } else {
            debug!("opening editing session");
            self.sync.push_location(&location);
            self.session_open = true;
        }
        self.state = next;
        true
    }
}

impl<'d, R: Filterable, N: Navigator> FilterView<'d, R, N> {
    /// The rows matching the current state, in dataset order.
    pub fn rows(&self) -> Vec<&'d R> {
        FilterEvaluator::new(&self.state).evaluate(self.dataset)
    }

    /// Number of rows matching the current state.
    pub fn row_count(&self) -> usize {
        FilterEvaluator::new(&self.state).count(self.dataset)
    }
}

impl<'d, R, N: History> FilterView<'d, R, N> {
    /// Navigates back and restores the state stored there.
    ///
    /// Returns `false` if there is no earlier entry.
    pub fn back(&mut self) -> bool {
        if !self.sync.navigator_mut().back() {
            return false;
        }
        self.sync_from_location();
        true
    }

    /// Navigates forward and restores the state stored there.
    ///
    /// Returns `false` if there is no later entry.
    pub fn forward(&mut self) -> bool {
        if !self.sync.navigator_mut().forward() {
            return false;
        }
        self.sync_from_location();
        true
    }
}
