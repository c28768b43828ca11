//! Mirroring filter state into the query string and back.
//!
//! [`parse`] and [`serialize`] are the pure halves of the mapping.
//! [`QuerySync`] pairs them with a [`Navigator`] so the state can be read
//! from, and written to, the current location.
//!
//! # Serialization
//!
//! Present criteria are written one `key=value` pair each, in schema
//! declaration order, form-urlencoded. Absent criteria are omitted. Equal
//! states therefore serialize to byte-identical strings, and
//! `parse(serialize(s))` rebuilds `s`.
//!
//! # Foreign parameters
//!
//! A location may carry parameters the schema does not own. With
//! [`SyncOptions::preserve_foreign_params`] set (the default), they are kept,
//! in their original order, after the serialized criteria whenever the
//! location is rewritten.

use std::sync::Arc;

use tracing::debug;

use crate::codec;
use crate::criterion::Schema;
use crate::navigator::Navigator;
use crate::state::FilterState;

/// Decodes a query string into the pairs the schema owns.
///
/// Unknown keys are dropped. A repeated key keeps its last value. The
/// result is ordered by schema declaration.
///
/// ```
/// use urlfilter::{parse, CriterionSpec, Schema};
///
/// let schema = Schema::new([
///     CriterionSpec::text("region", "Region"),
///     CriterionSpec::min("minSales", "Sales"),
/// ]).unwrap();
///
/// let pairs = parse(&schema, "?minSales=1&utm=x&region=Tokyo&minSales=2");
/// assert_eq!(pairs, [
///     ("region".to_string(), "Tokyo".to_string()),
///     ("minSales".to_string(), "2".to_string()),
/// ]);
/// ```
pub fn parse(schema: &Schema, query: &str) -> Vec<(String, String)> {
    let mut slots: Vec<Option<String>> = vec![None; schema.len()];
    for (key, value) in codec::decode(query) {
        match schema.position(&key) {
            Some(index) => slots[index] = Some(value),
            None => debug!(key = %key, "dropping parameter outside schema"),
        }
    }
    schema
        .iter()
        .zip(slots)
        .filter_map(|(spec, slot)| slot.map(|value| (spec.key.clone(), value)))
        .collect()
}

/// Encodes the present criteria of a state.
///
/// ```
/// use std::sync::Arc;
/// use urlfilter::{serialize, CriterionSpec, FilterState, Schema};
///
/// let schema = Arc::new(Schema::new([
///     CriterionSpec::text("region", "Region"),
///     CriterionSpec::min("minSales", "Sales"),
/// ]).unwrap());
///
/// let state = FilterState::new(schema).update("region", "Osaka");
/// assert_eq!(serialize(&state), "region=Osaka");
/// ```
pub fn serialize(state: &FilterState) -> String {
    codec::encode(
        state
            .iter()
            .map(|(spec, value)| (spec.key.as_str(), value.to_param())),
    )
}

/// Pairs in `query` whose keys the schema does not own, in input order.
fn foreign_pairs(schema: &Schema, query: &str) -> Vec<(String, String)> {
    codec::decode(query)
        .into_iter()
        .filter(|(key, _)| !schema.contains_key(key))
        .collect()
}

/// Options for [`QuerySync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Keep parameters the schema does not own when rewriting the location.
    pub preserve_foreign_params: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            preserve_foreign_params: true,
        }
    }
}

/// Bidirectional adapter between [`FilterState`] and a navigator's query.
///
/// `QuerySync` never owns the filter state; it reads one from the location
/// and writes one to it.
#[derive(Debug, Clone)]
pub struct QuerySync<N> {
    schema: Arc<Schema>,
    navigator: N,
    options: SyncOptions,
}

impl<N: Navigator> QuerySync<N> {
    /// Creates an adapter with default options.
    pub fn new(schema: Arc<Schema>, navigator: N) -> Self {
        Self::with_options(schema, navigator, SyncOptions::default())
    }

    /// Creates an adapter with explicit options.
    pub fn with_options(schema: Arc<Schema>, navigator: N, options: SyncOptions) -> Self {
        QuerySync {
            schema,
            navigator,
            options,
        }
    }

    /// See [`parse`].
    pub fn parse(&self, query: &str) -> Vec<(String, String)> {
        parse(&self.schema, query)
    }

    /// See [`serialize`].
    pub fn serialize(&self, state: &FilterState) -> String {
        serialize(state)
    }

    /// Builds the filter state described by the current location.
    pub fn read_location(&self) -> FilterState {
        let query = self.navigator.current_query();
        FilterState::from_query_pairs(Arc::clone(&self.schema), self.parse(&query))
    }

    /// The full query the location should carry for `state`.
    ///
    /// This is [`serialize`] plus, when enabled, the foreign parameters of
    /// the current location.
    pub fn location_for(&self, state: &FilterState) -> String {
        let own = self.serialize(state);
        if !self.options.preserve_foreign_params {
            return own;
        }
        let foreign = foreign_pairs(&self.schema, &self.navigator.current_query());
        if foreign.is_empty() {
            return own;
        }
        let foreign = codec::encode(foreign);
        if own.is_empty() {
            foreign
        } else {
            format!("{own}&{foreign}")
        }
    }

    /// Replaces the current location's query without adding a history entry.
    ///
    /// Does nothing when the location already carries `query`.
    pub fn apply_to_location(&mut self, query: &str) {
        if self.navigator.current_query() == query {
            return;
        }
        debug!(query, "replacing location query");
        self.navigator.replace_query(query);
    }

    /// Adds a history entry carrying `query`.
    pub fn push_location(&mut self, query: &str) {
        debug!(query, "pushing location query");
        self.navigator.push_query(query);
    }

    /// The schema shared with the states this adapter reads.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The adapter options.
    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// The underlying navigator.
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// The underlying navigator, mutably.
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    /// Consumes the adapter, returning the navigator.
    pub fn into_navigator(self) -> N {
        self.navigator
    }
}
