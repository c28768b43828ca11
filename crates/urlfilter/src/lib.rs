//! urlfilter - Multi-criteria record filtering mirrored into the URL.
//!
//! A filtered table view is only shareable if its filters live in the
//! location. This crate keeps the two consistent:
//!
//! - [`FilterState`]: the active criteria, keyed by a fixed [`Schema`]
//! - [`QuerySync`]: reads a state from the query string and writes it back
//! - [`FilterEvaluator`] / [`evaluate`]: the rows a state selects
//! - [`FilterView`]: a mounted view tying the three together with
//!   history-aware updates
//!
//! # Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//! use urlfilter::{CriterionSpec, FilterView, MemoryHistory, Navigator, QuerySync, Schema};
//!
//! let schema = Arc::new(Schema::new([
//!     CriterionSpec::text("region", "Region"),
//!     CriterionSpec::min("minSales", "Sales"),
//! ]).unwrap());
//!
//! let data = vec![
//!     BTreeMap::from([
//!         ("Region".to_string(), Some("Tokyo".to_string())),
//!         ("Sales".to_string(), Some("500".to_string())),
//!     ]),
//!     BTreeMap::from([
//!         ("Region".to_string(), Some("Osaka".to_string())),
//!         ("Sales".to_string(), None),
//!     ]),
//! ];
//!
//! let history = MemoryHistory::new("?region=Tokyo");
//! let mut view = FilterView::mount(&data, QuerySync::new(schema, history));
//! assert_eq!(view.rows().len(), 1);
//!
//! view.edit("minSales", "600");
//! assert!(view.rows().is_empty());
//! assert_eq!(view.navigator().current_query(), "region=Tokyo&minSales=600");
//! ```
//!
//! # Normalization
//!
//! Nothing in the filtering path returns an error. Input is normalized:
//!
//! | Input | Result |
//! |-------|--------|
//! | empty text | criterion absent |
//! | unparsable number, `NaN`, infinity | criterion absent |
//! | unknown query parameter | ignored |
//! | record field missing or non-numeric | fails a numeric criterion |
//!
//! A threshold of `0` is a real filter: it excludes rows with no value.
//!
//! # Criteria
//!
//! | Kind | Matches when |
//! |------|--------------|
//! | `text` (`contains`) | the field contains the value, case-sensitive |
//! | `text` (`exact`) | the field equals the value |
//! | `min` | the field is a number `>=` the value |
//!
//! All present criteria must match.

mod clause;
pub mod codec;
mod criterion;
mod error;
mod evaluate;
mod navigator;
mod op;
mod state;
mod sync;
mod traits;
mod value;
mod view;

// Re-export public API
pub use clause::{Clause, ClauseValue};
pub use criterion::{CriterionKind, CriterionSpec, Schema, TextMatch};
pub use error::{Result, SchemaError};
pub use evaluate::{count, evaluate, matches, FilterEvaluator};
pub use navigator::{History, MemoryHistory, Navigator};
pub use op::Op;
pub use state::{CriterionValue, Edit, FilterState};
pub use sync::{parse, serialize, QuerySync, SyncOptions};
pub use traits::Filterable;
pub use value::{Number, Value};
pub use view::FilterView;
