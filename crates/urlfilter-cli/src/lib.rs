//! urlfilter-cli - terminal front end for `urlfilter`.
//!
//! Loads a dataset and a criterion schema, mounts a [`urlfilter::FilterView`]
//! on an in-memory history seeded from `--query`, and renders the matching
//! rows as a table. With `--interactive`, criteria are edited one command at
//! a time and the location is printed after every change.

pub mod cli;
pub mod dataset;
pub mod logging;
pub mod render;
pub mod schema;
pub mod session;
