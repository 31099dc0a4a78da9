//! # Filter evaluation
//!
//! Predicate construction over the dashboard's filter controls: multi-select
//! category lists, free-text substring search, numeric min/max ranges, and
//! single-value exact matches.
//!
//! Semantics are conjunctive across dimensions (a record must pass every
//! active filter) and disjunctive within a multi-select (any selected value
//! passes). An empty or unusable input deactivates that dimension; filters
//! only ever narrow, they never fail a record on bad input.

pub mod deals;
pub mod predicates;

pub use deals::{AccountFilters, QuarterFilters};
pub use predicates::{exact_matches, multi_select_matches, parse_bound, text_contains, within_range};
