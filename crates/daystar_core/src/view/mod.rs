//! Read-only projections computed from store snapshots.
//!
//! Views never touch storage; they are recomputed by the presentation layer
//! after each change notification or clock tick.

pub mod day_view;
