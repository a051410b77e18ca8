//! Input (box) selection
//!
//! Given an ordered pool of [`ValueRecord`](crate::types::ValueRecord)s and a
//! [`SelectionTarget`](types::SelectionTarget), choose which records to spend.
//!
//! # Module Structure
//!
//! - `types.rs` - strategy enum, target and result types
//! - `selector.rs` - [`BoxSelector`](selector::BoxSelector) and the `select` entry point
//! - `strategies/` - one file per policy
//!   - `first_fit.rs` - pool order, no backtracking
//!   - `largest_first.rs` - descending value, stable on ties
//!
//! Selection is a pure function of its inputs: the pool is never mutated and
//! no state is shared between calls.

pub mod selector;
pub mod strategies;
pub mod types;

pub use selector::{select, BoxSelector};
pub use types::{SelectionResult, SelectionStrategy, SelectionTarget};
