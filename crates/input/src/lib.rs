//! Input layer: platform key events mapped onto shared actions, gathered
//! into one snapshot per frame.
//!
//! # Invariants
//! - Toggle edges are derived from an explicit previous-frame snapshot.
//! - Pointer and scroll deltas are raw per-frame sums, never absolute positions.

pub mod action;
pub mod snapshot;

pub use action::Action;
pub use snapshot::InputSnapshot;
