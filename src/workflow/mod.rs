//! Activity lifecycle policy
//!
//! Pure state-graph and role rules, kept free of storage and HTTP concerns
//! so they can be tested on their own.

pub mod authorizer;
pub mod transitions;

pub use transitions::{evaluate, TransitionRule, TRANSITION_TABLE};
