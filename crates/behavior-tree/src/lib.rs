//! Deterministic behavior tree nodes for round-based enemy scripting.
//!
//! Every enemy archetype in the battle engine is expressed as a small tree that
//! is ticked exactly once per decision. A tick never suspends: nodes either
//! succeed or fail on the spot, so a tree is a pure function of its blackboard.
//!
//! - **No Running state**: a decision is made within a single tick
//! - **Seeded chance**: [`Chance`] asks the blackboard for a roll instead of
//!   touching a global RNG, which keeps previews identical to real decisions
//! - **Zero dependencies**
//!
//! # Architecture
//!
//! - [`Behavior`]: core trait for all nodes
//! - [`Status`]: Success or Failure
//! - Composite nodes: [`Sequence`], [`Selector`]
//! - Decorator nodes: [`AlwaysSucceed`], [`Chance`]
//! - Leaf nodes built from closures: [`Condition`], [`Action`]

pub mod behavior;
pub mod builder;
pub mod composite;
pub mod decorator;
pub mod leaf;
pub mod status;

pub use behavior::{Behavior, PercentRoll};
pub use composite::{Selector, Sequence};
pub use decorator::{AlwaysSucceed, Chance};
pub use leaf::{Action, Condition};
pub use status::Status;
