//! Event distribution for runtime consumers.
mod bus;

pub use bus::{EventBus, Topic};
