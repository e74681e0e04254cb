//! Stock [`ActionProvider`](crate::ActionProvider) implementations.
mod auto;
mod enemy;
mod scripted;

pub use auto::AutoPlayerProvider;
pub use enemy::EnemyAiProvider;
pub use scripted::ScriptedProvider;
