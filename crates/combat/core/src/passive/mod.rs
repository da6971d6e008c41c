//! Passively triggered effects bound to combat events.
mod definition;
mod engine;

pub use definition::{PassiveDefinition, PassiveEffect, PassiveTrigger, TriggerKind};
pub use engine::{PassiveAction, PassiveFired, PassiveInstance, PassiveTriggerEngine};
