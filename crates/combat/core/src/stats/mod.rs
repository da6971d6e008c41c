//! Attribute layers.
//!
//! - [`attributes`]: the `AttributeSet` value type and its field names
//! - [`bonus`]: modifiers and the per-kind table that applies them
//! - [`aggregator`]: cached composition of base, equipment and modifiers
//! - [`resources`]: the health pool bounded by the aggregated maximum
pub mod aggregator;
pub mod attributes;
pub mod bonus;
pub mod resources;

pub use aggregator::AttributeAggregator;
pub use attributes::{AttributeKind, AttributeSet};
pub use bonus::{AttributeModifier, ModifierMode, ModifierTable};
pub use resources::HealthMeter;
