//! # modstat - Bounded Game Stats with Layered Modifiers
//!
//! A small, engine-agnostic stat model for games:
//! - **Bounded** values: every stat has a base, a minimum and a maximum
//! - **Layered** modifiers: flat, additive-percent and multiplicative-percent
//! - **Deterministic** ordering: modifiers apply by `order`, ties by insertion
//! - **Generic** arithmetic: any numeric type with a [`NumericOperator`]
//! - **Change notification**: listeners fire only when the value changes
//!
//! ## Core Concepts
//!
//! ### Recomputation
//!
//! ```text
//! [base] → [Flat / PercentAdd / PercentMult ...] → [clamp min..max] → [current]
//! ```
//!
//! 1. **Flat** modifiers add a constant
//! 2. **PercentAdd** modifiers next to each other are summed, then applied once
//! 3. **PercentMult** modifiers multiply one at a time (compounding)
//! 4. The result is clamped into the stat's bounds
//!
//! ## Example
//!
//! ```rust
//! use modstat::*;
//!
//! let mut hp = Stat::with_default_operator(100.0_f64, 0.0, 1000.0);
//!
//! hp.add_modifier(StatModifier::percent_add(0.10));
//! hp.add_modifier(StatModifier::percent_add(0.20));
//! assert!((hp.current_value() - 130.0).abs() < 1e-9); // 100 × (1 + 0.30)
//!
//! hp.clear_modifiers();
//! hp.add_modifier(StatModifier::percent_mult(0.10));
//! hp.add_modifier(StatModifier::percent_mult(0.20));
//! assert!((hp.current_value() - 132.0).abs() < 1e-9); // 100 × 1.10 × 1.20
//! ```
//!
//! ## Modules
//!
//! - [`numeric`] - Operator contract and built-in numeric operators
//! - [`registry`] - Operator lookup by [`OperatorKind`] tag
//! - [`modifier`] - Modifier kinds and values
//! - [`stat`] - The stat itself
//! - [`listener`] - Change listener handles
//! - [`breakdown`] - Step-by-step recomputation traces
//! - [`snapshot`] - Persistable base/bounds state
//! - [`descriptor`] - Data-driven stat configuration
//! - [`sheet`] - Named collections of stats
//! - [`stat_id`] / [`source`] - Identifiers
//! - [`error`] - Error types

pub mod breakdown;
pub mod descriptor;
pub mod error;
pub mod listener;
pub mod modifier;
pub mod numeric;
pub mod registry;
pub mod sheet;
pub mod snapshot;
pub mod source;
pub mod stat;
pub mod stat_id;

// Re-export main types for convenience
pub use breakdown::StatBreakdown;
pub use descriptor::StatDescriptor;
pub use error::StatError;
pub use listener::ListenerId;
pub use modifier::{ModifierId, ModifierKind, StatModifier};
pub use registry::{OperatorKind, OperatorRegistry};
pub use sheet::StatSheet;
pub use snapshot::StatSnapshot;
pub use source::SourceId;
pub use stat::Stat;
pub use stat_id::StatId;

// Re-export numeric types
#[cfg(feature = "fixed-point")]
pub use numeric::{FixedOperator, FixedPoint};
pub use numeric::{DoubleOperator, FloatOperator, IntOperator, NumericOperator, StatNumeric};
