//! Stat descriptors.
//!
//! A [`StatDescriptor`] is the data form of a stat: its name, initial value,
//! bounds and operator tag. Descriptors are typically authored as JSON next
//! to other game data and turned into live [`Stat`]s when an entity spawns.

use crate::error::StatError;
use crate::numeric::StatNumeric;
use crate::registry::{OperatorKind, OperatorRegistry};
use crate::stat::Stat;
use crate::stat_id::StatId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Immutable configuration for one stat.
///
/// # Examples
///
/// ```rust
/// use modstat::{OperatorRegistry, StatDescriptor};
///
/// let descriptor: StatDescriptor<f32> = StatDescriptor::from_json(
///     r#"{
///         "stat": "MoveSpeed",
///         "initial_value": 3.5,
///         "min_value": 0.0,
///         "max_value": 10.0,
///         "operator": "float"
///     }"#,
/// )
/// .unwrap();
///
/// let registry = OperatorRegistry::with_defaults();
/// let speed = descriptor.build(&registry).unwrap();
/// assert_eq!(speed.current_value(), 3.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDescriptor<T> {
    /// Name of the stat.
    pub stat: StatId,
    /// Base value on creation, clamped into the bounds.
    pub initial_value: T,
    pub min_value: T,
    pub max_value: T,
    /// Tag of the operator used for this stat's arithmetic.
    pub operator: OperatorKind,
}

impl<T> StatDescriptor<T> {
    /// Create a descriptor with an explicit operator tag.
    pub fn new(
        stat: impl Into<StatId>,
        initial_value: T,
        min_value: T,
        max_value: T,
        operator: OperatorKind,
    ) -> Self {
        Self {
            stat: stat.into(),
            initial_value,
            min_value,
            max_value,
            operator,
        }
    }
}

impl<T: StatNumeric> StatDescriptor<T> {
    /// Descriptor tagged with the canonical operator kind of `T`.
    pub fn with_default_operator(
        stat: impl Into<StatId>,
        initial_value: T,
        min_value: T,
        max_value: T,
    ) -> Self {
        Self::new(stat, initial_value, min_value, max_value, T::KIND)
    }
}

impl<T: DeserializeOwned> StatDescriptor<T> {
    /// Parse a single descriptor from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, StatError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<T> StatDescriptor<T>
where
    T: Copy + PartialOrd + fmt::Debug + fmt::Display + 'static,
{
    /// Check that the bounds are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::InvalidBounds`] if `min_value > max_value`.
    pub fn validate(&self) -> Result<(), StatError> {
        if self.min_value > self.max_value {
            return Err(StatError::InvalidBounds {
                stat: self.stat.clone(),
                min: self.min_value.to_string(),
                max: self.max_value.to_string(),
            });
        }
        Ok(())
    }

    /// Build a live stat, resolving the operator through `registry`.
    ///
    /// # Errors
    ///
    /// - [`StatError::OperatorNotRegistered`] / [`StatError::OperatorTypeMismatch`]
    ///   if the operator tag cannot be resolved for `T`
    /// - [`StatError::InvalidBounds`] if the bounds are inverted
    pub fn build(&self, registry: &OperatorRegistry) -> Result<Stat<T>, StatError> {
        let operator = registry.resolve::<T>(self.operator)?;
        self.validate()?;
        Ok(Stat::new(
            self.initial_value,
            self.min_value,
            self.max_value,
            operator,
        ))
    }
}

impl<T> Stat<T>
where
    T: Copy + PartialOrd + fmt::Debug + fmt::Display + 'static,
{
    /// Build a stat from a descriptor. See [`StatDescriptor::build`].
    pub fn from_descriptor(
        descriptor: &StatDescriptor<T>,
        registry: &OperatorRegistry,
    ) -> Result<Self, StatError> {
        descriptor.build(registry)
    }
}

/// Parse a JSON array of descriptors.
///
/// # Errors
///
/// Returns [`StatError::Config`] if the JSON is malformed.
///
/// # Examples
///
/// ```rust
/// use modstat::descriptor::load_descriptors;
///
/// let descriptors = load_descriptors::<i32>(
///     r#"[
///         { "stat": "HP", "initial_value": 100, "min_value": 0, "max_value": 100, "operator": "int" },
///         { "stat": "AP", "initial_value": 3, "min_value": 0, "max_value": 10, "operator": "int" }
///     ]"#,
/// )
/// .unwrap();
/// assert_eq!(descriptors.len(), 2);
/// ```
pub fn load_descriptors<T: DeserializeOwned>(json: &str) -> Result<Vec<StatDescriptor<T>>, StatError> {
    let descriptors: Vec<StatDescriptor<T>> = serde_json::from_str(json)?;
    debug!(
        target: "modstat::descriptor",
        count = descriptors.len(),
        "Loaded stat descriptors"
    );
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_defaults() {
        let descriptor = StatDescriptor::with_default_operator("HP", 120, 0, 100);
        assert_eq!(descriptor.operator, OperatorKind::Int);

        let stat = descriptor.build(&OperatorRegistry::with_defaults()).unwrap();
        assert_eq!(stat.current_value(), 100);
        assert_eq!(stat.initial_value(), 100);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let descriptor = StatDescriptor::with_default_operator("HP", 5, 10, 0);
        let err = descriptor
            .build(&OperatorRegistry::with_defaults())
            .unwrap_err();
        assert_eq!(
            err,
            StatError::InvalidBounds {
                stat: StatId::from_str("HP"),
                min: "10".into(),
                max: "0".into(),
            }
        );
    }

    #[test]
    fn test_unregistered_operator_rejected() {
        let descriptor = StatDescriptor::with_default_operator("HP", 5, 0, 10);
        let err = Stat::from_descriptor(&descriptor, &OperatorRegistry::new()).unwrap_err();
        assert_eq!(
            err,
            StatError::OperatorNotRegistered {
                kind: OperatorKind::Int
            }
        );
    }

    #[test]
    fn test_mismatched_operator_rejected() {
        let descriptor = StatDescriptor::new("Speed", 1.0_f32, 0.0, 2.0, OperatorKind::Double);
        let err = descriptor
            .build(&OperatorRegistry::with_defaults())
            .unwrap_err();
        assert!(matches!(
            err,
            StatError::OperatorTypeMismatch {
                kind: OperatorKind::Double,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json() {
        let err = StatDescriptor::<i32>::from_json(r#"{ "stat": "HP" }"#).unwrap_err();
        assert!(matches!(err, StatError::Config(_)));

        let err = load_descriptors::<i32>("[").unwrap_err();
        assert!(matches!(err, StatError::Config(_)));
    }

    #[test]
    fn test_unknown_operator_tag_is_config_error() {
        let err = StatDescriptor::<i32>::from_json(
            r#"{ "stat": "HP", "initial_value": 1, "min_value": 0, "max_value": 2, "operator": "decimal" }"#,
        )
        .unwrap_err();
        assert!(matches!(err, StatError::Config(_)));
    }
}
