//! Operator registry.
//!
//! Stats built from data (see [`StatDescriptor`](crate::StatDescriptor))
//! name their operator with an [`OperatorKind`] tag. The registry maps each
//! tag to exactly one operator for one concrete numeric type, and resolving a
//! tag for any other type fails loudly instead of falling back to a default.

use crate::error::StatError;
use crate::numeric::{NumericOperator, StatNumeric};
use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::error;

/// Tag naming the arithmetic a stat uses.
///
/// Serialized in lowercase (`"int"`, `"float"`, `"double"`, `"fixed"`) so
/// descriptor files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    /// `i32` arithmetic.
    Int,
    /// `f32` arithmetic.
    Float,
    /// `f64` arithmetic.
    Double,
    /// Fixed-point arithmetic (`fixed-point` feature).
    Fixed,
}

impl OperatorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperatorKind::Int => "int",
            OperatorKind::Float => "float",
            OperatorKind::Double => "double",
            OperatorKind::Fixed => "fixed",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct RegisteredOperator {
    type_name: &'static str,
    // Always an `Arc<dyn NumericOperator<T>>` for the registered `T`.
    operator: Box<dyn Any + Send + Sync>,
}

/// Maps [`OperatorKind`] tags to operators.
///
/// # Examples
///
/// ```rust
/// use modstat::registry::{OperatorKind, OperatorRegistry};
///
/// let registry = OperatorRegistry::with_defaults();
/// let op = registry.resolve::<i32>(OperatorKind::Int).unwrap();
/// assert_eq!(op.add(1, 2), 3);
///
/// // The "int" tag is bound to i32, asking for f32 is a configuration error.
/// assert!(registry.resolve::<f32>(OperatorKind::Int).is_err());
/// ```
#[derive(Default)]
pub struct OperatorRegistry {
    operators: HashMap<OperatorKind, RegisteredOperator>,
}

impl OperatorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the canonical operator of every built-in
    /// numeric type.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_numeric::<i32>();
        registry.register_numeric::<f32>();
        registry.register_numeric::<f64>();
        #[cfg(feature = "fixed-point")]
        registry.register_numeric::<crate::numeric::FixedPoint>();
        registry
    }

    /// Bind `kind` to `operator`, replacing any previous binding.
    pub fn register<T>(&mut self, kind: OperatorKind, operator: Arc<dyn NumericOperator<T>>)
    where
        T: Copy + 'static,
    {
        self.operators.insert(
            kind,
            RegisteredOperator {
                type_name: type_name::<T>(),
                operator: Box::new(operator),
            },
        );
    }

    /// Bind the canonical operator of `T` under `T::KIND`.
    pub fn register_numeric<T: StatNumeric>(&mut self) {
        self.register(T::KIND, T::operator());
    }

    /// `true` if an operator is bound under `kind`, for any value type.
    pub fn contains(&self, kind: OperatorKind) -> bool {
        self.operators.contains_key(&kind)
    }

    /// Resolve the operator bound to `kind` for values of type `T`.
    ///
    /// # Errors
    ///
    /// - [`StatError::OperatorNotRegistered`] if nothing is bound to `kind`
    /// - [`StatError::OperatorTypeMismatch`] if `kind` is bound to another type
    pub fn resolve<T>(&self, kind: OperatorKind) -> Result<Arc<dyn NumericOperator<T>>, StatError>
    where
        T: Copy + 'static,
    {
        let Some(entry) = self.operators.get(&kind) else {
            error!(
                target: "modstat::registry",
                kind = %kind,
                requested = type_name::<T>(),
                "No operator registered"
            );
            return Err(StatError::OperatorNotRegistered { kind });
        };

        match entry.operator.downcast_ref::<Arc<dyn NumericOperator<T>>>() {
            Some(operator) => Ok(Arc::clone(operator)),
            None => {
                error!(
                    target: "modstat::registry",
                    kind = %kind,
                    registered = entry.type_name,
                    requested = type_name::<T>(),
                    "Operator registered for a different numeric type"
                );
                Err(StatError::OperatorTypeMismatch {
                    kind,
                    requested: type_name::<T>(),
                })
            }
        }
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self
            .operators
            .iter()
            .map(|(kind, entry)| (*kind, entry.type_name))
            .collect();
        kinds.sort();
        f.debug_struct("OperatorRegistry")
            .field("operators", &kinds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::IntOperator;

    #[test]
    fn test_defaults_resolve() {
        let registry = OperatorRegistry::with_defaults();
        assert!(registry.resolve::<i32>(OperatorKind::Int).is_ok());
        assert!(registry.resolve::<f32>(OperatorKind::Float).is_ok());
        assert!(registry.resolve::<f64>(OperatorKind::Double).is_ok());
    }

    #[test]
    fn test_missing_operator_fails() {
        let registry = OperatorRegistry::new();
        let err = registry.resolve::<i32>(OperatorKind::Int).unwrap_err();
        assert_eq!(
            err,
            StatError::OperatorNotRegistered {
                kind: OperatorKind::Int
            }
        );
    }

    #[test]
    fn test_type_mismatch_fails() {
        let registry = OperatorRegistry::with_defaults();
        let err = registry.resolve::<i64>(OperatorKind::Int).unwrap_err();
        assert!(matches!(err, StatError::OperatorTypeMismatch { .. }));
        assert!(err.to_string().contains("i64"));
    }

    #[test]
    fn test_register_replaces_binding() {
        let mut registry = OperatorRegistry::new();
        registry.register::<i32>(OperatorKind::Int, Arc::new(IntOperator));
        assert!(registry.contains(OperatorKind::Int));
        registry.register_numeric::<f32>();
        assert!(registry.resolve::<f32>(OperatorKind::Float).is_ok());
        assert!(!registry.contains(OperatorKind::Double));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&OperatorKind::Double).unwrap();
        assert_eq!(json, "\"double\"");
        let kind: OperatorKind = serde_json::from_str("\"int\"").unwrap();
        assert_eq!(kind, OperatorKind::Int);
    }
}
