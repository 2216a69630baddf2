//! Numeric operators for stat values.
//!
//! A [`Stat`](crate::Stat) never performs arithmetic on its own: every
//! comparison, sum and clamp goes through a [`NumericOperator`] for the
//! stat's value type. Canonical operators are provided for `i32`, `f32` and
//! `f64`, and for [`FixedPoint`] when the `fixed-point` feature is enabled.

use crate::registry::OperatorKind;
use std::fmt;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "fixed-point")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "fixed-point")]
use std::cmp::Ordering;
#[cfg(feature = "fixed-point")]
use std::ops::{Add, Div, Mul, Sub};

/// Tolerance used by [`FloatOperator`] for equality and empty ranges.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Tolerance used by [`DoubleOperator`] for equality and empty ranges.
pub const DOUBLE_EPSILON: f64 = 1e-9;

/// Arithmetic and comparison strategy for one numeric type.
///
/// Operators are stateless and every method is pure. Derived predicates
/// (`is_less_or_equal`, `is_between`, ...) and [`clamp`](Self::clamp) have
/// default implementations built on [`is_equal`](Self::is_equal) and
/// [`is_less_than`](Self::is_less_than), so a new numeric type only needs
/// the primitive operations.
///
/// Division by zero is not an error: [`divide`](Self::divide) returns
/// [`zero`](Self::zero) instead. Stats depend on this to stay total over
/// arbitrary caller input.
///
/// # Examples
///
/// ```rust
/// use modstat::numeric::{IntOperator, NumericOperator};
///
/// let op = IntOperator;
/// assert_eq!(op.add(2, 3), 5);
/// assert_eq!(op.divide(10, 0), 0);
/// assert_eq!(op.clamp(150, 0, 100), 100);
/// assert_eq!(op.ratio(5, 5, 5), 0.0);
/// ```
pub trait NumericOperator<T: Copy>: fmt::Debug + Send + Sync {
    /// Additive identity.
    fn zero(&self) -> T;

    /// Multiplicative identity.
    fn one(&self) -> T;

    fn is_equal(&self, a: T, b: T) -> bool;

    fn is_less_than(&self, a: T, b: T) -> bool;

    fn is_less_or_equal(&self, a: T, b: T) -> bool {
        self.is_less_than(a, b) || self.is_equal(a, b)
    }

    fn is_greater_than(&self, a: T, b: T) -> bool {
        !self.is_less_or_equal(a, b)
    }

    fn is_greater_or_equal(&self, a: T, b: T) -> bool {
        !self.is_less_than(a, b)
    }

    /// Inclusive range check.
    fn is_between(&self, value: T, min: T, max: T) -> bool {
        self.is_greater_or_equal(value, min) && self.is_less_or_equal(value, max)
    }

    fn add(&self, a: T, b: T) -> T;

    fn subtract(&self, a: T, b: T) -> T;

    fn multiply(&self, a: T, b: T) -> T;

    /// Divide `a` by `b`, returning [`zero`](Self::zero) when `b` is zero.
    fn divide(&self, a: T, b: T) -> T;

    fn add_one(&self, a: T) -> T {
        self.add(a, self.one())
    }

    /// Clamp `value` into `[min, max]`.
    ///
    /// Never panics. With inverted bounds (`min > max`) the result is always
    /// one of the two bounds: `min` for values below it, `max` otherwise.
    fn clamp(&self, value: T, min: T, max: T) -> T {
        if self.is_less_than(value, min) {
            min
        } else if self.is_greater_than(value, max) {
            max
        } else {
            value
        }
    }

    /// Position of `value` inside `[min, max]`, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` for an empty or inverted range.
    fn ratio(&self, value: T, min: T, max: T) -> f64;
}

/// Operator for `i32` stats: exact comparison, saturating arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntOperator;

impl NumericOperator<i32> for IntOperator {
    fn zero(&self) -> i32 {
        0
    }

    fn one(&self) -> i32 {
        1
    }

    fn is_equal(&self, a: i32, b: i32) -> bool {
        a == b
    }

    fn is_less_than(&self, a: i32, b: i32) -> bool {
        a < b
    }

    fn add(&self, a: i32, b: i32) -> i32 {
        a.saturating_add(b)
    }

    fn subtract(&self, a: i32, b: i32) -> i32 {
        a.saturating_sub(b)
    }

    fn multiply(&self, a: i32, b: i32) -> i32 {
        a.saturating_mul(b)
    }

    fn divide(&self, a: i32, b: i32) -> i32 {
        if b == 0 {
            0
        } else {
            a.saturating_div(b)
        }
    }

    fn ratio(&self, value: i32, min: i32, max: i32) -> f64 {
        if max <= min {
            return 0.0;
        }
        let offset = i64::from(value) - i64::from(min);
        let range = i64::from(max) - i64::from(min);
        (offset as f64 / range as f64).clamp(0.0, 1.0)
    }
}

/// Operator for `f32` stats.
///
/// Equality holds when the values are identical (including equal
/// infinities) or their absolute difference is below [`FLOAT_EPSILON`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FloatOperator;

impl NumericOperator<f32> for FloatOperator {
    fn zero(&self) -> f32 {
        0.0
    }

    fn one(&self) -> f32 {
        1.0
    }

    fn is_equal(&self, a: f32, b: f32) -> bool {
        // infinities only match exactly: inf - inf is NaN
        a == b || (a - b).abs() < FLOAT_EPSILON
    }

    fn is_less_than(&self, a: f32, b: f32) -> bool {
        a < b && !self.is_equal(a, b)
    }

    fn add(&self, a: f32, b: f32) -> f32 {
        a + b
    }

    fn subtract(&self, a: f32, b: f32) -> f32 {
        a - b
    }

    fn multiply(&self, a: f32, b: f32) -> f32 {
        a * b
    }

    fn divide(&self, a: f32, b: f32) -> f32 {
        if b == 0.0 {
            0.0
        } else {
            a / b
        }
    }

    fn clamp(&self, value: f32, min: f32, max: f32) -> f32 {
        // NaN compares false against both bounds
        if value.is_nan() || value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    fn ratio(&self, value: f32, min: f32, max: f32) -> f64 {
        let range = max - min;
        if range <= FLOAT_EPSILON {
            return 0.0;
        }
        let ratio = f64::from((value - min) / range);
        if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Operator for `f64` stats.
///
/// Equality holds when the values are identical (including equal
/// infinities) or their absolute difference is below [`DOUBLE_EPSILON`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoubleOperator;

impl NumericOperator<f64> for DoubleOperator {
    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn is_equal(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() < DOUBLE_EPSILON
    }

    fn is_less_than(&self, a: f64, b: f64) -> bool {
        a < b && !self.is_equal(a, b)
    }

    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    fn subtract(&self, a: f64, b: f64) -> f64 {
        a - b
    }

    fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn divide(&self, a: f64, b: f64) -> f64 {
        if b == 0.0 {
            0.0
        } else {
            a / b
        }
    }

    fn clamp(&self, value: f64, min: f64, max: f64) -> f64 {
        if value.is_nan() || value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    fn ratio(&self, value: f64, min: f64, max: f64) -> f64 {
        let range = max - min;
        if range <= DOUBLE_EPSILON {
            return 0.0;
        }
        let ratio = (value - min) / range;
        if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Numeric types with a canonical operator.
///
/// Implemented for `i32`, `f32`, `f64` and (with `fixed-point`) [`FixedPoint`].
/// The operator is created once per type and shared by every stat that uses
/// it, so resolution is a compile-time fact rather than a runtime lookup.
///
/// # Examples
///
/// ```rust
/// use modstat::numeric::StatNumeric;
/// use modstat::registry::OperatorKind;
///
/// assert_eq!(<i32 as StatNumeric>::KIND, OperatorKind::Int);
/// let op = <f32 as StatNumeric>::operator();
/// assert!(op.is_equal(0.1 + 0.2, 0.3));
/// ```
pub trait StatNumeric: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Tag under which the canonical operator is registered.
    const KIND: OperatorKind;

    /// Shared canonical operator for this type.
    fn operator() -> Arc<dyn NumericOperator<Self>>;
}

impl StatNumeric for i32 {
    const KIND: OperatorKind = OperatorKind::Int;

    fn operator() -> Arc<dyn NumericOperator<Self>> {
        static OPERATOR: OnceLock<Arc<dyn NumericOperator<i32>>> = OnceLock::new();
        OPERATOR.get_or_init(|| Arc::new(IntOperator)).clone()
    }
}

impl StatNumeric for f32 {
    const KIND: OperatorKind = OperatorKind::Float;

    fn operator() -> Arc<dyn NumericOperator<Self>> {
        static OPERATOR: OnceLock<Arc<dyn NumericOperator<f32>>> = OnceLock::new();
        OPERATOR.get_or_init(|| Arc::new(FloatOperator)).clone()
    }
}

impl StatNumeric for f64 {
    const KIND: OperatorKind = OperatorKind::Double;

    fn operator() -> Arc<dyn NumericOperator<Self>> {
        static OPERATOR: OnceLock<Arc<dyn NumericOperator<f64>>> = OnceLock::new();
        OPERATOR.get_or_init(|| Arc::new(DoubleOperator)).clone()
    }
}

/// Fixed-point number for deterministic stat calculations.
///
/// Uses `i64` for the value and `u8` for the scale (number of decimal places).
/// For example, with scale 4, the value 12345 represents 1.2345. Values with
/// different scales compare and combine after normalizing to the larger scale.
///
/// The scale never exceeds [`MAX_SCALE`](Self::MAX_SCALE). Constructors cap
/// it, and deserialization rejects larger scales with an error.
///
/// # Examples
///
/// ```rust
/// use modstat::numeric::FixedPoint;
///
/// let fp = FixedPoint::new(12345, 4);
/// assert_eq!(fp.to_f64(), 1.2345);
/// assert_eq!(FixedPoint::from_int(1), FixedPoint::new(100000, 5));
/// ```
#[cfg(feature = "fixed-point")]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawFixedPoint")]
pub struct FixedPoint {
    value: i64,
    scale: u8,
}

/// Unchecked wire form of [`FixedPoint`].
#[cfg(feature = "fixed-point")]
#[derive(Deserialize)]
struct RawFixedPoint {
    value: i64,
    scale: u8,
}

#[cfg(feature = "fixed-point")]
impl TryFrom<RawFixedPoint> for FixedPoint {
    type Error = String;

    fn try_from(raw: RawFixedPoint) -> Result<Self, Self::Error> {
        if raw.scale > Self::MAX_SCALE {
            return Err(format!(
                "fixed-point scale {} exceeds the maximum of {}",
                raw.scale,
                Self::MAX_SCALE
            ));
        }
        Ok(Self {
            value: raw.value,
            scale: raw.scale,
        })
    }
}

#[cfg(feature = "fixed-point")]
impl FixedPoint {
    /// Default scale for fixed-point numbers (4 decimal places).
    pub const DEFAULT_SCALE: u8 = 4;

    /// Largest supported scale; `10^18` is the largest power of ten in `i64`.
    pub const MAX_SCALE: u8 = 18;

    /// Create a new fixed-point number from its raw scaled value.
    ///
    /// `scale` is capped at [`MAX_SCALE`](Self::MAX_SCALE).
    pub fn new(value: i64, scale: u8) -> Self {
        Self {
            value,
            scale: scale.min(Self::MAX_SCALE),
        }
    }

    /// Create a whole number at the default scale.
    pub fn from_int(i: i64) -> Self {
        Self {
            value: i.saturating_mul(Self::pow10(Self::DEFAULT_SCALE)),
            scale: Self::DEFAULT_SCALE,
        }
    }

    /// Create a fixed-point number from an f64 at the default scale.
    pub fn from_f64(f: f64) -> Self {
        Self::from_f64_with_scale(f, Self::DEFAULT_SCALE)
    }

    /// Create a fixed-point number from an f64 with a specific scale.
    ///
    /// `scale` is capped at [`MAX_SCALE`](Self::MAX_SCALE). Out-of-range
    /// inputs saturate and NaN becomes zero.
    pub fn from_f64_with_scale(f: f64, scale: u8) -> Self {
        let scale = scale.min(Self::MAX_SCALE);
        let multiplier = Self::pow10(scale);
        let value = (f * multiplier as f64).round() as i64;
        Self { value, scale }
    }

    /// Convert to `f64`. Precision is lost for large raw values.
    pub fn to_f64(self) -> f64 {
        let divisor = 10_f64.powi(self.scale as i32);
        self.value as f64 / divisor
    }

    /// Get the raw integer value.
    pub fn value(self) -> i64 {
        self.value
    }

    /// Number of decimal places.
    pub fn scale(self) -> u8 {
        self.scale
    }

    /// `true` for zero at any scale.
    pub fn is_zero(self) -> bool {
        self.value == 0
    }

    /// Rescale both operands to the larger of the two scales.
    fn normalize(self, other: Self) -> (i64, i64, u8) {
        let common_scale = self.scale.max(other.scale);
        let rescale = |fp: Self| {
            let diff = u32::from(common_scale - fp.scale);
            match 10_i64.checked_pow(diff) {
                Some(factor) => fp.value.saturating_mul(factor),
                None if fp.value == 0 => 0,
                None if fp.value > 0 => i64::MAX,
                None => i64::MIN,
            }
        };
        (rescale(self), rescale(other), common_scale)
    }

    fn pow10(scale: u8) -> i64 {
        10_i64.checked_pow(u32::from(scale)).unwrap_or(i64::MAX)
    }

    fn pow10_wide(scale: u8) -> i128 {
        10_i128.checked_pow(u32::from(scale)).unwrap_or(i128::MAX)
    }

    fn saturate(wide: i128) -> i64 {
        wide.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

#[cfg(feature = "fixed-point")]
impl Default for FixedPoint {
    fn default() -> Self {
        Self {
            value: 0,
            scale: Self::DEFAULT_SCALE,
        }
    }
}

#[cfg(feature = "fixed-point")]
impl PartialEq for FixedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

#[cfg(feature = "fixed-point")]
impl Eq for FixedPoint {}

#[cfg(feature = "fixed-point")]
impl PartialOrd for FixedPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "fixed-point")]
impl Ord for FixedPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = self.normalize(*other);
        a.cmp(&b)
    }
}

#[cfg(feature = "fixed-point")]
impl From<f64> for FixedPoint {
    fn from(f: f64) -> Self {
        Self::from_f64(f)
    }
}

#[cfg(feature = "fixed-point")]
impl From<FixedPoint> for f64 {
    fn from(fp: FixedPoint) -> Self {
        fp.to_f64()
    }
}

#[cfg(feature = "fixed-point")]
impl Add for FixedPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let (v1, v2, scale) = self.normalize(other);
        Self {
            value: v1.saturating_add(v2),
            scale,
        }
    }
}

#[cfg(feature = "fixed-point")]
impl Sub for FixedPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let (v1, v2, scale) = self.normalize(other);
        Self {
            value: v1.saturating_sub(v2),
            scale,
        }
    }
}

#[cfg(feature = "fixed-point")]
impl Mul for FixedPoint {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let (v1, v2, scale) = self.normalize(other);
        let product = (v1 as i128 * v2 as i128) / Self::pow10_wide(scale);
        Self {
            value: Self::saturate(product),
            scale,
        }
    }
}

#[cfg(feature = "fixed-point")]
impl Div for FixedPoint {
    type Output = Self;

    /// Panics on a zero divisor; [`FixedOperator::divide`] guards it.
    fn div(self, other: Self) -> Self {
        let (v1, v2, scale) = self.normalize(other);
        let quotient = (v1 as i128).saturating_mul(Self::pow10_wide(scale)) / v2 as i128;
        Self {
            value: Self::saturate(quotient),
            scale,
        }
    }
}

#[cfg(feature = "fixed-point")]
impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

/// Operator for [`FixedPoint`] stats: exact comparison after normalization.
#[cfg(feature = "fixed-point")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedOperator;

#[cfg(feature = "fixed-point")]
impl NumericOperator<FixedPoint> for FixedOperator {
    fn zero(&self) -> FixedPoint {
        FixedPoint::default()
    }

    fn one(&self) -> FixedPoint {
        FixedPoint::from_int(1)
    }

    fn is_equal(&self, a: FixedPoint, b: FixedPoint) -> bool {
        a == b
    }

    fn is_less_than(&self, a: FixedPoint, b: FixedPoint) -> bool {
        a < b
    }

    fn add(&self, a: FixedPoint, b: FixedPoint) -> FixedPoint {
        a + b
    }

    fn subtract(&self, a: FixedPoint, b: FixedPoint) -> FixedPoint {
        a - b
    }

    fn multiply(&self, a: FixedPoint, b: FixedPoint) -> FixedPoint {
        a * b
    }

    fn divide(&self, a: FixedPoint, b: FixedPoint) -> FixedPoint {
        if b.is_zero() {
            self.zero()
        } else {
            a / b
        }
    }

    fn ratio(&self, value: FixedPoint, min: FixedPoint, max: FixedPoint) -> f64 {
        if max <= min {
            return 0.0;
        }
        let ratio = (value - min).to_f64() / (max - min).to_f64();
        ratio.clamp(0.0, 1.0)
    }
}

#[cfg(feature = "fixed-point")]
impl StatNumeric for FixedPoint {
    const KIND: OperatorKind = OperatorKind::Fixed;

    fn operator() -> Arc<dyn NumericOperator<Self>> {
        static OPERATOR: OnceLock<Arc<dyn NumericOperator<FixedPoint>>> = OnceLock::new();
        OPERATOR.get_or_init(|| Arc::new(FixedOperator)).clone()
    }
}
