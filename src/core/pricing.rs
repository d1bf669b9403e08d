//! Pricing and promotion policy - pure computation, no database access.
//!
//! A product participates in promotion unless its `promote` flag is
//! explicitly `false`. Effective prices are always derived from the
//! immutable base price, so applying a discount is idempotent: running the
//! repricing twice at the same percentage yields the same result as once.

/// Returns whether a product with the given promote flag participates in
/// promotions. Unset counts as participating.
#[must_use]
pub const fn applies_promotion(promote: Option<bool>) -> bool {
    !matches!(promote, Some(false))
}

/// Returns whether a restaurant-level discount is active. Exactly zero means
/// "no promotion is running".
#[must_use]
#[allow(clippy::float_cmp)]
pub fn has_discount(discount_percent: f64) -> bool {
    discount_percent != 0.0
}

/// The multiplier applied to a base price under a percentage discount.
///
/// Floored at zero: a discount above 100% prices the product at 0 rather
/// than producing a negative price.
#[must_use]
pub fn discount_factor(discount_percent: f64) -> f64 {
    (1.0 - discount_percent / 100.0).max(0.0)
}

/// The effective price of a product under a percentage discount.
#[must_use]
pub fn effective_price(base_price: f64, discount_percent: f64) -> f64 {
    base_price * discount_factor(discount_percent)
}
