//! Rich assertion helpers with diagnostic output. Every failure names the
//! offending component and both values.

use gravity_kernel::numeric::{relative_eq, EPSILON_RELATIVE};
use gravity_kernel::GravityResult;

use crate::helpers::HarnessError;

/// Asserts that two scalars agree under the relative predicate.
pub fn assert_scalar_eq(
    actual: f64,
    expected: f64,
    epsilon: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    if relative_eq(actual, expected, epsilon) {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected {expected}, got {actual} (epsilon={epsilon})"),
        })
    }
}

/// Asserts that every component of two result triples agrees under the
/// relative predicate with the default epsilon.
pub fn assert_results_eq(
    actual: &GravityResult,
    expected: &GravityResult,
    ctx: &str,
) -> Result<(), HarnessError> {
    assert_results_eq_with(actual, expected, EPSILON_RELATIVE, ctx)
}

/// Like [`assert_results_eq`] with an explicit epsilon.
pub fn assert_results_eq_with(
    actual: &GravityResult,
    expected: &GravityResult,
    epsilon: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    assert_scalar_eq(
        actual.potential,
        expected.potential,
        epsilon,
        &format!("{ctx}: potential"),
    )?;
    let axes = ["x", "y", "z"];
    for (axis, (a, e)) in axes.iter().zip(
        actual
            .acceleration
            .to_array()
            .iter()
            .zip(expected.acceleration.to_array().iter()),
    ) {
        assert_scalar_eq(*a, *e, epsilon, &format!("{ctx}: acceleration {axis}"))?;
    }
    let components = ["xx", "yy", "zz", "xy", "xz", "yz"];
    for (component, (a, e)) in components.iter().zip(
        actual
            .tensor
            .to_array()
            .iter()
            .zip(expected.tensor.to_array().iter()),
    ) {
        assert_scalar_eq(*a, *e, epsilon, &format!("{ctx}: tensor {component}"))?;
    }
    Ok(())
}
