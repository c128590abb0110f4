//! Scalar multiplication on alt_bn128 (EIP-196) with plain modular arithmetic on 256-bit
//! words, in affine coordinates. The point at infinity is written `(0, 0)`.

use alloy::primitives::{uint, U256};

/// The base field modulus.
pub const FIELD_MODULUS: U256 =
    uint!(0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47_U256);

/// The order of the group of points.
pub const GROUP_ORDER: U256 =
    uint!(0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001_U256);

/// The `b` coefficient of `y^2 = x^3 + b`.
const B: U256 = uint!(3_U256);

/// An affine point; `None` is the point at infinity.
type Point = Option<(U256, U256)>;

fn add(a: U256, b: U256) -> U256 {
    a.add_mod(b, FIELD_MODULUS)
}

fn sub(a: U256, b: U256) -> U256 {
    a.add_mod(FIELD_MODULUS - b, FIELD_MODULUS)
}

fn mul(a: U256, b: U256) -> U256 {
    a.mul_mod(b, FIELD_MODULUS)
}

fn inv(a: U256) -> U256 {
    a.pow_mod(FIELD_MODULUS - uint!(2_U256), FIELD_MODULUS)
}

/// Returns true if `(x, y)` lies on the curve.
pub fn is_on_curve(x: U256, y: U256) -> bool {
    x < FIELD_MODULUS && y < FIELD_MODULUS && mul(y, y) == add(mul(mul(x, x), x), B)
}

fn double(point: Point) -> Point {
    let (x, y) = point?;
    if y.is_zero() {
        return None;
    }

    let lambda = mul(mul(uint!(3_U256), mul(x, x)), inv(add(y, y)));
    let x3 = sub(mul(lambda, lambda), add(x, x));
    let y3 = sub(mul(lambda, sub(x, x3)), y);
    Some((x3, y3))
}

fn add_points(p: Point, q: Point) -> Point {
    let Some((x1, y1)) = p else { return q };
    let Some((x2, y2)) = q else { return p };

    if x1 == x2 {
        return if y1 == y2 { double(p) } else { None };
    }

    let lambda = mul(sub(y2, y1), inv(sub(x2, x1)));
    let x3 = sub(sub(mul(lambda, lambda), x1), x2);
    let y3 = sub(mul(lambda, sub(x1, x3)), y1);
    Some((x3, y3))
}

/// Multiplies `(x, y)` by `scalar`. Returns `None` if the point is neither on the curve nor
/// the point at infinity.
pub fn ec_mul(x: U256, y: U256, scalar: U256) -> Option<(U256, U256)> {
    let point = if x.is_zero() && y.is_zero() {
        None
    } else if is_on_curve(x, y) {
        Some((x, y))
    } else {
        return None;
    };

    let mut result: Point = None;
    for i in (0..256).rev() {
        result = double(result);
        if scalar.bit(i) {
            result = add_points(result, point);
        }
    }

    Some(result.unwrap_or((U256::ZERO, U256::ZERO)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: (U256, U256) = (uint!(1_U256), uint!(2_U256));

    // 2G on alt_bn128
    const G2: (U256, U256) = (
        uint!(0x030644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd3_U256),
        uint!(0x15ed738c0e0a7c92e7845f96b2ae9c0a68a6a449e3538fc7ff3ebf7a5a18a2c4_U256),
    );

    #[test]
    fn test_generator_is_on_curve() {
        assert!(is_on_curve(G.0, G.1));
        assert!(is_on_curve(G2.0, G2.1));
        assert!(!is_on_curve(G.0, G.1 + uint!(1_U256)));
    }

    #[test]
    fn test_small_multiples() {
        assert_eq!(ec_mul(G.0, G.1, uint!(1_U256)), Some(G));
        assert_eq!(ec_mul(G.0, G.1, uint!(2_U256)), Some(G2));
        assert_eq!(
            ec_mul(G.0, G.1, uint!(3_U256)),
            add_points(Some(G), Some(G2))
        );
    }

    #[test]
    fn test_edge_cases_yield_infinity() {
        let infinity = Some((U256::ZERO, U256::ZERO));

        assert_eq!(ec_mul(G.0, G.1, U256::ZERO), infinity);
        assert_eq!(ec_mul(G.0, G.1, GROUP_ORDER), infinity);
        assert_eq!(ec_mul(U256::ZERO, U256::ZERO, uint!(5_U256)), infinity);
    }

    #[test]
    fn test_order_minus_one_negates() {
        let negated = ec_mul(G.0, G.1, GROUP_ORDER - uint!(1_U256));
        assert_eq!(negated, Some((G.0, FIELD_MODULUS - G.1)));
    }

    #[test]
    fn test_scalar_is_not_reduced_before_use() {
        assert_eq!(ec_mul(G.0, G.1, GROUP_ORDER + uint!(2_U256)), Some(G2));
        assert_eq!(ec_mul(G2.0, G2.1, U256::MAX), ec_mul(G2.0, G2.1, U256::MAX % GROUP_ORDER));
    }

    #[test]
    fn test_invalid_point() {
        assert_eq!(ec_mul(uint!(1_U256), uint!(3_U256), uint!(2_U256)), None);
        assert_eq!(ec_mul(FIELD_MODULUS + uint!(1_U256), uint!(2_U256), uint!(2_U256)), None);
    }
}
