//! The reference implementation: arkworks' BN254 G1.

use alloy::primitives::U256;
use ark_bn254::{Fq, Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, PrimeField};

use crate::{core::point::EcPoint, interfaces::Curve};

fn to_field(value: U256) -> Option<Fq> {
    Fq::from_bigint(BigInt::new(*value.as_limbs()))
}

fn from_field(value: Fq) -> U256 {
    U256::from_limbs(value.into_bigint().0)
}

fn from_affine(point: G1Affine) -> EcPoint {
    if point.infinity {
        EcPoint::INFINITY
    } else {
        EcPoint::new(from_field(point.x), from_field(point.y))
    }
}

/// The order of the curve's group of points.
pub fn group_order(curve: Curve) -> U256 {
    match curve {
        Curve::AltBn128 => U256::from_limbs(Fr::MODULUS.0),
    }
}

/// The curve's generator.
pub fn generator(curve: Curve) -> EcPoint {
    match curve {
        Curve::AltBn128 => from_affine(G1Affine::generator()),
    }
}

/// Multiplies `point` by `scalar`, with the precompile's semantics: the full 256-bit scalar
/// is used, and `(0, 0)` is the point at infinity. Returns `None` for coordinates outside the
/// field or points off the curve, which the precompile rejects.
pub fn ec_mul(curve: Curve, point: EcPoint, scalar: U256) -> Option<EcPoint> {
    match curve {
        Curve::AltBn128 => {
            let point = if point.is_infinity() {
                G1Affine::identity()
            } else {
                // the cofactor is one, so every point on the curve is in the group
                let affine = G1Affine::new_unchecked(to_field(point.x)?, to_field(point.y)?);
                if !affine.is_on_curve() {
                    return None;
                }
                affine
            };

            Some(from_affine(point.mul_bigint(scalar.as_limbs()).into_affine()))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::uint;

    use super::*;

    const CURVE: Curve = Curve::AltBn128;

    #[test]
    fn test_generator_and_order() {
        assert_eq!(generator(CURVE), EcPoint::new(U256::from(1), U256::from(2)));
        assert_eq!(
            group_order(CURVE),
            uint!(0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001_U256)
        );
    }

    #[test]
    fn test_doubling() {
        let doubled = ec_mul(CURVE, generator(CURVE), U256::from(2)).expect("valid point");
        assert_eq!(
            doubled,
            EcPoint::new(
                uint!(0x030644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd3_U256),
                uint!(0x15ed738c0e0a7c92e7845f96b2ae9c0a68a6a449e3538fc7ff3ebf7a5a18a2c4_U256),
            )
        );
    }

    #[test]
    fn test_infinity_cases() {
        let g = generator(CURVE);
        assert_eq!(ec_mul(CURVE, g, U256::ZERO), Some(EcPoint::INFINITY));
        assert_eq!(ec_mul(CURVE, g, group_order(CURVE)), Some(EcPoint::INFINITY));
        assert_eq!(ec_mul(CURVE, EcPoint::INFINITY, U256::from(9)), Some(EcPoint::INFINITY));
    }

    #[test]
    fn test_zero_scalar_gives_infinity_for_any_point() {
        for multiple in [2u64, 7, 0xdead_beef, u64::MAX] {
            let point = ec_mul(CURVE, generator(CURVE), U256::from(multiple)).expect("valid point");
            assert!(!point.is_infinity());
            assert_eq!(ec_mul(CURVE, point, U256::ZERO), Some(EcPoint::INFINITY));
        }

        let near_order = ec_mul(CURVE, generator(CURVE), group_order(CURVE) - U256::from(2))
            .expect("valid point");
        assert_eq!(ec_mul(CURVE, near_order, U256::ZERO), Some(EcPoint::INFINITY));
    }

    #[test]
    fn test_rejects_invalid_points() {
        assert_eq!(ec_mul(CURVE, EcPoint::new(U256::from(1), U256::from(3)), U256::from(1)), None);
        let outside = EcPoint::new(U256::MAX, U256::from(2));
        assert_eq!(ec_mul(CURVE, outside, U256::from(1)), None);
    }
}
