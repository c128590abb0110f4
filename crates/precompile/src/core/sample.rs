//! Trial planning: the fixed edge cases, then seeded random trials.
//!
//! Random trial `i` of a run with base seed `s` draws its inputs from an RNG seeded with
//! `s + i` (wrapping), so any single trial can be replayed from its own seed.

use std::fmt;

use alloy::primitives::U256;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    core::{point::EcPoint, reference},
    interfaces::Curve,
};

/// What a trial exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// The generator times zero.
    ZeroScalar,
    /// The generator times the group order.
    GroupOrder,
    /// The point at infinity times a random scalar.
    PointAtInfinity,
    /// The generator times one.
    UnitScalar,
    /// The generator times the group order minus one.
    OrderMinusOne,
    /// The generator times `2^256 - 1`.
    MaxScalar,
    /// A random point times zero.
    ZeroScalarRandomPoint,
    /// A random point times a random scalar.
    Random,
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Case::ZeroScalar => "zero scalar",
            Case::GroupOrder => "scalar = group order",
            Case::PointAtInfinity => "point at infinity",
            Case::UnitScalar => "unit scalar",
            Case::OrderMinusOne => "scalar = group order - 1",
            Case::MaxScalar => "scalar = 2^256 - 1",
            Case::ZeroScalarRandomPoint => "random point, zero scalar",
            Case::Random => "random",
        };
        f.write_str(name)
    }
}

/// One planned scalar multiplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    /// Position in the run.
    pub index: usize,
    /// The seed this trial's inputs were drawn with.
    pub seed: u64,
    /// What this trial exercises.
    pub case: Case,
    /// The point to multiply.
    pub point: EcPoint,
    /// The scalar to multiply by.
    pub scalar: U256,
}

fn random_word(rng: &mut StdRng) -> U256 {
    U256::from_limbs(rng.gen::<[u64; 4]>())
}

/// A random multiple of the generator.
fn random_point(curve: Curve, rng: &mut StdRng) -> EcPoint {
    let multiple = random_word(rng) % reference::group_order(curve);

    // a random multiple is never infinity unless it is zero
    reference::ec_mul(curve, reference::generator(curve), multiple)
        .unwrap_or_else(|| reference::generator(curve))
}

/// The fixed edge cases, which every run executes before its random trials.
pub fn edge_cases(curve: Curve, base_seed: u64) -> Vec<Trial> {
    let generator = reference::generator(curve);
    let order = reference::group_order(curve);
    let mut rng = StdRng::seed_from_u64(base_seed);
    let infinity_scalar = random_word(&mut rng);
    let zeroed_point = random_point(curve, &mut rng);

    [
        (Case::ZeroScalar, generator, U256::ZERO),
        (Case::GroupOrder, generator, order),
        (Case::PointAtInfinity, EcPoint::INFINITY, infinity_scalar),
        (Case::UnitScalar, generator, U256::from(1)),
        (Case::OrderMinusOne, generator, order - U256::from(1)),
        (Case::MaxScalar, generator, U256::MAX),
        (Case::ZeroScalarRandomPoint, zeroed_point, U256::ZERO),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (case, point, scalar))| Trial { index, seed: base_seed, case, point, scalar })
    .collect()
}

/// Draws a random trial from `seed`: a random multiple of the generator and a random 256-bit
/// scalar.
pub fn random_trial(curve: Curve, index: usize, seed: u64) -> Trial {
    let mut rng = StdRng::seed_from_u64(seed);
    let point = random_point(curve, &mut rng);
    let scalar = random_word(&mut rng);

    Trial { index, seed, case: Case::Random, point, scalar }
}

/// Plans a full run: the edge cases, then `trials` random trials seeded from `base_seed`.
pub fn plan(curve: Curve, trials: usize, base_seed: u64) -> Vec<Trial> {
    let mut plan = edge_cases(curve, base_seed);
    let offset = plan.len();

    plan.extend((0..trials).map(|i| {
        random_trial(curve, offset + i, base_seed.wrapping_add(i as u64))
    }));
    plan
}
