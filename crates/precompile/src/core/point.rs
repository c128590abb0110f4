use std::fmt;

use alloy::primitives::U256;

/// An affine curve point as the precompile reads and writes it. The point at infinity is
/// `(0, 0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EcPoint {
    /// x coordinate
    pub x: U256,
    /// y coordinate
    pub y: U256,
}

impl EcPoint {
    /// The point at infinity.
    pub const INFINITY: EcPoint = EcPoint { x: U256::ZERO, y: U256::ZERO };

    /// Creates a point from its coordinates.
    pub const fn new(x: U256, y: U256) -> Self {
        Self { x, y }
    }

    /// Returns true for the point at infinity.
    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }
}

impl fmt::Display for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:#x}, {:#x})", self.x, self.y)
    }
}
