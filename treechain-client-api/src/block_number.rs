use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Add, AddAssign},
};

/// Position of a `Block` in the chain. The genesis block has number 0.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockNumber(u64);

impl BlockNumber {
    /// The number of the genesis block.
    #[must_use]
    pub const fn genesis() -> Self {
        Self(0)
    }

    /// The number of the block that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Whether this is the number of the genesis block.
    #[must_use]
    pub const fn is_genesis(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add<u64> for BlockNumber {
    type Output = Self;
    fn add(self, other: u64) -> Self {
        Self(self.0 + other)
    }
}

impl AddAssign<u64> for BlockNumber {
    fn add_assign(&mut self, other: u64) {
        self.0 += other;
    }
}

impl From<u64> for BlockNumber {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<BlockNumber> for u64 {
    fn from(v: BlockNumber) -> Self {
        v.0
    }
}
