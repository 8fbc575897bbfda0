//! Packed (address, day) keys
//!
//! A key holds the start address of a range in the high bits and the first
//! day of its validity in the low 16 bits, so the natural `u64` ordering is
//! the lexicographic ordering of `(address, day)`.

use std::fmt;

use super::address::number_to_address;
use super::date::{number_to_date, DayNumber};

const DAY_BITS: u32 = 16;
const DAY_MASK: u64 = (1 << DAY_BITS) - 1;

/// Order-preserving key for the range tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeKey(u64);

impl RangeKey {
    /// Pack a start address and first validity day
    pub fn new(address: u32, day: DayNumber) -> Self {
        RangeKey((u64::from(address) << DAY_BITS) | u64::from(day))
    }

    /// Greatest key for `address`, i.e. the key just below `(address + 1, 0)`
    pub fn last_for(address: u32) -> Self {
        Self::new(address, DayNumber::MAX)
    }

    /// Start address encoded in this key
    pub fn address(&self) -> u32 {
        (self.0 >> DAY_BITS) as u32
    }

    /// First validity day encoded in this key
    pub fn day(&self) -> DayNumber {
        (self.0 & DAY_MASK) as DayNumber
    }
}

impl fmt::Display for RangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            number_to_address(self.address()),
            number_to_date(self.day())
        )
    }
}
