use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::config::{FIXED8_DECIMALS, FIXED8_ONE};

/// Fixed point amount with 8 decimals stored as its raw satoshi count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fixed8(i64);

impl Fixed8 {
    pub const fn from_raw(value: i64) -> Self {
        Self(value)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    // Smallest representable unit
    pub const fn satoshi() -> Self {
        Self(1)
    }

    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(FIXED8_ONE).map(Self)
    }

    pub const fn raw(&self) -> i64 {
        self.0
    }

    // True when no digit below `precision` decimals is set
    pub fn fits_precision(&self, precision: u8) -> bool {
        if precision >= FIXED8_DECIMALS {
            return true;
        }
        let step = 10i64.pow((FIXED8_DECIMALS - precision) as u32);
        self.0 % step == 0
    }
}

impl std::ops::Neg for Fixed8 {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Display for Fixed8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let one = FIXED8_ONE as u64;
        let fraction = abs % one;
        if fraction == 0 {
            write!(f, "{}{}", sign, abs / one)
        } else {
            let digits = format!("{:08}", fraction);
            write!(f, "{}{}.{}", sign, abs / one, digits.trim_end_matches('0'))
        }
    }
}
