use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

use crate::error::CommonError;

/// Reason a script is being executed
///
/// The discriminants are the wire encodings the consensus rules expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TriggerType {
    /// Witness verification of a script container
    Verification = 0x00,
    /// Verification of the receiving side of a transfer
    VerificationR = 0x01,
    /// Application logic of an invocation transaction
    Application = 0x10,
    /// Application logic triggered by a received transfer
    ApplicationR = 0x11,
}

impl TriggerType {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    // Storage writes are allowed only for the two application triggers
    pub const fn can_write_storage(self) -> bool {
        matches!(self, TriggerType::Application | TriggerType::ApplicationR)
    }

    // Contract and asset lifecycle operations need the plain application trigger
    pub const fn is_application(self) -> bool {
        matches!(self, TriggerType::Application)
    }
}

impl TryFrom<u8> for TriggerType {
    type Error = CommonError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0x00 => TriggerType::Verification,
            0x01 => TriggerType::VerificationR,
            0x10 => TriggerType::Application,
            0x11 => TriggerType::ApplicationR,
            _ => return Err(CommonError::UnknownDiscriminant { kind: "trigger", value }),
        })
    }
}

impl Display for TriggerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriggerType::Verification => "Verification",
            TriggerType::VerificationR => "VerificationR",
            TriggerType::Application => "Application",
            TriggerType::ApplicationR => "ApplicationR",
        };
        write!(f, "{}", name)
    }
}
