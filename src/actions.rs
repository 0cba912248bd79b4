use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::error::{Error, Result};

/// Signal decision at the intersection. `Stop` holds traffic (RED), `Go` releases it (GREEN).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, Display,
)]
pub enum Action {
    Stop,
    Go,
}

impl Action {
    /// Numeric code of the action, also its weight in the reward.
    pub fn code(&self) -> u8 {
        match self {
            Action::Stop => 0,
            Action::Go => 1,
        }
    }

    pub fn value(&self) -> f64 {
        f64::from(self.code())
    }
}

impl TryFrom<u8> for Action {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Action::Stop),
            1 => Ok(Action::Go),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown action code {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_codes() {
        assert_eq!(Action::Stop.code(), 0);
        assert_eq!(Action::Go.code(), 1);
        for action in Action::iter() {
            assert_eq!(Action::try_from(action.code()).unwrap(), action);
        }
        assert!(Action::try_from(2).is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Action::Go).unwrap(), "\"Go\"");
        assert_eq!(Action::Stop.to_string(), "Stop");
    }
}
