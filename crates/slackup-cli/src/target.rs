//! Backup target parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The conversation a backup run is aimed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackupTarget {
    /// A channel, given as `#name`.
    Channel(String),
    /// A direct conversation with a user, given as `@name`.
    User(String),
}

/// Error for target strings missing the `#`/`@` prefix.
#[derive(Debug, thiserror::Error)]
#[error("target must start with '#' (channel) or '@' (user), got {raw:?}")]
pub struct InvalidTarget {
    raw: String,
}

impl FromStr for BackupTarget {
    type Err = InvalidTarget;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_at_checked(1) {
            Some(("#", name)) if !name.is_empty() => Ok(Self::Channel(name.to_string())),
            Some(("@", name)) if !name.is_empty() => Ok(Self::User(name.to_string())),
            _ => Err(InvalidTarget {
                raw: raw.to_string(),
            }),
        }
    }
}

impl fmt::Display for BackupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Channel(name) => write!(f, "#{name}"),
            Self::User(name) => write!(f, "@{name}"),
        }
    }
}
