use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A build configuration that owns one flag string.
///
/// `Unknown` is a sentinel: it is never written to and is skipped when
/// applying to every target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Unknown,
    Standalone,
    Ios,
    Android,
    WebGl,
    Tvos,
    Ps4,
    Ps5,
    XboxOne,
    Switch,
    LinuxServer,
    WindowsServer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target '{0}'")]
pub struct ParseTargetError(pub String);

impl Target {
    pub const ALL: [Target; 12] = [
        Target::Unknown,
        Target::Standalone,
        Target::Ios,
        Target::Android,
        Target::WebGl,
        Target::Tvos,
        Target::Ps4,
        Target::Ps5,
        Target::XboxOne,
        Target::Switch,
        Target::LinuxServer,
        Target::WindowsServer,
    ];

    /// Every target except the `Unknown` sentinel, in declaration order.
    pub fn known() -> impl Iterator<Item = Target> {
        Self::ALL.into_iter().filter(|t| !t.is_unknown())
    }

    pub fn is_unknown(self) -> bool {
        self == Target::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Unknown => "unknown",
            Target::Standalone => "standalone",
            Target::Ios => "ios",
            Target::Android => "android",
            Target::WebGl => "web-gl",
            Target::Tvos => "tvos",
            Target::Ps4 => "ps4",
            Target::Ps5 => "ps5",
            Target::XboxOne => "xbox-one",
            Target::Switch => "switch",
            Target::LinuxServer => "linux-server",
            Target::WindowsServer => "windows-server",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseTargetError(s.to_string()))
    }
}
