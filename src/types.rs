use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one presentation request. Never reused.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NotificationId(Uuid);

impl NotificationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Identity of a node on a display surface.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(Uuid);

impl NodeId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0.simple())
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    pub const ALL: [Self; 3] = [Self::Info, Self::Success, Self::Error];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// Parses a severity name, degrading anything unrecognised to `Info`.
    #[must_use]
    pub fn parse_lossy(raw: &str) -> Self {
        Self::from_str(raw).unwrap_or_default()
    }

    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Success => Palette {
                background: "#059669",
                border: "#10b981",
            },
            Self::Error => Palette {
                background: "#dc2626",
                border: "#ef4444",
            },
            Self::Info => Palette {
                background: "#2563eb",
                border: "#3b82f6",
            },
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Colours applied to a toast for a given severity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub border: &'static str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    Presenting,
    Visible,
    Dismissing,
    Removed,
}

impl LifecycleState {
    /// Whether a dismissal trigger may still start the exit sequence.
    #[must_use]
    pub const fn is_dismissable(self) -> bool {
        matches!(self, Self::Presenting | Self::Visible)
    }
}

impl Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Presenting => "presenting",
            Self::Visible => "visible",
            Self::Dismissing => "dismissing",
            Self::Removed => "removed",
        })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DismissReason {
    Timeout,
    CloseAction,
    OutsideInteraction,
}

impl Display for DismissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timeout => "timeout",
            Self::CloseAction => "close",
            Self::OutsideInteraction => "outside-click",
        })
    }
}
