//! Management operations exchanged with the device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of a management operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    /// Ask the device to report an attribute.
    Info,
    Command,
    Config,
    Message,
    Profile,
    Policy,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Info => write!(f, "INFO"),
            OperationKind::Command => write!(f, "COMMAND"),
            OperationKind::Config => write!(f, "CONFIG"),
            OperationKind::Message => write!(f, "MESSAGE"),
            OperationKind::Profile => write!(f, "PROFILE"),
            OperationKind::Policy => write!(f, "POLICY"),
        }
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(OperationKind::Info),
            "COMMAND" => Ok(OperationKind::Command),
            "CONFIG" => Ok(OperationKind::Config),
            "MESSAGE" => Ok(OperationKind::Message),
            "PROFILE" => Ok(OperationKind::Profile),
            "POLICY" => Ok(OperationKind::Policy),
            other => Err(format!("unknown operation kind '{other}'")),
        }
    }
}

/// A management operation addressed to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub code: String,
    pub kind: OperationKind,
}

impl Operation {
    pub fn new(code: impl Into<String>, kind: OperationKind) -> Self {
        Self {
            code: code.into(),
            kind,
        }
    }

    pub fn info(code: impl Into<String>) -> Self {
        Self::new(code, OperationKind::Info)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.code)
    }
}
