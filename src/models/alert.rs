//! # models::alert
//!
//! [`AlertDecision`] is the evaluator's verdict for one cycle, carrying every
//! number the alert message needs.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ReadingSet;

/// Which readings are summed and compared against Bitcoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertMode {
    /// ETH + Alts vs BTC.
    Combined,
    /// Alts alone vs BTC.
    Alts,
}

impl fmt::Display for AlertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertMode::Combined => write!(f, "combined"),
            AlertMode::Alts => write!(f, "alts"),
        }
    }
}

impl FromStr for AlertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(AlertMode::Combined),
            "alts" | "alt" => Ok(AlertMode::Alts),
            other => Err(format!("unknown alert mode '{other}' (expected combined or alts)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertDecision {
    pub mode: AlertMode,
    pub readings: ReadingSet,
    /// Bitcoin OI, the side everything is compared against.
    pub primary: f64,
    pub combined: f64,
    /// `combined - primary`; positive whenever `triggered`.
    pub difference: f64,
    pub triggered: bool,
}
