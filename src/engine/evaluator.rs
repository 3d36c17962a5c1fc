//! # engine::evaluator
//!
//! Compares the secondary side (ETH + Alts, or Alts alone) against Bitcoin.
//! Pure: the same readings always produce the same decision, and nothing is
//! remembered between cycles.

use crate::models::{AlertDecision, AlertMode, ReadingSet};

pub fn evaluate(readings: &ReadingSet, mode: AlertMode) -> AlertDecision {
    let primary = readings.btc;
    let combined = match mode {
        AlertMode::Combined => readings.eth + readings.alt,
        AlertMode::Alts => readings.alt,
    };

    AlertDecision {
        mode,
        readings: *readings,
        primary,
        combined,
        difference: combined - primary,
        triggered: combined > primary,
    }
}
