//! Domain models shared across the monitor.

pub mod alert;
pub mod reading;

pub use alert::{AlertDecision, AlertMode};
pub use reading::{Asset, OiReading, ReadingSet};
