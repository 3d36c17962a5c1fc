//! Pure decision logic: parsing, formatting, evaluation, retry and cooldown.

pub mod cooldown;
pub mod evaluator;
pub mod format;
pub mod parser;
pub mod retry;
