//! # monitor
//!
//! The scheduled side of the bot.
//!
//! ## Flow
//! ```text
//! every MONITOR_INTERVAL:
//!   1. Fetch readings (pipeline: lock → retry → parse)
//!   2. Evaluate ETH + Alts (or Alts) against BTC
//!   3. Cooldown gate
//!   4. Post the alert embed to the channel
//! ```
//!
//! A cycle that cannot get data logs and waits for the next tick; stale
//! readings are never reused.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::engine::cooldown::AlertGate;
use crate::engine::evaluator::evaluate;
use crate::engine::format::format_number;
use crate::models::{AlertDecision, AlertMode};
use crate::notify::message::alert_message;
use crate::notify::Notifier;
use crate::pipeline::Pipeline;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Retries exhausted; nothing evaluated.
    NoData { reason: String },
    /// Condition not met.
    Quiet { decision: AlertDecision },
    /// Condition met but inside the cooldown window.
    Suppressed { decision: AlertDecision, retry_in_secs: u64 },
    Alerted { decision: AlertDecision },
    NotifyFailed { decision: AlertDecision, error: String },
}

pub struct Monitor {
    pipeline: Arc<Pipeline>,
    notifier: Arc<dyn Notifier>,
    mode: AlertMode,
    gate: Mutex<AlertGate>,
    cycles: AtomicU64,
    alerts: AtomicU64,
}

impl Monitor {
    pub fn new(
        pipeline: Arc<Pipeline>,
        notifier: Arc<dyn Notifier>,
        mode: AlertMode,
        cooldown: Duration,
    ) -> Self {
        Self {
            pipeline,
            notifier,
            mode,
            gate: Mutex::new(AlertGate::new(cooldown)),
            cycles: AtomicU64::new(0),
            alerts: AtomicU64::new(0),
        }
    }

    pub fn mode(&self) -> AlertMode {
        self.mode
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    pub fn alerts_sent(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    /// One fetch → evaluate → notify pass.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let span = info_span!("cycle", cycle_id = %Uuid::new_v4());
        self.cycle_inner().instrument(span).await
    }

    async fn cycle_inner(&self) -> CycleOutcome {
        self.cycles.fetch_add(1, Ordering::Relaxed);

        let readings = match self.pipeline.fetch_readings().await {
            Ok(readings) => readings,
            Err(e) => {
                error!(error = %e, "❌ No OI data this cycle — skipping notification");
                return CycleOutcome::NoData { reason: e.to_string() };
            }
        };

        let decision = evaluate(&readings, self.mode);
        info!(
            btc        = %format_number(readings.btc),
            eth        = %format_number(readings.eth),
            alt        = %format_number(readings.alt),
            combined   = %format_number(decision.combined),
            mode       = %self.mode,
            triggered  = decision.triggered,
            "OI readings evaluated"
        );

        if !decision.triggered {
            return CycleOutcome::Quiet { decision };
        }

        let now = Instant::now();
        let mut gate = self.gate.lock().await;
        if let Some(remaining) = gate.remaining(now) {
            info!(retry_in = ?remaining, "Alert condition holds but cooldown is active");
            return CycleOutcome::Suppressed {
                decision,
                retry_in_secs: remaining.as_secs(),
            };
        }

        match self.notifier.send(&alert_message(&decision)).await {
            Ok(()) => {
                gate.record(now);
                self.alerts.fetch_add(1, Ordering::Relaxed);
                info!(difference = %format_number(decision.difference), "🚨 OI alert sent");
                CycleOutcome::Alerted { decision }
            }
            Err(e) => {
                error!(error = %e, "Could not deliver OI alert");
                CycleOutcome::NotifyFailed {
                    decision,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Run a cycle immediately, then every `period`, until `shutdown` turns
    /// `true` or its sender is dropped.
    pub async fn run(self: Arc<Self>, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval = ?period, mode = %self.mode, "OI monitor started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.run_cycle().await;
                    debug!(?outcome, "Cycle finished");
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("OI monitor stopping");
                        break;
                    }
                }
            }
        }
    }
}
