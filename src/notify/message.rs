//! # notify::message
//!
//! Message bodies for the three things the monitor says: a threshold alert,
//! a single-asset summary, and a fetch-failure acknowledgment.

use super::{Embed, Message};
use crate::engine::format::format_number;
use crate::models::{AlertDecision, AlertMode, Asset};

pub const ALERT_COLOR: u32 = 0xE74C3C;
pub const INFO_COLOR: u32 = 0x3498DB;

pub fn alert_message(decision: &AlertDecision) -> Message {
    let r = &decision.readings;

    let embed = match decision.mode {
        AlertMode::Combined => Embed::new(
            "🚨 Combined Open Interest Alert",
            "Combined ETH + Altcoins Open Interest has surpassed Bitcoin Open Interest!",
            ALERT_COLOR,
        )
        .field("Bitcoin OI", format_number(r.btc), true)
        .field("ETH OI", format_number(r.eth), true)
        .field("Altcoins OI", format_number(r.alt), true)
        .field("Combined ETH + Alts", format_number(decision.combined), true),

        AlertMode::Alts => Embed::new(
            "🚨 Open Interest Alert",
            "Altcoins Open Interest has surpassed Bitcoin Open Interest!",
            ALERT_COLOR,
        )
        .field("Bitcoin OI", format_number(r.btc), true)
        .field("Altcoins OI", format_number(r.alt), true),
    };

    Message::embed(embed.field("Difference", format_number(decision.difference), false))
}

pub fn summary_message(asset: Asset, value: f64) -> Message {
    Message::embed(Embed::new(
        format!("{} Open Interest", asset.display_name()),
        format!("Current {} OI: {}", asset.ticker(), format_number(value)),
        INFO_COLOR,
    ))
}

pub fn failure_text(asset: Asset) -> String {
    format!("Error fetching {} OI data", asset.display_name())
}

pub fn failure_message(asset: Asset) -> Message {
    Message::text(failure_text(asset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluator::evaluate;
    use crate::models::ReadingSet;

    #[test]
    fn test_combined_alert_fields() {
        let decision = evaluate(&ReadingSet::new(90.0, 70.0, 40.0), AlertMode::Combined);
        let msg = alert_message(&decision);
        let embed = &msg.embeds[0];

        assert_eq!(embed.title, "🚨 Combined Open Interest Alert");
        assert_eq!(embed.color, ALERT_COLOR);
        assert_eq!(embed.field_value("Bitcoin OI"), Some("$90.00"));
        assert_eq!(embed.field_value("ETH OI"), Some("$70.00"));
        assert_eq!(embed.field_value("Altcoins OI"), Some("$40.00"));
        assert_eq!(embed.field_value("Combined ETH + Alts"), Some("$110.00"));
        assert_eq!(embed.field_value("Difference"), Some("$20.00"));
        assert!(!embed.fields.last().unwrap().inline);
    }

    #[test]
    fn test_alts_alert_has_no_eth_field() {
        let decision = evaluate(&ReadingSet::new(1.0e9, 5.0e9, 2.5e9), AlertMode::Alts);
        let embed = &alert_message(&decision).embeds[0];

        assert_eq!(embed.title, "🚨 Open Interest Alert");
        assert_eq!(embed.fields.len(), 3);
        assert_eq!(embed.field_value("ETH OI"), None);
        assert_eq!(embed.field_value("Difference"), Some("$1.5B"));
    }

    #[test]
    fn test_summary_and_failure() {
        let embed = &summary_message(Asset::Eth, 9_800_000_000.0).embeds[0];
        assert_eq!(embed.title, "Ethereum Open Interest");
        assert_eq!(embed.description, "Current ETH OI: $9.8B");
        assert_eq!(embed.color, INFO_COLOR);

        let msg = failure_message(Asset::Btc);
        assert_eq!(msg.content.as_deref(), Some("Error fetching Bitcoin OI data"));
        assert!(msg.embeds.is_empty());
    }
}
