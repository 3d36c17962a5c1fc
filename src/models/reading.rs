//! # models::reading
//!
//! [`OiReading`] is one open-interest figure scraped during a cycle, and
//! [`ReadingSet`] is the complete set the evaluator works on.  Neither
//! outlives the cycle that produced it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three open-interest figures the monitor tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Btc,
    Eth,
    Alt,
}

impl Asset {
    pub const ALL: [Asset; 3] = [Asset::Btc, Asset::Eth, Asset::Alt];

    /// Short upper-case label, e.g. `"BTC"`.
    pub fn ticker(self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Alt => "ALT",
        }
    }

    /// Human name used in message titles, e.g. `"Bitcoin"`.
    pub fn display_name(self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin",
            Asset::Eth => "Ethereum",
            Asset::Alt => "Altcoin",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for Asset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "btc" => Ok(Asset::Btc),
            "eth" => Ok(Asset::Eth),
            "alt" | "alts" => Ok(Asset::Alt),
            other => Err(format!("unknown asset '{other}' (expected btc, eth or alt)")),
        }
    }
}

/// A single scraped figure in USD.  `0.0` is a legitimate reading: it is what
/// a missing cell or unparseable text degrades to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OiReading {
    pub asset: Asset,
    pub value: f64,
}

/// Every reading one fetch cycle produced.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReadingSet {
    pub btc: f64,
    pub eth: f64,
    pub alt: f64,
}

impl ReadingSet {
    pub fn new(btc: f64, eth: f64, alt: f64) -> Self {
        Self { btc, eth, alt }
    }

    pub fn get(&self, asset: Asset) -> f64 {
        match asset {
            Asset::Btc => self.btc,
            Asset::Eth => self.eth,
            Asset::Alt => self.alt,
        }
    }

    /// Assemble a set from individual readings.  Returns the first asset
    /// that has no reading, so a layout that forgot a cell is caught.
    pub fn from_readings(readings: &[OiReading]) -> Result<Self, Asset> {
        let find = |asset: Asset| {
            readings
                .iter()
                .find(|r| r.asset == asset)
                .map(|r| r.value)
                .ok_or(asset)
        };

        Ok(Self {
            btc: find(Asset::Btc)?,
            eth: find(Asset::Eth)?,
            alt: find(Asset::Alt)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_parses_case_insensitively() {
        assert_eq!("BTC".parse::<Asset>().unwrap(), Asset::Btc);
        assert_eq!("eth".parse::<Asset>().unwrap(), Asset::Eth);
        assert_eq!("Alts".parse::<Asset>().unwrap(), Asset::Alt);
        assert!("doge".parse::<Asset>().is_err());
    }

    #[test]
    fn reading_set_requires_every_asset() {
        let readings = [
            OiReading { asset: Asset::Btc, value: 1.0 },
            OiReading { asset: Asset::Alt, value: 3.0 },
        ];
        assert_eq!(ReadingSet::from_readings(&readings), Err(Asset::Eth));
    }

    #[test]
    fn reading_set_keeps_zero_readings() {
        let readings = [
            OiReading { asset: Asset::Alt, value: 3.0 },
            OiReading { asset: Asset::Btc, value: 0.0 },
            OiReading { asset: Asset::Eth, value: 2.0 },
        ];
        let set = ReadingSet::from_readings(&readings).unwrap();
        assert_eq!(set, ReadingSet::new(0.0, 2.0, 3.0));
        assert_eq!(set.get(Asset::Eth), 2.0);
    }
}
