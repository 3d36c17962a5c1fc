//! # fetch::layout
//!
//! Where each figure lives on the scraped site.  The cells are addressed by
//! 1-based table position, so a redesign of the third-party page means
//! editing [`COINALYZE`] and nothing else.

use crate::models::Asset;

/// Path from `<body>` down to the listing table rows.
const TABLE_ROWS: &str =
    "body > div > div.main-content > div > div.listing > div.table-wrapper > table > tbody";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The default listing: BTC and ETH rows.
    Main,
    /// The categorized listing, which has an aggregate altcoin row.
    Categories,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Page::Main => "/",
            Page::Categories => "/?categories=1",
        }
    }

    /// Short name used in logs and snapshot file names.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Main => "main",
            Page::Categories => "categories",
        }
    }

    pub fn url(self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// One table cell, `row` and `column` both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpec {
    pub asset: Asset,
    pub row: usize,
    pub column: usize,
}

impl CellSpec {
    pub fn selector(&self) -> String {
        format!(
            "{TABLE_ROWS} > tr:nth-child({}) > td:nth-child({})",
            self.row, self.column
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub page: Page,
    pub cells: &'static [CellSpec],
}

pub static COINALYZE: &[PageSpec] = &[
    PageSpec {
        page: Page::Main,
        cells: &[
            CellSpec { asset: Asset::Btc, row: 1, column: 7 },
            CellSpec { asset: Asset::Eth, row: 2, column: 7 },
        ],
    },
    PageSpec {
        page: Page::Categories,
        cells: &[CellSpec { asset: Asset::Alt, row: 3, column: 6 }],
    },
];
