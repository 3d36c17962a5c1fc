//! # fetch::raw
//!
//! Plain HTTP backend: GET the page with a browser-like header set and query
//! the markup with `scraper`.  No scripts run, so this only works while the
//! site renders the listing server-side.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use scraper::{Html, Selector};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{CellSource, CellText, FetchError, PageSpec};

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct RawSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    /// Minimum pause between two consecutive page requests.
    page_gap: Duration,
    last_request: Option<Instant>,
}

impl RawSource {
    pub fn new(base_url: &str, timeout: Duration, page_gap: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.to_string(),
            timeout,
            page_gap,
            last_request: None,
        })
    }

    async fn respect_gap(&self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.page_gap {
                tokio::time::sleep(self.page_gap - elapsed).await;
            }
        }
    }
}

/// Compression is negotiated by reqwest itself, so no `Accept-Encoding` here.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    for (name, value) in [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .default_headers(browser_headers())
        .cookie_store(true)
        .timeout(timeout)
        .build()
}

/// Apply every cell selector of `spec` to `html`.
pub fn extract_cells(html: &str, spec: &PageSpec) -> Result<Vec<CellText>, FetchError> {
    let document = Html::parse_document(html);

    spec.cells
        .iter()
        .map(|cell| {
            let css = cell.selector();
            let selector = Selector::parse(&css).map_err(|e| FetchError::Selector {
                selector: css.clone(),
                reason: format!("{e:?}"),
            })?;

            let text = document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());

            Ok(CellText { asset: cell.asset, text })
        })
        .collect()
}

#[async_trait]
impl CellSource for RawSource {
    fn backend(&self) -> &'static str {
        "raw"
    }

    async fn fetch_page(&mut self, spec: &PageSpec) -> Result<Vec<CellText>, FetchError> {
        self.respect_gap().await;

        let url = spec.page.url(&self.base_url);
        info!(page = spec.page.slug(), %url, "Fetching OI page over HTTP");

        self.last_request = Some(Instant::now());
        let html = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!(page = spec.page.slug(), bytes = html.len(), "Page body received");
        extract_cells(&html, spec)
    }

    async fn release(&mut self) {
        match build_client(self.timeout) {
            Ok(client) => self.client = client,
            Err(e) => warn!(error = %e, "Could not rebuild HTTP client — keeping the old one"),
        }
        self.last_request = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{collect_readings, COINALYZE};
    use crate::models::ReadingSet;
    use wiremock::matchers::{header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A listing page shaped like the real one: `rows[i][j]` lands in
    /// `tr:nth-child(i+1) > td:nth-child(j+1)`.
    fn listing(rows: &[&[&str]]) -> String {
        let body: String = rows
            .iter()
            .map(|cols| {
                let tds: String = cols.iter().map(|c| format!("<td>{c}</td>")).collect();
                format!("<tr>{tds}</tr>")
            })
            .collect();
        format!(
            "<html><body><div class=\"body-wrapper\"><div class=\"main-content\"><div>\
             <div class=\"listing\"><div class=\"table-wrapper\"><table><tbody>{body}</tbody>\
             </table></div></div></div></div></div></body></html>"
        )
    }

    fn main_page() -> String {
        listing(&[
            &["1", "BTC", "", "", "", "", " $21.40B "],
            &["2", "ETH", "", "", "", "", "$9.80B"],
        ])
    }

    fn categories_page() -> String {
        listing(&[
            &["1", "", "", "", "", "$1.0B"],
            &["2", "", "", "", "", "$2.0B"],
            &["3", "Alts", "", "", "", "$30.10B"],
        ])
    }

    #[test]
    fn test_extract_cells_by_position() {
        let cells = extract_cells(&main_page(), &COINALYZE[0]).unwrap();
        assert_eq!(cells[0].text.as_deref(), Some("$21.40B"));
        assert_eq!(cells[1].text.as_deref(), Some("$9.80B"));
    }

    #[test]
    fn test_extract_missing_cell_is_none() {
        let cells = extract_cells("<html><body><p>maintenance</p></body></html>", &COINALYZE[1]).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].text, None);
    }

    #[tokio::test]
    async fn fetches_both_pages_with_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("categories", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(categories_page()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header_exists("user-agent"))
            .and(header("sec-fetch-dest", "document"))
            .and(header("sec-fetch-mode", "navigate"))
            .respond_with(ResponseTemplate::new(200).set_body_string(main_page()))
            .expect(1)
            .mount(&server)
            .await;

        let mut source = RawSource::new(&server.uri(), Duration::from_secs(5), Duration::ZERO).unwrap();
        let readings = collect_readings(&mut source, COINALYZE).await.unwrap();

        assert_eq!(readings, ReadingSet::new(21_400_000_000.0, 9_800_000_000.0, 30_100_000_000.0));
    }

    #[tokio::test]
    async fn http_error_status_fails_the_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let mut source = RawSource::new(&server.uri(), Duration::from_secs(5), Duration::ZERO).unwrap();
        let err = source.fetch_page(&COINALYZE[0]).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
