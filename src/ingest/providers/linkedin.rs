// src/ingest/providers/linkedin.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::config::DigestConfig;
use crate::ingest::normalize_text;
use crate::listing::{ListingProvider, RawListing};

pub const SOURCE: &str = "LinkedIn";
const SEARCH_URL: &str = "https://www.linkedin.com/jobs/search/";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// LinkedIn guest job search. Parses the server-rendered `.base-card` list.
pub struct LinkedInProvider {
    mode: Mode,
    location: String,
    experience_levels: String,
    limit: usize,
}

enum Mode {
    // same page for every keyword; used by tests and the demo
    Fixture(String),
    Http(Client),
}

impl LinkedInProvider {
    pub fn from_config(cfg: &DigestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("building linkedin http client")?;
        Ok(Self {
            mode: Mode::Http(client),
            location: cfg.location.clone(),
            experience_levels: cfg.experience_levels.clone(),
            limit: cfg.per_keyword_limit,
        })
    }

    pub fn from_fixture_str(html: &str, limit: usize) -> Self {
        Self {
            mode: Mode::Fixture(html.to_string()),
            location: String::new(),
            experience_levels: String::new(),
            limit,
        }
    }

    pub fn search_url(&self, keyword: &str) -> Result<Url> {
        Url::parse_with_params(
            SEARCH_URL,
            &[
                ("keywords", keyword),
                ("location", self.location.as_str()),
                ("f_E", self.experience_levels.as_str()),
            ],
        )
        .context("building linkedin search url")
    }

    async fn fetch_page(&self, client: &Client, keyword: &str) -> Result<String> {
        let url = self.search_url(keyword)?;
        let resp = client
            .get(url)
            .send()
            .await
            .context("linkedin http get()")?
            .error_for_status()
            .context("linkedin non-2xx")?;
        resp.text().await.context("linkedin http .text()")
    }
}

fn selector(cell: &'static OnceCell<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).unwrap())
}

fn first_text(card: &ElementRef, sel: &Selector) -> String {
    card.select(sel)
        .next()
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .unwrap_or_default()
}

/// Extract up to `limit` listings from a search results page. Cards without
/// a title are skipped.
pub fn parse_search_page(html: &str, limit: usize) -> Vec<RawListing> {
    static CARD: OnceCell<Selector> = OnceCell::new();
    static TITLE: OnceCell<Selector> = OnceCell::new();
    static COMPANY: OnceCell<Selector> = OnceCell::new();
    static LOCATION: OnceCell<Selector> = OnceCell::new();
    static LINK: OnceCell<Selector> = OnceCell::new();
    static TIME: OnceCell<Selector> = OnceCell::new();

    let doc = Html::parse_document(html);
    let card_sel = selector(&CARD, ".base-card");
    let title_sel = selector(&TITLE, "h3");
    let company_sel = selector(&COMPANY, ".base-search-card__subtitle");
    let location_sel = selector(&LOCATION, ".job-search-card__location");
    let link_sel = selector(&LINK, "a.base-card__full-link");
    let time_sel = selector(&TIME, "time");

    let mut out = Vec::new();
    for card in doc.select(card_sel).take(limit) {
        let title = first_text(&card, title_sel);
        if title.is_empty() {
            continue;
        }
        let link = card
            .select(link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|h| h.trim().to_string())
            .unwrap_or_else(|| "#".to_string());

        let time_el = card.select(time_sel).next();
        let posted_time = time_el
            .map(|t| normalize_text(&t.text().collect::<String>()))
            .filter(|s| !s.is_empty());
        let posted_timestamp = time_el
            .and_then(|t| t.value().attr("datetime"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        out.push(RawListing {
            title,
            company: first_text(&card, company_sel),
            location: first_text(&card, location_sel),
            link,
            posted_time,
            posted_timestamp,
            source: SOURCE.to_string(),
        });
    }
    out
}

#[async_trait]
impl ListingProvider for LinkedInProvider {
    async fn fetch(&self, keyword: &str) -> Result<Vec<RawListing>> {
        match &self.mode {
            Mode::Fixture(html) => Ok(parse_search_page(html, self.limit)),
            Mode::Http(client) => {
                let body = self
                    .fetch_page(client, keyword)
                    .await
                    .with_context(|| format!("linkedin search '{keyword}'"))?;
                Ok(parse_search_page(&body, self.limit))
            }
        }
    }

    fn name(&self) -> &'static str {
        SOURCE
    }
}
