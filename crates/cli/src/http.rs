// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-backed [`MatchSource`].
//!
//! `GET {base}` answers the total match count in the `X-Total` header;
//! `GET {base}?offset=N` answers one page as a JSON array.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;

use ms_core::{Error as CoreError, MatchSource, Page, TotalMatches};

use crate::error::{Error, Result};

/// Response header carrying the total match count.
pub const TOTAL_HEADER: &str = "X-Total";

pub struct HttpMatchSource {
    client: Client,
    base_url: String,
}

impl HttpMatchSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("matchsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(HttpMatchSource {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_url(&self, offset: u64) -> String {
        let sep = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}offset={}", self.base_url, sep, offset)
    }

    fn get(&self, url: &str) -> ms_core::Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CoreError::Network(format!("GET {url}: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

/// Read the total count from response headers.
pub(crate) fn parse_total(headers: &HeaderMap) -> ms_core::Result<TotalMatches> {
    let value = headers
        .get(TOTAL_HEADER)
        .ok_or_else(|| CoreError::MissingTotal(format!("no {TOTAL_HEADER} header")))?;
    let text = value
        .to_str()
        .map_err(|_| CoreError::MissingTotal(format!("{TOTAL_HEADER} is not text")))?;
    text.trim()
        .parse::<u64>()
        .map(TotalMatches::new)
        .map_err(|_| CoreError::MissingTotal(format!("{TOTAL_HEADER} '{text}' is not a count")))
}

impl MatchSource for HttpMatchSource {
    fn total_count(&self) -> ms_core::Result<TotalMatches> {
        let response = self.get(&self.base_url)?;
        let total = parse_total(response.headers())?;
        tracing::debug!(total = %total, "fetched total count");
        Ok(total)
    }

    fn fetch_page(&self, offset: u64) -> ms_core::Result<Page> {
        let url = self.page_url(offset);
        let body = self
            .get(&url)?
            .text()
            .map_err(|e| CoreError::Network(format!("GET {url}: {e}")))?;
        Page::parse(offset, &body)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
