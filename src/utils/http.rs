// src/utils/http.rs

//! HTTP client utilities.
//!
//! The client never follows redirects on its own; [`fetch_page`] walks the
//! `Location` chain itself so every hop is logged and bounded.

use std::time::Duration;

use reqwest::{Client, header::LOCATION, redirect::Policy};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::none())
        .build()?;
    Ok(client)
}

/// A fetched page and the URL the redirect chain ended at.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL; relative links on the page resolve against it
    pub url: Url,
    pub html: String,
}

/// Fetch a page body as text, following up to `max_redirects` redirects.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    max_redirects: usize,
) -> Result<FetchedPage> {
    let mut current = Url::parse(url)?;
    let mut hops = 0;

    loop {
        let response = client.get(current.clone()).send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    AppError::fetch(current.as_str(), "redirect without Location header")
                })?;

            if hops >= max_redirects {
                return Err(AppError::TooManyRedirects {
                    url: url.to_string(),
                    hops,
                });
            }
            hops += 1;

            let next = current.join(location)?;
            log::debug!("Redirect {} -> {}", current, next);
            current = next;
            continue;
        }

        if !status.is_success() {
            return Err(AppError::Status {
                url: current.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        return Ok(FetchedPage { url: current, html });
    }
}

/// Like [`fetch_page`], keeping only the body.
pub async fn fetch_html(client: &Client, url: &str, max_redirects: usize) -> Result<String> {
    Ok(fetch_page(client, url, max_redirects).await?.html)
}
