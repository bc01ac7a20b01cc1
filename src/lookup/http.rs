//! HTTP implementation of the lookup endpoints

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use super::{Bbl, LookupError, LookupService, ResolveOutcome, Suggestion};
use crate::error::BblError;

const AUTOCOMPLETE_PATH: &str = "api/autocomplete";
const LOOKUP_PATH: &str = "api/lookup";

/// reqwest client for `/api/autocomplete` and `/api/lookup`
#[derive(Debug, Clone)]
pub struct HttpLookupClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpLookupClient {
    /// Create a client rooted at `base_url`
    ///
    /// The base keeps any path prefix (`https://host/app` resolves to
    /// `https://host/app/api/...`).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BblError> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| BblError::Http(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Create a client around an already configured reqwest client
    #[cfg(test)]
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, BblError> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, LookupError> {
        self.base_url
            .join(path)
            .map_err(|e| LookupError::Network(e.to_string()))
    }

    async fn get(&self, path: &str, param: (&str, &str)) -> Result<(StatusCode, String), LookupError> {
        let url = self.endpoint(path)?;
        log::debug!("GET {} {}={:?}", url, param.0, param.1);

        let response = self
            .client
            .get(url)
            .query(&[param])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok((status, body))
    }

    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>, LookupError> {
        let (status, body) = self.get(AUTOCOMPLETE_PATH, ("q", query)).await?;
        if !status.is_success() {
            return Err(LookupError::Api {
                code: status.as_u16(),
                message: body,
            });
        }
        parse_autocomplete_body(&body)
    }

    /// Resolve free text to one BBL
    ///
    /// The status code only matters when the body is unusable; a decodable
    /// body decides the outcome on its own.
    pub async fn resolve_address(&self, address: &str) -> Result<ResolveOutcome, LookupError> {
        let (status, body) = self.get(LOOKUP_PATH, ("address", address)).await?;
        parse_lookup_body(&body).map_err(|e| {
            if status.is_success() {
                e
            } else {
                LookupError::Api {
                    code: status.as_u16(),
                    message: body.clone(),
                }
            }
        })
    }
}

impl LookupService for HttpLookupClient {
    fn autocomplete<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Vec<Suggestion>, LookupError>> {
        self.fetch_suggestions(query).boxed()
    }

    fn resolve<'a>(
        &'a self,
        address: &'a str,
    ) -> BoxFuture<'a, Result<ResolveOutcome, LookupError>> {
        self.resolve_address(address).boxed()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BblError> {
    let invalid = |reason: String| BblError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }

    // Url::join replaces the last segment unless the path ends with '/'
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Deserialize)]
struct AutocompleteBody {
    #[serde(default)]
    suggestions: Option<Vec<serde_json::Value>>,
}

/// Decode `{ suggestions: [...] }`
///
/// A missing or null array is an empty batch. Entries that fail to decode
/// are skipped so one bad row does not hide the rest.
pub(crate) fn parse_autocomplete_body(body: &str) -> Result<Vec<Suggestion>, LookupError> {
    let parsed: AutocompleteBody =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    let suggestions = parsed
        .suggestions
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Suggestion>(value) {
            Ok(suggestion) => Some(suggestion),
            Err(e) => {
                log::debug!("Skipping undecodable suggestion: {}", e);
                None
            }
        })
        .collect();

    Ok(suggestions)
}

#[derive(Deserialize)]
struct LookupBody {
    #[serde(default)]
    bbl: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode `{ bbl }` or `{ error }`
pub(crate) fn parse_lookup_body(body: &str) -> Result<ResolveOutcome, LookupError> {
    let parsed: LookupBody =
        serde_json::from_str(body).map_err(|e| LookupError::Parse(e.to_string()))?;

    let bbl = parsed.bbl.and_then(|value| match value {
        serde_json::Value::String(s) => Bbl::new(s),
        serde_json::Value::Number(n) => Bbl::new(n.to_string()),
        _ => None,
    });

    Ok(match bbl {
        Some(bbl) => ResolveOutcome::Resolved(bbl),
        None => ResolveOutcome::NotFound {
            message: parsed.error.filter(|m| !m.trim().is_empty()),
        },
    })
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
