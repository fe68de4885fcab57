use std::env;
use std::thread::sleep;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::edition::EditionProfile;
use crate::titles::title_from_reference;

const DEFAULT_USER_AGENT: &str =
    "leaderscrape/0.1 (personal project; respectful rate; contact: you@example.com)";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const ACCEPT_LANGUAGE: &str = "en,fr;q=0.9";

/// Blocking MediaWiki Action API client. One instance is shared by a whole
/// run; every call is synchronous and failures propagate immediately — the
/// batch either completes or aborts, so there is no retry layer.
pub struct WikiClient {
    http: Client,
    user_agent: String,
    politeness_delay: Duration,
}

impl WikiClient {
    /// Build a client. User agent and timeout follow the environment
    /// (`WIKI_USER_AGENT`, `WIKI_HTTP_TIMEOUT_MS`) with library defaults;
    /// the politeness delay between inter-language lookups comes from the
    /// caller.
    pub fn new(politeness_delay: Duration) -> Result<Self> {
        let timeout_ms = env::var("WIKI_HTTP_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let user_agent =
            env::var("WIKI_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let http = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            user_agent,
            politeness_delay,
        })
    }

    /// Rendered HTML of a page's content via `action=parse`. Transport
    /// failures, non-success statuses, and embedded API errors all abort.
    pub fn page_html(&self, profile: &EditionProfile, page: &str) -> Result<String> {
        let payload = self.request_json(
            &profile.api_url(),
            &[
                ("action", "parse".to_string()),
                ("page", page.to_string()),
                ("prop", "text".to_string()),
            ],
        )?;

        payload
            .get("parse")
            .and_then(|value| value.get("text"))
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "malformed parse response for {} page {page}",
                    profile.base_url
                )
            })
    }

    /// Redirect-resolved canonical title (spaces underscored) and canonical
    /// URL via `action=query&redirects`. A title missing from the edition is
    /// a valid outcome: the input title comes back unchanged with no URL.
    pub fn canonical_title(
        &self,
        profile: &EditionProfile,
        title: &str,
    ) -> Result<(String, Option<String>)> {
        let payload = self.request_json(
            &profile.api_url(),
            &[
                ("action", "query".to_string()),
                ("titles", title.to_string()),
                ("redirects", "1".to_string()),
                ("prop", "info".to_string()),
                ("inprop", "url".to_string()),
            ],
        )?;

        let Some(page) = payload
            .get("query")
            .and_then(|value| value.get("pages"))
            .and_then(Value::as_array)
            .and_then(|pages| pages.first())
        else {
            return Ok((title.to_string(), None));
        };
        if page.get("missing").is_some() {
            return Ok((title.to_string(), None));
        }

        let canonical = page
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(title)
            .replace(' ', "_");
        let url = page
            .get("fullurl")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        Ok((canonical, url))
    }

    /// Target-edition title for a page via the `langlinks` relation.
    ///
    /// The source edition's endpoint is tried first, then the target
    /// edition's as fallback — either index can be incomplete or blocked. A
    /// 4xx/5xx from one endpoint moves on to the next; transport and decode
    /// failures abort. The politeness delay runs after every lookup,
    /// whatever its outcome.
    pub fn langlink_target(
        &self,
        source: &EditionProfile,
        target: &EditionProfile,
        title: &str,
    ) -> Result<Option<String>> {
        let result = self.langlink_lookup(source, target, title);
        if !self.politeness_delay.is_zero() {
            sleep(self.politeness_delay);
        }
        result
    }

    fn langlink_lookup(
        &self,
        source: &EditionProfile,
        target: &EditionProfile,
        title: &str,
    ) -> Result<Option<String>> {
        let params = [
            ("action", "query".to_string()),
            ("prop", "langlinks".to_string()),
            ("titles", title.to_string()),
            ("lllang", target.language.to_string()),
            ("llprop", "url|title".to_string()),
            ("format", "json".to_string()),
            ("formatversion", "2".to_string()),
        ];

        for api_url in [source.api_url(), target.api_url()] {
            debug!("langlinks {api_url} titles={title}");
            let response = self
                .http
                .get(&api_url)
                .header("User-Agent", self.user_agent.clone())
                .header("Accept-Language", ACCEPT_LANGUAGE)
                .query(&params)
                .send()
                .with_context(|| format!("langlinks request to {api_url} failed"))?;
            if !response.status().is_success() {
                continue;
            }
            let payload: Value = response
                .json()
                .with_context(|| format!("failed to decode langlinks response from {api_url}"))?;

            let Some(link) = payload
                .get("query")
                .and_then(|value| value.get("pages"))
                .and_then(Value::as_array)
                .and_then(|pages| pages.first())
                .and_then(|page| page.get("langlinks"))
                .and_then(Value::as_array)
                .and_then(|links| links.first())
            else {
                continue;
            };

            // Prefer the URL form: it carries the exact page identifier.
            if let Some(url) = link.get("url").and_then(Value::as_str)
                && let Some(extracted) = title_from_reference(url)
            {
                return Ok(Some(extracted));
            }
            if let Some(linked_title) = link.get("title").and_then(Value::as_str)
                && !linked_title.is_empty()
            {
                return Ok(Some(linked_title.replace(' ', "_")));
            }
        }

        Ok(None)
    }

    fn request_json(&self, api_url: &str, params: &[(&str, String)]) -> Result<Value> {
        let mut pairs = Vec::with_capacity(params.len() + 2);
        pairs.push(("format".to_string(), "json".to_string()));
        pairs.push(("formatversion".to_string(), "2".to_string()));
        for (key, value) in params {
            pairs.push(((*key).to_string(), value.clone()));
        }

        debug!("GET {api_url} {params:?}");
        let response = self
            .http
            .get(api_url)
            .header("User-Agent", self.user_agent.clone())
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .query(&pairs)
            .send()
            .with_context(|| format!("request to {api_url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} from {api_url}", status.as_u16());
        }

        let payload: Value = response
            .json()
            .with_context(|| format!("failed to decode JSON response from {api_url}"))?;
        if let Some(error) = payload.get("error") {
            let code = error
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            let info = error
                .get("info")
                .and_then(Value::as_str)
                .unwrap_or("unknown info");
            bail!("api error from {api_url} [{code}]: {info}");
        }
        Ok(payload)
    }
}
