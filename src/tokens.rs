//! Token Cache — process-lifetime anti-forgery credentials keyed by path
//!
//! The result form requires a CSRF token pair lifted from the form page.
//! Tokens are fetched once per path and cached for the life of the process;
//! there is no expiry or invalidation (a token going stale server-side is a
//! documented limitation). Concurrent first-population races are benign:
//! both writers store the same server-derived values.

use crate::error::{Error, Result};
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;
use tokio::sync::RwLock;
use url::Url;

static CSRF_FIELD: LazyLock<Selector> = LazyLock::new(|| field_selector("CSRFToken"));
static VERIFICATION_FIELD: LazyLock<Selector> =
    LazyLock::new(|| field_selector("RequestVerificationToken"));

// field names are compile-time constants; parse cannot fail
#[allow(clippy::expect_used)]
fn field_selector(name: &str) -> Selector {
    Selector::parse(&format!("[name={name}]")).expect("static selector")
}

/// One cached anti-forgery credential pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormTokens {
    /// Value of the `CSRFToken` form field
    pub csrf_token: String,
    /// Value of the `RequestVerificationToken` form field
    pub verification_token: String,
}

/// Path-keyed credential store with a populate-once policy.
#[derive(Debug, Default)]
pub struct TokenCache {
    entries: RwLock<HashMap<String, FormTokens>>,
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token pair for `path`, fetching and extracting it
    /// from the form page on first use.
    ///
    /// The GET also primes the client's cookie jar, which the later form
    /// POST depends on.
    pub async fn get_or_fetch(&self, http: &reqwest::Client, path: &Url) -> Result<FormTokens> {
        if let Some(tokens) = self.entries.read().await.get(path.as_str()) {
            return Ok(tokens.clone());
        }

        tracing::debug!(path = %path, "fetching form tokens");
        let body = http.get(path.clone()).send().await?.text().await?;
        let tokens = extract_tokens(&body)?;

        self.entries
            .write()
            .await
            .insert(path.as_str().to_string(), tokens.clone());
        Ok(tokens)
    }
}

/// Extract the credential pair from a form page document.
pub(crate) fn extract_tokens(html: &str) -> Result<FormTokens> {
    let document = Html::parse_document(html);
    let csrf_token = field_value(&document, &CSRF_FIELD)
        .ok_or_else(|| Error::TokenNotFound("CSRFToken".to_string()))?;
    let verification_token = field_value(&document, &VERIFICATION_FIELD)
        .ok_or_else(|| Error::TokenNotFound("RequestVerificationToken".to_string()))?;
    Ok(FormTokens {
        csrf_token,
        verification_token,
    })
}

fn field_value(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr("value"))
        .map(str::to_string)
}
