//! `ResultClient` — HTTP transport and the single-identifier fetch operation
//!
//! The remote form flow is GET form page (tokens + session cookie), then
//! POST the roll number with the token pair. The cookie jar is mandatory:
//! the service ties the verification tokens to the session established by
//! the GET.

use crate::config::ScrapeConfig;
use crate::decode;
use crate::error::{Error, Result};
use crate::roll;
use crate::tokens::TokenCache;
use crate::types::StudentRecord;
use std::sync::Arc;
use url::Url;

/// Form submit marker the remote service expects
const SUBMIT_MARKER: (&str, &str) = ("B1", "Submit");

/// Scrape client (cloneable — all fields are Arc-wrapped or cheap handles)
#[derive(Clone)]
pub struct ResultClient {
    /// HTTP client with cookie store and per-request timeout
    http: reqwest::Client,
    /// Process-lifetime token cache shared across clones
    tokens: Arc<TokenCache>,
    /// Configuration shared across clones
    config: Arc<ScrapeConfig>,
}

impl ResultClient {
    /// Build a client from configuration.
    ///
    /// Fails only when the underlying HTTP client cannot be constructed.
    pub fn new(config: ScrapeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            tokens: Arc::new(TokenCache::new()),
            config: Arc::new(config),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Submit the result form for one roll number at `path`, returning the
    /// raw response document.
    async fn submit_form(&self, path: &Url, roll_number: &str) -> Result<String> {
        let tokens = self.tokens.get_or_fetch(&self.http, path).await?;
        let form = [
            ("RollNumber", roll_number),
            ("CSRFToken", tokens.csrf_token.as_str()),
            (
                "RequestVerificationToken",
                tokens.verification_token.as_str(),
            ),
            SUBMIT_MARKER,
        ];
        let response = self
            .http
            .post(path.clone())
            .header("DNT", "1")
            .form(&form)
            .send()
            .await?;
        Ok(response.text().await?)
    }

    /// Fetch and decode the full record for one identifier.
    ///
    /// The primary path's decode result is authoritative: any error there —
    /// including [`Error::RollNumberNotFound`] — is the final result. Each
    /// further path (the Dual Degree continuation track) is fetched and
    /// merged on success; a decode failure on an extended path is reported
    /// at warn level and skipped entirely, leaving the primary record
    /// untouched.
    pub async fn fetch_one(&self, roll_number: &str) -> Result<StudentRecord> {
        let paths = roll::result_paths(&self.config, roll_number, true)?;

        let mut record: Option<StudentRecord> = None;
        for (index, path) in paths.iter().enumerate() {
            tracing::info!(roll_number, path = %path, "fetching result");
            let body = self.submit_form(path, roll_number).await?;
            if index == 0 {
                record = Some(decode::decode(&body)?);
            } else {
                match decode::decode(&body) {
                    Ok(extended) => {
                        if let Some(primary) = record.as_mut() {
                            primary.merge_extended(extended);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            roll_number,
                            path = %path,
                            error = %e,
                            "extended path decode failed, skipping merge"
                        );
                    }
                }
            }
        }
        record.ok_or_else(|| Error::NoResultPath(roll_number.to_string()))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        form_page, invalid_roll_document, result_document, test_config,
    };
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_form_page(server: &MockServer, route: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(form_page()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_one_posts_tokens_and_decodes_the_record() {
        let server = MockServer::start().await;
        mount_form_page(&server, "/scheme21/studentresult/index.asp").await;
        Mock::given(method("POST"))
            .and(path("/scheme21/studentresult/index.asp"))
            .and(body_string_contains("RollNumber=21bcs001"))
            .and(body_string_contains("CSRFToken=csrf-abc"))
            .and(body_string_contains("B1=Submit"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(result_document("21bcs001", 2, 8.5)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ResultClient::new(test_config(&server.uri())).unwrap();
        let record = client.fetch_one("21bcs001").await.unwrap();

        assert_eq!(record.roll_number, "21bcs001");
        assert_eq!(record.semester_results.len(), 2);
        assert_eq!(record.cgpi, 8.5);
    }

    #[tokio::test]
    async fn fetch_one_surfaces_invalid_roll_as_terminal_error() {
        let server = MockServer::start().await;
        mount_form_page(&server, "/scheme21/studentresult/index.asp").await;
        Mock::given(method("POST"))
            .and(path("/scheme21/studentresult/index.asp"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(invalid_roll_document()),
            )
            .mount(&server)
            .await;

        let client = ResultClient::new(test_config(&server.uri())).unwrap();
        let result = client.fetch_one("21bcs999").await;
        assert!(matches!(result, Err(Error::RollNumberNotFound)));
    }

    #[tokio::test]
    async fn dual_degree_merges_extended_terms() {
        let server = MockServer::start().await;
        mount_form_page(&server, "/scheme20/studentresult/index.asp").await;
        mount_form_page(&server, "/scheme20/dualdegree/index.asp").await;
        Mock::given(method("POST"))
            .and(path("/scheme20/studentresult/index.asp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(result_document("20dcs007", 2, 8.0)),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/scheme20/dualdegree/index.asp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(result_document("20dcs007", 1, 9.0)),
            )
            .mount(&server)
            .await;

        let client = ResultClient::new(test_config(&server.uri())).unwrap();
        let record = client.fetch_one("20dcs007").await.unwrap();

        let labels: Vec<_> = record
            .semester_results
            .iter()
            .map(|s| s.semester_number.as_str())
            .collect();
        assert_eq!(labels, vec!["1", "2", "Masters Sem 01"]);
        assert_eq!(record.cgpi, 9.0, "cgpi raised to the extended value");
    }

    #[tokio::test]
    async fn extended_path_decode_failure_keeps_primary_record() {
        let server = MockServer::start().await;
        mount_form_page(&server, "/scheme20/studentresult/index.asp").await;
        mount_form_page(&server, "/scheme20/dualdegree/index.asp").await;
        Mock::given(method("POST"))
            .and(path("/scheme20/studentresult/index.asp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(result_document("20dcs007", 2, 8.0)),
            )
            .mount(&server)
            .await;
        // Extended path serves a structurally broken document
        Mock::given(method("POST"))
            .and(path("/scheme20/dualdegree/index.asp"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
            .mount(&server)
            .await;

        let client = ResultClient::new(test_config(&server.uri())).unwrap();
        let record = client.fetch_one("20dcs007").await.unwrap();
        assert_eq!(record.semester_results.len(), 2);
        assert_eq!(record.cgpi, 8.0);
    }
}
