//! Shared fixtures for unit tests: synthetic form pages and result documents.

use crate::config::{RetryConfig, ScrapeConfig};
use std::time::Duration;

/// Form page carrying the anti-forgery token pair.
pub(crate) fn form_page() -> String {
    r#"<html><body><form method="post">
        <input type="hidden" name="CSRFToken" value="csrf-abc" />
        <input type="hidden" name="RequestVerificationToken" value="ver-xyz" />
        <input type="submit" name="B1" value="Submit" />
        </form></body></html>"#
        .to_string()
}

/// Structurally valid result document with `terms` term-pairs; the last
/// term's CGPI is `last_cgpi`.
pub(crate) fn result_document(roll_number: &str, terms: usize, last_cgpi: f64) -> String {
    let banner = "<table><tr><td>Result Declared</td></tr></table>";
    let identity = format!(
        "<table><tr>\
         <td>ROLL NUMBER {roll_number}</td>\
         <td>STUDENT NAME Test Student</td>\
         <td>FATHER NAME Test Father</td>\
         </tr></table>"
    );
    let body: String = (0..terms)
        .map(|t| {
            let cgpi = if t + 1 == terms { last_cgpi } else { 7.0 };
            format!(
                "<table>\
                 <tr><td>Sem</td></tr>\
                 <tr><td>S.No</td><td>Subject</td><td>Code</td>\
                 <td>Credit</td><td>Grade</td><td>Points</td></tr>\
                 <tr><td>1</td><td>Mathematics-I</td><td>MA-101</td>\
                 <td>4</td><td>A</td><td>8</td></tr>\
                 </table>\
                 <table><tr>\
                 <td>RESULT</td>\
                 <td>SGPI = 8.00</td>\
                 <td>SGPI Total = 160</td>\
                 <td>CGPI = {cgpi}</td>\
                 <td>CGPI Total = 160</td>\
                 </tr></table>"
            )
        })
        .collect();
    let trailer = "<table><tr><td>*** end ***</td></tr></table>";
    format!("<html><body>{banner}{identity}{body}{trailer}</body></html>")
}

/// Document the remote service serves for nonexistent roll numbers.
pub(crate) fn invalid_roll_document() -> String {
    "<html><body><h2>Kindly Check the Roll Number</h2></body></html>".to_string()
}

/// Configuration pointed at a mock server, with a fast retry ladder.
pub(crate) fn test_config(base_url: &str) -> ScrapeConfig {
    ScrapeConfig {
        base_url: base_url.to_string(),
        retry: RetryConfig {
            max_retries: 1,
            base_delay: Duration::from_millis(1),
            max_jitter_secs: 0,
        },
        ..Default::default()
    }
}
