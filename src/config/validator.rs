use crate::error::{QuoteError, Result};

use super::ClientConfig;

/// Validate a client configuration, reporting every problem at once.
pub fn validate_client_config(config: &ClientConfig) -> Result<()> {
    let mut issues = Vec::new();

    validate_url_template("chart_url", &config.chart_url_template, &mut issues);
    validate_url_template("download_url", &config.download_url_template, &mut issues);

    if config.user_agent.trim().is_empty() {
        issues.push("user_agent must not be empty; the provider rejects anonymous clients".to_string());
    }

    if config.request_timeout.is_some_and(|timeout| timeout.is_zero()) {
        issues.push("request_timeout_secs must be greater than zero when set".to_string());
    }

    if config.batch_concurrency == 0 {
        issues.push("batch_concurrency must be at least 1".to_string());
    }

    if config.poll_buffer == 0 {
        issues.push("poll_buffer must be at least 1".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(QuoteError::config(issues.join("; ")))
    }
}

fn validate_url_template(name: &str, template: &str, issues: &mut Vec<String>) {
    let trimmed = template.trim();
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        issues.push(format!("{name} must be an http(s) URL"));
    }
    if !trimmed.contains("{ticker}") {
        issues.push(format!("{name} must contain the {{ticker}} placeholder"));
    }
    if trimmed.contains('?') {
        issues.push(format!("{name} must not carry a query string"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn collects_every_issue() {
        let config = ClientConfig {
            chart_url_template: "ftp://example.test/chart".to_string(),
            user_agent: "  ".to_string(),
            batch_concurrency: 0,
            ..ClientConfig::builtin()
        };

        let err = validate_client_config(&config).expect_err("validation should fail");
        let message = err.to_string();

        assert!(message.contains("http(s) URL"), "unexpected error message: {message}");
        assert!(message.contains("{ticker}"), "unexpected error message: {message}");
        assert!(message.contains("user_agent"), "unexpected error message: {message}");
        assert!(message.contains("batch_concurrency"), "unexpected error message: {message}");
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ClientConfig {
            request_timeout: Some(Duration::ZERO),
            ..ClientConfig::builtin()
        };

        let err = validate_client_config(&config).expect_err("validation should fail");
        assert!(
            err.to_string().contains("request_timeout_secs"),
            "unexpected error message: {}",
            err
        );
    }

    #[test]
    fn rejects_query_strings_in_templates() {
        let config = ClientConfig {
            download_url_template: "https://example.test/{ticker}?events=history".to_string(),
            ..ClientConfig::builtin()
        };

        let err = validate_client_config(&config).expect_err("validation should fail");
        assert!(err.to_string().contains("download_url"));
    }
}
