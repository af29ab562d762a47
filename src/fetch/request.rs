use crate::config::ClientConfig;
use crate::error::{Context, QuoteError};
use crate::quote::{Interval, TimeRange};
use crate::utils::normalize_ticker;

use super::FetchResult;

/// Which provider endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chart,
    Download,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
}

/// Build the URL and query parameters for one ticker.
pub fn prepare_request(
    config: &ClientConfig,
    endpoint: Endpoint,
    ticker: &str,
    interval: Interval,
    range: TimeRange,
) -> FetchResult<PreparedRequest> {
    let ticker = normalize_ticker(ticker)?;

    let template = match endpoint {
        Endpoint::Chart => &config.chart_url_template,
        Endpoint::Download => &config.download_url_template,
    };

    let url = render_url(template, &ticker)?;

    let mut query = vec![
        ("interval", interval.as_str().to_string()),
        ("period1", range.start.to_string()),
        ("period2", range.end.to_string()),
    ];
    if endpoint == Endpoint::Download {
        query.push(("events", "history".to_string()));
    }

    Ok(PreparedRequest { url, query })
}

/// Replace `${NAME}` placeholders with environment variable values.
pub fn expand_env_vars(value: &str) -> FetchResult<String> {
    substitute(value, "${", |name| {
        Ok(std::env::var(name)
            .with_context(|| format!("environment variable {} is not set", name))?)
    })
}

fn render_url(template: &str, ticker: &str) -> FetchResult<String> {
    substitute(template, "{", |key| match key {
        "ticker" => Ok(ticker.to_string()),
        other => Err(QuoteError::config(format!(
            "unknown placeholder `{{{other}}}` in `{template}`"
        ))),
    })
}

/// Copy `input`, replacing each `<open>NAME}` with `lookup(NAME)`.
fn substitute<F>(input: &str, open: &str, mut lookup: F) -> FetchResult<String>
where
    F: FnMut(&str) -> FetchResult<String>,
{
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(at) = rest.find(open) {
        output.push_str(&rest[..at]);
        let tail = &rest[at + open.len()..];
        let close = tail.find('}').ok_or_else(|| {
            QuoteError::config(format!("unterminated placeholder in `{input}`"))
        })?;

        let name = &tail[..close];
        if name.is_empty() {
            return Err(QuoteError::config(format!("empty placeholder in `{input}`")));
        }
        output.push_str(&lookup(name)?);
        rest = &tail[close + 1..];
    }

    output.push_str(rest);
    Ok(output)
}
