use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::{Context, Result};
use crate::fetch::request::expand_env_vars;

use super::{validator, Backpressure, ClientConfig};

/// Load a client configuration from a JSON file.
///
/// Missing keys fall back to [`ClientConfig::builtin`]. `${VAR}` placeholders in the
/// user agent are expanded from the environment.
pub fn load_client_config(path: &Path) -> Result<ClientConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read client config at {}", path.display()))?;

    let raw: RawClientConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse client config at {}", path.display()))?;

    let config = raw.into_client_config()?;
    validator::validate_client_config(&config)?;

    Ok(config)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClientConfig {
    chart_url: Option<String>,
    download_url: Option<String>,
    user_agent: Option<String>,
    request_timeout_secs: Option<u64>,
    batch_concurrency: Option<usize>,
    poll_buffer: Option<usize>,
    backpressure: Option<Backpressure>,
}

impl RawClientConfig {
    fn into_client_config(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::builtin();

        let user_agent = match self.user_agent {
            Some(template) => expand_env_vars(&template)?,
            None => defaults.user_agent,
        };

        Ok(ClientConfig {
            chart_url_template: self.chart_url.unwrap_or(defaults.chart_url_template),
            download_url_template: self.download_url.unwrap_or(defaults.download_url_template),
            user_agent,
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .or(defaults.request_timeout),
            batch_concurrency: self.batch_concurrency.unwrap_or(defaults.batch_concurrency),
            poll_buffer: self.poll_buffer.unwrap_or(defaults.poll_buffer),
            backpressure: self.backpressure.unwrap_or(defaults.backpressure),
        })
    }
}
