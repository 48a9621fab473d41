//! HTTP generation pipeline
//!
//! Posts the params/config pair as JSON to the configured endpoint, then
//! downloads the asset bytes from the URL the service returns. Transient
//! transport failures and 429/5xx responses retry with exponential backoff.

use crate::config::MendConfig;
use crate::params::PipelineParams;
use crate::pipeline::{
    AssetMetadata, AssetPayload, GenerationPipeline, PipelineConfig, PipelineOutput,
};
use mend_core::{MendError, Result};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const MAX_RETRIES: usize = 3;
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Remote generation pipeline reached over HTTP.
pub struct HttpPipeline {
    api_url: String,
    api_key: Option<String>,
}

/// Response body for a generation request.
#[derive(Debug, Deserialize)]
struct RemoteResponse {
    asset: RemoteAsset,
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default, rename = "integrationPath")]
    integration_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoteAsset {
    #[serde(rename = "type")]
    kind: String,
    url: String,
    format: String,
    #[serde(default)]
    metadata: Option<AssetMetadata>,
}

impl HttpPipeline {
    /// Build from resolved config; the endpoint URL is required.
    pub fn from_config(config: &MendConfig) -> Result<Self> {
        let api_url = config
            .api_url()
            .ok_or_else(|| {
                MendError::PipelineError(
                    "pipeline URL not configured; set MEND_PIPELINE_URL or .mend/config.toml"
                        .to_string(),
                )
            })?
            .to_string();

        Ok(Self {
            api_url,
            api_key: config.api_key().map(|k| k.to_string()),
        })
    }

    fn post_with_retry(&self, payload: &serde_json::Value) -> Result<RemoteResponse> {
        for attempt in 0..MAX_RETRIES {
            let agent = build_agent();
            let mut request = agent
                .post(&self.api_url)
                .header("Content-Type", "application/json");
            if let Some(key) = &self.api_key {
                request = request.header("Authorization", &format!("Bearer {}", key));
            }

            match request.send_json(payload) {
                Ok(mut ok) => {
                    return ok.body_mut().read_json().map_err(|e| {
                        MendError::PipelineError(format!(
                            "failed to parse pipeline response: {}",
                            e
                        ))
                    });
                }
                Err(e) => {
                    if attempt + 1 < MAX_RETRIES && is_retryable_error(&e) {
                        sleep_backoff(attempt);
                        continue;
                    }
                    return Err(MendError::PipelineError(format!(
                        "pipeline request failed: {}",
                        e
                    )));
                }
            }
        }

        Err(MendError::PipelineError(
            "pipeline request failed after retries".to_string(),
        ))
    }

    fn download_bytes(&self, url: &str) -> Result<Vec<u8>> {
        for attempt in 0..MAX_RETRIES {
            let agent = build_agent();
            match agent.get(url).call() {
                Ok(ok) => {
                    let mut reader = ok.into_body().into_reader();
                    let mut bytes = Vec::new();
                    std::io::Read::read_to_end(&mut reader, &mut bytes).map_err(|e| {
                        MendError::PipelineError(format!("failed to read asset data: {}", e))
                    })?;
                    return Ok(bytes);
                }
                Err(e) => {
                    if attempt + 1 < MAX_RETRIES && is_retryable_error(&e) {
                        sleep_backoff(attempt);
                        continue;
                    }
                    return Err(MendError::PipelineError(format!(
                        "failed to download asset: {}",
                        e
                    )));
                }
            }
        }

        Err(MendError::PipelineError(
            "asset download failed after retries".to_string(),
        ))
    }
}

impl GenerationPipeline for HttpPipeline {
    fn name(&self) -> &str {
        "remote"
    }

    fn generate(&self, params: &PipelineParams, config: &PipelineConfig) -> Result<PipelineOutput> {
        let payload = serde_json::json!({
            "params": params,
            "config": config,
        });

        let response = self.post_with_retry(&payload)?;
        let data = self.download_bytes(&response.asset.url)?;

        let metadata = response.asset.metadata.unwrap_or_else(|| AssetMetadata {
            id: params.entity.clone(),
            name: params.entity.replace('_', " "),
            dimensions: params.resolution,
            format: response.asset.format.clone(),
            tags: Vec::new(),
            content_hash: None,
        });

        Ok(PipelineOutput {
            asset: AssetPayload {
                kind: response.asset.kind,
                data,
                metadata,
            },
            integration_path: response.integration_path,
            errors: response.errors,
        })
    }
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => true,
        ureq::Error::StatusCode(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

fn sleep_backoff(attempt: usize) {
    let delay_ms = RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt);
    std::thread::sleep(Duration::from_millis(delay_ms));
}

/// Parse a pipeline response body (exposed for testing).
pub fn parse_pipeline_response(json: &str) -> Result<(String, String)> {
    let response: RemoteResponse = serde_json::from_str(json)
        .map_err(|e| MendError::PipelineError(format!("invalid response JSON: {}", e)))?;
    Ok((response.asset.url, response.asset.format))
}
