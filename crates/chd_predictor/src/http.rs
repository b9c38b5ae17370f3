use std::time::Duration;

use chd_model::{PredictError, PredictionResult, RiskInput};
use log::{debug, error, info};
use reqwest::blocking::Client;

use crate::wire::{error_message, parse_response};
use crate::PredictorGateway;

/// Posts the questionnaire to a remote `/predict` endpoint.
pub struct HttpGateway {
    endpoint: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictorGateway for HttpGateway {
    fn name(&self) -> &'static str {
        "http"
    }

    fn predict(&self, input: &RiskInput) -> Result<PredictionResult, PredictError> {
        info!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(input)
            .send()
            .map_err(|e| {
                error!("predict request failed: {e}");
                PredictError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| PredictError::Transport(e.to_string()))?;
        debug!("predict responded {status}: {body}");

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request rejected").to_string());
            error!("predict returned {status}: {message}");
            return Err(PredictError::Server {
                status: Some(status.as_u16()),
                message,
            });
        }

        parse_response(&body)
    }
}
