//! Prediction providers for the risk questionnaire.
//!
//! Callers hold a [`PredictorGateway`] and never learn which implementation
//! answered: [`MockGateway`] draws a random probability locally,
//! [`HttpGateway`] asks a remote `/predict` endpoint.

mod config;
mod http;
mod mock;
pub mod wire;

use std::sync::Arc;

use chd_model::{PredictError, PredictionResult, RiskInput};
use log::info;

pub use config::{
    ConfigError, GatewayConfig, GatewayKind, GatewayOverrides, DEFAULT_ENDPOINT, DEFAULT_MOCK_DELAY,
    DEFAULT_TIMEOUT, ENV_ENDPOINT, ENV_GATEWAY, ENV_MOCK_DELAY_MS, ENV_TIMEOUT_SECS,
};
pub use http::HttpGateway;
pub use mock::MockGateway;

pub trait PredictorGateway: Send + Sync {
    fn name(&self) -> &'static str;

    /// Blocks until the provider answers. Called off the UI thread.
    fn predict(&self, input: &RiskInput) -> Result<PredictionResult, PredictError>;
}

/// Builds the gateway the configuration selects.
pub fn build_gateway(config: &GatewayConfig) -> Result<Arc<dyn PredictorGateway>, PredictError> {
    let gateway: Arc<dyn PredictorGateway> = match config.kind {
        GatewayKind::Mock => match config.seed {
            Some(seed) => Arc::new(MockGateway::seeded(config.mock_delay, seed)),
            None => Arc::new(MockGateway::new(config.mock_delay)),
        },
        GatewayKind::Http => Arc::new(HttpGateway::new(config.endpoint.clone(), config.timeout)?),
    };
    info!("using {} predictor", gateway.name());
    Ok(gateway)
}
