use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/predict";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(1500);

pub const ENV_GATEWAY: &str = "CHD_GATEWAY";
pub const ENV_ENDPOINT: &str = "CHD_PREDICT_URL";
pub const ENV_TIMEOUT_SECS: &str = "CHD_TIMEOUT_SECS";
pub const ENV_MOCK_DELAY_MS: &str = "CHD_MOCK_DELAY_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Mock,
    Http,
}

impl std::str::FromStr for GatewayKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(GatewayKind::Mock),
            "http" | "remote" => Ok(GatewayKind::Http),
            other => Err(ConfigError::UnknownGateway(other.to_string())),
        }
    }
}

impl std::fmt::Display for GatewayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayKind::Mock => f.write_str("mock"),
            GatewayKind::Http => f.write_str("http"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayConfig {
    pub kind: GatewayKind,
    pub endpoint: String,
    pub timeout: Duration,
    pub mock_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: GatewayKind::Mock,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            mock_delay: DEFAULT_MOCK_DELAY,
            seed: None,
        }
    }
}

impl GatewayConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_lookup(|key| std::env::var(key).ok())
    }

    /// Overlays values found through `lookup`; unset or blank keys keep the
    /// current value.
    pub fn with_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(kind) = get(ENV_GATEWAY) {
            self.kind = kind.parse()?;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(ms) = get(ENV_MOCK_DELAY_MS) {
            self.mock_delay = Duration::from_millis(parse_number(ENV_MOCK_DELAY_MS, &ms)?);
        }
        self.validate()?;
        Ok(self)
    }

    /// Applies explicit settings (usually command-line flags) on top.
    pub fn with_overrides(mut self, overrides: GatewayOverrides) -> Result<Self, ConfigError> {
        if let Some(kind) = overrides.kind {
            self.kind = kind;
        }
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(delay) = overrides.mock_delay {
            self.mock_delay = delay;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kind == GatewayKind::Http {
            let endpoint = self.endpoint.as_str();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
            }
            if self.timeout.is_zero() {
                return Err(ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value: "0".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Explicitly requested settings; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayOverrides {
    pub kind: Option<GatewayKind>,
    pub endpoint: Option<String>,
    pub timeout: Option<Duration>,
    pub mock_delay: Option<Duration>,
    pub seed: Option<u64>,
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value: value.to_string() })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownGateway(String),
    InvalidEndpoint(String),
    InvalidValue { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownGateway(kind) => {
                write!(f, "unknown gateway `{kind}` (expected `mock` or `http`)")
            }
            Self::InvalidEndpoint(url) => write!(f, "endpoint must be an http(s) URL: {url}"),
            Self::InvalidValue { key, value } => write!(f, "invalid value for {key}: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_use_the_mock() {
        let config = GatewayConfig::default().with_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.kind, GatewayKind::Mock);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = GatewayConfig::default()
            .with_lookup(lookup(&[
                (ENV_GATEWAY, "HTTP"),
                (ENV_ENDPOINT, "http://risk.local:8080/predict"),
                (ENV_TIMEOUT_SECS, "3"),
                (ENV_MOCK_DELAY_MS, " "),
            ]))
            .unwrap();
        assert_eq!(config.kind, GatewayKind::Http);
        assert_eq!(config.endpoint, "http://risk.local:8080/predict");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.mock_delay, DEFAULT_MOCK_DELAY);
    }

    #[test]
    fn bad_values_are_reported() {
        let err = GatewayConfig::default()
            .with_lookup(lookup(&[(ENV_GATEWAY, "grpc")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::UnknownGateway("grpc".to_string()));

        let err = GatewayConfig::default()
            .with_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_TIMEOUT_SECS, .. }));

        let err = GatewayConfig::default()
            .with_lookup(lookup(&[(ENV_GATEWAY, "http"), (ENV_ENDPOINT, "localhost:5000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn overrides_win_over_environment() {
        let config = GatewayConfig::default()
            .with_lookup(lookup(&[(ENV_GATEWAY, "http"), (ENV_TIMEOUT_SECS, "3")]))
            .and_then(|c| {
                c.with_overrides(GatewayOverrides {
                    kind: Some(GatewayKind::Mock),
                    mock_delay: Some(Duration::ZERO),
                    seed: Some(42),
                    ..GatewayOverrides::default()
                })
            })
            .unwrap();
        assert_eq!(config.kind, GatewayKind::Mock);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.mock_delay, Duration::ZERO);
        assert_eq!(config.seed, Some(42));
    }
}
