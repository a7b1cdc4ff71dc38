use thiserror::Error;

/// Failures while talking to a provider or reading its feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Carries the XML parser's own message unchanged.
    #[error(transparent)]
    Xml(#[from] quick_xml::DeError),
}

/// Failures while loading or validating a topic configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
