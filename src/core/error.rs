use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Checkout failed: {0}")]
    Checkout(String),

    #[error("Provisioning failed: {0}")]
    Provision(String),

    #[error("Lint failed: {0}")]
    Lint(String),

    #[error("No configuration file found in {dir}")]
    NoArtifacts { dir: String },

    #[error("Could not determine probe target: {0}")]
    Identifier(String),

    #[error("Reachability probe against '{host}' failed: {detail}")]
    Probe { host: String, detail: String },

    #[error("{context} failed: {detail}")]
    CommandFailed { context: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::Checkout(_) => "CHECKOUT_FAILED",
            Error::Provision(_) => "PROVISION_FAILED",
            Error::Lint(_) => "LINT_FAILED",
            Error::NoArtifacts { .. } => "NO_ARTIFACTS",
            Error::Identifier(_) => "IDENTIFIER_UNDERIVABLE",
            Error::Probe { .. } => "PROBE_FAILED",
            Error::CommandFailed { .. } => "COMMAND_FAILED",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }
}
