use std::fmt;

use thiserror::Error;

use crate::api::ApiError;

/// The bearer credential for the Vectorize API.
pub const ACCESS_TOKEN_VAR: &str = "VECTORIZE_PIPELINE_ACCESS_TOKEN";
/// The organization our pipeline lives within.
pub const ORGANIZATION_ID_VAR: &str = "VECTORIZE_ORGANIZATION_ID";
/// The retrieval pipeline we query.
pub const PIPELINE_ID_VAR: &str = "VECTORIZE_PIPELINE_ID";

/// Every environment variable we require, in the order we report them.
pub const REQUIRED_ENV_VARS: [&str; 3] = [ACCESS_TOKEN_VAR, ORGANIZATION_ID_VAR, PIPELINE_ID_VAR];

/// Possible issues while setting up a wrapper.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing required Vectorize environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),

    #[error("Unable to create Vectorize API client: {0}")]
    Client(#[from] ApiError),
}

/// Everything necessary to talk to a single Vectorize pipeline.
///
/// A `Config` can only be created with all three values present,
/// so anything holding one can assume it's usable.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    access_token: String,
    organization_id: String,
    pipeline_id: String,
}

impl Config {
    /// Creates a configuration from explicit values.
    /// Empty values are treated the same as missing ones.
    pub fn new(
        access_token: impl Into<String>,
        organization_id: impl Into<String>,
        pipeline_id: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let values = [access_token.into(), organization_id.into(), pipeline_id.into()];
        Self::from_lookup(|name| {
            let index = REQUIRED_ENV_VARS.iter().position(|var| *var == name)?;
            Some(values[index].clone())
        })
    }

    /// Reads our configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads our configuration through the given lookup, keyed by environment variable name.
    ///
    /// All variables are checked before failing, so the error lists
    /// every missing variable rather than only the first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let access_token = require(ACCESS_TOKEN_VAR);
        let organization_id = require(ORGANIZATION_ID_VAR);
        let pipeline_id = require(PIPELINE_ID_VAR);

        if !missing.is_empty() {
            return Err(ConfigurationError::MissingVariables(missing));
        }

        Ok(Self {
            access_token,
            organization_id,
            pipeline_id,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }
}

// The access token stays out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("organization_id", &self.organization_id)
            .field("pipeline_id", &self.pipeline_id)
            .finish()
    }
}
