use reqwest::header::{self, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

/// The Vectorize API host all production requests go through.
pub const DEFAULT_HOST: &str = "https://api.vectorize.io/v1";

/// Problems we can hit while creating an API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("access token cannot be used as an Authorization header")]
    InvalidToken,

    #[error("invalid API host {host:?}: {source}")]
    InvalidHost {
        host: String,
        source: url::ParseError,
    },

    #[error("unable to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where, and as whom, we talk to the API.
#[derive(Clone)]
pub struct Configuration {
    /// The base URL every endpoint path is appended to.
    host: Url,
    /// The static bearer token sent with every request.
    access_token: String,
}

impl Configuration {
    /// Creates a configuration against the production host.
    pub fn new(access_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_host(access_token, DEFAULT_HOST)
    }

    /// Creates a configuration against a different host, e.g. a local test server.
    pub fn with_host(access_token: impl Into<String>, host: &str) -> Result<Self, ApiError> {
        let host = Url::parse(host).map_err(|source| ApiError::InvalidHost {
            host: host.to_string(),
            source,
        })?;

        Ok(Self {
            host,
            access_token: access_token.into(),
        })
    }

    pub fn host(&self) -> &Url {
        &self.host
    }
}

/// A handle on the API, shared by each of its sub-clients.
#[derive(Clone, Debug)]
pub struct ApiClient {
    /// The HTTP client, with authentication baked into its default headers.
    http: reqwest::Client,
    /// The base URL for all requests.
    host: Url,
}

impl ApiClient {
    /// Creates a new API client around the given configuration.
    pub fn new(configuration: Configuration) -> Result<Self, ApiError> {
        Self::with_builder(configuration, reqwest::Client::builder())
    }

    /// Creates a new API client, starting from an existing HTTP client builder.
    pub fn with_builder(
        configuration: Configuration,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, ApiError> {
        // Our token is static, so it can live within our default headers.
        // We mark it as sensitive so it never shows up in debug output.
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", configuration.access_token))
                .map_err(|_| ApiError::InvalidToken)?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = builder
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            host: configuration.host,
        })
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Creates an endpoint URL beneath our host.
    /// Each segment is percent-encoded, so identifiers can't escape their position.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }
}
