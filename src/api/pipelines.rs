use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::client::ApiClient;

/// A single retrieved document.
///
/// We don't look inside these; they're handed back exactly as the API returned them.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The number of documents requested when a caller doesn't specify.
pub const DEFAULT_NUM_RESULTS: u32 = 5;

/// The body of a document retrieval request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveDocumentsRequest {
    /// The natural language question to retrieve documents for.
    pub question: String,
    /// How many documents the pipeline should return.
    pub num_results: u32,
}

impl RetrieveDocumentsRequest {
    pub fn new(question: impl Into<String>, num_results: Option<u32>) -> Self {
        Self {
            question: question.into(),
            num_results: num_results.unwrap_or(DEFAULT_NUM_RESULTS),
        }
    }
}

/// The response from a document retrieval request.
///
/// The API returns more than this (relevancy scores and the like),
/// but documents are all we need.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct RetrieveDocumentsResponse {
    #[serde(default)]
    pub documents: Option<Vec<Document>>,
}

/// Possible issues while retrieving documents.
#[derive(Debug, Error)]
pub enum RetrievalFailure {
    #[error("unable to build retrieval endpoint URL")]
    Endpoint,

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API responded with {status}")]
    Status { status: StatusCode, body: String },

    #[error("unable to parse API response: {source}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

impl RetrievalFailure {
    /// The response body the API sent alongside this failure, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            RetrievalFailure::Status { body, .. } | RetrievalFailure::Decode { body, .. }
                if !body.is_empty() =>
            {
                Some(body.as_str())
            }
            _ => None,
        }
    }
}

/// Anything able to retrieve documents from a pipeline.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve_documents(
        &self,
        organization_id: &str,
        pipeline_id: &str,
        request: &RetrieveDocumentsRequest,
    ) -> Result<RetrieveDocumentsResponse, RetrievalFailure>;
}

/// The pipelines portion of the Vectorize API.
#[derive(Clone, Debug)]
pub struct PipelinesApi {
    client: ApiClient,
}

impl PipelinesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentRetriever for PipelinesApi {
    /// Retrieves documents relevant to the given question.
    ///
    /// This is `POST /org/{organization_id}/pipelines/{pipeline_id}/retrieval`.
    async fn retrieve_documents(
        &self,
        organization_id: &str,
        pipeline_id: &str,
        request: &RetrieveDocumentsRequest,
    ) -> Result<RetrieveDocumentsResponse, RetrievalFailure> {
        let url = self
            .client
            .endpoint(&["org", organization_id, "pipelines", pipeline_id, "retrieval"])
            .ok_or(RetrievalFailure::Endpoint)?;
        tracing::debug!(%url, num_results = request.num_results, "retrieving documents");

        let result = self.client.http().post(url).json(request).send().await?;

        // We read the body as text first so it's available
        // for diagnostics should anything go wrong.
        let status = result.status();
        let body = result.text().await?;
        if !status.is_success() {
            return Err(RetrievalFailure::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|source| RetrievalFailure::Decode { source, body })
    }
}
