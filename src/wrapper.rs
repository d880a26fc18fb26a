use crate::api::{
    ApiClient, Configuration, Document, DocumentRetriever, PipelinesApi, RetrievalFailure,
    RetrieveDocumentsRequest,
};
use crate::config::{Config, ConfigurationError, REQUIRED_ENV_VARS};

/// Retrieves documents from a single Vectorize pipeline.
///
/// Everything is set up once at construction; a wrapper that exists is ready to use.
pub struct VectorizeWrapper<R = PipelinesApi> {
    config: Config,
    pipelines: R,
}

impl VectorizeWrapper {
    /// Creates a wrapper talking to the Vectorize API with the given configuration.
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        let configuration = Configuration::new(config.access_token())?;
        let api_client = ApiClient::new(configuration)?;
        let pipelines = PipelinesApi::new(api_client);

        Ok(Self::with_retriever(config, pipelines))
    }

    /// Creates a wrapper configured through the process environment.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::new(Config::from_env()?)
    }

    /// The environment variables `from_env` requires.
    /// Useful to check configuration before attempting to create a wrapper.
    pub fn required_env_vars() -> &'static [&'static str] {
        &REQUIRED_ENV_VARS
    }
}

impl<R: DocumentRetriever> VectorizeWrapper<R> {
    /// Creates a wrapper around any document retriever.
    pub fn with_retriever(config: Config, pipelines: R) -> Self {
        Self { config, pipelines }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieves documents relevant to `question`, in the order the pipeline ranked them.
    ///
    /// `num_results` defaults to [`DEFAULT_NUM_RESULTS`](crate::DEFAULT_NUM_RESULTS).
    /// A response without any documents is an empty list, not a failure.
    pub async fn try_retrieve(
        &self,
        question: &str,
        num_results: Option<u32>,
    ) -> Result<Vec<Document>, RetrievalFailure> {
        let request = RetrieveDocumentsRequest::new(question, num_results);
        let response = self
            .pipelines
            .retrieve_documents(
                self.config.organization_id(),
                self.config.pipeline_id(),
                &request,
            )
            .await?;

        let Some(documents) = response.documents else {
            tracing::debug!("retrieval response contained no documents");
            return Ok(Vec::new());
        };
        Ok(documents)
    }

    /// Retrieves documents relevant to `question`, never failing.
    ///
    /// Any failure is logged and treated as though no documents were found.
    /// Use [`try_retrieve`](Self::try_retrieve) to tell the two apart.
    pub async fn retrieve(&self, question: &str, num_results: Option<u32>) -> Vec<Document> {
        match self.try_retrieve(question, num_results).await {
            Ok(documents) => documents,
            Err(failure) => {
                tracing::error!(
                    pipeline_id = self.config.pipeline_id(),
                    "Error retrieving documents: {failure}"
                );
                if let Some(body) = failure.body() {
                    tracing::error!("Error response body: {body}");
                }
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{RetrieveDocumentsResponse, DEFAULT_NUM_RESULTS};
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    type Respond =
        Box<dyn Fn() -> Result<RetrieveDocumentsResponse, RetrievalFailure> + Send + Sync>;

    /// Records every call made, answering each with the same scripted result.
    struct ScriptedRetriever {
        calls: Mutex<Vec<(String, String, RetrieveDocumentsRequest)>>,
        respond: Respond,
    }

    impl ScriptedRetriever {
        fn new(respond: Respond) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond,
            }
        }

        fn returning(documents: Option<Vec<Document>>) -> Self {
            Self::new(Box::new(move || {
                Ok(RetrieveDocumentsResponse {
                    documents: documents.clone(),
                })
            }))
        }
    }

    #[async_trait]
    impl DocumentRetriever for ScriptedRetriever {
        async fn retrieve_documents(
            &self,
            organization_id: &str,
            pipeline_id: &str,
            request: &RetrieveDocumentsRequest,
        ) -> Result<RetrieveDocumentsResponse, RetrievalFailure> {
            self.calls.lock().unwrap().push((
                organization_id.to_string(),
                pipeline_id.to_string(),
                request.clone(),
            ));
            (self.respond)()
        }
    }

    fn test_config() -> Config {
        Config::new("token", "org-1", "pipe-1").unwrap()
    }

    fn document(value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_required_env_vars() {
        let expected = [
            "VECTORIZE_PIPELINE_ACCESS_TOKEN",
            "VECTORIZE_ORGANIZATION_ID",
            "VECTORIZE_PIPELINE_ID",
        ];
        assert_eq!(VectorizeWrapper::required_env_vars(), expected);
        // Nothing about prior calls or construction changes this.
        let _ = VectorizeWrapper::new(test_config()).unwrap();
        assert_eq!(VectorizeWrapper::required_env_vars(), expected);
    }

    #[test]
    fn test_new_with_valid_config() {
        let wrapper = VectorizeWrapper::new(test_config()).unwrap();
        assert_eq!(wrapper.config().organization_id(), "org-1");
        assert_eq!(wrapper.config().pipeline_id(), "pipe-1");
    }

    #[test]
    fn test_new_with_unusable_token() {
        let config = Config::new("line\nbreak", "org-1", "pipe-1").unwrap();
        let result = VectorizeWrapper::new(config);
        assert!(matches!(result, Err(ConfigurationError::Client(_))));
    }

    #[test]
    fn test_wrapper_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VectorizeWrapper>();
    }

    #[tokio::test]
    async fn test_returns_documents_in_order() {
        let d1 = document(json!({"id": "d1", "text": "first", "relevancy": 0.2}));
        let d2 = document(json!({"id": "d2", "text": "second", "relevancy": 0.9}));
        let retriever = ScriptedRetriever::returning(Some(vec![d1.clone(), d2.clone()]));
        let wrapper = VectorizeWrapper::with_retriever(test_config(), retriever);

        let documents = wrapper.retrieve("what is X?", None).await;
        assert_eq!(documents, vec![d1, d2]);
    }

    #[tokio::test]
    async fn test_forwards_arguments() {
        let wrapper =
            VectorizeWrapper::with_retriever(test_config(), ScriptedRetriever::returning(None));

        wrapper.retrieve("what is X?", Some(3)).await;
        wrapper.retrieve("what is Y?", None).await;

        let calls = wrapper.pipelines.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);

        let (organization_id, pipeline_id, request) = &calls[0];
        assert_eq!(organization_id, "org-1");
        assert_eq!(pipeline_id, "pipe-1");
        assert_eq!(request.question, "what is X?");
        assert_eq!(request.num_results, 3);

        assert_eq!(calls[1].2.question, "what is Y?");
        assert_eq!(calls[1].2.num_results, DEFAULT_NUM_RESULTS);
        assert_eq!(DEFAULT_NUM_RESULTS, 5);
    }

    #[tokio::test]
    async fn test_missing_documents_is_empty() {
        let wrapper =
            VectorizeWrapper::with_retriever(test_config(), ScriptedRetriever::returning(None));

        assert!(wrapper.retrieve("anything", None).await.is_empty());
        assert!(wrapper.try_retrieve("anything", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_empty() {
        let retriever = ScriptedRetriever::new(Box::new(|| {
            Err(RetrievalFailure::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: r#"{"error":"boom"}"#.to_string(),
            })
        }));
        let wrapper = VectorizeWrapper::with_retriever(test_config(), retriever);

        assert!(wrapper.retrieve("what is X?", None).await.is_empty());

        // The fallible variant surfaces what went wrong.
        let failure = wrapper.try_retrieve("what is X?", None).await.unwrap_err();
        assert_eq!(failure.body(), Some(r#"{"error":"boom"}"#));
    }

    #[tokio::test]
    async fn test_network_failure_is_empty() {
        // Nothing listens on this port once the listener is dropped.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let configuration =
            Configuration::with_host("token", &format!("http://{address}/v1")).unwrap();
        let api_client =
            ApiClient::with_builder(configuration, reqwest::Client::builder().no_proxy()).unwrap();
        let wrapper = VectorizeWrapper::with_retriever(test_config(), PipelinesApi::new(api_client));

        assert!(wrapper.retrieve("what is X?", Some(3)).await.is_empty());
        assert!(matches!(
            wrapper.try_retrieve("what is X?", Some(3)).await,
            Err(RetrievalFailure::Network(_))
        ));
    }
}
