mod client;
mod pipelines;

pub use client::{ApiClient, ApiError, Configuration, DEFAULT_HOST};
pub use pipelines::{
    Document, DocumentRetriever, PipelinesApi, RetrievalFailure, RetrieveDocumentsRequest,
    RetrieveDocumentsResponse, DEFAULT_NUM_RESULTS,
};
