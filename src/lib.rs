//! A thin client for retrieving documents from a Vectorize pipeline.
//!
//! ```rust,no_run
//! use vectorizectl::VectorizeWrapper;
//!
//! async fn ask() -> Result<(), vectorizectl::ConfigurationError> {
//!     let wrapper = VectorizeWrapper::from_env()?;
//!     for document in wrapper.retrieve("What is a pipeline?", None).await {
//!         println!("{document:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
mod wrapper;

pub use api::{Document, RetrievalFailure, DEFAULT_NUM_RESULTS};
pub use config::{Config, ConfigurationError, REQUIRED_ENV_VARS};
pub use wrapper::VectorizeWrapper;
