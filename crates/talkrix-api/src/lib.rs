//! Thin REST boundary for the Talkrix backend.
//!
//! One async method per backend operation on [`ApiClient`]. Responses are
//! decoded into `talkrix_core::models` records; failures are typed as
//! [`ApiError`].

mod agents;
mod auth;
mod calls;
mod campaigns;
mod client;
mod corpora;
mod error;
mod settings;
mod upload;

pub use calls::CallQuery;
pub use client::ApiClient;
pub use client::ApiResult;
pub use corpora::DEFAULT_MAX_RESULTS;
pub use error::ApiError;
pub use upload::mime_for;
pub use upload::DocumentUpload;
pub use upload::UploadError;
pub use upload::UploadStage;
