pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod stores;

pub use client::{ApiClient, Connection};
pub use config::RagdeskConfig;
pub use error::{ApiError, ApiResult};
pub use routes::{guard, page_title, Route};
pub use services::ProgressFn;
pub use session::{with_credential, CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
pub use stores::{DocumentStore, DocumentsApi, SystemApi, SystemStore};
