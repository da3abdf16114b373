//! # taskdeck
//!
//! Session-aware client for a multi-tenant task-management REST API.
//!
//! ## Features
//!
//! - **Durable sessions**: the bearer token survives restarts in a single
//!   JSON file, and is cleared on logout or authorization denial
//! - **Consistent state**: the in-memory task list only ever reflects
//!   server-confirmed records
//! - **Distinct failure kinds**: validation, rejected credentials,
//!   forced logout, connectivity and unexpected API errors are separate
//!   variants
//! - **Tenant administration**: admin-only endpoints for managing
//!   accounts and subscription tiers
//!
//! ## Modules
//!
//! - [`client`]: the session & task client itself
//! - [`session`]: durable session storage
//! - [`store`]: in-memory task list state
//! - [`model`]: records exchanged with the API
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use taskdeck::{Credentials, SessionStore, TaskClient, TaskFilter};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionStore::open(SessionStore::default_path())?;
//!     let mut client =
//!         TaskClient::new("http://localhost:8080", Duration::from_secs(10), session)?;
//!
//!     client
//!         .login(&Credentials {
//!             email: "ada@example.com".to_string(),
//!             password: "secret".to_string(),
//!         })
//!         .await?;
//!
//!     let tasks = client.list_tasks(TaskFilter::All).await?;
//!     println!("{} open tasks", tasks.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod store;

// Re-export top-level types for convenience
pub use client::{
    CreateTenant, Credentials, NewTask, PasswordChange, ProfileUpdate, RegisterInput, TaskClient,
    TaskFilter,
};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, SessionConfig};

pub use error::{ClientError, ClientResult};

pub use model::{Priority, Status, SubscriptionTier, Task, Tenant, UserProfile};

pub use session::{Session, SessionError, SessionStore};

pub use store::{TaskList, TaskStats};
