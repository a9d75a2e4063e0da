//! hgdash - static dashboard server with an offline cache worker.
//!
//! The server side serves the dashboard's static assets and mounts small
//! [`Servlet`] handlers on path prefixes (`/api/manifest`,
//! `/api/repositories`). The worker side is a [`CacheController`] that keeps
//! one versioned bucket of precached assets and answers GET requests from it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hgdash::{AppConfig, CacheController, FetchRequest, HttpNetwork, MemoryCacheStorage};
//!
//! # async fn example() -> hgdash::Result<()> {
//! let config = AppConfig::load(None)?;
//!
//! let storage = Arc::new(MemoryCacheStorage::new());
//! let worker = CacheController::new(&config.worker_config(), storage, HttpNetwork::new()?)?;
//! worker.install().await?;
//! worker.activate().await?;
//!
//! let outcome = worker.fetch(&FetchRequest::get("./")).await?;
//! println!("{} bytes from {:?}", outcome.response.body.len(), outcome.source);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod error;
pub mod repository;
#[cfg(feature = "server")]
pub mod servlet;
pub mod web;
pub mod worker;

// Re-export main types for convenience
#[cfg(feature = "server")]
pub use api::{Manifest, RepositoryList, WebManifest, router, run_server, run_static};
pub use config::{AppConfig, ServerConfig, WorkerConfig};
pub use error::{Error, Result};
pub use repository::{RepositoryManager, RepositoryProvider};
#[cfg(feature = "server")]
pub use servlet::{Servlet, ServletResponse, dispatch, mount};
pub use web::service_worker_js;
pub use worker::{
    CacheController, CacheStorage, CachedResponse, FetchOutcome, FetchRequest, HttpNetwork,
    MemoryCacheStorage, Network, ResponseSource, WorkerHandle, WorkerState, spawn_worker,
};
