//! appdb API client and update-check collaborators
//!
//! This crate provides the contracts the update checker depends on, plus
//! the HTTP implementation of the update service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              UpdateService trait                 │
//! │  - request_ticket()                              │
//! │  - poll_updates(ticket)                          │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌───────────────────┐
//!              │ HttpUpdateService │
//!              │ (JSON API)        │
//!              └───────────────────┘
//!
//! IgnoreStore trait   - persisted ignore list (see appdb-config)
//! DeviceLink trait    - "is this device linked" precondition
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use appdb_client::{HttpUpdateService, UpdateService};
//!
//! # async fn example() -> Result<(), appdb_client::ServiceError> {
//! let service = HttpUpdateService::new(appdb_client::DEFAULT_ENDPOINT, Some("token".into()), "en");
//! let ticket = service.request_ticket().await?;
//! let apps = service.poll_updates(&ticket).await?;
//! println!("{} apps tracked", apps.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod http_client;
pub mod types;

/// Default storefront API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.dbservices.to/v1.7/";

pub use client::{DeviceLink, IgnoreStore, UpdateService};
pub use http_client::HttpUpdateService;
pub use types::{
    AppSource, IgnoreEntry, PollTicket, ServiceError, UpdateCandidate, NOT_READY_CODE,
};
