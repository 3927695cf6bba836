//! Update checking for apps installed from appdb
//!
//! The [`UpdateCheckCoordinator`] drives one update check at a time:
//!
//! ```text
//! check_updates()
//!   ├─ DeviceLink::is_linked()          precondition
//!   ├─ UpdateService::request_ticket()  one ticket per check
//!   └─ UpdateService::poll_updates()    retried while "not ready", bounded
//!        └─ ResultPartition              ignore-filtered, sorted, split
//! ```
//!
//! Results are returned to the caller and broadcast as [`UpdateEvent`]s.
//!
//! # Example
//!
//! ```rust,no_run
//! use appdb_updates::{CheckSettings, UpdateCheckCoordinator};
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! # async fn example(
//! #     service: Arc<dyn appdb_client::UpdateService>,
//! #     store: Arc<dyn appdb_client::IgnoreStore>,
//! # ) {
//! let (_badge_tx, badge_rx) = tokio::sync::watch::channel(true);
//! let coordinator = UpdateCheckCoordinator::spawn(
//!     service,
//!     store,
//!     Arc::new(AtomicBool::new(true)),
//!     CheckSettings::default(),
//!     badge_rx,
//! );
//! match coordinator.check_updates().await {
//!     Ok(partition) => println!("{} updates", partition.len()),
//!     Err(e) => eprintln!("{}: {}", e.title(), e.detail()),
//! }
//! # }
//! ```

pub mod coordinator;
pub mod error;
pub mod event;
pub mod partition;
pub mod state;

pub use coordinator::{CheckSettings, UpdateCheckCoordinator};
pub use error::UpdatesError;
pub use event::UpdateEvent;
pub use partition::{ResultPartition, Section};
pub use state::CheckState;
