//! Collaborator traits for the update checker
//!
//! This module defines the `UpdateService` trait that all service
//! implementations must satisfy, together with the ignore list and
//! device link contracts the coordinator reads.

use crate::types::{IgnoreEntry, PollTicket, ServiceError, UpdateCandidate};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// appdb update service
///
/// An update check is a two step exchange: obtain a ticket, then poll the
/// status for that ticket until the service has finished computing it.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use appdb_client::{UpdateService, UpdateCandidate, ServiceError};
///
/// async fn once(service: &dyn UpdateService) -> Result<Vec<UpdateCandidate>, ServiceError> {
///     let ticket = service.request_ticket().await?;
///     service.poll_updates(&ticket).await
/// }
/// ```
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Request a ticket for a new update check
    ///
    /// # Returns
    ///
    /// The ticket, or an error describing why the service could not be reached.
    async fn request_ticket(&self) -> Result<PollTicket, ServiceError>;

    /// Poll the update status for a ticket
    ///
    /// # Arguments
    ///
    /// * `ticket` - Ticket obtained from `request_ticket` in the same check
    ///
    /// # Returns
    ///
    /// The candidates with updates (possibly empty). While the service is
    /// still working it answers with an error for which
    /// [`ServiceError::is_not_ready`] holds.
    async fn poll_updates(&self, ticket: &PollTicket) -> Result<Vec<UpdateCandidate>, ServiceError>;
}

/// Persisted list of apps hidden from the update list
///
/// Implementations use interior mutability so a single store can be shared
/// between the coordinator and the code presenting the ignore list.
pub trait IgnoreStore: Send + Sync {
    /// Is this identifier ignored?
    fn contains(&self, track_id: &str) -> bool;

    /// Add an entry. Adding an already ignored identifier is a no-op.
    fn add(&self, entry: IgnoreEntry) -> anyhow::Result<()>;

    /// Remove an entry, returning whether it was present
    fn remove(&self, track_id: &str) -> anyhow::Result<bool>;

    /// All ignored entries, in insertion order
    fn all(&self) -> Vec<IgnoreEntry>;
}

/// Source of the "device is linked" precondition
pub trait DeviceLink: Send + Sync {
    fn is_linked(&self) -> bool;
}

impl DeviceLink for AtomicBool {
    fn is_linked(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl DeviceLink for bool {
    fn is_linked(&self) -> bool {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_device_link_follows_flag() {
        let link = AtomicBool::new(false);
        assert!(!link.is_linked());
        link.store(true, Ordering::SeqCst);
        assert!(link.is_linked());
    }

    #[test]
    fn test_bool_device_link() {
        assert!(true.is_linked());
        assert!(!false.is_linked());
    }
}
