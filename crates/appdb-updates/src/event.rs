//! Notifications emitted by the coordinator
//!
//! Every check emits `Loading` followed by exactly one terminal event.

use crate::error::UpdatesError;
use crate::partition::ResultPartition;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    /// A check started
    Loading,

    /// Updates are available
    Updated {
        partition: ResultPartition,
        badge: Option<usize>,
    },

    /// The check succeeded but nothing is left to show
    NoUpdates,

    /// The check failed
    Failed {
        title: String,
        detail: String,
        reason: UpdatesError,
    },

    /// The badge to display changed without a new check (preference toggled)
    BadgeChanged(Option<usize>),
}

impl UpdateEvent {
    pub fn failed(reason: UpdatesError) -> Self {
        UpdateEvent::Failed {
            title: reason.title().to_string(),
            detail: reason.detail(),
            reason,
        }
    }

    /// Event describing a successful result
    pub fn for_partition(partition: &ResultPartition) -> Self {
        if partition.is_empty() {
            UpdateEvent::NoUpdates
        } else {
            UpdateEvent::Updated {
                partition: partition.clone(),
                badge: partition.badge_count(),
            }
        }
    }

    /// Does this event end a check?
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UpdateEvent::Updated { .. } | UpdateEvent::NoUpdates | UpdateEvent::Failed { .. }
        )
    }
}
