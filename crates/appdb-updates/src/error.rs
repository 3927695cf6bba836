use thiserror::Error;

/// Why an update check (or an operation on its result) failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdatesError {
    #[error("Please authorize app from Settings first")]
    NotLinked,

    #[error("{0}")]
    Connection(String),

    #[error("Timed out waiting for the update status")]
    Timeout,

    #[error("{0}")]
    Other(String),

    #[error("No visible update with id {0}")]
    NotVisible(String),

    #[error("An update check is in progress")]
    CheckInProgress,

    #[error("Failed to update ignored apps: {0}")]
    Store(String),

    /// A newer check started before this one finished; its result was discarded
    #[error("Superseded by a newer update check")]
    Superseded,
}

impl UpdatesError {
    /// Headline shown above the error detail
    pub fn title(&self) -> &'static str {
        match self {
            UpdatesError::NotLinked | UpdatesError::Store(_) => "An error has occurred",
            UpdatesError::Connection(_) | UpdatesError::Timeout | UpdatesError::Other(_) => {
                "Cannot connect"
            }
            UpdatesError::NotVisible(_) | UpdatesError::CheckInProgress => "Cannot ignore app",
            UpdatesError::Superseded => "Update check cancelled",
        }
    }

    /// Detail line shown under the title
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles() {
        assert_eq!(UpdatesError::NotLinked.title(), "An error has occurred");
        assert_eq!(UpdatesError::Timeout.title(), "Cannot connect");
        assert_eq!(UpdatesError::Connection("x".into()).title(), "Cannot connect");
        assert_eq!(UpdatesError::Other("x".into()).title(), "Cannot connect");
    }

    #[test]
    fn test_detail_carries_collaborator_message() {
        let err = UpdatesError::Connection("The Internet connection appears to be offline".into());
        assert_eq!(err.detail(), "The Internet connection appears to be offline");
        assert_eq!(
            UpdatesError::NotLinked.detail(),
            "Please authorize app from Settings first"
        );
    }
}
