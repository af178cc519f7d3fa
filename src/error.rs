use thiserror::Error;

/// Everything a widget operation can fail with.
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("invalid configuration: {reason}")]
    ConfigurationInvalid { reason: String },

    #[error("container not found: {container}")]
    ContainerNotFound { container: String },

    #[error("no style slot for group `{group}`")]
    GroupSlotMissing { group: String },

    #[error("unknown group `{group}`")]
    UnknownGroup { group: String },

    #[error("group `{group}` has no option `{option}`")]
    UnknownOption { group: String, option: String },

    #[error("selection change for `{group}` posted while the dispatch queue is draining")]
    ReentrantDispatch { group: String },

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl WidgetError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        WidgetError::ConfigurationInvalid {
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_group(group: &str) -> Self {
        WidgetError::UnknownGroup {
            group: group.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WidgetError>;
