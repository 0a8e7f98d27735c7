use serde::{Deserialize, Serialize};

/// One row of the error log (`errors.csv`).
///
/// `character` holds either a tracked character name or a context label
/// such as `session` for failures that are not tied to a single character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub session_id: String,
    pub character: String,
    pub timestamp: String,
    #[serde(rename = "error_message")]
    pub message: String,
}

impl ErrorEvent {
    pub fn new(
        session_id: &str,
        character: &str,
        timestamp: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.to_string(),
            character: character.to_string(),
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }
}
