use std::path::PathBuf;

/// Errors raised when a piece cannot be dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is out of range (expected 0..7)")]
    InvalidColumn(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("game is already over")]
    GameOver,
}

/// Errors raised by the persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse store file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while playing a headless session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("agent '{agent}' selected illegal action {action} (legal: {legal:?})")]
    IllegalAction {
        agent: String,
        action: usize,
        legal: Vec<usize>,
    },

    #[error("agent '{0}' returned no move on a non-terminal board")]
    NoMove(String),

    #[error("move error: {0}")]
    Move(#[from] MoveError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(MoveError::ColumnFull(3).to_string(), "column 3 is full");
        assert_eq!(
            MoveError::InvalidColumn(9).to_string(),
            "column 9 is out of range (expected 0..7)"
        );
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::IllegalAction {
            agent: "Casual".to_string(),
            action: 5,
            legal: vec![0, 1, 2],
        };
        assert_eq!(
            err.to_string(),
            "agent 'Casual' selected illegal action 5 (legal: [0, 1, 2])"
        );
    }

    #[test]
    fn test_session_error_from_move_error() {
        let err: SessionError = MoveError::GameOver.into();
        assert_eq!(err.to_string(), "move error: game is already over");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("search.depth must be <= 12".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: search.depth must be <= 12"
        );
    }
}
