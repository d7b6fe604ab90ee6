use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstromechError {
    #[error("not initialized: run 'astromech init'")]
    NotInitialized,

    #[error("Failed to load saved routines")]
    PersistenceRead(#[source] Box<AstromechError>),

    /// Script text that is not JSON at all. Displays the parser's own message.
    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Invalid JSON format")]
    InvalidJsonFormat,

    /// Parsed JSON that does not have the shape of a script.
    #[error("{0}")]
    Shape(String),

    #[error("Please enter a routine name")]
    MissingName,

    #[error("routine not found: {0}")]
    RoutineNotFound(String),

    #[error("servo not found: {0}")]
    ServoNotFound(String),

    #[error("angle {angle} is outside {min}..{max} for servo {servo}")]
    AngleOutOfRange {
        servo: String,
        angle: f64,
        min: f64,
        max: f64,
    },

    /// Displays only the context; the reqwest error is the source.
    #[error("{context}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AstromechError {
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        AstromechError::Transport {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AstromechError>;
