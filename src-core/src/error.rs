use thiserror::Error;

#[derive(Debug, Error)]
pub enum WanderLensError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<WanderLensError> for String {
    fn from(err: WanderLensError) -> Self {
        err.to_string()
    }
}

impl From<reqwest::Error> for WanderLensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WanderLensError::Decode(err.to_string())
        } else {
            WanderLensError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WanderLensError {
    fn from(err: serde_json::Error) -> Self {
        WanderLensError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for WanderLensError {
    fn from(err: std::io::Error) -> Self {
        WanderLensError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WanderLensError>;
