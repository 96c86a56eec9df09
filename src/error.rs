use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixfallError {
    #[error("api error ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("job did not reach a terminal status after {attempts} polls")]
    PollTimeout { attempts: u32 },
}

pub type Result<T> = std::result::Result<T, PixfallError>;
