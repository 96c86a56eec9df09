mod acquire;
mod error;

pub mod config;
pub mod provider;
pub mod providers;
pub mod retry;
pub mod types;
pub mod utils;

pub use acquire::ImageAcquirer;
pub use config::{AcquireConfig, Env, parse_dotenv};
pub use error::{PixfallError, Result};
pub use provider::ImageProvider;
pub use providers::{Bfl, Pollinations, Together, Unsplash};
pub use retry::PollPolicy;
pub use types::{
    AcquiredImage, GenerationOutcome, GenerationRequest, ImageModel, Orientation, ProviderKind,
};
