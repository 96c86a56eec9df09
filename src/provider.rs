use async_trait::async_trait;

use crate::Result;
use crate::types::{GenerationRequest, ProviderKind};

/// One image source. Adapters translate the uniform request into a
/// provider-specific exchange and hand back a plain URL; every failure mode
/// surfaces as an `Err`, never a panic, so the fallback chain can advance.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
