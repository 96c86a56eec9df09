use serde::{Deserialize, Serialize};

use crate::{PixfallError, Result};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

/// Image models accepted by the hosted inference endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ImageModel {
    #[serde(rename = "black-forest-labs/FLUX1.1-pro")]
    Flux11Pro,
    #[serde(rename = "black-forest-labs/FLUX.1-schnell")]
    FluxSchnell,
    #[default]
    #[serde(rename = "black-forest-labs/FLUX.1-schnell-Free")]
    FluxSchnellFree,
    #[serde(rename = "black-forest-labs/FLUX.1-pro")]
    FluxPro,
    #[serde(rename = "black-forest-labs/FLUX.1-dev")]
    FluxDev,
}

impl ImageModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageModel::Flux11Pro => "black-forest-labs/FLUX1.1-pro",
            ImageModel::FluxSchnell => "black-forest-labs/FLUX.1-schnell",
            ImageModel::FluxSchnellFree => "black-forest-labs/FLUX.1-schnell-Free",
            ImageModel::FluxPro => "black-forest-labs/FLUX.1-pro",
            ImageModel::FluxDev => "black-forest-labs/FLUX.1-dev",
        }
    }

    /// Schnell variants converge in 4 diffusion steps; the rest need 28.
    pub fn steps(&self) -> u32 {
        match self {
            ImageModel::FluxSchnell | ImageModel::FluxSchnellFree => 4,
            _ => 28,
        }
    }
}

impl std::str::FromStr for ImageModel {
    type Err = PixfallError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "black-forest-labs/FLUX1.1-pro" | "flux-1.1-pro" => Ok(ImageModel::Flux11Pro),
            "black-forest-labs/FLUX.1-schnell" | "flux-schnell" => Ok(ImageModel::FluxSchnell),
            "black-forest-labs/FLUX.1-schnell-Free" | "flux-schnell-free" => {
                Ok(ImageModel::FluxSchnellFree)
            }
            "black-forest-labs/FLUX.1-pro" | "flux-pro" => Ok(ImageModel::FluxPro),
            "black-forest-labs/FLUX.1-dev" | "flux-dev" => Ok(ImageModel::FluxDev),
            other => Err(PixfallError::InvalidResponse(format!(
                "unknown image model: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ImageModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Together,
    Bfl,
    Pollinations,
    Unsplash,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Together => "together",
            ProviderKind::Bfl => "bfl",
            ProviderKind::Pollinations => "pollinations",
            ProviderKind::Unsplash => "unsplash",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock-photo orientation. Portrait layouts get 768x1024, everything else
/// the landscape default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Orientation::Landscape => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Orientation::Portrait => (DEFAULT_HEIGHT, DEFAULT_WIDTH),
        }
    }
}

/// A single image request. Immutable once built; constructors validate the
/// prompt and dimensions so adapters never see a degenerate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub model: ImageModel,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Result<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(PixfallError::InvalidResponse(
                "prompt must not be empty".to_string(),
            ));
        }
        Ok(Self {
            prompt,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            model: ImageModel::default(),
        })
    }

    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PixfallError::InvalidResponse(format!(
                "image dimensions must be positive (got {width}x{height})"
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }
}

/// A successfully acquired image together with the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquiredImage {
    pub url: String,
    pub prompt: String,
    pub provider: ProviderKind,
}

/// Caller-facing record with one shape regardless of which adapter (or
/// which failure) produced it. Exactly one of `image_url` / `error_message`
/// is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderKind>,
}

impl GenerationOutcome {
    pub fn succeeded(image: AcquiredImage) -> Self {
        Self {
            success: true,
            image_url: Some(image.url),
            error_message: None,
            provider: Some(image.provider),
        }
    }

    pub fn failed(error: &PixfallError) -> Self {
        let message = error.to_string();
        let message = if message.trim().is_empty() {
            "failed to generate image".to_string()
        } else {
            message
        };
        Self {
            success: false,
            image_url: None,
            error_message: Some(message),
            provider: None,
        }
    }

    pub fn from_result(result: Result<AcquiredImage>) -> Self {
        match result {
            Ok(image) => Self::succeeded(image),
            Err(err) => Self::failed(&err),
        }
    }
}
