/// Remote cat image sources
///
/// This module handles:
/// - Fetching a deck of (id, url) pairs from TheCatAPI or Cataas
/// - Keeping card ids unique within a deck
/// - Downloading and decoding the picture for a card

pub mod cataas;
pub mod catapi;
pub mod ids;

use std::time::Duration;

use iced::widget::image::Handle;
use image::imageops::FilterType;
use serde::Deserialize;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::state::data::CardItem;
use cataas::Cataas;
use catapi::CatApi;

/// Edge length of the decoded card picture (square)
pub const CARD_IMAGE_PX: u32 = 400;

/// Which upstream serves the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    TheCatApi,
    Cataas,
}

impl SourceKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "thecatapi" => Some(SourceKind::TheCatApi),
            "cataas" => Some(SourceKind::Cataas),
            _ => None,
        }
    }

    pub fn default_endpoint(self) -> &'static str {
        match self {
            SourceKind::TheCatApi => "https://api.thecatapi.com",
            SourceKind::Cataas => "https://cataas.com",
        }
    }
}

/// The configured deck source. Cheap to clone into a background task.
#[derive(Debug, Clone)]
pub enum ImageSource {
    CatApi(CatApi),
    Cataas(Cataas),
}

impl ImageSource {
    pub fn from_config(config: &AppConfig, client: reqwest::Client) -> Self {
        match config.source {
            SourceKind::TheCatApi => ImageSource::CatApi(CatApi::new(
                client,
                &config.endpoint,
                config.api_key.clone(),
            )),
            SourceKind::Cataas => ImageSource::Cataas(Cataas::new(&config.endpoint)),
        }
    }

    /// Fetch a deck of at most `count` cards with unique ids
    pub async fn fetch(self, count: usize) -> Result<Vec<CardItem>, FetchError> {
        match self {
            ImageSource::CatApi(api) => api.fetch(count).await,
            ImageSource::Cataas(cataas) => Ok(cataas.fetch(count)),
        }
    }
}

/// Build the shared HTTP client
pub fn create_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("paws-and-preferences/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(FetchError::from)
}

/// Download a card picture and turn it into a renderable handle
pub async fn download_image(client: reqwest::Client, url: String) -> Result<Handle, FetchError> {
    let response = client.get(&url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    debug!("Downloaded {} bytes from {}", bytes.len(), url);

    // Decoding is CPU-bound, keep it off the async workers
    let (width, height, pixels) = tokio::task::spawn_blocking(move || decode_card_image(&bytes))
        .await
        .map_err(|e| FetchError::Image(format!("decode task failed: {e}")))??;

    Ok(Handle::from_rgba(width, height, pixels))
}

/// Decode any supported format and crop-resize it to fill the card square
pub fn decode_card_image(bytes: &[u8]) -> Result<(u32, u32, Vec<u8>), FetchError> {
    let img = image::load_from_memory(bytes).map_err(|e| FetchError::Image(e.to_string()))?;
    let card = img
        .resize_to_fill(CARD_IMAGE_PX, CARD_IMAGE_PX, FilterType::Triangle)
        .to_rgba8();
    let (width, height) = card.dimensions();
    Ok((width, height, card.into_raw()))
}
