//! Cocktail image generation via an OpenAI-style images API.
//!
//! Generation is slow and allowed to fail; callers dispatch it with
//! [`generate_and_store_image`] in a background task and let clients poll
//! the image cache.

use crate::config::ImageConfig;
use crate::models::CocktailRecommendation;
use crate::services::image_cache::CocktailImageCache;
use crate::services::providers::ProviderError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outbound request timeout; generation must not retain resources
/// indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct ImageGenerator {
    config: ImageConfig,
    client: Client,
}

impl ImageGenerator {
    pub fn new(config: ImageConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn generations_url(&self) -> String {
        format!(
            "{}/images/generations",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_prompt(cocktail: &CocktailRecommendation) -> String {
        let flavors: Vec<&str> = cocktail
            .flavor_profiles
            .iter()
            .map(|f| f.as_str())
            .collect();
        format!(
            "A glass of {} cocktail, base spirit {}, {} alcohol level, \
             flavor notes of {}, served in a {}, elegant garnish, bright \
             lighting, professional photography style",
            cocktail.name,
            cocktail.base_spirit.as_str(),
            cocktail.alcohol_level.as_str(),
            flavors.join(", "),
            cocktail.serving_glass
        )
    }

    /// Stable per-cocktail seed so regenerating the same drink yields the
    /// same image.
    fn seed_for(name: &str) -> u64 {
        name.bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
            % 10_000_000_000
    }

    /// Generate an image for the recommendation and return its URL.
    pub async fn generate(
        &self,
        cocktail: &CocktailRecommendation,
    ) -> Result<String, ProviderError> {
        let request = ImageGenerationRequest {
            model: self.config.model.clone(),
            prompt: Self::build_prompt(cocktail),
            negative_prompt: None,
            image_size: self.config.image_size.clone(),
            batch_size: 1,
            seed: Some(Self::seed_for(&cocktail.name)),
            num_inference_steps: 20,
            guidance_scale: 7.5,
        };

        tracing::debug!(
            cocktail = %cocktail.name,
            model = %self.config.model,
            "Requesting cocktail image"
        );

        let response = self
            .client
            .post(self.generations_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError(format!(
                "Image API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response
            .images
            .into_iter()
            .next()
            .map(|img| img.url)
            .ok_or_else(|| ProviderError::ApiError("Empty image response".to_string()))
    }
}

/// Generate an image and persist its URL. Intended for `tokio::spawn`:
/// failures are logged and swallowed so they never affect the HTTP response
/// already sent for the triggering request.
pub async fn generate_and_store_image(
    generator: Arc<ImageGenerator>,
    cache: CocktailImageCache,
    cocktail: CocktailRecommendation,
    user_id: i64,
    session_id: String,
) {
    match generator.generate(&cocktail).await {
        Ok(image_url) => {
            if let Err(e) = cache.store_image_url(user_id, &session_id, &image_url).await {
                tracing::error!(user_id, session_id = %session_id, error = %e, "Failed to store cocktail image URL");
            } else {
                tracing::info!(user_id, session_id = %session_id, "Generated and stored cocktail image");
            }
        }
        Err(e) => {
            tracing::error!(user_id, session_id = %session_id, error = %e, "Cocktail image generation failed");
        }
    }
}

// ============================================================================
// API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ImageGenerationRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
    image_size: String,
    batch_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    num_inference_steps: u32,
    guidance_scale: f32,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_stable_per_name() {
        assert_eq!(
            ImageGenerator::seed_for("Cosmopolitan"),
            ImageGenerator::seed_for("Cosmopolitan")
        );
        assert_ne!(
            ImageGenerator::seed_for("Cosmopolitan"),
            ImageGenerator::seed_for("Negroni")
        );
    }

    #[test]
    fn prompt_mentions_key_attributes() {
        let prompt = ImageGenerator::build_prompt(&CocktailRecommendation::sample());
        assert!(prompt.contains("Cosmopolitan"));
        assert!(prompt.contains("vodka"));
        assert!(prompt.contains("Cocktail glass"));
    }
}
