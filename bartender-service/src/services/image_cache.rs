//! Per-(user, session) cache of generated cocktail image URLs.
//!
//! Deliberately independent of session validity: an image stays retrievable
//! after its session expires.

use crate::services::redis::KeyValueStore;
use service_core::error::AppError;
use std::sync::Arc;

pub const COCKTAIL_IMAGE_KEY_PREFIX: &str = "cocktail_image";

/// Ten years, effectively no expiry.
const IMAGE_TTL_SECONDS: i64 = 3650 * 24 * 60 * 60;

#[derive(Clone)]
pub struct CocktailImageCache {
    store: Arc<dyn KeyValueStore>,
}

impl CocktailImageCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn image_key(user_id: i64, session_id: &str) -> String {
        format!("{}:{}:{}", COCKTAIL_IMAGE_KEY_PREFIX, user_id, session_id)
    }

    /// Overwrites silently.
    pub async fn store_image_url(
        &self,
        user_id: i64,
        session_id: &str,
        image_url: &str,
    ) -> Result<(), AppError> {
        let key = Self::image_key(user_id, session_id);
        self.store
            .set_with_ttl(&key, image_url, IMAGE_TTL_SECONDS)
            .await?;
        tracing::info!(user_id, session_id, "Stored cocktail image URL");
        Ok(())
    }

    /// `None` means "not ready yet", distinct from store errors.
    pub async fn get_image_url(
        &self,
        user_id: i64,
        session_id: &str,
    ) -> Result<Option<String>, AppError> {
        let key = Self::image_key(user_id, session_id);
        self.store.get(&key).await
    }
}
