pub mod agents;
pub mod image_cache;
pub mod image_generator;
pub mod providers;
pub mod redis;
pub mod session;

pub use image_cache::CocktailImageCache;
pub use image_generator::ImageGenerator;
pub use redis::{KeyValueStore, MockStore, RedisStore};
pub use session::SessionManager;
