pub mod config;
pub mod cover_art_cache;
pub mod lru;
