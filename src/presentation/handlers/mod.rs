mod extract;
mod health;

pub use extract::{AUDIO_MIME_TYPE, extract_audio_handler};
pub use health::health_handler;
