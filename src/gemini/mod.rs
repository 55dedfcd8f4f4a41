mod core;
pub mod error;

pub use self::core::{
    FALLBACK_RESPONSE, GENERATION_CONFIG, GeminiClient, GenerationConfig, ModelClient,
    get_response,
};
pub use error::{ModelCallError, ModelCallErrorKind};
