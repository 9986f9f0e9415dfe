mod env;
mod gemini;
mod groq;
mod prompt_builder;
mod provider;
pub mod provider_config;
mod provider_registry;
mod response_parsing;

pub use env::ClientEnvConfig;
pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use prompt_builder::{PROMPT_RULES, PromptBuilder};
pub use provider::LlmProvider;
pub use provider_config::{AuthStyle, ProviderConfig};
pub use provider_registry::ProviderRegistry;
