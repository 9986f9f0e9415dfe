pub mod host;
pub mod llm;
pub mod settings;
