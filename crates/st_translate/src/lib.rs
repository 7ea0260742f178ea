pub mod error;
pub mod libre;
pub mod orchestrator;
pub mod translator;

pub use error::TranslateError;
pub use libre::{ClientOptions, LibreTranslateClient};
pub use orchestrator::{Orchestrator, OrchestratorOptions, TranslationTask, same_language};
pub use translator::Translator;
