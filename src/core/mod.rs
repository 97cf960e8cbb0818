// Core business logic module

pub mod config;
pub mod diagnostics;
pub mod explain;
pub mod imaging;

// Re-export commonly used items
pub use config::Config;
pub use explain::{EventIdentity, ExplanationGateway, Explainer, OpenAiGateway, GATEWAY_UNAVAILABLE};
pub use imaging::ImagingOrchestrator;
