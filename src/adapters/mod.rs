// Adapters layer: concrete implementations for external systems (storage, text generation).

pub mod gemini;
pub mod storage;

pub use gemini::{GeminiExplainer, NoopExplainer};
pub use storage::LocalStorage;
