// Lesson plan generation: form model, prompt composition, and the submit pipeline.
// All model calls go through llm_client::TextGenerator.

pub mod composer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
