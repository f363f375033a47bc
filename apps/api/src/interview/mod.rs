pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod speech;
