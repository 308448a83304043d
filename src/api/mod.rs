pub mod generate;
pub mod health;

pub use generate::{generate, generate_fallback, GenerateRequest};
pub use health::{health_check, template_check};
