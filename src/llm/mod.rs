// LLM abstraction layer

pub mod provider;
pub mod google;
pub mod openai;

#[cfg(test)]
pub mod mock;

pub use provider::*;
