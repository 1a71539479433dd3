//! rag-llm - Chat completion client
//!
//! Sends the assembled system prompt and the user's question to any
//! server implementing the OpenAI chat completions API (OpenAI, Ollama,
//! vLLM, ...) and returns the generated text.

mod openai;

pub use openai::{ChatMessage, ChatRequest, ChatResponse, OpenAiClient, Role, Usage};

// Re-export the Generator trait for convenience
pub use rag_core::Generator;
