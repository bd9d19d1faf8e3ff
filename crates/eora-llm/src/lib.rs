//! GigaChat client: OAuth access tokens and chat completions.

mod client;
pub mod wire;

pub use client::GigaChatClient;
