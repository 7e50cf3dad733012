//! Interaction layer: talks to the huddle backend over HTTP.

pub mod http_chat_api;
mod wire;

pub use http_chat_api::HttpChatApi;
