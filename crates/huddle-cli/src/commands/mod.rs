pub mod account;
pub mod chat;
mod render;
