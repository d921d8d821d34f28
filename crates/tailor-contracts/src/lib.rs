pub mod assets;
pub mod chat;
pub mod events;
