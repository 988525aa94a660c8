pub mod constants;
pub mod conversation;
pub mod message;
pub mod preferences;
pub mod transport;
