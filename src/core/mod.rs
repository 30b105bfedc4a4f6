pub mod agent;
pub mod app;
pub mod constants;
pub mod conversation;
pub mod message;
