pub mod app;
pub mod chat;
pub mod config;
pub mod dispatcher;
pub mod message;
pub mod mode;
pub mod session;
pub mod storage;
