pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod session;
pub mod store;
pub mod vocabulary;
