pub mod ai_provider;
pub mod app;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod scanner;
pub mod storage;
pub mod vision;
