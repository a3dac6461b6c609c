//! Tailor: batch resume tailoring against one or more job descriptions.

pub mod config;
pub mod errors;
pub mod export;
pub mod llm_client;
pub mod models;
pub mod optimization;
pub mod routes;
pub mod session;
pub mod state;
pub mod upload;
