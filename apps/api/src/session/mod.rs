pub mod handlers;
pub mod orchestrator;
pub mod registry;
pub mod store;
