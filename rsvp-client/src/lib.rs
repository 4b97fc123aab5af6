pub mod api;
pub mod workflow;
