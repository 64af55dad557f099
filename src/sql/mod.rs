pub mod functions;
pub mod registry;
