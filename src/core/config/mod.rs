pub mod data;
pub mod io;
pub mod orchestrator;

pub use data::Config;
