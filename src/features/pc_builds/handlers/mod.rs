pub mod pc_build_handler;

pub use pc_build_handler::*;
