pub mod pc_build_service;

pub use pc_build_service::PcBuildService;
