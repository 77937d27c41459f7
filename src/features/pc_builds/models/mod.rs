pub mod pc_build;

pub use pc_build::{PcBuild, PcBuildItem, PcBuildItemRow};
