pub mod pc_build_dto;

pub use pc_build_dto::{
    CreatePcBuildDto, CreatePcBuildItemDto, PcBuildItemDto, PcBuildResponseDto, PcBuildSummaryDto,
};
