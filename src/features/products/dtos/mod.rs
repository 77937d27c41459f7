pub mod bulk_dto;
pub mod product_dto;

pub use bulk_dto::{BulkAction, BulkUpdateDto, BulkUpdateResultDto};
pub use product_dto::{
    CreateProductDto, DeleteOutcomeDto, ImageDto, ProductDetailDto, ProductFilterQuery,
    ProductListItemDto, ProductSearchItemDto, SearchQuery, SpecificationDto, UpdateProductDto,
};
