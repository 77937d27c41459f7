pub mod product;

pub use product::{Product, ProductImage, ProductListRow, ProductSpecification};
