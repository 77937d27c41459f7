pub mod auth;
pub mod categories;
pub mod orders;
pub mod payments;
pub mod pc_builds;
pub mod products;
pub mod reviews;
