pub mod nagad_service;

pub use nagad_service::NagadService;
