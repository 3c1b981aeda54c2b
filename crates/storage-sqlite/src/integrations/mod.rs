mod model;
mod repository;

pub use model::IntegrationConfigRow;
pub use repository::IntegrationConfigRepository;
