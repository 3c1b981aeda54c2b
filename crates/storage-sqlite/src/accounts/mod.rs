mod model;
mod repository;

pub use model::ManagedAccountRow;
pub use repository::ManagedAccountRepository;
