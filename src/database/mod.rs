pub mod memory;
pub mod models;
pub mod repository;

pub use memory::InMemoryUserRepository;
pub use repository::{RepositoryError, UserRepository};
