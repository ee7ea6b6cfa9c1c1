pub mod job;
pub mod memory;
pub mod user;

pub use job::PostgresJobRepository;
pub use memory::InMemoryJobRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;
