//! Concrete [`ApplicationRepository`](super::ApplicationRepository) backends.

mod memory;
mod sqlite;

pub use memory::InMemoryApplicationRepository;
pub use sqlite::SqliteApplicationRepository;
