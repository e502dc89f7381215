//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod quiz_repo;
pub mod response_repo;

pub use quiz_repo::QuizRepository;
pub use response_repo::ResponseRepository;
