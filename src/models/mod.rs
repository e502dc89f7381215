//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod access;
pub mod event;
pub mod leaderboard;
pub mod participant;
pub mod question;
pub mod quiz;
pub mod report;
pub mod response;
pub mod user;

pub use access::*;
pub use event::*;
pub use leaderboard::*;
pub use participant::*;
pub use question::{Question, QuestionKind, QuestionType};
pub use quiz::*;
pub use report::*;
pub use response::*;
pub use user::*;
