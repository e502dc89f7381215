//! LiveQuiz - Live Quiz Session Engine
//!
//! This library runs timed, proctored quizzes for many concurrent
//! participants: quiz lifecycle, answer ingestion with exactly-once scoring,
//! focus-loss monitoring, deterministic rankings and post-session analytics.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Session engine and business logic
//! - **Repositories**: Database access behind the session store
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::SessionEngine;
pub use state::AppState;
