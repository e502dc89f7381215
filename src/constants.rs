//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default log output format (`pretty` or `json`)
pub const DEFAULT_LOG_FORMAT: &str = "pretty";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// ENGINE DEFAULTS
// =============================================================================

/// Default scheduler tick period in milliseconds
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Default upper bound on waiting for a quiz lock, in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 2000;

/// Default lobby window before `scheduled_at` in which joining is allowed
pub const DEFAULT_JOIN_GRACE_SECONDS: i64 = 300;

/// Default length of generated join codes
pub const DEFAULT_JOIN_CODE_LENGTH: usize = 6;

/// Attempts at generating a free join code before giving up
pub const JOIN_CODE_MAX_ATTEMPTS: usize = 16;

/// Topic assigned to questions without one
pub const DEFAULT_TOPIC: &str = "General";

/// A per-question time above this multiple of the participant's average is a spike
pub const TIME_SPIKE_FACTOR: f64 = 2.0;

/// Upper bounds (milliseconds) of the total-time histogram buckets in quiz summaries
pub const TIME_BUCKETS_MS: &[i64] = &[60_000, 300_000, 600_000, 1_800_000];

/// Redis channel prefix for session events
pub const EVENT_CHANNEL_PREFIX: &str = "livequiz:quiz";

/// Capacity of the in-process event broadcast channel
pub const EVENT_BROADCAST_CAPACITY: usize = 1024;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const FACULTY: &str = "faculty";
    pub const STUDENT: &str = "student";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, FACULTY, STUDENT];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum quiz title length
pub const MAX_QUIZ_TITLE_LENGTH: u64 = 256;

/// Maximum question text length
pub const MAX_QUESTION_TEXT_LENGTH: u64 = 4096;

/// Maximum number of questions in one quiz
pub const MAX_QUESTIONS_PER_QUIZ: u64 = 500;

/// Maximum submitted answer length
pub const MAX_ANSWER_LENGTH: u64 = 4096;

/// Largest accepted per-answer time in milliseconds (one day)
pub const MAX_TIME_TAKEN_MS: i64 = 86_400_000;
