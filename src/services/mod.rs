//! Business logic services

pub mod access_service;
pub mod answer_service;
pub mod auth_service;
pub mod event_service;
pub mod leaderboard_service;
pub mod lifecycle_service;
pub mod monitor_service;
pub mod report_service;
pub mod runtime;
pub mod scheduler;
pub mod session_service;

pub use access_service::AccessResolver;
pub use answer_service::{AnswerService, SubmitOutcome, SubmitStatus};
pub use auth_service::{AuthService, Claims};
pub use event_service::{BroadcastPublisher, EventPublisher, RedisPublisher};
pub use leaderboard_service::LeaderboardService;
pub use lifecycle_service::{EndReason, LifecycleService, TransitionOutcome};
pub use monitor_service::{FocusLossOutcome, MonitorService};
pub use report_service::ReportService;
pub use runtime::{JoinCodeIndex, QuizRuntime};
pub use scheduler::SessionScheduler;
pub use session_service::{JoinOutcome, SessionEngine, TransitionResult};
