//! Quiz model

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccessControl, Question};

/// Lifecycle state of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Draft,
    Scheduled,
    Active,
    Completed,
}

impl QuizStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "scheduled" => Some(Self::Scheduled),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether authored content may still change
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft | Self::Scheduled)
    }
}

impl std::fmt::Display for QuizStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run configuration of a quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    /// Quiz-wide limit in seconds (0 = unlimited)
    pub quiz_timer: u32,
    /// Default per-question limit in seconds (0 = unlimited)
    pub question_timer: u32,
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    pub show_feedback: bool,
    pub show_leaderboard: bool,
    pub allow_tab_switch: bool,
    pub max_tab_switches: u32,
    pub difficulty: Option<String>,
    /// Percentage needed to pass
    pub passing_score: f64,
    /// Start automatically once `scheduled_at` is reached
    pub auto_start: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            quiz_timer: 0,
            question_timer: 0,
            shuffle_questions: false,
            shuffle_options: false,
            show_feedback: true,
            show_leaderboard: true,
            allow_tab_switch: true,
            max_tab_switches: 0,
            difficulty: None,
            passing_score: 40.0,
            auto_start: false,
        }
    }
}

impl QuizSettings {
    /// Focus losses tolerated before a participant is disqualified
    pub fn tab_switch_threshold(&self) -> u32 {
        if self.allow_tab_switch {
            self.max_tab_switches
        } else {
            0
        }
    }
}

/// Authored part of a quiz, as imported or replaced by its owner
#[derive(Debug, Clone, PartialEq)]
pub struct QuizContent {
    pub title: String,
    pub code: Option<String>,
    pub questions: Vec<Question>,
    pub settings: QuizSettings,
    pub access_control: AccessControl,
}

/// Quiz aggregate: content, run configuration and lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub title: String,
    pub owner_id: Uuid,
    pub code: Option<String>,
    pub questions: Vec<Question>,
    pub settings: QuizSettings,
    pub access_control: AccessControl,
    pub status: QuizStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Create a draft quiz from authored content
    pub fn draft(
        title: String,
        owner_id: Uuid,
        code: Option<String>,
        questions: Vec<Question>,
        settings: QuizSettings,
        access_control: AccessControl,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            owner_id,
            code,
            questions,
            settings,
            access_control,
            status: QuizStatus::Draft,
            scheduled_at: None,
            started_at: None,
            ended_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Swap in new authored content, keeping identity and lifecycle
    pub fn replace_content(&mut self, content: QuizContent) {
        self.title = content.title;
        self.code = content.code;
        self.questions = content.questions;
        self.settings = content.settings;
        self.access_control = content.access_control;
    }

    /// First question id that appears more than once, if any
    pub fn duplicate_question_id(questions: &[Question]) -> Option<Uuid> {
        let mut seen = HashSet::new();
        questions.iter().map(|q| q.id).find(|id| !seen.insert(*id))
    }

    pub fn question(&self, id: &Uuid) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == *id)
    }

    /// Sum of all question point values
    pub fn max_possible_score(&self) -> i64 {
        self.questions.iter().map(|q| i64::from(q.points)).sum()
    }

    /// When the quiz-wide timer runs out, if it has one
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        match (self.started_at, self.settings.quiz_timer) {
            (Some(started), timer) if timer > 0 => {
                Some(started + Duration::seconds(i64::from(timer)))
            }
            _ => None,
        }
    }

    /// Whether the quiz-wide timer has elapsed at `now`
    pub fn timer_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Active && self.deadline().is_some_and(|d| now >= d)
    }

    /// Whether a scheduled auto-start is due at `now`
    pub fn auto_start_due(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Scheduled
            && self.settings.auto_start
            && self.scheduled_at.is_some_and(|at| now >= at)
    }

    pub fn is_owned_by(&self, user_id: &Uuid) -> bool {
        self.owner_id == *user_id
    }
}
