//! Join eligibility

use chrono::{DateTime, Duration, Utc};

use crate::models::{AccessDecision, AccessDenial, AccessMode, Quiz, QuizStatus, User};

/// Decides whether a user may join a quiz.
///
/// Pure predicate over the quiz and the caller's identity. Nothing is cached,
/// every join re-evaluates the rules in order and reports the first failure.
pub struct AccessResolver;

impl AccessResolver {
    pub fn can_join(
        quiz: &Quiz,
        user: &User,
        now: DateTime<Utc>,
        grace_seconds: i64,
    ) -> AccessDecision {
        if !Self::is_joinable(quiz, now, grace_seconds) {
            return AccessDecision::deny(AccessDenial::NotJoinable);
        }

        let access = &quiz.access_control;
        if access.is_public {
            return AccessDecision::allow();
        }

        // Allow-list is independent of branch/section in SPECIFIC mode
        if access.mode == AccessMode::Specific {
            return if access.allowed_students.contains(&user.id) {
                AccessDecision::allow()
            } else {
                AccessDecision::deny(AccessDenial::NotInAllowedStudents)
            };
        }

        let Some(branch) = user.branch.as_deref() else {
            return AccessDecision::deny(AccessDenial::BranchNotAllowed);
        };

        let mut branch_entries = access
            .allowed_branches
            .iter()
            .filter(|entry| entry.matches_branch(branch))
            .peekable();
        if branch_entries.peek().is_none() {
            return AccessDecision::deny(AccessDenial::BranchNotAllowed);
        }

        let section = user.section.as_deref().unwrap_or_default();
        if branch_entries.any(|entry| entry.admits_section(section)) {
            AccessDecision::allow()
        } else {
            AccessDecision::deny(AccessDenial::SectionNotAllowed)
        }
    }

    /// Active, or scheduled and inside the lobby window before `scheduled_at`
    fn is_joinable(quiz: &Quiz, now: DateTime<Utc>, grace_seconds: i64) -> bool {
        match quiz.status {
            QuizStatus::Active => true,
            QuizStatus::Scheduled => quiz
                .scheduled_at
                .is_some_and(|at| now >= at - Duration::seconds(grace_seconds)),
            QuizStatus::Draft | QuizStatus::Completed => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use uuid::Uuid;

    use super::*;
    use crate::models::{AccessControl, BranchAccess, QuizSettings};

    fn active_quiz(access_control: AccessControl) -> Quiz {
        let mut quiz = Quiz::draft(
            "Access".to_string(),
            Uuid::new_v4(),
            None,
            vec![],
            QuizSettings::default(),
            access_control,
        );
        quiz.status = QuizStatus::Active;
        quiz
    }

    fn student(branch: &str, section: &str) -> User {
        User::new(Uuid::new_v4(), "student", Some(branch), Some(section))
    }

    fn branches(name: &str, sections: &[&str]) -> AccessControl {
        AccessControl {
            allowed_branches: vec![BranchAccess {
                name: name.to_string(),
                sections: sections.iter().map(|s| s.to_string()).collect(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_section_outside_list_is_denied() {
        let quiz = active_quiz(branches("CSE", &["A", "B"]));
        let decision = AccessResolver::can_join(&quiz, &student("CSE", "C"), Utc::now(), 300);
        assert_eq!(decision, AccessDecision::deny(AccessDenial::SectionNotAllowed));
    }

    #[test]
    fn test_empty_sections_admit_every_section() {
        let quiz = active_quiz(branches("CSE", &[]));
        let decision = AccessResolver::can_join(&quiz, &student("CSE", "C"), Utc::now(), 300);
        assert!(decision.allowed);
    }

    #[test]
    fn test_other_branch_is_denied() {
        let quiz = active_quiz(branches("CSE", &[]));
        let decision = AccessResolver::can_join(&quiz, &student("ECE", "A"), Utc::now(), 300);
        assert_eq!(decision.reason, Some(AccessDenial::BranchNotAllowed));
    }

    #[test]
    fn test_public_quiz_admits_anyone() {
        let mut access = branches("CSE", &["A"]);
        access.is_public = true;
        let quiz = active_quiz(access);
        let decision = AccessResolver::can_join(&quiz, &student("MECH", "Z"), Utc::now(), 300);
        assert!(decision.allowed);
    }

    #[test]
    fn test_specific_mode_requires_allow_list() {
        let listed = student("ECE", "Z");
        let mut access = branches("CSE", &[]);
        access.mode = AccessMode::Specific;
        access.allowed_students = HashSet::from([listed.id]);
        let quiz = active_quiz(access);

        assert!(AccessResolver::can_join(&quiz, &listed, Utc::now(), 300).allowed);

        let in_branch = student("CSE", "A");
        let decision = AccessResolver::can_join(&quiz, &in_branch, Utc::now(), 300);
        assert_eq!(decision.reason, Some(AccessDenial::NotInAllowedStudents));
    }

    #[test]
    fn test_lobby_window_before_schedule() {
        let mut quiz = active_quiz(AccessControl {
            is_public: true,
            ..Default::default()
        });
        let now = Utc::now();
        quiz.status = QuizStatus::Scheduled;
        quiz.scheduled_at = Some(now + Duration::seconds(600));

        let user = student("CSE", "A");
        assert!(!AccessResolver::can_join(&quiz, &user, now, 300).allowed);
        assert!(AccessResolver::can_join(&quiz, &user, now + Duration::seconds(301), 300).allowed);

        quiz.status = QuizStatus::Completed;
        let decision = AccessResolver::can_join(&quiz, &user, now, 300);
        assert_eq!(decision.reason, Some(AccessDenial::NotJoinable));
    }
}
