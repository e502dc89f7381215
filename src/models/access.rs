//! Access control model

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Enrollment mode of a quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessMode {
    /// Anyone matching the branch/section rules
    #[default]
    All,
    /// Only users on the explicit allow-list
    Specific,
}

/// A branch together with the sections admitted from it.
///
/// An empty `sections` list admits every section of the branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchAccess {
    pub name: String,
    #[serde(default)]
    pub sections: Vec<String>,
}

impl BranchAccess {
    pub fn matches_branch(&self, branch: &str) -> bool {
        normalize(&self.name) == normalize(branch)
    }

    pub fn admits_section(&self, section: &str) -> bool {
        self.sections.is_empty() || self.sections.iter().any(|s| normalize(s) == normalize(section))
    }
}

/// Who may join a quiz
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub allowed_branches: Vec<BranchAccess>,
    #[serde(default)]
    pub mode: AccessMode,
    #[serde(default)]
    pub allowed_students: HashSet<Uuid>,
}

impl AccessControl {
    /// Users whose completion ends the quiz early, if the quiz names them
    pub fn expected_participants(&self) -> Option<&HashSet<Uuid>> {
        if !self.is_public && self.mode == AccessMode::Specific && !self.allowed_students.is_empty()
        {
            Some(&self.allowed_students)
        } else {
            None
        }
    }
}

/// The rule that rejected a join attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessDenial {
    NotJoinable,
    BranchNotAllowed,
    SectionNotAllowed,
    NotInAllowedStudents,
    NotJoined,
}

impl AccessDenial {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotJoinable => "NOT_JOINABLE",
            Self::BranchNotAllowed => "BRANCH_NOT_ALLOWED",
            Self::SectionNotAllowed => "SECTION_NOT_ALLOWED",
            Self::NotInAllowedStudents => "NOT_IN_ALLOWED_STUDENTS",
            Self::NotJoined => "NOT_JOINED",
        }
    }
}

impl fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotJoinable => "quiz is not accepting participants",
            Self::BranchNotAllowed => "your branch is not allowed to take this quiz",
            Self::SectionNotAllowed => "your section is not allowed to take this quiz",
            Self::NotInAllowedStudents => "you are not on the participant list for this quiz",
            Self::NotJoined => "join the quiz before submitting",
        };
        f.write_str(message)
    }
}

/// Outcome of an eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: Option<AccessDenial>,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: AccessDenial) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_admit_everything() {
        let branch = BranchAccess {
            name: "CSE".to_string(),
            sections: vec![],
        };
        assert!(branch.admits_section("A"));
        assert!(branch.admits_section("Z"));
    }

    #[test]
    fn test_branch_and_section_compare_case_insensitively() {
        let branch = BranchAccess {
            name: "cse".to_string(),
            sections: vec!["a".to_string()],
        };
        assert!(branch.matches_branch(" CSE "));
        assert!(branch.admits_section("A"));
        assert!(!branch.admits_section("B"));
    }

    #[test]
    fn test_expected_participants_only_for_private_specific() {
        let student = Uuid::new_v4();
        let mut access = AccessControl {
            mode: AccessMode::Specific,
            allowed_students: HashSet::from([student]),
            ..Default::default()
        };
        assert_eq!(access.expected_participants().map(|s| s.len()), Some(1));

        access.is_public = true;
        assert!(access.expected_participants().is_none());
    }

    #[test]
    fn test_access_mode_wire_format() {
        let json = serde_json::to_string(&AccessMode::Specific).unwrap();
        assert_eq!(json, "\"SPECIFIC\"");
    }
}
