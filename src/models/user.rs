//! User identity model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::roles;

/// Identity supplied by the access management service.
///
/// The engine trusts these fields as given and never re-authenticates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub role: String,
    pub branch: Option<String>,
    pub section: Option<String>,
}

impl User {
    pub fn new(id: Uuid, role: &str, branch: Option<&str>, section: Option<&str>) -> Self {
        Self {
            id,
            role: role.to_string(),
            branch: branch.map(str::to_string),
            section: section.map(str::to_string),
        }
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role == roles::ADMIN
    }

    /// Check if user may import and run quizzes
    pub fn can_author(&self) -> bool {
        matches!(self.role.as_str(), roles::ADMIN | roles::FACULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_checks() {
        let admin = User::new(Uuid::new_v4(), "admin", None, None);
        let faculty = User::new(Uuid::new_v4(), "faculty", Some("CSE"), None);
        let student = User::new(Uuid::new_v4(), "student", Some("CSE"), Some("A"));

        assert!(admin.is_admin() && admin.can_author());
        assert!(!faculty.is_admin() && faculty.can_author());
        assert!(!student.can_author());
    }
}
