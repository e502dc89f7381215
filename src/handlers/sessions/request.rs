//! Session request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::JOIN_CODE_RE;

/// Join quiz request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRequest {
    #[validate(regex(path = *JOIN_CODE_RE, message = "Join code must be 4-16 letters or digits"))]
    pub code: String,
}
