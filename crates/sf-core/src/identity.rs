use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;
use crate::errors::WorkflowError;

/// The user acting on a workflow operation.
///
/// Authentication happens upstream; this only carries what the workflow needs
/// to gate transitions and attribute audit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Actor {
    pub role: Role,
    pub user_id: Option<String>,
}

impl Actor {
    #[must_use]
    pub fn new(role: Role, user_id: impl Into<String>) -> Self {
        Self {
            role,
            user_id: Some(user_id.into()),
        }
    }

    /// An actor known only by role.
    #[must_use]
    pub const fn anonymous(role: Role) -> Self {
        Self {
            role,
            user_id: None,
        }
    }

    /// Parse a role string coming from the request layer.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if the role is not recognized.
    pub fn parse(role: &str, user_id: Option<&str>) -> Result<Self, WorkflowError> {
        Ok(Self {
            role: role.parse()?,
            user_id: user_id.map(String::from),
        })
    }
}
