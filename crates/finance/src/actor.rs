//! The acting identity passed into mutation services.

use serde::{Deserialize, Serialize};

use crate::{FinanceError, ResultFinance};

/// Classification of the team an actor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    Admin,
    Warehouse,
    Selling,
}

impl TeamType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Warehouse => "warehouse",
            Self::Selling => "selling",
        }
    }

    /// The elevated team type: may move entries across warehouses and touch
    /// admin-gated categories.
    pub fn is_elevated(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for TeamType {
    type Error = FinanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "warehouse" => Ok(Self::Warehouse),
            "selling" => Ok(Self::Selling),
            other => Err(FinanceError::Validation(format!(
                "invalid team type: {other}"
            ))),
        }
    }
}

/// Who is performing an operation.
///
/// Authentication happens upstream; the core only stamps `user_id` on rows it
/// creates and uses `team_type` for category rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub team_type: TeamType,
}

impl Actor {
    pub fn new(user_id: i64, team_type: TeamType) -> Self {
        Self { user_id, team_type }
    }
}

pub(crate) fn require_elevated(actor: &Actor, message: &str) -> ResultFinance<()> {
    if actor.team_type.is_elevated() {
        return Ok(());
    }
    Err(FinanceError::PermissionDenied(message.to_string()))
}
