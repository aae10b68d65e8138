//! Expense categories and the static team-type permission table.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use serde::{Deserialize, Serialize};

use crate::{FinanceError, TeamType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Equity,
    Bank,
    BasicSalary,
    BonusSalary,
    Server,
    PettyCash,
    Kitchen,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 8] = [
        Self::Equity,
        Self::Bank,
        Self::BasicSalary,
        Self::BonusSalary,
        Self::Server,
        Self::PettyCash,
        Self::Kitchen,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Bank => "bank",
            Self::BasicSalary => "basic_salary",
            Self::BonusSalary => "bonus_salary",
            Self::Server => "server",
            Self::PettyCash => "petty_cash",
            Self::Kitchen => "kitchen",
            Self::Other => "other",
        }
    }

    /// Categories that only the elevated team type may record or move an
    /// entry into or out of.
    pub fn needs_admin_permission(self) -> bool {
        matches!(
            self,
            Self::Equity | Self::Bank | Self::BasicSalary | Self::BonusSalary | Self::Server
        )
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = FinanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| FinanceError::Validation(format!("invalid expense category: {value}")))
    }
}

static ALLOWED_CATEGORIES: LazyLock<HashMap<TeamType, HashSet<ExpenseCategory>>> =
    LazyLock::new(|| {
        HashMap::from([
            (TeamType::Admin, ExpenseCategory::ALL.into_iter().collect()),
            (
                TeamType::Warehouse,
                HashSet::from([
                    ExpenseCategory::PettyCash,
                    ExpenseCategory::Kitchen,
                    ExpenseCategory::Other,
                ]),
            ),
            (TeamType::Selling, HashSet::new()),
        ])
    });

/// Whether `team_type` may record an expense under `category`.
pub fn can_create_expense(team_type: TeamType, category: ExpenseCategory) -> bool {
    if team_type.is_elevated() {
        return true;
    }
    ALLOWED_CATEGORIES
        .get(&team_type)
        .is_some_and(|allowed| allowed.contains(&category))
}
