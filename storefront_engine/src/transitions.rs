//! Order status transition rules.
//!
//! By default any status may follow any other. The strict policy only allows the moves in this table:
//!
//! | From      | To                  |
//! |-----------|---------------------|
//! | Pending   | Paid, Cancelled     |
//! | Paid      | Shipped, Cancelled  |
//! | Shipped   | Delivered           |
//! | Delivered | (terminal)          |
//! | Cancelled | (terminal)          |
//!
//! Statuses outside the seeded set are rejected by the strict policy, on either side of the move.
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::db_types::StatusId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPolicy {
    #[default]
    Unrestricted,
    Strict,
}

impl TransitionPolicy {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Unrestricted
        }
    }

    pub fn is_allowed(&self, from: StatusId, to: StatusId) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Strict => strict_targets(from).contains(&to),
        }
    }
}

fn strict_targets(from: StatusId) -> &'static [StatusId] {
    match from {
        StatusId::PENDING => &[StatusId::PAID, StatusId::CANCELLED],
        StatusId::PAID => &[StatusId::SHIPPED, StatusId::CANCELLED],
        StatusId::SHIPPED => &[StatusId::DELIVERED],
        _ => &[],
    }
}

impl Display for TransitionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrestricted => write!(f, "unrestricted"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Unknown transition policy: {s}")),
        }
    }
}
