/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Cleaner,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Cleaner => "cleaner",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Roles allowed to send broadcast announcements
    pub fn can_broadcast(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience of an admin broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastTarget {
    All,
    Customers,
    Cleaners,
    Staff,
}

impl FromStr for BroadcastTarget {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BroadcastTarget::All),
            "customers" => Ok(BroadcastTarget::Customers),
            "cleaners" => Ok(BroadcastTarget::Cleaners),
            "staff" => Ok(BroadcastTarget::Staff),
            other => Err(format!("unknown broadcast target: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("all", BroadcastTarget::All)]
    #[case(" Cleaners ", BroadcastTarget::Cleaners)]
    #[case("STAFF", BroadcastTarget::Staff)]
    fn test_broadcast_target_from_str(#[case] input: &str, #[case] expected: BroadcastTarget) {
        assert_eq!(input.parse::<BroadcastTarget>(), Ok(expected));
    }

    #[test]
    fn test_role_serde_lowercase() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Cleaner).unwrap(), "\"cleaner\"");
        assert!(!Role::Cleaner.can_broadcast());
    }
}
