pub mod api;
pub mod matcher;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
pub struct GuestId(pub String);

#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
pub struct PartyId(pub String);

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored answer on a guest record. `Unset` means nobody has responded
/// for this guest yet.
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Yes,
    No,
    #[default]
    Unset,
}

/// A submitted answer. Submission always resolves every guest in the
/// party to one of these, so `Unset` is unrepresentable here.
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attendance {
    Yes,
    No,
}

impl From<Attendance> for RsvpStatus {
    fn from(attendance: Attendance) -> Self {
        match attendance {
            Attendance::Yes => RsvpStatus::Yes,
            Attendance::No => RsvpStatus::No,
        }
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Guest {
    pub id: GuestId,
    pub first_name: String,
    pub last_name: String,
    pub party_id: Option<PartyId>,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Party {
    pub id: PartyId,
    pub name: String,
}

/// Outcome of a successful party lookup: the party, its full roster in
/// display order, the guest whose name produced the hit, and the score
/// that hit earned.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    pub party: Party,
    pub guests: Vec<Guest>,
    pub matched_guest: Guest,
    pub confidence: f64,
}

/// English list joining: "A", "A and B", "A, B, and C".
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_and_trims() {
        let guest = Guest {
            first_name: "Grant".to_string(),
            last_name: "Luna".to_string(),
            ..Guest::default()
        };
        assert_eq!(guest.full_name(), "Grant Luna");

        let single = Guest {
            first_name: "Cher".to_string(),
            ..Guest::default()
        };
        assert_eq!(single.full_name(), "Cher");
    }

    #[test]
    fn join_names_uses_oxford_comma() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_names(&names(&[])), "");
        assert_eq!(join_names(&names(&["Ana"])), "Ana");
        assert_eq!(join_names(&names(&["Ana", "Bo"])), "Ana and Bo");
        assert_eq!(join_names(&names(&["Ana", "Bo", "Cy"])), "Ana, Bo, and Cy");
    }

    #[test]
    fn rsvp_status_serializes_lowercase() {
        let json = serde_json::to_string(&RsvpStatus::Yes).unwrap();
        assert_eq!(json, "\"yes\"");
        let back: RsvpStatus = serde_json::from_str("\"unset\"").unwrap();
        assert_eq!(back, RsvpStatus::Unset);
    }
}
