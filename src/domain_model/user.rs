use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    pub fn new() -> Self {
        UserId(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(UserId)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mobile(pub String);

impl Mobile {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mobile {
    fn from(s: &str) -> Self {
        Mobile(s.to_owned())
    }
}

/// The part of a user record that may leave the directory.
/// Password hashes and pending OTP codes never appear here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Identity {
    pub id: UserId,
    pub mobile: Mobile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_canonical_uuid() {
        let raw = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let id: UserId = raw.parse().unwrap();
        assert_eq!(id.to_string(), raw);
    }

    #[test]
    fn user_id_rejects_malformed_input() {
        assert!("".parse::<UserId>().is_err());
        assert!("64b7f0c2e1a4".parse::<UserId>().is_err());
        assert!("not-an-id".parse::<UserId>().is_err());
    }

    #[test]
    fn mobile_serializes_as_plain_string() {
        let identity = Identity {
            id: "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap(),
            mobile: Mobile::from("09120000000"),
        };
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["mobile"], "09120000000");
        assert_eq!(json["id"], "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }
}
