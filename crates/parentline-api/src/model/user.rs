//! Account identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Teaching staff.
    Teacher,
    /// Parent or guardian.
    Parent,
    /// School administrator.
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Parent => "parent",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" => Ok(Self::Teacher),
            "parent" => Ok(Self::Parent),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A user as listed by the peer directory or populated in a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Role tag (absent in some populated payloads).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Avatar reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl User {
    /// Creates a user.
    #[must_use]
    pub fn new(id: impl Into<UserId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: Some(role),
            avatar: None,
        }
    }

    /// Creates a user known only by id.
    #[must_use]
    pub fn placeholder(id: UserId) -> Self {
        Self {
            name: id.to_string(),
            id,
            role: None,
            avatar: None,
        }
    }
}

/// A message participant: either a bare id or a populated user object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Participant {
    /// Only the id was sent.
    Id(UserId),
    /// The service populated the user.
    User(User),
}

impl Participant {
    /// Returns the participant's id.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        match self {
            Self::Id(id) => id,
            Self::User(user) => &user.id,
        }
    }

    /// Returns the populated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Id(_) => None,
            Self::User(user) => Some(user),
        }
    }

    /// Converts into a user, using a placeholder when only the id is known.
    #[must_use]
    pub fn into_user(self) -> User {
        match self {
            Self::Id(id) => User::placeholder(id),
            Self::User(user) => user,
        }
    }
}

impl From<UserId> for Participant {
    fn from(id: UserId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Participant {
    fn from(id: &str) -> Self {
        Self::Id(UserId::from(id))
    }
}

impl From<User> for Participant {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_directory_json() {
        let user: User =
            serde_json::from_str(r#"{"_id":"t1","name":"Ms. Amina","role":"teacher"}"#).unwrap();
        assert_eq!(user.id.as_str(), "t1");
        assert_eq!(user.name, "Ms. Amina");
        assert_eq!(user.role, Some(Role::Teacher));
        assert!(user.avatar.is_none());
    }

    #[test]
    fn test_participant_accepts_both_shapes() {
        let bare: Participant = serde_json::from_str(r#""p1""#).unwrap();
        assert_eq!(bare.id().as_str(), "p1");
        assert!(bare.user().is_none());

        let populated: Participant =
            serde_json::from_str(r#"{"_id":"p1","name":"Mr. Okafor","role":"parent"}"#).unwrap();
        assert_eq!(populated.id().as_str(), "p1");
        assert_eq!(populated.user().unwrap().name, "Mr. Okafor");
    }

    #[test]
    fn test_placeholder_uses_id_as_name() {
        let user = Participant::from("t9").into_user();
        assert_eq!(user.name, "t9");
        assert!(user.role.is_none());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert!("janitor".parse::<Role>().is_err());
    }
}
