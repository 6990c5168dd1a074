//! User references as they appear on the wire
//!
//! The API serializes the user behind a reaction in three shapes: a raw id
//! string, a populated object carrying `_id`, or a populated object carrying
//! `id`. `UserRef` collapses all of them into one canonical id at the
//! deserialization boundary so downstream code only ever compares ids.

use serde::{Deserialize, Serialize, Serializer};

use super::EntityId;

/// Reference to a user, normalized to its canonical id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "UserRefRepr")]
pub struct UserRef {
    id: EntityId,
    username: Option<String>,
}

impl UserRef {
    /// Create a bare reference from an id
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            username: None,
        }
    }

    /// Create a populated reference
    pub fn with_username(id: impl Into<EntityId>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: Some(username.into()),
        }
    }

    /// The canonical user id
    #[inline]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Display name, when the server populated the reference
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Check whether this reference points at `user_id`
    #[inline]
    pub fn is(&self, user_id: &EntityId) -> bool {
        &self.id == user_id
    }
}

/// The wire shapes a user reference arrives in
#[derive(Deserialize)]
#[serde(untagged)]
enum UserRefRepr {
    Populated {
        #[serde(rename = "_id", alias = "id")]
        id: EntityId,
        #[serde(default)]
        username: Option<String>,
    },
    Id(EntityId),
}

impl From<UserRefRepr> for UserRef {
    fn from(repr: UserRefRepr) -> Self {
        match repr {
            UserRefRepr::Populated { id, username } => Self { id, username },
            UserRefRepr::Id(id) => Self { id, username: None },
        }
    }
}

// Serialized as the bare id: outbound traffic never needs the populated form
impl Serialize for UserRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_raw_id() {
        let user: UserRef = serde_json::from_str("\"u1\"").unwrap();
        assert_eq!(user.id(), &EntityId::new("u1"));
        assert!(user.username().is_none());
    }

    #[test]
    fn test_deserialize_populated_underscore_id() {
        let user: UserRef =
            serde_json::from_str(r#"{"_id": "u2", "username": "ada", "avatar": null}"#).unwrap();
        assert_eq!(user.id(), &EntityId::new("u2"));
        assert_eq!(user.username(), Some("ada"));
    }

    #[test]
    fn test_deserialize_populated_plain_id() {
        let user: UserRef = serde_json::from_str(r#"{"id": "u3"}"#).unwrap();
        assert_eq!(user.id(), &EntityId::new("u3"));
    }

    #[test]
    fn test_serialize_as_bare_id() {
        let user = UserRef::with_username("u4", "grace");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"u4\"");
    }

    #[test]
    fn test_same_user_across_shapes() {
        let a: UserRef = serde_json::from_str("\"u5\"").unwrap();
        let b: UserRef = serde_json::from_str(r#"{"_id": "u5", "username": "kay"}"#).unwrap();
        assert!(a.is(b.id()));
    }
}
