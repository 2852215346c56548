//! Staff user models.

use serde::{Deserialize, Serialize};

use super::{require, require_some, Collection, Resource, Validate, ValidationError};

/// Staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Zookeeper,
    Admin,
    Vet,
    Officer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [UserRole::Admin, UserRole::Zookeeper, UserRole::Vet, UserRole::Officer];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Zookeeper => "zookeeper",
            UserRole::Admin => "admin",
            UserRole::Vet => "vet",
            UserRole::Officer => "officer",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zookeeper" => Ok(UserRole::Zookeeper),
            "admin" => Ok(UserRole::Admin),
            "vet" => Ok(UserRole::Vet),
            "officer" => Ok(UserRole::Officer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Resource for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

/// New user form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            role: UserRole::Zookeeper,
            email: None,
            password: None,
        }
    }
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require_some("password", self.password.as_deref())
    }
}
