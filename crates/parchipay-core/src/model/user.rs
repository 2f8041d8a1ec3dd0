use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Member,
}

/// A person known to the app. Committees reference users by id; membership
/// records denormalize name and mobile at add-time and do not live-sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub mobile: String,
    pub role: Role,
}
