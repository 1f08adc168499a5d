use serde::{Deserialize, Serialize};

use crate::models::user::User;

/// One registry entry.
///
/// `password` holds the secret exactly as submitted at registration. It is
/// never hashed; this matches how accounts were stored by the browser portal
/// and is a known weakness of the format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialRecord {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CredentialRecord {
    /// Profile view of the record, without the secret
    pub fn to_user(&self) -> User {
        User::new(
            self.id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.phone.clone(),
        )
    }
}
