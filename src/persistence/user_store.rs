//! User directory stored next to the message log.
//!
//! Users are keyed by a random UUID and never expire. Only `name` and
//! `avatar` are kept; both are optional, matching what the browser client
//! sends when it registers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Persistence, StoreResult};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

pub trait UserStore: Send + Sync {
    fn create_user(&self, name: Option<String>, avatar: Option<String>) -> StoreResult<User>;
    fn get_user(&self, user_id: &str) -> StoreResult<Option<User>>;
    fn list_users(&self) -> StoreResult<Vec<User>>;
}

impl UserStore for Persistence {
    fn create_user(&self, name: Option<String>, avatar: Option<String>) -> StoreResult<User> {
        let user = User {
            user_id: Uuid::new_v4().to_string(),
            name,
            avatar,
        };
        self.users
            .insert(user.user_id.as_bytes(), serde_json::to_vec(&user)?)?;
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> StoreResult<Option<User>> {
        match self.users.get(user_id.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        self.users
            .iter()
            .map(|entry| {
                let (_, value) = entry?;
                Ok(serde_json::from_slice(&value)?)
            })
            .collect()
    }
}
