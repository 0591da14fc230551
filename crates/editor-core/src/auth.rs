//! Authentication contract.
//!
//! The editor is inert while no user is signed in.

use cuesmith_common::error::CuesmithResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

pub trait AuthProvider: Send {
    fn current_user(&self) -> Option<&User>;

    fn login(&mut self) -> CuesmithResult<&User>;

    fn logout(&mut self);
}

/// Provider backed by a fixed local identity.
#[derive(Debug, Clone)]
pub struct StaticAuth {
    identity: User,
    signed_in: bool,
}

impl StaticAuth {
    /// A provider that still needs [`AuthProvider::login`].
    pub fn new(identity: User) -> Self {
        Self {
            identity,
            signed_in: false,
        }
    }

    /// A provider already signed in as `identity`.
    pub fn signed_in(identity: User) -> Self {
        Self {
            identity,
            signed_in: true,
        }
    }

    /// Signed in as the local OS user.
    pub fn local() -> Self {
        let name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "local".to_string());
        Self::signed_in(User {
            id: name.clone(),
            display_name: name,
        })
    }
}

impl AuthProvider for StaticAuth {
    fn current_user(&self) -> Option<&User> {
        self.signed_in.then_some(&self.identity)
    }

    fn login(&mut self) -> CuesmithResult<&User> {
        self.signed_in = true;
        tracing::info!(user = %self.identity.id, "Signed in");
        Ok(&self.identity)
    }

    fn logout(&mut self) {
        self.signed_in = false;
        tracing::info!(user = %self.identity.id, "Signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout_cycle() {
        let mut auth = StaticAuth::new(User {
            id: "u1".to_string(),
            display_name: "Ada".to_string(),
        });
        assert!(auth.current_user().is_none());
        assert_eq!(auth.login().unwrap().id, "u1");
        assert_eq!(auth.current_user().map(|u| u.display_name.as_str()), Some("Ada"));
        auth.logout();
        assert!(auth.current_user().is_none());
    }
}
