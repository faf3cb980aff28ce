use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;

/// Signed in user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            photo_url: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Receiving side of identity changes, current value is `None` when signed out
pub type IdentityWatch = watch::Receiver<Option<AuthUser>>;

/// Publishes current identity to all interested controllers.
///
/// Cheap to clone, all clones share the same channel.
#[derive(Clone, Debug)]
pub struct Identity {
    sender: Arc<watch::Sender<Option<AuthUser>>>,
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl Identity {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Identity {
            sender: Arc::new(sender),
        }
    }

    pub fn signed_in(user: AuthUser) -> Self {
        let identity = Self::new();
        identity.sign_in(user);
        identity
    }

    /// Only notifies subscribers when identity actually changes
    pub fn sign_in(&self, user: AuthUser) {
        self.sender.send_if_modified(|current| {
            if current.as_ref() == Some(&user) {
                false
            } else {
                debug!("Identity changed to user {}", user.uid);
                *current = Some(user);
                true
            }
        });
    }

    pub fn sign_out(&self) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                debug!("Identity signed out");
                *current = None;
                true
            } else {
                false
            }
        });
    }

    pub fn current(&self) -> Option<AuthUser> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> IdentityWatch {
        self.sender.subscribe()
    }
}
