//! The authentication, object storage and database service the editor persists to.

pub(crate) mod auth;
pub(crate) mod local;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::foundation::error::GlowupResult;

pub use auth::{AuthListeners, Subscription};
pub use local::LocalGateway;

/// Bucket holding exported images. The database table shares the name.
pub const PHOTOS_BUCKET: &str = "photos";

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile data stored alongside a new account.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignUpMetadata {
    pub name: Option<String>,
}

/// One row of the `photos` table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PhotoRow {
    pub id: PhotoId,
    pub user_id: UserId,
    pub name: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `photos` table; id and timestamp are assigned by the gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPhoto {
    pub user_id: UserId,
    pub name: String,
    pub storage_path: String,
}

/// A gallery entry: a photo row plus its public URL.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SavedPhoto {
    pub id: PhotoId,
    pub user_id: UserId,
    pub name: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
    pub url: String,
}

impl SavedPhoto {
    pub fn from_row(row: PhotoRow, url: String) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            storage_path: row.storage_path,
            created_at: row.created_at,
            url,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(User),
    SignedOut,
}

/// Callback invoked on every auth state change.
pub type AuthCallback = Box<dyn FnMut(&AuthEvent) + Send>;

/// Account, object storage and `photos` table operations.
///
/// Implementations own their session: storage and table writes act as the signed-in user and
/// fail with a policy error otherwise.
pub trait Gateway {
    fn sign_in(&mut self, email: &str, password: &str) -> GlowupResult<User>;

    /// Create an account. The new user is not signed in.
    fn sign_up(&mut self, email: &str, password: &str, metadata: SignUpMetadata)
    -> GlowupResult<User>;

    fn sign_out(&mut self) -> GlowupResult<()>;

    /// The signed-in user, or `None` without a live session. A session found expired here is
    /// dropped and reported as [`AuthEvent::SignedOut`].
    fn current_user(&mut self) -> GlowupResult<Option<User>>;

    /// Register `callback` for auth changes; dropping the handle unsubscribes.
    fn on_auth_state_change(&mut self, callback: AuthCallback) -> Subscription;

    /// Rows owned by `user_id`, newest first.
    fn list_photos(&self, user_id: &UserId) -> GlowupResult<Vec<PhotoRow>>;

    fn insert_photo(&mut self, row: NewPhoto) -> GlowupResult<PhotoRow>;

    fn delete_photo(&mut self, id: &PhotoId) -> GlowupResult<()>;

    /// Store a new object; an existing object at `path` is a conflict.
    fn upload_object(&mut self, bucket: &str, path: &str, bytes: &[u8]) -> GlowupResult<()>;

    fn remove_object(&mut self, bucket: &str, path: &str) -> GlowupResult<()>;

    fn download_object(&self, bucket: &str, path: &str) -> GlowupResult<Vec<u8>>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}
