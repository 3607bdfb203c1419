use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};

use crate::{
    foundation::error::{
        AuthErrorKind, DatabaseErrorKind, GlowupError, GlowupResult, StorageErrorKind,
    },
    gateway::{
        AuthCallback, AuthEvent, AuthListeners, Gateway, NewPhoto, PHOTOS_BUCKET, PhotoId,
        PhotoRow, SignUpMetadata, Subscription, User, UserId,
    },
};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Where bucket objects live.
#[derive(Debug)]
enum ObjectStore {
    Memory(HashMap<String, Vec<u8>>),
    Dir(PathBuf),
}

#[derive(Clone, Debug)]
struct Session {
    user: User,
    started_at: DateTime<Utc>,
}

/// Self-hosted gateway: SQLite for accounts and photo rows, a directory (or memory) for the
/// `photos` bucket.
///
/// Storage policy: a signed-in user may write and remove objects only under `<user id>/`, and
/// may only insert or delete photo rows they own. Reads from the bucket are public.
pub struct LocalGateway {
    conn: Connection,
    objects: ObjectStore,
    public_base_url: String,
    session: Option<Session>,
    session_ttl: Option<Duration>,
    listeners: AuthListeners,
}

impl std::fmt::Debug for LocalGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGateway")
            .field("objects", &self.objects)
            .field("public_base_url", &self.public_base_url)
            .field("signed_in", &self.session.as_ref().map(|s| &s.user.email))
            .finish()
    }
}

fn db_err(e: rusqlite::Error) -> GlowupError {
    GlowupError::database(DatabaseErrorKind::Other, e.to_string())
}

fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> GlowupResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            GlowupError::database(DatabaseErrorKind::Other, format!("bad timestamp: {e}"))
        })
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Reject empty, absolute and parent-escaping object paths.
fn check_object_path(path: &str) -> GlowupResult<()> {
    let ok = !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..");
    if ok {
        Ok(())
    } else {
        Err(GlowupError::storage(
            StorageErrorKind::Other,
            format!("invalid object path '{path}'"),
        ))
    }
}

fn check_bucket(bucket: &str) -> GlowupResult<()> {
    if bucket == PHOTOS_BUCKET {
        Ok(())
    } else {
        Err(GlowupError::storage(
            StorageErrorKind::BucketNotFound,
            format!("Bucket not found: {bucket}"),
        ))
    }
}

impl LocalGateway {
    /// Open (or create) a gateway rooted at `root`: `root/glowup.db` plus `root/storage/photos/`.
    #[tracing::instrument(skip(public_base_url))]
    pub fn open(root: &Path, public_base_url: &str) -> GlowupResult<Self> {
        std::fs::create_dir_all(root.join("storage").join(PHOTOS_BUCKET))?;
        let conn = Connection::open(root.join("glowup.db")).map_err(db_err)?;
        Self::with_connection(
            conn,
            ObjectStore::Dir(root.join("storage")),
            public_base_url,
        )
    }

    /// A gateway that keeps everything in memory.
    pub fn in_memory(public_base_url: &str) -> GlowupResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::with_connection(conn, ObjectStore::Memory(HashMap::new()), public_base_url)
    }

    fn with_connection(
        conn: Connection,
        objects: ObjectStore,
        public_base_url: &str,
    ) -> GlowupResult<Self> {
        let gw = Self {
            conn,
            objects,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            session: None,
            session_ttl: None,
            listeners: AuthListeners::new(),
        };
        gw.init_schema()?;
        Ok(gw)
    }

    /// Sessions older than `ttl` count as signed out.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    fn init_schema(&self) -> GlowupResult<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS users (
                    id              TEXT PRIMARY KEY,
                    email           TEXT NOT NULL UNIQUE,
                    name            TEXT,
                    password_salt   TEXT NOT NULL,
                    password_hash   TEXT NOT NULL,
                    created_at      TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS photos (
                    id              TEXT PRIMARY KEY,
                    user_id         TEXT NOT NULL REFERENCES users(id),
                    name            TEXT NOT NULL,
                    storage_path    TEXT NOT NULL,
                    created_at      TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_photos_user_created
                    ON photos(user_id, created_at DESC);",
            )
            .map_err(db_err)
    }

    fn live_session(&self) -> Option<&Session> {
        let session = self.session.as_ref()?;
        match self.session_ttl {
            Some(ttl) if Utc::now() - session.started_at > ttl => None,
            _ => Some(session),
        }
    }

    /// Drop a session whose TTL has run out and tell listeners.
    fn expire_session(&mut self) {
        let expired = matches!(
            (&self.session, self.session_ttl),
            (Some(s), Some(ttl)) if Utc::now() - s.started_at > ttl
        );
        if expired {
            self.session = None;
            tracing::info!("session expired");
            self.listeners.emit(&AuthEvent::SignedOut);
        }
    }

    fn storage_user(&self, path: &str) -> GlowupResult<&User> {
        let session = self.live_session().ok_or_else(|| {
            GlowupError::storage(
                StorageErrorKind::PolicyDenied,
                "new row violates row-level security policy: not signed in",
            )
        })?;
        let owned_prefix = format!("{}/", session.user.id);
        if !path.starts_with(&owned_prefix) {
            return Err(GlowupError::storage(
                StorageErrorKind::PolicyDenied,
                format!("new row violates row-level security policy for '{path}'"),
            ));
        }
        Ok(&session.user)
    }

    fn table_user(&self) -> GlowupResult<&User> {
        self.live_session().map(|s| &s.user).ok_or_else(|| {
            GlowupError::database(
                DatabaseErrorKind::PolicyDenied,
                "row-level security: not signed in",
            )
        })
    }

    fn object_file(root: &Path, path: &str) -> PathBuf {
        path.split('/')
            .fold(root.join(PHOTOS_BUCKET), |acc, seg| acc.join(seg))
    }

    fn user_by_email(&self, email: &str) -> GlowupResult<Option<(User, String, String)>> {
        self.conn
            .query_row(
                "SELECT id, email, name, created_at, password_salt, password_hash
                 FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()
            .map_err(db_err)?
            .map(|(id, email, name, created_at, salt, hash)| {
                Ok((
                    User {
                        id: UserId(id),
                        email,
                        name,
                        created_at: parse_timestamp(&created_at)?,
                    },
                    salt,
                    hash,
                ))
            })
            .transpose()
    }
}

fn normalize_email(email: &str) -> GlowupResult<String> {
    let email = email.trim().to_ascii_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(email)
    } else {
        Err(GlowupError::validation(format!("invalid email '{email}'")))
    }
}

impl Gateway for LocalGateway {
    #[tracing::instrument(skip(self, password))]
    fn sign_in(&mut self, email: &str, password: &str) -> GlowupResult<User> {
        let email = normalize_email(email)?;
        let invalid =
            || GlowupError::auth(AuthErrorKind::InvalidCredentials, "Invalid login credentials");
        let (user, salt, hash) = self.user_by_email(&email)?.ok_or_else(invalid)?;
        if hash_password(&salt, password) != hash {
            return Err(invalid());
        }

        self.session = Some(Session {
            user: user.clone(),
            started_at: Utc::now(),
        });
        tracing::info!(user = %user.id, "signed in");
        self.listeners.emit(&AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    #[tracing::instrument(skip(self, password))]
    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> GlowupResult<User> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(GlowupError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.user_by_email(&email)?.is_some() {
            return Err(GlowupError::auth(
                AuthErrorKind::AlreadyRegistered,
                "User already registered",
            ));
        }

        let user = User {
            id: UserId(uuid::Uuid::new_v4().to_string()),
            email,
            name: metadata.name.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        };
        let salt = uuid::Uuid::new_v4().simple().to_string();
        self.conn
            .execute(
                "INSERT INTO users (id, email, name, password_salt, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.0,
                    user.email,
                    user.name,
                    salt,
                    hash_password(&salt, password),
                    timestamp(user.created_at)
                ],
            )
            .map_err(db_err)?;
        tracing::info!(user = %user.id, "account created");
        Ok(user)
    }

    fn sign_out(&mut self) -> GlowupResult<()> {
        if self.session.take().is_some() {
            tracing::info!("signed out");
            self.listeners.emit(&AuthEvent::SignedOut);
        }
        Ok(())
    }

    fn current_user(&mut self) -> GlowupResult<Option<User>> {
        self.expire_session();
        Ok(self.live_session().map(|s| s.user.clone()))
    }

    fn on_auth_state_change(&mut self, callback: AuthCallback) -> Subscription {
        self.listeners.subscribe(callback)
    }

    #[tracing::instrument(skip(self))]
    fn list_photos(&self, user_id: &UserId) -> GlowupResult<Vec<PhotoRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, user_id, name, storage_path, created_at
                 FROM photos WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )
            .map_err(db_err)?;
        let raw = stmt
            .query_map(params![user_id.0], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;

        raw.into_iter()
            .map(|(id, user_id, name, storage_path, created_at)| {
                Ok(PhotoRow {
                    id: PhotoId(id),
                    user_id: UserId(user_id),
                    name,
                    storage_path,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    fn insert_photo(&mut self, row: NewPhoto) -> GlowupResult<PhotoRow> {
        self.expire_session();
        let user = self.table_user()?;
        if user.id != row.user_id {
            return Err(GlowupError::database(
                DatabaseErrorKind::PolicyDenied,
                "row-level security: user_id does not match the signed-in user",
            ));
        }

        let inserted = PhotoRow {
            id: PhotoId(uuid::Uuid::new_v4().to_string()),
            user_id: row.user_id,
            name: row.name,
            storage_path: row.storage_path,
            created_at: Utc::now(),
        };
        self.conn
            .execute(
                "INSERT INTO photos (id, user_id, name, storage_path, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    inserted.id.0,
                    inserted.user_id.0,
                    inserted.name,
                    inserted.storage_path,
                    timestamp(inserted.created_at)
                ],
            )
            .map_err(db_err)?;
        Ok(inserted)
    }

    #[tracing::instrument(skip(self))]
    fn delete_photo(&mut self, id: &PhotoId) -> GlowupResult<()> {
        self.expire_session();
        let user_id = self.table_user()?.id.0.clone();
        let affected = self
            .conn
            .execute(
                "DELETE FROM photos WHERE id = ?1 AND user_id = ?2",
                params![id.0, user_id],
            )
            .map_err(db_err)?;
        if affected == 0 {
            return Err(GlowupError::database(
                DatabaseErrorKind::NotFound,
                format!("no photo {id} for this user"),
            ));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn upload_object(&mut self, bucket: &str, path: &str, bytes: &[u8]) -> GlowupResult<()> {
        check_bucket(bucket)?;
        check_object_path(path)?;
        self.expire_session();
        self.storage_user(path)?;

        let conflict = || {
            GlowupError::storage(
                StorageErrorKind::Conflict,
                format!("The resource already exists: {path}"),
            )
        };
        match &mut self.objects {
            ObjectStore::Memory(map) => {
                if map.contains_key(path) {
                    return Err(conflict());
                }
                map.insert(path.to_string(), bytes.to_vec());
            }
            ObjectStore::Dir(root) => {
                let file = Self::object_file(root, path);
                if file.exists() {
                    return Err(conflict());
                }
                if let Some(parent) = file.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&file, bytes)?;
            }
        }
        Ok(())
    }

    /// Removing an object that does not exist succeeds.
    #[tracing::instrument(skip(self))]
    fn remove_object(&mut self, bucket: &str, path: &str) -> GlowupResult<()> {
        check_bucket(bucket)?;
        check_object_path(path)?;
        self.expire_session();
        self.storage_user(path)?;

        match &mut self.objects {
            ObjectStore::Memory(map) => {
                map.remove(path);
            }
            ObjectStore::Dir(root) => {
                let file = Self::object_file(root, path);
                match std::fs::remove_file(&file) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }

    fn download_object(&self, bucket: &str, path: &str) -> GlowupResult<Vec<u8>> {
        check_bucket(bucket)?;
        check_object_path(path)?;

        let not_found = || {
            GlowupError::storage(
                StorageErrorKind::NotFound,
                format!("Object not found: {path}"),
            )
        };
        match &self.objects {
            ObjectStore::Memory(map) => map.get(path).cloned().ok_or_else(not_found),
            ObjectStore::Dir(root) => match std::fs::read(Self::object_file(root, path)) {
                Ok(bytes) => Ok(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found()),
                Err(e) => Err(e.into()),
            },
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{path}",
            self.public_base_url
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gateway/local.rs"]
mod tests;
