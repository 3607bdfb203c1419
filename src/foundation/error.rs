/// Convenience result type used across GlowUp.
pub type GlowupResult<T> = Result<T, GlowupError>;

/// Why the gateway refused an authentication request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// Email/password pair did not match an account.
    InvalidCredentials,
    /// Sign-up for an email that is already registered.
    AlreadyRegistered,
    /// No signed-in user, or the session ended.
    SessionExpired,
}

/// Typed cause of an object storage failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// The bucket's access policy rejected the write for this user.
    PolicyDenied,
    /// The `photos` bucket does not exist.
    BucketNotFound,
    /// An object already exists at the requested path.
    Conflict,
    /// No object exists at the requested path.
    NotFound,
    /// Any other storage failure.
    Other,
}

/// Typed cause of a metadata table failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseErrorKind {
    /// The row belongs to another user.
    PolicyDenied,
    /// No row matched.
    NotFound,
    /// Any other query failure.
    Other,
}

/// Top-level error taxonomy used by editor, compositor and gateway APIs.
#[derive(thiserror::Error, Debug)]
pub enum GlowupError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The source image could not be decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// The composited bitmap could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// A font face needed to draw an overlay is unavailable or unusable.
    #[error("font error: {0}")]
    Font(String),

    /// Authentication failure reported by the gateway.
    #[error("auth error ({kind:?}): {message}")]
    Auth {
        /// Failure cause.
        kind: AuthErrorKind,
        /// Gateway-provided detail.
        message: String,
    },

    /// Object storage failure reported by the gateway.
    #[error("storage error ({kind:?}): {message}")]
    Storage {
        /// Failure cause.
        kind: StorageErrorKind,
        /// Gateway-provided detail.
        message: String,
    },

    /// Metadata table failure reported by the gateway.
    #[error("database error ({kind:?}): {message}")]
    Database {
        /// Failure cause.
        kind: DatabaseErrorKind,
        /// Gateway-provided detail.
        message: String,
    },

    /// The platform offers no native share capability.
    #[error("sharing is not supported on this platform")]
    ShareUnsupported,

    /// Local filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlowupError {
    /// Build a [`GlowupError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlowupError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`GlowupError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GlowupError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`GlowupError::Auth`] value.
    pub fn auth(kind: AuthErrorKind, msg: impl Into<String>) -> Self {
        Self::Auth {
            kind,
            message: msg.into(),
        }
    }

    /// Build a [`GlowupError::Storage`] value.
    pub fn storage(kind: StorageErrorKind, msg: impl Into<String>) -> Self {
        Self::Storage {
            kind,
            message: msg.into(),
        }
    }

    /// Build a [`GlowupError::Database`] value.
    pub fn database(kind: DatabaseErrorKind, msg: impl Into<String>) -> Self {
        Self::Database {
            kind,
            message: msg.into(),
        }
    }

    /// Message suitable for a user-facing notification, including remediation
    /// guidance for gateway misconfiguration.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth {
                kind: AuthErrorKind::SessionExpired,
                ..
            } => "Session expired. Please sign in again.".to_string(),
            Self::Auth {
                kind: AuthErrorKind::InvalidCredentials,
                ..
            } => "Invalid email or password.".to_string(),
            Self::Auth {
                kind: AuthErrorKind::AlreadyRegistered,
                ..
            } => "An account with this email already exists.".to_string(),
            Self::Storage {
                kind: StorageErrorKind::PolicyDenied,
                ..
            } => "Storage permissions are not configured. Add a policy on bucket 'photos' \
                  that allows INSERT for authenticated users, e.g. CREATE POLICY \
                  'Allow authenticated uploads' ON storage.objects FOR INSERT TO \
                  authenticated WITH CHECK (bucket_id = 'photos');"
                .to_string(),
            Self::Storage {
                kind: StorageErrorKind::BucketNotFound,
                ..
            } => "Bucket 'photos' not found. Create a public bucket named 'photos'.".to_string(),
            Self::Storage { message, .. } => format!("Upload failed: {message}"),
            Self::Database { message, .. } => format!("Could not save to the database: {message}"),
            Self::ShareUnsupported => "Sharing is not supported here.".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
