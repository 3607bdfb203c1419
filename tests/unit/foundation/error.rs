use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GlowupError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GlowupError::image_load("x")
            .to_string()
            .contains("image load error:")
    );
    assert!(GlowupError::encode("x").to_string().contains("encode error:"));
    assert!(GlowupError::font("x").to_string().contains("font error:"));
    assert!(
        GlowupError::storage(StorageErrorKind::Other, "x")
            .to_string()
            .contains("storage error")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GlowupError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn storage_kinds_get_distinct_guidance() {
    let policy = GlowupError::storage(StorageErrorKind::PolicyDenied, "rls").user_message();
    let bucket = GlowupError::storage(StorageErrorKind::BucketNotFound, "nope").user_message();
    let generic = GlowupError::storage(StorageErrorKind::Other, "disk full").user_message();

    assert!(policy.contains("CREATE POLICY"));
    assert!(bucket.contains("Create a public bucket"));
    assert_eq!(generic, "Upload failed: disk full");
}

#[test]
fn expired_session_has_sign_in_hint() {
    let msg = GlowupError::auth(AuthErrorKind::SessionExpired, "no user").user_message();
    assert!(msg.contains("sign in again"));
}
