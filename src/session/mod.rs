//! Application state for one editing session: the photo, its edits, the signed-in user and
//! their gallery.
//!
//! Every user action records a [`Notice`]; callers drain them with
//! [`EditorSession::take_notices`].

pub(crate) mod notice;
pub(crate) mod share;

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    compositor::{RenderedImage, render, render_png},
    edit::{
        adjust::{AdjustmentPatch, AdjustmentState},
        document::EditDocument,
        filters::NamedFilter,
    },
    foundation::{
        core::{HexColor, Point, Rect, unix_millis},
        error::{AuthErrorKind, DatabaseErrorKind, GlowupError, GlowupResult},
    },
    gateway::{
        AuthEvent, Gateway, NewPhoto, PHOTOS_BUCKET, PhotoId, SavedPhoto, SignUpMetadata,
        Subscription, User,
    },
    overlay::{
        drag::DragController,
        model::{OverlayId, OverlayModel, Sticker, TextPatch},
    },
    render::{FontBook, decode::decode_image},
};

pub use notice::{Notice, NoticeKind};
pub use share::{SHARE_TEXT, SHARE_TITLE, ShareOutcome, SharePayload, ShareTarget};

type SharedUser = Arc<Mutex<Option<User>>>;

fn read_user(user: &SharedUser) -> Option<User> {
    user.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write_user(user: &SharedUser, value: Option<User>) {
    *user.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

/// The editor: owns the gateway, the source photo and all editing state.
///
/// Mutating operations take `&mut self`, so gallery writes never interleave.
pub struct EditorSession<G: Gateway> {
    gateway: G,
    fonts: FontBook,
    source: Option<Vec<u8>>,
    adjustments: AdjustmentState,
    overlays: OverlayModel,
    drag: DragController,
    user: SharedUser,
    _auth: Subscription,
    gallery: Vec<SavedPhoto>,
    notices: Vec<Notice>,
    last_stamp: i64,
}

impl<G: Gateway> std::fmt::Debug for EditorSession<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("has_source", &self.source.is_some())
            .field("adjustments", &self.adjustments)
            .field("overlays", &self.overlays.len())
            .field("gallery", &self.gallery.len())
            .field("notices", &self.notices.len())
            .finish()
    }
}

impl<G: Gateway> EditorSession<G> {
    /// Start a session on `gateway`, picking up a user that is already signed in.
    pub fn new(mut gateway: G, fonts: FontBook) -> GlowupResult<Self> {
        let user: SharedUser = Arc::new(Mutex::new(gateway.current_user()?));
        let sink = Arc::clone(&user);
        let auth = gateway.on_auth_state_change(Box::new(move |event| {
            let next = match event {
                AuthEvent::SignedIn(u) => Some(u.clone()),
                AuthEvent::SignedOut => None,
            };
            write_user(&sink, next);
        }));

        let mut session = Self {
            gateway,
            fonts,
            source: None,
            adjustments: AdjustmentState::default(),
            overlays: OverlayModel::default(),
            drag: DragController::new(),
            user,
            _auth: auth,
            gallery: Vec::new(),
            notices: Vec::new(),
            last_stamp: 0,
        };
        if session.user().is_some() {
            session.refresh_gallery_or_warn();
        }
        Ok(session)
    }

    /// Replace the random source used for sticker placement.
    pub fn with_overlay_seed(mut self, seed: u64) -> Self {
        self.overlays = OverlayModel::with_seed(seed);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn user(&self) -> Option<User> {
        read_user(&self.user)
    }

    pub fn gallery(&self) -> &[SavedPhoto] {
        &self.gallery
    }

    pub fn source(&self) -> Option<&[u8]> {
        self.source.as_deref()
    }

    pub fn adjustments(&self) -> &AdjustmentState {
        &self.adjustments
    }

    pub fn overlays(&self) -> &OverlayModel {
        &self.overlays
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Drain the notices recorded since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn report<T>(&mut self, result: GlowupResult<T>, success: &str) -> GlowupResult<T> {
        match &result {
            Ok(_) => self.notices.push(Notice::success(success)),
            Err(e) => {
                tracing::warn!(error = %e, "action failed");
                self.notices.push(Notice::error(e.user_message()));
            }
        }
        result
    }

    /// Millisecond timestamp for file names, strictly increasing within the session.
    fn next_stamp(&mut self) -> i64 {
        let stamp = unix_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }

    // Account

    pub fn sign_in(&mut self, email: &str, password: &str) -> GlowupResult<User> {
        let result = self.gateway.sign_in(email, password);
        let user = self.report(result, "Signed in successfully!")?;
        self.refresh_gallery_or_warn();
        Ok(user)
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        metadata: SignUpMetadata,
    ) -> GlowupResult<User> {
        let result = self.gateway.sign_up(email, password, metadata);
        self.report(result, "Account created! Check your email to confirm.")
    }

    pub fn sign_out(&mut self) -> GlowupResult<()> {
        let result = self.gateway.sign_out();
        self.report(result, "Signed out")?;
        write_user(&self.user, None);
        self.gallery.clear();
        Ok(())
    }

    /// Re-read the gateway session. `None` means the caller should ask for credentials again.
    pub fn check_user(&mut self) -> GlowupResult<Option<User>> {
        let user = self.gateway.current_user()?;
        write_user(&self.user, user.clone());
        if user.is_none() {
            self.gallery.clear();
        }
        Ok(user)
    }

    // Editing

    /// Make `bytes` the photo being edited. Edits and overlays are kept.
    pub fn load_image(&mut self, bytes: Vec<u8>) -> GlowupResult<()> {
        let result = decode_image(&bytes).map(|_| ());
        self.report(result, "Photo loaded!")?;
        self.source = Some(bytes);
        Ok(())
    }

    pub fn adjust(&mut self, patch: AdjustmentPatch) {
        self.adjustments.set(patch);
    }

    pub fn select_filter(&mut self, filter: NamedFilter) {
        self.adjustments.select_filter(filter);
    }

    pub fn preview_expression(&self) -> String {
        self.adjustments.preview_expression()
    }

    /// Restore default adjustments and drop every overlay.
    pub fn reset(&mut self) {
        self.adjustments.reset();
        self.overlays.clear();
        self.drag.cancel();
        self.notices.push(Notice::info("Edits reset"));
    }

    pub fn add_text(&mut self, text: &str, color: HexColor) -> Option<OverlayId> {
        let id = self.overlays.add_text(text, color)?;
        self.notices.push(Notice::success("Text added!"));
        Some(id)
    }

    pub fn add_sticker(&mut self, sticker: Sticker) -> OverlayId {
        let id = self.overlays.add_sticker(sticker);
        self.notices.push(Notice::success("Sticker added!"));
        id
    }

    pub fn update_text(&mut self, id: OverlayId, patch: TextPatch) -> bool {
        self.overlays.update_text(id, patch)
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        if self.drag.dragging() == Some(id) {
            self.drag.cancel();
        }
        self.overlays.remove(id)
    }

    pub fn pointer_down(&mut self, id: OverlayId, container: Rect) -> GlowupResult<()> {
        self.drag.pointer_down(&self.overlays, id, container)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Option<(f64, f64)> {
        self.drag.pointer_move(&mut self.overlays, pointer)
    }

    pub fn pointer_up(&mut self) -> Option<OverlayId> {
        self.drag.pointer_up()
    }

    /// Replace adjustments and overlays with the contents of `doc`.
    pub fn apply_document(&mut self, doc: &EditDocument, seed: Option<u64>) -> GlowupResult<()> {
        let overlays = doc.overlay_model(seed)?;
        self.drag.cancel();
        self.adjustments = doc.adjustment_state();
        self.overlays = overlays;
        Ok(())
    }

    pub fn document(&self) -> EditDocument {
        EditDocument::capture(&self.adjustments, &self.overlays)
    }

    // Export

    fn require_source(&self) -> GlowupResult<&[u8]> {
        self.source
            .as_deref()
            .ok_or_else(|| GlowupError::validation("no photo loaded"))
    }

    /// Composite the current photo and edits.
    pub fn render(&self) -> GlowupResult<RenderedImage> {
        render(
            self.require_source()?,
            &self.adjustments,
            &self.overlays,
            &self.fonts,
        )
    }

    /// Composite the current photo and edits into PNG bytes.
    pub fn export_png(&self) -> GlowupResult<Vec<u8>> {
        render_png(
            self.require_source()?,
            &self.adjustments,
            &self.overlays,
            &self.fonts,
        )
    }

    /// Write the composited PNG as `glowup-<unix ms>.png` inside `dir`.
    #[tracing::instrument(skip(self))]
    pub fn download_to(&mut self, dir: &Path) -> GlowupResult<PathBuf> {
        let result = self.export_png().and_then(|png| {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("glowup-{}.png", self.next_stamp()));
            std::fs::write(&path, png)?;
            Ok(path)
        });
        self.report(result, "Photo downloaded!")
    }

    /// Hand the composited PNG to `target`. Without a target, sharing is unsupported.
    pub fn share(&mut self, target: Option<&mut dyn ShareTarget>) -> GlowupResult<ShareOutcome> {
        let Some(target) = target else {
            let err = GlowupError::ShareUnsupported;
            self.notices.push(Notice::info(err.user_message()));
            return Err(err);
        };
        let png = match self.export_png() {
            Ok(png) => png,
            Err(e) => {
                self.notices.push(Notice::error(e.user_message()));
                return Err(e);
            }
        };
        let payload = SharePayload {
            title: SHARE_TITLE.to_string(),
            text: SHARE_TEXT.to_string(),
            file_name: format!("glowup-{}.png", self.next_stamp()),
            png,
        };

        match target.share(&payload) {
            Ok(ShareOutcome::Shared) => {
                self.notices.push(Notice::success("Shared successfully!"));
                Ok(ShareOutcome::Shared)
            }
            Ok(ShareOutcome::Cancelled) => {
                tracing::debug!("share cancelled");
                Ok(ShareOutcome::Cancelled)
            }
            Err(e) => {
                tracing::warn!(error = %e, "share failed");
                self.notices.push(Notice::error("Could not share"));
                Err(e)
            }
        }
    }

    // Gallery

    /// Upload the composited PNG to `photos/<user id>/<unix ms>.png`, record it, then reload
    /// the gallery.
    #[tracing::instrument(skip(self))]
    pub fn save_to_gallery(&mut self) -> GlowupResult<SavedPhoto> {
        let result = self.save_inner();
        self.report(result, "Photo saved to gallery!")
    }

    fn save_inner(&mut self) -> GlowupResult<SavedPhoto> {
        let png = self.export_png()?;
        let user = self.check_user()?.ok_or_else(|| {
            GlowupError::auth(AuthErrorKind::SessionExpired, "no active session")
        })?;

        let stamp = self.next_stamp();
        let storage_path = format!("{}/{stamp}.png", user.id);
        self.gateway
            .upload_object(PHOTOS_BUCKET, &storage_path, &png)?;
        let row = self.gateway.insert_photo(NewPhoto {
            user_id: user.id,
            name: format!("glowup-{stamp}"),
            storage_path,
        })?;
        tracing::info!(photo = %row.id, path = %row.storage_path, "saved to gallery");

        let url = self.gateway.public_url(PHOTOS_BUCKET, &row.storage_path);
        self.refresh_gallery_or_warn();
        Ok(SavedPhoto::from_row(row, url))
    }

    /// Reload the signed-in user's photos, newest first, with public URLs.
    pub fn refresh_gallery(&mut self) -> GlowupResult<&[SavedPhoto]> {
        let Some(user) = self.check_user()? else {
            self.gallery.clear();
            return Ok(&self.gallery);
        };
        let rows = self.gateway.list_photos(&user.id)?;
        self.gallery = rows
            .into_iter()
            .map(|row| {
                let url = self.gateway.public_url(PHOTOS_BUCKET, &row.storage_path);
                SavedPhoto::from_row(row, url)
            })
            .collect();
        Ok(&self.gallery)
    }

    fn refresh_gallery_or_warn(&mut self) {
        if let Err(e) = self.refresh_gallery() {
            tracing::warn!(error = %e, "could not load gallery");
        }
    }

    fn gallery_entry(&self, id: &PhotoId) -> GlowupResult<SavedPhoto> {
        self.gallery
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| {
                GlowupError::database(
                    DatabaseErrorKind::NotFound,
                    format!("photo {id} is not in the gallery"),
                )
            })
    }

    /// Remove the stored object, then its row, then reload the gallery.
    #[tracing::instrument(skip(self))]
    pub fn delete_photo(&mut self, id: &PhotoId) -> GlowupResult<()> {
        let result = self.gallery_entry(id).and_then(|photo| {
            self.gateway
                .remove_object(PHOTOS_BUCKET, &photo.storage_path)?;
            self.gateway.delete_photo(&photo.id)?;
            self.refresh_gallery()?;
            Ok(())
        });
        self.report(result, "Photo removed from gallery")
    }

    /// Download a gallery photo and make it the current source image.
    #[tracing::instrument(skip(self))]
    pub fn load_from_gallery(&mut self, id: &PhotoId) -> GlowupResult<()> {
        let result = self.gallery_entry(id).and_then(|photo| {
            let bytes = self
                .gateway
                .download_object(PHOTOS_BUCKET, &photo.storage_path)?;
            decode_image(&bytes)?;
            Ok(bytes)
        });
        let bytes = self.report(result, "Photo loaded from gallery!")?;
        self.source = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/mod.rs"]
mod tests;
