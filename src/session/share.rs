use crate::foundation::error::GlowupResult;

pub const SHARE_TITLE: &str = "My edited photo";
pub const SHARE_TEXT: &str = "Check out my edited photo on GlowUp Studio!";

/// What gets handed to a platform share sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub png: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the share sheet.
    Cancelled,
}

/// A native share capability.
pub trait ShareTarget {
    fn share(&mut self, payload: &SharePayload) -> GlowupResult<ShareOutcome>;
}

impl<F> ShareTarget for F
where
    F: FnMut(&SharePayload) -> GlowupResult<ShareOutcome>,
{
    fn share(&mut self, payload: &SharePayload) -> GlowupResult<ShareOutcome> {
        self(payload)
    }
}
