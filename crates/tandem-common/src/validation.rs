//! Input validation utilities.
//!
//! Centralized validation helpers used across API routes.

use validator::Validate;

use crate::error::TandemError;
use crate::models::{EnvelopeId, OutboundSignal, SignalPayload, SubmitSignalRequest};

/// Validate a request body, returning a TandemError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), TandemError> {
    body.validate().map_err(|e| TandemError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect();
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

/// Returns the trimmed name, or a validation error carrying `message` when it is blank.
pub fn require_name<'a>(name: Option<&'a str>, message: &str) -> Result<&'a str, TandemError> {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => Ok(n),
        _ => Err(TandemError::validation(message)),
    }
}

/// Check a submitted signal and turn it into a store-ready [`OutboundSignal`].
pub fn validate_submission(req: SubmitSignalRequest) -> Result<OutboundSignal, TandemError> {
    const REQUIRED: &str = "from/signal required";

    let from = require_name(req.from.as_deref(), REQUIRED)?.to_string();
    let payload = req.signal.ok_or_else(|| TandemError::validation(REQUIRED))?;

    match &payload {
        SignalPayload::Offer { sdp, .. } | SignalPayload::Answer { sdp } if sdp.trim().is_empty() => {
            return Err(TandemError::validation("signal sdp must not be empty"));
        }
        SignalPayload::Candidate { ice_candidate } if ice_candidate.is_null() => {
            return Err(TandemError::validation("signal candidate must not be empty"));
        }
        _ => {}
    }

    let to = req
        .to
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    Ok(OutboundSignal { from, to, payload })
}

/// Parse the poll cursor. Absent or empty means "from the beginning".
pub fn parse_cursor(last_id: Option<&str>) -> Result<Option<EnvelopeId>, TandemError> {
    match last_id.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<EnvelopeId>()
            .map(Some)
            .map_err(|_| TandemError::validation("last_id must be a non-negative integer")),
    }
}
