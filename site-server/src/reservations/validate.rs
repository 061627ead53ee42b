//! Boundary validation: wire payloads → checked drafts/patches
//!
//! The store layer only ever sees values that passed through here.

use chrono::{DateTime, NaiveDate};
use shared::error::{AppError, ErrorCode};
use shared::models::{ReservationCreate, ReservationStatus, ReservationUpdate};
use shared::slug::{RequestedTag, dedupe_tag_names};

use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, trim_optional, validate_email,
    validate_min_text, validate_optional_text, validate_required_text,
};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PHONE_LEN: usize = 7;
pub const MIN_GUESTS: i32 = 1;
pub const MAX_GUESTS: i32 = 50;
/// Per-request cap on tag names
pub const MAX_TAGS: usize = 20;

/// Validated public submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub date: NaiveDate,
    pub time: String,
    pub guests: i32,
    pub notes: Option<String>,
    pub tags: Vec<RequestedTag>,
}

/// Validated partial update; `None` means "leave as is"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub guests: Option<i32>,
    pub notes: Option<String>,
    pub status: Option<ReservationStatus>,
    /// Replacement tag list (deduplicated by slug)
    pub tags: Option<Vec<RequestedTag>>,
}

impl ReservationDraft {
    pub fn validate(payload: ReservationCreate) -> Result<Self, AppError> {
        Ok(Self {
            name: check_name(&payload.name)?,
            phone: check_phone(&payload.phone)?,
            email: check_email(&payload.email)?,
            date: parse_reservation_date(&payload.date)?,
            time: check_time(&payload.time)?,
            guests: check_guests(payload.guests)?,
            notes: check_notes(trim_optional(payload.notes))?,
            tags: check_tags(&payload.tags)?,
        })
    }
}

impl ReservationPatch {
    pub fn validate(payload: ReservationUpdate) -> Result<Self, AppError> {
        Ok(Self {
            name: payload.name.as_deref().map(check_name).transpose()?,
            phone: payload.phone.as_deref().map(check_phone).transpose()?,
            email: payload.email.as_deref().map(check_email).transpose()?,
            date: payload
                .date
                .as_deref()
                .map(parse_reservation_date)
                .transpose()?,
            time: payload.time.as_deref().map(check_time).transpose()?,
            guests: payload.guests.map(check_guests).transpose()?,
            // Present-but-blank clears the note to an empty string
            notes: check_notes(payload.notes.map(|n| n.trim().to_string()))?,
            status: payload.status,
            tags: payload.tags.as_deref().map(check_tags).transpose()?,
        })
    }
}

/// Parse an ISO calendar date (`2025-03-14`) or an RFC 3339 timestamp
/// (the date part is kept as written, offset ignored).
pub fn parse_reservation_date(value: &str) -> Result<NaiveDate, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid_date(value, "Date is required"));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    Err(invalid_date(value, "Invalid reservation date"))
}

fn invalid_date(value: &str, message: &str) -> AppError {
    AppError::with_message(ErrorCode::InvalidReservationDate, message)
        .with_detail("field", "date")
        .with_detail("value", value)
}

fn check_name(value: &str) -> Result<String, AppError> {
    validate_min_text(value, "name", MIN_NAME_LEN, MAX_NAME_LEN)?;
    Ok(value.trim().to_string())
}

fn check_phone(value: &str) -> Result<String, AppError> {
    validate_min_text(value, "phone", MIN_PHONE_LEN, MAX_SHORT_TEXT_LEN)?;
    Ok(value.trim().to_string())
}

fn check_email(value: &str) -> Result<String, AppError> {
    validate_email(value)?;
    Ok(value.trim().to_string())
}

fn check_time(value: &str) -> Result<String, AppError> {
    validate_required_text(value, "time", MAX_SHORT_TEXT_LEN)?;
    Ok(value.trim().to_string())
}

fn check_guests(guests: i32) -> Result<i32, AppError> {
    if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
        return Err(AppError::new(ErrorCode::InvalidGuestCount)
            .with_detail("field", "guests")
            .with_detail("value", guests));
    }
    Ok(guests)
}

fn check_notes(notes: Option<String>) -> Result<Option<String>, AppError> {
    validate_optional_text(&notes, "notes", MAX_NOTE_LEN)?;
    Ok(notes)
}

fn check_tags(names: &[String]) -> Result<Vec<RequestedTag>, AppError> {
    if names.len() > MAX_TAGS {
        return Err(AppError::validation(format!("At most {MAX_TAGS} tags are allowed"))
            .with_detail("field", "tags"));
    }
    for name in names {
        if name.len() > MAX_NAME_LEN {
            return Err(AppError::with_message(
                ErrorCode::InvalidTagName,
                format!("Tag name is too long (max {MAX_NAME_LEN})"),
            )
            .with_detail("field", "tags"));
        }
    }
    dedupe_tag_names(names).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidTagName, e.to_string()).with_detail("field", "tags")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload() -> ReservationCreate {
        ReservationCreate {
            name: "  Ana Lima ".into(),
            phone: "340-555-0100".into(),
            email: "ana@example.com".into(),
            date: "2025-03-14".into(),
            time: "19:30".into(),
            guests: 4,
            notes: Some("   ".into()),
            tags: vec!["VIP".into(), "vip".into(), "  VIP ".into(), "St. Thomas".into()],
        }
    }

    #[test]
    fn test_draft_trims_and_dedupes() {
        let draft = ReservationDraft::validate(create_payload()).unwrap();
        assert_eq!(draft.name, "Ana Lima");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(draft.notes, None);
        let slugs: Vec<_> = draft.tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec!["vip", "st-thomas"]);
        assert_eq!(draft.tags[0].name, "VIP");
    }

    #[test]
    fn test_draft_rejects_bad_fields() {
        let mut p = create_payload();
        p.name = "A".into();
        assert_eq!(
            ReservationDraft::validate(p).unwrap_err().code,
            ErrorCode::ValidationFailed
        );

        let mut p = create_payload();
        p.phone = "12345".into();
        assert!(ReservationDraft::validate(p).is_err());

        let mut p = create_payload();
        p.email = "ana-at-example".into();
        assert!(ReservationDraft::validate(p).is_err());

        let mut p = create_payload();
        p.guests = 0;
        assert_eq!(
            ReservationDraft::validate(p).unwrap_err().code,
            ErrorCode::InvalidGuestCount
        );

        let mut p = create_payload();
        p.guests = 51;
        assert!(ReservationDraft::validate(p).is_err());

        let mut p = create_payload();
        p.time = " ".into();
        assert!(ReservationDraft::validate(p).is_err());

        let mut p = create_payload();
        p.tags = vec!["!!!".into()];
        assert_eq!(
            ReservationDraft::validate(p).unwrap_err().code,
            ErrorCode::InvalidTagName
        );
    }

    #[test]
    fn test_parse_reservation_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_reservation_date("2025-12-31").unwrap(), expected);
        assert_eq!(
            parse_reservation_date("2025-12-31T23:00:00-04:00").unwrap(),
            expected
        );

        let err = parse_reservation_date("next friday").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReservationDate);
        assert!(parse_reservation_date("2025-02-30").is_err());
        assert!(parse_reservation_date("").is_err());
    }

    #[test]
    fn test_patch_keeps_absent_fields_absent() {
        let patch = ReservationPatch::validate(ReservationUpdate {
            status: Some(ReservationStatus::Confirmed),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            patch,
            ReservationPatch {
                status: Some(ReservationStatus::Confirmed),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let err = ReservationPatch::validate(ReservationUpdate {
            date: Some("31/12/2025".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReservationDate);

        let patch = ReservationPatch::validate(ReservationUpdate {
            notes: Some("  ".into()),
            tags: Some(vec![]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.notes.as_deref(), Some(""));
        assert_eq!(patch.tags, Some(vec![]));
    }
}
