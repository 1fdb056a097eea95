//! Trip data model.
//!
//! A trip is owned by exactly one user and carries a date range. Date rules:
//! `start_date <= end_date` always, and on creation the start date must not be
//! before the current calendar day. Updates re-validate the complete record
//! after applying the patch, so changing only one end of the range cannot
//! bypass the pairwise invariant.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Validation errors raised by [`Trip`] constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripValidationError {
    /// Title is empty once trimmed.
    EmptyTitle,
    /// Start date lies before the current calendar day.
    StartInPast,
    /// End date lies before the start date.
    EndBeforeStart,
}

impl std::fmt::Display for TripValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::StartInPast => write!(f, "Trip start date cannot be in the past"),
            Self::EndBeforeStart => write!(f, "End date cannot be before start date"),
        }
    }
}

impl std::error::Error for TripValidationError {}

/// Input for creating a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    /// Trip title; required, non-empty.
    pub title: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Optional cover photo URL from the image host.
    pub cover_photo_url: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start date.
    pub start_date: Option<NaiveDate>,
    /// Replacement end date.
    pub end_date: Option<NaiveDate>,
    /// Replacement cover photo URL.
    pub cover_photo_url: Option<String>,
}

impl TripPatch {
    /// True when no field is supplied; such a patch is a `BadRequest`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.cover_photo_url.is_none()
    }
}

/// A user-owned travel plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Stable identifier (UUID v4).
    pub id: Uuid,
    /// Owning user; immutable for the lifetime of the trip.
    pub user_id: Uuid,
    /// Trip title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Optional cover photo URL.
    pub cover_photo_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Trip {
    /// Validate a draft and mint a new trip for `user_id`.
    ///
    /// `today` is the current calendar day supplied by the clock port; the
    /// comparison is date-only, matching the midnight-truncation behaviour of
    /// the boundary.
    pub fn create(
        user_id: Uuid,
        draft: TripDraft,
        today: NaiveDate,
    ) -> Result<Self, TripValidationError> {
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            return Err(TripValidationError::EmptyTitle);
        }
        if draft.start_date < today {
            return Err(TripValidationError::StartInPast);
        }
        if draft.end_date < draft.start_date {
            return Err(TripValidationError::EndBeforeStart);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            cover_photo_url: draft.cover_photo_url,
            created_at: Utc::now(),
        })
    }

    /// Apply a partial update and re-validate the complete resulting record.
    ///
    /// The start-not-in-past rule only applies when the patch actually moves
    /// the start date; an existing trip whose start has already passed may
    /// still have its other fields edited. End-after-start is always checked
    /// against the merged record.
    pub fn apply(&self, patch: TripPatch, today: NaiveDate) -> Result<Self, TripValidationError> {
        let mut updated = self.clone();
        if let Some(title) = patch.title {
            let title = title.trim().to_owned();
            if title.is_empty() {
                return Err(TripValidationError::EmptyTitle);
            }
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(start_date) = patch.start_date {
            if start_date < today {
                return Err(TripValidationError::StartInPast);
            }
            updated.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            updated.end_date = end_date;
        }
        if let Some(url) = patch.cover_photo_url {
            updated.cover_photo_url = Some(url);
        }
        if updated.end_date < updated.start_date {
            return Err(TripValidationError::EndBeforeStart);
        }
        Ok(updated)
    }
}
