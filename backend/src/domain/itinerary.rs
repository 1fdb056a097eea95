//! Itinerary day and block data model — the scheduling core.
//!
//! Days are calendar dates within a trip; blocks are typed, time-bounded
//! activities within a day. Invariants enforced here:
//!
//! - `day_number` is a positive integer. It is caller-supplied and deliberately
//!   NOT unique per trip; the itinerary builder owns numbering.
//! - Block times are time-of-day values with `start_time < end_time`, strictly.
//!   Partial updates merge the patch over the stored record and re-validate the
//!   complete result, so the invariant holds even when only one end changes.
//! - Sibling overlap within a day is governed by a pluggable [`OverlapPolicy`];
//!   the default permits overlap, matching the observed product behaviour.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised by itinerary constructors.
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryValidationError {
    /// `day_number` is zero or negative.
    NonPositiveDayNumber,
    /// Block title is empty once trimmed.
    EmptyTitle,
    /// `end_time` is not strictly after `start_time`.
    EndNotAfterStart,
    /// `estimated_cost` is negative.
    NegativeCost,
    /// The block overlaps a sibling and the active policy forbids that.
    Overlap {
        /// Title of the conflicting sibling block.
        with: String,
    },
}

impl std::fmt::Display for ItineraryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveDayNumber => write!(f, "day number must be positive"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EndNotAfterStart => write!(f, "end time must be after start time"),
            Self::NegativeCost => write!(f, "estimated cost must not be negative"),
            Self::Overlap { with } => write!(f, "block overlaps existing block '{with}'"),
        }
    }
}

impl std::error::Error for ItineraryValidationError {}

/// One calendar date within a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryDay {
    /// Stable identifier (UUID v4).
    pub id: Uuid,
    /// Parent trip.
    pub trip_id: Uuid,
    /// Position assigned by the itinerary builder; positive, not unique.
    pub day_number: i32,
    /// Calendar date of this day.
    pub date: NaiveDate,
    /// Optional city for the day.
    pub city: Option<String>,
    /// Optional country for the day.
    pub country: Option<String>,
}

/// Input for creating a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayDraft {
    /// Position within the trip.
    pub day_number: i32,
    /// Calendar date.
    pub date: NaiveDate,
    /// Optional city.
    pub city: Option<String>,
    /// Optional country.
    pub country: Option<String>,
}

/// Partial day update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayPatch {
    /// Replacement day number.
    pub day_number: Option<i32>,
    /// Replacement date.
    pub date: Option<NaiveDate>,
    /// Replacement city.
    pub city: Option<String>,
    /// Replacement country.
    pub country: Option<String>,
}

impl DayPatch {
    /// True when no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.day_number.is_none()
            && self.date.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

impl ItineraryDay {
    /// Validate a draft and mint a new day under `trip_id`.
    pub fn create(trip_id: Uuid, draft: DayDraft) -> Result<Self, ItineraryValidationError> {
        if draft.day_number <= 0 {
            return Err(ItineraryValidationError::NonPositiveDayNumber);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            trip_id,
            day_number: draft.day_number,
            date: draft.date,
            city: draft.city,
            country: draft.country,
        })
    }

    /// Apply a partial update and re-validate the complete record.
    pub fn apply(&self, patch: DayPatch) -> Result<Self, ItineraryValidationError> {
        let mut updated = self.clone();
        if let Some(day_number) = patch.day_number {
            if day_number <= 0 {
                return Err(ItineraryValidationError::NonPositiveDayNumber);
            }
            updated.day_number = day_number;
        }
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(city) = patch.city {
            updated.city = Some(city);
        }
        if let Some(country) = patch.country {
            updated.country = Some(country);
        }
        Ok(updated)
    }
}

/// Kind of an itinerary block; closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A planned activity (museum, hike, meal out).
    Activity,
    /// Downtime between activities.
    Rest,
    /// Overnight accommodation.
    Sleep,
    /// Unscheduled gap kept visible in the builder.
    Gap,
}

impl BlockType {
    /// Stored/wire name of the block type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "ACTIVITY",
            Self::Rest => "REST",
            Self::Sleep => "SLEEP",
            Self::Gap => "GAP",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVITY" => Ok(Self::Activity),
            "REST" => Ok(Self::Rest),
            "SLEEP" => Ok(Self::Sleep),
            "GAP" => Ok(Self::Gap),
            _ => Err(()),
        }
    }
}

/// A typed, time-bounded activity within a day.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryBlock {
    /// Stable identifier (UUID v4).
    pub id: Uuid,
    /// Parent day.
    pub itinerary_day_id: Uuid,
    /// Kind of block.
    pub block_type: BlockType,
    /// Title shown in the builder.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start of the block, time of day.
    pub start_time: NaiveTime,
    /// End of the block, strictly after `start_time`.
    pub end_time: NaiveTime,
    /// Optional non-negative cost estimate.
    pub estimated_cost: Option<f64>,
}

/// Input for creating a block.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDraft {
    /// Kind of block.
    pub block_type: BlockType,
    /// Title; required, non-empty.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End time of day.
    pub end_time: NaiveTime,
    /// Optional non-negative cost estimate.
    pub estimated_cost: Option<f64>,
}

/// Partial block update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    /// Replacement block type.
    pub block_type: Option<BlockType>,
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement start time.
    pub start_time: Option<NaiveTime>,
    /// Replacement end time.
    pub end_time: Option<NaiveTime>,
    /// Replacement cost estimate.
    pub estimated_cost: Option<f64>,
}

impl BlockPatch {
    /// True when no field is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.block_type.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.estimated_cost.is_none()
    }
}

impl ItineraryBlock {
    /// Validate a draft and mint a new block under `day_id`.
    pub fn create(day_id: Uuid, draft: BlockDraft) -> Result<Self, ItineraryValidationError> {
        let block = Self {
            id: Uuid::new_v4(),
            itinerary_day_id: day_id,
            block_type: draft.block_type,
            title: draft.title,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
            estimated_cost: draft.estimated_cost,
        };
        block.validate()?;
        Ok(block)
    }

    /// Apply a partial update and re-validate the complete record.
    ///
    /// This closes the historical gap where updating a single end of the time
    /// range skipped the pairwise check against the stored value.
    pub fn apply(&self, patch: BlockPatch) -> Result<Self, ItineraryValidationError> {
        let mut updated = self.clone();
        if let Some(block_type) = patch.block_type {
            updated.block_type = block_type;
        }
        if let Some(title) = patch.title {
            updated.title = title;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(start_time) = patch.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            updated.end_time = end_time;
        }
        if let Some(cost) = patch.estimated_cost {
            updated.estimated_cost = Some(cost);
        }
        updated.validate()?;
        Ok(updated)
    }

    fn validate(&self) -> Result<(), ItineraryValidationError> {
        if self.title.trim().is_empty() {
            return Err(ItineraryValidationError::EmptyTitle);
        }
        if self.start_time >= self.end_time {
            return Err(ItineraryValidationError::EndNotAfterStart);
        }
        if self.estimated_cost.is_some_and(|cost| cost < 0.0) {
            return Err(ItineraryValidationError::NegativeCost);
        }
        Ok(())
    }

    /// True when this block's time range intersects `other`'s.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}

/// Strategy deciding whether sibling blocks may share time within a day.
///
/// Whether overlap is a feature (flexible scheduling) or an oversight is an
/// open product question, so the policy is injectable rather than hard-coded.
pub trait OverlapPolicy: Send + Sync {
    /// Check `candidate` against its siblings (the candidate itself must not
    /// be in `siblings`).
    fn check(
        &self,
        candidate: &ItineraryBlock,
        siblings: &[ItineraryBlock],
    ) -> Result<(), ItineraryValidationError>;
}

/// Default policy: overlapping sibling blocks are permitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowOverlaps;

impl OverlapPolicy for AllowOverlaps {
    fn check(
        &self,
        _candidate: &ItineraryBlock,
        _siblings: &[ItineraryBlock],
    ) -> Result<(), ItineraryValidationError> {
        Ok(())
    }
}

/// Strict policy: a block may not intersect any sibling's time range.
#[derive(Debug, Default, Clone, Copy)]
pub struct RejectOverlaps;

impl OverlapPolicy for RejectOverlaps {
    fn check(
        &self,
        candidate: &ItineraryBlock,
        siblings: &[ItineraryBlock],
    ) -> Result<(), ItineraryValidationError> {
        for sibling in siblings {
            if candidate.overlaps(sibling) {
                return Err(ItineraryValidationError::Overlap {
                    with: sibling.title.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date")
    }

    fn block(start: NaiveTime, end: NaiveTime) -> ItineraryBlock {
        ItineraryBlock::create(
            Uuid::new_v4(),
            BlockDraft {
                block_type: BlockType::Activity,
                title: "Museum".into(),
                description: None,
                start_time: start,
                end_time: end,
                estimated_cost: None,
            },
        )
        .expect("valid block")
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn day_rejects_non_positive_numbers(#[case] day_number: i32) {
        let result = ItineraryDay::create(
            Uuid::new_v4(),
            DayDraft {
                day_number,
                date: date(),
                city: None,
                country: None,
            },
        );
        assert_eq!(result, Err(ItineraryValidationError::NonPositiveDayNumber));
    }

    #[test]
    fn day_patch_merges_over_stored_fields() {
        let day = ItineraryDay::create(
            Uuid::new_v4(),
            DayDraft {
                day_number: 1,
                date: date(),
                city: Some("Palermo".into()),
                country: None,
            },
        )
        .expect("valid day");

        let updated = day
            .apply(DayPatch {
                country: Some("Italy".into()),
                ..DayPatch::default()
            })
            .expect("valid patch");
        assert_eq!(updated.city.as_deref(), Some("Palermo"));
        assert_eq!(updated.country.as_deref(), Some("Italy"));
        assert_eq!(updated.day_number, 1);
    }

    #[rstest]
    #[case(t(11, 0), t(9, 0))]
    #[case(t(9, 0), t(9, 0))]
    fn block_rejects_reversed_or_equal_times(#[case] start: NaiveTime, #[case] end: NaiveTime) {
        let result = ItineraryBlock::create(
            Uuid::new_v4(),
            BlockDraft {
                block_type: BlockType::Activity,
                title: "Museum".into(),
                description: None,
                start_time: start,
                end_time: end,
                estimated_cost: None,
            },
        );
        assert_eq!(result, Err(ItineraryValidationError::EndNotAfterStart));
    }

    #[test]
    fn block_rejects_negative_cost() {
        let result = ItineraryBlock::create(
            Uuid::new_v4(),
            BlockDraft {
                block_type: BlockType::Rest,
                title: "Nap".into(),
                description: None,
                start_time: t(14, 0),
                end_time: t(15, 0),
                estimated_cost: Some(-1.0),
            },
        );
        assert_eq!(result, Err(ItineraryValidationError::NegativeCost));
    }

    #[test]
    fn patch_of_single_time_end_is_revalidated_against_stored_value() {
        let stored = block(t(9, 0), t(11, 0));
        let result = stored.apply(BlockPatch {
            end_time: Some(t(8, 0)),
            ..BlockPatch::default()
        });
        assert_eq!(result, Err(ItineraryValidationError::EndNotAfterStart));
    }

    #[rstest]
    #[case("ACTIVITY", BlockType::Activity)]
    #[case("REST", BlockType::Rest)]
    #[case("SLEEP", BlockType::Sleep)]
    #[case("GAP", BlockType::Gap)]
    fn block_types_parse_from_stored_names(#[case] raw: &str, #[case] expected: BlockType) {
        assert_eq!(raw.parse::<BlockType>(), Ok(expected));
    }

    #[test]
    fn unknown_block_type_is_rejected() {
        assert!("COMMUTE".parse::<BlockType>().is_err());
    }

    #[test]
    fn allow_policy_accepts_overlapping_siblings() {
        let candidate = block(t(9, 0), t(11, 0));
        let sibling = block(t(10, 0), t(12, 0));
        AllowOverlaps
            .check(&candidate, &[sibling])
            .expect("allow policy never rejects");
    }

    #[rstest]
    #[case(t(10, 0), t(12, 0), true)]
    #[case(t(11, 0), t(12, 0), false)]
    #[case(t(7, 0), t(9, 0), false)]
    fn reject_policy_detects_intersections(
        #[case] sibling_start: NaiveTime,
        #[case] sibling_end: NaiveTime,
        #[case] conflicts: bool,
    ) {
        let candidate = block(t(9, 0), t(11, 0));
        let sibling = block(sibling_start, sibling_end);
        let result = RejectOverlaps.check(&candidate, &[sibling]);
        assert_eq!(result.is_err(), conflicts);
    }
}
