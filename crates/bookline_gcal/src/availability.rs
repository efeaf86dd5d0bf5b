// --- File: crates/bookline_gcal/src/availability.rs ---
//! Availability listing.
//!
//! One busy fetch covers the whole requested range; candidate slots are then
//! filtered against it with a half-open overlap test. In per-slot mode every
//! surviving candidate also gets its own fresh busy query, fanned out through
//! a bounded, order-preserving pool.

use bookline_common::models::{BusyInterval, LedgerInstant};
use bookline_common::services::CalendarService;
use bookline_common::{log_result, BooklineError};
use bookline_config::SlotCheckMode;
use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use chrono_tz::Tz;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::service::{with_deadline, SharedCalendar};
use crate::settings::EngineSettings;
use crate::slots::{self, Slot};
use crate::timezone::{end_of_day, parse_instant, to_zone, TimeZoneId};

/// Caller input for a listing, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub timezone: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// A validated listing range in the caller's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub timezone: TimeZoneId,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl AvailabilityQuery {
    /// Validates the timezone and normalises the range against `now`.
    ///
    /// Missing bounds default to `now` and `now + default_range`. Ranges
    /// longer than `max_range` are rejected. When both
    /// bounds fall on the same calendar day and the end carries no later
    /// time of day, the end is widened to the last second of that day.
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        default_range: Duration,
        max_range: Duration,
    ) -> Result<ResolvedRange, BooklineError> {
        let timezone = TimeZoneId::parse(self.timezone.as_deref())?;
        let tz = timezone.tz();
        let now = now.trunc_subsecs(0).with_timezone(&tz);

        let start = self
            .start_date
            .as_deref()
            .map(|s| parse_instant(s, tz))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| parse_instant(s, tz))
            .transpose()?;

        let range_start = start.map(|p| p.instant).unwrap_or(now);
        let mut range_end = end.map(|p| p.instant).unwrap_or(now + default_range);

        if let (Some(start), Some(end)) = (start, end) {
            let same_day = start.instant.date_naive() == end.instant.date_naive();
            if same_day && (!end.has_time || end.instant <= start.instant) {
                range_end = end_of_day(end.instant.date_naive(), tz)?;
            }
        }

        if range_start >= range_end {
            return Err(BooklineError::InvalidRange(format!(
                "start {} is not before end {}",
                range_start.to_rfc3339(),
                range_end.to_rfc3339()
            )));
        }

        if range_end - range_start > max_range {
            return Err(BooklineError::InvalidRange(format!(
                "range spans more than {} days",
                max_range.num_days()
            )));
        }

        Ok(ResolvedRange {
            timezone,
            start: range_start,
            end: range_end,
        })
    }
}

/// Half-open overlap of `[s1, e1)` and `[s2, e2)`.
pub fn overlaps<T: PartialOrd>(s1: &T, e1: &T, s2: &T, e2: &T) -> bool {
    s1 < e2 && e1 > s2
}

/// Keeps the candidates that overlap none of `busy`, in generation order.
pub fn free_slots(
    candidates: impl IntoIterator<Item = Slot>,
    busy: &[BusyInterval],
    ledger: Tz,
) -> Vec<Slot> {
    candidates
        .into_iter()
        .filter(|slot| {
            let (start, end) = slot.in_zone(ledger);
            match busy.iter().find(|b| overlaps(&start, &end, &b.start, &b.end)) {
                Some(b) => {
                    debug!("slot {} overlaps busy {} - {}", slot.start, b.start, b.end);
                    false
                }
                None => true,
            }
        })
        .collect()
}

/// Outcome of checking one slot against the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCheck {
    Free,
    Busy(BusyInterval),
    /// The calendar could not answer; callers treat this as unavailable.
    Inconclusive(String),
}

impl SlotCheck {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotCheck::Free)
    }
}

/// Available slots for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityListing {
    pub timezone: TimeZoneId,
    pub slots: Vec<Slot>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlot {
    /// Slot start in the caller's zone, with offset.
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01T09:00:00-05:00"))]
    pub date_time: String,
    #[cfg_attr(feature = "openapi", schema(example = "January 1, 2024 9:00 AM"))]
    pub formatted: String,
}

impl From<&Slot> for AvailableSlot {
    fn from(slot: &Slot) -> Self {
        Self {
            date_time: slot.start.to_rfc3339_opts(SecondsFormat::Secs, false),
            formatted: slot.start.format("%B %-d, %Y %-I:%M %p").to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[cfg_attr(feature = "openapi", schema(example = "America/New_York"))]
    pub timezone: String,
    pub available_slots: Vec<AvailableSlot>,
}

impl From<&AvailabilityListing> for AvailabilityResponse {
    fn from(listing: &AvailabilityListing) -> Self {
        Self {
            timezone: listing.timezone.name().to_string(),
            available_slots: listing.slots.iter().map(AvailableSlot::from).collect(),
        }
    }
}

/// Computes free slots against the shared calendar.
#[derive(Clone)]
pub struct AvailabilityEngine {
    calendar: SharedCalendar,
    settings: EngineSettings,
}

impl AvailabilityEngine {
    pub fn new(calendar: SharedCalendar, settings: EngineSettings) -> Self {
        Self { calendar, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn calendar(&self) -> &SharedCalendar {
        &self.calendar
    }

    pub async fn find_available(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityListing, BooklineError> {
        self.find_available_at(query, Utc::now()).await
    }

    /// [`find_available`](Self::find_available) with an explicit clock.
    pub async fn find_available_at(
        &self,
        query: &AvailabilityQuery,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityListing, BooklineError> {
        let range = query.resolve(now, self.settings.default_range, self.settings.max_range)?;
        let ledger = self.settings.ledger;
        let ledger_start = to_zone(&range.start, ledger);
        let ledger_end = to_zone(&range.end, ledger);

        debug!(
            "listing {} - {} ({}), ledger {} - {}",
            range.start,
            range.end,
            range.timezone.name(),
            ledger_start,
            ledger_end
        );

        let busy = log_result(
            with_deadline(
                self.settings.call_timeout,
                self.calendar.query_busy(ledger_start, ledger_end),
            )
            .await,
            &format!("Fetched busy time for {} - {}", ledger_start, ledger_end),
            &format!("Busy fetch for {} - {} failed", ledger_start, ledger_end),
        )?;

        let candidates = slots::generate(
            range.start,
            range.end,
            range.timezone.tz(),
            self.settings.slot_duration,
        );
        let mut available = free_slots(candidates, &busy, ledger);

        if self.settings.check_mode == SlotCheckMode::PerSlot {
            available = self.recheck_each(available).await;
        }

        info!(
            "Found {} available slots for {} ({} busy intervals)",
            available.len(),
            range.timezone.name(),
            busy.len()
        );

        Ok(AvailabilityListing {
            timezone: range.timezone,
            slots: available,
        })
    }

    /// Fresh busy query scoped to exactly one slot.
    pub async fn check_slot(&self, slot: &Slot) -> SlotCheck {
        let (start, end): (LedgerInstant, LedgerInstant) = slot.in_zone(self.settings.ledger);
        let result = with_deadline(self.settings.call_timeout, self.calendar.query_busy(start, end)).await;

        match result {
            Ok(busy) => match busy.into_iter().find(|b| b.overlaps(&start, &end)) {
                Some(b) => SlotCheck::Busy(b),
                None => SlotCheck::Free,
            },
            Err(e) => SlotCheck::Inconclusive(e.to_string()),
        }
    }

    /// Runs [`check_slot`](Self::check_slot) over `candidates` with at most
    /// `max_concurrent_checks` in flight, keeping only free slots.
    async fn recheck_each(&self, candidates: Vec<Slot>) -> Vec<Slot> {
        let checks: Vec<(Slot, SlotCheck)> = stream::iter(candidates)
            .map(|slot| async move {
                let check = self.check_slot(&slot).await;
                (slot, check)
            })
            .buffered(self.settings.max_concurrent_checks)
            .collect()
            .await;

        checks
            .into_iter()
            .filter_map(|(slot, check)| match check {
                SlotCheck::Free => Some(slot),
                SlotCheck::Busy(b) => {
                    debug!("slot {} busy on recheck ({} - {})", slot.start, b.start, b.end);
                    None
                }
                SlotCheck::Inconclusive(reason) => {
                    warn!("slot {} excluded, check failed: {}", slot.start, reason);
                    None
                }
            })
            .collect()
    }
}
