// --- File: crates/bookline_gcal/src/memory.rs ---
//! Process-local calendar.
//!
//! Backs `provider = "memory"` for local runs without credentials and drives
//! the test suite: busy time can be seeded, failures injected, calls counted,
//! and commits held at a barrier so concurrent bookings interleave.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bookline_common::models::{BusyInterval, CalendarEvent, CalendarEventResult, LedgerInstant};
use bookline_common::services::{BoxFuture, CalendarService};
use chrono_tz::Tz;
use tokio::sync::Barrier;
use tracing::debug;

use crate::service::GcalServiceError;

/// Failure a test can make the calendar return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectedFailure {
    Unauthorized,
    NotFound,
    Upstream,
}

impl InjectedFailure {
    fn to_error(self) -> GcalServiceError {
        match self {
            InjectedFailure::Unauthorized => GcalServiceError::Unauthorized("injected 401".into()),
            InjectedFailure::NotFound => GcalServiceError::NotFound("injected 404".into()),
            InjectedFailure::Upstream => GcalServiceError::Upstream("injected 500".into()),
        }
    }
}

/// An event created through [`CalendarService::create_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub id: String,
    pub start: LedgerInstant,
    pub end: LedgerInstant,
    pub summary: String,
    pub description: Option<String>,
}

pub struct InMemoryCalendarService {
    ledger: Tz,
    busy: Mutex<Vec<BusyInterval>>,
    events: Mutex<Vec<StoredEvent>>,
    query_calls: AtomicUsize,
    create_calls: AtomicUsize,
    /// Queries beyond the first `n` fail.
    query_failure: Option<(usize, InjectedFailure)>,
    create_failure: Option<InjectedFailure>,
    query_delay: Option<Duration>,
    commit_barrier: Option<Arc<Barrier>>,
    reject_conflicts: bool,
}

impl InMemoryCalendarService {
    pub fn new(ledger: Tz) -> Self {
        Self {
            ledger,
            busy: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            query_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            query_failure: None,
            create_failure: None,
            query_delay: None,
            commit_barrier: None,
            reject_conflicts: false,
        }
    }

    pub fn with_busy(self, intervals: impl IntoIterator<Item = BusyInterval>) -> Self {
        for interval in intervals {
            self.add_busy(interval);
        }
        self
    }

    /// Every query after the first `successful` ones fails with `failure`.
    pub fn fail_queries_after(mut self, successful: usize, failure: InjectedFailure) -> Self {
        self.query_failure = Some((successful, failure));
        self
    }

    pub fn fail_creates(mut self, failure: InjectedFailure) -> Self {
        self.create_failure = Some(failure);
        self
    }

    /// Delays every busy query, for exercising call deadlines.
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = Some(delay);
        self
    }

    /// Holds each commit until `barrier` releases.
    pub fn with_commit_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.commit_barrier = Some(barrier);
        self
    }

    /// Rejects creates that overlap existing busy time with a conflict,
    /// as a calendar with its own conflict detection would.
    pub fn with_conflict_detection(mut self) -> Self {
        self.reject_conflicts = true;
        self
    }

    pub fn add_busy(&self, interval: BusyInterval) {
        let mut busy = self.busy.lock().unwrap_or_else(PoisonError::into_inner);
        busy.push(BusyInterval::new(
            interval.start.with_timezone(&self.ledger),
            interval.end.with_timezone(&self.ledger),
        ));
        busy.sort_by_key(|b| b.start);
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<StoredEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Seeded busy time plus created events overlapping `[start, end)`.
    fn busy_between(&self, start: &LedgerInstant, end: &LedgerInstant) -> Vec<BusyInterval> {
        let seeded = self.busy.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let booked: Vec<BusyInterval> = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|event| BusyInterval::new(event.start, event.end))
            .collect();

        let mut overlapping: Vec<BusyInterval> = seeded
            .into_iter()
            .chain(booked)
            .filter(|busy| busy.overlaps(start, end))
            .collect();
        overlapping.sort_by_key(|busy| busy.start);
        overlapping
    }
}

impl CalendarService for InMemoryCalendarService {
    type Error = GcalServiceError;

    fn query_busy(
        &self,
        start: LedgerInstant,
        end: LedgerInstant,
    ) -> BoxFuture<'_, Vec<BusyInterval>, Self::Error> {
        Box::pin(async move {
            let call = self.query_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.query_delay {
                tokio::time::sleep(delay).await;
            }

            if let Some((successful, failure)) = self.query_failure {
                if call >= successful {
                    return Err(failure.to_error());
                }
            }

            let start = start.with_timezone(&self.ledger);
            let end = end.with_timezone(&self.ledger);
            Ok(self.busy_between(&start, &end))
        })
    }

    fn create_event(&self, event: CalendarEvent) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        Box::pin(async move {
            self.create_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(barrier) = &self.commit_barrier {
                barrier.wait().await;
            }

            if let Some(failure) = self.create_failure {
                return Err(failure.to_error());
            }

            if event.end <= event.start {
                return Err(GcalServiceError::TimeParseError(
                    "End time must be after start time".to_string(),
                ));
            }

            let start = event.start.with_timezone(&self.ledger);
            let end = event.end.with_timezone(&self.ledger);

            let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
            if self.reject_conflicts {
                let seeded_conflict = self
                    .busy
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .any(|busy| busy.overlaps(&start, &end));
                let booked_conflict = events
                    .iter()
                    .any(|e| BusyInterval::new(e.start, e.end).overlaps(&start, &end));
                if seeded_conflict || booked_conflict {
                    return Err(GcalServiceError::Conflict);
                }
            }

            let id = format!("mem-{}", uuid::Uuid::new_v4());
            debug!("in-memory calendar stored {} at {} - {}", id, start, end);
            events.push(StoredEvent {
                id: id.clone(),
                start,
                end,
                summary: event.summary,
                description: event.description,
            });

            Ok(CalendarEventResult {
                event_id: Some(id),
                status: "confirmed".to_string(),
            })
        })
    }
}
