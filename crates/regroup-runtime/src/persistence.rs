#![forbid(unsafe_code)]

//! Persistence bridge: serializes order commits for one résumé.
//!
//! The bridge is sans-IO. [`PersistenceBridge::submit`] turns a new order into
//! a [`CommitRequest`]; the host runs it against a [`RearrangeSections`]
//! backend (see [`CommitRequest::send`]) and feeds the outcome back through
//! [`PersistenceBridge::settle`]. Nothing is borrowed across the await, so
//! new drags keep working while a commit is in flight.
//!
//! # Invariants
//! 1. At most one commit is in flight per résumé.
//! 2. At most one order is queued behind it; a newer queued order replaces an
//!    older one (last-write-wins).
//! 3. A failed commit with nothing queued yields exactly one
//!    [`Settlement::RolledBack`]; a failed commit with a newer order queued is
//!    [`Settlement::Superseded`] and never rolls back.
//! 4. Outcomes for tickets that are not in flight are [`Settlement::Stale`]
//!    and change nothing.
//! 5. Ticket numbers are never reused, not even across [`PersistenceBridge::reset`].
//!
//! # Failure Modes
//! - Backend error: surfaced through `settle`, logged at `WARN` once.
//! - Host forgets to settle: the bridge stays busy and queues every later
//!   order; `reset` is the escape hatch.

use std::fmt;
use std::future::Future;

use regroup_core::order::Order;
use regroup_core::section::ResumeId;
use tracing::Instrument;
use web_time::Instant;

use crate::error::PersistError;

// ---------------------------------------------------------------------------
// Backend contract
// ---------------------------------------------------------------------------

/// The single backend mutation: persist the full flattened section order.
pub trait RearrangeSections {
    fn rearrange_sections(
        &self,
        resume_id: &ResumeId,
        order: &Order,
    ) -> impl Future<Output = Result<(), PersistError>>;
}

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// Identifies one dispatched commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitTicket(u64);

impl CommitTicket {
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommitTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A commit the host must run against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub ticket: CommitTicket,
    pub resume_id: ResumeId,
    pub order: Order,
}

/// What the backend said about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub ticket: CommitTicket,
    pub result: Result<(), PersistError>,
}

impl CommitRequest {
    /// Run this request against `backend` inside a `persist.commit` span.
    ///
    /// Consumes the request; the returned future borrows only the backend.
    pub async fn send<B: RearrangeSections>(self, backend: &B) -> CommitOutcome {
        let span = tracing::debug_span!(
            "persist.commit",
            ticket = self.ticket.get(),
            resume_id = %self.resume_id,
            sections = self.order.len(),
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
        );

        let start = Instant::now();
        let result = backend
            .rearrange_sections(&self.resume_id, &self.order)
            .instrument(span.clone())
            .await;
        let duration_us = start.elapsed().as_micros() as u64;
        span.record("duration_us", duration_us);
        span.record("result", if result.is_ok() { "ok" } else { "err" });

        CommitOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// How an outcome changed the bridge, and what the caller must do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// `order` is now the confirmed baseline. `next` is the queued order, if
    /// any, now in flight.
    Confirmed {
        order: Order,
        next: Option<CommitRequest>,
    },
    /// The commit failed with nothing queued: revert to the confirmed order.
    RolledBack { error: PersistError },
    /// The commit failed but a newer order was already queued. No rollback;
    /// `next` is that order in flight (or `None` when it equals the confirmed
    /// order and needs no commit).
    Superseded {
        error: PersistError,
        next: Option<CommitRequest>,
    },
    /// The ticket is not in flight (old résumé, duplicate reply).
    Stale,
}

impl Settlement {
    /// The follow-up request the host must dispatch, if any.
    #[must_use]
    pub fn next_request(&self) -> Option<&CommitRequest> {
        match self {
            Self::Confirmed { next, .. } | Self::Superseded { next, .. } => next.as_ref(),
            Self::RolledBack { .. } | Self::Stale => None,
        }
    }
}

/// Bridge counters for monitoring and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Requests handed to the host.
    pub sent: u64,
    pub confirmed: u64,
    pub rolled_back: u64,
    /// Failures absorbed because a newer order was queued.
    pub superseded: u64,
    /// Queued orders replaced by a newer one before being sent.
    pub coalesced: u64,
    /// Submissions that needed no commit.
    pub skipped: u64,
    pub stale: u64,
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct InFlight {
    ticket: CommitTicket,
    order: Order,
}

/// Commit serializer for one résumé.
#[derive(Debug, Clone)]
pub struct PersistenceBridge {
    resume_id: ResumeId,
    next_ticket: u64,
    in_flight: Option<InFlight>,
    queued: Option<Order>,
    stats: BridgeStats,
}

impl PersistenceBridge {
    #[must_use]
    pub fn new(resume_id: ResumeId) -> Self {
        Self {
            resume_id,
            next_ticket: 1,
            in_flight: None,
            queued: None,
            stats: BridgeStats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn resume_id(&self) -> &ResumeId {
        &self.resume_id
    }

    /// Whether a commit is in flight or queued.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some() || self.queued.is_some()
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<CommitTicket> {
        self.in_flight.as_ref().map(|f| f.ticket)
    }

    #[must_use]
    pub fn queued(&self) -> Option<&Order> {
        self.queued.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    /// Hand a freshly produced order to the bridge.
    ///
    /// Returns the request to dispatch now, or `None` when the order was
    /// queued behind the in-flight commit or needs no commit at all.
    pub fn submit(&mut self, order: Order, confirmed: &Order) -> Option<CommitRequest> {
        let Some(in_flight) = &self.in_flight else {
            if &order == confirmed {
                self.stats.skipped += 1;
                tracing::trace!(
                    target: "regroup.persist",
                    resume_id = %self.resume_id,
                    "order matches confirmed, nothing to commit"
                );
                return None;
            }
            return Some(self.dispatch(order));
        };

        if order == in_flight.order {
            // The in-flight commit already carries what the user now sees.
            if self.queued.take().is_some() {
                self.stats.coalesced += 1;
            } else {
                self.stats.skipped += 1;
            }
            return None;
        }

        if self.queued.replace(order).is_some() {
            self.stats.coalesced += 1;
        }
        tracing::trace!(
            target: "regroup.persist",
            resume_id = %self.resume_id,
            in_flight = %in_flight.ticket,
            "order queued behind in-flight commit"
        );
        None
    }

    /// Apply a backend outcome.
    ///
    /// `confirmed` is the caller's current confirmed order; it decides whether
    /// a queued order still needs to be sent after a failure.
    pub fn settle(&mut self, outcome: CommitOutcome, confirmed: &Order) -> Settlement {
        let CommitOutcome { ticket, result } = outcome;
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            other => {
                self.in_flight = other;
                self.stats.stale += 1;
                tracing::debug!(
                    target: "regroup.persist",
                    resume_id = %self.resume_id,
                    %ticket,
                    "ignoring outcome for a ticket that is not in flight"
                );
                return Settlement::Stale;
            }
        };

        match result {
            Ok(()) => {
                self.stats.confirmed += 1;
                tracing::debug!(
                    target: "regroup.persist",
                    resume_id = %self.resume_id,
                    %ticket,
                    "commit confirmed"
                );
                let next = self.queued.take().and_then(|queued| {
                    if queued == in_flight.order {
                        self.stats.skipped += 1;
                        None
                    } else {
                        Some(self.dispatch(queued))
                    }
                });
                Settlement::Confirmed {
                    order: in_flight.order,
                    next,
                }
            }
            Err(error) => match self.queued.take() {
                Some(queued) => {
                    self.stats.superseded += 1;
                    tracing::debug!(
                        target: "regroup.persist",
                        resume_id = %self.resume_id,
                        %ticket,
                        %error,
                        "commit failed but a newer order is queued"
                    );
                    let next = if &queued == confirmed {
                        self.stats.skipped += 1;
                        None
                    } else {
                        Some(self.dispatch(queued))
                    };
                    Settlement::Superseded { error, next }
                }
                None => {
                    self.stats.rolled_back += 1;
                    tracing::warn!(
                        target: "regroup.persist",
                        resume_id = %self.resume_id,
                        %ticket,
                        %error,
                        "section order commit failed, rolling back"
                    );
                    Settlement::RolledBack { error }
                }
            },
        }
    }

    /// Forget the in-flight and queued commits and switch to `resume_id`.
    ///
    /// Outcomes for forgotten tickets settle as [`Settlement::Stale`].
    pub fn reset(&mut self, resume_id: ResumeId) {
        if self.is_pending() {
            tracing::debug!(
                target: "regroup.persist",
                resume_id = %self.resume_id,
                "dropping pending commits"
            );
        }
        self.resume_id = resume_id;
        self.in_flight = None;
        self.queued = None;
    }

    fn dispatch(&mut self, order: Order) -> CommitRequest {
        let ticket = CommitTicket(self.next_ticket);
        self.next_ticket += 1;
        self.stats.sent += 1;
        self.in_flight = Some(InFlight {
            ticket,
            order: order.clone(),
        });
        tracing::trace!(
            target: "regroup.persist",
            resume_id = %self.resume_id,
            %ticket,
            sections = order.len(),
            "commit dispatched"
        );
        CommitRequest {
            ticket,
            resume_id: self.resume_id.clone(),
            order,
        }
    }
}
