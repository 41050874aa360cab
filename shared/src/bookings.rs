//! Booking list controller and optimistic status mutation.
//!
//! The controller is sans-IO: every trigger returns a [`FetchTicket`]
//! describing the request to send, and the caller hands the result back via
//! [`BookingListController::complete`]. Tickets carry a generation so a slow
//! response to a superseded request can never overwrite a newer page.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    api::ApiError,
    fetch::{FetchOutcome, LoadState, RequestSeq},
    models::{Booking, BookingStatus, DashboardStats},
};

/// Rows per page. Fixed by the dashboard.
pub const PAGE_SIZE: usize = 10;

/// User-chosen constraints on the booking list. Empty means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingFilters {
    /// Inclusive lower bound, `YYYY-MM-DD`.
    pub start_date: String,
    /// Inclusive upper bound, `YYYY-MM-DD`.
    pub end_date: String,
    /// Exact status (`pending`, `confirmed`, `cancelled`).
    pub status: String,
    /// Email match; exact vs. substring is up to the backend.
    pub email: String,
}

impl BookingFilters {
    /// Whether no field constrains the list.
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Non-empty fields as query pairs, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("startDate", self.start_date.trim()),
            ("endDate", self.end_date.trim()),
            ("status", self.status.trim()),
            ("email", self.email.trim()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }

    /// Percent-encoded `key=value&...` of the non-empty fields.
    pub fn to_query_string(&self) -> String {
        encode_pairs(self.pairs())
    }
}

fn encode_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// One page request of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuery {
    /// 1-based page.
    pub page: usize,
    /// Filters applied to every page.
    pub filters: BookingFilters,
}

impl BookingQuery {
    /// `page`, `limit` and the non-empty filters.
    pub fn to_query_string(&self) -> String {
        let page = self.page.max(1).to_string();
        let limit = PAGE_SIZE.to_string();
        let mut pairs = vec![("page", page.as_str()), ("limit", limit.as_str())];
        pairs.extend(self.filters.pairs());
        encode_pairs(pairs)
    }
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// 1-based page being shown.
    pub current_page: usize,
    /// Page count, at least 1 once normalized.
    pub total_pages: usize,
    /// Matching rows across all pages.
    pub total_count: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
        }
    }
}

impl Pagination {
    /// Floor `total_pages` at 1 and clamp `current_page` into range.
    pub fn normalized(self) -> Self {
        let total_pages = self.total_pages.max(1);
        Self {
            current_page: self.current_page.clamp(1, total_pages),
            total_pages,
            total_count: self.total_count,
        }
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based `(first, last)` row numbers on the current page, `None` when
    /// the list is empty.
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        if self.total_count == 0 {
            return None;
        }
        let first = (self.current_page - 1) * PAGE_SIZE + 1;
        let last = usize::min(self.current_page * PAGE_SIZE, self.total_count);
        Some((first, last))
    }
}

/// `GET /api/admin/bookings` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPage {
    /// Rows of this page.
    #[serde(default)]
    pub bookings: Vec<Booking>,
    /// Where this page sits in the filtered list.
    #[serde(default)]
    pub pagination: Pagination,
}

impl BookingPage {
    /// Same page with normalized pagination.
    pub fn normalized(self) -> Self {
        Self {
            bookings: self.bookings,
            pagination: self.pagination.normalized(),
        }
    }
}

/// A list request issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    /// Request to send.
    pub query: BookingQuery,
}

impl FetchTicket {
    /// Sequence number checked by [`BookingListController::complete`].
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// An optimistic status change awaiting the backend's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Row being changed.
    pub booking_id: String,
    /// Status the row displayed when the change was issued.
    pub previous: BookingStatus,
    /// Requested status.
    pub next: BookingStatus,
    seq: u64,
}

/// How an optimistic change ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSettlement {
    /// Backend accepted the change.
    Confirmed,
    /// Backend refused; the row is back to the last status the backend
    /// acknowledged.
    Reverted(String),
    /// Backend refused, but a newer change for the same row is pending so
    /// the row was left alone.
    Superseded(String),
    /// Token rejected; the row was reverted and the caller must route to
    /// login.
    SessionExpired,
}

impl StatusSettlement {
    /// Whether the stats cards should be refetched. Every settled PATCH
    /// counts except one that lost the session.
    pub fn needs_stats_refresh(&self) -> bool {
        !matches!(self, Self::SessionExpired)
    }
}

/// Dashboard bookings view: filters, current page, stats, and the
/// in-flight bookkeeping around them.
#[derive(Debug, Clone, Default)]
pub struct BookingListController {
    filters: BookingFilters,
    bookings: Vec<Booking>,
    pagination: Pagination,
    stats: DashboardStats,
    state: LoadState,
    seq: RequestSeq,
    row_seq: HashMap<String, u64>,
    next_row_seq: u64,
    /// Last status the backend is known to hold per row, with the sequence
    /// of the change that set it (0 for a loaded page).
    acknowledged: HashMap<String, (u64, BookingStatus)>,
}

impl BookingListController {
    /// Empty controller; nothing is fetched until [`Self::mount`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current filter inputs, applied or not.
    pub fn filters(&self) -> &BookingFilters {
        &self.filters
    }

    /// Edit the filter inputs. Nothing is fetched until [`Self::apply`].
    pub fn filters_mut(&mut self) -> &mut BookingFilters {
        &mut self.filters
    }

    /// Rows of the last applied page.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Pagination of the last applied page.
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Counters for the stats cards.
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    /// Load state of the list.
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a list fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Message of the last failed fetch, if the view is in that state.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Initial dashboard load.
    pub fn mount(&mut self) -> FetchTicket {
        self.issue(1)
    }

    /// Fetch page 1 with the current filter inputs.
    pub fn apply(&mut self) -> FetchTicket {
        self.pagination.current_page = 1;
        self.issue(1)
    }

    /// Reset every filter and fetch page 1 unfiltered.
    pub fn clear(&mut self) -> FetchTicket {
        self.filters = BookingFilters::default();
        self.pagination.current_page = 1;
        self.issue(1)
    }

    /// Fetch another page with the same filters; clamped into
    /// `[1, total_pages]`.
    pub fn go_to_page(&mut self, page: usize) -> FetchTicket {
        let page = page.clamp(1, self.pagination.total_pages.max(1));
        self.issue(page)
    }

    /// Refetch the current page.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue(self.pagination.current_page)
    }

    fn issue(&mut self, page: usize) -> FetchTicket {
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.seq.next(),
            query: BookingQuery {
                page,
                filters: self.filters.clone(),
            },
        }
    }

    /// Hand back the result of a ticket. Rows and pagination are replaced
    /// wholesale on success; on failure the last good rows stay visible.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<BookingPage, ApiError>,
    ) -> FetchOutcome {
        if !self.seq.is_current(ticket.generation) {
            tracing::debug!("dropping stale booking page {}", ticket.query.page);
            return FetchOutcome::Stale;
        }
        match result {
            Ok(page) => {
                let page = page.normalized();
                self.acknowledged = page
                    .bookings
                    .iter()
                    .map(|row| (row.id.clone(), (0, row.status)))
                    .collect();
                self.bookings = page.bookings;
                self.pagination = page.pagination;
                self.state = LoadState::Loaded;
                FetchOutcome::Applied
            },
            Err(err) if err.requires_login() => {
                self.state = LoadState::Idle;
                FetchOutcome::SessionExpired
            },
            Err(err) => {
                let message = format!("Failed to load bookings: {}", err.user_message());
                self.state = LoadState::Failed(message.clone());
                FetchOutcome::Failed(message)
            },
        }
    }

    /// Replace the stats cards.
    pub fn set_stats(&mut self, stats: DashboardStats) {
        self.stats = stats;
    }

    /// Clear a retained fetch error without refetching.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, LoadState::Failed(_)) {
            self.state = LoadState::Loaded;
        }
    }

    /// Apply `status` to a loaded row immediately. Returns `None` when the
    /// row is not on the current page.
    pub fn begin_status_change(
        &mut self,
        booking_id: &str,
        status: BookingStatus,
    ) -> Option<StatusChange> {
        let row = self.bookings.iter_mut().find(|row| row.id == booking_id)?;
        let previous = row.status;
        row.status = status;

        self.next_row_seq += 1;
        let seq = self.next_row_seq;
        self.row_seq.insert(booking_id.to_string(), seq);
        Some(StatusChange {
            booking_id: booking_id.to_string(),
            previous,
            next: status,
            seq,
        })
    }

    /// Settle an optimistic change.
    ///
    /// A success records `next` as the backend's status unless a later
    /// success already did. A failure of the latest change puts the row back
    /// to the last acknowledged status. Older failures leave a row that still
    /// has a newer change in flight alone.
    pub fn settle_status_change(
        &mut self,
        change: &StatusChange,
        result: Result<(), ApiError>,
    ) -> StatusSettlement {
        let latest = self.row_seq.get(&change.booking_id).copied() == Some(change.seq);
        if latest {
            self.row_seq.remove(&change.booking_id);
        }
        let in_flight = self.row_seq.contains_key(&change.booking_id);

        let settlement = match result {
            Ok(()) => {
                let newer_ack = !matches!(
                    self.acknowledged.get(&change.booking_id),
                    Some((seq, _)) if *seq > change.seq
                );
                if newer_ack {
                    self.acknowledged
                        .insert(change.booking_id.clone(), (change.seq, change.next));
                }
                StatusSettlement::Confirmed
            },
            Err(err) if err.requires_login() => StatusSettlement::SessionExpired,
            Err(err) if latest => StatusSettlement::Reverted(err.user_message()),
            Err(err) => StatusSettlement::Superseded(err.user_message()),
        };

        if !in_flight {
            let acknowledged = self
                .acknowledged
                .get(&change.booking_id)
                .map_or(change.previous, |(_, status)| *status);
            if let Some(row) = self.bookings.iter_mut().find(|row| row.id == change.booking_id) {
                row.status = acknowledged;
            }
        }
        settlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConstructionTimeline, PlotOwnership};

    fn booking(id: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            sr_no: 1,
            date: "2026-01-10T09:00:00Z".to_string(),
            name: "Test".to_string(),
            email: format!("{id}@example.com"),
            mobile_number: "9000000000".to_string(),
            construction_timeline: ConstructionTimeline::NotSure,
            own_plot_of_land: PlotOwnership::Yes,
            status,
            email_sent: false,
        }
    }

    fn page(ids: &[&str], current_page: usize, total_pages: usize) -> BookingPage {
        BookingPage {
            bookings: ids
                .iter()
                .map(|id| booking(id, BookingStatus::Pending))
                .collect(),
            pagination: Pagination {
                current_page,
                total_pages,
                total_count: total_pages * PAGE_SIZE,
            },
        }
    }

    fn rejected() -> ApiError {
        ApiError::RequestRejected {
            status: 400,
            message: "Invalid status".to_string(),
            details: Vec::new(),
        }
    }

    #[test]
    fn query_string_has_page_limit_and_only_set_filters() {
        let query = BookingQuery {
            page: 2,
            filters: BookingFilters {
                status: "pending".to_string(),
                email: " a+b@x.com ".to_string(),
                ..BookingFilters::default()
            },
        };
        assert_eq!(query.to_query_string(), "page=2&limit=10&status=pending&email=a%2Bb%40x.com");

        let unfiltered = BookingQuery {
            page: 1,
            filters: BookingFilters::default(),
        };
        assert_eq!(unfiltered.to_query_string(), "page=1&limit=10");
    }

    #[test]
    fn clear_resets_filters_and_page_for_any_filter_combination() {
        let combos = [
            ("", "", "", ""),
            ("2026-01-01", "", "", ""),
            ("", "2026-02-01", "cancelled", ""),
            ("2026-01-01", "2026-02-01", "pending", "ravi"),
        ];
        for (start, end, status, email) in combos {
            let mut controller = BookingListController::new();
            let ticket = controller.mount();
            controller.complete(&ticket, Ok(page(&["a"], 1, 4)));
            *controller.filters_mut() = BookingFilters {
                start_date: start.to_string(),
                end_date: end.to_string(),
                status: status.to_string(),
                email: email.to_string(),
            };
            let ticket = controller.go_to_page(3);
            controller.complete(&ticket, Ok(page(&["b"], 3, 4)));

            let ticket = controller.clear();
            assert_eq!(ticket.query.page, 1);
            assert!(ticket.query.filters.is_empty());
            assert_eq!(ticket.query.to_query_string(), "page=1&limit=10");
            assert!(controller.filters().is_empty());
            assert_eq!(controller.pagination().current_page, 1);
        }
    }

    #[test]
    fn apply_uses_current_inputs_and_first_page() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 5)));
        let ticket = controller.go_to_page(4);
        controller.complete(&ticket, Ok(page(&["d"], 4, 5)));

        controller.filters_mut().status = "confirmed".to_string();
        let ticket = controller.apply();
        assert_eq!(ticket.query.page, 1);
        assert_eq!(ticket.query.filters.status, "confirmed");
        assert!(controller.is_loading());
    }

    #[test]
    fn page_navigation_keeps_filters_and_clamps() {
        let mut controller = BookingListController::new();
        controller.filters_mut().email = "ravi".to_string();
        let ticket = controller.apply();
        controller.complete(&ticket, Ok(page(&["a"], 1, 3)));

        let ticket = controller.go_to_page(9);
        assert_eq!(ticket.query.page, 3);
        assert_eq!(ticket.query.filters.email, "ravi");
        assert_eq!(controller.go_to_page(0).query.page, 1);
    }

    #[test]
    fn has_prev_and_has_next_track_current_page() {
        for total_pages in 1..=6 {
            for current_page in 1..=total_pages {
                let pagination = Pagination {
                    current_page,
                    total_pages,
                    total_count: total_pages * PAGE_SIZE,
                };
                assert_eq!(pagination.has_prev(), current_page > 1);
                assert_eq!(pagination.has_next(), current_page < total_pages);
            }
        }
    }

    #[test]
    fn empty_result_is_loaded_with_one_page() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        let outcome = controller.complete(
            &ticket,
            Ok(BookingPage {
                bookings: Vec::new(),
                pagination: Pagination {
                    current_page: 1,
                    total_pages: 0,
                    total_count: 0,
                },
            }),
        );
        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(controller.state(), &LoadState::Loaded);
        assert_eq!(controller.pagination().total_pages, 1);
        assert_eq!(controller.pagination().showing_range(), None);
    }

    #[test]
    fn showing_range_matches_page_bounds() {
        let pagination = Pagination {
            current_page: 3,
            total_pages: 3,
            total_count: 23,
        };
        assert_eq!(pagination.showing_range(), Some((21, 23)));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut controller = BookingListController::new();
        let slow = controller.mount();
        let fast = controller.go_to_page(2);

        assert_eq!(controller.complete(&fast, Ok(page(&["new"], 2, 2))), FetchOutcome::Applied);
        assert_eq!(controller.complete(&slow, Ok(page(&["old"], 1, 2))), FetchOutcome::Stale);
        assert_eq!(controller.bookings()[0].id, "new");
    }

    #[test]
    fn failure_keeps_last_good_rows() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a", "b"], 1, 1)));

        let ticket = controller.refresh();
        let outcome =
            controller.complete(&ticket, Err(ApiError::Transport("HTTP error: 502".to_string())));
        assert!(matches!(outcome, FetchOutcome::Failed(_)));
        assert_eq!(controller.bookings().len(), 2);
        assert!(controller.error().is_some());

        controller.dismiss_error();
        assert_eq!(controller.error(), None);
    }

    #[test]
    fn auth_failure_reports_session_expired() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        assert_eq!(
            controller.complete(&ticket, Err(ApiError::AuthExpired)),
            FetchOutcome::SessionExpired
        );
    }

    #[test]
    fn status_change_is_optimistic_and_confirmed() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

        let change = controller
            .begin_status_change("a", BookingStatus::Confirmed)
            .expect("row loaded");
        assert_eq!(controller.bookings()[0].status, BookingStatus::Confirmed);
        assert_eq!(change.previous, BookingStatus::Pending);

        assert_eq!(controller.settle_status_change(&change, Ok(())), StatusSettlement::Confirmed);
        assert_eq!(controller.bookings()[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn failed_status_change_reverts_row() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

        let change = controller
            .begin_status_change("a", BookingStatus::Cancelled)
            .expect("row loaded");
        let settled = controller.settle_status_change(&change, Err(rejected()));
        assert_eq!(settled, StatusSettlement::Reverted("Invalid status".to_string()));
        assert_eq!(controller.bookings()[0].status, BookingStatus::Pending);
    }

    #[test]
    fn older_failure_does_not_clobber_newer_change() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

        let first = controller
            .begin_status_change("a", BookingStatus::Confirmed)
            .expect("row loaded");
        let second = controller
            .begin_status_change("a", BookingStatus::Cancelled)
            .expect("row loaded");

        assert!(matches!(
            controller.settle_status_change(&first, Err(rejected())),
            StatusSettlement::Superseded(_)
        ));
        assert_eq!(controller.bookings()[0].status, BookingStatus::Cancelled);
        assert_eq!(controller.settle_status_change(&second, Ok(())), StatusSettlement::Confirmed);
    }

    #[test]
    fn overlapping_failures_restore_backend_status_in_either_order() {
        for newest_first in [false, true] {
            let mut controller = BookingListController::new();
            let ticket = controller.mount();
            controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

            let first = controller
                .begin_status_change("a", BookingStatus::Confirmed)
                .expect("row loaded");
            let second = controller
                .begin_status_change("a", BookingStatus::Cancelled)
                .expect("row loaded");

            let (settled_first, settled_second) = if newest_first {
                let second = controller.settle_status_change(&second, Err(rejected()));
                (controller.settle_status_change(&first, Err(rejected())), second)
            } else {
                let first = controller.settle_status_change(&first, Err(rejected()));
                (first, controller.settle_status_change(&second, Err(rejected())))
            };
            assert!(matches!(settled_first, StatusSettlement::Superseded(_)));
            assert!(matches!(settled_second, StatusSettlement::Reverted(_)));
            assert_eq!(controller.bookings()[0].status, BookingStatus::Pending);
        }
    }

    #[test]
    fn failure_after_accepted_change_reverts_to_accepted_status() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

        let first = controller
            .begin_status_change("a", BookingStatus::Confirmed)
            .expect("row loaded");
        let second = controller
            .begin_status_change("a", BookingStatus::Cancelled)
            .expect("row loaded");
        assert_eq!(controller.settle_status_change(&first, Ok(())), StatusSettlement::Confirmed);
        assert_eq!(controller.bookings()[0].status, BookingStatus::Cancelled);

        controller.settle_status_change(&second, Err(rejected()));
        assert_eq!(controller.bookings()[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn late_success_of_older_change_shows_its_status() {
        let mut controller = BookingListController::new();
        let ticket = controller.mount();
        controller.complete(&ticket, Ok(page(&["a"], 1, 1)));

        let first = controller
            .begin_status_change("a", BookingStatus::Confirmed)
            .expect("row loaded");
        let second = controller
            .begin_status_change("a", BookingStatus::Cancelled)
            .expect("row loaded");
        controller.settle_status_change(&second, Err(rejected()));
        assert_eq!(controller.bookings()[0].status, BookingStatus::Pending);

        assert_eq!(controller.settle_status_change(&first, Ok(())), StatusSettlement::Confirmed);
        assert_eq!(controller.bookings()[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn only_session_loss_skips_stats_refresh() {
        assert!(StatusSettlement::Confirmed.needs_stats_refresh());
        assert!(StatusSettlement::Reverted("no".to_string()).needs_stats_refresh());
        assert!(StatusSettlement::Superseded("no".to_string()).needs_stats_refresh());
        assert!(!StatusSettlement::SessionExpired.needs_stats_refresh());
    }

    #[test]
    fn status_change_on_missing_row_is_ignored() {
        let mut controller = BookingListController::new();
        assert_eq!(controller.begin_status_change("ghost", BookingStatus::Confirmed), None);
    }
}
