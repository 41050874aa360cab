//! Platform-neutral core of the Visvas admin site.
//!
//! Holds the data model, the persistent session, the HTTP client (behind a
//! [`api::Transport`] seam so the wasm frontend, the CLI and tests each plug
//! in their own network), and the sans-IO controllers that drive the admin
//! dashboard: booking list and status changes, user management, toasts and
//! confirmations. Nothing here depends on a browser or a runtime.

pub mod api;
pub mod bookings;
pub mod export;
pub mod fetch;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod models;
pub mod notify;
pub mod session;
pub mod users;
pub mod validation;

pub use api::{Access, ApiClient, ApiError, Method, RawResponse, Transport};
pub use bookings::{BookingFilters, BookingListController, BookingPage, Pagination, PAGE_SIZE};
pub use models::{Booking, BookingStatus, DashboardStats, ManagedUser, Role, SessionUser};
pub use session::{KeyValueStorage, Landing, MemoryStorage, SessionStore};
