//! Wire-level data model shared by the frontend and the admin CLI.
//!
//! Field names follow the backend's JSON (camelCase, `_id` for managed
//! users), so every type here round-trips through the HTTP contract without
//! hand-written mapping.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Account role carried by sessions and managed users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access to the admin dashboard.
    Admin,
    /// Regular account, lands on the welcome page.
    #[default]
    User,
}

impl Role {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

/// Parse failure for one of the closed enumerations in this module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Profile stored next to the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account id.
    #[serde(alias = "_id")]
    pub id: String,
    /// Login email.
    pub email: String,
    /// Decides the landing page.
    pub role: Role,
}

/// Booking lifecycle status. Any status may move to any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting follow-up. New bookings start here.
    #[default]
    Pending,
    /// Meeting agreed.
    Confirmed,
    /// Called off.
    Cancelled,
}

impl BookingStatus {
    /// All statuses in display order.
    pub const ALL: [BookingStatus; 3] =
        [BookingStatus::Pending, BookingStatus::Confirmed, BookingStatus::Cancelled];

    /// Wire representation, also used as the `status` filter value.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Capitalized label for select options.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            _ => Err(UnknownVariant::new("booking status", s)),
        }
    }
}

/// When the prospect expects to start building.
///
/// Values the booking form does not offer are kept verbatim in `Other` so a
/// backend-side addition never breaks the bookings table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConstructionTimeline {
    /// "0-3 months"
    WithinThreeMonths,
    /// "3-6 months"
    ThreeToSixMonths,
    /// "more than 6 months"
    MoreThanSixMonths,
    /// "Not sure"
    NotSure,
    /// Any other value, verbatim.
    Other(String),
}

impl ConstructionTimeline {
    /// Options offered by the booking form, in display order.
    pub const OPTIONS: [ConstructionTimeline; 4] = [
        ConstructionTimeline::WithinThreeMonths,
        ConstructionTimeline::ThreeToSixMonths,
        ConstructionTimeline::MoreThanSixMonths,
        ConstructionTimeline::NotSure,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            ConstructionTimeline::WithinThreeMonths => "0-3 months",
            ConstructionTimeline::ThreeToSixMonths => "3-6 months",
            ConstructionTimeline::MoreThanSixMonths => "more than 6 months",
            ConstructionTimeline::NotSure => "Not sure",
            ConstructionTimeline::Other(raw) => raw,
        }
    }
}

impl From<String> for ConstructionTimeline {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "0-3 months" => ConstructionTimeline::WithinThreeMonths,
            "3-6 months" => ConstructionTimeline::ThreeToSixMonths,
            "more than 6 months" => ConstructionTimeline::MoreThanSixMonths,
            "Not sure" => ConstructionTimeline::NotSure,
            _ => ConstructionTimeline::Other(raw),
        }
    }
}

impl From<ConstructionTimeline> for String {
    fn from(value: ConstructionTimeline) -> Self {
        match value {
            ConstructionTimeline::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConstructionTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the prospect already owns a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotOwnership {
    /// Owns a plot.
    Yes,
    /// Does not own a plot yet.
    No,
}

impl PlotOwnership {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotOwnership::Yes => "Yes",
            PlotOwnership::No => "No",
        }
    }
}

impl fmt::Display for PlotOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlotOwnership {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(PlotOwnership::Yes),
            "no" => Ok(PlotOwnership::No),
            _ => Err(UnknownVariant::new("plot ownership", s)),
        }
    }
}

/// One consultation request as listed in the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Backend id, used in status updates.
    pub id: String,
    /// Serial number shown in the first column.
    #[serde(default)]
    pub sr_no: u64,
    /// Submission timestamp as sent by the backend (RFC 3339).
    pub date: String,
    /// Prospect's full name.
    pub name: String,
    /// Prospect's email.
    pub email: String,
    /// Digits only.
    pub mobile_number: String,
    /// Planned start of construction.
    pub construction_timeline: ConstructionTimeline,
    /// Whether the prospect owns a plot.
    pub own_plot_of_land: PlotOwnership,
    /// Lifecycle status, editable from the dashboard.
    pub status: BookingStatus,
    /// Whether the confirmation email went out.
    #[serde(default)]
    pub email_sent: bool,
}

/// Aggregate counters computed by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    /// Every booking.
    pub total_bookings: u64,
    /// Bookings with status `pending`.
    pub pending_bookings: u64,
    /// Bookings with status `confirmed`.
    pub confirmed_bookings: u64,
    /// Bookings with status `cancelled`.
    pub cancelled_bookings: u64,
    /// Bookings submitted in the last 30 days.
    pub recent_bookings: u64,
}

/// Account administrable from the user-management tab. The password is
/// write-only and deliberately has no field here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    /// Account id.
    #[serde(rename = "_id")]
    pub id: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Last successful login (RFC 3339), if any.
    #[serde(default)]
    pub last_login: Option<String>,
    /// Inactive accounts cannot sign in.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ManagedUser {
    /// `lastLogin` as a calendar day, or "Never".
    pub fn last_login_label(&self) -> String {
        self.last_login
            .as_deref()
            .map(display_day)
            .unwrap_or_else(|| "Never".to_string())
    }
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Plain password.
    pub password: String,
}

/// `POST /api/auth/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// New account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
}

/// Successful login/registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for later requests.
    pub token: String,
    /// Signed-in profile.
    pub user: SessionUser,
    /// Greeting to show, if the backend sent one.
    #[serde(default)]
    pub message: Option<String>,
    /// Path the backend suggests landing on.
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// `POST /api/booking/create` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    /// Prospect's full name.
    pub name: String,
    /// Prospect's email.
    pub email: String,
    /// Digits only.
    pub mobile_number: String,
    /// Planned start of construction.
    pub construction_timeline: ConstructionTimeline,
    /// Whether the prospect owns a plot.
    pub own_plot_of_land: PlotOwnership,
}

/// Create/update body for managed users. On update an empty password means
/// "keep the current one"; the field is still sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    /// Login email.
    pub email: String,
    /// New password; empty on update keeps the old one.
    pub password: String,
    /// Account role.
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StatusUpdate {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub stats: DashboardStats,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersEnvelope {
    pub users: Vec<ManagedUser>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: ManagedUser,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

/// Render an RFC 3339 timestamp as `YYYY-MM-DD`, falling back to the raw
/// value when it does not parse.
pub fn display_day(raw: &str) -> String {
    day_of(raw)
        .map(|day| day.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Calendar day of an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
pub fn day_of(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_deserializes_from_backend_shape() {
        let raw = r#"{
            "id": "b1",
            "srNo": 3,
            "date": "2026-03-02T10:15:00.000Z",
            "name": "Ravi",
            "email": "ravi@example.com",
            "mobileNumber": "9876543210",
            "constructionTimeline": "3-6 months",
            "ownPlotOfLand": "Yes",
            "status": "confirmed",
            "emailSent": true
        }"#;
        let booking: Booking = serde_json::from_str(raw).expect("parse booking");
        assert_eq!(booking.sr_no, 3);
        assert_eq!(booking.construction_timeline, ConstructionTimeline::ThreeToSixMonths);
        assert_eq!(booking.own_plot_of_land, PlotOwnership::Yes);
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert!(booking.email_sent);
    }

    #[test]
    fn unknown_timeline_is_preserved() {
        let timeline: ConstructionTimeline =
            serde_json::from_str("\"next year\"").expect("parse timeline");
        assert_eq!(timeline, ConstructionTimeline::Other("next year".to_string()));
        assert_eq!(serde_json::to_string(&timeline).expect("encode"), "\"next year\"");
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<BookingStatus>("\"archived\"").is_err());
        assert!("archived".parse::<BookingStatus>().is_err());
        assert_eq!(" Pending ".parse::<BookingStatus>(), Ok(BookingStatus::Pending));
    }

    #[test]
    fn managed_user_never_carries_a_password() {
        let raw = r#"{"_id":"u1","email":"a@x.com","role":"user","password":"Secret1!"}"#;
        let user: ManagedUser = serde_json::from_str(raw).expect("parse user");
        assert!(user.is_active);
        assert_eq!(user.last_login_label(), "Never");
        let encoded = serde_json::to_string(&user).expect("encode user");
        assert!(!encoded.contains("Secret1!"));
        assert!(!encoded.contains("password"));
    }

    #[test]
    fn session_user_accepts_mongo_style_id() {
        let user: SessionUser =
            serde_json::from_str(r#"{"_id":"u9","email":"a@x.com","role":"admin"}"#)
                .expect("parse session user");
        assert_eq!(user.id, "u9");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn display_day_handles_timestamps_and_garbage() {
        assert_eq!(display_day("2026-01-05T23:10:00+00:00"), "2026-01-05");
        assert_eq!(display_day("2026-01-05"), "2026-01-05");
        assert_eq!(display_day("yesterday"), "yesterday");
    }
}
