//! In-memory stand-in for the Visvas backend.
//!
//! Implements every endpoint the client consumes, with the same status codes
//! and JSON shapes, so controllers and the API client can be exercised
//! without a server. The frontend's `mock` feature runs against it too.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::{ApiRequest, Method, RawResponse, Transport, TransportFailure},
    models::{
        day_of, Booking, BookingStatus, ConstructionTimeline, DashboardStats, LoginRequest,
        ManagedUser, NewBooking, PlotOwnership, RegisterRequest, Role, SessionUser, UserPayload,
    },
};

/// Email of the seeded administrator.
pub const SEED_ADMIN_EMAIL: &str = "admin@visvas.com";
/// Password of the seeded administrator.
pub const SEED_ADMIN_PASSWORD: &str = "Admin@123";
/// Email of the seeded non-admin account.
pub const SEED_USER_EMAIL: &str = "user@visvas.com";
/// Password of the seeded non-admin account.
pub const SEED_USER_PASSWORD: &str = "User@123";
/// Number of seeded bookings.
pub const SEED_BOOKINGS: usize = 23;

const SEED_NAMES: [&str; 8] = [
    "Ravi Kumar",
    "Asha Nair",
    "Vikram Shetty",
    "Meera Iyer",
    "Arjun Rao",
    "Kavya Menon",
    "Rohan Patil",
    "Divya Reddy",
];

/// One-shot failure injected in front of the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Answer with this status and a generic error body.
    Status(u16),
    /// Fail without producing a response.
    Network,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: String,
    email: String,
    password: String,
    role: Role,
    last_login: Option<String>,
    is_active: bool,
}

impl MockUser {
    fn public(&self) -> ManagedUser {
        ManagedUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
            last_login: self.last_login.clone(),
            is_active: self.is_active,
        }
    }

    fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug)]
struct State {
    users: Vec<MockUser>,
    /// Newest first.
    bookings: Vec<Booking>,
    tokens: HashMap<String, String>,
    requests: Vec<ApiRequest>,
    failure: Option<MockFailure>,
    today: NaiveDate,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Shared-state fake backend. Clones observe the same data.
#[derive(Debug, Clone)]
pub struct MockBackend {
    state: Rc<RefCell<State>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn default_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap_or_default()
}

fn timestamp(day: NaiveDate, time: &str) -> String {
    format!("{}T{time}.000Z", day.format("%Y-%m-%d"))
}

impl MockBackend {
    /// Backend with no users and no bookings.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                users: Vec::new(),
                bookings: Vec::new(),
                tokens: HashMap::new(),
                requests: Vec::new(),
                failure: None,
                today: default_today(),
                next_id: 0,
            })),
        }
    }

    /// Backend with an admin, a regular user and [`SEED_BOOKINGS`] bookings
    /// `bk-1` (newest, dated 2026-03-15) to `bk-23`, three days apart.
    pub fn seeded() -> Self {
        Self::seeded_on(default_today())
    }

    /// Same as [`Self::seeded`] with `bk-1` dated `today`.
    pub fn seeded_on(today: NaiveDate) -> Self {
        let backend = Self::new()
            .with_user(SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD, Role::Admin)
            .with_user(SEED_USER_EMAIL, SEED_USER_PASSWORD, Role::User);
        {
            let mut state = backend.state.borrow_mut();
            state.today = today;
            state.bookings = (1..=SEED_BOOKINGS)
                .map(|n| seed_booking(n, today))
                .collect();
        }
        backend
    }

    /// Add an account.
    pub fn with_user(self, email: &str, password: &str, role: Role) -> Self {
        {
            let mut state = self.state.borrow_mut();
            let id = state.next_id("u");
            state.users.push(MockUser {
                id,
                email: email.to_string(),
                password: password.to_string(),
                role,
                last_login: None,
                is_active: true,
            });
        }
        self
    }

    /// Move "today", which drives new booking dates and the 30-day count.
    pub fn set_today(&self, today: NaiveDate) {
        self.state.borrow_mut().today = today;
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    /// Make the next request fail.
    pub fn fail_next(&self, failure: MockFailure) {
        self.state.borrow_mut().failure = Some(failure);
    }

    /// Invalidate every issued token.
    pub fn revoke_tokens(&self) {
        self.state.borrow_mut().tokens.clear();
    }

    /// Stored status of one booking.
    pub fn booking_status(&self, id: &str) -> Option<BookingStatus> {
        self.state
            .borrow()
            .bookings
            .iter()
            .find(|booking| booking.id == id)
            .map(|booking| booking.status)
    }

    /// Number of stored bookings.
    pub fn booking_count(&self) -> usize {
        self.state.borrow().bookings.len()
    }

    /// Stored password of an account, for asserting update semantics.
    pub fn password_of(&self, email: &str) -> Option<String> {
        self.state
            .borrow()
            .users
            .iter()
            .find(|user| user.email == email)
            .map(|user| user.password.clone())
    }

    fn route(&self, request: &ApiRequest) -> RawResponse {
        let (path, query) = split_url(&request.url);
        let segments: Vec<String> = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                urlencoding::decode(segment)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| segment.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        let query = parse_query(query);
        let body = request.body.as_deref().unwrap_or("");

        let mut state = self.state.borrow_mut();
        match (request.method, segments.as_slice()) {
            (Method::Post, ["api", "auth", "login"]) => login(&mut state, body),
            (Method::Post, ["api", "auth", "register"]) => register(&mut state, body),
            (Method::Post, ["api", "booking", "create"]) => create_booking(&mut state, body),
            (_, ["api", "admin", rest @ ..]) => {
                if let Err(denied) = authorize(&state, request) {
                    return denied;
                }
                match (request.method, rest) {
                    (Method::Get, ["bookings"]) => list_bookings(&state, &query),
                    (Method::Get, ["bookings", "export"]) => export_bookings(&state, &query),
                    (Method::Patch, ["bookings", id, "status"]) => {
                        update_status(&mut state, id, body)
                    },
                    (Method::Get, ["dashboard", "stats"]) => stats(&state),
                    (Method::Get, ["users"]) => list_users(&state),
                    (Method::Post, ["users"]) => create_user(&mut state, body),
                    (Method::Put, ["users", id]) => update_user(&mut state, id, body),
                    (Method::Delete, ["users", id]) => delete_user(&mut state, id, request),
                    _ => not_found(),
                }
            },
            _ => not_found(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for MockBackend {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportFailure> {
        let failure = {
            let mut state = self.state.borrow_mut();
            state.requests.push(request.clone());
            state.failure.take()
        };
        match failure {
            Some(MockFailure::Network) => {
                Err(TransportFailure("connection refused".to_string()))
            },
            Some(MockFailure::Status(status)) => {
                Ok(error(status, "Injected failure"))
            },
            None => Ok(self.route(&request)),
        }
    }
}

fn seed_booking(n: usize, today: NaiveDate) -> Booking {
    let name = SEED_NAMES[(n - 1) % SEED_NAMES.len()];
    let first = name.split(' ').next().unwrap_or(name).to_ascii_lowercase();
    let day = today - Duration::days(3 * (n as i64 - 1));
    let status = match n % 3 {
        1 => BookingStatus::Pending,
        2 => BookingStatus::Confirmed,
        _ => BookingStatus::Cancelled,
    };
    Booking {
        id: format!("bk-{n}"),
        sr_no: (SEED_BOOKINGS + 1 - n) as u64,
        date: timestamp(day, "10:30:00"),
        name: name.to_string(),
        email: format!("{first}{n}@example.com"),
        mobile_number: format!("98{:08}", 45_000_000 + n),
        construction_timeline: ConstructionTimeline::OPTIONS[n % ConstructionTimeline::OPTIONS.len()]
            .clone(),
        own_plot_of_land: if n % 2 == 0 {
            PlotOwnership::No
        } else {
            PlotOwnership::Yes
        },
        status,
        email_sent: status != BookingStatus::Pending,
    }
}

fn split_url(url: &str) -> (&str, &str) {
    let start = url.find("/api/").unwrap_or(0);
    let rest = &url[start..];
    rest.split_once('?').unwrap_or((rest, ""))
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(key).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " "))
                .ok()?
                .into_owned();
            Some((key, value))
        })
        .collect()
}

fn ok(status: u16, body: Value) -> RawResponse {
    RawResponse::json(status, &body)
}

fn error(status: u16, message: &str) -> RawResponse {
    ok(status, json!({ "error": message }))
}

fn validation_failed(messages: &[&str]) -> RawResponse {
    let details: Vec<Value> = messages.iter().map(|msg| json!({ "msg": msg })).collect();
    ok(400, json!({ "error": "Validation failed", "details": details }))
}

fn not_found() -> RawResponse {
    error(404, "Route not found")
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, RawResponse> {
    serde_json::from_str(body).map_err(|_| error(400, "Invalid request body"))
}

fn authorize(state: &State, request: &ApiRequest) -> Result<(), RawResponse> {
    let token = request
        .header("authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| error(401, "Access denied. No token provided."))?;
    let user = state
        .tokens
        .get(token)
        .and_then(|id| state.users.iter().find(|user| &user.id == id))
        .ok_or_else(|| error(401, "Invalid token"))?;
    if user.role != Role::Admin {
        return Err(error(403, "Access denied. Admin only."));
    }
    Ok(())
}

fn issue_token(state: &mut State, user_id: &str) -> String {
    let token = state.next_id("mock-token");
    state.tokens.insert(token.clone(), user_id.to_string());
    token
}

fn redirect_for(role: Role) -> Value {
    match role {
        Role::Admin => Value::Null,
        Role::User => json!("/welcome"),
    }
}

fn login(state: &mut State, body: &str) -> RawResponse {
    let credentials: LoginRequest = match parse_body(body) {
        Ok(credentials) => credentials,
        Err(response) => return response,
    };
    let today = state.today;
    let Some(user) = state
        .users
        .iter_mut()
        .find(|user| user.email.eq_ignore_ascii_case(&credentials.email))
        .filter(|user| user.password == credentials.password && user.is_active)
    else {
        return error(401, "Invalid credentials");
    };
    user.last_login = Some(timestamp(today, "09:00:00"));
    let user = user.clone();
    let token = issue_token(state, &user.id);
    ok(
        200,
        json!({
            "message": "Login successful",
            "token": token,
            "user": user.session(),
            "redirectTo": redirect_for(user.role),
        }),
    )
}

fn register(state: &mut State, body: &str) -> RawResponse {
    let request: RegisterRequest = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if request.password != request.confirm_password {
        return validation_failed(&["Passwords do not match"]);
    }
    if state
        .users
        .iter()
        .any(|user| user.email.eq_ignore_ascii_case(&request.email))
    {
        return error(400, "User already exists with this email");
    }
    let user = MockUser {
        id: state.next_id("u"),
        email: request.email,
        password: request.password,
        role: Role::User,
        last_login: None,
        is_active: true,
    };
    state.users.push(user.clone());
    let token = issue_token(state, &user.id);
    ok(
        201,
        json!({
            "message": "Registration successful",
            "token": token,
            "user": user.session(),
            "redirectTo": redirect_for(user.role),
        }),
    )
}

fn create_booking(state: &mut State, body: &str) -> RawResponse {
    let booking: NewBooking = match parse_body(body) {
        Ok(booking) => booking,
        Err(response) => return response,
    };
    let mut missing = Vec::new();
    if booking.name.trim().is_empty() {
        missing.push("Name is required");
    }
    if !booking.email.contains('@') {
        missing.push("Valid email is required");
    }
    if booking.mobile_number.is_empty() {
        missing.push("Mobile number is required");
    }
    if !missing.is_empty() {
        return validation_failed(&missing);
    }

    let sr_no = state.bookings.iter().map(|b| b.sr_no).max().unwrap_or(0) + 1;
    let id = format!("bk-{}", state.bookings.len() + 1);
    let date = timestamp(state.today, "12:00:00");
    state.bookings.insert(0, Booking {
        id,
        sr_no,
        date,
        name: booking.name,
        email: booking.email,
        mobile_number: booking.mobile_number,
        construction_timeline: booking.construction_timeline,
        own_plot_of_land: booking.own_plot_of_land,
        status: BookingStatus::Pending,
        email_sent: false,
    });
    ok(
        201,
        json!({ "message": "Your meeting request has been received. We will contact you soon." }),
    )
}

fn matches_filters(booking: &Booking, query: &HashMap<String, String>) -> bool {
    let param = |key: &str| query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());
    let day = day_of(&booking.date);
    let bound = |key: &str| param(key).and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());

    if let (Some(start), Some(day)) = (bound("startDate"), day) {
        if day < start {
            return false;
        }
    }
    if let (Some(end), Some(day)) = (bound("endDate"), day) {
        if day > end {
            return false;
        }
    }
    if let Some(status) = param("status") {
        if booking.status.as_str() != status {
            return false;
        }
    }
    if let Some(email) = param("email") {
        if !booking
            .email
            .to_ascii_lowercase()
            .contains(&email.to_ascii_lowercase())
        {
            return false;
        }
    }
    true
}

fn filtered<'a>(state: &'a State, query: &HashMap<String, String>) -> Vec<&'a Booking> {
    state
        .bookings
        .iter()
        .filter(|booking| matches_filters(booking, query))
        .collect()
}

fn list_bookings(state: &State, query: &HashMap<String, String>) -> RawResponse {
    let number = |key: &str, default: usize| {
        query
            .get(key)
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(default)
    };
    let page = number("page", 1);
    let limit = number("limit", 10);
    let rows = filtered(state, query);
    let total_count = rows.len();
    let total_pages = total_count.div_ceil(limit);
    let bookings: Vec<&Booking> = rows.into_iter().skip((page - 1) * limit).take(limit).collect();
    ok(
        200,
        json!({
            "bookings": bookings,
            "pagination": {
                "currentPage": page,
                "totalPages": total_pages,
                "totalCount": total_count,
            },
        }),
    )
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn export_bookings(state: &State, query: &HashMap<String, String>) -> RawResponse {
    let mut sheet = String::from(
        "Sr No,Date,Name,Email,Mobile Number,Construction Timeline,Own Plot,Status,Email Sent\n",
    );
    for booking in filtered(state, query) {
        let row = [
            booking.sr_no.to_string(),
            crate::models::display_day(&booking.date),
            booking.name.clone(),
            booking.email.clone(),
            booking.mobile_number.clone(),
            booking.construction_timeline.to_string(),
            booking.own_plot_of_land.to_string(),
            booking.status.to_string(),
            if booking.email_sent { "Yes" } else { "No" }.to_string(),
        ];
        let row: Vec<String> = row.iter().map(|field| csv_field(field)).collect();
        sheet.push_str(&row.join(","));
        sheet.push('\n');
    }
    RawResponse::new(200, sheet)
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

fn update_status(state: &mut State, id: &str, body: &str) -> RawResponse {
    let body: StatusBody = match parse_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let Ok(status) = body.status.parse::<BookingStatus>() else {
        return validation_failed(&["Invalid status value"]);
    };
    let Some(booking) = state.bookings.iter_mut().find(|booking| booking.id == id) else {
        return error(404, "Booking not found");
    };
    booking.status = status;
    ok(
        200,
        json!({ "message": "Booking status updated successfully", "booking": booking }),
    )
}

fn stats(state: &State) -> RawResponse {
    let count = |status: BookingStatus| {
        state
            .bookings
            .iter()
            .filter(|booking| booking.status == status)
            .count() as u64
    };
    let since = state.today - Duration::days(30);
    let recent = state
        .bookings
        .iter()
        .filter(|booking| day_of(&booking.date).is_some_and(|day| day >= since))
        .count() as u64;
    let stats = DashboardStats {
        total_bookings: state.bookings.len() as u64,
        pending_bookings: count(BookingStatus::Pending),
        confirmed_bookings: count(BookingStatus::Confirmed),
        cancelled_bookings: count(BookingStatus::Cancelled),
        recent_bookings: recent,
    };
    ok(200, json!({ "stats": stats }))
}

fn list_users(state: &State) -> RawResponse {
    let users: Vec<ManagedUser> = state.users.iter().map(MockUser::public).collect();
    ok(200, json!({ "users": users }))
}

fn create_user(state: &mut State, body: &str) -> RawResponse {
    let payload: UserPayload = match parse_body(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return validation_failed(&["Email and password are required"]);
    }
    if state
        .users
        .iter()
        .any(|user| user.email.eq_ignore_ascii_case(&payload.email))
    {
        return error(400, "User already exists with this email");
    }
    let user = MockUser {
        id: state.next_id("u"),
        email: payload.email,
        password: payload.password,
        role: payload.role,
        last_login: None,
        is_active: true,
    };
    state.users.push(user.clone());
    ok(201, json!({ "message": "User created successfully", "user": user.public() }))
}

fn update_user(state: &mut State, id: &str, body: &str) -> RawResponse {
    let payload: UserPayload = match parse_body(body) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    if payload.email.trim().is_empty() {
        return validation_failed(&["Email is required"]);
    }
    if state
        .users
        .iter()
        .any(|user| user.id != id && user.email.eq_ignore_ascii_case(&payload.email))
    {
        return error(400, "Email is already in use");
    }
    let Some(user) = state.users.iter_mut().find(|user| user.id == id) else {
        return error(404, "User not found");
    };
    user.email = payload.email;
    user.role = payload.role;
    if !payload.password.is_empty() {
        user.password = payload.password;
    }
    ok(200, json!({ "message": "User updated successfully", "user": user.public() }))
}

fn delete_user(state: &mut State, id: &str, request: &ApiRequest) -> RawResponse {
    let caller = request
        .header("authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|token| state.tokens.get(token));
    if caller.is_some_and(|caller| caller == id) {
        return error(400, "You cannot delete your own account");
    }
    let before = state.users.len();
    state.users.retain(|user| user.id != id);
    if state.users.len() == before {
        return error(404, "User not found");
    }
    state.tokens.retain(|_, owner| owner.as_str() != id);
    ok(200, json!({ "message": "User deleted successfully" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str, token: Option<&str>) -> ApiRequest {
        ApiRequest {
            method: Method::Get,
            url: url.to_string(),
            headers: token
                .map(|token| vec![("Authorization".to_string(), format!("Bearer {token}"))])
                .unwrap_or_default(),
            body: None,
        }
    }

    fn admin_token(backend: &MockBackend) -> String {
        let response = backend.route(&ApiRequest {
            method: Method::Post,
            url: "http://mock/api/auth/login".to_string(),
            headers: Vec::new(),
            body: Some(format!(
                r#"{{"email":"{SEED_ADMIN_EMAIL}","password":"{SEED_ADMIN_PASSWORD}"}}"#
            )),
        });
        let body: Value = serde_json::from_slice(&response.body).expect("login json");
        body["token"].as_str().expect("token").to_string()
    }

    #[test]
    fn seeded_stats_are_consistent() {
        let backend = MockBackend::seeded();
        let token = admin_token(&backend);
        let response = backend.route(&get("http://mock/api/admin/dashboard/stats", Some(&token)));
        let body: Value = serde_json::from_slice(&response.body).expect("stats json");
        assert_eq!(body["stats"]["totalBookings"], 23);
        assert_eq!(body["stats"]["pendingBookings"], 8);
        assert_eq!(body["stats"]["confirmedBookings"], 8);
        assert_eq!(body["stats"]["cancelledBookings"], 7);
        assert_eq!(body["stats"]["recentBookings"], 11);
    }

    #[test]
    fn admin_routes_require_admin_token() {
        let backend = MockBackend::seeded();
        assert_eq!(backend.route(&get("http://mock/api/admin/users", None)).status, 401);
        assert_eq!(
            backend
                .route(&get("http://mock/api/admin/users", Some("bogus")))
                .status,
            401
        );
    }

    #[test]
    fn email_filter_is_case_insensitive_substring() {
        let backend = MockBackend::seeded();
        let token = admin_token(&backend);
        let response = backend.route(&get(
            "http://mock/api/admin/bookings?page=1&limit=10&email=RAVI",
            Some(&token),
        ));
        let body: Value = serde_json::from_slice(&response.body).expect("list json");
        assert_eq!(body["pagination"]["totalCount"], 3);
    }

    #[test]
    fn query_parsing_decodes_percent_escapes() {
        let query = parse_query("email=a%2Bb%40x.com&status=pending");
        assert_eq!(query.get("email").map(String::as_str), Some("a+b@x.com"));
        assert_eq!(query.get("status").map(String::as_str), Some("pending"));
    }

    #[test]
    fn csv_fields_are_quoted_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
