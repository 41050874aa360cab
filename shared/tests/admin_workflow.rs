//! Dashboard flows end to end against the in-memory backend.

use visvas_shared::{
    api::ApiError,
    bookings::{StatusSettlement, PAGE_SIZE},
    fetch::FetchOutcome,
    mock::{MockBackend, MockFailure, SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD, SEED_BOOKINGS},
    models::{BookingStatus, LoginRequest, Role},
    notify::{ConfirmAction, ConfirmationSlot, ToastSlot},
    users::{UserManagementController, UserSubmission},
    ApiClient, BookingListController, MemoryStorage, SessionStore,
};

type Client = ApiClient<MockBackend, MemoryStorage>;

fn client(backend: &MockBackend) -> Client {
    ApiClient::new(
        "http://backend.test",
        backend.clone(),
        SessionStore::new(MemoryStorage::new()),
    )
}

async fn admin_client(backend: &MockBackend) -> Client {
    let client = client(backend);
    client
        .login(&LoginRequest {
            email: SEED_ADMIN_EMAIL.to_string(),
            password: SEED_ADMIN_PASSWORD.to_string(),
        })
        .await
        .expect("admin login");
    client
}

async fn load(client: &Client, controller: &mut BookingListController) {
    let ticket = controller.mount();
    let result = client.fetch_bookings(&ticket.query).await;
    assert_eq!(controller.complete(&ticket, result), FetchOutcome::Applied);
}

#[tokio::test]
async fn invalid_login_is_rejected_and_session_untouched() {
    let backend = MockBackend::seeded();
    let client = client(&backend);

    let err = client
        .login(&LoginRequest {
            email: SEED_ADMIN_EMAIL.to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("bad credentials");

    assert!(matches!(err, ApiError::RequestRejected { status: 401, .. }));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn first_page_and_navigation() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;

    let pagination = controller.pagination();
    assert_eq!(controller.bookings().len(), PAGE_SIZE);
    assert_eq!(pagination.total_count, SEED_BOOKINGS);
    assert_eq!(pagination.total_pages, 3);
    assert!(!pagination.has_prev());
    assert!(pagination.has_next());

    let ticket = controller.go_to_page(3);
    let result = client.fetch_bookings(&ticket.query).await;
    controller.complete(&ticket, result);
    assert_eq!(controller.bookings().len(), 3);
    assert!(controller.pagination().has_prev());
    assert!(!controller.pagination().has_next());
    assert_eq!(controller.pagination().showing_range(), Some((21, 23)));
}

#[tokio::test]
async fn status_filter_returns_only_matching_rows() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;

    controller.filters_mut().status = "pending".to_string();
    let ticket = controller.apply();
    let result = client.fetch_bookings(&ticket.query).await;
    controller.complete(&ticket, result);

    assert!(!controller.bookings().is_empty());
    assert!(controller
        .bookings()
        .iter()
        .all(|booking| booking.status == BookingStatus::Pending));
    assert_eq!(controller.pagination().total_count, 8);
}

#[tokio::test]
async fn clear_resets_filters_and_refetches_unfiltered() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;

    controller.filters_mut().email = "ravi".to_string();
    let ticket = controller.apply();
    let result = client.fetch_bookings(&ticket.query).await;
    controller.complete(&ticket, result);
    assert_eq!(controller.pagination().total_count, 3);

    let ticket = controller.clear();
    assert_eq!(ticket.query.page, 1);
    assert!(ticket.query.filters.is_empty());
    let result = client.fetch_bookings(&ticket.query).await;
    controller.complete(&ticket, result);
    assert_eq!(controller.pagination().total_count, SEED_BOOKINGS);

    let last = backend.requests().pop().expect("a request was sent");
    assert!(last.url.ends_with("/api/admin/bookings?page=1&limit=10"));
}

#[tokio::test]
async fn date_range_filter_is_inclusive() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();

    // Seeded bookings sit on 2026-03-15, 03-12, 03-09, ...
    controller.filters_mut().start_date = "2026-03-09".to_string();
    controller.filters_mut().end_date = "2026-03-15".to_string();
    let ticket = controller.apply();
    let result = client.fetch_bookings(&ticket.query).await;
    controller.complete(&ticket, result);

    let ids: Vec<&str> = controller.bookings().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bk-1", "bk-2", "bk-3"]);
}

#[tokio::test]
async fn status_change_persists_and_stats_stay_consistent() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;
    let before = client.fetch_stats().await.expect("stats");

    // Same status again: no visible change and identical stats.
    let change = controller
        .begin_status_change("bk-1", BookingStatus::Pending)
        .expect("row loaded");
    let result = client.update_booking_status(&change.booking_id, change.next).await;
    assert_eq!(controller.settle_status_change(&change, result), StatusSettlement::Confirmed);
    assert_eq!(client.fetch_stats().await.expect("stats"), before);

    let change = controller
        .begin_status_change("bk-1", BookingStatus::Confirmed)
        .expect("row loaded");
    let result = client.update_booking_status(&change.booking_id, change.next).await;
    assert_eq!(controller.settle_status_change(&change, result), StatusSettlement::Confirmed);
    assert_eq!(backend.booking_status("bk-1"), Some(BookingStatus::Confirmed));

    let after = client.fetch_stats().await.expect("stats");
    assert_eq!(after.pending_bookings, before.pending_bookings - 1);
    assert_eq!(after.confirmed_bookings, before.confirmed_bookings + 1);
    assert_eq!(after.total_bookings, before.total_bookings);
}

#[tokio::test]
async fn failed_status_change_reverts_row() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;

    let change = controller
        .begin_status_change("bk-1", BookingStatus::Cancelled)
        .expect("row loaded");
    assert_eq!(controller.bookings()[0].status, BookingStatus::Cancelled);

    backend.fail_next(MockFailure::Status(500));
    let result = client.update_booking_status(&change.booking_id, change.next).await;
    let settlement = controller.settle_status_change(&change, result);

    assert!(matches!(settlement, StatusSettlement::Reverted(_)));
    assert_eq!(controller.bookings()[0].status, BookingStatus::Pending);
    assert_eq!(backend.booking_status("bk-1"), Some(BookingStatus::Pending));
}

#[tokio::test]
async fn export_uses_full_filter_set_without_paging() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    controller.filters_mut().status = "cancelled".to_string();

    let bytes = client
        .export_bookings(controller.filters())
        .await
        .expect("export");
    let sheet = String::from_utf8(bytes).expect("utf-8 sheet");
    // Header plus every cancelled booking, not just one page.
    assert_eq!(sheet.lines().count(), 1 + 7);

    let request = backend.requests().pop().expect("export request");
    assert!(request.url.ends_with("/api/admin/bookings/export?status=cancelled"));
    assert!(!request.url.contains("page="));
}

#[tokio::test]
async fn create_user_appends_without_exposing_password() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut users = UserManagementController::new();
    let generation = users.begin_load();
    let result = client.fetch_users().await;
    users.finish_load(generation, result);
    let initial = users.users().len();

    users.form_mut().email = "site.engineer@visvas.com".to_string();
    users.form_mut().password = "Site@2026".to_string();
    let UserSubmission::Create(payload) = users.submission().expect("valid form") else {
        panic!("expected a create submission");
    };
    let created = client.create_user(&payload).await.expect("create user");
    users.apply_created(created);

    assert_eq!(users.users().len(), initial + 1);
    let added = users
        .users()
        .iter()
        .find(|user| user.email == "site.engineer@visvas.com")
        .expect("new user listed");
    assert_eq!(added.role, Role::User);

    let listed = client.fetch_users().await.expect("list users");
    let encoded = serde_json::to_string(&listed).expect("encode users");
    assert!(!encoded.contains("Site@2026"));
}

#[tokio::test]
async fn editing_with_blank_password_keeps_current_one() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut users = UserManagementController::new();
    let generation = users.begin_load();
    let result = client.fetch_users().await;
    users.finish_load(generation, result);

    let target = users
        .users()
        .iter()
        .find(|user| user.role == Role::User)
        .cloned()
        .expect("seeded user");
    let original_password = backend.password_of(&target.email);
    users.start_edit(&target);
    users.form_mut().role = Role::Admin;

    let UserSubmission::Update { id, payload } = users.submission().expect("valid form") else {
        panic!("expected an update submission");
    };
    let updated = client.update_user(&id, &payload).await.expect("update user");
    users.apply_updated(updated);

    assert_eq!(backend.password_of(&target.email), original_password);
    let row = users
        .users()
        .iter()
        .find(|user| user.id == target.id)
        .expect("row kept");
    assert_eq!(row.role, Role::Admin);
}

#[tokio::test]
async fn delete_goes_through_confirmation() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut users = UserManagementController::new();
    let generation = users.begin_load();
    let result = client.fetch_users().await;
    users.finish_load(generation, result);
    let target = users
        .users()
        .iter()
        .find(|user| user.role == Role::User)
        .map(|user| user.id.clone())
        .expect("seeded user");

    let mut confirmations = ConfirmationSlot::default();
    let mut toasts = ToastSlot::default();
    confirmations.open(users.delete_confirmation(&target));

    let Some(ConfirmAction::DeleteUser { id }) = confirmations.begin_confirm() else {
        panic!("confirmation should yield the delete action");
    };
    assert!(!confirmations.cancel());
    match client.delete_user(&id).await {
        Ok(()) => {
            users.apply_deleted(&id);
            toasts.success("User deleted successfully");
        },
        Err(err) => {
            toasts.error(err.user_message());
        },
    }
    confirmations.finish();

    assert!(!confirmations.is_open());
    assert!(users.users().iter().all(|user| user.id != target));
    assert_eq!(
        toasts.current().map(|toast| toast.message.as_str()),
        Some("User deleted successfully")
    );
}

#[tokio::test]
async fn expired_token_on_users_clears_session() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    backend.revoke_tokens();

    let mut users = UserManagementController::new();
    let generation = users.begin_load();
    let result = client.fetch_users().await;

    assert_eq!(users.finish_load(generation, result), FetchOutcome::SessionExpired);
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn network_failure_keeps_last_rows_visible() {
    let backend = MockBackend::seeded();
    let client = admin_client(&backend).await;
    let mut controller = BookingListController::new();
    load(&client, &mut controller).await;

    backend.fail_next(MockFailure::Network);
    let ticket = controller.go_to_page(2);
    let result = client.fetch_bookings(&ticket.query).await;
    let outcome = controller.complete(&ticket, result);

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(controller.bookings().len(), PAGE_SIZE);
    assert_eq!(controller.bookings()[0].id, "bk-1");
    assert!(controller.error().is_some());
}
