//! Integration tests: cli_args.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use visvas_admin::cli::{BookingCommands, Cli, Commands, UserCommands, DEFAULT_API_BASE};
use visvas_shared::models::{BookingStatus, Role};

#[test]
fn global_options_have_defaults() {
    let cli = Cli::try_parse_from(["visvas-admin", "whoami"]).expect("parse");

    assert!(matches!(cli.command, Commands::Whoami));
    // The env fallback may be set on a developer machine.
    if std::env::var_os("VISVAS_API_BASE").is_none() {
        assert_eq!(cli.api_base, DEFAULT_API_BASE);
    }
    if std::env::var_os("VISVAS_SESSION_FILE").is_none() {
        assert_eq!(cli.session_file, PathBuf::from(".visvas/session.json"));
    }
}

#[test]
fn booking_filters_are_typed() {
    let cli = Cli::try_parse_from([
        "visvas-admin",
        "bookings",
        "list",
        "--page",
        "2",
        "--start-date",
        "2026-03-01",
        "--status",
        "confirmed",
        "--email",
        "ravi",
    ])
    .expect("parse");

    let Commands::Bookings {
        command: BookingCommands::List {
            page,
            filters,
        },
    } = cli.command
    else {
        panic!("expected bookings list");
    };
    assert_eq!(page, 2);
    assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2026, 3, 1));
    assert_eq!(filters.status, Some(BookingStatus::Confirmed));

    let filters = filters.to_filters();
    assert_eq!(filters.start_date, "2026-03-01");
    assert_eq!(filters.end_date, "");
    assert_eq!(filters.status, "confirmed");
    assert_eq!(filters.email, "ravi");
}

#[test]
fn unknown_status_is_rejected() {
    let result =
        Cli::try_parse_from(["visvas-admin", "bookings", "set-status", "bk-1", "archived"]);
    assert!(result.is_err());
}

#[test]
fn malformed_date_is_rejected() {
    let result =
        Cli::try_parse_from(["visvas-admin", "bookings", "export", "--end-date", "15/03/2026"]);
    assert!(result.is_err());
}

#[test]
fn user_create_defaults_to_user_role() {
    let cli = Cli::try_parse_from([
        "visvas-admin",
        "users",
        "create",
        "--email",
        "new@visvas.com",
        "--password",
        "Secret@1",
    ])
    .expect("parse");

    let Commands::Users {
        command: UserCommands::Create {
            role, ..
        },
    } = cli.command
    else {
        panic!("expected users create");
    };
    assert_eq!(role, Role::User);
}
