//! Command-line surface of `visvas-admin`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use visvas_shared::{
    models::{BookingStatus, PlotOwnership, Role},
    BookingFilters,
};

/// Backend origin used when neither `--api-base` nor `VISVAS_API_BASE` is
/// set.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Global options and the subcommand to run.
#[derive(Parser)]
#[command(name = "visvas-admin", version, about = "Visvas admin command-line client")]
pub struct Cli {
    /// Backend origin.
    #[arg(long, env = "VISVAS_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    pub api_base: String,
    /// JSON file holding the session token and profile.
    #[arg(
        long,
        env = "VISVAS_SESSION_FILE",
        default_value = ".visvas/session.json",
        global = true
    )]
    pub session_file: PathBuf,
    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long, env = "VISVAS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store the session.
    Register {
        /// New account email.
        #[arg(long)]
        email: String,
        /// Password; checked against the complexity rules before sending.
        #[arg(long, env = "VISVAS_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to `--password`.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Print the stored session's profile.
    Whoami,
    /// Print the dashboard counters.
    Stats,
    /// Inspect and manage bookings.
    Bookings {
        /// Booking action.
        #[command(subcommand)]
        command: BookingCommands,
    },
    /// Manage accounts.
    Users {
        /// Account action.
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Submit a public meeting request.
    Book(BookArgs),
}

/// `bookings` subcommands.
#[derive(Subcommand)]
pub enum BookingCommands {
    /// Print one page of bookings.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// List filters.
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Change a booking's status.
    SetStatus {
        /// Booking id.
        id: String,
        /// pending, confirmed or cancelled.
        status: BookingStatus,
    },
    /// Download the filtered set as a spreadsheet.
    Export {
        /// Output path; defaults to `visvas-bookings-<today>.xlsx`.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Export filters.
        #[command(flatten)]
        filters: FilterArgs,
    },
}

/// `users` subcommands.
#[derive(Subcommand)]
pub enum UserCommands {
    /// Print every account.
    List,
    /// Create an account.
    Create {
        /// Login email.
        #[arg(long)]
        email: String,
        /// Initial password.
        #[arg(long)]
        password: String,
        /// admin or user.
        #[arg(long, default_value = "user")]
        role: Role,
    },
    /// Update an account. Omitted fields keep their current value.
    Update {
        /// Account id.
        id: String,
        /// New login email.
        #[arg(long)]
        email: Option<String>,
        /// New password.
        #[arg(long)]
        password: Option<String>,
        /// New role.
        #[arg(long)]
        role: Option<Role>,
    },
    /// Delete an account after confirmation.
    Delete {
        /// Account id.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Booking list filters shared by `list` and `export`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Inclusive lower bound (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound (YYYY-MM-DD).
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
    /// pending, confirmed or cancelled.
    #[arg(long)]
    pub status: Option<BookingStatus>,
    /// Email to match.
    #[arg(long)]
    pub email: Option<String>,
}

impl FilterArgs {
    /// Filters in the form the API client sends them.
    pub fn to_filters(&self) -> BookingFilters {
        let day = |day: Option<NaiveDate>| {
            day.map(|day| day.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        BookingFilters {
            start_date: day(self.start_date),
            end_date: day(self.end_date),
            status: self
                .status
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
        }
    }
}

/// Public meeting request fields.
#[derive(Args, Debug, Clone)]
pub struct BookArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Contact email.
    #[arg(long)]
    pub email: String,
    /// Non-digits are stripped.
    #[arg(long)]
    pub mobile: String,
    /// "0-3 months", "3-6 months", "more than 6 months" or "Not sure".
    #[arg(long)]
    pub timeline: String,
    /// Yes or No.
    #[arg(long)]
    pub own_plot: PlotOwnership,
    /// Accept the terms and conditions. Required.
    #[arg(long)]
    pub agree_to_terms: bool,
}
