//! Subcommand implementations, generic over transport and session storage.

pub mod auth;
pub mod book;
pub mod bookings;
pub mod stats;
pub mod users;

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use visvas_shared::{
    api::{ApiClient, ApiError, Transport},
    session::KeyValueStorage,
    validation::ValidationError,
    SessionStore,
};

use crate::{
    cli::{Cli, Commands},
    storage::FileStorage,
    transport::ReqwestTransport,
};

/// Hint printed when a command failed because the session is gone.
pub const RELOGIN_HINT: &str = "Your session has expired. Run `visvas-admin login` to sign in again.";

/// Entry point of the binary: build the client from `cli` and run the
/// command against stdout and stdin.
pub async fn run(cli: Cli) -> Result<()> {
    let storage = FileStorage::new(&cli.session_file);
    tracing::debug!("session file: {}", storage.path().display());
    let client = ApiClient::new(cli.api_base, ReqwestTransport::new()?, SessionStore::new(storage));

    let stdout = io::stdout();
    let stdin = io::stdin();
    let result = dispatch(&client, cli.command, &mut stdout.lock(), &mut stdin.lock()).await;
    if let Err(err) = &result {
        if requires_login(err) {
            eprintln!("{RELOGIN_HINT}");
        }
    }
    result
}

/// Execute one command. Output goes to `out`; prompts read from `input`.
pub async fn dispatch<T, S>(
    client: &ApiClient<T, S>,
    command: Commands,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    match command {
        Commands::Login {
            email,
            password,
        } => auth::login(client, email, password, out).await,
        Commands::Register {
            email,
            password,
            confirm_password,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            auth::register(client, email, password, confirm_password, out).await
        },
        Commands::Logout => auth::logout(client, out),
        Commands::Whoami => auth::whoami(client, out),
        Commands::Stats => stats::run(client, out).await,
        Commands::Bookings {
            command,
        } => bookings::run(client, command, out).await,
        Commands::Users {
            command,
        } => users::run(client, command, out, input).await,
        Commands::Book(args) => book::run(client, args, out).await,
    }
}

/// Whether `err` (or anything it wraps) asks for a fresh login.
pub fn requires_login(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(ApiError::requires_login)
}

/// One error carrying every form violation.
pub(crate) fn invalid_form(errors: Vec<ValidationError>) -> anyhow::Error {
    let messages: Vec<String> = errors.into_iter().map(|err| err.message).collect();
    anyhow!(messages.join("; "))
}
