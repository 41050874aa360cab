//! `login`, `register`, `logout` and `whoami`.

use std::io::Write;

use anyhow::{Context, Result};
use visvas_shared::{
    api::{ApiClient, Transport},
    models::AuthResponse,
    session::KeyValueStorage,
    validation::{LoginForm, RegisterForm},
};

use super::invalid_form;

fn print_auth(out: &mut impl Write, auth: &AuthResponse) -> Result<()> {
    if let Some(message) = &auth.message {
        writeln!(out, "{message}")?;
    }
    writeln!(out, "Signed in as {} ({})", auth.user.email, auth.user.role)?;
    Ok(())
}

/// Validate, sign in and print the profile.
pub async fn login<T, S>(
    client: &ApiClient<T, S>,
    email: String,
    password: String,
    out: &mut impl Write,
) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    let request = LoginForm {
        email,
        password,
    }
    .to_request()
    .map_err(invalid_form)?;
    let auth = client.login(&request).await.context("login failed")?;
    tracing::info!("stored session for {}", auth.user.email);
    print_auth(out, &auth)
}

/// Validate locally, create the account and print the profile.
pub async fn register<T, S>(
    client: &ApiClient<T, S>,
    email: String,
    password: String,
    confirm_password: String,
    out: &mut impl Write,
) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    let request = RegisterForm {
        email,
        password,
        confirm_password,
    }
    .to_request()
    .map_err(invalid_form)?;
    let auth = client
        .register(&request)
        .await
        .context("registration failed")?;
    print_auth(out, &auth)
}

/// Drop the stored session.
pub fn logout<T, S>(client: &ApiClient<T, S>, out: &mut impl Write) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    client.logout();
    writeln!(out, "Logged out")?;
    Ok(())
}

/// Print the stored profile and where it lands.
pub fn whoami<T, S>(client: &ApiClient<T, S>, out: &mut impl Write) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    match client.session().get() {
        Some(session) => writeln!(
            out,
            "{} ({}) -> {}",
            session.user.email,
            session.user.role,
            client.session().landing().path()
        )?,
        None => writeln!(out, "Not logged in")?,
    }
    Ok(())
}
