//! `users` subcommands, driven by the user-management controller.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use visvas_shared::{
    api::{ApiClient, Transport},
    notify::Confirmation,
    session::KeyValueStorage,
    users::{UserForm, UserManagementController, UserSubmission},
};

use super::invalid_form;
use crate::cli::UserCommands;

/// Run one `users` subcommand. `input` answers the delete prompt.
pub async fn run<T, S>(
    client: &ApiClient<T, S>,
    command: UserCommands,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    let mut controller = UserManagementController::new();
    match command {
        UserCommands::List => {
            let generation = controller.begin_load();
            let users = client.fetch_users().await.context("failed to load users")?;
            controller.finish_load(generation, Ok(users));
            print_users(out, &controller)
        },
        UserCommands::Create {
            email,
            password,
            role,
        } => {
            *controller.form_mut() = UserForm {
                email,
                password,
                role,
            };
            let UserSubmission::Create(payload) = controller.submission().map_err(invalid_form)?
            else {
                bail!("unexpected update submission");
            };
            let user = client
                .create_user(&payload)
                .await
                .context("failed to create user")?;
            writeln!(out, "User created successfully: {} ({})", user.email, user.id)?;
            Ok(())
        },
        UserCommands::Update {
            id,
            email,
            password,
            role,
        } => {
            let users = client.fetch_users().await.context("failed to load users")?;
            let Some(current) = users.iter().find(|user| user.id == id) else {
                bail!("user not found: {id}");
            };
            controller.start_edit(current);
            let form = controller.form_mut();
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(password) = password {
                form.password = password;
            }
            if let Some(role) = role {
                form.role = role;
            }
            let UserSubmission::Update {
                id,
                payload,
            } = controller.submission().map_err(invalid_form)?
            else {
                bail!("unexpected create submission");
            };
            let user = client
                .update_user(&id, &payload)
                .await
                .with_context(|| format!("failed to update user {id}"))?;
            writeln!(out, "User updated successfully: {} ({})", user.email, user.role)?;
            Ok(())
        },
        UserCommands::Delete {
            id,
            yes,
        } => {
            let confirmation = controller.delete_confirmation(&id);
            if !yes && !confirm(&confirmation, out, input)? {
                writeln!(out, "Cancelled")?;
                return Ok(());
            }
            client
                .delete_user(&id)
                .await
                .with_context(|| format!("failed to delete user {id}"))?;
            writeln!(out, "User deleted successfully")?;
            Ok(())
        },
    }
}

/// Ask `confirmation` on the terminal. Only `y`/`yes` confirms.
fn confirm(
    confirmation: &Confirmation,
    out: &mut impl Write,
    input: &mut impl BufRead,
) -> Result<bool> {
    write!(out, "{}: {} [y/N] ", confirmation.title, confirmation.message)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_users(out: &mut impl Write, controller: &UserManagementController) -> Result<()> {
    if controller.users().is_empty() {
        writeln!(out, "No users found")?;
        return Ok(());
    }
    writeln!(out, "{:<26} {:<32} {:<6} {:<12} {}", "ID", "EMAIL", "ROLE", "LAST LOGIN", "STATUS")?;
    for user in controller.users() {
        writeln!(
            out,
            "{:<26} {:<32} {:<6} {:<12} {}",
            user.id,
            user.email,
            user.role.as_str(),
            user.last_login_label(),
            if user.is_active { "Active" } else { "Inactive" },
        )?;
    }
    Ok(())
}
