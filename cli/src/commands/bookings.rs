//! `bookings list`, `bookings set-status` and `bookings export`.

use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use visvas_shared::{
    api::{ApiClient, Transport},
    bookings::{BookingPage, BookingQuery},
    export::export_filename,
    models::display_day,
    session::KeyValueStorage,
};

use crate::cli::BookingCommands;

/// Run one `bookings` subcommand.
pub async fn run<T, S>(
    client: &ApiClient<T, S>,
    command: BookingCommands,
    out: &mut impl Write,
) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    match command {
        BookingCommands::List {
            page,
            filters,
        } => {
            let query = BookingQuery {
                page: page.max(1),
                filters: filters.to_filters(),
            };
            let page = client
                .fetch_bookings(&query)
                .await
                .context("failed to load bookings")?;
            print_page(out, &page)
        },
        BookingCommands::SetStatus {
            id,
            status,
        } => {
            client
                .update_booking_status(&id, status)
                .await
                .with_context(|| format!("failed to update booking {id}"))?;
            writeln!(out, "Booking {id} -> {}", status.as_str())?;
            Ok(())
        },
        BookingCommands::Export {
            out: path,
            filters,
        } => {
            let bytes = client
                .export_bookings(&filters.to_filters())
                .await
                .context("failed to export bookings")?;
            let path =
                path.unwrap_or_else(|| PathBuf::from(export_filename(Local::now().date_naive())));
            fs::write(&path, &bytes)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            tracing::info!("exported {} bytes", bytes.len());
            writeln!(out, "Exported bookings to {}", path.display())?;
            Ok(())
        },
    }
}

fn print_page(out: &mut impl Write, page: &BookingPage) -> Result<()> {
    let Some((first, last)) = page.pagination.showing_range() else {
        writeln!(out, "No bookings found")?;
        return Ok(());
    };

    writeln!(
        out,
        "{:<6} {:<12} {:<22} {:<30} {:<12} {:<20} {:<5} {:<10} {}",
        "SR NO", "DATE", "NAME", "EMAIL", "MOBILE", "TIMELINE", "PLOT", "STATUS", "ID"
    )?;
    for booking in &page.bookings {
        writeln!(
            out,
            "{:<6} {:<12} {:<22} {:<30} {:<12} {:<20} {:<5} {:<10} {}",
            booking.sr_no,
            display_day(&booking.date),
            booking.name,
            booking.email,
            booking.mobile_number,
            booking.construction_timeline.as_str(),
            booking.own_plot_of_land.as_str(),
            booking.status.as_str(),
            booking.id,
        )?;
    }
    writeln!(
        out,
        "Showing {first} to {last} of {} results (page {} of {})",
        page.pagination.total_count, page.pagination.current_page, page.pagination.total_pages
    )?;
    Ok(())
}
