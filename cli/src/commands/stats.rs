//! `stats`: dashboard counters.

use std::io::Write;

use anyhow::{Context, Result};
use visvas_shared::{
    api::{ApiClient, Transport},
    session::KeyValueStorage,
};

/// Print the five dashboard counters.
pub async fn run<T, S>(client: &ApiClient<T, S>, out: &mut impl Write) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    let stats = client.fetch_stats().await.context("failed to fetch stats")?;
    writeln!(out, "Total bookings:     {}", stats.total_bookings)?;
    writeln!(out, "Pending:            {}", stats.pending_bookings)?;
    writeln!(out, "Confirmed:          {}", stats.confirmed_bookings)?;
    writeln!(out, "Cancelled:          {}", stats.cancelled_bookings)?;
    writeln!(out, "Last 30 days:       {}", stats.recent_bookings)?;
    Ok(())
}
