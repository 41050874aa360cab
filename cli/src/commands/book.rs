//! `book`: the public meeting request.

use std::io::Write;

use anyhow::{Context, Result};
use visvas_shared::{
    api::{ApiClient, Transport},
    models::ConstructionTimeline,
    session::KeyValueStorage,
    validation::BookingForm,
};

use super::invalid_form;
use crate::cli::BookArgs;

/// Submit a meeting request and print the backend's reply.
pub async fn run<T, S>(client: &ApiClient<T, S>, args: BookArgs, out: &mut impl Write) -> Result<()>
where
    T: Transport,
    S: KeyValueStorage,
{
    let mut form = BookingForm {
        full_name: args.name,
        email: args.email,
        construction_time: Some(ConstructionTimeline::from(args.timeline)),
        own_plot: Some(args.own_plot),
        agree_to_terms: args.agree_to_terms,
        ..BookingForm::default()
    };
    form.set_mobile_number(&args.mobile);
    let request = form.to_request().map_err(invalid_form)?;

    let message = client
        .create_booking(&request)
        .await
        .context("failed to book meeting")?;
    writeln!(out, "{message}")?;
    Ok(())
}
