use std::str::FromStr;

use visvas_shared::{
    bookings::{BookingFilters, FetchTicket, StatusSettlement},
    export::{export_filename, EXPORT_MIME},
    fetch::FetchOutcome,
    models::{display_day, Booking, BookingStatus},
    notify::{Toast, ToastKind},
    BookingListController,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_hooks::prelude::use_mount;
use yew_router::prelude::{use_navigator, Navigator};

use crate::{
    api,
    components::{
        loading_spinner::LoadingSpinner,
        pagination::Pagination,
        stats_card::{StatTone, StatsCard},
    },
    hooks::{redirect_to_login, use_shared, Shared},
    utils::{download_bytes, log_error, log_warn, today},
};

#[derive(Properties, PartialEq)]
pub struct BookingsTabProps {
    pub notify: Callback<Toast>,
}

fn status_badge_class(status: BookingStatus) -> Classes {
    let base = classes!("inline-flex", "rounded-full", "px-2", "py-1", "text-xs", "font-semibold");
    match status {
        BookingStatus::Pending => classes!(base, "bg-yellow-100", "text-yellow-800"),
        BookingStatus::Confirmed => classes!(base, "bg-green-100", "text-green-800"),
        BookingStatus::Cancelled => classes!(base, "bg-red-100", "text-red-800"),
    }
}

/// Send `ticket` and hand the page back to the controller.
fn run_fetch(
    controller: Shared<BookingListController>,
    ticket: FetchTicket,
    navigator: Option<Navigator>,
) {
    wasm_bindgen_futures::spawn_local(async move {
        let result = api::client().fetch_bookings(&ticket.query).await;
        match controller.update(|c| c.complete(&ticket, result)) {
            FetchOutcome::SessionExpired => redirect_to_login(navigator.as_ref()),
            FetchOutcome::Failed(message) => log_warn(&message),
            FetchOutcome::Applied | FetchOutcome::Stale => {},
        }
    });
}

fn refresh_stats(controller: Shared<BookingListController>, navigator: Option<Navigator>) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::client().fetch_stats().await {
            Ok(stats) => controller.update(|c| c.set_stats(stats)),
            Err(err) if err.requires_login() => redirect_to_login(navigator.as_ref()),
            Err(err) => log_error(&format!("Failed to fetch stats: {err}")),
        }
    });
}

fn filter_setter(
    controller: &Shared<BookingListController>,
    apply: fn(&mut BookingFilters, String),
) -> Callback<InputEvent> {
    let controller = controller.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            controller.update(|c| apply(c.filters_mut(), input.value()));
        }
    })
}

/// "Customer Data" tab: stats, filters, the bookings table and export.
#[function_component(BookingsTab)]
pub fn bookings_tab(props: &BookingsTabProps) -> Html {
    let navigator = use_navigator();
    let controller = use_shared(BookingListController::new);
    let exporting = use_state(|| false);

    {
        let controller = controller.clone();
        let navigator = navigator.clone();
        use_mount(move || {
            let ticket = controller.update(BookingListController::mount);
            run_fetch(controller.clone(), ticket, navigator.clone());
            refresh_stats(controller, navigator);
        });
    }

    let on_start = filter_setter(&controller, |filters, value| filters.start_date = value);
    let on_end = filter_setter(&controller, |filters, value| filters.end_date = value);
    let on_email = filter_setter(&controller, |filters, value| filters.email = value);
    let on_status_filter = {
        let controller = controller.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                controller.update(|c| c.filters_mut().status = select.value());
            }
        })
    };

    let on_apply = {
        let controller = controller.clone();
        let navigator = navigator.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let ticket = controller.update(BookingListController::apply);
            run_fetch(controller.clone(), ticket, navigator.clone());
        })
    };

    let on_clear = {
        let controller = controller.clone();
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            let ticket = controller.update(BookingListController::clear);
            run_fetch(controller.clone(), ticket, navigator.clone());
        })
    };

    let on_page_change = {
        let controller = controller.clone();
        let navigator = navigator.clone();
        Callback::from(move |page: usize| {
            let ticket = controller.update(|c| c.go_to_page(page));
            run_fetch(controller.clone(), ticket, navigator.clone());
        })
    };

    let on_dismiss_error = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.update(BookingListController::dismiss_error))
    };

    let on_export = {
        let controller = controller.clone();
        let navigator = navigator.clone();
        let exporting = exporting.clone();
        let notify = props.notify.clone();
        Callback::from(move |_: MouseEvent| {
            if *exporting {
                return;
            }
            exporting.set(true);
            let filters = controller.read(|c| c.filters().clone());
            let navigator = navigator.clone();
            let exporting = exporting.clone();
            let notify = notify.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = match api::client().export_bookings(&filters).await {
                    Ok(bytes) => download_bytes(&bytes, &export_filename(today()), EXPORT_MIME),
                    Err(err) if err.requires_login() => {
                        exporting.set(false);
                        redirect_to_login(navigator.as_ref());
                        return;
                    },
                    Err(err) => Err(err.to_string()),
                };
                match outcome {
                    Ok(()) => notify.emit(Toast {
                        message: "Data exported successfully".to_string(),
                        kind: ToastKind::Success,
                    }),
                    Err(reason) => {
                        log_error(&format!("Export error: {reason}"));
                        notify.emit(Toast {
                            message: "Failed to export data".to_string(),
                            kind: ToastKind::Error,
                        });
                    },
                }
                exporting.set(false);
            });
        })
    };

    let status_changer = |booking_id: String| {
        let controller = controller.clone();
        let navigator = navigator.clone();
        let notify = props.notify.clone();
        Callback::from(move |event: Event| {
            let Some(select) = event.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Ok(status) = BookingStatus::from_str(&select.value()) else {
                return;
            };
            let Some(change) = controller.update(|c| c.begin_status_change(&booking_id, status))
            else {
                return;
            };

            let controller = controller.clone();
            let navigator = navigator.clone();
            let notify = notify.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = api::client()
                    .update_booking_status(&change.booking_id, change.next)
                    .await;
                let settlement = controller.update(|c| c.settle_status_change(&change, result));
                match &settlement {
                    StatusSettlement::Confirmed => {
                        notify.emit(Toast {
                            message: "Booking status updated successfully".to_string(),
                            kind: ToastKind::Success,
                        });
                    },
                    StatusSettlement::Reverted(reason) => {
                        log_error(&format!("Status update failed: {reason}"));
                        notify.emit(Toast {
                            message: "Failed to update booking status".to_string(),
                            kind: ToastKind::Error,
                        });
                    },
                    StatusSettlement::Superseded(reason) => {
                        log_warn(&format!("Superseded status update failed: {reason}"));
                    },
                    StatusSettlement::SessionExpired => redirect_to_login(navigator.as_ref()),
                }
                if settlement.needs_stats_refresh() {
                    refresh_stats(controller, navigator);
                }
            });
        })
    };

    let (filters, stats, rows, pagination, loading, error) = controller.read(|c| {
        (
            c.filters().clone(),
            c.stats(),
            c.bookings().to_vec(),
            c.pagination(),
            c.is_loading(),
            c.error().map(str::to_string),
        )
    });

    let field_classes = "w-full rounded-lg border border-slate-600 bg-slate-700 px-3 py-2 text-sm text-white focus:outline-none focus:ring-2 focus:ring-orange-500";
    let header_cell = "px-6 py-3 text-left text-xs font-medium uppercase tracking-wider text-slate-300";
    let cell = "whitespace-nowrap px-6 py-4 text-sm text-slate-300";

    let row = |booking: &Booking| {
        html! {
            <tr key={booking.id.clone()} class="hover:bg-slate-700">
                <td class={cell}>{ booking.sr_no }</td>
                <td class={cell}>{ display_day(&booking.date) }</td>
                <td class="whitespace-nowrap px-6 py-4 text-sm font-medium text-white">{ booking.name.clone() }</td>
                <td class={cell}>{ booking.email.clone() }</td>
                <td class={cell}>{ booking.mobile_number.clone() }</td>
                <td class={cell}>{ booking.construction_timeline.as_str().to_string() }</td>
                <td class={cell}>{ booking.own_plot_of_land.as_str() }</td>
                <td class="whitespace-nowrap px-6 py-4">
                    <span class={status_badge_class(booking.status)}>{ booking.status.as_str() }</span>
                </td>
                <td class={cell}>{ if booking.email_sent { "✅" } else { "❌" } }</td>
                <td class="whitespace-nowrap px-6 py-4 text-sm">
                    <select
                        class="rounded border border-slate-600 bg-slate-700 px-2 py-1 text-xs text-white focus:outline-none focus:ring-2 focus:ring-orange-500"
                        onchange={status_changer(booking.id.clone())}
                    >
                        { for BookingStatus::ALL.iter().map(|status| html! {
                            <option value={status.as_str()} selected={*status == booking.status}>
                                { status.label() }
                            </option>
                        }) }
                    </select>
                </td>
            </tr>
        }
    };

    html! {
        <div class="space-y-6">
            <div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-5">
                <StatsCard label="Total Bookings" value={stats.total_bookings} />
                <StatsCard label="Pending" value={stats.pending_bookings} tone={StatTone::Pending} />
                <StatsCard label="Confirmed" value={stats.confirmed_bookings} tone={StatTone::Confirmed} />
                <StatsCard label="Cancelled" value={stats.cancelled_bookings} tone={StatTone::Cancelled} />
                <StatsCard label="Last 30 Days" value={stats.recent_bookings} tone={StatTone::Recent} />
            </div>

            <form class="grid grid-cols-1 gap-4 rounded-lg border border-slate-700 bg-slate-800 p-6 md:grid-cols-6" onsubmit={on_apply}>
                <label class="block space-y-1">
                    <span class="text-sm text-slate-300">{ "Start Date" }</span>
                    <input type="date" class={field_classes} value={filters.start_date.clone()} oninput={on_start} />
                </label>
                <label class="block space-y-1">
                    <span class="text-sm text-slate-300">{ "End Date" }</span>
                    <input type="date" class={field_classes} value={filters.end_date.clone()} oninput={on_end} />
                </label>
                <label class="block space-y-1">
                    <span class="text-sm text-slate-300">{ "Status" }</span>
                    <select class={field_classes} onchange={on_status_filter}>
                        <option value="" selected={filters.status.is_empty()}>{ "All" }</option>
                        { for BookingStatus::ALL.iter().map(|status| html! {
                            <option value={status.as_str()} selected={filters.status == status.as_str()}>
                                { status.label() }
                            </option>
                        }) }
                    </select>
                </label>
                <label class="block space-y-1 md:col-span-2">
                    <span class="text-sm text-slate-300">{ "Email" }</span>
                    <input type="text" class={field_classes} placeholder="Search by email"
                        value={filters.email.clone()} oninput={on_email} />
                </label>
                <div class="flex items-end gap-2">
                    <button type="submit" class="rounded-lg bg-orange-500 px-4 py-2 text-sm text-white hover:bg-orange-600" disabled={loading}>
                        { "Apply" }
                    </button>
                    <button type="button" class="rounded-lg bg-slate-600 px-4 py-2 text-sm text-white hover:bg-slate-700" onclick={on_clear}>
                        { "Clear" }
                    </button>
                    <button
                        type="button"
                        class="rounded-lg bg-emerald-600 px-4 py-2 text-sm text-white hover:bg-emerald-700 disabled:opacity-60"
                        disabled={*exporting}
                        onclick={on_export}
                    >
                        { if *exporting { "Exporting..." } else { "Export" } }
                    </button>
                </div>
            </form>

            <div class="overflow-hidden rounded-lg border border-slate-700 bg-slate-800">
                if loading && rows.is_empty() {
                    <div class="py-12"><LoadingSpinner label="Loading bookings..." /></div>
                } else if rows.is_empty() {
                    <p class="py-12 text-center text-slate-400">{ "No bookings found" }</p>
                } else {
                    <div class="overflow-x-auto">
                        <table class="min-w-full divide-y divide-slate-700">
                            <thead class="bg-slate-900">
                                <tr>
                                    { for ["Sr No", "Date", "Name", "Email", "Mobile", "Timeline", "Plot", "Status", "Email Sent", "Actions"]
                                        .iter()
                                        .map(|label| html! { <th class={header_cell}>{ *label }</th> }) }
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-slate-700">
                                { for rows.iter().map(row) }
                            </tbody>
                        </table>
                    </div>
                }
                <div class="border-t border-slate-700 bg-slate-900 px-6 py-3">
                    <Pagination info={pagination} on_page_change={on_page_change} disabled={loading} />
                </div>
            </div>

            if let Some(message) = error {
                <div class="flex items-center justify-between rounded-lg border border-red-700 bg-red-900 px-4 py-3 text-red-200" role="alert">
                    <span>{ message }</span>
                    <button type="button" class="text-sm underline" onclick={on_dismiss_error}>{ "Dismiss" }</button>
                </div>
            }
        </div>
    }
}
