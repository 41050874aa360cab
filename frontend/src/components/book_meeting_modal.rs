use visvas_shared::{
    api::ApiError,
    models::{ConstructionTimeline, PlotOwnership},
    validation::BookingForm,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::{
    api,
    utils::{input_setter, log_error},
};

#[derive(Properties, PartialEq)]
pub struct BookMeetingModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    /// Receives the backend's confirmation message.
    pub on_success: Callback<String>,
}

fn submit_error_message(err: &ApiError) -> String {
    match err {
        ApiError::RequestRejected {
            ..
        } => err.user_message(),
        ApiError::Transport(_) => {
            "Network error. Please check your connection and try again.".to_string()
        },
        _ => "Failed to book meeting. Please try again.".to_string(),
    }
}

#[function_component(BookMeetingModal)]
pub fn book_meeting_modal(props: &BookMeetingModalProps) -> Html {
    let form = use_state(BookingForm::default);
    let submitting = use_state(|| false);
    let submit_error = use_state(|| None::<String>);

    if !props.open {
        return Html::default();
    }

    let on_name = input_setter(&form, |form, value| form.full_name = value);
    let on_email = input_setter(&form, |form, value| form.email = value);
    let on_mobile = input_setter(&form, |form, value| form.set_mobile_number(&value));

    let on_timeline = {
        let form = form.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                let value = select.value();
                let mut next = (*form).clone();
                next.construction_time =
                    (!value.is_empty()).then(|| ConstructionTimeline::from(value));
                form.set(next);
            }
        })
    };

    let plot_choice = |choice: PlotOwnership| {
        let form = form.clone();
        Callback::from(move |_: Event| {
            let mut next = (*form).clone();
            next.own_plot = Some(choice);
            form.set(next);
        })
    };

    let on_terms = {
        let form = form.clone();
        Callback::from(move |event: Event| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                next.agree_to_terms = input.checked();
                form.set(next);
            }
        })
    };

    let close = {
        let on_close = props.on_close.clone();
        let submitting = submitting.clone();
        Callback::from(move |_| {
            if !*submitting {
                on_close.emit(());
            }
        })
    };

    let on_submit = {
        let form = form.clone();
        let submitting = submitting.clone();
        let submit_error = submit_error.clone();
        let on_close = props.on_close.clone();
        let on_success = props.on_success.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting {
                return;
            }
            let request = match form.to_request() {
                Ok(request) => request,
                Err(_) => {
                    submit_error.set(Some(BookingForm::summary_message().to_string()));
                    return;
                },
            };

            submitting.set(true);
            submit_error.set(None);
            let form = form.clone();
            let submitting = submitting.clone();
            let submit_error = submit_error.clone();
            let on_close = on_close.clone();
            let on_success = on_success.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::client().create_booking(&request).await {
                    Ok(message) => {
                        form.set(BookingForm::default());
                        on_close.emit(());
                        on_success.emit(message);
                    },
                    Err(err) => {
                        log_error(&format!("Booking submission error: {err}"));
                        submit_error.set(Some(submit_error_message(&err)));
                    },
                }
                submitting.set(false);
            });
        })
    };

    let stop = Callback::from(|event: MouseEvent| event.stop_propagation());
    let field_classes = "w-full rounded-lg border border-slate-300 px-3 py-2 text-sm focus:border-orange-500 focus:outline-none";
    let selected_timeline = form
        .construction_time
        .as_ref()
        .map(|timeline| timeline.as_str().to_string())
        .unwrap_or_default();

    html! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/50 px-4" onclick={close.clone()}>
            <div class="w-full max-w-lg rounded-2xl bg-white p-6 shadow-2xl" role="dialog" aria-modal="true" onclick={stop}>
                <div class="mb-4 flex items-center justify-between">
                    <h2 class="text-xl font-bold text-slate-900">{ "Book a Meeting" }</h2>
                    <button type="button" class="text-2xl text-slate-500 hover:text-slate-800" aria-label="Close" onclick={close}>
                        {"×"}
                    </button>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <label class="block space-y-1">
                        <span class="text-sm font-medium text-slate-700">{ "Full Name *" }</span>
                        <input type="text" class={field_classes} placeholder="Enter full name"
                            value={form.full_name.clone()} oninput={on_name} />
                    </label>
                    <label class="block space-y-1">
                        <span class="text-sm font-medium text-slate-700">{ "Email Address *" }</span>
                        <input type="email" class={field_classes} placeholder="Enter email address"
                            value={form.email.clone()} oninput={on_email} />
                    </label>
                    <label class="block space-y-1">
                        <span class="text-sm font-medium text-slate-700">{ "Mobile Number *" }</span>
                        <input type="tel" inputmode="numeric" class={field_classes} placeholder="Enter mobile number"
                            value={form.mobile_number.clone()} oninput={on_mobile} />
                    </label>
                    <label class="block space-y-1">
                        <span class="text-sm font-medium text-slate-700">{ "When do you plan to start construction? *" }</span>
                        <select class={field_classes} onchange={on_timeline}>
                            <option value="" selected={selected_timeline.is_empty()}>{ "Select timeline" }</option>
                            { for ConstructionTimeline::OPTIONS.iter().map(|option| {
                                let value = option.as_str().to_string();
                                html! {
                                    <option value={value.clone()} selected={selected_timeline == value}>
                                        { value.clone() }
                                    </option>
                                }
                            }) }
                        </select>
                    </label>

                    <fieldset class="space-y-2">
                        <legend class="text-sm font-medium text-slate-700">{ "Do you own a plot of land? *" }</legend>
                        <div class="flex gap-6">
                            <label class="flex items-center gap-2 text-sm">
                                <input type="radio" name="ownPlot" value="Yes"
                                    checked={form.own_plot == Some(PlotOwnership::Yes)}
                                    onchange={plot_choice(PlotOwnership::Yes)} />
                                { "Yes" }
                            </label>
                            <label class="flex items-center gap-2 text-sm">
                                <input type="radio" name="ownPlot" value="No"
                                    checked={form.own_plot == Some(PlotOwnership::No)}
                                    onchange={plot_choice(PlotOwnership::No)} />
                                { "No" }
                            </label>
                        </div>
                    </fieldset>

                    <label class="flex items-center gap-2 text-sm text-slate-700">
                        <input type="checkbox" checked={form.agree_to_terms} onchange={on_terms} />
                        { "I agree to the " }
                        <a href="#terms" class="text-orange-600 hover:underline">{ "terms and conditions" }</a>
                    </label>

                    if let Some(message) = (*submit_error).clone() {
                        <p class="rounded-lg bg-red-50 px-3 py-2 text-sm text-red-700" role="alert">{ message }</p>
                    }

                    <button
                        type="submit"
                        class="w-full rounded-lg bg-orange-500 py-3 font-semibold text-white hover:bg-orange-600 disabled:opacity-60"
                        disabled={*submitting}
                    >
                        { if *submitting { "Booking..." } else { "Book Meeting" } }
                    </button>
                </form>
            </div>
        </div>
    }
}
