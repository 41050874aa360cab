use visvas_shared::{api::ApiError, validation::RegisterForm, Landing};
use yew::prelude::*;
use yew_router::prelude::*;

use super::route_after_auth;
use crate::{
    api,
    hooks::use_landing_guard,
    router::Route,
    utils::{input_setter, log_error},
};

fn register_error_message(err: &ApiError) -> String {
    match err {
        ApiError::RequestRejected {
            ..
        } => err.user_message(),
        ApiError::Transport(_) => "Network error. Please try again.".to_string(),
        _ => "Registration failed".to_string(),
    }
}

#[function_component(AdminRegisterPage)]
pub fn admin_register_page() -> Html {
    let navigator = use_navigator();
    let allowed = use_landing_guard(Landing::Login);
    let form = use_state(RegisterForm::default);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);
    let success = use_state(|| None::<String>);

    if !allowed {
        return Html::default();
    }

    let on_email = input_setter(&form, |form, value| form.email = value);
    let on_password = input_setter(&form, |form, value| form.password = value);
    let on_confirm = input_setter(&form, |form, value| form.confirm_password = value);

    let on_submit = {
        let form = form.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let success = success.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *submitting {
                return;
            }
            let request = match form.to_request() {
                Ok(request) => request,
                Err(errors) => {
                    error.set(errors.first().map(|err| err.message.clone()));
                    return;
                },
            };

            submitting.set(true);
            error.set(None);
            success.set(None);
            let submitting = submitting.clone();
            let error = error.clone();
            let success = success.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::client().register(&request).await {
                    Ok(auth) => {
                        success.set(Some(auth.message.clone().unwrap_or_else(|| {
                            "Registration successful! You can now log in.".to_string()
                        })));
                        if let Some(navigator) = &navigator {
                            navigator.push(&route_after_auth(auth.redirect_to.as_deref()));
                        }
                    },
                    Err(err) => {
                        log_error(&format!("Registration error: {err}"));
                        error.set(Some(register_error_message(&err)));
                    },
                }
                submitting.set(false);
            });
        })
    };

    let field_classes = "w-full rounded-lg border border-slate-600 bg-slate-700 px-3 py-2 text-white placeholder-slate-400 focus:outline-none focus:ring-2 focus:ring-orange-500";

    html! {
        <div class="flex min-h-screen items-center justify-center bg-slate-900 px-4">
            <div class="w-full max-w-md space-y-8">
                <div class="text-center">
                    <img src="/visvas_logo.png" alt="Visvas Construction Logo" class="mx-auto h-16 w-auto" />
                    <h2 class="mt-6 text-3xl font-bold text-white">{ "Create Account" }</h2>
                    <p class="mt-2 text-sm text-slate-400">{ "Register for a Visvas Construction account" }</p>
                </div>

                <form class="space-y-6 rounded-xl border border-slate-700 bg-slate-800 p-8" onsubmit={on_submit}>
                    if let Some(message) = (*error).clone() {
                        <div class="rounded-lg border border-red-700 bg-red-900 px-4 py-3 text-sm text-red-200" role="alert">
                            { message }
                        </div>
                    }
                    if let Some(message) = (*success).clone() {
                        <div class="rounded-lg border border-emerald-700 bg-emerald-900 px-4 py-3 text-sm text-emerald-200" role="status">
                            { message }
                        </div>
                    }

                    <label class="block space-y-2">
                        <span class="text-sm font-medium text-slate-300">{ "Email Address" }</span>
                        <input type="email" class={field_classes} placeholder="Enter your email"
                            autocomplete="username" value={form.email.clone()} oninput={on_email} />
                    </label>

                    <label class="block space-y-2">
                        <span class="text-sm font-medium text-slate-300">{ "Password" }</span>
                        <input type="password" class={field_classes} placeholder="Create a password"
                            autocomplete="new-password" value={form.password.clone()} oninput={on_password} />
                        <span class="block text-xs text-slate-500">
                            { "At least 7 characters with uppercase, lowercase, a number and one of @$!%*?&" }
                        </span>
                    </label>

                    <label class="block space-y-2">
                        <span class="text-sm font-medium text-slate-300">{ "Confirm Password" }</span>
                        <input type="password" class={field_classes} placeholder="Confirm your password"
                            autocomplete="new-password" value={form.confirm_password.clone()} oninput={on_confirm} />
                    </label>

                    <button
                        type="submit"
                        class="w-full rounded-lg bg-orange-500 py-3 font-semibold text-white hover:bg-orange-600 disabled:opacity-60"
                        disabled={*submitting}
                    >
                        { if *submitting { "Creating Account..." } else { "Create Account" } }
                    </button>

                    <p class="text-center text-sm text-slate-400">
                        { "Already have an account? " }
                        <Link<Route> to={Route::AdminLogin} classes={classes!("text-orange-500", "hover:text-orange-400")}>
                            { "Sign in" }
                        </Link<Route>>
                    </p>
                </form>
            </div>
        </div>
    }
}
