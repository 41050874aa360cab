use visvas_shared::Landing;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{api, hooks::use_landing_guard, router::Route};

/// Landing page for signed-in non-admin accounts.
#[function_component(WelcomePage)]
pub fn welcome_page() -> Html {
    let navigator = use_navigator();
    let allowed = use_landing_guard(Landing::Welcome);

    if !allowed {
        return Html::default();
    }

    let email = api::session()
        .get()
        .map(|session| session.user.email)
        .unwrap_or_default();

    let logout = Callback::from(move |_| {
        api::client().logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::from_landing(Landing::Welcome.after_logout()));
        }
    });

    html! {
        <div class="min-h-screen bg-slate-900 text-white">
            <header class="border-b border-slate-700 bg-slate-800">
                <div class="mx-auto flex max-w-7xl items-center justify-between px-4 py-4">
                    <Link<Route> to={Route::Home} classes={classes!("flex", "items-center", "gap-2")}>
                        <img src="/visvas_logo.png" alt="Visvas Construction Logo" class="h-10 w-auto" />
                    </Link<Route>>
                    <nav class="flex items-center gap-4">
                        <Link<Route> to={Route::Home} classes={classes!("text-sm", "text-slate-300", "hover:text-white")}>
                            { "Home" }
                        </Link<Route>>
                        <button
                            type="button"
                            class="rounded-lg bg-red-600 px-4 py-2 text-sm font-medium hover:bg-red-700"
                            onclick={logout}
                        >
                            { "Logout" }
                        </button>
                    </nav>
                </div>
            </header>

            <main class="mx-auto flex max-w-3xl flex-col items-center px-4 py-24 text-center">
                <h1 class="text-4xl font-bold">{ "Welcome to Visvas Construction" }</h1>
                if !email.is_empty() {
                    <p class="mt-4 text-lg text-slate-300">{ format!("Signed in as {email}") }</p>
                }
                <p class="mt-6 text-slate-400">
                    { "Thank you for registering. Our team will reach out to you about your construction plans." }
                </p>
                <Link<Route>
                    to={Route::Home}
                    classes={classes!("mt-10", "rounded-lg", "bg-orange-500", "px-6", "py-3", "font-semibold", "hover:bg-orange-600")}
                >
                    { "Explore Our Services" }
                </Link<Route>>
            </main>
        </div>
    }
}
