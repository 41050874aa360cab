use yew::prelude::*;
use yew_router::prelude::*;

use crate::{api, router::Route};

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub on_book_meeting: Callback<()>,
}

/// Public site header with the "Book a Meeting" call to action.
#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let mobile_menu_open = use_state(|| false);
    let landing = api::session().landing();

    let toggle_mobile_menu = {
        let mobile_menu_open = mobile_menu_open.clone();
        Callback::from(move |_| mobile_menu_open.set(!*mobile_menu_open))
    };

    let book_meeting = {
        let on_book_meeting = props.on_book_meeting.clone();
        let mobile_menu_open = mobile_menu_open.clone();
        Callback::from(move |_| {
            mobile_menu_open.set(false);
            on_book_meeting.emit(());
        })
    };

    let account_link = html! {
        <Link<Route>
            to={Route::from_landing(landing)}
            classes={classes!("text-sm", "font-medium", "text-slate-700", "hover:text-orange-600")}
        >
            { if landing == visvas_shared::Landing::Login { "Admin" } else { "My Account" } }
        </Link<Route>>
    };

    html! {
        <header class="sticky top-0 z-30 border-b border-slate-200 bg-white/95 backdrop-blur">
            <div class="mx-auto flex max-w-7xl items-center justify-between px-4 py-3">
                <Link<Route> to={Route::Home} classes={classes!("flex", "items-center", "gap-2")}>
                    <img src="/visvas_logo.png" alt="Visvas Construction Logo" class="h-10 w-auto" />
                    <span class="text-lg font-bold text-slate-900">{ "Visvas Construction" }</span>
                </Link<Route>>

                <nav class="hidden items-center gap-6 md:flex" aria-label="Main">
                    <Link<Route> to={Route::Home} classes={classes!("text-sm", "font-medium", "text-slate-700", "hover:text-orange-600")}>
                        { "Home" }
                    </Link<Route>>
                    { account_link.clone() }
                    <button
                        type="button"
                        class="rounded-lg bg-orange-500 px-4 py-2 text-sm font-semibold text-white hover:bg-orange-600"
                        onclick={book_meeting.clone()}
                    >
                        { "Book a Meeting" }
                    </button>
                </nav>

                <button
                    type="button"
                    class="md:hidden rounded-lg p-2 text-slate-700 hover:bg-slate-100"
                    aria-label="Toggle menu"
                    aria-expanded={(*mobile_menu_open).to_string()}
                    onclick={toggle_mobile_menu}
                >
                    { if *mobile_menu_open { "✕" } else { "☰" } }
                </button>
            </div>

            if *mobile_menu_open {
                <nav class="flex flex-col gap-3 border-t border-slate-200 px-4 py-4 md:hidden" aria-label="Mobile">
                    <Link<Route> to={Route::Home} classes={classes!("text-sm", "font-medium", "text-slate-700")}>
                        { "Home" }
                    </Link<Route>>
                    { account_link }
                    <button
                        type="button"
                        class="rounded-lg bg-orange-500 px-4 py-2 text-sm font-semibold text-white"
                        onclick={book_meeting}
                    >
                        { "Book a Meeting" }
                    </button>
                </nav>
            }
        </header>
    }
}
