//! Visvas admin frontend: public booking page, admin authentication and
//! the dashboard, rendered with Yew.

mod api;
mod components;
mod config;
/// Reusable Yew hooks shared across pages.
pub mod hooks;
mod pages;
mod router;
mod utils;

use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    html! {
        <>
            <router::AppRouter />
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
