use yew::prelude::*;
use yew_router::prelude::Link;

use crate::router::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
    html! {
        <main class="flex min-h-[70vh] items-center justify-center px-4">
            <div class="max-w-md text-center space-y-4">
                <p class="text-6xl font-black text-orange-500">{ "404" }</p>
                <h1 class="text-2xl font-bold text-slate-900">{ "Page not found" }</h1>
                <p class="text-slate-600">
                    { "The page you are looking for does not exist or has been moved." }
                </p>
                <Link<Route>
                    to={Route::Home}
                    classes={classes!("inline-block", "rounded-lg", "bg-orange-500", "px-5", "py-2", "font-semibold", "text-white", "hover:bg-orange-600")}
                >
                    { "Back to Home" }
                </Link<Route>>
            </div>
        </main>
    }
}
