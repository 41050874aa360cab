use visvas_shared::Landing;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{hooks::use_scroll_to_top, pages};

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Home,

    #[at("/welcome")]
    Welcome,

    #[at("/admin/dashboard")]
    AdminLogin,

    #[at("/admin/dashboard/register")]
    AdminRegister,

    #[at("/admin")]
    Admin,

    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Route for a landing path produced by the session store.
    pub fn from_landing(landing: Landing) -> Self {
        match landing {
            Landing::Login => Route::AdminLogin,
            Landing::Dashboard => Route::Admin,
            Landing::Welcome => Route::Welcome,
        }
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Home => html! { <pages::home::HomePage /> },
        Route::Welcome => html! { <pages::welcome::WelcomePage /> },
        Route::AdminLogin => html! { <pages::admin_login::AdminLoginPage /> },
        Route::AdminRegister => html! { <pages::admin_register::AdminRegisterPage /> },
        Route::Admin => html! { <pages::admin::AdminPage /> },
        Route::NotFound => html! { <pages::not_found::NotFoundPage /> },
    }
}

#[function_component(RouteView)]
fn route_view() -> Html {
    use_scroll_to_top();
    html! { <Switch<Route> render={switch} /> }
}

#[function_component(AppRouter)]
pub fn app_router() -> Html {
    html! {
        <BrowserRouter>
            <div class="flex min-h-screen flex-col bg-slate-50">
                <div class="flex-1">
                    <RouteView />
                </div>
            </div>
        </BrowserRouter>
    }
}
