use visvas_shared::{
    notify::{Toast, ToastSlot},
    Landing,
};
use yew::prelude::*;
use yew_router::prelude::*;

use super::{admin_bookings::BookingsTab, admin_users::UsersTab};
use crate::{
    api,
    components::toast::ToastView,
    hooks::{use_landing_guard, use_shared},
    router::Route,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    CustomerData,
    UserManagement,
}

impl AdminTab {
    fn label(&self) -> &'static str {
        match self {
            AdminTab::CustomerData => "Customer Data",
            AdminTab::UserManagement => "User Management",
        }
    }
}

/// Admin dashboard shell: header, tab bar and the toast shared by both
/// tabs.
#[function_component(AdminPage)]
pub fn admin_page() -> Html {
    let navigator = use_navigator();
    let allowed = use_landing_guard(Landing::Dashboard);
    let active_tab = use_state(|| AdminTab::CustomerData);
    let toast = use_shared(ToastSlot::default);

    if !allowed {
        return Html::default();
    }

    let notify = {
        let toast = toast.clone();
        Callback::from(move |next: Toast| {
            toast.update(|slot| slot.show(next.message, next.kind));
        })
    };
    let on_toast_expire = {
        let toast = toast.clone();
        Callback::from(move |generation: u64| {
            toast.update(|slot| slot.expire(generation));
        })
    };
    let on_toast_close = {
        let toast = toast.clone();
        Callback::from(move |_: ()| toast.update(ToastSlot::dismiss))
    };

    let logout = Callback::from(move |_: MouseEvent| {
        api::client().logout();
        if let Some(navigator) = &navigator {
            navigator.push(&Route::from_landing(Landing::Dashboard.after_logout()));
        }
    });

    let tab_button = |tab: AdminTab| {
        let active_tab = active_tab.clone();
        let class = if *active_tab == tab {
            classes!("border-b-2", "border-orange-500", "px-1", "py-2", "text-sm", "font-medium", "text-orange-500")
        } else {
            classes!(
                "border-b-2",
                "border-transparent",
                "px-1",
                "py-2",
                "text-sm",
                "font-medium",
                "text-slate-400",
                "hover:border-slate-300",
                "hover:text-slate-300"
            )
        };
        html! {
            <button type="button" class={class} onclick={Callback::from(move |_| active_tab.set(tab))}>
                { tab.label() }
            </button>
        }
    };

    html! {
        <div class="min-h-screen bg-slate-900">
            <header class="border-b border-slate-700 bg-slate-800">
                <div class="mx-auto flex max-w-7xl items-center justify-between px-4 py-4">
                    <div class="flex items-center gap-3">
                        <img src="/visvas_logo.png" alt="Visvas Construction Logo" class="h-10 w-auto" />
                        <h1 class="text-xl font-bold text-white">{ "Admin Dashboard" }</h1>
                    </div>
                    <button type="button" class="rounded-lg bg-red-600 px-4 py-2 text-sm text-white hover:bg-red-700" onclick={logout}>
                        { "Logout" }
                    </button>
                </div>
            </header>

            <main class="mx-auto max-w-7xl px-4 py-8">
                <nav class="mb-6 flex gap-8 border-b border-slate-700">
                    { tab_button(AdminTab::CustomerData) }
                    { tab_button(AdminTab::UserManagement) }
                </nav>

                {
                    match *active_tab {
                        AdminTab::CustomerData => html! { <BookingsTab notify={notify.clone()} /> },
                        AdminTab::UserManagement => html! { <UsersTab notify={notify.clone()} /> },
                    }
                }
            </main>

            <ToastView slot={toast.read(Clone::clone)} on_expire={on_toast_expire} on_close={on_toast_close} />
        </div>
    }
}
