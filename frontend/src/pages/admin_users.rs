use std::str::FromStr;

use visvas_shared::{
    api::ApiError,
    fetch::{FetchOutcome, LoadState},
    models::{ManagedUser, Role},
    notify::{ConfirmAction, ConfirmationSlot, Toast, ToastKind},
    users::{UserManagementController, UserSubmission},
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_hooks::prelude::use_mount;
use yew_router::prelude::{use_navigator, Navigator};

use crate::{
    api,
    components::{
        confirmation_modal::ConfirmationModal,
        loading_spinner::LoadingSpinner,
    },
    hooks::{redirect_to_login, use_shared, Shared},
    utils::log_error,
};

#[derive(Properties, PartialEq)]
pub struct UsersTabProps {
    pub notify: Callback<Toast>,
}

fn role_badge_class(role: Role) -> Classes {
    let base = classes!("inline-flex", "rounded-full", "px-2", "py-1", "text-xs");
    match role {
        Role::Admin => classes!(base, "bg-purple-100", "text-purple-800"),
        Role::User => classes!(base, "bg-blue-100", "text-blue-800"),
    }
}

/// Backend detail for rejections, a fixed line for everything else.
fn failure_message(action: &str, err: &ApiError) -> String {
    match err {
        ApiError::RequestRejected {
            ..
        } => format!("Failed to {action} user: {}", err.user_message()),
        _ => format!("Failed to {action} user"),
    }
}

fn toast(kind: ToastKind, message: impl Into<String>) -> Toast {
    Toast {
        message: message.into(),
        kind,
    }
}

fn load_users(controller: Shared<UserManagementController>, navigator: Option<Navigator>) {
    let generation = controller.update(UserManagementController::begin_load);
    wasm_bindgen_futures::spawn_local(async move {
        let result = api::client().fetch_users().await;
        match controller.update(|c| c.finish_load(generation, result)) {
            FetchOutcome::SessionExpired => redirect_to_login(navigator.as_ref()),
            FetchOutcome::Failed(message) => log_error(&message),
            FetchOutcome::Applied | FetchOutcome::Stale => {},
        }
    });
}

/// "User Management" tab. Mounted only while active, so every activation
/// refetches the list.
#[function_component(UsersTab)]
pub fn users_tab(props: &UsersTabProps) -> Html {
    let navigator = use_navigator();
    let controller = use_shared(UserManagementController::new);
    let confirmation = use_shared(ConfirmationSlot::default);
    let saving = use_state(|| false);
    let show_password = use_state(|| false);

    {
        let controller = controller.clone();
        let navigator = navigator.clone();
        use_mount(move || load_users(controller, navigator));
    }

    let on_email = {
        let controller = controller.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                controller.update(|c| c.form_mut().email = input.value());
            }
        })
    };
    let on_password = {
        let controller = controller.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                controller.update(|c| c.form_mut().password = input.value());
            }
        })
    };
    let on_role = {
        let controller = controller.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>() {
                if let Ok(role) = Role::from_str(&select.value()) {
                    controller.update(|c| c.form_mut().role = role);
                }
            }
        })
    };
    let toggle_password = {
        let show_password = show_password.clone();
        Callback::from(move |_: MouseEvent| show_password.set(!*show_password))
    };
    let on_cancel_edit = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.update(UserManagementController::cancel_edit))
    };

    let on_submit = {
        let controller = controller.clone();
        let navigator = navigator.clone();
        let notify = props.notify.clone();
        let saving = saving.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *saving {
                return;
            }
            let submission = match controller.read(UserManagementController::submission) {
                Ok(submission) => submission,
                Err(errors) => {
                    if let Some(first) = errors.first() {
                        notify.emit(toast(ToastKind::Error, first.message.clone()));
                    }
                    return;
                },
            };

            saving.set(true);
            let controller = controller.clone();
            let navigator = navigator.clone();
            let notify = notify.clone();
            let saving = saving.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let client = api::client();
                let (action, result) = match &submission {
                    UserSubmission::Create(payload) => ("create", client.create_user(payload).await),
                    UserSubmission::Update {
                        id,
                        payload,
                    } => ("update", client.update_user(id, payload).await),
                };
                saving.set(false);
                match result {
                    Ok(user) => {
                        controller.update(|c| match submission {
                            UserSubmission::Create(_) => c.apply_created(user),
                            UserSubmission::Update {
                                ..
                            } => c.apply_updated(user),
                        });
                        notify.emit(toast(ToastKind::Success, format!("User {action}d successfully")));
                    },
                    Err(err) if err.requires_login() => redirect_to_login(navigator.as_ref()),
                    Err(err) => {
                        log_error(&format!("User {action} error: {err}"));
                        notify.emit(toast(ToastKind::Error, failure_message(action, &err)));
                    },
                }
            });
        })
    };

    let ask_delete = |id: String| {
        let controller = controller.clone();
        let confirmation = confirmation.clone();
        Callback::from(move |_: MouseEvent| {
            let dialog = controller.read(|c| c.delete_confirmation(&id));
            confirmation.update(|slot| slot.open(dialog));
        })
    };

    let start_edit = |user: ManagedUser| {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.update(|c| c.start_edit(&user)))
    };

    let on_confirm = {
        let controller = controller.clone();
        let confirmation = confirmation.clone();
        let navigator = navigator.clone();
        let notify = props.notify.clone();
        Callback::from(move |_: ()| {
            let Some(ConfirmAction::DeleteUser {
                id,
            }) = confirmation.update(ConfirmationSlot::begin_confirm)
            else {
                return;
            };
            let controller = controller.clone();
            let confirmation = confirmation.clone();
            let navigator = navigator.clone();
            let notify = notify.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = api::client().delete_user(&id).await;
                confirmation.update(ConfirmationSlot::finish);
                match result {
                    Ok(()) => {
                        controller.update(|c| c.apply_deleted(&id));
                        notify.emit(toast(ToastKind::Success, "User deleted successfully"));
                    },
                    Err(err) if err.requires_login() => redirect_to_login(navigator.as_ref()),
                    Err(err) => {
                        log_error(&format!("User delete error: {err}"));
                        notify.emit(toast(ToastKind::Error, failure_message("delete", &err)));
                    },
                }
            });
        })
    };

    let on_cancel_confirm = {
        let confirmation = confirmation.clone();
        Callback::from(move |_: ()| {
            confirmation.update(ConfirmationSlot::cancel);
        })
    };

    let (form, editing, users, state) = controller.read(|c| {
        (c.form().clone(), c.editing().is_some(), c.users().to_vec(), c.state().clone())
    });
    let dialog = confirmation.read(|slot| slot.current().cloned());

    let field_classes = "w-full rounded-lg border border-slate-600 bg-slate-700 px-3 py-2 text-white focus:outline-none focus:ring-2 focus:ring-orange-500";
    let header_cell = "px-6 py-3 text-left text-xs font-medium uppercase tracking-wider text-slate-300";
    let cell = "whitespace-nowrap px-6 py-4 text-sm text-slate-300";

    let table = match &state {
        LoadState::Loading if users.is_empty() => html! {
            <div class="py-12"><LoadingSpinner label="Loading users..." /></div>
        },
        LoadState::Failed(message) if users.is_empty() => html! {
            <p class="py-12 text-center text-red-300">{ message.clone() }</p>
        },
        _ if users.is_empty() => html! {
            <p class="py-12 text-center text-slate-400">{ "No users found" }</p>
        },
        _ => html! {
            <div class="overflow-x-auto">
                <table class="min-w-full divide-y divide-slate-700">
                    <thead class="bg-slate-900">
                        <tr>
                            { for ["Email", "Role", "Last Login", "Status", "Actions"]
                                .iter()
                                .map(|label| html! { <th class={header_cell}>{ *label }</th> }) }
                        </tr>
                    </thead>
                    <tbody class="divide-y divide-slate-700">
                        { for users.iter().map(|user| html! {
                            <tr key={user.id.clone()} class="hover:bg-slate-700">
                                <td class="whitespace-nowrap px-6 py-4 text-sm font-medium text-white">{ user.email.clone() }</td>
                                <td class={cell}><span class={role_badge_class(user.role)}>{ user.role.as_str() }</span></td>
                                <td class={cell}>{ user.last_login_label() }</td>
                                <td class={cell}>
                                    if user.is_active {
                                        <span class="rounded-full bg-green-100 px-2 py-1 text-xs text-green-800">{ "Active" }</span>
                                    } else {
                                        <span class="rounded-full bg-red-100 px-2 py-1 text-xs text-red-800">{ "Inactive" }</span>
                                    }
                                </td>
                                <td class="whitespace-nowrap px-6 py-4 text-sm">
                                    <div class="flex gap-2">
                                        <button type="button" class="rounded bg-blue-600 px-3 py-1 text-xs text-white hover:bg-blue-700"
                                            onclick={start_edit(user.clone())}>
                                            { "Edit" }
                                        </button>
                                        <button type="button" class="rounded bg-red-600 px-3 py-1 text-xs text-white hover:bg-red-700"
                                            onclick={ask_delete(user.id.clone())}>
                                            { "Delete" }
                                        </button>
                                    </div>
                                </td>
                            </tr>
                        }) }
                    </tbody>
                </table>
            </div>
        },
    };

    html! {
        <div class="space-y-6">
            <div class="rounded-lg border border-slate-700 bg-slate-800 p-6">
                <h3 class="mb-4 text-lg font-semibold text-white">
                    { if editing { "Edit User" } else { "Create New User" } }
                </h3>
                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="grid grid-cols-1 gap-4 md:grid-cols-3">
                        <label class="block space-y-2">
                            <span class="text-sm font-medium text-slate-300">{ "Email" }</span>
                            <input type="email" class={field_classes} value={form.email.clone()} oninput={on_email} />
                        </label>
                        <label class="block space-y-2">
                            <span class="text-sm font-medium text-slate-300">
                                { if editing { "Password (leave blank to keep)" } else { "Password" } }
                            </span>
                            <div class="relative">
                                <input
                                    type={if *show_password { "text" } else { "password" }}
                                    class={field_classes}
                                    value={form.password.clone()}
                                    oninput={on_password}
                                />
                                <button type="button" class="absolute inset-y-0 right-0 pr-3 text-xs text-slate-400 hover:text-slate-200"
                                    onclick={toggle_password}>
                                    { if *show_password { "Hide" } else { "Show" } }
                                </button>
                            </div>
                        </label>
                        <label class="block space-y-2">
                            <span class="text-sm font-medium text-slate-300">{ "Role" }</span>
                            <select class={field_classes} onchange={on_role}>
                                <option value="user" selected={form.role == Role::User}>{ "User" }</option>
                                <option value="admin" selected={form.role == Role::Admin}>{ "Admin" }</option>
                            </select>
                        </label>
                    </div>
                    <div class="flex gap-2">
                        <button type="submit" class="rounded-lg bg-orange-500 px-4 py-2 text-white hover:bg-orange-600 disabled:opacity-60"
                            disabled={*saving}>
                            { if editing { "Update User" } else { "Create User" } }
                        </button>
                        if editing {
                            <button type="button" class="rounded-lg bg-slate-600 px-4 py-2 text-white hover:bg-slate-700"
                                onclick={on_cancel_edit}>
                                { "Cancel" }
                            </button>
                        }
                    </div>
                </form>
            </div>

            <div class="overflow-hidden rounded-lg border border-slate-700 bg-slate-800">
                { table }
            </div>

            <ConfirmationModal
                confirmation={dialog}
                on_confirm={on_confirm}
                on_cancel={on_cancel_confirm}
                confirm_text="Delete"
                cancel_text="Cancel"
            />
        </div>
    }
}
