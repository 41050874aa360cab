use visvas_shared::notify::{ConfirmKind, Confirmation};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConfirmationModalProps {
    pub confirmation: Option<Confirmation>,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
    #[prop_or(AttrValue::from("Yes"))]
    pub confirm_text: AttrValue,
    #[prop_or(AttrValue::from("No"))]
    pub cancel_text: AttrValue,
}

#[function_component(ConfirmationModal)]
pub fn confirmation_modal(props: &ConfirmationModalProps) -> Html {
    let Some(confirmation) = props.confirmation.as_ref() else {
        return Html::default();
    };
    let pending = confirmation.pending;

    let (icon, confirm_classes) = match confirmation.kind {
        ConfirmKind::Danger => ("⚠️", "bg-red-600 hover:bg-red-700"),
        ConfirmKind::Success => ("✅", "bg-emerald-600 hover:bg-emerald-700"),
        ConfirmKind::Warning => ("❗", "bg-amber-500 hover:bg-amber-600"),
    };

    let on_backdrop = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_| {
            if !pending {
                on_cancel.emit(());
            }
        })
    };
    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_| on_cancel.emit(()))
    };
    let on_confirm = {
        let on_confirm = props.on_confirm.clone();
        Callback::from(move |_| on_confirm.emit(()))
    };
    let stop = Callback::from(|event: MouseEvent| event.stop_propagation());

    html! {
        <div
            class="fixed inset-0 z-40 flex items-center justify-center bg-black/50 px-4"
            onclick={on_backdrop}
        >
            <div
                class="w-full max-w-md rounded-2xl bg-white p-6 shadow-2xl"
                role="dialog"
                aria-modal="true"
                onclick={stop}
            >
                <div class="flex items-start gap-3">
                    <span class="text-2xl" aria-hidden="true">{ icon }</span>
                    <div class="space-y-2">
                        <h3 class="text-lg font-semibold text-slate-900">
                            { confirmation.title.clone() }
                        </h3>
                        <p class="text-sm text-slate-600">{ confirmation.message.clone() }</p>
                    </div>
                </div>
                <div class="mt-6 flex justify-end gap-3">
                    <button
                        type="button"
                        class="rounded-lg border border-slate-300 px-4 py-2 text-sm disabled:opacity-50"
                        disabled={pending}
                        onclick={on_cancel}
                    >
                        { props.cancel_text.clone() }
                    </button>
                    <button
                        type="button"
                        class={classes!(
                            "rounded-lg",
                            "px-4",
                            "py-2",
                            "text-sm",
                            "font-semibold",
                            "text-white",
                            "disabled:opacity-50",
                            confirm_classes
                        )}
                        disabled={pending}
                        onclick={on_confirm}
                    >
                        if pending {
                            { "Processing..." }
                        } else {
                            { props.confirm_text.clone() }
                        }
                    </button>
                </div>
            </div>
        </div>
    }
}
