use gloo_timers::callback::Timeout;
use visvas_shared::notify::{ToastKind, ToastSlot, TOAST_DURATION_MS};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub slot: ToastSlot,
    /// Fired with the toast's generation once its timer runs out.
    pub on_expire: Callback<u64>,
    pub on_close: Callback<()>,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastProps) -> Html {
    {
        let on_expire = props.on_expire.clone();
        let generation = props.slot.generation();
        let visible = props.slot.is_visible();
        // A new toast restarts the timer; dropping the old Timeout cancels it.
        use_effect_with((generation, visible), move |(generation, visible)| {
            let generation = *generation;
            let timer = (*visible)
                .then(|| Timeout::new(TOAST_DURATION_MS, move || on_expire.emit(generation)));
            move || drop(timer)
        });
    }

    let Some(toast) = props.slot.current() else {
        return Html::default();
    };

    let (accent, icon) = match toast.kind {
        ToastKind::Success => ("border-emerald-500 bg-emerald-50 text-emerald-800", "✓"),
        ToastKind::Error => ("border-red-500 bg-red-50 text-red-800", "✕"),
        ToastKind::Warning => ("border-amber-500 bg-amber-50 text-amber-800", "!"),
    };

    let close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <div class="fixed top-4 right-4 z-50 w-full max-w-sm">
            <div
                class={classes!(
                    "flex",
                    "items-start",
                    "gap-3",
                    "rounded-xl",
                    "border-l-4",
                    "px-4",
                    "py-3",
                    "shadow-xl",
                    accent
                )}
                role="alert"
                aria-live="assertive"
            >
                <span class="text-xl font-bold" aria-hidden="true">{ icon }</span>
                <div class="flex-1 space-y-1">
                    <p class="font-semibold">{ toast.kind.title() }</p>
                    <p class="text-sm">{ toast.message.clone() }</p>
                </div>
                <button
                    type="button"
                    class="ml-2 h-7 w-7 rounded-full text-lg hover:bg-black/10"
                    aria-label="Close notification"
                    onclick={close_button}
                >
                    {"×"}
                </button>
            </div>
        </div>
    }
}
