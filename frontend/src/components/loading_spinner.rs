use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoadingSpinnerProps {
    /// Announced to screen readers.
    #[prop_or(AttrValue::Static("Loading..."))]
    pub label: AttrValue,
}

/// Spinner shown in place of a table while its rows load.
#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &LoadingSpinnerProps) -> Html {
    html! {
        <div
            class="flex items-center justify-center p-6"
            role="status"
            aria-live="polite"
            aria-busy="true"
        >
            <div class="h-14 w-14 animate-spin rounded-full border-4 border-orange-200 border-t-orange-500" />
            <span class="sr-only">{ props.label.clone() }</span>
        </div>
    }
}
