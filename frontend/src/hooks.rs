use std::{cell::RefCell, rc::Rc};

use visvas_shared::Landing;
use web_sys::{ScrollBehavior, ScrollToOptions};
use yew::prelude::*;
use yew_router::prelude::{use_location, use_navigator, Navigator};

use crate::{api, router::Route};

/// Keep a page reserved for one kind of visitor.
///
/// Returns whether the stored session lands on `expected`. When it does not,
/// the visitor is sent to the page their session lands on instead (login,
/// dashboard or welcome), so callers can render nothing while the redirect
/// happens:
/// ```rust
/// #[function_component(WelcomePage)]
/// fn welcome_page() -> Html {
///     if !use_landing_guard(Landing::Welcome) {
///         return Html::default();
///     }
///     html! { <h1>{ "Welcome" }</h1> }
/// }
/// ```
#[hook]
pub fn use_landing_guard(expected: Landing) -> bool {
    let navigator = use_navigator();
    let landing = api::session().landing();

    use_effect_with(landing, move |landing| {
        if *landing != expected {
            if let Some(navigator) = navigator {
                navigator.replace(&Route::from_landing(*landing));
            }
        }
        || ()
    });

    landing == expected
}

/// Component-owned state mutated from callbacks and async tasks.
///
/// The controllers in `visvas_shared` are plain structs whose methods hand
/// back request tickets, so they live in a `use_mut_ref` cell and every
/// mutation schedules a re-render.
pub struct Shared<T> {
    inner: Rc<RefCell<T>>,
    refresh: UseForceUpdateHandle,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

impl<T> Shared<T> {
    /// Mutate and re-render.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut self.inner.borrow_mut());
        self.refresh.force_update();
        result
    }

    /// Borrow without re-rendering.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }
}

/// Keep `init()` for the component's lifetime as a [`Shared`] handle.
#[hook]
pub fn use_shared<T, F>(init: F) -> Shared<T>
where
    T: 'static,
    F: FnOnce() -> T,
{
    let inner = use_mut_ref(init);
    let refresh = use_force_update();
    Shared {
        inner,
        refresh,
    }
}

/// Send the visitor back to the login form after the session was dropped.
pub fn redirect_to_login(navigator: Option<&Navigator>) {
    if let Some(navigator) = navigator {
        navigator.replace(&Route::AdminLogin);
    }
}

/// Automatically scroll the viewport to the top whenever the current route
/// changes.
#[hook]
pub fn use_scroll_to_top() {
    let location = use_location();

    use_effect_with(location, move |location| {
        if location.is_some() {
            scroll_window_to_top();
        }

        || ()
    });
}

fn scroll_window_to_top() {
    if let Some(window) = web_sys::window() {
        let options = ScrollToOptions::new();
        options.set_left(0.0);
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}
