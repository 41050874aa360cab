use visvas_shared::notify::ToastSlot;
use yew::prelude::*;

use crate::{
    components::{book_meeting_modal::BookMeetingModal, header::Header, toast::ToastView},
    hooks::use_shared,
};

const STEPS: [(&str, &str); 6] = [
    ("Raise a Request", "Submit your project details and requirements to get started."),
    ("Meet Our Expert", "Connect with our specialists to discuss your vision."),
    ("Book with Us", "Schedule a consultation and confirm your project timeline."),
    ("Receive Designs", "Get customized designs tailored to your needs."),
    ("Track & Transact", "Monitor progress and handle payments seamlessly."),
    ("Settle In", "Complete your project and enjoy the results."),
];

/// Public landing page. Owns the booking modal and the toast that
/// announces a received booking.
#[function_component(HomePage)]
pub fn home_page() -> Html {
    let modal_open = use_state(|| false);
    let toast = use_shared(ToastSlot::default);

    let open_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| modal_open.set(true))
    };
    let close_modal = {
        let modal_open = modal_open.clone();
        Callback::from(move |_: ()| modal_open.set(false))
    };
    let on_booked = {
        let toast = toast.clone();
        Callback::from(move |message: String| {
            toast.update(|slot| slot.success(message));
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
    let hero_cta = {
        let open_modal = open_modal.clone();
        Callback::from(move |_: MouseEvent| open_modal.emit(()))
    };

    html! {
        <>
            <Header on_book_meeting={open_modal} />
            <main>
                <section class="mx-auto grid max-w-7xl items-center gap-10 px-4 py-16 lg:grid-cols-2 lg:py-24">
                    <div class="text-center lg:text-left">
                        <h1 class="text-4xl font-bold text-slate-900 lg:text-6xl">{ "Your Wish." }</h1>
                        <h2 class="mb-6 text-4xl font-bold text-slate-900 lg:text-6xl">{ "We Fulfill." }</h2>
                        <p class="mb-8 text-lg text-slate-600 lg:text-xl">
                            { "Build your dream home hassle-free with Visvas Construction Contracting Company." }
                        </p>
                        <button
                            type="button"
                            class="rounded-lg bg-orange-500 px-8 py-3 text-lg font-semibold text-white hover:bg-orange-600"
                            onclick={hero_cta}
                        >
                            { "Book a Meeting" }
                        </button>
                    </div>
                    <img src="/hero.png" alt="Visvas Construction home" class="w-full rounded-2xl object-cover" />
                </section>

                <section class="bg-white py-16">
                    <div class="mx-auto max-w-7xl px-4">
                        <h2 class="mb-10 text-center text-3xl font-bold text-slate-900">{ "How It Works" }</h2>
                        <ol class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
                            { for STEPS.iter().enumerate().map(|(index, (title, description))| html! {
                                <li class="rounded-xl border border-slate-200 p-6">
                                    <span class="mb-3 flex h-10 w-10 items-center justify-center rounded-full bg-orange-500 font-bold text-white">
                                        { index + 1 }
                                    </span>
                                    <h3 class="text-lg font-semibold text-slate-900">{ *title }</h3>
                                    <p class="mt-1 text-sm text-slate-600">{ *description }</p>
                                </li>
                            }) }
                        </ol>
                    </div>
                </section>
            </main>

            <BookMeetingModal open={*modal_open} on_close={close_modal} on_success={on_booked} />
            <ToastView slot={toast.read(Clone::clone)} on_expire={on_toast_expire} on_close={on_toast_close} />
        </>
    }
}
