use visvas_shared::bookings::Pagination as PageInfo;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub info: PageInfo,
    pub on_page_change: Callback<usize>,
    /// Disable every button while a page is loading.
    #[prop_or_default]
    pub disabled: bool,
}

enum PageSlot {
    Page(usize),
    Ellipsis(&'static str),
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let info = props.info.normalized();
    let summary = match info.showing_range() {
        Some((first, last)) => format!("Showing {first} to {last} of {} results", info.total_count),
        None => "No results".to_string(),
    };
    if info.total_pages <= 1 {
        return html! { <p class="text-sm text-slate-500">{ summary }</p> };
    }

    let total_pages = info.total_pages;
    let current_page = info.current_page;
    let slots = visible_slots(current_page, total_pages);
    let on_page_change = props.on_page_change.clone();

    let prev_disabled = props.disabled || !info.has_prev();
    let next_disabled = props.disabled || !info.has_next();

    let prev_onclick = {
        let on_page_change = on_page_change.clone();
        Callback::from(move |_| {
            if current_page > 1 {
                on_page_change.emit(current_page - 1);
            }
        })
    };

    let next_onclick = {
        let on_page_change = on_page_change.clone();
        Callback::from(move |_| {
            if current_page < total_pages {
                on_page_change.emit(current_page + 1);
            }
        })
    };

    let base_btn_classes = classes!(
        "inline-flex",
        "items-center",
        "justify-center",
        "min-w-[2.5rem]",
        "h-9",
        "px-3",
        "rounded-lg",
        "border",
        "border-slate-300",
        "bg-white",
        "text-slate-700",
        "text-sm",
        "font-medium",
        "transition-colors",
        "hover:border-orange-500",
        "hover:text-orange-600",
        "disabled:opacity-50",
        "disabled:cursor-not-allowed"
    );

    let prev_classes = classes!(base_btn_classes.clone(), "min-w-[5.5rem]");

    let next_classes = classes!(base_btn_classes.clone(), "min-w-[5.5rem]");

    html! {
        <div class="flex flex-wrap items-center justify-between gap-3">
        <p class="text-sm text-slate-500">{ summary }</p>
        <nav class="flex flex-wrap items-center gap-2" aria-label="Pagination">
            <button
                type="button"
                class={prev_classes}
                disabled={prev_disabled}
                onclick={prev_onclick}
                aria-label="Previous page"
            >
                {"Previous"}
            </button>
            <div class={classes!("flex", "flex-wrap", "items-center", "gap-2")}>
                { for slots.into_iter().map(|slot| match slot {
                    PageSlot::Page(page) => {
                        let page_classes = classes!(
                            base_btn_classes.clone(),
                            if page == current_page {
                                "bg-orange-500 text-white border-transparent cursor-default pointer-events-none"
                            } else {
                                ""
                            }
                        );
                        let onclick = {
                            let on_page_change = on_page_change.clone();
                            Callback::from(move |_| on_page_change.emit(page))
                        };

                        html! {
                            <button
                                key={format!("page-{page}")}
                                type="button"
                                class={page_classes.clone()}
                                aria-label={format!("Go to page {page}")}
                                aria-current={if page == current_page {
                                    Some(AttrValue::from("page"))
                                } else {
                                    None
                                }}
                                disabled={props.disabled || page == current_page}
                                onclick={onclick}
                            >
                                { page }
                            </button>
                        }
                    }
                    PageSlot::Ellipsis(id) => {
                        let ellipsis_classes = classes!(
                            base_btn_classes.clone(),
                            "select-none",
                            "cursor-default",
                            "opacity-60",
                            "pointer-events-none"
                        );
                        html! {
                            <span
                                key={format!("ellipsis-{id}-{current_page}")}
                                class={ellipsis_classes}
                                aria-hidden="true"
                            >
                                {"..."}
                            </span>
                        }
                    }
                }) }
            </div>
            <button
                type="button"
                class={next_classes}
                disabled={next_disabled}
                onclick={next_onclick}
                aria-label="Next page"
            >
                {"Next"}
            </button>
        </nav>
        </div>
    }
}

fn visible_slots(current: usize, total: usize) -> Vec<PageSlot> {
    if total <= 7 {
        return (1..=total).map(PageSlot::Page).collect();
    }

    let mut slots = Vec::new();
    slots.push(PageSlot::Page(1));

    let mut start = current.saturating_sub(2).max(2);
    let mut end = (current + 2).min(total - 1);

    if current <= 3 {
        start = 2;
        end = 5;
    } else if current + 2 >= total {
        start = total.saturating_sub(4).max(2);
        end = total - 1;
    }

    if start > 2 {
        slots.push(PageSlot::Ellipsis("left"));
    }

    for page in start..=end {
        slots.push(PageSlot::Page(page));
    }

    if end < total - 1 {
        slots.push(PageSlot::Ellipsis("right"));
    }

    slots.push(PageSlot::Page(total));

    slots
}
