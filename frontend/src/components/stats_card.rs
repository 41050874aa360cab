use yew::prelude::*;

/// Colour of the value and the accent bar.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StatTone {
    Neutral,
    Pending,
    Confirmed,
    Cancelled,
    Recent,
}

impl StatTone {
    fn classes(&self) -> &'static str {
        match self {
            StatTone::Neutral => "border-slate-400 text-slate-900",
            StatTone::Pending => "border-amber-400 text-amber-600",
            StatTone::Confirmed => "border-emerald-500 text-emerald-600",
            StatTone::Cancelled => "border-red-500 text-red-600",
            StatTone::Recent => "border-orange-500 text-orange-600",
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct StatsCardProps {
    pub label: AttrValue,
    pub value: u64,
    #[prop_or(StatTone::Neutral)]
    pub tone: StatTone,
}

#[function_component(StatsCard)]
pub fn stats_card(props: &StatsCardProps) -> Html {
    html! {
        <div
            class={classes!("rounded-xl", "border-l-4", "bg-white", "p-5", "shadow-sm", props.tone.classes())}
            role="status"
        >
            <p class="text-sm font-medium text-slate-500">{ props.label.clone() }</p>
            <strong class="mt-1 block text-3xl font-bold">{ props.value }</strong>
        </div>
    }
}
