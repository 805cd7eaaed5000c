//! Fault Status Component
//!
//! Code and description of the last applied prediction, shown verbatim.

use leptos::*;

use crate::state::global::GlobalState;

#[component]
pub fn FaultStatus() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let code = move || state.dashboard.with(|d| d.fault().error_code.clone());
    let description = move || state.dashboard.with(|d| d.fault().error_description.clone());

    view! {
        <div class="text-center mt-4 space-y-1">
            <div class="text-sm text-gray-400">"Fault code"</div>
            <div id="errCode" class="text-2xl font-mono font-bold">{code}</div>
            <div id="errDesc" class="text-gray-300">{description}</div>
        </div>
    }
}
