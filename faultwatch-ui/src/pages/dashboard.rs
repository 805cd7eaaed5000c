//! Dashboard Page
//!
//! Risk donut and fault status, the sensor form, the range bars and the
//! prediction history.

use leptos::*;

use crate::api;
use crate::components::{BarChart, DonutChart, FaultStatus, LineChart, SensorForm};
use crate::state::global::GlobalState;

/// Dashboard page component
#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <div class="space-y-8">
            // Page header
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Filling Line"</h1>
                    <p class="text-gray-400 mt-1">"Fault risk from the current sensor readings"</p>
                </div>
                <ServerSetting />
            </div>

            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Sensor Readings"</h2>
                    <SensorForm />
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Fault Risk"</h2>
                    <DonutChart />
                    <FaultStatus />
                </section>
            </div>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Sensors vs Safe Range"</h2>
                <BarChart />
            </section>

            <section class="bg-gray-800 rounded-xl p-6">
                <h2 class="text-xl font-semibold mb-4">"Recent Predictions"</h2>
                <LineChart />
            </section>
        </div>
    }
}

/// Server URL, stored in local storage
#[component]
fn ServerSetting() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (api_url, set_api_url) = create_signal(api::get_api_base());

    let save_url = move |_| {
        api::set_api_base(&api_url.get());
        state.show_success("Server URL saved");
        state.refresh_logs();
    };

    view! {
        <div class="flex space-x-2">
            <input
                type="text"
                prop:value=move || api_url.get()
                on:input=move |ev| set_api_url.set(event_target_value(&ev))
                class="w-64 bg-gray-700 rounded-lg px-3 py-2 text-sm
                       border border-gray-600 focus:border-orange-500 focus:outline-none"
            />
            <button
                on:click=save_url
                class="px-4 py-2 bg-gray-600 hover:bg-gray-500 rounded-lg text-sm font-medium \
                       transition-colors"
            >
                "Save"
            </button>
        </div>
    }
}
