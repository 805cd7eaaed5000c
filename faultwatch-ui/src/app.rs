//! App Root Component

use leptos::*;

use crate::components::Toast;
use crate::pages::DashboardPage;
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Charts first, then the initial history
    state.init();

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700">
                <div class="container mx-auto px-4 py-4">
                    <span class="text-xl font-bold">"Faultwatch"</span>
                </div>
            </header>

            <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                <DashboardPage />
            </main>

            <Footer />

            <Toast />
        </div>
    }
}

/// Footer showing whether a prediction is in flight
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 \
                       py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="text-gray-400">
                    {move || {
                        let count = state.dashboard.with(|d| d.charts().line().data().len());
                        format!("{} recent predictions", count)
                    }}
                </div>

                {move || {
                    if state.is_requesting() {
                        view! {
                            <div class="flex items-center space-x-2 text-orange-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Predicting..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}
