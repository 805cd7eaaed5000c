//! Sensor Form Component
//!
//! One text input per sensor. Fields flagged by the last submit attempt get
//! a red border until the next attempt.

use faultwatch_core::dashboard::FieldStatus;
use faultwatch_core::sensor::{SafeRange, SensorKey};
use leptos::*;

use crate::state::global::GlobalState;

/// Sensor input form
#[component]
pub fn SensorForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        state.submit();
    };

    view! {
        <form on:submit=on_submit class="space-y-4">
            <div class="grid grid-cols-2 gap-4">
                {SensorKey::ALL
                    .into_iter()
                    .map(|sensor| view! { <SensorInput sensor=sensor /> })
                    .collect::<Vec<_>>()}
            </div>

            // Overlapping submissions are allowed; only the newest reply is shown
            <button
                type="submit"
                class="w-full bg-orange-600 hover:bg-orange-700 rounded-lg py-3 font-semibold
                       transition-colors flex items-center justify-center space-x-2"
            >
                {move || if state.is_requesting() {
                    view! {
                        <div class="loading-spinner w-5 h-5" />
                        <span>"Predicting..."</span>
                    }.into_view()
                } else {
                    view! {
                        <span>"Predict"</span>
                    }.into_view()
                }}
            </button>
        </form>
    }
}

#[component]
fn SensorInput(sensor: SensorKey) -> impl IntoView {
    let key = sensor;
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let range = state.dashboard.with_untracked(|d| d.charts().ranges().get(key));

    let flagged = create_memo(move |_| {
        state.dashboard.with(|d| {
            d.validation()
                .map(|v| v.status(key).is_flagged())
                .unwrap_or(false)
        })
    });

    let hint = create_memo(move |_| {
        state.dashboard.with(|d| match d.validation().map(|v| v.status(key)) {
            Some(FieldStatus::Empty) => Some("Required".to_string()),
            Some(FieldStatus::NotANumber(raw)) => Some(format!("\"{}\" is not a number", raw)),
            _ => None,
        })
    });

    view! {
        <div>
            <label for=key.as_str() class="block text-sm text-gray-400 mb-2">
                {input_label(key)}
            </label>
            <input
                id=key.as_str()
                type="text"
                inputmode="decimal"
                placeholder=placeholder(range)
                prop:value=move || state.dashboard.with(|d| d.form().get(key).to_string())
                on:input=move |ev| state.set_field(key, event_target_value(&ev))
                class=move || {
                    let base = "w-full bg-gray-700 rounded-lg px-4 py-3 text-white \
                                focus:outline-none";
                    if flagged.get() {
                        format!("{} border-2 border-red-500", base)
                    } else {
                        format!("{} border border-gray-600 focus:border-orange-500", base)
                    }
                }
            />
            {move || hint.get().map(|text| view! {
                <p class="text-xs text-red-400 mt-1">{text}</p>
            })}
        </div>
    }
}

fn input_label(key: SensorKey) -> String {
    format!("{} ({})", key.label(), key.unit())
}

fn placeholder(range: SafeRange) -> String {
    format!("{} – {}", range.min, range.max)
}
