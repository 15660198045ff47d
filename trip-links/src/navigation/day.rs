//! Callbacks that return to a specific day of a trip.
//!
//! Editing a plan from a trip page should land the user back on the same
//! day tab. The convention: return to `/trips/{tripId}`, fragment
//! `day-{n}`, context `{selectedDay, tripId}`, and on arrival scroll to
//! the element `day-tab-{n}`.

use serde::{Deserialize, Serialize};

use super::callback::{CallbackNavigator, ExecuteOptions};
use super::host::NavigationHost;
use super::intent::{EncodeOptions, NavigationIntent, encode_callback};

/// Context carried by a day callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayContext {
    pub selected_day: u32,
    pub trip_id: String,
}

impl DayContext {
    pub fn new(trip_id: impl Into<String>, selected_day: u32) -> Self {
        Self {
            selected_day,
            trip_id: trip_id.into(),
        }
    }

    /// Read the context back out of a decoded intent.
    pub fn from_intent(intent: &NavigationIntent) -> Option<Self> {
        serde_json::from_value(intent.context_data.clone()?).ok()
    }

    pub fn return_path(&self) -> String {
        format!("/trips/{}", self.trip_id)
    }

    pub fn fragment(&self) -> String {
        day_fragment(self.selected_day)
    }

    /// Id of the tab element to scroll to on return.
    pub fn tab_element_id(&self) -> String {
        day_tab_element_id(u64::from(self.selected_day))
    }
}

fn day_fragment(day: u32) -> String {
    format!("day-{day}")
}

fn day_tab_element_id(day: u64) -> String {
    format!("day-tab-{day}")
}

/// Link to `target_path` that returns to day `selected_day` of `trip_id`.
///
/// # Examples
///
/// ```
/// use trip_links::navigation::{create_day_callback, decode_callback, QueryParams};
///
/// let link = create_day_callback("/plans/new", "trip123", 4);
/// let (_, query) = link.split_once('?').unwrap();
/// let intent = decode_callback(&QueryParams::parse(query)).unwrap();
///
/// assert_eq!(intent.return_path, "/trips/trip123");
/// assert_eq!(intent.return_fragment.as_deref(), Some("day-4"));
/// ```
pub fn create_day_callback(target_path: &str, trip_id: &str, selected_day: u32) -> String {
    let context = DayContext::new(trip_id, selected_day);
    let options = EncodeOptions {
        fragment: Some(context.fragment()),
        context_data: serde_json::to_value(&context).ok(),
        ..EncodeOptions::default()
    };
    encode_callback(target_path, &context.return_path(), &options)
}

impl<H: NavigationHost> CallbackNavigator<H> {
    /// Execute a day callback: navigate back, tidy the URL, and scroll to
    /// the day's tab when the context names a day.
    pub fn execute_day_callback(
        &self,
        navigate: impl FnMut(&str),
        intent: &NavigationIntent,
    ) -> String {
        let selected_day = intent
            .context_data
            .as_ref()
            .and_then(|ctx| ctx.get("selectedDay"))
            .and_then(|day| day.as_u64())
            .filter(|day| *day > 0);

        let options = ExecuteOptions {
            cleanup_history: true,
            scroll_to_element_id: selected_day.map(day_tab_element_id),
        };
        self.execute(navigate, intent, &options)
    }
}
