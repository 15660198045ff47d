//! URL-encoded navigation callbacks.
//!
//! Multi-step flows (open a plan editor, save, come back to the exact trip
//! and day you were looking at) survive full page loads by writing the
//! "return to" instruction into the link itself. There is no session
//! storage: the query string is the only state.
//!
//! Reserved query keys are `returnPath`, `returnQuery` (JSON object),
//! `returnFragment`, `contextData` (JSON), and, on the destination page
//! only, `error`.
//!
//! Reading the current location and history goes through
//! [`NavigationHost`], so everything here runs without a browser.

mod callback;
mod config;
mod day;
mod error;
mod host;
mod intent;
mod memory;
mod query;

pub use callback::{
    BackAction, CallbackHandle, CallbackNavigator, CurrentLocationOptions, ErrorCallbackOptions,
    ExecuteOptions,
};
pub use config::NavigationConfig;
pub use day::{DayContext, create_day_callback};
pub use error::DecodeError;
pub use host::{Delay, NavigationHost, PendingCleanup};
pub use intent::{
    EncodeOptions, NavigationIntent, decode_callback, decode_callback_strict, encode_callback,
};
pub use memory::{MemoryHost, MemoryState};
pub use query::{
    CONTEXT_DATA, ERROR, QueryParams, RETURN_FRAGMENT, RETURN_PATH, RETURN_QUERY,
    is_callback_key,
};
