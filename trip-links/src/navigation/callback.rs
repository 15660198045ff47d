//! Acting on navigation intents: going back, capturing the current page,
//! and recovering from failed operations.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::config::NavigationConfig;
use super::host::{NavigationHost, PendingCleanup};
use super::intent::{EncodeOptions, NavigationIntent, decode_callback, encode_callback};
use super::query::{QueryParams, RelativeUrl, is_callback_key};

/// Options for [`CallbackNavigator::execute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// After navigating, drop the fragment from the visible URL.
    pub cleanup_history: bool,
    /// After navigating, scroll this element into view.
    pub scroll_to_element_id: Option<String>,
}

/// Options for [`CallbackNavigator::create_from_current_location`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentLocationOptions {
    pub preserve_query: bool,
    pub preserve_fragment: bool,
    pub context_data: Option<Value>,
}

/// Options for [`CallbackNavigator::handle_error_with_callback`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCallbackOptions {
    /// Overrides [`NavigationConfig::error_redirect_delay_ms`].
    pub delay: Option<Duration>,
    /// Overrides [`NavigationConfig::fallback_path`].
    pub fallback_path: Option<String>,
    /// Carry an error marker to the destination page.
    pub preserve_error_state: bool,
}

/// What a back-navigation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackAction {
    /// An encoded intent was executed; holds the URL navigated to.
    Callback(String),
    /// The host stepped back through its history.
    History,
    /// Nothing to go back to; holds the fallback URL navigated to.
    Fallback(String),
}

/// Executes navigation intents against a [`NavigationHost`].
///
/// `navigate` closures passed to the methods are the router's push
/// function; the host is only used for reading the current location,
/// history, and deferred cleanup.
#[derive(Debug, Clone)]
pub struct CallbackNavigator<H> {
    host: H,
    config: NavigationConfig,
}

impl<H: NavigationHost> CallbackNavigator<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, NavigationConfig::default())
    }

    pub fn with_config(host: H, config: NavigationConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Navigate to the intent's return URL.
    ///
    /// With `cleanup_history`, a [`PendingCleanup`] is handed to the host
    /// to strip the fragment (if one was used) and scroll to
    /// `scroll_to_element_id` (if set) after the navigation has rendered.
    pub fn execute(
        &self,
        mut navigate: impl FnMut(&str),
        intent: &NavigationIntent,
        options: &ExecuteOptions,
    ) -> String {
        let target = intent.return_url();
        debug!(%target, "executing navigation callback");
        navigate(&target);

        if options.cleanup_history {
            let cleanup = PendingCleanup {
                replace_url: intent
                    .return_fragment
                    .as_ref()
                    .map(|_| intent.return_url_without_fragment()),
                scroll_to: options.scroll_to_element_id.clone(),
            };
            if !cleanup.is_empty() {
                self.host.defer(cleanup, self.config.cleanup_delay());
            }
        }

        target
    }

    /// Link to `target_path` that returns to the page we're on now.
    ///
    /// The current query is carried over only with `preserve_query`, minus
    /// any callback keys so links don't nest; likewise the fragment with
    /// `preserve_fragment`.
    pub fn create_from_current_location(
        &self,
        target_path: &str,
        options: &CurrentLocationOptions,
    ) -> String {
        let mut encode = EncodeOptions::new();

        if options.preserve_query {
            encode.query = self
                .host
                .current_query()
                .iter()
                .filter(|(k, _)| !is_callback_key(k))
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect();
        }

        if options.preserve_fragment {
            encode.fragment = self.host.current_fragment().filter(|f| !f.is_empty());
        }

        encode.context_data = options.context_data.clone();

        encode_callback(target_path, &self.host.current_path(), &encode)
    }

    /// Go back the best way available.
    ///
    /// 1. An intent in `params` is executed with history cleanup.
    /// 2. Otherwise, with more than one history entry, the host goes back.
    /// 3. Otherwise `fallback_path` is navigated to.
    ///
    /// Always safe to call from a cancel/close control.
    pub fn smart_go_back(
        &self,
        mut navigate: impl FnMut(&str),
        params: &QueryParams,
        fallback_path: &str,
    ) -> BackAction {
        if let Some(intent) = decode_callback(params) {
            let options = ExecuteOptions {
                cleanup_history: true,
                scroll_to_element_id: None,
            };
            return BackAction::Callback(self.execute(navigate, &intent, &options));
        }

        if self.host.history_length() > 1 {
            debug!("no callback; going back through history");
            self.host.go_back();
            return BackAction::History;
        }

        debug!(fallback_path, "no callback or history; using fallback");
        navigate(fallback_path);
        BackAction::Fallback(fallback_path.to_owned())
    }

    /// Wait, then leave a page whose operation failed.
    ///
    /// The delay gives the user time to read an inline error. With
    /// `preserve_error_state` the configured error marker is added to the
    /// return query (or to the fallback path when there is no intent);
    /// otherwise this is [`smart_go_back`](Self::smart_go_back).
    ///
    /// The wait runs on [`NavigationHost::sleep`], so any executor that can
    /// drive the host's timer works. Callers that don't want to wait on it
    /// can spawn the future locally.
    pub async fn handle_error_with_callback(
        &self,
        mut navigate: impl FnMut(&str),
        params: &QueryParams,
        options: &ErrorCallbackOptions,
    ) -> BackAction {
        let delay = options
            .delay
            .unwrap_or_else(|| self.config.error_redirect_delay());
        let fallback = options
            .fallback_path
            .as_deref()
            .unwrap_or(&self.config.fallback_path);

        self.host.sleep(delay).await;

        if !options.preserve_error_state {
            return self.smart_go_back(navigate, params, fallback);
        }

        let (marker_key, marker_value) = &self.config.error_marker;

        match decode_callback(params) {
            Some(mut intent) => {
                intent
                    .return_query
                    .get_or_insert_default()
                    .insert(marker_key.clone(), marker_value.clone());
                let options = ExecuteOptions {
                    cleanup_history: true,
                    scroll_to_element_id: None,
                };
                BackAction::Callback(self.execute(navigate, &intent, &options))
            }
            None => {
                let mut url = RelativeUrl::parse(fallback);
                url.query.set(marker_key.as_str(), marker_value.as_str());
                let target = url.path_and_query();
                debug!(%target, "no callback after error; using fallback");
                navigate(&target);
                BackAction::Fallback(target)
            }
        }
    }

    /// Bind the navigator to one page's query parameters.
    pub fn handle(&self, params: QueryParams) -> CallbackHandle<'_, H> {
        CallbackHandle {
            navigator: self,
            intent: decode_callback(&params),
            params,
        }
    }
}

/// A page's view of its incoming callback, decoded once.
#[derive(Debug)]
pub struct CallbackHandle<'a, H> {
    navigator: &'a CallbackNavigator<H>,
    params: QueryParams,
    intent: Option<NavigationIntent>,
}

impl<H: NavigationHost> CallbackHandle<'_, H> {
    pub fn has_callback(&self) -> bool {
        self.intent.is_some()
    }

    pub fn intent(&self) -> Option<&NavigationIntent> {
        self.intent.as_ref()
    }

    /// Execute the callback with history cleanup. Returns the URL
    /// navigated to, or `None` (and does nothing) without a callback.
    pub fn execute(&self, navigate: impl FnMut(&str)) -> Option<String> {
        let intent = self.intent.as_ref()?;
        let options = ExecuteOptions {
            cleanup_history: true,
            scroll_to_element_id: None,
        };
        Some(self.navigator.execute(navigate, intent, &options))
    }

    /// [`CallbackNavigator::smart_go_back`] with the configured fallback
    /// unless one is given.
    pub fn smart_go_back(
        &self,
        navigate: impl FnMut(&str),
        fallback_path: Option<&str>,
    ) -> BackAction {
        let fallback = fallback_path.unwrap_or(&self.navigator.config.fallback_path);
        self.navigator.smart_go_back(navigate, &self.params, fallback)
    }

    pub async fn handle_error_with_callback(
        &self,
        navigate: impl FnMut(&str),
        options: &ErrorCallbackOptions,
    ) -> BackAction {
        self.navigator
            .handle_error_with_callback(navigate, &self.params, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::navigation::MemoryHost;
    use serde_json::json;

    /// Collects every path handed to `navigate`.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Recorder {
        fn navigate(&mut self) -> impl FnMut(&str) + '_ {
            move |path: &str| self.0.push(path.to_owned())
        }
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs.iter().copied().collect()
    }

    fn intent_with_fragment() -> NavigationIntent {
        let mut intent = NavigationIntent::new("/trips/1");
        intent.return_query = Some(BTreeMap::from([("tab".to_owned(), "plans".to_owned())]));
        intent.return_fragment = Some("day-2".to_owned());
        intent
    }

    #[test]
    fn execute_keeps_valueless_return_query() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();
        let intent = decode_callback(&params(&[("returnPath", "/a?flag")])).unwrap();

        nav.execute(rec.navigate(), &intent, &ExecuteOptions::default());

        assert_eq!(rec.0, vec!["/a?flag".to_owned()]);
    }

    #[test]
    fn execute_navigates_to_full_url() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();

        let target = nav.execute(rec.navigate(), &intent_with_fragment(), &ExecuteOptions::default());

        assert_eq!(target, "/trips/1?tab=plans#day-2");
        assert_eq!(rec.0, vec!["/trips/1?tab=plans#day-2".to_owned()]);
        assert!(nav.host().snapshot().pending.is_empty());
    }

    #[test]
    fn execute_defers_cleanup() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let options = ExecuteOptions {
            cleanup_history: true,
            scroll_to_element_id: Some("day-tab-2".to_owned()),
        };

        nav.execute(|_: &str| {}, &intent_with_fragment(), &options);

        let state = nav.host().snapshot();
        assert!(state.replaced.is_empty(), "cleanup must not run inline");
        assert_eq!(state.pending.len(), 1);
        let (cleanup, delay) = &state.pending[0];
        assert_eq!(cleanup.replace_url.as_deref(), Some("/trips/1?tab=plans"));
        assert_eq!(cleanup.scroll_to.as_deref(), Some("day-tab-2"));
        assert_eq!(*delay, Duration::from_millis(100));

        nav.host().run_deferred();
        let state = nav.host().snapshot();
        assert_eq!(state.replaced, vec!["/trips/1?tab=plans".to_owned()]);
        assert_eq!(state.scrolled, vec!["day-tab-2".to_owned()]);
    }

    #[test]
    fn cleanup_without_fragment_or_scroll_is_skipped() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let options = ExecuteOptions {
            cleanup_history: true,
            scroll_to_element_id: None,
        };
        nav.execute(|_: &str| {}, &NavigationIntent::new("/trips"), &options);
        assert!(nav.host().snapshot().pending.is_empty());
    }

    #[test]
    fn create_from_current_location_filters_callback_keys() {
        let host = MemoryHost::at("/trips/5?tab=map&returnPath=%2Fold&contextData=%7B%7D#day-3");
        let nav = CallbackNavigator::new(host);
        let options = CurrentLocationOptions {
            preserve_query: true,
            preserve_fragment: true,
            context_data: Some(json!({"from": "map"})),
        };

        let link = nav.create_from_current_location("/plans/new", &options);
        let intent = decode_callback(&RelativeUrl::parse(&link).query).unwrap();

        assert_eq!(intent.return_path, "/trips/5");
        assert_eq!(
            intent.return_query,
            Some(BTreeMap::from([("tab".to_owned(), "map".to_owned())]))
        );
        assert_eq!(intent.return_fragment.as_deref(), Some("day-3"));
        assert_eq!(intent.context_data, Some(json!({"from": "map"})));
    }

    #[test]
    fn create_from_current_location_defaults_drop_state() {
        let nav = CallbackNavigator::new(MemoryHost::at("/trips/5?tab=map#day-3"));
        let link = nav.create_from_current_location("/plans/new", &CurrentLocationOptions::default());
        assert_eq!(link, "/plans/new?returnPath=%2Ftrips%2F5");
    }

    #[test]
    fn create_from_current_location_only_callback_keys() {
        let nav = CallbackNavigator::new(MemoryHost::at("/trips/5?returnPath=%2Fx"));
        let options = CurrentLocationOptions {
            preserve_query: true,
            ..Default::default()
        };
        let link = nav.create_from_current_location("/p", &options);
        let params = RelativeUrl::parse(&link).query;
        assert_eq!(params.get("returnQuery"), None);
        assert_eq!(params.get("returnPath"), Some("/trips/5"));
    }

    #[test]
    fn smart_go_back_with_intent() {
        let nav = CallbackNavigator::new(MemoryHost::new().with_history(5));
        let mut rec = Recorder::default();
        let p = params(&[("returnPath", "/trips/1"), ("returnFragment", "day-2")]);

        let action = nav.smart_go_back(rec.navigate(), &p, "/");

        assert_eq!(action, BackAction::Callback("/trips/1#day-2".to_owned()));
        assert_eq!(rec.0, vec!["/trips/1#day-2".to_owned()]);
        let state = nav.host().snapshot();
        assert_eq!(state.back_calls, 0);
        assert_eq!(state.history_length, 5);
        assert!(state.replaced.is_empty());
        assert_eq!(state.pending.len(), 1);
    }

    #[test]
    fn smart_go_back_uses_history() {
        let nav = CallbackNavigator::new(MemoryHost::new().with_history(2));
        let mut rec = Recorder::default();

        let action = nav.smart_go_back(rec.navigate(), &params(&[("tab", "x")]), "/");

        assert_eq!(action, BackAction::History);
        assert!(rec.0.is_empty());
        assert_eq!(nav.host().snapshot().back_calls, 1);
    }

    #[test]
    fn smart_go_back_falls_back() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();

        let action = nav.smart_go_back(rec.navigate(), &QueryParams::new(), "/trips");

        assert_eq!(action, BackAction::Fallback("/trips".to_owned()));
        assert_eq!(rec.0, vec!["/trips".to_owned()]);
        assert_eq!(nav.host().snapshot().back_calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn error_callback_waits_for_delay() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();
        let p = params(&[("returnPath", "/trips/1")]);

        let start = tokio::time::Instant::now();
        let action = nav
            .handle_error_with_callback(rec.navigate(), &p, &ErrorCallbackOptions::default())
            .await;

        assert!(start.elapsed() >= Duration::from_millis(3000));
        assert_eq!(action, BackAction::Callback("/trips/1".to_owned()));
        assert_eq!(rec.0, vec!["/trips/1".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn error_callback_preserves_error_state() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();
        let p = params(&[
            ("returnPath", "/trips/1"),
            ("returnQuery", r#"{"tab":"plans"}"#),
            ("returnFragment", "day-4"),
        ]);
        let options = ErrorCallbackOptions {
            delay: Some(Duration::from_millis(10)),
            preserve_error_state: true,
            ..Default::default()
        };

        let start = tokio::time::Instant::now();
        nav.handle_error_with_callback(rec.navigate(), &p, &options).await;

        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(start.elapsed() < Duration::from_millis(3000));
        assert_eq!(
            rec.0,
            vec!["/trips/1?error=operation_failed&tab=plans#day-4".to_owned()]
        );
    }

    #[test]
    fn error_callback_runs_without_tokio() {
        use std::pin::pin;
        use std::task::{Context, Poll, Waker};

        let nav = CallbackNavigator::new(MemoryHost::new().with_instant_delays());
        let mut rec = Recorder::default();
        let p = params(&[("returnPath", "/trips/1")]);
        let options = ErrorCallbackOptions::default();

        let mut cx = Context::from_waker(Waker::noop());
        let action = pin!(nav.handle_error_with_callback(rec.navigate(), &p, &options)).poll(&mut cx);

        assert_eq!(action, Poll::Ready(BackAction::Callback("/trips/1".to_owned())));
        assert_eq!(rec.0, vec!["/trips/1".to_owned()]);
        assert_eq!(nav.host().snapshot().slept, vec![Duration::from_millis(3000)]);
    }

    #[tokio::test(start_paused = true)]
    async fn error_marker_creates_query_when_absent() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let mut rec = Recorder::default();
        let options = ErrorCallbackOptions {
            preserve_error_state: true,
            ..Default::default()
        };

        nav.handle_error_with_callback(rec.navigate(), &params(&[("returnPath", "/trips/1")]), &options)
            .await;

        assert_eq!(rec.0, vec!["/trips/1?error=operation_failed".to_owned()]);
    }

    #[tokio::test(start_paused = true)]
    async fn error_without_callback_goes_to_marked_fallback() {
        let nav = CallbackNavigator::new(MemoryHost::new().with_history(4));
        let mut rec = Recorder::default();
        let options = ErrorCallbackOptions {
            fallback_path: Some("/trips".to_owned()),
            preserve_error_state: true,
            ..Default::default()
        };

        let action = nav
            .handle_error_with_callback(rec.navigate(), &QueryParams::new(), &options)
            .await;

        assert_eq!(
            action,
            BackAction::Fallback("/trips?error=operation_failed".to_owned())
        );
        assert_eq!(nav.host().snapshot().back_calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn error_without_preserve_is_smart_back() {
        let nav = CallbackNavigator::new(MemoryHost::new().with_history(2));
        let mut rec = Recorder::default();

        let action = nav
            .handle_error_with_callback(rec.navigate(), &QueryParams::new(), &ErrorCallbackOptions::default())
            .await;

        assert_eq!(action, BackAction::History);
        assert!(rec.0.is_empty());
    }

    #[test]
    fn handle_exposes_intent() {
        let nav = CallbackNavigator::new(MemoryHost::new());
        let handle = nav.handle(params(&[("returnPath", "/trips/1")]));
        assert!(handle.has_callback());
        assert_eq!(handle.intent().unwrap().return_path, "/trips/1");

        let mut rec = Recorder::default();
        assert_eq!(handle.execute(rec.navigate()).as_deref(), Some("/trips/1"));
        assert_eq!(rec.0, vec!["/trips/1".to_owned()]);
    }

    #[test]
    fn handle_without_callback() {
        let nav = CallbackNavigator::with_config(MemoryHost::new(), NavigationConfig::new(0, 0, "/home"));
        let handle = nav.handle(QueryParams::new());
        assert!(!handle.has_callback());

        let mut rec = Recorder::default();
        assert_eq!(handle.execute(rec.navigate()), None);
        assert_eq!(
            handle.smart_go_back(rec.navigate(), None),
            BackAction::Fallback("/home".to_owned())
        );
        assert_eq!(rec.0, vec!["/home".to_owned()]);
    }
}
