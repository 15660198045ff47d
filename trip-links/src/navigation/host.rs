//! The seam between the callback codec and the platform's location/history.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::QueryParams;

/// A host-provided timer future, as returned by [`NavigationHost::sleep`].
///
/// Not `Send`: browser timers live on the single JS thread.
pub type Delay<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Access to the current location and history of whatever is hosting the app.
///
/// A browser implementation wraps `window.location` and `window.history`;
/// tests use [`MemoryHost`](super::MemoryHost). Methods take `&self`
/// because the underlying platform objects are global.
pub trait NavigationHost {
    /// Path of the current page, without query or fragment.
    fn current_path(&self) -> String;

    /// Query parameters of the current page.
    fn current_query(&self) -> QueryParams;

    /// Fragment of the current page, without `#`. `None` when absent or empty.
    fn current_fragment(&self) -> Option<String>;

    /// Swap the visible URL without adding a history entry.
    fn replace_url(&self, url: &str);

    /// Number of entries in the session history.
    fn history_length(&self) -> usize;

    /// Step back one history entry.
    fn go_back(&self);

    /// Scroll the element with this id into view, if it exists.
    fn scroll_into_view(&self, element_id: &str);

    /// Apply `cleanup` once `delay` has passed.
    ///
    /// Fire-and-forget: there is no handle to cancel it and no ordering
    /// guarantee relative to other deferred work.
    fn defer(&self, cleanup: PendingCleanup, delay: Duration);

    /// A future that completes once `delay` has passed, on the host's own timer.
    fn sleep(&self, delay: Duration) -> Delay<'_>;
}

impl<H: NavigationHost + ?Sized> NavigationHost for &H {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn current_query(&self) -> QueryParams {
        (**self).current_query()
    }

    fn current_fragment(&self) -> Option<String> {
        (**self).current_fragment()
    }

    fn replace_url(&self, url: &str) {
        (**self).replace_url(url)
    }

    fn history_length(&self) -> usize {
        (**self).history_length()
    }

    fn go_back(&self) {
        (**self).go_back()
    }

    fn scroll_into_view(&self, element_id: &str) {
        (**self).scroll_into_view(element_id)
    }

    fn defer(&self, cleanup: PendingCleanup, delay: Duration) {
        (**self).defer(cleanup, delay)
    }

    fn sleep(&self, delay: Duration) -> Delay<'_> {
        (**self).sleep(delay)
    }
}

impl<H: NavigationHost + ?Sized> NavigationHost for Arc<H> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn current_query(&self) -> QueryParams {
        (**self).current_query()
    }

    fn current_fragment(&self) -> Option<String> {
        (**self).current_fragment()
    }

    fn replace_url(&self, url: &str) {
        (**self).replace_url(url)
    }

    fn history_length(&self) -> usize {
        (**self).history_length()
    }

    fn go_back(&self) {
        (**self).go_back()
    }

    fn scroll_into_view(&self, element_id: &str) {
        (**self).scroll_into_view(element_id)
    }

    fn defer(&self, cleanup: PendingCleanup, delay: Duration) {
        (**self).defer(cleanup, delay)
    }

    fn sleep(&self, delay: Duration) -> Delay<'_> {
        (**self).sleep(delay)
    }
}

/// Work left over after a callback navigation, applied by the host later.
///
/// Touching the visible URL or scroll position in the same tick as a route
/// change gets clobbered by the router, so this is handed to
/// [`NavigationHost::defer`] instead of being done inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingCleanup {
    /// Fragment-free URL to show in place of the one just navigated to.
    pub replace_url: Option<String>,
    /// Element to scroll into view.
    pub scroll_to: Option<String>,
}

impl PendingCleanup {
    pub fn is_empty(&self) -> bool {
        self.replace_url.is_none() && self.scroll_to.is_none()
    }

    /// Perform the cleanup against `host`.
    ///
    /// Harmless if the page that asked for it is gone: it only touches
    /// global location and scroll state.
    pub fn apply<H: NavigationHost + ?Sized>(&self, host: &H) {
        if let Some(url) = &self.replace_url {
            host.replace_url(url);
        }
        if let Some(id) = &self.scroll_to {
            host.scroll_into_view(id);
        }
    }
}
