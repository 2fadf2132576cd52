//! Mock implementations of the host seams.

use crate::browser::{BrokerFrame, Browser};
use crate::error::SsoError;
use crate::models::Action;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Scripted page context: settable current URL, recorded navigations and
/// history replacements, optional forced navigation failure.
pub struct MockBrowser {
    current_url: Mutex<String>,
    launched: Mutex<Vec<String>>,
    replaced: Mutex<Vec<String>>,
    fail_navigation: AtomicBool,
}

impl MockBrowser {
    /// A browser sitting on the given page
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            current_url: Mutex::new(url.to_owned()),
            launched: Mutex::new(Vec::new()),
            replaced: Mutex::new(Vec::new()),
            fail_navigation: AtomicBool::new(false),
        }
    }

    /// Move the page to a different URL (e.g. to plant query parameters)
    pub fn set_current_url(&self, url: &str) {
        *self
            .current_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = url.to_owned();
    }

    /// Make subsequent `launch_uri` calls fail, as a blocked popup would
    pub fn set_fail_navigation(&self, fail: bool) {
        self.fail_navigation.store(fail, Ordering::SeqCst);
    }

    /// URLs passed to `launch_uri`, in order
    #[must_use]
    pub fn launched_uris(&self) -> Vec<String> {
        self.launched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// URLs passed to `replace_url`, in order
    #[must_use]
    pub fn replaced_urls(&self) -> Vec<String> {
        self.replaced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Browser for MockBrowser {
    fn current_url(&self) -> String {
        self.current_url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_url(&self, url: &str) {
        self.replaced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());
        self.set_current_url(url);
    }

    fn launch_uri(&self, url: &str) -> Result<(), SsoError> {
        if self.fail_navigation.load(Ordering::SeqCst) {
            return Err(SsoError::Navigation {
                url: url.to_owned(),
            });
        }
        self.launched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_owned());
        Ok(())
    }
}

/// Recording broker frame: keeps every posted action as serialized JSON so
/// tests can assert on the exact wire shape.
#[derive(Default)]
pub struct MockBrokerFrame {
    posted: Mutex<Vec<Value>>,
}

impl MockBrokerFrame {
    /// A frame with nothing posted yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every posted action, in order, as wire JSON
    #[must_use]
    pub fn posted(&self) -> Vec<Value> {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recently posted action, as wire JSON
    #[must_use]
    pub fn last_posted(&self) -> Option<Value> {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Number of actions posted so far
    #[must_use]
    pub fn posted_count(&self) -> usize {
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl BrokerFrame for MockBrokerFrame {
    fn post_message(&self, action: &Action) {
        let value = serde_json::to_value(action).unwrap_or(Value::Null);
        self.posted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }
}
