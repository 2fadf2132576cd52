//! Correlation-id minting and the response-callback registry.
//!
//! Two id classes share one registry: temporary ids (auto-generated, prefixed
//! with `action:`, single-use, removed after their one matching invocation)
//! and permanent ids (caller-supplied, invoked on every dispatched response —
//! permanent entries act as global listeners by design).

use crate::models::ResponseMessage;
use chrono::Utc;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Prefix marking auto-generated, single-use callback ids
pub const ACTION_CALLBACK_PREFIX: &str = "action:";

/// A registered response handler
pub type ResponseCallback = Box<dyn FnMut(&ResponseMessage) + Send>;

/// Registry of response handlers keyed by callback id
pub type FunctionCallbacks = HashMap<String, ResponseCallback>;

/// Mint a temporary callback id for an action
#[must_use]
pub fn create_callback_id(action: &str) -> String {
    format!(
        "{ACTION_CALLBACK_PREFIX}{action}-{}",
        Utc::now().timestamp_millis()
    )
}

/// True when the id names a temporary, single-use callback
#[must_use]
pub fn is_temporary_callback(id: &str) -> bool {
    id.starts_with(ACTION_CALLBACK_PREFIX)
}

/// Deliver `message` to every matching entry in the registry.
///
/// Temporary entries fire only when their id equals `action_id` and are
/// removed afterwards — removal happens even when the handler panics, so a
/// broken handler cannot wedge its registration. Permanent entries fire on
/// every dispatch. A panicking handler is caught and logged and never
/// prevents sibling handlers from running.
pub fn make_callbacks(action_id: &str, callbacks: &mut FunctionCallbacks, message: &ResponseMessage) {
    let ids: Vec<String> = callbacks.keys().cloned().collect();
    for id in ids {
        let temporary = is_temporary_callback(&id);
        if temporary && id != action_id {
            continue;
        }
        if let Some(callback) = callbacks.get_mut(&id) {
            if catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
                log::warn!("failed to call callback w/id: {id}");
            }
        }
        if temporary {
            callbacks.remove(&id);
            log::debug!("unregistered callback: {id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::response::ResponseDetails;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn message() -> ResponseMessage {
        ResponseMessage::Initialized(ResponseDetails {
            id: Some("action:initialize-1".into()),
            success: true,
            ..ResponseDetails::default()
        })
    }

    fn counting(counter: &Arc<AtomicUsize>) -> ResponseCallback {
        let counter = Arc::clone(counter);
        Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn ids_carry_the_temporary_prefix() {
        let id = create_callback_id("checkAuthentication");
        assert!(id.starts_with("action:checkAuthentication-"));
        assert!(is_temporary_callback(&id));
        assert!(!is_temporary_callback("app-listener"));
    }

    #[test]
    fn temporary_callbacks_fire_once_and_only_on_their_id() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut callbacks = FunctionCallbacks::new();
        callbacks.insert("action:initialize-1".to_owned(), counting(&counter));

        make_callbacks("action:other-2", &mut callbacks, &message());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(callbacks.len(), 1, "non-matching dispatch must not remove");

        make_callbacks("action:initialize-1", &mut callbacks, &message());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(callbacks.is_empty(), "matching dispatch removes the entry");

        make_callbacks("action:initialize-1", &mut callbacks, &message());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn permanent_callbacks_fire_on_every_dispatch() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut callbacks = FunctionCallbacks::new();
        callbacks.insert("app-listener".to_owned(), counting(&counter));

        make_callbacks("action:one-1", &mut callbacks, &message());
        make_callbacks("action:two-2", &mut callbacks, &message());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(callbacks.len(), 1, "permanent entries are never removed");
    }

    #[test]
    fn a_panicking_handler_is_isolated_and_still_removed() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut callbacks = FunctionCallbacks::new();
        callbacks.insert(
            "action:broken-1".to_owned(),
            Box::new(|_| panic!("handler failure")),
        );
        callbacks.insert("app-listener".to_owned(), counting(&counter));

        make_callbacks("action:broken-1", &mut callbacks, &message());

        assert_eq!(counter.load(Ordering::SeqCst), 1, "sibling still runs");
        assert!(!callbacks.contains_key("action:broken-1"), "removed despite panic");
    }
}
