use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::diagnostics::DiagnosticSink;
use crate::events::{ControllerEvent, EventKind, LegacyEvent, LegacyKind};
use crate::SlotMapped;

/// Callback invoked for canonical controller events.
pub type Listener = Box<dyn FnMut(&ControllerEvent)>;
/// Callback invoked for legacy events.
pub type LegacyListener = Box<dyn FnMut(&LegacyEvent)>;

/// Handle returned by [`EventDispatcher::add_listener`], used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registration options of a listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Lower priorities run first. Equal priorities keep registration order.
    pub priority: i32,
    /// Remove the listener after its first invocation.
    pub once: bool,
}

impl ListenerOptions {
    pub fn priority(priority: i32) -> Self {
        Self {
            priority,
            once: false,
        }
    }

    pub fn once() -> Self {
        Self {
            priority: 0,
            once: true,
        }
    }
}

struct Entry {
    id: ListenerId,
    priority: i32,
    once: bool,
    callback: Listener,
}

/// Per-controller listener registry.
///
/// Listener panics are caught and reported to the diagnostic sink, so one
/// faulty listener never blocks delivery to the rest.
pub struct EventDispatcher {
    listeners: [SmallVec<[Entry; 2]>; EventKind::COUNT],
    legacy: [Option<LegacyListener>; LegacyKind::COUNT],
    next_id: u64,
    sink: Arc<dyn DiagnosticSink>,
}

impl EventDispatcher {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            listeners: std::array::from_fn(|_| SmallVec::new()),
            legacy: std::array::from_fn(|_| None),
            next_id: 0,
            sink,
        }
    }

    pub fn add_listener(
        &mut self,
        kind: EventKind,
        options: ListenerOptions,
        callback: Listener,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let list = &mut self.listeners[kind.slot()];
        let position = list
            .iter()
            .position(|entry| entry.priority > options.priority)
            .unwrap_or(list.len());
        list.insert(
            position,
            Entry {
                id,
                priority: options.priority,
                once: options.once,
                callback,
            },
        );
        id
    }

    /// Removes a listener. Returns `false` if it was not registered for `kind`.
    pub fn remove_listener(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let list = &mut self.listeners[kind.slot()];
        match list.iter().position(|entry| entry.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners[kind.slot()].len()
    }

    /// Sets the legacy callback for `kind`, replacing any previous one.
    pub fn on(&mut self, kind: LegacyKind, callback: LegacyListener) {
        self.legacy[kind.slot()] = Some(callback);
    }

    pub fn off(&mut self, kind: LegacyKind) {
        self.legacy[kind.slot()] = None;
    }

    pub fn fire(&mut self, event: &ControllerEvent) {
        let kind = event.kind();
        let list = &mut self.listeners[kind.slot()];
        let mut index = 0;
        while index < list.len() {
            let entry = &mut list[index];
            let result = catch_unwind(AssertUnwindSafe(|| (entry.callback)(event)));
            if let Err(payload) = result {
                self.sink.error(&format!(
                    "Listener {} for '{kind}' panicked: {}",
                    entry.id,
                    panic_message(payload.as_ref())
                ));
            }
            if entry.once {
                list.remove(index);
            } else {
                index += 1;
            }
        }

        let Some(legacy) = LegacyEvent::from_event(event) else {
            return;
        };
        let legacy_kind = legacy.kind();
        if let Some(callback) = self.legacy[legacy_kind.slot()].as_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| callback(&legacy)));
            if let Err(payload) = result {
                self.sink.error(&format!(
                    "Legacy '{}' callback panicked: {}",
                    legacy_kind.name().to_lowercase(),
                    panic_message(payload.as_ref())
                ));
            }
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
