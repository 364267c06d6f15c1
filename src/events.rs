use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Error;

type Handler = Rc<dyn Fn() -> anyhow::Result<()>>;

/// Named events with ordered handler lists and fire-and-isolate dispatch.
///
/// The bus is a cheap handle: clones share the same registry. Everything is
/// single-threaded and synchronous; handlers run on the caller's stack, in
/// registration order, with no arguments.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Rc<RefCell<HashMap<String, Vec<Handler>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `event` (idempotently) and returns a trigger bound to it.
    /// Invoking the trigger is exactly equivalent to `fire(event)`.
    pub fn register_event(&self, event: &str) -> EventTrigger {
        self.handlers
            .borrow_mut()
            .entry(event.to_string())
            .or_default();
        EventTrigger {
            bus: self.clone(),
            event: event.to_string(),
        }
    }

    /// Appends `handler` to the event's list, registering the event first if
    /// it has not been seen. Registration order is dispatch order.
    pub fn add_handler(&self, event: &str, handler: impl Fn() -> anyhow::Result<()> + 'static) {
        self.handlers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Fires `event`, invoking every handler in registration order.
    ///
    /// Unregistered events and empty handler lists are no-ops. A failing
    /// handler is reported with the event name and full diagnostic, and
    /// dispatch continues with the next handler; `fire` never fails on a
    /// handler's behalf.
    ///
    /// Dispatch runs over a snapshot of the handler list taken up front, so
    /// handlers may add handlers or fire events themselves; additions made
    /// mid-dispatch do not join the in-flight run.
    pub fn fire(&self, event: &str) {
        let snapshot: Vec<Handler> = match self.handlers.borrow().get(event) {
            Some(list) => list.clone(),
            None => return,
        };

        for handler in snapshot {
            if let Err(cause) = handler() {
                let fault = Error::Handler {
                    event: event.to_string(),
                    cause,
                };
                log::error!("{}", fault);
            }
        }
    }
}

/// Zero-argument callable returned by [`EventBus::register_event`].
pub struct EventTrigger {
    bus: EventBus,
    event: String,
}

impl EventTrigger {
    pub fn fire(&self) {
        self.bus.fire(&self.event);
    }

    pub fn event(&self) -> &str {
        &self.event
    }
}
