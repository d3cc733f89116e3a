// events/bus/event_bus.rs
//
// In-process publish/subscribe for domain events.
//
// Dispatch is synchronous and follows subscription order. Handlers run on a
// snapshot of the subscriber list, so a handler may emit or subscribe itself.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::events::types::DomainEvent;

type Handler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

#[derive(Default)]
struct Shared {
    subscribers: RwLock<HashMap<TypeId, Vec<Handler>>>,
    history: RwLock<Vec<EventLogEntry>>,
}

/// Event bus shared by every service.
///
/// Clones are handles onto the same subscribers and history.
#[derive(Clone, Default)]
pub struct EventBus {
    shared: Arc<Shared>,
}

/// One emitted event as recorded in the bus history
#[derive(Debug, Clone, Serialize)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for events of type `E`
    ///
    /// ```ignore
    /// bus.subscribe::<GradeRecorded, _>(|event| {
    ///     log::info!("grade {} recorded", event.nota_id);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let erased: Handler = Arc::new(move |any: &dyn Any| match any.downcast_ref::<E>() {
            Some(event) => handler(event),
            None => log::error!("Event routed to the wrong handler: {}", std::any::type_name::<E>()),
        });

        self.shared
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(erased);
    }

    /// Record `event` and hand it to every subscriber of its type.
    /// A panicking handler is logged; the remaining ones still run.
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + 'static,
    {
        let snapshot: Vec<Handler> = self
            .shared
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        log::debug!(
            "event {} ({}) -> {} handler(s)",
            event.event_type(),
            event.event_id(),
            snapshot.len()
        );
        self.shared
            .history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EventLogEntry {
                event_type: event.event_type().to_string(),
                event_id: event.event_id().to_string(),
                occurred_at: event.occurred_at().to_rfc3339(),
                handler_count: snapshot.len(),
            });

        for (position, handler) in snapshot.iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| handler(&event as &dyn Any)));
            if outcome.is_err() {
                log::error!(
                    "Handler #{} for {} panicked; continuing with the rest",
                    position,
                    event.event_type()
                );
            }
        }
    }

    /// Everything emitted since creation or the last `clear_event_log`
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.shared
            .history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_event_log(&self) {
        self.shared
            .history
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E: 'static>(&self) -> usize {
        self.shared
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_handler_receives_typed_event() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            bus.subscribe::<SubjectCreated, _>(move |event| {
                seen.lock().unwrap().push(event.codigo.clone());
            });
        }

        bus.emit(SubjectCreated::new(1, 7, "MAT201".to_string()));
        // Other event types do not reach it
        bus.emit(SubjectDeleted::new(1, 7));

        assert_eq!(*seen.lock().unwrap(), vec!["MAT201".to_string()]);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for n in 1..=3 {
            let order = Arc::clone(&order);
            bus.subscribe::<GradeRecorded, _>(move |_| order.lock().unwrap().push(n));
        }
        bus.emit(GradeRecorded::new(10, 1, 30.0));

        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_history_and_clear() {
        let bus = EventBus::new();
        bus.subscribe::<GradeRecorded, _>(|_| {});

        bus.emit(SubjectCreated::new(1, 7, "MAT201".to_string()));
        bus.emit(GradeRecorded::new(10, 1, 30.0));

        let history = bus.get_event_log();
        let types: Vec<&str> = history.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, ["SubjectCreated", "GradeRecorded"]);
        assert_eq!(history[0].handler_count, 0);
        assert_eq!(history[1].handler_count, 1);

        bus.clear_event_log();
        assert!(bus.get_event_log().is_empty());
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::new();
        let other = bus.clone();

        other.subscribe::<SubjectCreated, _>(|_| {});
        other.subscribe::<SubjectCreated, _>(|_| {});

        assert_eq!(bus.subscriber_count::<SubjectCreated>(), 2);
        assert_eq!(bus.subscriber_count::<GradeRecorded>(), 0);
    }

    #[test]
    fn test_handler_may_emit_from_inside_dispatch() {
        let bus = EventBus::new();
        let averages = Arc::new(AtomicUsize::new(0));

        let relay = bus.clone();
        bus.subscribe::<GradeRecorded, _>(move |event| {
            relay.emit(SubjectAverageChanged::new(event.materia_id, Some(4.0)));
        });
        {
            let averages = Arc::clone(&averages);
            bus.subscribe::<SubjectAverageChanged, _>(move |_| {
                averages.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.emit(GradeRecorded::new(10, 1, 30.0));

        assert_eq!(averages.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_handler_does_not_stop_dispatch() {
        let bus = EventBus::new();
        let reached = Arc::new(AtomicUsize::new(0));

        bus.subscribe::<SubjectDeleted, _>(|_| panic!("handler failure"));
        {
            let reached = Arc::clone(&reached);
            bus.subscribe::<SubjectDeleted, _>(move |_| {
                reached.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.emit(SubjectDeleted::new(1, 7));

        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }
}
