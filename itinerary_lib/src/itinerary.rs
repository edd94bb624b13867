use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use chrono::{NaiveDate, NaiveDateTime};
use geo_types::Point;

use crate::{
    calendar::{self, CalendarRow},
    collection::DestinationCollection,
    destination::{Destination, DestinationId, FieldUpdate},
    validation::{self, ValidationError},
    ItineraryError,
};

pub use crate::collection::ItineraryEvent;

type Callback = Rc<dyn Fn(&ItineraryEvent)>;

#[derive(Default)]
struct Subscribers {
    next_key: u64,
    entries: Vec<(u64, Callback)>,
}

/// Shared handle to the destination collection that every view observes.
///
/// Mutations apply the change first, release the collection, then call every
/// subscriber synchronously, once per event. Subscribers are free to read or
/// mutate the itinerary from inside the callback.
#[derive(Clone, Default)]
pub struct Itinerary {
    collection: Rc<RefCell<DestinationCollection>>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl PartialEq for Itinerary {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.collection, &other.collection)
    }
}

impl fmt::Debug for Itinerary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Itinerary")
            .field("len", &self.len())
            .field("subscribers", &self.subscribers.borrow().entries.len())
            .finish()
    }
}

/// Keeps a callback registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    key: u64,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.key).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.borrow_mut().entries.retain(|(key, _)| *key != self.key);
        }
    }
}

impl Itinerary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&ItineraryEvent) + 'static) -> Subscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let key = subscribers.next_key;
        subscribers.next_key += 1;
        subscribers.entries.push((key, Rc::new(callback)));
        tracing::trace!(key, "subscribed to itinerary");

        Subscription {
            key,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    fn notify(&self, events: &[ItineraryEvent]) {
        for event in events {
            tracing::debug!(?event, "itinerary changed");
            let keys: Vec<u64> = self.subscribers.borrow().entries.iter().map(|(key, _)| *key).collect();
            for key in keys {
                // Look up again, an earlier callback may have unsubscribed this one
                let callback = self
                    .subscribers
                    .borrow()
                    .entries
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, callback)| callback.clone());
                if let Some(callback) = callback {
                    callback(event);
                }
            }
        }
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut DestinationCollection) -> Result<(T, Vec<ItineraryEvent>), ItineraryError>,
    ) -> Result<T, ItineraryError> {
        let (value, events) = f(&mut self.collection.borrow_mut())?;
        self.notify(&events);
        Ok(value)
    }

    /// Read access to the collection. Do not hold it across a mutation.
    pub fn borrow(&self) -> Ref<'_, DestinationCollection> {
        self.collection.borrow()
    }

    pub fn len(&self) -> usize {
        self.collection.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.borrow().is_empty()
    }

    pub fn get(&self, id: DestinationId) -> Option<Destination> {
        self.collection.borrow().find(id).cloned()
    }

    pub fn index_of(&self, id: DestinationId) -> Option<usize> {
        self.collection.borrow().index_of(id)
    }

    pub fn snapshot(&self) -> Vec<Destination> {
        self.collection.borrow().iter().cloned().collect()
    }

    pub fn append(&self, position: Point) -> DestinationId {
        let event = self.collection.borrow_mut().append(position);
        self.notify(&[event]);
        event.id()
    }

    pub fn insert_at(&self, index: usize, position: Point) -> Result<DestinationId, ItineraryError> {
        self.mutate(|c| c.insert_at(index, position).map(|e| (e.id(), vec![e])))
    }

    pub fn insert_after(&self, index: usize) -> Result<DestinationId, ItineraryError> {
        self.mutate(|c| c.insert_after(index).map(|e| (e.id(), vec![e])))
    }

    pub fn remove(&self, id: DestinationId) -> Result<(), ItineraryError> {
        self.mutate(|c| c.remove(id).map(|e| ((), vec![e])))
    }

    pub fn remove_at(&self, index: usize) -> Result<DestinationId, ItineraryError> {
        self.mutate(|c| c.remove_at(index).map(|e| (e.id(), vec![e])))
    }

    pub fn update(&self, id: DestinationId, update: FieldUpdate) -> Result<(), ItineraryError> {
        self.mutate(|c| c.update(id, update).map(|e| ((), e.into_iter().collect())))
    }

    pub fn edit_arrival(&self, id: DestinationId, arrive: Option<NaiveDateTime>) -> Result<(), ItineraryError> {
        self.mutate(|c| c.edit_arrival(id, arrive).map(|events| ((), events)))
    }

    /// Render pass of the calendar, see [`calendar::prepare_rows`].
    pub fn prepare_calendar(&self, today: NaiveDate) -> Result<Vec<CalendarRow>, ItineraryError> {
        self.mutate(|c| calendar::prepare_rows(c, today))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(&self.collection.borrow())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::NaiveDate;

    use super::*;
    use crate::{
        destination::{Field, MarkerStyle, TravelMode},
        position::{from_lat_lng, lat},
        validation::ValidationError,
    };

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn recorder(itinerary: &Itinerary) -> (Rc<RefCell<Vec<ItineraryEvent>>>, Subscription) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let subscription = itinerary.subscribe(move |event| sink.borrow_mut().push(*event));
        (events, subscription)
    }

    #[test]
    fn every_subscriber_sees_every_event() {
        init_logging();
        let itinerary = Itinerary::new();
        let (map_events, _map) = recorder(&itinerary);
        let (panel_events, _panel) = recorder(&itinerary);

        let first = itinerary.append(from_lat_lng(1., 1.));
        let second = itinerary.append(from_lat_lng(2., 2.));
        itinerary.update(second, FieldUpdate::Position(from_lat_lng(3., 3.))).unwrap();
        itinerary.remove(first).unwrap();

        let expected = [
            ItineraryEvent::Added { id: first, index: 0 },
            ItineraryEvent::Added { id: second, index: 1 },
            ItineraryEvent::Changed { id: second, field: Field::Position },
            ItineraryEvent::Removed { id: first, index: 0 },
        ];
        assert_eq!(*map_events.borrow(), expected);
        assert_eq!(*panel_events.borrow(), expected);
    }

    #[test]
    fn dropping_the_subscription_unsubscribes() {
        let itinerary = Itinerary::new();
        let (events, subscription) = recorder(&itinerary);

        itinerary.append(from_lat_lng(1., 1.));
        drop(subscription);
        itinerary.append(from_lat_lng(2., 2.));

        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn subscribers_may_mutate_while_notified() {
        let itinerary = Itinerary::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        // The panel fills in times whenever membership changes
        let panel = itinerary.clone();
        let _panel = itinerary.subscribe(move |event| {
            if event.is_membership() {
                panel.prepare_calendar(today).unwrap();
            }
        });
        let (events, _recorder) = recorder(&itinerary);

        let home = itinerary.append(from_lat_lng(1., 1.));

        assert_eq!(itinerary.get(home).unwrap().arrive(), today.and_hms_opt(0, 0, 0));
        // The fill is dispatched while the add is still being dispatched
        assert_eq!(
            *events.borrow(),
            [
                ItineraryEvent::Changed { id: home, field: Field::Arrive },
                ItineraryEvent::Added { id: home, index: 0 },
            ]
        );
    }

    #[test]
    fn unsubscribing_during_dispatch() {
        let itinerary = Itinerary::new();
        let calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim_slot = slot.clone();
        let _killer = itinerary.subscribe(move |_| {
            victim_slot.borrow_mut().take();
        });
        let counter = calls.clone();
        *slot.borrow_mut() = Some(itinerary.subscribe(move |_| counter.set(counter.get() + 1)));

        itinerary.append(from_lat_lng(0., 0.));

        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn toggling_active_touches_one_record() {
        let itinerary = Itinerary::new();
        let ids: Vec<_> = (0..3).map(|i| itinerary.append(from_lat_lng(i as f64, 0.))).collect();
        let before = itinerary.snapshot();
        let (events, _recorder) = recorder(&itinerary);

        itinerary.update(ids[1], FieldUpdate::Active(true)).unwrap();

        assert_eq!(*events.borrow(), [ItineraryEvent::Changed { id: ids[1], field: Field::Active }]);
        let after = itinerary.snapshot();
        assert_eq!(MarkerStyle::of(&after[1]), MarkerStyle::Active);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);

        itinerary.update(ids[1], FieldUpdate::Active(false)).unwrap();
        assert_eq!(itinerary.snapshot(), before);
    }

    #[test]
    fn rejected_insert_emits_nothing() {
        let itinerary = Itinerary::new();
        itinerary.append(from_lat_lng(10., 0.));
        itinerary.append(from_lat_lng(20., 0.));
        let (events, _recorder) = recorder(&itinerary);

        assert_eq!(itinerary.insert_after(1), Err(ItineraryError::InsertAfterLast));
        assert!(events.borrow().is_empty());
        assert_eq!(itinerary.len(), 2);

        let inserted = itinerary.insert_after(0).unwrap();
        assert_eq!(itinerary.index_of(inserted), Some(1));
        assert_eq!(lat(&itinerary.get(inserted).unwrap().position()), 15.);
        assert_eq!(*events.borrow(), [ItineraryEvent::Added { id: inserted, index: 1 }]);
    }

    #[test]
    fn proceed_reports_missing_mode_without_side_effects() {
        let itinerary = Itinerary::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let home = itinerary.append(from_lat_lng(0., 0.));
        let stop = itinerary.append(from_lat_lng(1., 1.));
        itinerary.prepare_calendar(today).unwrap();
        itinerary.update(home, FieldUpdate::Depart(today.and_hms_opt(8, 0, 0))).unwrap();
        itinerary.edit_arrival(stop, today.and_hms_opt(9, 0, 0)).unwrap();
        itinerary.update(stop, FieldUpdate::Depart(today.and_hms_opt(10, 0, 0))).unwrap();
        let before = itinerary.snapshot();
        let (events, _recorder) = recorder(&itinerary);

        let err = itinerary.validate().unwrap_err();

        assert!(matches!(err, ValidationError::MissingMode { number: 2, .. }));
        assert!(events.borrow().is_empty());
        assert_eq!(itinerary.snapshot(), before);

        itinerary.update(stop, FieldUpdate::Mode(Some(TravelMode::Bicycle))).unwrap();
        assert_eq!(itinerary.validate(), Ok(()));
    }
}
