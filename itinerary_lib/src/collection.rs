use geo_types::Point;

use crate::{
    destination::{Destination, DestinationId, Field, FieldUpdate},
    position::midpoint,
    ItineraryError, FIRST_EVENT_NUMBER, TITLE_PREFIX,
};

/// Change notification emitted by every mutation of a [`DestinationCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItineraryEvent {
    Added { id: DestinationId, index: usize },
    Removed { id: DestinationId, index: usize },
    Changed { id: DestinationId, field: Field },
}

impl ItineraryEvent {
    pub fn id(&self) -> DestinationId {
        match self {
            ItineraryEvent::Added { id, .. }
            | ItineraryEvent::Removed { id, .. }
            | ItineraryEvent::Changed { id, .. } => *id,
        }
    }

    /// Membership changes, which both views answer with a full rebuild.
    pub fn is_membership(&self) -> bool {
        matches!(self, ItineraryEvent::Added { .. } | ItineraryEvent::Removed { .. })
    }
}

/// Ordered stops of the itinerary. Order is the chronological order of the trip.
///
/// The collection also owns the counter behind the "Event N" titles, so the
/// numbering only depends on how many stops were created in this collection.
#[derive(Debug, Clone)]
pub struct DestinationCollection {
    destinations: Vec<Destination>,
    next_id: u64,
    next_event_number: u32,
}

impl Default for DestinationCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl DestinationCollection {
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
            next_id: 0,
            next_event_number: FIRST_EVENT_NUMBER,
        }
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Destination> {
        self.destinations.get(index)
    }

    pub fn find(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id() == id)
    }

    pub fn index_of(&self, id: DestinationId) -> Option<usize> {
        self.destinations.iter().position(|d| d.id() == id)
    }

    fn create(&mut self, position: Point) -> Destination {
        let id = DestinationId(self.next_id);
        self.next_id += 1;
        let title = format!("{TITLE_PREFIX}{}", self.next_event_number);
        self.next_event_number += 1;
        Destination::new(id, title, position)
    }

    /// Adds a new stop at the end of the trip.
    pub fn append(&mut self, position: Point) -> ItineraryEvent {
        let index = self.destinations.len();
        let destination = self.create(position);
        let id = destination.id();
        self.destinations.push(destination);
        ItineraryEvent::Added { id, index }
    }

    pub fn insert_at(&mut self, index: usize, position: Point) -> Result<ItineraryEvent, ItineraryError> {
        let len = self.destinations.len();
        if index > len {
            return Err(ItineraryError::IndexOutOfRange { index, len });
        }

        let destination = self.create(position);
        let id = destination.id();
        self.destinations.insert(index, destination);
        Ok(ItineraryEvent::Added { id, index })
    }

    /// Inserts a fresh stop halfway between stop `index` and the one after it.
    pub fn insert_after(&mut self, index: usize) -> Result<ItineraryEvent, ItineraryError> {
        let len = self.destinations.len();
        if index >= len {
            return Err(ItineraryError::IndexOutOfRange { index, len });
        }
        if index == len - 1 {
            return Err(ItineraryError::InsertAfterLast);
        }

        let position = midpoint(
            &self.destinations[index].position(),
            &self.destinations[index + 1].position(),
        );
        self.insert_at(index + 1, position)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<ItineraryEvent, ItineraryError> {
        let len = self.destinations.len();
        if index >= len {
            return Err(ItineraryError::IndexOutOfRange { index, len });
        }

        let removed = self.destinations.remove(index);
        Ok(ItineraryEvent::Removed { id: removed.id(), index })
    }

    pub fn remove(&mut self, id: DestinationId) -> Result<ItineraryEvent, ItineraryError> {
        let index = self.index_of(id).ok_or(ItineraryError::UnknownDestination(id))?;
        self.remove_at(index)
    }

    /// Writes a single field. Returns `None` when the value was already stored.
    pub fn update(&mut self, id: DestinationId, update: FieldUpdate) -> Result<Option<ItineraryEvent>, ItineraryError> {
        let destination = self
            .destinations
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(ItineraryError::UnknownDestination(id))?;

        let field = update.field();
        Ok(destination.apply(update).then_some(ItineraryEvent::Changed { id, field }))
    }

    /// Sets the arrival time. An arrival after the current departure clears the departure.
    pub fn edit_arrival(
        &mut self,
        id: DestinationId,
        arrive: Option<chrono::NaiveDateTime>,
    ) -> Result<Vec<ItineraryEvent>, ItineraryError> {
        let mut events = Vec::new();
        events.extend(self.update(id, FieldUpdate::Arrive(arrive))?);

        let depart = self.find(id).and_then(Destination::depart);
        if let (Some(arrive), Some(depart)) = (arrive, depart) {
            if arrive > depart {
                events.extend(self.update(id, FieldUpdate::Depart(None))?);
            }
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::position::{from_lat_lng, lat, lng};

    fn collection_of(n: usize) -> DestinationCollection {
        let mut collection = DestinationCollection::new();
        for i in 0..n {
            // Deliberately not sorted by position
            collection.append(from_lat_lng(50. - i as f64 * 3., (i as f64 * 7.) % 5.));
        }
        collection
    }

    fn titles(collection: &DestinationCollection) -> Vec<String> {
        collection.iter().map(|d| d.title().to_owned()).collect()
    }

    #[test]
    fn append_preserves_order() {
        let collection = collection_of(4);

        assert_eq!(collection.len(), 4);
        assert_eq!(titles(&collection), ["Event 1", "Event 2", "Event 3", "Event 4"]);
        for (i, destination) in collection.iter().enumerate() {
            assert_eq!(collection.index_of(destination.id()), Some(i));
        }
    }

    #[test]
    fn append_reports_index() {
        let mut collection = collection_of(2);
        let event = collection.append(from_lat_lng(0., 0.));

        assert!(matches!(event, ItineraryEvent::Added { index: 2, .. }));
        assert_eq!(collection.get(2).map(Destination::id), Some(event.id()));
    }

    #[test]
    fn remove_shifts_later_stops() {
        let mut collection = collection_of(5);
        let removed_id = collection.get(1).unwrap().id();
        let later_id = collection.get(3).unwrap().id();

        let event = collection.remove_at(1).unwrap();

        assert_eq!(event, ItineraryEvent::Removed { id: removed_id, index: 1 });
        assert_eq!(collection.len(), 4);
        assert_eq!(collection.index_of(later_id), Some(2));
        assert_eq!(collection.index_of(removed_id), None);
        assert_eq!(titles(&collection), ["Event 1", "Event 3", "Event 4", "Event 5"]);
    }

    #[test]
    fn remove_by_id() {
        let mut collection = collection_of(3);
        let id = collection.get(2).unwrap().id();

        assert!(collection.remove(id).is_ok());
        assert_eq!(collection.remove(id), Err(ItineraryError::UnknownDestination(id)));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn insert_after_uses_midpoint() {
        let mut collection = DestinationCollection::new();
        collection.append(from_lat_lng(10., 20.));
        collection.append(from_lat_lng(30., 40.));
        collection.append(from_lat_lng(-5., 5.));

        let event = collection.insert_after(1).unwrap();

        assert!(matches!(event, ItineraryEvent::Added { index: 2, .. }));
        assert_eq!(collection.len(), 4);
        let inserted = collection.get(2).unwrap();
        assert_eq!(inserted.id(), event.id());
        assert_eq!(lat(&inserted.position()), 12.5);
        assert_eq!(lng(&inserted.position()), 22.5);
        assert_eq!(inserted.title(), "Event 4");
        assert_eq!(inserted.mode(), None);
        assert_eq!(inserted.arrive(), None);
    }

    #[test]
    fn insert_after_last_is_rejected() {
        let mut collection = collection_of(3);
        let before = titles(&collection);

        assert_eq!(collection.insert_after(2), Err(ItineraryError::InsertAfterLast));
        assert_eq!(
            ItineraryError::InsertAfterLast.to_string(),
            "To add a new point on the end, double click on the map"
        );
        assert_eq!(titles(&collection), before);
        assert!(matches!(collection.insert_after(3), Err(ItineraryError::IndexOutOfRange { .. })));
        // Rejected inserts do not consume a title
        collection.append(from_lat_lng(0., 0.));
        assert_eq!(collection.get(3).unwrap().title(), "Event 4");
    }

    #[test]
    fn update_without_change_is_silent() {
        let mut collection = collection_of(1);
        let id = collection.get(0).unwrap().id();

        assert_eq!(
            collection.update(id, FieldUpdate::Active(true)),
            Ok(Some(ItineraryEvent::Changed { id, field: Field::Active }))
        );
        assert_eq!(collection.update(id, FieldUpdate::Active(true)), Ok(None));
        assert_eq!(
            collection.update(DestinationId(99), FieldUpdate::Active(true)),
            Err(ItineraryError::UnknownDestination(DestinationId(99)))
        );
    }

    #[test]
    fn late_arrival_clears_departure() {
        let mut collection = collection_of(1);
        let id = collection.get(0).unwrap().id();
        let day = NaiveDate::from_ymd_opt(2025, 5, 22).unwrap();
        let nine = day.and_hms_opt(9, 0, 0).unwrap();
        let ten = day.and_hms_opt(10, 0, 0).unwrap();
        let eleven = day.and_hms_opt(11, 0, 0).unwrap();

        collection.update(id, FieldUpdate::Depart(Some(ten))).unwrap();

        // Earlier arrival keeps the departure
        let events = collection.edit_arrival(id, Some(nine)).unwrap();
        assert_eq!(events, [ItineraryEvent::Changed { id, field: Field::Arrive }]);
        assert_eq!(collection.find(id).unwrap().depart(), Some(ten));

        let events = collection.edit_arrival(id, Some(eleven)).unwrap();
        assert_eq!(
            events,
            [
                ItineraryEvent::Changed { id, field: Field::Arrive },
                ItineraryEvent::Changed { id, field: Field::Depart },
            ]
        );
        let destination = collection.find(id).unwrap();
        assert_eq!(destination.arrive(), Some(eleven));
        assert_eq!(destination.depart(), None);
    }

    #[test]
    fn departure_edits_are_not_checked() {
        let mut collection = collection_of(1);
        let id = collection.get(0).unwrap().id();
        let day = NaiveDate::from_ymd_opt(2025, 5, 22).unwrap();

        collection.edit_arrival(id, day.and_hms_opt(12, 0, 0)).unwrap();
        collection.update(id, FieldUpdate::Depart(day.and_hms_opt(8, 0, 0))).unwrap();

        let destination = collection.find(id).unwrap();
        assert_eq!(destination.arrive(), day.and_hms_opt(12, 0, 0));
        assert_eq!(destination.depart(), day.and_hms_opt(8, 0, 0));
    }
}
