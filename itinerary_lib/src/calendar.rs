//! Render-time rules of the itinerary panel.
//!
//! Rendering the calendar is not side-effect free: the home row gets its
//! arrival pinned to the start of the day, and later rows without an arrival
//! pick up the previous departure. Those values are written back into the
//! collection so the validator sees the same thing the user sees.

use chrono::{NaiveDate, TimeDelta};

use crate::{
    collection::{DestinationCollection, ItineraryEvent},
    destination::{DestinationId, FieldUpdate},
    timestamp::start_of_day,
    ItineraryError, DEFAULT_STAY_MS,
};

/// Input controls of a calendar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Title,
    Mode,
    Arrival,
    Departure,
    Baggage,
    Carseat,
    Professional,
    Passengers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRow {
    pub id: DestinationId,
    pub index: usize,
}

impl CalendarRow {
    /// The first row is where the trip starts from.
    pub fn is_home(&self) -> bool {
        self.index == 0
    }

    pub fn mode_visible(&self) -> bool {
        !self.is_home()
    }

    pub fn is_disabled(&self, control: Control) -> bool {
        self.is_home()
            && matches!(
                control,
                Control::Mode
                    | Control::Arrival
                    | Control::Baggage
                    | Control::Carseat
                    | Control::Professional
                    | Control::Passengers
            )
    }
}

/// Runs one render pass over the collection, in order, filling in times.
pub fn prepare_rows(
    collection: &mut DestinationCollection,
    today: NaiveDate,
) -> Result<(Vec<CalendarRow>, Vec<ItineraryEvent>), ItineraryError> {
    let mut rows = Vec::with_capacity(collection.len());
    let mut events = Vec::new();

    for index in 0..collection.len() {
        let Some(destination) = collection.get(index) else {
            break;
        };
        let id = destination.id();
        rows.push(CalendarRow { id, index });

        if index == 0 {
            events.extend(collection.update(id, FieldUpdate::Arrive(Some(start_of_day(today))))?);
            continue;
        }

        if destination.arrive().is_some() {
            continue;
        }

        let previous_depart = collection.get(index - 1).and_then(|d| d.depart());
        let Some(arrive) = previous_depart else {
            // Nothing to inherit yet
            continue;
        };

        events.extend(collection.update(id, FieldUpdate::Arrive(Some(arrive)))?);
        if collection.get(index).is_some_and(|d| d.depart().is_none()) {
            let depart = arrive + TimeDelta::milliseconds(DEFAULT_STAY_MS);
            events.extend(collection.update(id, FieldUpdate::Depart(Some(depart)))?);
        }
    }

    Ok((rows, events))
}
