pub mod calendar;
pub mod collection;
pub mod destination;
pub mod itinerary;
pub mod position;
pub mod timestamp;
pub mod validation;

use thiserror::Error;

pub use collection::DestinationCollection;
pub use destination::{Destination, DestinationId, Field, FieldUpdate, Flag, TravelMode};
pub use itinerary::{Itinerary, ItineraryEvent, Subscription};

pub const TITLE_PREFIX: &str = "Event ";
pub const FIRST_EVENT_NUMBER: u32 = 1;

/// How long a stop lasts, in milliseconds, when its departure is filled in automatically.
pub const DEFAULT_STAY_MS: i64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error("To add a new point on the end, double click on the map")]
    InsertAfterLast,
    #[error("no destination at index {index} (itinerary has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unknown destination {0}")]
    UnknownDestination(DestinationId),
}
