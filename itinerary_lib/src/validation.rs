use thiserror::Error;

use crate::collection::DestinationCollection;

/// First problem found when the user tries to proceed. The messages are shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("You must specify more than one location. Use the last day\nwhere you travelled outside your home.")]
    TooFewLocations,
    #[error("You did not specify a travel mode for\nevent number {number}, entitled {title}.")]
    MissingMode { number: usize, title: String },
    #[error("Event number {number}, entitled {title} has no arrival time")]
    MissingArrival { number: usize, title: String },
    #[error("Event number {number}, entitled {title} has no departure time")]
    MissingDeparture { number: usize, title: String },
    #[error("Event number {number}, entitled {title} has an arrival time after its departure time")]
    ArrivalAfterDeparture { number: usize, title: String },
    #[error("Event number {number}, entitled {title} has an arrival time before the previous event's departure time.")]
    ArrivalBeforePreviousDeparture { number: usize, title: String },
}

/// Checks the whole itinerary in order and stops at the first violation.
pub fn validate(collection: &DestinationCollection) -> Result<(), ValidationError> {
    if collection.len() <= 1 {
        return Err(ValidationError::TooFewLocations);
    }

    let mut previous_depart = None;
    for (i, destination) in collection.iter().enumerate() {
        let number = i + 1;
        let title = || destination.title().to_owned();

        if i > 0 && destination.mode().is_none() {
            return Err(ValidationError::MissingMode { number, title: title() });
        }
        let Some(arrive) = destination.arrive() else {
            return Err(ValidationError::MissingArrival { number, title: title() });
        };
        let Some(depart) = destination.depart() else {
            return Err(ValidationError::MissingDeparture { number, title: title() });
        };
        if arrive > depart {
            return Err(ValidationError::ArrivalAfterDeparture { number, title: title() });
        }
        if previous_depart.is_some_and(|previous| previous > arrive) {
            return Err(ValidationError::ArrivalBeforePreviousDeparture { number, title: title() });
        }

        previous_depart = Some(depart);
    }

    Ok(())
}
