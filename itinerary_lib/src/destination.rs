use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use geo_types::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DestinationId(pub u64);

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Walk,
    Bicycle,
    Car,
    Taxi,
    Bus,
    Train,
    Plane,
    Boat,
    Other,
}

impl TravelMode {
    pub const ALL: [TravelMode; 9] = [
        TravelMode::Walk,
        TravelMode::Bicycle,
        TravelMode::Car,
        TravelMode::Taxi,
        TravelMode::Bus,
        TravelMode::Train,
        TravelMode::Plane,
        TravelMode::Boat,
        TravelMode::Other,
    ];

    /// Select value used for a stop without a mode.
    pub const UNSET_KEY: &'static str = "unset";

    pub fn key(&self) -> &'static str {
        match self {
            TravelMode::Walk => "walk",
            TravelMode::Bicycle => "bicycle",
            TravelMode::Car => "car",
            TravelMode::Taxi => "taxi",
            TravelMode::Bus => "bus",
            TravelMode::Train => "train",
            TravelMode::Plane => "plane",
            TravelMode::Boat => "boat",
            TravelMode::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Walk => "Walking",
            TravelMode::Bicycle => "Bicycle",
            TravelMode::Car => "Car",
            TravelMode::Taxi => "Taxi",
            TravelMode::Bus => "Bus",
            TravelMode::Train => "Train",
            TravelMode::Plane => "Plane",
            TravelMode::Boat => "Boat",
            TravelMode::Other => "Other",
        }
    }

    /// Parses a select value. `"unset"` and anything unknown give `None`.
    pub fn from_key(key: &str) -> Option<TravelMode> {
        key.parse().ok()
    }
}

impl FromStr for TravelMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TravelMode::ALL.into_iter().find(|mode| mode.key() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Baggage,
    Carseat,
    Professional,
    Passengers,
}

impl Flag {
    pub const ALL: [Flag; 4] = [Flag::Baggage, Flag::Carseat, Flag::Professional, Flag::Passengers];
}

/// Names a single field of a [`Destination`], carried by change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Mode,
    Flag(Flag),
    Arrive,
    Depart,
    Position,
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Title(String),
    Mode(Option<TravelMode>),
    Flag(Flag, bool),
    Arrive(Option<NaiveDateTime>),
    Depart(Option<NaiveDateTime>),
    Position(Point),
    Active(bool),
}

impl FieldUpdate {
    pub fn field(&self) -> Field {
        match self {
            FieldUpdate::Title(_) => Field::Title,
            FieldUpdate::Mode(_) => Field::Mode,
            FieldUpdate::Flag(flag, _) => Field::Flag(*flag),
            FieldUpdate::Arrive(_) => Field::Arrive,
            FieldUpdate::Depart(_) => Field::Depart,
            FieldUpdate::Position(_) => Field::Position,
            FieldUpdate::Active(_) => Field::Active,
        }
    }
}

/// One stop of the itinerary.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    id: DestinationId,
    title: String,
    mode: Option<TravelMode>,
    baggage: bool,
    carseat: bool,
    professional: bool,
    passengers: bool,
    arrive: Option<NaiveDateTime>,
    depart: Option<NaiveDateTime>,
    position: Point,
    #[cfg_attr(feature = "serde", serde(skip))]
    active: bool,
}

impl Destination {
    pub(crate) fn new(id: DestinationId, title: String, position: Point) -> Self {
        Self {
            id,
            title,
            mode: None,
            baggage: false,
            carseat: false,
            professional: false,
            passengers: false,
            arrive: None,
            depart: None,
            position,
            active: false,
        }
    }

    pub fn id(&self) -> DestinationId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> Option<TravelMode> {
        self.mode
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Baggage => self.baggage,
            Flag::Carseat => self.carseat,
            Flag::Professional => self.professional,
            Flag::Passengers => self.passengers,
        }
    }

    pub fn arrive(&self) -> Option<NaiveDateTime> {
        self.arrive
    }

    pub fn depart(&self) -> Option<NaiveDateTime> {
        self.depart
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Applies the update, returning whether the stored value changed.
    pub(crate) fn apply(&mut self, update: FieldUpdate) -> bool {
        fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match update {
            FieldUpdate::Title(title) => replace(&mut self.title, title),
            FieldUpdate::Mode(mode) => replace(&mut self.mode, mode),
            FieldUpdate::Flag(flag, value) => {
                let slot = match flag {
                    Flag::Baggage => &mut self.baggage,
                    Flag::Carseat => &mut self.carseat,
                    Flag::Professional => &mut self.professional,
                    Flag::Passengers => &mut self.passengers,
                };
                replace(slot, value)
            }
            FieldUpdate::Arrive(time) => replace(&mut self.arrive, time),
            FieldUpdate::Depart(time) => replace(&mut self.depart, time),
            FieldUpdate::Position(position) => replace(&mut self.position, position),
            FieldUpdate::Active(active) => replace(&mut self.active, active),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Active,
    Inactive,
}

impl MarkerStyle {
    pub fn of(destination: &Destination) -> Self {
        if destination.active {
            MarkerStyle::Active
        } else {
            MarkerStyle::Inactive
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            MarkerStyle::Active => "activeMarker",
            MarkerStyle::Inactive => "inactiveMarker",
        }
    }
}
