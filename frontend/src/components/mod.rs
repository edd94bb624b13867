pub mod calendar_entry;
pub mod itinerary_panel;
pub mod map_component;
