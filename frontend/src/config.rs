use const_format::concatcp;

// Initial view, centred on the continental US
pub const MAP_CENTER: (f64, f64) = (40.413, -98.701);
pub const MAP_ZOOM: f64 = 4.;
pub const MAP_MAX_ZOOM: f64 = 18.;

pub const TILE_HOST: &str = "https://tile.openstreetmap.org";
pub const TILE_URL: &str = concatcp!(TILE_HOST, "/{z}/{x}/{y}.png");

pub const MAP_CLASS: &str = "map";
pub const CALENDAR_CLASS: &str = "calendar component-container";
pub const ENTRY_CLASS: &str = "calendarEntry";

pub const PATH_COLOR: &str = "rgb(0, 96, 255)";
