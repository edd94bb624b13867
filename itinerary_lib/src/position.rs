use geo_types::{point, Point};

/// Builds a map position. Points are stored as x = longitude, y = latitude.
pub fn from_lat_lng(lat: f64, lng: f64) -> Point {
    point!(x: lng, y: lat)
}

pub fn lat(position: &Point) -> f64 {
    position.y()
}

pub fn lng(position: &Point) -> f64 {
    position.x()
}

/// Plain coordinate midpoint, used when a stop is inserted between two neighbours.
pub fn midpoint(a: &Point, b: &Point) -> Point {
    point!(x: (a.x() + b.x()) / 2., y: (a.y() + b.y()) / 2.)
}

/// Great circle distance in km.
pub fn haversine_distance(p1: &Point, p2: &Point) -> f64 {
    const R: f64 = 6372.8; // Radius of the earth in km

    let d_lat = (lat(p2) - lat(p1)).to_radians();
    let d_lon = (lng(p2) - lng(p1)).to_radians();
    let lat1 = lat(p1).to_radians();
    let lat2 = lat(p2).to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    let c = 2. * f64::asin(f64::sqrt(a));

    R * c
}
