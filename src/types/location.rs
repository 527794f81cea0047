/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use rainfall::LatLon;
///
/// let manchester = LatLon(53.48, -2.24);
/// assert_eq!(manchester.0, 53.48); // Latitude
/// assert_eq!(manchester.1, -2.24); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);
