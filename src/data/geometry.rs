use super::osm::NodeCoord;

/// A labelled line geometry, ready to be written out as a KML placemark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placemark {
    pub label: String,
    pub description: String,
    pub coordinates: Vec<NodeCoord>,
}

impl Placemark {
    /// `lon,lat` pairs joined by single spaces.
    pub fn coordinates_text(&self) -> String {
        self.coordinates
            .iter()
            .map(|coord| format!("{},{}", coord.lon, coord.lat))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default, Clone)]
pub struct PathGeometries {
    /// One placemark per way, labelled with every marker attached to it.
    pub grouped: Vec<Placemark>,
    /// One placemark per (way, marker) pair.
    pub split: Vec<Placemark>,
}
