use std::fmt;

/// A named point of interest from the area registry.
///
/// Names need not be unique; every record is fetched on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AreaRecord {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for AreaRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.latitude, self.longitude)
    }
}
