use std::fmt;
use thiserror::Error;

/// Which coordinate axis a pattern or failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("could not parse {axis} from \"{text}\"")]
    Unrecognized { axis: Axis, text: String },
    #[error("latitude and longitude are separated by too much text in \"{text}\"")]
    TooFarApart { text: String },
    #[error("{axis} {value} out of range in \"{text}\"")]
    OutOfRange { axis: Axis, value: f64, text: String },
}

impl ParseError {
    /// The axis that could not be resolved. Excessive separation is
    /// reported against the longitude, which is the match that ended up
    /// too far away.
    pub fn axis(&self) -> Axis {
        match self {
            ParseError::Unrecognized { axis, .. } | ParseError::OutOfRange { axis, .. } => *axis,
            ParseError::TooFarApart { .. } => Axis::Longitude,
        }
    }

    /// The input text (or fragment) that failed to resolve, for
    /// user-facing diagnostics.
    pub fn offending_text(&self) -> &str {
        match self {
            ParseError::Unrecognized { text, .. }
            | ParseError::TooFarApart { text }
            | ParseError::OutOfRange { text, .. } => text,
        }
    }

    pub(crate) fn with_text(self, text: &str) -> ParseError {
        match self {
            ParseError::Unrecognized { axis, .. } => ParseError::Unrecognized {
                axis,
                text: text.to_string(),
            },
            ParseError::TooFarApart { .. } => ParseError::TooFarApart {
                text: text.to_string(),
            },
            ParseError::OutOfRange { axis, value, .. } => ParseError::OutOfRange {
                axis,
                value,
                text: text.to_string(),
            },
        }
    }
}

/// A validated coordinate pair in decimal degrees.
///
/// Values are only constructible through [`Coordinate::new`] or the
/// parser, so latitude is always within ±90° and longitude within ±180°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ParseError> {
        if !is_valid_latitude(latitude) {
            return Err(ParseError::OutOfRange {
                axis: Axis::Latitude,
                value: latitude,
                text: latitude.to_string(),
            });
        }
        if !is_valid_longitude(longitude) {
            return Err(ParseError::OutOfRange {
                axis: Axis::Longitude,
                value: longitude,
                text: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    /// Canonical decimal rendering, parseable back via the fast path.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.latitude, self.longitude)
    }
}

pub fn is_valid_latitude(value: f64) -> bool {
    (-90.0..=90.0).contains(&value)
}

pub fn is_valid_longitude(value: f64) -> bool {
    (-180.0..=180.0).contains(&value)
}
