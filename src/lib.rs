//! Extract latitude/longitude pairs from free-form text.
//!
//! Handles plain decimal pairs ("52.205 8.391") as well as
//! degree/minute/second notation with hemisphere letters
//! ("N 52° 12.345 E 008° 23.456"), including sloppy real-world variants
//! with comma decimals, stray blanks and missing punctuation.

pub mod coordinate_parser;
pub mod types;

pub use coordinate_parser::{parse, parse_latitude, parse_longitude};
pub use types::{Axis, Coordinate, ParseError, is_valid_latitude, is_valid_longitude};
