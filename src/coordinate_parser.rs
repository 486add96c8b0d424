use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::{Axis, Coordinate, ParseError};

/// Maximum number of characters allowed between the end of the latitude
/// match and the start of the longitude match.
const PROXIMITY_LIMIT: usize = 10;

// Capture groups: 1 hemisphere, 2 degrees, 3 minutes,
// 4 decimal-minutes fraction, 5 seconds.
static LAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b([NS]|)\s*(\d+°?|°)(?:\s*(\d+)(?:[.,](\d+)|'?\s*(\d+(?:[.,]\d+)?)(?:''|")?)?)?"#,
    )
    .expect("latitude pattern should compile")
});

static LON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b([WE]|)\s*(\d+°?|°)(?:\s*(\d+)(?:[.,](\d+)|'?\s*(\d+(?:[.,]\d+)?)(?:''|")?)?)?"#,
    )
    .expect("longitude pattern should compile")
});

/// A typo'd thousands separator ("12, 345") reads as a spurious
/// minutes/seconds boundary unless rewritten to "12.345" up front.
static BAD_BLANK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d)[,.] (\d{2,})").expect("bad blank pattern should compile")
});

/// The numeric value extracted for one axis plus the span of text it
/// was derived from, kept only for the proximity check.
struct AxisMatch {
    value: f64,
    start: usize,
    length: usize,
}

impl AxisMatch {
    fn end(&self) -> usize {
        self.start + self.length
    }
}

/// Parses a latitude/longitude pair out of free-form text.
///
/// Accepts two plain decimal numbers ("52.205 8.391") as well as, per
/// axis, an optional hemisphere letter with degrees, minutes and
/// seconds in varying stages of completeness: "N 52", "N 52°",
/// "N 52° 12", "N 52° 12.345", "N 52° 12' 30''". Comma decimal
/// separators and stray blanks after them are tolerated. Fails when
/// either axis cannot be resolved, when the two matches are separated
/// by too much unrelated text, or when a value is out of range.
pub fn parse(text: &str) -> Result<Coordinate, ParseError> {
    if let Some((lat, lon)) = plain_pair(text) {
        return Coordinate::new(lat, lon).map_err(|e| e.with_text(text));
    }

    let lat = match_axis(text, Axis::Latitude)?;
    // The longitude scan must not re-match the latitude digits.
    let tail = text.get(lat.end()..).unwrap_or("");
    let lon = match_axis(tail, Axis::Longitude)?;

    if lon.start >= PROXIMITY_LIMIT {
        return Err(ParseError::TooFarApart {
            text: text.to_string(),
        });
    }

    Coordinate::new(lat.value, lon.value).map_err(|e| e.with_text(text))
}

/// Parses a latitude from text known to contain only a latitude, e.g. a
/// dedicated entry field. No cross-axis or range checks apply.
pub fn parse_latitude(text: &str) -> Result<f64, ParseError> {
    match_axis(text, Axis::Latitude).map(|m| m.value)
}

/// Longitude counterpart of [`parse_latitude`].
pub fn parse_longitude(text: &str) -> Result<f64, ParseError> {
    match_axis(text, Axis::Longitude).map(|m| m.value)
}

/// The trivial case: the entire input is exactly two float tokens.
/// A miss here routes to the textual matcher, it is not a failure.
fn plain_pair(text: &str) -> Option<(f64, f64)> {
    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    let second = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }
    let lat = strip_blanks(first).parse::<f64>().ok()?;
    let lon = strip_blanks(second).parse::<f64>().ok()?;
    Some((lat, lon))
}

fn strip_blanks(token: &str) -> &str {
    token.trim_matches(|c| matches!(c, ' ' | '\t' | '\u{a0}'))
}

/// Extracts one decimal-degree value and its source span from `text`,
/// trying progressively more permissive strategies: a bare float over
/// the whole input, the degree/minute/second grammar, and finally one
/// or two bare whitespace-separated tokens.
fn match_axis(text: &str, axis: Axis) -> Result<AxisMatch, ParseError> {
    let normalized = BAD_BLANK_PATTERN.replace_all(text, "${1}.${2}");

    // Bare decimal degrees covering the entire input.
    if let Ok(value) = normalized.trim().parse::<f64>() {
        return Ok(AxisMatch {
            value,
            start: 0,
            length: text.len(),
        });
    }

    let pattern = match axis {
        Axis::Latitude => &LAT_PATTERN,
        Axis::Longitude => &LON_PATTERN,
    };
    if let Some(caps) = pattern.captures(&normalized) {
        // A failed conversion here (degree digits beyond i32) does not
        // mean "not a coordinate", only "wrong interpretation"; keep
        // trying the bare-token strategy.
        if let Some(matched) = dms_value(&caps) {
            return Ok(matched);
        }
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    if !tokens.is_empty() && tokens.len() <= 2 {
        let token = match axis {
            Axis::Latitude => tokens[0],
            Axis::Longitude => tokens[tokens.len() - 1],
        };
        if let Ok(value) = token.parse::<f64>() {
            // Anchor the span with a search from the matching end, in
            // case both tokens are the same literal text.
            let start = match axis {
                Axis::Latitude => text.find(token),
                Axis::Longitude => text.rfind(token),
            };
            if let Some(start) = start {
                return Ok(AxisMatch {
                    value,
                    start,
                    length: token.len(),
                });
            }
        }
    }

    Err(ParseError::Unrecognized {
        axis,
        text: text.to_string(),
    })
}

/// Converts a degree/minute/second capture to decimal degrees. Returns
/// `None` when a whole-number component overflows.
fn dms_value(caps: &Captures) -> Option<AxisMatch> {
    let whole = caps.get(0)?;
    let hemisphere = caps.get(1).map_or("", |m| m.as_str());
    let sign = if hemisphere.eq_ignore_ascii_case("S") || hemisphere.eq_ignore_ascii_case("W") {
        -1.0
    } else {
        1.0
    };

    let degree_digits = caps.get(2).map_or("", |m| m.as_str()).trim_end_matches('°');
    let degrees = if degree_digits.is_empty() {
        0.0
    } else {
        f64::from(degree_digits.parse::<i32>().ok()?)
    };

    let mut minutes = 0.0;
    let mut seconds = 0.0;
    if let Some(min) = caps.get(3) {
        minutes = f64::from(min.as_str().parse::<i32>().ok()?);
        if let Some(fraction) = caps.get(4) {
            // Decimal minutes: the digits after the separator scale into
            // seconds via "0.<fraction>" times 60. Previously stored
            // coordinates depend on this exact rule.
            seconds = format!("0.{}", fraction.as_str()).parse::<f64>().ok()? * 60.0;
        } else if let Some(sec) = caps.get(5) {
            seconds = sec.as_str().replace(',', ".").parse::<f64>().ok()?;
        }
    }

    Some(AxisMatch {
        value: sign * (degrees + minutes / 60.0 + seconds / 3600.0),
        start: whole.start(),
        length: whole.as_str().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_plain_decimal_pair() {
        let coord = parse("52.205 8.391").unwrap();
        assert_eq!(coord.latitude(), 52.205);
        assert_eq!(coord.longitude(), 8.391);

        let coord = parse("  -31.6\t135.8  ").unwrap();
        assert_eq!(coord.latitude(), -31.6);
        assert_eq!(coord.longitude(), 135.8);
    }

    #[test]
    fn test_plain_pair_with_nbsp_padding() {
        let coord = parse("52.5\u{a0}8.25").unwrap();
        assert_eq!(coord.latitude(), 52.5);
        assert_eq!(coord.longitude(), 8.25);
    }

    #[test]
    fn test_plain_pair_accepts_exponents() {
        let coord = parse("5e1 1e2").unwrap();
        assert_eq!(coord.latitude(), 50.0);
        assert_eq!(coord.longitude(), 100.0);
    }

    #[test]
    fn test_plain_pair_out_of_range() {
        let err = parse("95.0 8.0").unwrap_err();
        assert_eq!(err.axis(), Axis::Latitude);
        assert!(matches!(err, ParseError::OutOfRange { .. }));

        let err = parse("52.0 200.0").unwrap_err();
        assert_eq!(err.axis(), Axis::Longitude);
    }

    #[test]
    fn test_degrees_with_decimal_minutes() {
        let coord = parse("N 52° 12.345 E 008° 23.456").unwrap();
        assert_close(coord.latitude(), 52.20575);
        assert_close(coord.longitude(), 8.390933333333333);
    }

    #[test]
    fn test_degrees_only() {
        let coord = parse("N 52 E 8").unwrap();
        assert_close(coord.latitude(), 52.0);
        assert_close(coord.longitude(), 8.0);
    }

    #[test]
    fn test_degrees_minutes_seconds() {
        assert_close(parse_latitude("N 52° 12' 30''").unwrap(), 52.208333333333336);
        assert_close(parse_latitude("N 52° 12' 17,6").unwrap(), 52.204888888888888);
        assert_close(parse_longitude("W 5° 30").unwrap(), -5.5);
        assert_close(parse_longitude("E 5° 30").unwrap(), 5.5);
    }

    #[test]
    fn test_hemisphere_sign() {
        let south = parse_latitude("S 33° 52.0").unwrap();
        assert!(south < 0.0);
        assert_close(south, -33.86666666666667);

        let north = parse_latitude("N 33° 52.0").unwrap();
        assert!(north > 0.0);
        assert_close(north, 33.86666666666667);

        // Hemisphere letters are case-insensitive.
        assert!(parse_latitude("s 33° 52.0").unwrap() < 0.0);
        assert!(parse_longitude("w 5° 30").unwrap() < 0.0);
    }

    #[test]
    fn test_single_axis_bare_decimal() {
        assert_close(parse_latitude("52.5").unwrap(), 52.5);
        assert_close(parse_latitude("  -12.25  ").unwrap(), -12.25);
        assert_close(parse_longitude("-179.99").unwrap(), -179.99);
    }

    #[test]
    fn test_bad_blank_normalization() {
        // "06, 987" is a typo'd decimal, not minutes plus seconds.
        assert_close(parse_latitude("N 48 06, 987").unwrap(), 48.11645);
        assert_close(parse_longitude("E 008 44, 498").unwrap(), 8.741633333333333);
    }

    #[test]
    fn test_space_separated_seconds_variant() {
        // "N 50 06 654" reads as degrees, minutes and (large) seconds.
        let coord = parse("N 50 06 654 E 008 39 777").unwrap();
        assert_close(coord.latitude(), 50.28166666666667);
        assert_close(coord.longitude(), 8.865833333333333);
    }

    #[test]
    fn test_degree_overflow_falls_through_to_bare_tokens() {
        // Degrees beyond i32 are not an error, just the wrong
        // interpretation; the bare-token fallback still applies.
        assert_close(parse_latitude("99999999999 1").unwrap(), 99999999999.0);
    }

    #[test]
    fn test_degree_overflow_pair_fails_range_check() {
        let err = parse("99999999999 1").unwrap_err();
        assert_eq!(err.axis(), Axis::Latitude);
        assert!(matches!(err, ParseError::OutOfRange { .. }));
    }

    #[test]
    fn test_proximity_rejection() {
        let err = parse("N 52 and then some E 008").unwrap_err();
        assert_eq!(err, ParseError::TooFarApart {
            text: "N 52 and then some E 008".to_string(),
        });
        assert_eq!(err.axis(), Axis::Longitude);
    }

    #[test]
    fn test_nearby_axes_accepted() {
        let coord = parse("N 52, E 008").unwrap();
        assert_close(coord.latitude(), 52.0);
        assert_close(coord.longitude(), 8.0);
    }

    #[test]
    fn test_unrecognized_input() {
        let err = parse("foo bar").unwrap_err();
        assert_eq!(err.axis(), Axis::Latitude);
        assert_eq!(err.offending_text(), "foo bar");

        let err = parse("").unwrap_err();
        assert_eq!(err.axis(), Axis::Latitude);
    }

    #[test]
    fn test_lone_latitude_fails_on_longitude() {
        // A single value resolves the latitude but leaves nothing for
        // the longitude scan.
        let err = parse("52.5").unwrap_err();
        assert_eq!(err.axis(), Axis::Longitude);
        assert!(matches!(err, ParseError::Unrecognized { .. }));
    }

    #[test]
    fn test_single_axis_errors() {
        assert!(parse_latitude("").is_err());
        assert!(parse_latitude("one two three").is_err());
        assert!(parse_longitude("no numbers here").is_err());
    }
}
