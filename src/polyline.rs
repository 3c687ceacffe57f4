//! Encoded polyline codec.
//!
//! Providers ship route geometry as a string of 5-bit groups, each stored in
//! one printable character offset by 63. Values are zig-zag signed deltas,
//! latitude first, scaled by `10^precision`. Decoding happens here, at the
//! boundary; everything downstream works with [`Path`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CodecError;
use crate::geometry::{Coordinate, Path};

const CHAR_OFFSET: u32 = 63;
const CONTINUATION: u64 = 0x20;
const GROUP_MASK: u64 = 0x1f;

/// Number of implied decimal digits in an encoded path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precision {
    /// Google Directions style, `1e5`.
    Five,
    /// OSRM `polyline6` style, `1e6`.
    Six,
}

impl Precision {
    pub fn digits(self) -> u32 {
        match self {
            Precision::Five => 5,
            Precision::Six => 6,
        }
    }

    pub fn scale(self) -> f64 {
        10f64.powi(self.digits() as i32)
    }
}

impl TryFrom<u32> for Precision {
    type Error = CodecError;

    fn try_from(digits: u32) -> Result<Self, Self::Error> {
        match digits {
            5 => Ok(Precision::Five),
            6 => Ok(Precision::Six),
            other => Err(CodecError::UnsupportedPrecision(other)),
        }
    }
}

/// Decodes an encoded path into (longitude, latitude) coordinates.
///
/// Returns `Ok(None)` when there is no input or when fewer than two points
/// survive decoding. Delta pairs of exactly `(0, 0)` are dropped. Structural
/// damage (a dangling continuation group, a character outside the alphabet,
/// an unpaired value) is an error rather than a missing path.
pub fn decode(encoded: Option<&str>, precision: Precision) -> Result<Option<Path>, CodecError> {
    let Some(encoded) = encoded else {
        return Ok(None);
    };

    let values = decode_values(encoded)?;
    if values.len() % 2 != 0 {
        return Err(CodecError::UnpairedValue {
            count: values.len(),
        });
    }

    let scale = precision.scale();
    let (mut lat, mut lon) = (0i64, 0i64);
    let mut points = Vec::with_capacity(values.len() / 2);

    for pair in values.chunks_exact(2) {
        let ((lat_pos, d_lat), (lon_pos, d_lon)) = (pair[0], pair[1]);
        if d_lat == 0 && d_lon == 0 {
            continue;
        }
        lat = lat
            .checked_add(d_lat)
            .ok_or(CodecError::Overflow { position: lat_pos })?;
        lon = lon
            .checked_add(d_lon)
            .ok_or(CodecError::Overflow { position: lon_pos })?;
        points.push(Coordinate::new(
            round6(lon as f64 / scale),
            round6(lat as f64 / scale),
        ));
    }

    debug!(
        chars = encoded.len(),
        points = points.len(),
        digits = precision.digits(),
        "decoded polyline"
    );
    Ok(Path::new(points))
}

/// Encodes (longitude, latitude) coordinates as the inverse of [`decode`].
///
/// Consecutive points that round to the same value encode as a `(0, 0)`
/// delta, which `decode` drops. Points outside the lon/lat bounds, or not
/// finite, are refused.
pub fn encode(points: &[Coordinate], precision: Precision) -> Result<String, CodecError> {
    let scale = precision.scale();
    let mut out = String::with_capacity(points.len() * 8);
    let (mut prev_lat, mut prev_lon) = (0i64, 0i64);

    for (index, point) in points.iter().enumerate() {
        if !point.is_valid_lon_lat() {
            return Err(CodecError::UnencodablePoint { index });
        }
        let lat = (point.lat() * scale).round() as i64;
        let lon = (point.lon() * scale).round() as i64;
        let d_lat = lat
            .checked_sub(prev_lat)
            .ok_or(CodecError::UnencodablePoint { index })?;
        let d_lon = lon
            .checked_sub(prev_lon)
            .ok_or(CodecError::UnencodablePoint { index })?;
        encode_value(d_lat, &mut out);
        encode_value(d_lon, &mut out);
        prev_lat = lat;
        prev_lon = lon;
    }

    Ok(out)
}

/// Splits the string into signed integers, each tagged with the byte where it starts.
fn decode_values(encoded: &str) -> Result<Vec<(usize, i64)>, CodecError> {
    let mut values = Vec::new();
    let mut acc: u64 = 0;
    let mut shift: u32 = 0;
    let mut start = 0;

    for (position, ch) in encoded.char_indices() {
        let code = ch as u32;
        if !(CHAR_OFFSET..=126).contains(&code) {
            return Err(CodecError::InvalidCharacter { position, found: ch });
        }
        if shift == 0 {
            start = position;
        }

        let chunk = u64::from(code - CHAR_OFFSET);
        let group = chunk & GROUP_MASK;
        if shift >= 64 || (shift > 59 && group >> (64 - shift) != 0) {
            return Err(CodecError::Overflow { position: start });
        }
        acc |= group << shift;

        if chunk & CONTINUATION != 0 {
            shift += 5;
            continue;
        }

        // Lowest bit carries the sign.
        let magnitude = (acc >> 1) as i64;
        values.push((start, if acc & 1 == 1 { !magnitude } else { magnitude }));
        acc = 0;
        shift = 0;
    }

    if shift != 0 {
        return Err(CodecError::Truncated {
            position: encoded.len(),
        });
    }
    Ok(values)
}

fn encode_value(delta: i64, out: &mut String) {
    let mut zigzag = ((delta << 1) ^ (delta >> 63)) as u64;
    while zigzag >= CONTINUATION {
        out.push(group_char((CONTINUATION | (zigzag & GROUP_MASK)) as u32));
        zigzag >>= 5;
    }
    out.push(group_char(zigzag as u32));
}

fn group_char(group: u32) -> char {
    char::from_u32(group + CHAR_OFFSET).unwrap_or('?')
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    fn pairs(path: &Path) -> Vec<(f64, f64)> {
        path.points().iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_reference_vector_at_five_digits() {
        let path = decode(Some(REFERENCE), Precision::Five).unwrap().unwrap();
        assert_eq!(
            pairs(&path),
            vec![(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)]
        );
    }

    #[test]
    fn test_reference_vector_at_six_digits() {
        let path = decode(Some(REFERENCE), Precision::Six).unwrap().unwrap();
        assert_eq!(
            pairs(&path),
            vec![(-12.02, 3.85), (-12.095, 4.07), (-12.6453, 4.3252)]
        );
    }

    #[test]
    fn test_missing_input_is_missing() {
        assert_eq!(decode(None, Precision::Six), Ok(None));
        assert_eq!(decode(Some(""), Precision::Six), Ok(None));
    }

    #[test]
    fn test_single_point_is_missing() {
        assert_eq!(decode(Some("_p~iF~ps|U"), Precision::Five), Ok(None));
    }

    #[test]
    fn test_zero_pair_is_skipped() {
        // A, (0,0), B
        let encoded = "_p~iF~ps|U??_ulLnnqC";
        let path = decode(Some(encoded), Precision::Five).unwrap().unwrap();
        assert_eq!(pairs(&path), vec![(-120.2, 38.5), (-120.95, 40.7)]);

        assert_eq!(decode(Some("????"), Precision::Five), Ok(None));
    }

    #[test]
    fn test_truncated_input_fails() {
        assert_eq!(
            decode(Some("_p~iF~ps|"), Precision::Five),
            Err(CodecError::Truncated { position: 9 })
        );
    }

    #[test]
    fn test_invalid_character_fails() {
        assert_eq!(
            decode(Some("_p~iF ps|U"), Precision::Five),
            Err(CodecError::InvalidCharacter {
                position: 5,
                found: ' '
            })
        );
    }

    #[test]
    fn test_unpaired_value_fails() {
        assert_eq!(
            decode(Some("_p~iF"), Precision::Five),
            Err(CodecError::UnpairedValue { count: 1 })
        );
    }

    #[test]
    fn test_overlong_value_fails() {
        let encoded = "~".repeat(14);
        assert_eq!(
            decode(Some(encoded.as_str()), Precision::Six),
            Err(CodecError::Overflow { position: 0 })
        );
    }

    #[test]
    fn test_encode_reference_vector() {
        let points = [(-120.2, 38.5), (-120.95, 40.7), (-126.453, 43.252)]
            .into_iter()
            .map(Coordinate::from)
            .collect::<Vec<_>>();
        assert_eq!(encode(&points, Precision::Five).unwrap(), REFERENCE);
    }

    #[test]
    fn test_round_trip_six_digits() {
        let points = vec![
            Coordinate::new(-0.127758, 51.507351),
            Coordinate::new(-0.141588, 51.501009),
            Coordinate::new(-0.075278, 51.505456),
            Coordinate::new(2.352222, 48.856614),
        ];
        let encoded = encode(&points, Precision::Six).unwrap();
        let decoded = decode(Some(encoded.as_str()), Precision::Six).unwrap().unwrap();
        assert_eq!(decoded.points(), &points[..]);
    }

    #[test]
    fn test_encode_refuses_unencodable_points() {
        let huge = [Coordinate::new(1e300, 0.0), Coordinate::new(-1e300, 0.0)];
        assert_eq!(
            encode(&huge, Precision::Six),
            Err(CodecError::UnencodablePoint { index: 0 })
        );

        let with_nan = [Coordinate::new(0.5, 51.0), Coordinate::new(f64::NAN, 51.0)];
        assert_eq!(
            encode(&with_nan, Precision::Five),
            Err(CodecError::UnencodablePoint { index: 1 })
        );

        let extremes = [Coordinate::new(-180.0, -90.0), Coordinate::new(180.0, 90.0)];
        let encoded = encode(&extremes, Precision::Six).unwrap();
        let path = decode(Some(encoded.as_str()), Precision::Six).unwrap().unwrap();
        assert_eq!(path.points(), &extremes[..]);
    }

    #[test]
    fn test_precision_from_digits() {
        assert_eq!(Precision::try_from(5), Ok(Precision::Five));
        assert_eq!(Precision::try_from(6), Ok(Precision::Six));
        assert_eq!(
            Precision::try_from(7),
            Err(CodecError::UnsupportedPrecision(7))
        );
        assert_eq!(Precision::Six.scale(), 1_000_000.0);
    }
}
