//! Encoded polyline decoder.
//!
//! Decodes route geometries in the standard 5-bit chunk format documented at
//! https://developers.google.com/maps/documentation/utilities/polylinealgorithm
//! Coordinate deltas are zigzag-encoded, packed into 5-bit groups with a
//! continuation bit (0x20) and offset by 63 into printable ASCII, scaled by 1e5.

use thiserror::Error;

use crate::services::geo::GeoPoint;

/// Errors that can occur while decoding an encoded polyline.
///
/// A malformed geometry from the directions provider is a contract violation;
/// the whole route is rejected rather than silently patched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolylineError {
    #[error("polyline truncated mid-coordinate at byte {0}")]
    Truncated(usize),
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },
}

const CHAR_OFFSET: u8 = 63;
// Chunks carry 5 value bits plus the continuation bit, so the highest
// encodable byte is 63 + 0x3f = 126 ('~').
const CHAR_MAX: u8 = 126;
const CONTINUATION_BIT: i64 = 0x20;
const COORDINATE_SCALE: f64 = 1e5;

/// Decode an encoded polyline string into (lat, lng) points.
///
/// An empty string decodes to an empty sequence; point order follows the
/// encoding order exactly.
pub fn decode_polyline(encoded: &str) -> Result<Vec<GeoPoint>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        lat += decode_delta(bytes, &mut index)?;
        lng += decode_delta(bytes, &mut index)?;
        points.push(GeoPoint {
            lat: lat as f64 / COORDINATE_SCALE,
            lng: lng as f64 / COORDINATE_SCALE,
        });
    }

    Ok(points)
}

/// Decode one zigzag-encoded signed delta, advancing `index` past it.
fn decode_delta(bytes: &[u8], index: &mut usize) -> Result<i64, PolylineError> {
    let mut shift = 0;
    let mut value: i64 = 0;

    loop {
        let offset = *index;
        let byte = *bytes
            .get(offset)
            .ok_or(PolylineError::Truncated(offset))?;
        if !(CHAR_OFFSET..=CHAR_MAX).contains(&byte) || shift >= 64 {
            return Err(PolylineError::InvalidByte { byte, offset });
        }
        let chunk = i64::from(byte - CHAR_OFFSET);
        value |= (chunk & 0x1f) << shift;
        shift += 5;
        *index += 1;
        if chunk < CONTINUATION_BIT {
            break;
        }
    }

    // Zigzag: LSB set means the value is the one's complement of value >> 1.
    Ok(if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference polyline from the encoding documentation; decodes to
    // (38.5, -120.2), (40.7, -120.95), (43.252, -126.453).
    const REFERENCE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";
    const REFERENCE_POINTS: [(f64, f64); 3] = [
        (38.5, -120.2),
        (40.7, -120.95),
        (43.252, -126.453),
    ];

    #[test]
    fn test_reference_polyline_point_count() {
        let points = decode_polyline(REFERENCE_POLYLINE).unwrap();
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_reference_polyline_values_and_order() {
        let points = decode_polyline(REFERENCE_POLYLINE).unwrap();
        for (got, (lat, lng)) in points.iter().zip(REFERENCE_POINTS) {
            assert!((got.lat - lat).abs() < 1e-4, "lat {} vs {}", got.lat, lat);
            assert!((got.lng - lng).abs() < 1e-4, "lng {} vs {}", got.lng, lng);
        }
    }

    #[test]
    fn test_single_point() {
        // First two coordinate groups of the reference polyline.
        let points = decode_polyline("_p~iF~ps|U").unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].lat - 38.5).abs() < 1e-4);
        assert!((points[0].lng + 120.2).abs() < 1e-4);
    }

    #[test]
    fn test_empty_string_decodes_to_no_points() {
        assert_eq!(decode_polyline("").unwrap(), vec![]);
    }

    #[test]
    fn test_truncated_mid_latitude() {
        // "_p~iF" with the final chunk removed leaves a dangling continuation bit.
        let err = decode_polyline("_p~i").unwrap_err();
        assert_eq!(err, PolylineError::Truncated(4));
    }

    #[test]
    fn test_truncated_missing_longitude() {
        // A complete latitude with no longitude at all.
        let err = decode_polyline("_p~iF").unwrap_err();
        assert_eq!(err, PolylineError::Truncated(5));
    }

    #[test]
    fn test_invalid_byte_rejected() {
        let err = decode_polyline("_p~iF~ps|U\x20").unwrap_err();
        assert!(matches!(err, PolylineError::InvalidByte { offset: 10, .. }));
    }

    #[test]
    fn test_zero_delta_round_trip() {
        // "??" encodes a (0, 0) delta pair.
        let points = decode_polyline("??").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!((points[0].lat, points[0].lng), (0.0, 0.0));
    }
}
