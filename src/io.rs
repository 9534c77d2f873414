//! CSV ingestion and result output.
//!
//! Input rows are `id_delivery,lat,lng,timestamp` with a header line.
//! Output rows are `id_delivery,fare_estimate` in ascending id order with
//! fares printed to two decimals.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim, WriterBuilder};
use tracing::debug;

use crate::error::IngestError;
use crate::point::GeoPoint;
use crate::scheduler::FareResult;

pub const OUTPUT_HEADER: [&str; 2] = ["id_delivery", "fare_estimate"];

/// Read points from CSV, keeping row order.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<GeoPoint>, IngestError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for row in reader.deserialize::<GeoPoint>() {
        points.push(row?);
    }
    debug!(points = points.len(), "read points");
    Ok(points)
}

pub fn read_points_from_path(path: &Path) -> Result<Vec<GeoPoint>, IngestError> {
    read_points(File::open(path)?)
}

/// Write one row per delivery.
pub fn write_fares<W: Write>(fares: &FareResult, writer: W) -> Result<(), IngestError> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(OUTPUT_HEADER)?;
    for (delivery_id, fare) in fares {
        writer.write_record([delivery_id.to_string(), format!("{:.2}", fare)])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_fares_to_path(fares: &FareResult, path: &Path) -> Result<(), IngestError> {
    write_fares(fares, File::create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_points() {
        let data = "id_delivery,lat,lng,timestamp\n\
                    1,51.5074,-0.1278,1609459200\n\
                    1,48.8566,2.3522,1609462800\n";

        let points = read_points(data.as_bytes()).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], GeoPoint::new(1, 51.5074, -0.1278, 1_609_459_200));
        assert_eq!(points[1].timestamp, 1_609_462_800);
    }

    #[test]
    fn test_read_negative_delivery_id() {
        let data = "id_delivery,lat,lng,timestamp\n-4,51.5,-0.12,0\n";
        let points = read_points(data.as_bytes()).unwrap();
        assert_eq!(points, vec![GeoPoint::new(-4, 51.5, -0.12, 0)]);
    }

    #[test]
    fn test_read_rejects_non_numeric() {
        let data = "id_delivery,lat,lng,timestamp\n1,north,-0.1278,1609459200\n";
        let err = read_points(data.as_bytes()).unwrap_err();
        assert!(matches!(err, IngestError::Csv(_)));
    }

    #[test]
    fn test_read_header_only() {
        let points = read_points("id_delivery,lat,lng,timestamp\n".as_bytes()).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_write_fares() {
        let mut fares = FareResult::new();
        fares.insert(2, 8.75);
        fares.insert(1, 5.5);

        let mut out = Vec::new();
        write_fares(&fares, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "id_delivery,fare_estimate\n1,5.50\n2,8.75\n");
    }
}
