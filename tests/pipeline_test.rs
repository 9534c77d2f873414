//! End-to-end: CSV in, grouped, priced in parallel, CSV out.

mod fixtures;

use fare_estimator::haversine::distance_km;
use fare_estimator::io::{read_points, write_fares};
use fare_estimator::config::EstimatorConfig;
use fare_estimator::{group_by_delivery, BatchScheduler, IngestError};
use fixtures::*;

#[test]
fn csv_round_trip_prices_every_delivery() {
    // 1: London to Paris in one hour, the second sample is dropped.
    // 2: a daytime courier hop through central London.
    let stops = LONDON_STOPS;
    let noon = local_ts(2024, 1, 10, 12, 0);
    let mut input = String::from(
        "id_delivery,lat,lng,timestamp\n\
         1,51.5074,-0.1278,1609459200\n\
         1,48.8566,2.3522,1609462800\n",
    );
    for (i, stop) in stops.iter().take(3).enumerate() {
        input.push_str(&format!("2,{},{},{}\n", stop.lat, stop.lng, noon + i as i64 * 60));
    }

    let points = read_points(input.as_bytes()).unwrap();
    let deliveries = group_by_delivery(points);
    let fares = BatchScheduler::from_config(&EstimatorConfig::default())
        .run(&deliveries)
        .unwrap();

    let mut out = Vec::new();
    write_fares(&fares, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let hop = |a: &Location, b: &Location| distance_km(a.lat, a.lng, b.lat, b.lng) * 0.74;
    let courier = ((1.30 + hop(&stops[0], &stops[1])).max(3.47) + hop(&stops[1], &stops[2])).max(3.47);
    let expected = format!("id_delivery,fare_estimate\n1,3.47\n2,{:.2}\n", courier);
    assert_eq!(text, expected);
}

#[test]
fn interleaved_rows_keep_per_delivery_order() {
    let base = local_ts(2024, 1, 10, 12, 0);
    let stops = LONDON_STOPS;
    let mut input = String::from("id_delivery,lat,lng,timestamp\n");
    for (i, stop) in stops.iter().take(3).enumerate() {
        for id in [7, 8] {
            input.push_str(&format!("{},{},{},{}\n", id, stop.lat, stop.lng, base + i as i64 * 120));
        }
    }

    let deliveries = group_by_delivery(read_points(input.as_bytes()).unwrap());

    assert_eq!(deliveries.len(), 2);
    for points in deliveries.values() {
        let coords: Vec<(f64, f64)> = points.iter().map(|p| p.coords()).collect();
        let expected: Vec<(f64, f64)> = stops.iter().take(3).map(Location::coords).collect();
        assert_eq!(coords, expected);
    }
}

#[test]
fn malformed_row_is_an_ingest_error() {
    let input = "id_delivery,lat,lng,timestamp\n1,51.5,-0.12\n";
    let err = read_points(input.as_bytes()).unwrap_err();
    assert!(matches!(err, IngestError::Csv(_)));
}
