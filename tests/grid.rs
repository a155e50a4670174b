//! Tests for the grid discretization backend

use driftclust::{Cell, DriftClustError, GridCell, GridConfig, GridScheme, Observation, TrajectoryTable};

fn cell(lon_bin: u32, lat_bin: u32) -> GridCell {
    GridCell { lon_bin, lat_bin }
}

#[test]
fn test_to_cell_known_values() {
    let scheme = GridScheme::default();

    // negative longitude wraps into [0, 360)
    assert_eq!(scheme.to_cell(-80.5, -11.1, 0), cell(348, 9));
    assert_eq!(scheme.to_cell(70.4, 12.3, 0), cell(12, 160));
    assert_eq!(scheme.to_cell(53.1, 45.1, 0), cell(45, 143));
}

#[test]
fn test_centroid_known_values() {
    let scheme = GridScheme::default();

    assert_eq!(scheme.cell_to_centroid(cell(348, 9), 0), (-80.5, 348.5));
    assert_eq!(scheme.cell_to_centroid(cell(12, 160), 0), (70.5, 12.5));
    assert_eq!(scheme.cell_to_centroid(cell(45, 143), 0), (53.5, 45.5));
}

#[test]
fn test_discretize_centroid_discretize_is_idempotent() {
    let scheme = GridScheme::default();
    let points = [
        (-80.5, -11.1),
        (70.4, 12.3),
        (53.1, 45.1),
        (0.0, 0.0),
        (-89.9, 359.9),
        (89.9, 180.0),
    ];

    for resolution in [0u8, 1, 3, 6] {
        for &(latitude, longitude) in &points {
            let first = scheme.to_cell(latitude, longitude, resolution);
            let (center_lat, center_lon) = scheme.cell_to_centroid(first, resolution);
            let second = scheme.to_cell(center_lat, center_lon, resolution);
            assert_eq!(
                first, second,
                "round trip moved ({latitude}, {longitude}) at resolution {resolution}"
            );
        }
    }
}

#[test]
fn test_rightmost_edge_clamps_into_last_bin() {
    let scheme = GridScheme::default();

    // latitude 90 sits exactly on the last edge
    assert_eq!(scheme.to_cell(90.0, 10.5, 0).lat_bin, 179);
    // latitude -90 on the first edge
    assert_eq!(scheme.to_cell(-90.0, 10.5, 0).lat_bin, 0);
    // longitude 360 wraps to 0 rather than clamping
    assert_eq!(scheme.to_cell(0.5, 360.0, 0).lon_bin, 0);
}

#[test]
fn test_resolution_doubles_bin_counts() {
    let scheme = GridScheme::default();

    // at resolution 1 the one-degree default becomes half-degree bins
    assert_eq!(scheme.to_cell(0.25, 0.25, 1), cell(0, 180));
    assert_eq!(scheme.to_cell(0.75, 0.75, 1), cell(1, 181));
}

#[test]
fn test_coarsen_maps_to_ancestor() {
    let scheme = GridScheme::default();

    let fine = scheme.to_cell(53.1, 45.1, 2);
    let coarse = scheme.coarsen(fine, 2, 0).unwrap();
    assert_eq!(coarse, scheme.to_cell(53.1, 45.1, 0));

    // stepping down one level at a time lands on the same ancestor
    let stepped = scheme.coarsen(scheme.coarsen(fine, 2, 1).unwrap(), 1, 0).unwrap();
    assert_eq!(stepped, coarse);
}

#[test]
fn test_coarsen_to_resolution_zero_is_idempotent() {
    let scheme = GridScheme::default();

    let base = scheme.to_cell(-12.4, 101.7, 0);
    let once = scheme.coarsen(base, 0, 0).unwrap();
    let twice = scheme.coarsen(once, 0, 0).unwrap();
    assert_eq!(base, once);
    assert_eq!(once, twice);
}

#[test]
fn test_coarsen_rejects_finer_target() {
    let scheme = GridScheme::default();
    assert!(matches!(
        scheme.coarsen(cell(1, 1), 0, 3),
        Err(DriftClustError::InvalidParameter { .. })
    ));
}

#[test]
fn test_to_cells_preserves_table_keys() {
    let table = TrajectoryTable::from_rows(vec![
        Observation::new(4, 0, 10.5, 20.5),
        Observation::new(4, 1, 11.5, 20.5),
        Observation::new(9, 0, -5.5, 300.5),
    ]);

    let series = GridScheme::default().to_cells(&table, 0);
    assert_eq!(series.len(), 3);
    assert_eq!(series[0].trajectory, 4);
    assert_eq!(series[0].observation, 0);
    assert_eq!(series[2].trajectory, 9);
    assert_eq!(series[2].value, Cell::Grid(cell(300, 84)));
}

#[test]
fn test_custom_ranges() {
    // a regional grid over [0, 10) x [40, 50) with 10 bins per axis
    let scheme = GridScheme::new(GridConfig {
        lon_start: 0.0,
        lon_end: 10.0,
        lon_bins: 10,
        lat_start: 40.0,
        lat_end: 50.0,
        lat_bins: 10,
    });

    assert_eq!(scheme.to_cell(42.5, 3.3, 0), cell(3, 2));
    let (latitude, longitude) = scheme.cell_to_centroid(cell(3, 2), 0);
    assert_eq!((latitude, longitude), (42.5, 3.5));
}
