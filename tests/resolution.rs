//! Tests for step-length and resolution estimation

use driftclust::{
    typical_step_meters, DriftClustError, GridScheme, HexScheme, Observation, TrajectoryTable,
};

/// A single trajectory along the equator with a constant latitude step.
fn equator_table(lat_step: f64, observations: u32) -> TrajectoryTable {
    let rows = (0..observations)
        .map(|i| Observation::new(0, i, f64::from(i) * lat_step, 0.0))
        .collect();
    TrajectoryTable::from_rows(rows)
}

#[test]
fn test_typical_step_is_the_median() {
    // two trajectories with steps of 0.1 and 0.3 degrees of latitude
    let mut rows = Vec::new();
    for i in 0..3u32 {
        rows.push(Observation::new(0, i, f64::from(i) * 0.1, 0.0));
        rows.push(Observation::new(1, i, f64::from(i) * 0.3, 0.0));
    }
    let table = TrajectoryTable::from_rows(rows);

    // steps: [11100, 11100, 33300, 33300] -> median 22200
    let typical = typical_step_meters(&table, 0.5).unwrap();
    assert!((typical - 22_200.0).abs() < 1e-6);
}

#[test]
fn test_single_point_trajectories_have_no_steps() {
    let table = TrajectoryTable::from_rows(vec![
        Observation::new(0, 0, 10.0, 10.0),
        Observation::new(1, 0, 20.0, 20.0),
        Observation::new(2, 0, 30.0, 30.0),
    ]);

    assert!(matches!(
        typical_step_meters(&table, 0.5),
        Err(DriftClustError::InsufficientData { .. })
    ));
}

#[test]
fn test_zero_length_steps_are_discarded() {
    // repeated positions only: every step has length zero
    let table = TrajectoryTable::from_rows(vec![
        Observation::new(0, 0, 10.0, 10.0),
        Observation::new(0, 1, 10.0, 10.0),
        Observation::new(0, 2, 10.0, 10.0),
    ]);

    assert!(matches!(
        typical_step_meters(&table, 0.5),
        Err(DriftClustError::InsufficientData { .. })
    ));
}

#[test]
fn test_cross_trajectory_jumps_are_not_steps() {
    // each trajectory is a single point; the jump between trajectories must
    // not be mistaken for a step
    let table = TrajectoryTable::from_rows(vec![
        Observation::new(0, 0, 0.0, 0.0),
        Observation::new(1, 0, 50.0, 50.0),
    ]);

    assert!(typical_step_meters(&table, 0.5).is_err());
}

#[test]
fn test_quantile_outside_unit_interval_is_rejected() {
    let table = equator_table(0.1, 5);
    assert!(matches!(
        typical_step_meters(&table, 1.5),
        Err(DriftClustError::InvalidParameter { .. })
    ));
}

#[test]
fn test_grid_estimate_known_value() {
    // default grid: cell length 111km / 2^r; a ~10km typical step supports
    // resolution 3 (13.9 km) but not 4 (6.9 km)
    let table = equator_table(0.09, 10);
    let resolution = GridScheme::default().estimate_max_resolution(&table, 0.5).unwrap();
    assert_eq!(resolution, 3);
}

#[test]
fn test_hex_estimate_known_value() {
    // hex cell length 1110km / 2^r; a ~55km typical step supports
    // resolution 4 (69.4 km) but not 5 (34.7 km)
    let table = equator_table(0.5, 10);
    let resolution = HexScheme::new().estimate_max_resolution(&table, 0.5).unwrap();
    assert_eq!(resolution, 4);
}

#[test]
fn test_tiny_steps_saturate_at_max_resolution() {
    // sub-meter steps are finer than the finest level resolves
    let table = equator_table(1e-6, 5);
    let resolution = HexScheme::new().estimate_max_resolution(&table, 0.5).unwrap();
    assert_eq!(resolution, driftclust::MAX_RESOLUTION);
}

#[test]
fn test_huge_steps_fall_back_to_coarsest() {
    // 60-degree steps dwarf even resolution 0 cells
    let table = equator_table(60.0, 4);
    let grid = GridScheme::default().estimate_max_resolution(&table, 0.5).unwrap();
    assert_eq!(grid, 0);
}
