// Host-path properties: everything here runs without a GPU.
//
// Run:
//   cargo test --test reference_math -- --nocapture

use matmul_bench::{
    dispatch_grid, matmul_shader, mean_absolute_difference, Problem, ReferenceEngine, TILE_DIM,
};

#[test]
fn output_length_is_n_squared_for_valid_sizes() {
    for size in [16, 32, 64, 128] {
        let problem = Problem::random_seeded(size, size as u64).unwrap();
        let mut engine = ReferenceEngine::new(&problem);
        assert_eq!(engine.calculate(&problem).len(), size * size);
    }
}

#[test]
fn reference_is_idempotent() {
    let problem = Problem::random_seeded(48, 1234).unwrap();
    let mut engine = ReferenceEngine::new(&problem);

    let first = engine.calculate(&problem).to_vec();
    let second = engine.calculate(&problem).to_vec();
    assert_eq!(first, second, "repeat calculation must be bitwise identical");
}

#[test]
fn all_ones_oracle() {
    // Ones times ones of dimension N puts exactly N at every position.
    let size = 16;
    let problem = Problem::filled(size, 1.0, 1.0).unwrap();
    let mut engine = ReferenceEngine::new(&problem);

    let result = engine.calculate(&problem);
    assert!(result.iter().all(|&c| c == size as f32));
}

#[test]
fn scaled_constant_oracle() {
    // 3 * 4 summed over k = 16 terms: every element is 192.
    let problem = Problem::filled(16, 3.0, 4.0).unwrap();
    let mut engine = ReferenceEngine::new(&problem);

    let result = engine.calculate(&problem);
    assert!(result.iter().all(|&c| c == 192.0));
}

#[test]
fn comparator_requires_both_results() {
    let problem = Problem::random_seeded(16, 5).unwrap();
    let mut engine = ReferenceEngine::new(&problem);
    let result = engine.calculate(&problem).to_vec();

    assert_eq!(mean_absolute_difference(Some(&result[..]), None), None);
    assert_eq!(mean_absolute_difference(None, Some(&result[..])), None);
    assert_eq!(
        mean_absolute_difference(Some(&result[..]), Some(&result[..])),
        Some(0.0)
    );
}

#[test]
fn comparator_is_non_negative() {
    let p1 = Problem::random_seeded(16, 10).unwrap();
    let p2 = Problem::random_seeded(16, 11).unwrap();
    let diff = mean_absolute_difference(Some(p1.a()), Some(p2.a())).unwrap();
    assert!(diff >= 0.0);
}

#[test]
fn sizes_off_tile_boundaries_are_rejected_everywhere() {
    for size in [0, 1, 15, 17, 100, 1000] {
        assert!(Problem::random(size).is_err());
        assert!(dispatch_grid(size).is_err());
        assert!(matmul_shader(size).is_err());
    }
    assert_eq!(TILE_DIM, 16);
}

#[test]
fn dispatch_grid_partitions_exactly() {
    assert_eq!(dispatch_grid(1024).unwrap(), (64, 64));
    assert_eq!(dispatch_grid(16).unwrap(), (1, 1));
    assert_eq!(dispatch_grid(256).unwrap(), (16, 16));
}
