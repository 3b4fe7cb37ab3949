#[allow(dead_code)]
mod common;

use std::sync::Arc;

use ipp_core::buffer::{PixelBuffer, Rgb, Window, BLACK, WHITE};
use ipp_core::color::HsvWeights;
use ipp_core::error::IppError;
use ipp_core::kernel::{
    morph, subtract_background, DifferenceParams, DistanceMode, MorphOp, PixelKernel,
};
use ipp_core::observer::TimingCollector;
use ipp_core::strategy::{
    create_strategy, partition_rows, ChunkedParallelStrategy, ExecutionStrategy, FlatStrategy,
    ScalarStrategy, StrategyKind,
};

// ---------------------------------------------------------------------------
// Equivalence with the scalar reference
// ---------------------------------------------------------------------------

#[test]
fn test_difference_equivalence_across_strategies() {
    let sizes = [(37, 23), (1, 9), (9, 1), (64, 5)];
    let modes = [
        DistanceMode::Rgb,
        DistanceMode::hsv_default(),
        DistanceMode::Hsv(HsvWeights::default()),
    ];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        let reference = common::noise_buffer(w, h, 100 + i as u64);
        let input = common::perturbed(&reference, 40, 200 + i as u64);
        for mode in modes {
            for threshold in [0.0, 5.0, 7.0, 20.0, 60.0] {
                let params = DifferenceParams { threshold, mode };
                let expected =
                    subtract_background(&reference, &input, &params, &ScalarStrategy).unwrap();
                for (name, strategy) in common::strategies_under_test() {
                    let got =
                        subtract_background(&reference, &input, &params, strategy.as_ref())
                            .unwrap();
                    assert_eq!(got, expected, "{name} {w}x{h} {mode} t={threshold}");
                }
            }
        }
    }
}

#[test]
fn test_morphology_equivalence_across_strategies() {
    let sizes = [(31, 29), (1, 12), (12, 1), (50, 6)];
    for (i, &(w, h)) in sizes.iter().enumerate() {
        for density in [0.1, 0.5, 0.9] {
            let mask = common::random_mask(w, h, density, 300 + i as u64);
            for op in [MorphOp::Erode, MorphOp::Dilate] {
                for radius in 0..=4 {
                    let expected = morph(&mask, op, radius, &ScalarStrategy).unwrap();
                    for (name, strategy) in common::strategies_under_test() {
                        let got = morph(&mask, op, radius, strategy.as_ref()).unwrap();
                        assert_eq!(got, expected, "{name} {op} r={radius} {w}x{h}");
                    }
                }
            }
        }
    }
}

#[test]
fn test_more_workers_than_rows() {
    let mask = common::random_mask(13, 3, 0.5, 77);
    let expected = morph(&mask, MorphOp::Erode, 2, &ScalarStrategy).unwrap();
    for workers in [4, 5, 32] {
        let strategy = ChunkedParallelStrategy::new(workers).unwrap();
        assert_eq!(morph(&mask, MorphOp::Erode, 2, &strategy).unwrap(), expected);
    }
}

#[test]
fn test_empty_image() {
    let empty = PixelBuffer::new(0, 0, Vec::new()).unwrap();
    for (name, strategy) in common::strategies_under_test() {
        let out = morph(&empty, MorphOp::Dilate, 1, strategy.as_ref()).unwrap();
        assert!(out.is_empty(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Seams
// ---------------------------------------------------------------------------

#[test]
fn test_dilate_seam_single_black_pixel() {
    let mask = common::mask_with_dots(100, 100, WHITE, BLACK, &[(40, 50)]);
    let expected = morph(&mask, MorphOp::Dilate, 2, &ScalarStrategy).unwrap();
    for workers in [2, 3, 4] {
        let strategy = ChunkedParallelStrategy::new(workers).unwrap();
        assert_eq!(
            morph(&mask, MorphOp::Dilate, 2, &strategy).unwrap(),
            expected,
            "workers={workers}"
        );
    }
}

#[test]
fn test_erode_seam_single_black_pixel() {
    let mask = common::mask_with_dots(100, 100, WHITE, BLACK, &[(40, 50)]);
    let expected = morph(&mask, MorphOp::Erode, 2, &ScalarStrategy).unwrap();
    // The dot grows into a 5x5 block spanning rows 48..=52.
    assert_eq!(100 * 100 - common::count_white(&expected), 25);
    for workers in [2, 3, 4] {
        let strategy = ChunkedParallelStrategy::new(workers).unwrap();
        assert_eq!(
            morph(&mask, MorphOp::Erode, 2, &strategy).unwrap(),
            expected,
            "workers={workers}"
        );
    }
}

#[test]
fn test_dots_on_every_band_boundary() {
    // Rows adjacent to the seams of 2, 3 and 4 bands over 100 rows.
    let rows = [24, 25, 32, 33, 34, 49, 50, 65, 66, 67, 74, 75];
    let dots: Vec<_> = rows.iter().enumerate().map(|(i, &y)| (i * 8, y)).collect();
    let white_dots = common::mask_with_dots(100, 100, BLACK, WHITE, &dots);
    let black_dots = common::mask_with_dots(100, 100, WHITE, BLACK, &dots);
    for radius in [1, 2, 3] {
        let expected_dilate = morph(&white_dots, MorphOp::Dilate, radius, &ScalarStrategy).unwrap();
        let expected_erode = morph(&black_dots, MorphOp::Erode, radius, &ScalarStrategy).unwrap();
        for workers in [2, 3, 4] {
            let strategy = ChunkedParallelStrategy::new(workers).unwrap();
            assert_eq!(
                morph(&white_dots, MorphOp::Dilate, radius, &strategy).unwrap(),
                expected_dilate,
                "dilate r={radius} workers={workers}"
            );
            assert_eq!(
                morph(&black_dots, MorphOp::Erode, radius, &strategy).unwrap(),
                expected_erode,
                "erode r={radius} workers={workers}"
            );
        }
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let mask = common::random_mask(64, 64, 0.4, 5);
    let strategy = ChunkedParallelStrategy::new(8).unwrap();
    let first = morph(&mask, MorphOp::Dilate, 3, &strategy).unwrap();
    for _ in 0..5 {
        assert_eq!(morph(&mask, MorphOp::Dilate, 3, &strategy).unwrap(), first);
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// Copies its input, except that it panics on one row.
struct PanicOnRow(usize);

impl PixelKernel for PanicOnRow {
    fn name(&self) -> &str {
        "panic_on_row"
    }

    fn evaluate(&self, window: &Window<'_>, x: usize, y: usize) -> Rgb {
        if y == self.0 {
            panic!("bad row {y}");
        }
        window.get(x, y)
    }
}

#[test]
fn test_band_panic_becomes_worker_failure() {
    let input = common::noise_buffer(6, 20, 1);
    let strategy = ChunkedParallelStrategy::new(4).unwrap();
    // 20 rows over 4 bands: row 7 belongs to band 1.
    match strategy.execute(&PanicOnRow(7), &input) {
        Err(IppError::WorkerFailure { band, message }) => {
            assert_eq!(band, 1);
            assert!(message.contains("bad row 7"), "{message}");
        }
        other => panic!("expected WorkerFailure, got {other:?}"),
    }
}

#[test]
fn test_pass_through_kernel_without_panic() {
    let input = common::noise_buffer(6, 20, 2);
    let strategy = ChunkedParallelStrategy::new(4).unwrap();
    assert_eq!(strategy.execute(&PanicOnRow(usize::MAX), &input).unwrap(), input);
    assert_eq!(FlatStrategy.execute(&PanicOnRow(usize::MAX), &input).unwrap(), input);
}

#[test]
fn test_zero_workers_rejected() {
    assert!(matches!(
        ChunkedParallelStrategy::new(0),
        Err(IppError::InvalidParameter(_))
    ));
    assert!(create_strategy(StrategyKind::Chunked, Some(0), None).is_err());
}

// ---------------------------------------------------------------------------
// Factory and observer
// ---------------------------------------------------------------------------

#[test]
fn test_create_strategy_names() {
    assert_eq!(create_strategy(StrategyKind::Scalar, None, None).unwrap().name(), "Scalar");
    assert_eq!(create_strategy(StrategyKind::Flat, Some(3), None).unwrap().name(), "Flat");
    assert_eq!(create_strategy(StrategyKind::Chunked, Some(2), None).unwrap().name(), "Chunked");
    assert_eq!(StrategyKind::default(), StrategyKind::Chunked);
}

#[test]
fn test_observer_sees_every_band() {
    let collector = Arc::new(TimingCollector::new());
    let strategy = ChunkedParallelStrategy::new(3)
        .unwrap()
        .with_observer(collector.clone());
    assert_eq!(strategy.workers(), 3);

    let mask = common::random_mask(10, 11, 0.5, 8);
    morph(&mask, MorphOp::Erode, 1, &strategy).unwrap();

    let bands = collector.bands();
    let rows: Vec<_> = bands.iter().map(|b| b.rows.clone()).collect();
    assert_eq!(rows, partition_rows(11, 3));
    assert_eq!(
        bands.iter().map(|b| b.band).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn test_create_strategy_passes_observer_to_chunked() {
    let collector = Arc::new(TimingCollector::new());
    let strategy = create_strategy(StrategyKind::Chunked, Some(4), Some(collector.clone())).unwrap();

    let mask = common::random_mask(6, 9, 0.3, 21);
    morph(&mask, MorphOp::Dilate, 2, strategy.as_ref()).unwrap();
    assert_eq!(collector.bands().len(), 4);

    let scalar = create_strategy(StrategyKind::Scalar, None, Some(collector.clone())).unwrap();
    morph(&mask, MorphOp::Dilate, 2, scalar.as_ref()).unwrap();
    assert_eq!(collector.bands().len(), 4);
}
