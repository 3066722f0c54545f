use std::num::NonZeroUsize;

use admm_logreg::{
    AdmmErr, AdmmOptimizer, AdmmSpec, InitialState, LabeledPoint, LocalCluster, StoppingSpec,
    data, train, train_with_report,
};
use ndarray::{Array1, array};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two partitions holding one point each, separable by any positive weight.
fn separable_1d() -> Vec<Vec<LabeledPoint>> {
    vec![
        vec![LabeledPoint::new(1., vec![2.])],
        vec![LabeledPoint::new(-1., vec![-2.])],
    ]
}

/// Points labeled by the sign of a fixed linear model plus a little noise.
fn synthetic(seed: u64, len: usize) -> (Vec<LabeledPoint>, Array1<f64>) {
    let truth = array![1.5, -2., 0., 0.5];
    let mut rng = StdRng::seed_from_u64(seed);

    let points = (0..len)
        .map(|_| {
            let features: Vec<f64> = (0..truth.len())
                .map(|_| rng.random_range(-1.0..1.0))
                .collect();
            let noise: f64 = 0.1 * rng.random_range(-1.0..1.0);
            let margin = truth.dot(&Array1::from(features.clone())) + noise;
            let label = if margin >= 0. { 1. } else { -1. };

            LabeledPoint::new(label, features)
        })
        .collect();

    (points, truth)
}

fn shards(points: Vec<LabeledPoint>, n: usize) -> Vec<Vec<LabeledPoint>> {
    data::partition(points, NonZeroUsize::new(n).unwrap())
}

#[test]
fn separable_points_get_a_positive_weight() {
    init_logger();

    let spec = AdmmSpec::new(20, 0., 1.);
    let report = train_with_report(separable_1d(), &spec, None).unwrap();

    assert_eq!(report.weights.len(), 1);
    assert!(report.weights[0] > 0., "weight {}", report.weights[0]);
    assert_eq!(report.rounds.len(), 20);

    let objectives = report.objectives();
    for pair in objectives[..5].windows(2) {
        assert!(pair[1] < pair[0], "objective went up: {objectives:?}");
    }
}

#[test]
fn large_lambda_zeroes_every_weight() {
    init_logger();

    let weights = train(separable_1d(), 20, 10., 1.).unwrap();
    assert_eq!(weights, array![0.]);

    let spec = AdmmSpec::new(20, 10., 1.);
    let report = train_with_report(separable_1d(), &spec, None).unwrap();
    assert!(report.rounds.iter().all(|r| r.nonzeros == 0));
}

#[test]
fn recovers_the_separating_direction() {
    init_logger();

    let (points, truth) = synthetic(7, 400);
    let weights = train(shards(points.clone(), 4), 20, 0., 1.).unwrap();

    assert_eq!(weights.len(), truth.len());
    assert!(weights[0] > 0. && weights[1] < 0.);

    let correct = points
        .iter()
        .filter(|p| p.margin(weights.view()) > 0.)
        .count();
    let accuracy = correct as f64 / points.len() as f64;
    assert!(accuracy > 0.9, "training accuracy {accuracy}");
}

#[test]
fn identical_runs_are_bit_identical() {
    let (points, _) = synthetic(11, 200);

    let first = train(shards(points.clone(), 5), 8, 0.5, 1.).unwrap();
    let second = train(shards(points, 5), 8, 0.5, 1.).unwrap();

    assert_eq!(first, second);
}

#[test]
fn partition_order_does_not_matter() {
    let (points, _) = synthetic(3, 200);
    let partitions = shards(points, 4);

    let mut reversed = partitions.clone();
    reversed.reverse();

    let a = train(partitions, 5, 0.2, 1.).unwrap();
    let b = train(reversed, 5, 0.2, 1.).unwrap();

    for (a, b) in a.iter().zip(&b) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }
}

#[test]
fn every_vector_keeps_the_feature_dimension() {
    let (points, truth) = synthetic(5, 120);
    let cluster = LocalCluster::new(shards(points, 3)).unwrap();

    let spec = AdmmSpec::new(4, 0.1, 2.);
    let trained = AdmmOptimizer::from_spec(&spec).unwrap().run(cluster).unwrap();

    let dim = truth.len();
    assert_eq!(trained.report.weights.len(), dim);

    for state in trained.substrate.states() {
        assert_eq!(state.x().len(), dim);
        assert_eq!(state.z().len(), dim);
        assert_eq!(state.u().len(), dim);
        assert_eq!(state.z(), trained.report.weights);
    }
}

#[test]
fn early_stopping_ends_before_the_last_round() {
    init_logger();

    let mut spec = AdmmSpec::new(500, 1., 1.);
    spec.stopping = Some(StoppingSpec {
        abs_tol: 1e-3,
        rel_tol: 1e-2,
    });

    let (points, _) = synthetic(13, 200);
    let report = train_with_report(shards(points, 2), &spec, None).unwrap();

    assert!(report.converged);
    assert!(report.rounds.len() < 500);
}

#[test]
fn ridge_shrinks_towards_zero() {
    let (points, _) = synthetic(17, 200);

    let plain = AdmmSpec::from_json(r#"{ "num_iterations": 10, "regularizer": "l2" }"#).unwrap();
    let ridge = AdmmSpec::from_json(
        r#"{ "num_iterations": 10, "lambda": 50.0, "regularizer": "l2" }"#,
    )
    .unwrap();

    let plain = train_with_report(shards(points.clone(), 2), &plain, None).unwrap();
    let ridge = train_with_report(shards(points, 2), &ridge, None).unwrap();

    let norm = |w: &Array1<f64>| w.dot(w).sqrt();
    assert!(ridge.weights.iter().all(|w| w.is_finite()));
    assert!(norm(&ridge.weights) < norm(&plain.weights));
    assert_eq!(ridge.rounds[0].nonzeros, 4);
}

#[test]
fn warm_start_continues_from_a_previous_consensus() {
    let (points, _) = synthetic(19, 200);
    let spec = AdmmSpec::new(10, 0., 1.);

    let cold = train_with_report(shards(points.clone(), 2), &spec, None).unwrap();
    let initial = InitialState::from_consensus(cold.weights.clone());
    let warm = train_with_report(shards(points, 2), &spec, Some(&initial)).unwrap();

    // starting from the consensus means the first round barely moves it
    assert!(warm.rounds[0].dual_residual < cold.rounds[0].dual_residual);
}

#[test]
fn initial_state_must_match_the_features() {
    let spec = AdmmSpec::new(1, 0., 1.);
    let initial = InitialState::zeros(3);

    let err = train_with_report(separable_1d(), &spec, Some(&initial)).unwrap_err();
    assert!(matches!(
        err,
        AdmmErr::InitialStateMismatch {
            got: 3,
            expected: 1,
            ..
        }
    ));
}

#[test]
fn invalid_input_is_rejected_before_training() {
    let err = train(vec![], 1, 0., 1.).unwrap_err();
    assert!(matches!(err, AdmmErr::NoPartitions));

    let err = train(vec![separable_1d().remove(0), vec![]], 1, 0., 1.).unwrap_err();
    assert!(matches!(err, AdmmErr::EmptyPartition { partition: 1 }));

    let bad_label = vec![vec![LabeledPoint::new(0., vec![1.])]];
    let err = train(bad_label, 1, 0., 1.).unwrap_err();
    assert!(matches!(err, AdmmErr::InvalidLabel { partition: 0, index: 0, .. }));

    let mut mixed = separable_1d();
    mixed[1].push(LabeledPoint::new(1., vec![1., 2.]));
    let err = train(mixed, 1, 0., 1.).unwrap_err();
    assert!(matches!(
        err,
        AdmmErr::DimensionMismatch {
            partition: 1,
            index: 1,
            got: 2,
            expected: 1
        }
    ));

    let err = train(separable_1d(), 1, 0., 0.).unwrap_err();
    assert!(matches!(err, AdmmErr::InvalidConfig { field: "rho", .. }));

    let err = train(separable_1d(), 1, -1., 1.).unwrap_err();
    assert!(matches!(err, AdmmErr::InvalidConfig { field: "lambda", .. }));
}
