use ferrite_mlp::data::builtin_blobs;
use ferrite_mlp::train::DEFAULT_SEED;
use ferrite_mlp::{
    backward, cross_entropy, forward, train, train_loop, Matrix, ParameterSet, Sgd, TrainConfig,
};

fn m(rows: Vec<Vec<f64>>) -> Matrix {
    Matrix::from_rows(rows).unwrap()
}

/// 4 samples, 3 features, 2 classes.
fn toy_data() -> (Matrix, Matrix) {
    let x = m(vec![
        vec![1.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0],
        vec![1.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0],
    ]);
    let y = m(vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
    ]);
    (x, y)
}

/// Hand-picked weights. Rows 0 and 3 have a negative first hidden unit, so
/// the ReLU mask is exercised.
fn toy_params() -> ParameterSet {
    ParameterSet::from_parts(
        m(vec![vec![0.1, -0.2], vec![0.3, 0.4], vec![-0.5, 0.6]]),
        Matrix::row_vector(vec![0.0, 0.1]),
        m(vec![vec![0.7, -0.3], vec![-0.1, 0.2]]),
        Matrix::row_vector(vec![0.05, -0.05]),
    )
    .unwrap()
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

#[test]
fn toy_forward_pass_matches_hand_computation() {
    let (x, _) = toy_data();
    let cache = forward(&x, &toy_params()).unwrap();

    // Z1 = X·W1 + b1
    let z1 = [[-0.4, 0.5], [0.3, 0.5], [0.4, 0.3], [-0.5, 0.7]];
    let a1 = [[0.0, 0.5], [0.3, 0.5], [0.4, 0.3], [0.0, 0.7]];
    // Z2 = A1·W2 + b2
    let z2 = [[0.0, 0.05], [0.21, -0.04], [0.3, -0.11], [-0.02, 0.09]];
    let a2 = [
        [0.48750260351578967, 0.5124973964842103],
        [0.5621765008857981, 0.4378234991142019],
        [0.6010878788483698, 0.3989121211516303],
        [0.47252769565540625, 0.5274723043445937],
    ];
    for i in 0..4 {
        for j in 0..2 {
            assert_close(cache.z1.data[i][j], z1[i][j], 1e-12);
            assert_close(cache.a1.data[i][j], a1[i][j], 1e-12);
            assert_close(cache.z2.data[i][j], z2[i][j], 1e-12);
            assert_close(cache.a2.data[i][j], a2[i][j], 1e-12);
        }
    }
}

#[test]
fn toy_first_epoch_loss_and_update_match_golden_values() {
    let (x, y) = toy_data();
    let mut params = toy_params();

    let cache = forward(&x, &params).unwrap();
    let loss = cross_entropy(&cache.a2, &y).unwrap();
    assert_close(loss, 0.6732680104143471, 1e-12);

    let grads = backward(&x, &y, &cache, &params.w2).unwrap();
    assert_close(grads.dw2.data[1][0], 0.05898382570352229, 1e-12);
    assert_close(grads.db2.data[0][0], 0.030823669726340944, 1e-12);
    assert_close(grads.dw1.data[0][0], -0.09972803028790755, 1e-12);
    assert_close(grads.dw1.data[2][1], 0.002997727562160303, 1e-12);
    assert_close(grads.db1.data[0][1], -0.00924710091790229, 1e-12);
    // The third feature only fires on rows where hidden unit 0 is masked.
    assert_eq!(grads.dw1.data[2][0], 0.0);

    Sgd::new(0.5).unwrap().step(&mut params, &grads).unwrap();
    let after = cross_entropy(&forward(&x, &params).unwrap().a2, &y).unwrap();
    assert_close(after, 0.6598854415868736, 1e-12);
    assert!(after < loss);
}

#[test]
fn analytic_gradients_agree_with_finite_differences() {
    let (x, y) = toy_data();
    let params = toy_params();
    let cache = forward(&x, &params).unwrap();
    let grads = backward(&x, &y, &cache, &params.w2).unwrap();

    let loss_at = |p: &ParameterSet| cross_entropy(&forward(&x, p).unwrap().a2, &y).unwrap();
    let h = 1e-5;

    fn w1(p: &mut ParameterSet) -> &mut Matrix { &mut p.w1 }
    fn b1(p: &mut ParameterSet) -> &mut Matrix { &mut p.b1 }
    fn w2(p: &mut ParameterSet) -> &mut Matrix { &mut p.w2 }
    fn b2(p: &mut ParameterSet) -> &mut Matrix { &mut p.b2 }
    let tensors: [(fn(&mut ParameterSet) -> &mut Matrix, &Matrix); 4] = [
        (w1, &grads.dw1),
        (b1, &grads.db1),
        (w2, &grads.dw2),
        (b2, &grads.db2),
    ];
    for (select, analytic) in tensors {
        for i in 0..analytic.rows {
            for j in 0..analytic.cols {
                let mut plus = params.clone();
                select(&mut plus).data[i][j] += h;
                let mut minus = params.clone();
                select(&mut minus).data[i][j] -= h;
                let numeric = (loss_at(&plus) - loss_at(&minus)) / (2.0 * h);
                let a = analytic.data[i][j];
                let scale = a.abs().max(numeric.abs());
                assert!(
                    (a - numeric).abs() <= 1e-4 * scale + 1e-9,
                    "gradient mismatch at ({i}, {j}): analytic {a}, numeric {numeric}"
                );
            }
        }
    }
}

#[test]
fn zero_epochs_reports_loss_of_fresh_parameters() {
    let (x, y) = toy_data();
    let report = train(&x, &y, 0.1, 4, 0).unwrap();

    let fresh = ParameterSet::initialize(3, 4, 2, DEFAULT_SEED).unwrap();
    let expected = cross_entropy(&forward(&x, &fresh).unwrap().a2, &y).unwrap();

    assert_eq!(report.epochs_run, 0);
    assert!(report.loss_history.is_empty());
    assert_eq!(report.params, fresh);
    assert_eq!(report.final_loss, expected);
    // Near-uniform softmax over two classes.
    assert_close(report.final_loss, std::f64::consts::LN_2, 1e-2);
}

#[test]
fn same_seed_gives_identical_trajectories() {
    let ds = builtin_blobs(60, 3).unwrap();
    let cfg = TrainConfig::new(0.3, 8, 40).with_seed(1234);
    let a = train_loop(&ds.inputs, &ds.labels, &cfg).unwrap();
    let b = train_loop(&ds.inputs, &ds.labels, &cfg).unwrap();
    assert_eq!(a.loss_history, b.loss_history);
    assert_eq!(a.params, b.params);

    let c = train_loop(&ds.inputs, &ds.labels, &cfg.clone().with_seed(4321)).unwrap();
    assert_ne!(a.loss_history, c.loss_history);
}

#[test]
fn full_batch_training_learns_separable_blobs() {
    let ds = builtin_blobs(150, 3).unwrap();
    let report = train(&ds.inputs, &ds.labels, 0.5, 16, 300).unwrap();
    let first = report.loss_history[0];
    assert!(report.final_loss.is_finite());
    assert!(report.final_loss >= 0.0);
    assert!(report.final_loss < 0.5 * first, "loss went from {first} to {}", report.final_loss);
    assert!(report.ensure_finite().is_ok());

    let probs = report.params.predict(&ds.inputs).unwrap();
    let acc = ferrite_mlp::metrics::accuracy(&probs, &ds.labels).unwrap();
    assert!(acc > 0.9, "accuracy {acc}");
}

#[test]
fn divergent_learning_rate_reports_non_finite_loss() {
    let ds = builtin_blobs(60, 3).unwrap();
    let report = train(&ds.inputs, &ds.labels, 1e200, 16, 50).unwrap();

    assert_eq!(report.epochs_run, 50);
    assert!(!report.final_loss.is_finite(), "final loss {}", report.final_loss);
    assert!(!report.is_finite());
    assert!(report.loss_history[0].is_finite());
    match report.ensure_finite() {
        Err(ferrite_mlp::Error::NumericDegenerate { epoch, loss }) => {
            assert!(epoch >= 2);
            assert!(!loss.is_finite());
            assert!(report.loss_history[..epoch - 1].iter().all(|l| l.is_finite()));
        }
        other => panic!("expected NumericDegenerate, got {other:?}"),
    }
}

#[test]
fn parameters_survive_a_json_round_trip() {
    let ds = builtin_blobs(30, 2).unwrap();
    let report = train(&ds.inputs, &ds.labels, 0.2, 5, 10).unwrap();

    let path = std::env::temp_dir().join(format!("ferrite-mlp-params-{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    report.params.save_json(path).unwrap();
    let loaded = ParameterSet::load_json(path).unwrap();
    std::fs::remove_file(path).unwrap();

    assert_eq!(loaded.w1.shape(), report.params.w1.shape());
    assert_eq!(loaded.w2.shape(), report.params.w2.shape());
    let pairs = [
        (&loaded.w1, &report.params.w1),
        (&loaded.b1, &report.params.b1),
        (&loaded.w2, &report.params.w2),
        (&loaded.b2, &report.params.b2),
    ];
    for (a, b) in pairs {
        for (x, y) in a.data.iter().flatten().zip(b.data.iter().flatten()) {
            assert!((x - y).abs() <= 1e-15 * y.abs().max(1.0));
        }
    }
}

#[test]
fn loading_mismatched_parameters_fails() {
    let broken = r#"{
        "w1": { "rows": 2, "cols": 2, "data": [[0.1, 0.2], [0.3, 0.4]] },
        "b1": { "rows": 1, "cols": 2, "data": [[0.0, 0.0]] },
        "w2": { "rows": 3, "cols": 1, "data": [[0.1], [0.2], [0.3]] },
        "b2": { "rows": 1, "cols": 1, "data": [[0.0]] }
    }"#;
    let path = std::env::temp_dir().join(format!("ferrite-mlp-broken-{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    std::fs::write(path, broken).unwrap();
    let res = ParameterSet::load_json(path);
    std::fs::remove_file(path).unwrap();
    assert!(matches!(res, Err(ferrite_mlp::Error::ShapeMismatch { .. })));
}
