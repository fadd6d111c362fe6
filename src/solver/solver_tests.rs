use super::*;

/// Small linearly separable set: first feature predicts the label.
fn separable() -> Matrix {
    Matrix::from_rows(vec![
        vec![1.0, 0.0, 1.0],
        vec![1.0, 1.0, 1.0],
        vec![0.0, 1.0, 0.0],
        vec![0.0, 0.0, 0.0],
    ])
    .expect("rows are rectangular")
}

#[test]
fn fits_separable_data() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(500).with_learning_rate(0.5);
    let mut solver = GradientDescent::new(&rows, config).unwrap();
    let fit = solver.run();

    // Positive weight on the predictive feature, near-zero on the noise one.
    assert!(fit.weights[0] > 1.0);
    assert!(fit.weights[0] > fit.weights[1].abs());

    let p_pos = sigmoid(fit.constant_weight_term + fit.weights[0]);
    let p_neg = sigmoid(fit.constant_weight_term);
    assert!(p_pos > 0.5);
    assert!(p_neg < 0.5);
}

#[test]
fn cost_decreases_monotonically_on_separable_data() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(100).with_learning_rate(0.05);
    let mut solver = GradientDescent::new(&rows, config).unwrap();

    let mut previous = f64::INFINITY;
    while let Some(outcome) = solver.step() {
        assert!(
            outcome.cost <= previous,
            "cost rose at iteration {}: {} > {}",
            outcome.iteration,
            outcome.cost,
            previous
        );
        previous = outcome.cost;
    }
}

#[test]
fn intercept_stays_zero_when_locked() {
    let rows = separable();
    let config = SolverConfig::new()
        .with_iterations(200)
        .with_learning_rate(0.5)
        .with_lock_intercept(true);
    let mut solver = GradientDescent::new(&rows, config).unwrap();

    while let Some(outcome) = solver.step() {
        assert_eq!(solver.theta()[0], 0.0, "intercept moved at iteration {}", outcome.iteration);
    }
    let fit = solver.fit_result().expect("fit result on final iteration");
    assert_eq!(fit.constant_weight_term, 0.0);
}

#[test]
fn step_mode_equals_auto_run() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(60).with_learning_rate(0.3);

    let mut auto = GradientDescent::new(&rows, config).unwrap();
    let auto_fit = auto.run();

    let mut stepped = GradientDescent::new(&rows, config).unwrap();
    while stepped.step().is_some() {}
    let step_fit = stepped.fit_result().expect("fit result after final step");

    // Identical update rule regardless of scheduling style, bit for bit.
    assert_eq!(auto.theta(), stepped.theta());
    assert_eq!(auto_fit.weights, step_fit.weights);
    assert_eq!(auto_fit.constant_weight_term, step_fit.constant_weight_term);
}

#[test]
fn fit_result_only_exists_on_final_iteration() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(3);
    let mut solver = GradientDescent::new(&rows, config).unwrap();

    let first = solver.step().expect("iteration 1");
    assert!(!first.finished);
    assert!(solver.fit_result().is_none());

    let second = solver.step().expect("iteration 2");
    assert!(!second.finished);
    assert!(solver.fit_result().is_none());

    let last = solver.step().expect("iteration 3");
    assert!(last.finished);
    assert!(solver.fit_result().is_some());

    // Polling a finished state machine does no further work.
    assert!(solver.step().is_none());
    assert_eq!(solver.iteration(), 3);
}

#[test]
fn observer_sees_iterations_in_order() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(5);
    let mut solver = GradientDescent::new(&rows, config).unwrap();

    let mut seen = Vec::new();
    let fit = solver.run_with_observer(|outcome| {
        seen.push((outcome.iteration, outcome.finished));
        true
    });

    assert!(fit.is_some());
    assert_eq!(
        seen,
        vec![(1, false), (2, false), (3, false), (4, false), (5, true)]
    );
}

#[test]
fn observer_cancellation_stops_the_run() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(100);
    let mut solver = GradientDescent::new(&rows, config).unwrap();

    let fit = solver.run_with_observer(|outcome| outcome.iteration < 7);

    assert!(fit.is_none());
    assert_eq!(solver.iteration(), 7);
    assert!(solver.fit_result().is_none());
    // Completed iterations are not rolled back; theta reflects 7 updates.
    assert!(solver.theta().iter().any(|&t| t != 0.0));
}

#[test]
fn zero_iterations_is_rejected() {
    let rows = separable();
    let config = SolverConfig::new().with_iterations(0);
    assert!(GradientDescent::new(&rows, config).is_err());
}

#[test]
fn negative_learning_rate_is_rejected() {
    assert!(SolverConfig::new().with_learning_rate(-0.1).validate().is_err());
    assert!(SolverConfig::new().with_learning_rate(0.0).validate().is_err());
    assert!(SolverConfig::new()
        .with_learning_rate(f64::NAN)
        .validate()
        .is_err());
}

#[test]
fn negative_lambda_is_rejected() {
    assert!(SolverConfig::new().with_lambda(-1.0).validate().is_err());
}

#[test]
fn empty_rows_are_rejected() {
    let rows = Matrix::from_rows(vec![]).unwrap();
    assert!(GradientDescent::new(&rows, SolverConfig::new()).is_err());
}

#[test]
fn saturated_probabilities_keep_cost_finite() {
    // Large feature magnitudes drive the dot product far into saturation.
    let rows = Matrix::from_rows(vec![
        vec![1000.0, 1.0],
        vec![-1000.0, 0.0],
    ])
    .expect("rows are rectangular");
    let config = SolverConfig::new().with_iterations(20).with_learning_rate(5.0);
    let mut solver = GradientDescent::new(&rows, config).unwrap();
    let fit = solver.run();

    assert!(fit.cost.is_finite());
    assert!(fit.weights.iter().all(|w| w.is_finite()));
}

#[test]
fn lambda_shrinks_weights() {
    let rows = separable();
    let plain = SolverConfig::new().with_iterations(300).with_learning_rate(0.5);
    let penalized = plain.with_lambda(5.0);

    let mut a = GradientDescent::new(&rows, plain).unwrap();
    let mut b = GradientDescent::new(&rows, penalized).unwrap();
    let fit_plain = a.run();
    let fit_penalized = b.run();

    assert!(fit_penalized.weights[0].abs() < fit_plain.weights[0].abs());
}

#[test]
fn sigmoid_matches_the_unstable_form_in_safe_range() {
    for z in [-20.0_f64, -3.0, -0.5, 0.0, 0.5, 3.0, 20.0] {
        let naive = 1.0 / (1.0 + (-z).exp());
        assert!((sigmoid(z) - naive).abs() < 1e-12);
    }
}
