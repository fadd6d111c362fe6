//! End-to-end pipeline tests: vectorize, fit, threshold, evaluate, store,
//! replay.

use clasificar::features::{FeatureSpec, SearchMode};
use clasificar::model::{Document, StoredModel};
use clasificar::predictor::Predictor;
use clasificar::solver::{GradientDescent, SolverConfig};
use clasificar::text::vectorize::OneHotVectorizer;
use clasificar::training::{classify_documents, train, TrainingConfig};

fn movie_reviews() -> Vec<Document> {
    vec![
        Document::new(1, "a fun and exciting movie", "positive"),
        Document::new(2, "dull plot and flat acting", "negative"),
        Document::new(3, "exciting from start to finish :-)", "positive"),
        Document::new(4, "so dull I left early", "negative"),
        Document::new(5, "fun characters, great pacing", "positive"),
        Document::new(6, "flat, lifeless, dull", "negative"),
    ]
}

fn solver_config() -> SolverConfig {
    SolverConfig::new().with_iterations(400).with_learning_rate(1.0)
}

#[test]
fn full_pipeline_with_stop_words() {
    let config = TrainingConfig::new()
        .with_ignore_stop_words(true)
        .with_solver(solver_config());
    let classifier =
        train(&movie_reviews(), &[FeatureSpec::Unigrams], &config).expect("training succeeds");

    // Stop words never reach the vocabulary.
    assert!(classifier.vocabulary().get("and").is_none());
    assert!(classifier.vocabulary().get("a").is_none());
    assert!(classifier.vocabulary().get("fun").is_some());

    assert!((classifier.accuracy() - 1.0).abs() < 1e-12);
    assert!((classifier.kappa() - 1.0).abs() < 1e-12);

    let predictions = classifier
        .classify(&[
            Document::new(20, "such an exciting movie", "unlabeled"),
            Document::new(21, "dull and flat", "unlabeled"),
        ])
        .expect("classification succeeds");
    assert_eq!(predictions[0].predicted_label, "positive");
    assert_eq!(predictions[1].predicted_label, "negative");
}

#[test]
fn solver_and_stored_model_share_one_numeric_contract() {
    let documents = movie_reviews();
    let specs = [FeatureSpec::Unigrams];

    // Fit by hand on the vectorized corpus.
    let corpus = OneHotVectorizer::new()
        .fit(&documents, &specs, None)
        .expect("vectorization succeeds");
    let mut solver = GradientDescent::new(corpus.matrix(), solver_config())
        .expect("solver construction succeeds");
    let fit = solver.run();

    // The orchestrated pipeline is deterministic, so it lands on the same
    // weights.
    let config = TrainingConfig::new().with_solver(solver_config());
    let classifier = train(&documents, &specs, &config).expect("training succeeds");
    let model = classifier.stored_model();
    assert_eq!(model.weights(), fit.weights);
    assert_eq!(model.constant_weight_term, fit.constant_weight_term);

    // Replaying the stored model reproduces the end-of-training
    // probabilities exactly, row for row.
    let predictor = Predictor::from_stored_model(model).expect("valid stored model");
    let replayed = classify_documents(model, &documents).expect("classification succeeds");
    for (r, prediction) in replayed.iter().enumerate() {
        let row = corpus.matrix().row(r);
        let trained_probability = predictor
            .probability(&row[..row.len() - 1])
            .expect("row width matches");
        assert_eq!(prediction.probability, trained_probability);
    }
}

#[test]
fn mixed_feature_families_train_and_replay() {
    let documents = vec![
        Document::new(1, "fun game !!", "positive").with_column("starred", true),
        Document::new(2, "dull story", "negative").with_column("starred", false),
        Document::new(3, "fun day !!", "positive").with_column("starred", false),
        Document::new(4, "flat and dull", "negative").with_column("starred", false),
    ];
    let specs = vec![
        FeatureSpec::Unigrams,
        FeatureSpec::search("!!", SearchMode::Contains),
        FeatureSpec::column("starred"),
    ];
    let config = TrainingConfig::new().with_solver(solver_config());
    let classifier = train(&documents, &specs, &config).expect("training succeeds");

    let n_features = classifier.stored_model().stored_tokens.len();
    // 8 unigrams plus the search and column features.
    assert_eq!(n_features, 10);

    let prediction = classifier
        .classify_one(&Document::new(30, "a fun game !!", "unlabeled").with_column("starred", true))
        .expect("classification succeeds");
    assert_eq!(prediction.predicted_label, "positive");
}

#[test]
fn stored_model_json_shape_is_stable() {
    let config = TrainingConfig::new().with_solver(solver_config());
    let classifier =
        train(&movie_reviews(), &[FeatureSpec::Unigrams], &config).expect("training succeeds");

    let json = serde_json::to_value(classifier.stored_model()).expect("serialize");
    for key in [
        "stored_tokens",
        "positive_class_name",
        "negative_class_name",
        "threshold",
        "constant_weight_term",
        "accuracy",
        "kappa",
    ] {
        assert!(json.get(key).is_some(), "stored model lost key {key}");
    }
    let token = &json["stored_tokens"][0];
    for key in ["name", "formula", "weight"] {
        assert!(token.get(key).is_some(), "stored token lost key {key}");
    }

    let restored: StoredModel = serde_json::from_value(json).expect("deserialize");
    assert_eq!(&restored, classifier.stored_model());
}

#[test]
fn step_mode_drives_the_same_model_as_auto_run() {
    let documents = movie_reviews();
    let corpus = OneHotVectorizer::new()
        .fit(&documents, &[FeatureSpec::Unigrams], None)
        .expect("vectorization succeeds");

    let config = SolverConfig::new().with_iterations(50).with_learning_rate(0.5);
    let mut auto = GradientDescent::new(corpus.matrix(), config).expect("solver");
    let auto_fit = auto.run();

    let mut stepped = GradientDescent::new(corpus.matrix(), config).expect("solver");
    let mut iterations = 0;
    while let Some(outcome) = stepped.step() {
        iterations += 1;
        assert_eq!(outcome.iteration, iterations);
    }
    assert_eq!(iterations, 50);

    let step_fit = stepped.fit_result().expect("finished fit").clone();
    assert_eq!(auto_fit.weights, step_fit.weights);
    assert_eq!(auto_fit.constant_weight_term, step_fit.constant_weight_term);
    assert_eq!(auto_fit.cost, step_fit.cost);
}

#[test]
fn degenerate_one_sided_predictions_report_zero_kappa() {
    // Both classes present but the text is uninformative and symmetric, so
    // the model cannot separate them; kappa degrades gracefully instead of
    // propagating NaN.
    let documents = vec![
        Document::new(1, "same words here", "yes"),
        Document::new(2, "same words here", "no"),
        Document::new(3, "same words here", "yes"),
        Document::new(4, "same words here", "no"),
    ];
    let config = TrainingConfig::new()
        .with_lock_prob_threshold(true)
        .with_solver(SolverConfig::new().with_iterations(50).with_learning_rate(0.1));
    let classifier =
        train(&documents, &[FeatureSpec::Unigrams], &config).expect("training succeeds");

    assert!(classifier.kappa().is_finite());
    assert!(classifier.accuracy().is_finite());
}
