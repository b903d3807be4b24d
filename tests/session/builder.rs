use tunebandit::selector::BestKReward;
use tunebandit::tuner::TunerKind;
use tunebandit::{Config, Direction, Error, Session};

use super::unit_tunable;

#[test]
fn test_builder_defaults() {
    let session = Session::builder()
        .tunable("a", unit_tunable())
        .build()
        .unwrap();

    assert_eq!(session.direction(), Direction::Maximize);
    assert_eq!(session.active_tunables(), ["a"]);
    assert_eq!(session.iterations(), 0);
    assert!(session.proposals().is_empty());
    assert!(session.best_proposal().is_none());
}

#[test]
fn test_builder_preserves_declaration_order() {
    let session = Session::builder()
        .tunable("zeta", unit_tunable())
        .tunables([("alpha", unit_tunable()), ("mid", unit_tunable())])
        .build()
        .unwrap();

    assert_eq!(session.active_tunables(), ["zeta", "alpha", "mid"]);
}

#[test]
fn test_builder_rejects_duplicate_across_json_and_code() {
    let result = Session::builder()
        .tunable("a", unit_tunable())
        .tunables_from_json(r#"{"a": {"y": {"type": "bool"}}}"#)
        .unwrap()
        .build();

    assert!(matches!(result, Err(Error::DuplicateTunable(name)) if name == "a"));
}

#[test]
fn test_builder_rejects_invalid_json_hyperparameter() {
    let result = Session::builder()
        .tunables_from_json(r#"{"a": {"x": {"type": "float", "range": [2.0, 1.0]}}}"#);

    assert!(matches!(result, Err(Error::InvalidHyperparameter { .. })));
}

#[test]
fn test_builder_with_alternative_strategies() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .selector(BestKReward::new(2))
        .tuner(TunerKind::Uniform)
        .seed(4)
        .label("alternatives")
        .verbose(true)
        .build()
        .unwrap();

    let best = session
        .run(12, |_: &str, config: &Config| {
            Ok::<_, String>(config["x"].as_f64().unwrap())
        })
        .unwrap()
        .unwrap();

    assert_eq!(session.proposals().len(), 12);
    assert!(best.score.unwrap() >= 0.0);
}
