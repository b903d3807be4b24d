use tunebandit::{Config, Error, ProposalState, Session};

use super::unit_tunable;

#[test]
fn test_always_failing_scorer_eliminates_everything() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .max_errors(1)
        .build()
        .unwrap();

    let result = session.run(5, |_: &str, _: &Config| Err::<f64, _>("broken"));

    assert!(matches!(result, Err(Error::AllTunablesEliminated)));
    assert!(session.active_tunables().is_empty());
    assert!(session.best_proposal().is_none());
    assert_eq!(session.iterations(), 2);
}

#[test]
fn test_failing_tunable_is_dropped_for_good() {
    let mut session = Session::builder()
        .tunable("bad", unit_tunable())
        .tunable("good", unit_tunable())
        .max_errors(3)
        .seed(6)
        .build()
        .unwrap();

    session
        .run(30, |name: &str, config: &Config| {
            if name == "bad" {
                Err("always fails".to_owned())
            } else {
                Ok(config["x"].as_f64().unwrap())
            }
        })
        .unwrap();

    assert_eq!(session.active_tunables(), ["good"]);
    assert_eq!(session.errors("bad"), 3);
    assert!(session.scores("bad").is_empty());

    let bad: Vec<_> = session
        .proposals()
        .values()
        .filter(|p| p.tunable == "bad")
        .collect();
    assert_eq!(bad.len(), 3);
    assert!(bad.iter().all(|p| p.state == ProposalState::Failed));
    assert_eq!(session.best_proposal().unwrap().tunable, "good");
}

#[test]
fn test_errors_accumulate_across_successes() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .max_errors(2)
        .seed(10)
        .build()
        .unwrap();

    let outcomes = [Some(1.0), None, Some(2.0)];
    for outcome in outcomes {
        let (name, config) = session.propose().unwrap().unwrap();
        session.record(&name, &config, outcome).unwrap();
    }
    assert_eq!(session.errors("a"), 1);
    assert!(!session.is_exhausted());

    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, None).unwrap();
    assert!(session.is_exhausted());

    // The best found before elimination is kept.
    assert_eq!(session.best_score(), Some(2.0));
}

#[test]
fn test_late_record_for_eliminated_tunable_is_ignored() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(14)
        .build()
        .unwrap();

    // Two outstanding proposals for "a".
    let (_, first) = session.propose().unwrap().unwrap();
    let (_, second) = session.propose().unwrap().unwrap();

    session.record("a", &first, None).unwrap();
    assert_eq!(session.active_tunables(), ["b"]);

    session.record("a", &second, Some(100.0)).unwrap();
    assert!(session.best_proposal().is_none());
    assert!(session.scores("a").is_empty());
    assert_eq!(session.errors("a"), 1);

    let id = tunebandit::fingerprint::fingerprint("a", &second).unwrap();
    assert_eq!(session.proposal(&id).unwrap().score, Some(100.0));
}

#[test]
fn test_best_survives_elimination_error() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .max_errors(1)
        .seed(9)
        .build()
        .unwrap();

    let mut turn = 0;
    let result = session.run(5, |_: &str, _: &Config| {
        turn += 1;
        if turn == 1 { Ok(0.7) } else { Err("crashed") }
    });

    assert!(matches!(result, Err(Error::AllTunablesEliminated)));
    assert_eq!(session.best_score(), Some(0.7));
}
