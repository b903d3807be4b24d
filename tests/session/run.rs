use tunebandit::{Config, Proposal, Scorer, Session};

use super::unit_tunable;

#[test]
fn test_run_round_robins_before_selecting() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(3)
        .build()
        .unwrap();

    let mut calls = Vec::new();
    session
        .run(6, |name: &str, _: &Config| {
            calls.push(name.to_owned());
            Ok::<_, String>(10.0)
        })
        .unwrap();

    assert_eq!(&calls[..2], ["a", "b"]);
    assert_eq!(calls.len(), 6);
    assert_eq!(session.iterations(), 6);
}

#[test]
fn test_run_returns_best_copy() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .seed(8)
        .build()
        .unwrap();

    let best = session
        .run(15, |_: &str, config: &Config| {
            let x = config["x"].as_f64().unwrap();
            Ok::<_, String>(-(x - 0.6).powi(2))
        })
        .unwrap()
        .unwrap();

    assert_eq!(Some(&best), session.best_proposal());
    let max = session
        .proposals()
        .values()
        .filter_map(|p| p.score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(best.score, Some(max));
}

#[test]
fn test_run_with_zero_iterations() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .build()
        .unwrap();

    let best = session
        .run(0, |_: &str, _: &Config| Ok::<_, String>(1.0))
        .unwrap();

    assert!(best.is_none());
    assert_eq!(session.iterations(), 0);
}

#[test]
fn test_run_survives_scorer_panic() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(12)
        .build()
        .unwrap();

    let best = session
        .run(5, |name: &str, _: &Config| {
            assert!(name != "a", "scorer for a is broken");
            Ok::<_, String>(1.0)
        })
        .unwrap();

    assert!(best.is_some());
    assert_eq!(session.active_tunables(), ["b"]);
    assert_eq!(session.errors("a"), 1);
}

/// Scorer that checks the best score never gets worse.
struct MonotonicCheck {
    previous: Option<f64>,
}

impl Scorer for MonotonicCheck {
    type Error = String;

    fn score(&mut self, _tunable: &str, config: &Config) -> Result<f64, String> {
        let x = config["x"].as_f64().ok_or("x missing")?;
        Ok((x * 13.0).sin())
    }

    fn after_record(&mut self, session: &Session, proposal: &Proposal) {
        assert!(proposal.score.is_some());
        let best = session.best_score().unwrap();
        if let Some(previous) = self.previous {
            assert!(best >= previous);
        }
        self.previous = Some(best);
    }
}

#[test]
fn test_after_record_sees_monotonic_best() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(21)
        .build()
        .unwrap();

    session
        .run(20, MonotonicCheck { previous: None })
        .unwrap();

    assert_eq!(session.proposals().len(), 20);
}
