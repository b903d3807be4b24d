use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tunebandit::hyperparameter::Hyperparameter;
use tunebandit::tunable::Tunable;
use tunebandit::tuner::Tuner;
use tunebandit::{Config, Error, ParamValue, ProposalState, Session};

use super::unit_tunable;

/// Always proposes `x = 0.5` and counts how often it was asked.
struct ConstantTuner {
    calls: Arc<AtomicUsize>,
}

impl Tuner for ConstantTuner {
    fn propose(&mut self, n: usize) -> tunebandit::Result<Vec<Config>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut config = Config::new();
        config.insert("x".to_owned(), ParamValue::Float(0.5));
        Ok(vec![config; n])
    }

    fn record(&mut self, _config: &Config, _score: f64) -> tunebandit::Result<()> {
        Ok(())
    }
}

fn constant_session(calls: &Arc<AtomicUsize>, max_retries: usize) -> Session {
    let calls = Arc::clone(calls);
    Session::builder()
        .tunable("a", unit_tunable())
        .max_retries(max_retries)
        .tuner_factory(move |_name: &str, _tunable: Tunable| -> Box<dyn Tuner> {
            Box::new(ConstantTuner {
                calls: Arc::clone(&calls),
            })
        })
        .build()
        .unwrap()
}

#[test]
fn test_untried_tunables_are_served_in_order() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .tunable("c", unit_tunable())
        .seed(1)
        .build()
        .unwrap();

    let mut order = Vec::new();
    for _ in 0..3 {
        let (name, config) = session.propose().unwrap().unwrap();
        session.record(&name, &config, Some(10.0)).unwrap();
        order.push(name);
    }

    assert_eq!(order, ["a", "b", "c"]);
}

#[test]
fn test_unscored_tunable_stays_untried() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(2)
        .build()
        .unwrap();

    // Nothing recorded, so "a" is still the first untried tunable.
    let (first, _) = session.propose().unwrap().unwrap();
    let (second, _) = session.propose().unwrap().unwrap();
    assert_eq!(first, "a");
    assert_eq!(second, "a");
}

#[test]
fn test_proposals_start_pending() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .build()
        .unwrap();

    let (name, config) = session.propose().unwrap().unwrap();
    let id = tunebandit::fingerprint::fingerprint(&name, &config).unwrap();
    let proposal = session.proposal(&id).unwrap();

    assert_eq!(proposal.tunable, "a");
    assert_eq!(proposal.config, config);
    assert_eq!(proposal.state, ProposalState::Pending);
    assert!(proposal.score.is_none());
}

#[test]
fn test_duplicates_give_up_after_max_retries() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut session = constant_session(&calls, 10);

    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, Some(1.0)).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(session.propose().unwrap().is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 11);
    assert_eq!(session.proposals().len(), 1);
}

#[test]
fn test_untried_tunable_is_drawn_once_even_when_repeated() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut session = constant_session(&calls, 10);

    let (_, first) = session.propose().unwrap().unwrap();
    let (_, second) = session.propose().unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.proposals().len(), 1);
    assert!(
        session
            .proposals()
            .values()
            .all(|p| p.state == ProposalState::Pending)
    );
}

#[test]
fn test_failing_tunable_with_tiny_space_does_not_block_round_robin() {
    let flag = Tunable::new([("on", Hyperparameter::boolean())]).unwrap();
    let mut session = Session::builder()
        .tunable("a", flag)
        .tunable("b", unit_tunable())
        .max_errors(3)
        .seed(4)
        .build()
        .unwrap();

    let mut calls = Vec::new();
    session
        .run(50, |name: &str, config: &Config| {
            calls.push(name.to_owned());
            if name == "a" {
                Err("unsupported".to_owned())
            } else {
                Ok(config["x"].as_f64().unwrap())
            }
        })
        .unwrap();

    assert_eq!(&calls[..4], ["a", "a", "a", "b"]);
    assert_eq!(calls.len(), 50);
    assert_eq!(session.active_tunables(), ["b"]);
    assert_eq!(session.errors("a"), 3);
    assert_eq!(session.best_proposal().unwrap().tunable, "b");
}

#[test]
fn test_duplicate_skip_does_not_count_as_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut session = constant_session(&calls, 3);

    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, Some(1.0)).unwrap();

    for _ in 0..5 {
        assert!(session.propose().unwrap().is_none());
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1 + 5 * 3);
    assert_eq!(session.errors("a"), 0);
    assert_eq!(session.active_tunables(), ["a"]);
}

#[test]
fn test_exhausted_session_cannot_propose() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .build()
        .unwrap();

    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, None).unwrap();

    assert!(session.is_exhausted());
    assert!(matches!(
        session.propose(),
        Err(Error::AllTunablesEliminated)
    ));
}
