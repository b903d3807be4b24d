use tunebandit::tunable::Tunable;
use tunebandit::tuner::Tuner;
use tunebandit::{Config, Error, ParamValue, ProposalState, Session};

use super::unit_tunable;

fn session() -> Session {
    Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .max_errors(2)
        .seed(5)
        .build()
        .unwrap()
}

#[test]
fn test_record_updates_proposal_and_history() {
    let mut session = session();
    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, Some(0.75)).unwrap();

    let proposal = session.best_proposal().unwrap();
    assert_eq!(proposal.config, config);
    assert_eq!(proposal.score, Some(0.75));
    assert_eq!(proposal.state, ProposalState::Scored);
    assert_eq!(session.scores("a"), &[0.75]);
    assert_eq!(session.best_score(), Some(0.75));
}

#[test]
fn test_record_failure_keeps_best_and_counts_error() {
    let mut session = session();
    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, Some(1.0)).unwrap();

    let (name, config) = session.propose().unwrap().unwrap();
    assert_eq!(name, "b");
    session.record(&name, &config, None).unwrap();

    assert_eq!(session.errors("b"), 1);
    assert_eq!(session.best_score(), Some(1.0));
    assert!(session.scores("b").is_empty());
    assert_eq!(session.active_tunables(), ["a", "b"]);
}

#[test]
fn test_record_infinite_score_is_failure() {
    let mut session = session();
    let (name, config) = session.propose().unwrap().unwrap();
    session.record(&name, &config, Some(f64::INFINITY)).unwrap();

    assert_eq!(session.errors("a"), 1);
    assert!(session.best_proposal().is_none());
}

#[test]
fn test_record_rejects_unproposed_config() {
    let mut session = session();
    let mut config = Config::new();
    config.insert("x".to_owned(), 0.25.into());

    let result = session.record("a", &config, Some(1.0));
    assert!(matches!(result, Err(Error::UnknownProposal { tunable }) if tunable == "a"));
}

#[test]
fn test_record_same_config_under_other_tunable_is_unknown() {
    let mut session = session();
    let (_, config) = session.propose().unwrap().unwrap();

    assert!(matches!(
        session.record("b", &config, Some(1.0)),
        Err(Error::UnknownProposal { .. })
    ));
}

#[test]
fn test_best_is_monotonic() {
    let mut session = session();
    let scores = [0.3, 0.1, 0.9, 0.5, 0.9, 0.2, 1.2, 0.0];
    let mut previous = f64::NEG_INFINITY;

    for score in scores {
        let (name, config) = session.propose().unwrap().unwrap();
        session.record(&name, &config, Some(score)).unwrap();
        let best = session.best_score().unwrap();
        assert!(best >= previous);
        previous = best;
    }
    assert_eq!(previous, 1.2);
}

/// Proposes a fresh `x` each time but can never refit.
struct BrokenRefit {
    next: u32,
}

impl Tuner for BrokenRefit {
    fn propose(&mut self, n: usize) -> tunebandit::Result<Vec<Config>> {
        let mut configs = Vec::with_capacity(n);
        for _ in 0..n {
            self.next += 1;
            let mut config = Config::new();
            config.insert("x".to_owned(), ParamValue::Float(f64::from(self.next) / 100.0));
            configs.push(config);
        }
        Ok(configs)
    }

    fn record(&mut self, _config: &Config, _score: f64) -> tunebandit::Result<()> {
        Err(Error::SurrogateFit("kernel matrix is not positive definite"))
    }
}

#[test]
fn test_refit_failure_keeps_session_usable() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .tuner_factory(|_name: &str, _tunable: Tunable| -> Box<dyn Tuner> {
            Box::new(BrokenRefit { next: 0 })
        })
        .build()
        .unwrap();

    let (name, first) = session.propose().unwrap().unwrap();
    session.record(&name, &first, Some(0.4)).unwrap();
    assert_eq!(session.scores("a"), &[0.4]);
    assert_eq!(session.best_proposal().unwrap().config, first);

    let (name, second) = session.propose().unwrap().unwrap();
    assert_ne!(first, second);
    session.record(&name, &second, Some(0.9)).unwrap();

    assert_eq!(session.scores("a"), &[0.4, 0.9]);
    assert_eq!(session.best_score(), Some(0.9));
    assert_eq!(session.errors("a"), 0);
    assert_eq!(session.active_tunables(), ["a"]);
    assert!(session.propose().unwrap().is_some());
}
