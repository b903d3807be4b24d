use std::thread;

use tunebandit::{Config, Session, SharedSession};

use super::unit_tunable;

#[test]
fn test_shared_session_across_threads() {
    let session = Session::builder()
        .tunable("a", unit_tunable())
        .tunable("b", unit_tunable())
        .seed(30)
        .build()
        .unwrap();
    let shared = SharedSession::new(session);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut scorer = |_: &str, config: &Config| {
                    Ok::<_, String>(config["x"].as_f64().unwrap() + f64::from(worker))
                };
                for _ in 0..5 {
                    shared.evaluate_next(&mut scorer).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let session = shared.try_into_inner().unwrap();
    assert_eq!(session.proposals().len(), 20);
    assert!(session.best_score().unwrap() >= 3.0);
}

#[test]
fn test_shared_propose_and_record() {
    let session = Session::builder()
        .tunable("a", unit_tunable())
        .build()
        .unwrap();
    let shared = SharedSession::new(session);

    let (name, config) = shared.propose().unwrap().unwrap();
    shared.record(&name, &config, Some(0.5)).unwrap();

    assert_eq!(shared.best_proposal().unwrap().config, config);
    assert!(shared.clone().try_into_inner().is_err());
}
