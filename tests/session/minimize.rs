use tunebandit::{Config, Direction, Session};

use super::unit_tunable;

#[test]
fn test_minimize_keeps_lowest_raw_score() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .minimize()
        .seed(2)
        .build()
        .unwrap();

    let (name, first) = session.propose().unwrap().unwrap();
    session.record(&name, &first, Some(5.0)).unwrap();
    let (name, second) = session.propose().unwrap().unwrap();
    session.record(&name, &second, Some(3.0)).unwrap();

    let best = session.best_proposal().unwrap();
    assert_eq!(best.config, second);
    assert_eq!(best.score, Some(3.0));
    assert_eq!(session.scores("a"), &[-5.0, -3.0]);
}

#[test]
fn test_minimize_run_finds_low_values() {
    let mut session = Session::builder()
        .tunable("a", unit_tunable())
        .direction(Direction::Minimize)
        .seed(17)
        .build()
        .unwrap();

    let best = session
        .run(25, |_: &str, config: &Config| {
            let x = config["x"].as_f64().unwrap();
            Ok::<_, String>((x - 0.4).abs())
        })
        .unwrap()
        .unwrap();

    let worst = session
        .proposals()
        .values()
        .filter_map(|p| p.score)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(best.score.unwrap() <= worst);
    assert!(best.score.unwrap() < 0.2);
}
