//! End-to-end selection scenarios.

use u_deck::config::{FeatureGroup, SelectionConfig};
use u_deck::error::{ConfigError, DeckError};
use u_deck::io::{export_deck, load_pool};
use u_deck::record::{ColumnId, RecordId, RecordPool};
use u_deck::report::SelectionReport;
use u_deck::sa::{SaConfig, SaOutcome};
use u_deck::selection::{energy, is_feasible, Deck, DeckRunner};

fn pool_from(rows: &[(&str, &[&str])]) -> RecordPool {
    RecordPool::new(
        vec!["name".into(), "spotted".into(), "striped".into()],
        rows.iter()
            .map(|(name, flags)| {
                let mut row = vec![name.to_string()];
                row.extend(flags.iter().map(|f| f.to_string()));
                row
            })
            .collect(),
    )
}

/// 8 records, 4 of them spotted.
fn eight() -> RecordPool {
    pool_from(&[
        ("a", &["X", ""]),
        ("b", &["X", "X"]),
        ("c", &["X", ""]),
        ("d", &["X", ""]),
        ("e", &["", ""]),
        ("f", &["", "X"]),
        ("g", &["", ""]),
        ("h", &["", ""]),
    ])
}

fn half_spotted() -> SelectionConfig {
    SelectionConfig::new(4)
        .with_tolerance(5.0)
        .with_group(FeatureGroup::new("spots", [2], 50.0))
}

#[test]
fn test_two_flagged_of_four_is_feasible() {
    let pool = eight();
    let config = half_spotted();
    let plan = config.resolve(&pool).unwrap();

    for flagged in [[0, 1], [2, 3], [1, 3]] {
        for unflagged in [[4, 5], [6, 7], [5, 7]] {
            let ids: Vec<RecordId> = flagged
                .iter()
                .chain(&unflagged)
                .map(|&i| RecordId(i))
                .collect();
            let deck = Deck::new(ids);
            let report = SelectionReport::new(&pool, &config, &plan, &deck, 0.0, true);
            let column = report.columns().next().unwrap();
            assert_eq!(column.observed, 50.0);
            assert!(column.within_tolerance);
            assert!(is_feasible(&pool, &deck, &plan));
            assert_eq!(energy(&pool, &deck, &plan), 0.0);
        }
    }
}

#[test]
fn test_runner_finds_half_spotted_deck() {
    let pool = eight();
    let sa = SaConfig::default().with_seed(11);
    let outcome = DeckRunner::select(&pool, &half_spotted(), &sa).unwrap();
    assert!(outcome.feasible);
    assert_eq!(outcome.deck.len(), 4);
    let spotted = outcome
        .deck
        .records(&pool)
        .filter(|r| r.has_flag(ColumnId(2)))
        .count();
    assert_eq!(spotted, 2);
}

#[test]
fn test_mandatory_over_size_is_rejected_without_side_effects() {
    let pool = eight();
    let before: Vec<_> = pool.records().to_vec();
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("deck.csv");

    let config = half_spotted().with_mandatory(["a", "b", "c", "d", "e"]);
    let result = DeckRunner::select(&pool, &config, &SaConfig::default().with_seed(1));
    if let Ok(outcome) = &result {
        export_deck(&export, &pool, &outcome.deck).unwrap();
    }

    assert!(matches!(
        result,
        Err(DeckError::Config(ConfigError::MandatoryExceedsSize { mandatory: 5, size: 4 }))
    ));
    assert!(!export.exists());
    assert_eq!(pool.records(), before.as_slice());
}

#[test]
fn test_individual_without_carriers_never_becomes_feasible() {
    let pool = eight();
    // Column 3 exists but we blank it out by using a pool where nobody is striped.
    let pool = RecordPool::new(
        pool.header().to_vec(),
        pool.records()
            .iter()
            .map(|r| vec![r.identity().to_string(), r.cells()[1].clone(), String::new()])
            .collect(),
    );
    let config = half_spotted().with_individuals([3]);
    let sa = SaConfig::default().with_max_iterations(3_000).with_seed(5);

    let outcome = DeckRunner::select(&pool, &config, &sa).unwrap();

    assert_eq!(outcome.outcome, SaOutcome::Exhausted);
    assert_eq!(outcome.iterations, 3_000);
    assert!(outcome.energy.is_infinite());
    assert!(!outcome.feasible);
    assert!(outcome.cost_history.iter().all(|c| c.is_infinite()));
    assert!(!outcome.report.individuals[0].present);
}

#[test]
fn test_best_energy_is_non_increasing() {
    let rows: Vec<Vec<String>> = (0..120)
        .map(|i| {
            let mut row = vec![format!("r{i}")];
            for c in 0..6 {
                let flagged = (i * 7 + c * 13) % (c + 3) == 0;
                row.push(if flagged { "X".into() } else { String::new() });
            }
            row
        })
        .collect();
    let pool = RecordPool::from_rows(rows);
    let config = SelectionConfig::new(30)
        .with_tolerance(0.0)
        .with_group(FeatureGroup::new("a", [2, 3, 4], 37.0))
        .with_group(FeatureGroup::new("b", [5, 6, 7], 11.0))
        .with_mandatory(["r0", "r1", "r2"]);
    let sa = SaConfig::default()
        .with_max_iterations(5_000)
        .with_history_interval(1)
        .with_seed(17);

    let outcome = DeckRunner::select(&pool, &config, &sa).unwrap();

    // Entry 0 is the initial deck, then one entry per iteration.
    assert_eq!(outcome.cost_history.len(), outcome.iterations + 1);
    for pair in outcome.cost_history.windows(2) {
        assert!(pair[1] <= pair[0], "{} > {}", pair[1], pair[0]);
    }
    assert_eq!(*outcome.cost_history.last().unwrap(), outcome.energy);
    for id in [0, 1, 2] {
        assert!(outcome.deck.contains(RecordId(id)));
    }
}

#[test]
fn test_csv_round_trip_keeps_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("birds.csv");
    let output = dir.path().join("deck.csv");
    std::fs::write(
        &input,
        "name,spotted,striped\na,X,\nb,X,X\nc,X,\nd,X,\ne,,\nf,,X\ng,,\nh,,\n",
    )
    .unwrap();

    let pool = load_pool(&input).unwrap();
    let sa = SaConfig::default().with_seed(2);
    let outcome = DeckRunner::select(&pool, &half_spotted(), &sa).unwrap();
    export_deck(&output, &pool, &outcome.deck).unwrap();

    let exported = load_pool(&output).unwrap();
    assert_eq!(exported.header(), pool.header());
    assert_eq!(exported.len(), 4);
    for (written, id) in exported.records().iter().zip(outcome.deck.members()) {
        assert_eq!(written.cells(), pool.get(*id).cells());
    }
}
