//! 端到端场景：日志 -> 三元组 -> 图存储 -> 查询

use gaussian_kg::ontology::{self, vocab};
use gaussian_kg::store::{PatternTerm, TriplePattern};
use gaussian_kg::{
    ingest, ingest_turtle, parse, GraphStore, Intent, KgConfig, KgError, ParseError,
    ParseOptions, QueryEngine, Term, TermExt, Triple,
};
use gaussian_kg::models::TerminationStatus;

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

const TOLUENE: &str = include_str!("data/toluene_cbs_qb3.log");
const WATER: &str = include_str!("data/water_hf.log");
const WATER_ERROR: &str = include_str!("data/water_error.log");

fn ingest_text(store: &GraphStore, text: &str) -> gaussian_kg::Result<gaussian_kg::InsertOutcome> {
    ingest(
        store,
        text.as_bytes(),
        &ParseOptions::default(),
        &KgConfig::default(),
    )
}

fn count(store: &GraphStore, predicate: &str) -> usize {
    store
        .query(&TriplePattern::new(
            PatternTerm::var("s"),
            PatternTerm::iri(predicate),
            PatternTerm::var("o"),
        ))
        .len()
}

#[test]
fn toluene_cbs_qb3_scenario() {
    let calc = parse(TOLUENE).unwrap();
    assert_eq!(calc.method, "CBS-QB3");
    assert_eq!(calc.atom_count(), 15);
    assert_eq!(calc.formula(), "C7H8");
    assert_eq!(calc.total_energy.value, -271.020456);
    assert_eq!(calc.frequencies.len(), 39);
    assert_eq!(calc.max_frequency(), Some(3170.2));
    assert!(calc.converged);

    let store = GraphStore::new();
    let outcome = ingest_text(&store, TOLUENE).unwrap();
    assert!(outcome.inserted);

    assert_eq!(count(&store, vocab::HAS_ATOM), 15);
    assert_eq!(count(&store, vocab::HAS_FREQUENCY), 39);
    assert_eq!(count(&store, vocab::HAS_SCF_ENERGY), 1);

    let engine = QueryEngine::new(&store);
    let energy = engine.answer(&Intent::ScfEnergy).unwrap();
    assert_eq!(energy.text, "SCF energy: -271.020456 Hartree");

    let top = engine.answer(&Intent::TopFrequencies { n: 1 }).unwrap();
    assert_eq!(top.rows.len(), 1);
    assert_eq!(top.rows[0]["value"].value(), "3170.2");
    assert_eq!(top.text, "Top 1 frequencies (cm^-1): 3170.2");

    let convergence = store.query(&TriplePattern::new(
        PatternTerm::Bound(outcome.calculation.subject.clone()),
        PatternTerm::iri(vocab::HAS_CONVERGENCE),
        PatternTerm::var("c"),
    ));
    assert_eq!(convergence[0]["c"], Term::typed("true", vocab::XSD_BOOLEAN));
}

#[test]
fn top_frequencies_sorted_with_index_tie_break() {
    let store = GraphStore::new();
    ingest_text(&store, TOLUENE).unwrap();

    let answer = QueryEngine::new(&store)
        .answer(&Intent::TopFrequencies { n: 7 })
        .unwrap();
    let pairs: Vec<(&str, &str)> = answer
        .rows
        .iter()
        .map(|row| (row["index"].value(), row["value"].value()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("35", "3170.2"),
            ("38", "3165.9"),
            ("37", "3164.4"),
            ("36", "3163"),
            ("34", "3161.9"),
            ("32", "3153.4"),
            ("33", "3153.4"),
        ]
    );
}

#[test]
fn frequency_indices_follow_file_order() {
    let calc = parse(TOLUENE).unwrap();
    let indices: Vec<usize> = calc.frequencies.iter().map(|f| f.index).collect();
    assert_eq!(indices, (0..39).collect::<Vec<_>>());
    assert_eq!(calc.frequencies[0].value, 29.4);
    assert_eq!(calc.frequencies[36].value, 3163.0);
}

#[test]
fn non_log_input_is_rejected() {
    let text = "Just a shopping list\napples\npears\n";
    assert!(!gaussian_kg::parsers::probe(text).is_recognized());
    assert_eq!(parse(text), Err(ParseError::UnrecognizedFormat));

    let store = GraphStore::new();
    assert!(ingest_text(&store, text).is_err());
    assert!(store.is_empty());
}

#[test]
fn hash_comment_files_are_not_logs() {
    let inputs = [
        "#!/bin/bash\necho hello\n",
        "# Meeting notes\n# agenda\n- review\n",
    ];
    for text in inputs {
        assert!(!gaussian_kg::parsers::probe(text).is_recognized());
        assert_eq!(parse(text), Err(ParseError::UnrecognizedFormat));

        let store = GraphStore::new();
        match ingest_text(&store, text) {
            Err(KgError::Parse(ParseError::UnrecognizedFormat)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(store.is_empty());
    }
}

#[test]
fn error_termination_is_recorded_not_fatal() {
    let calc = parse(WATER_ERROR).unwrap();
    assert_eq!(calc.termination, TerminationStatus::Error);
    assert!(!calc.converged);
    assert!(calc.run_timestamp.is_none());
    assert_eq!(calc.frequencies.len(), 3);

    let store = GraphStore::new();
    ingest_text(&store, WATER_ERROR).unwrap();
    assert_eq!(store.calculations().len(), 1);

    let status = store.query(&TriplePattern::new(
        PatternTerm::var("s"),
        PatternTerm::iri(vocab::HAS_TERMINATION_STATUS),
        PatternTerm::var("o"),
    ));
    assert_eq!(status.len(), 1);
    assert_eq!(status[0]["o"].value(), "error");

    let converged = store.query(&TriplePattern::new(
        PatternTerm::var("s"),
        PatternTerm::iri(vocab::HAS_CONVERGENCE),
        PatternTerm::var("o"),
    ));
    assert_eq!(converged[0]["o"].value(), "false");

    // 与正常结束的同一分子是不同的内容
    ingest_text(&store, WATER).unwrap();
    assert_eq!(store.calculations().len(), 2);
}

#[test]
fn malformed_geometry_row_leaves_store_unchanged() {
    let store = GraphStore::new();
    ingest_text(&store, WATER).unwrap();
    let before = store.len();

    let broken = TOLUENE.replace("2.420780", "2.42O780");
    let err = ingest_text(&store, &broken).unwrap_err();
    match err {
        KgError::Parse(ParseError::MalformedNumericField {
            section,
            row,
            value,
        }) => {
            assert_eq!(section, "geometry");
            assert_eq!(row, 6);
            assert_eq!(value, "2.42O780");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(store.len(), before);
    assert_eq!(store.calculation_count(), 1);
}

#[test]
fn ingest_is_idempotent() {
    let store = GraphStore::new();
    let first = ingest_text(&store, TOLUENE).unwrap();
    let triples = store.triples_of(&first.calculation);

    let second = ingest_text(&store, TOLUENE).unwrap();
    assert!(!second.inserted);
    assert_eq!(second.calculation, first.calculation);
    assert_eq!(store.calculation_count(), 1);
    assert_eq!(store.triples_of(&second.calculation), triples);
}

#[test]
fn serialization_is_byte_identical() {
    let config = KgConfig::default();
    let a = ontology::serialize(&parse(TOLUENE).unwrap(), &config).unwrap();
    let b = ontology::serialize(&parse(TOLUENE).unwrap(), &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn turtle_round_trip_is_set_equal() {
    let source = GraphStore::new();
    ingest_text(&source, TOLUENE).unwrap();
    ingest_text(&source, WATER).unwrap();

    let config = KgConfig::default();
    let text = ontology::to_turtle(&source.triples(), &ontology::prefixes(&config.base_iri)).unwrap();

    let restored = GraphStore::new();
    let outcomes = ingest_turtle(&restored, &text).unwrap();
    assert_eq!(outcomes.len(), 2);

    let a: HashSet<Triple> = source.triples().into_iter().collect();
    let b: HashSet<Triple> = restored.triples().into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(source.calculations(), restored.calculations());
}

#[test]
fn atom_count_matches_geometry_rows() {
    let store = GraphStore::new();
    let outcome = ingest_text(&store, WATER).unwrap();
    let answer = QueryEngine::new(&store)
        .scoped(outcome.calculation)
        .answer(&Intent::AtomCount)
        .unwrap();
    assert_eq!(answer.text, "Atom count: 3");
    assert_eq!(answer.rows[0]["count"].value(), "3");
}

#[test]
fn natural_language_questions() {
    let store = GraphStore::new();
    ingest_text(&store, TOLUENE).unwrap();
    let engine = QueryEngine::new(&store);

    let intent = Intent::from_text("Which method was used?").unwrap();
    assert_eq!(
        engine.answer(&intent).unwrap().text,
        "Method: CBS-QB3, basis set: unknown"
    );

    let intent = Intent::from_text("what is the HOMO-LUMO gap").unwrap();
    assert_eq!(
        engine.answer(&intent).unwrap().text,
        "HOMO-LUMO gap: 0.36332 Hartree"
    );

    let intent = Intent::from_text("What are the highest vibrational frequencies?").unwrap();
    assert_eq!(
        intent,
        Intent::TopFrequencies {
            n: gaussian_kg::query::intent::DEFAULT_TOP_N
        }
    );
    assert_eq!(engine.answer(&intent).unwrap().rows.len(), 5);

    assert!(Intent::from_text("tell me a joke").is_err());
}

#[test]
fn concurrent_ingest_of_same_content_yields_one_calculation() {
    let store = Arc::new(GraphStore::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            std::thread::spawn(move || ingest_text(&store, TOLUENE).unwrap())
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(outcomes.iter().filter(|o| o.inserted).count(), 1);
    assert!(outcomes
        .iter()
        .all(|o| o.calculation == outcomes[0].calculation));
    assert_eq!(store.calculation_count(), 1);
}

#[test]
fn batch_ingest_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("toluene.log"), TOLUENE).unwrap();
    fs::write(dir.path().join("water.out"), WATER).unwrap();
    fs::write(dir.path().join("copy.log"), WATER).unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let config = KgConfig::default();
    let files = gaussian_kg::batch::FileCollector::new(dir.path().to_path_buf())
        .with_pattern(&config.pattern)
        .unwrap()
        .collect()
        .unwrap();
    assert_eq!(files.len(), 3);

    let store = GraphStore::new();
    let result = gaussian_kg::batch::BatchRunner::new(0)
        .ingest(&files, &store, &config)
        .unwrap();
    assert_eq!(result.success, 2);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(store.calculation_count(), 2);
}

#[test]
fn pattern_query_from_text() {
    let store = GraphStore::new();
    ingest_text(&store, WATER).unwrap();

    let prefixes = ontology::prefixes(&KgConfig::default().base_iri);
    let patterns = [
        TriplePattern::parse("?atom ontocompchem:hasElement \"O\"", &prefixes).unwrap(),
        TriplePattern::parse("?atom ontocompchem:hasZCoordinate ?z", &prefixes).unwrap(),
    ];
    let rows = QueryEngine::new(&store).select(&patterns);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["z"], Term::typed("0.127206", vocab::XSD_DOUBLE));
}
