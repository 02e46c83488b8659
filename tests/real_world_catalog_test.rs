use std::fs;
use std::path::PathBuf;
use tscat::{run_lookup, FindingKind, Linter, Status, TsParser, TsWriter};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/Seraphine.zh_CN.ts")
}

#[test]
fn test_fixture_shape() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();

    assert_eq!(catalog.header.version.as_deref(), Some("2.1"));
    assert_eq!(catalog.language(), Some("zh_CN"));
    assert_eq!(catalog.header.source_language.as_deref(), Some("en_US"));
    assert_eq!(catalog.contexts.len(), 57);
    assert_eq!(catalog.len(), 525);

    let stats = catalog.stats();
    assert_eq!(stats.obsolete, 92);
    assert_eq!(stats.active, 433);
    assert_eq!(stats.unfinished, 0);
}

#[test]
fn test_documented_lookups() {
    let translator = TsParser::parse_file(&fixture()).unwrap().translator();

    assert_eq!(translator.lookup("MainWindow", "Career"), "生涯");
    assert_eq!(translator.lookup("DodgeCard", "Dodge"), "秒退");
    assert_eq!(
        translator.lookup("UnknownContext", "Nonexistent phrase"),
        "Nonexistent phrase"
    );
}

#[test]
fn test_obsolete_context_falls_back() {
    let translator = TsParser::parse_file(&fixture()).unwrap().translator();

    // AramFlyout only holds obsolete messages, AramFlyoutView the live ones
    assert_eq!(translator.lookup("AramFlyout", "Tenacity: "), "Tenacity: ");
    assert_eq!(translator.lookup("AramFlyoutView", "Tenacity: "), "韧性：");
}

#[test]
fn test_every_active_entry_is_served() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();
    let translator = catalog.translator();

    assert_eq!(translator.len(), 433);
    for entry in catalog.active_entries() {
        assert_eq!(
            translator.lookup(&entry.context, &entry.source),
            entry.translation,
            "wrong translation for {}::{:?}",
            entry.context,
            entry.source
        );
    }
}

#[test]
fn test_no_obsolete_translation_leaks() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();
    let translator = catalog.translator();

    for entry in catalog.entries().filter(|e| e.status.is_obsolete()) {
        let served = translator.lookup(&entry.context, &entry.source);
        let has_active_twin = catalog
            .active_entries()
            .any(|a| a.context == entry.context && a.source == entry.source);
        if !has_active_twin {
            assert_eq!(served, entry.source);
        }
    }
}

#[test]
fn test_multiline_and_escaped_sources() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();

    let multiline = catalog
        .entries()
        .find(|e| e.source.starts_with("Game resources will be downloaded again\n"))
        .expect("multiline source present");
    assert!(multiline.translation.contains('\n'));

    assert!(catalog
        .entries()
        .any(|e| e.source == "Send friend request by summoner's name"));
    assert!(catalog.entries().any(|e| e.source == "Path \""));
}

#[test]
fn test_write_is_byte_identical() {
    let original = fs::read_to_string(fixture()).unwrap();
    let catalog = TsParser::parse_str(&original).unwrap();

    let written = TsWriter::to_string(&catalog).unwrap();
    assert_eq!(written, original);
}

#[test]
fn test_round_trip_preserves_tuples() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();
    let reparsed = TsParser::parse_str(&TsWriter::to_string(&catalog).unwrap()).unwrap();

    assert_eq!(reparsed.tuples(), catalog.tuples());
    assert_eq!(reparsed, catalog);
}

#[test]
fn test_lint_fixture_has_no_errors() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();
    let report = Linter::new().unwrap().check(&catalog);

    assert!(!report.has_errors());
    assert_eq!(report.of_kind(FindingKind::DuplicateActive).count(), 0);
    assert_eq!(report.of_kind(FindingKind::EmptyTranslation).count(), 0);
}

#[test]
fn test_run_lookup_reports_fallback() {
    let hit = run_lookup(&fixture(), "MainWindow", "Career", None).unwrap();
    assert_eq!(hit.text, "生涯");
    assert!(!hit.fell_back);

    let miss = run_lookup(&fixture(), "MainWindow", "Nope", None).unwrap();
    assert_eq!(miss.text, "Nope");
    assert!(miss.fell_back);
}

#[test]
fn test_obsolete_entries_keep_their_status() {
    let catalog = TsParser::parse_file(&fixture()).unwrap();
    let aram = catalog.context("AramFlyout").unwrap();
    assert!(aram.messages.iter().all(|m| m.status == Status::Obsolete));
}
