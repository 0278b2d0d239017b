// Composition tests: documents on disk -> table -> chart.
//
// Each test writes its own scratch directory under the system temp dir and
// removes it afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use manifesto::config::Config;
use manifesto::output::chart::{ChartRenderer, ChartStyle, PartyPalette};
use manifesto::topics::{build_table, DirectoryLoader, FrequencyTable, TopicCatalog};
use manifesto::AnalysisError;

/// Fresh, empty scratch directory unique to this test and process.
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("manifesto-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_doc(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(format!("{name}.txt")), text).unwrap();
}

fn ids(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn sample_table(dir: &Path) -> FrequencyTable {
    write_doc(dir, "Tory", "We will stop the boats and secure the border. Rwanda works.");
    write_doc(dir, "Labour", "Build homes, cut emissions, and back Ukraine against Russia.");
    write_doc(dir, "Greens", "Climate, climate, climate: carbon emissions and renewable energy.");
    let loader = DirectoryLoader::new(dir);
    build_table(&ids(&["Tory", "Labour", "Greens"]), &loader, &TopicCatalog::default(), 1).unwrap()
}

// ============================================================
// Files -> table
// ============================================================

#[test]
fn table_rows_follow_requested_order() {
    let dir = scratch_dir("order");
    write_doc(&dir, "A", "eu brexit");
    write_doc(&dir, "B", "home homes");
    write_doc(&dir, "C", "climate");

    let loader = DirectoryLoader::new(&dir);
    let table = build_table(&ids(&["C", "A", "B"]), &loader, &TopicCatalog::default(), 1).unwrap();
    assert_eq!(table.documents(), vec!["C", "A", "B"]);
    assert_eq!(table.rows[1].rate("Brexit"), Some(1000.0));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn table_values_from_files() {
    let dir = scratch_dir("values");
    let table = sample_table(&dir);

    // "We will stop the boats and secure the border Rwanda works" = 11 words,
    // boats + border + rwanda = 3 hits
    let tory = &table.rows[0];
    assert_eq!(tory.total_words, 11);
    assert_eq!(tory.hits("Immigration"), Some(3));

    // climate x3, carbon, emissions, renewable out of 8 words
    let greens = &table.rows[2];
    assert_eq!(greens.total_words, 8);
    assert_eq!(greens.hits("Environment"), Some(6));
    assert_eq!(greens.rate("Environment"), Some(750.0));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn min_length_changes_denominator() {
    let dir = scratch_dir("minlen");
    write_doc(&dir, "A", "a an eu the brexit");

    let loader = DirectoryLoader::new(&dir);
    let catalog = TopicCatalog::default();
    let all = build_table(&ids(&["A"]), &loader, &catalog, 1).unwrap();
    let long = build_table(&ids(&["A"]), &loader, &catalog, 3).unwrap();

    assert_eq!(all.rows[0].total_words, 5);
    assert_eq!(long.rows[0].total_words, 2);
    // "eu" is filtered out along with the short words
    assert_eq!(long.rows[0].hits("Brexit"), Some(1));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn every_missing_document_is_reported() {
    let dir = scratch_dir("missing");
    write_doc(&dir, "Tory", "border");

    let loader = DirectoryLoader::new(&dir);
    let err = build_table(
        &ids(&["Tory", "Labour", "SNP"]),
        &loader,
        &TopicCatalog::default(),
        1,
    )
    .unwrap_err();

    match &err {
        AnalysisError::Documents(failures) => {
            assert_eq!(failures.len(), 2);
            let msg = err.to_string();
            assert!(msg.contains("'Labour'"));
            assert!(msg.contains("'SNP'"));
        }
        other => panic!("expected Documents, got {other:?}"),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn invalid_utf8_is_a_file_access_error() {
    let dir = scratch_dir("utf8");
    fs::write(dir.join("Bad.txt"), [0xff, 0xfe, 0xfd]).unwrap();

    let loader = DirectoryLoader::new(&dir);
    let err = build_table(&ids(&["Bad"]), &loader, &TopicCatalog::default(), 1).unwrap_err();
    assert!(matches!(err, AnalysisError::FileAccess { ref document, .. } if document == "Bad"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_file_is_an_empty_document_error() {
    let dir = scratch_dir("empty");
    write_doc(&dir, "Blank", "");

    let loader = DirectoryLoader::new(&dir);
    let err = build_table(&ids(&["Blank"]), &loader, &TopicCatalog::default(), 1).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyDocument(ref d) if d == "Blank"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn table_serializes_with_topic_columns() {
    let dir = scratch_dir("json");
    let table = sample_table(&dir);

    let json: serde_json::Value = serde_json::to_value(&table).unwrap();
    assert_eq!(json["topics"][0], "Immigration");
    assert_eq!(json["rows"][0]["document"], "Tory");
    assert_eq!(json["rows"][0]["topics"][0]["hits"], 3);

    fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Table -> chart
// ============================================================

fn small_style() -> ChartStyle {
    ChartStyle {
        width: 500,
        height: 240,
        ..ChartStyle::default()
    }
}

#[test]
fn render_writes_png_and_no_partial_file() {
    let dir = scratch_dir("render");
    let table = sample_table(&dir);
    let output = dir.join("Manifestos.png");

    let renderer = ChartRenderer::new(small_style());
    assert!(!renderer.has_labels());
    renderer
        .render(&table, &PartyPalette::standard().unwrap(), &output)
        .unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert!(!dir.join(".Manifestos.partial.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn render_into_missing_directory_fails_cleanly() {
    let dir = scratch_dir("render-missing");
    let table = sample_table(&dir);
    let output = dir.join("no-such-dir").join("Manifestos.png");

    let err = ChartRenderer::new(small_style())
        .render(&table, &PartyPalette::standard().unwrap(), &output)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Render { ref path, .. } if path == &output));
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn render_empty_table_fails() {
    let dir = scratch_dir("render-empty");
    let table = FrequencyTable {
        topics: TopicCatalog::default().names(),
        rows: vec![],
    };
    let output = dir.join("Manifestos.png");

    let err = ChartRenderer::new(small_style())
        .render(&table, &PartyPalette::standard().unwrap(), &output)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Render { .. }));
    assert!(!output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unknown_party_renders_with_fallback_color() {
    let dir = scratch_dir("render-unknown");
    write_doc(&dir, "Plaid", "wales home climate");
    let loader = DirectoryLoader::new(&dir);
    let table = build_table(&ids(&["Plaid"]), &loader, &TopicCatalog::default(), 1).unwrap();
    let output = dir.join("chart.png");

    ChartRenderer::new(small_style())
        .render(&table, &PartyPalette::standard().unwrap(), &output)
        .unwrap();
    assert!(output.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn bad_font_file_is_rejected() {
    let dir = scratch_dir("font");
    let font = dir.join("not-a-font.ttf");
    fs::write(&font, b"definitely not truetype").unwrap();

    let result = ChartRenderer::new(small_style()).with_font(&font);
    assert!(matches!(result, Err(AnalysisError::Config(_))));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn render_with_labels_writes_png() {
    // Needs a TrueType font on this machine; without one there is nothing to label
    let Some(font) = Config::default().resolve_font() else {
        return;
    };
    let dir = scratch_dir("render-labels");
    let table = sample_table(&dir);
    let output = dir.join("Manifestos.png");

    let renderer = ChartRenderer::new(small_style()).with_font(&font).unwrap();
    assert!(renderer.has_labels());
    // Registering the same font again reuses the bytes already loaded
    let renderer = renderer.with_font(&font).unwrap();
    renderer
        .render(&table, &PartyPalette::standard().unwrap(), &output)
        .unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert!(!dir.join(".Manifestos.partial.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}
