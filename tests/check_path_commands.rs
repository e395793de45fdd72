mod common;

use assert_fs::TempDir;
use common::command::{destination_dir, json_output, run_portcheck_command};
use common::file::write_files;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

// check-path needs no history, so any directory works as the origin

#[rstest]
#[case("Sources/ReachuCore/Cart/CartManager.swift", true)]
#[case("Sources/ReachuUI/Components/ProductCard.swift", true)]
#[case("Tests/ReachuCoreTests/CartTests.swift", false)]
#[case("Demo/App/ContentView.swift", false)]
#[case("Package.swift", false)]
#[case("Sources/Demo/Preview.swift", false)]
fn relevance_of_origin_paths(destination_dir: TempDir, #[case] path: &str, #[case] expected: bool) {
    let mut cmd = run_portcheck_command(
        destination_dir.path(),
        Some(destination_dir.path()),
        &["--format", "json", "check-path", path],
    );
    let report = json_output(&mut cmd);

    assert_eq!(report[0]["path"], path);
    assert_eq!(report[0]["relevant"], Value::Bool(expected));
}

#[rstest]
fn excluded_path_names_the_pattern(destination_dir: TempDir) {
    let mut cmd = run_portcheck_command(
        destination_dir.path(),
        None,
        &["--format", "json", "check-path", "Tests/ReachuCoreTests/CartTests.swift"],
    );
    let report = json_output(&mut cmd);

    assert_eq!(
        report,
        json!([{
            "path": "Tests/ReachuCoreTests/CartTests.swift",
            "relevant": false,
            "decision": "excluded",
            "pattern": "(^|/)Tests/",
        }])
    );
}

#[rstest]
fn relevant_path_maps_to_existing_destination_file(destination_dir: TempDir) {
    write_files(
        destination_dir.path(),
        &[("library/io/reachu/ReachuCore/Cart/CartManager.kt", "class CartManager\n")],
    );

    let mut cmd = run_portcheck_command(
        destination_dir.path(),
        Some(destination_dir.path()),
        &["--format", "json", "check-path", "Sources/ReachuCore/Cart/CartManager.swift"],
    );
    let report = json_output(&mut cmd);
    let mapping = &report[0]["mapping"];

    assert_eq!(report[0]["decision"], "included");
    assert_eq!(report[0]["prefix"], "Sources/");
    assert_eq!(mapping["rule"], "direct");
    assert_eq!(
        mapping["destination"],
        "library/io/reachu/ReachuCore/Cart/CartManager.kt"
    );
}

#[rstest]
fn misplaced_destination_file_is_found_by_search(destination_dir: TempDir) {
    write_files(
        destination_dir.path(),
        &[("library/io/reachu/core/managers/CartManager.kt", "class CartManager\n")],
    );

    let mut cmd = run_portcheck_command(
        destination_dir.path(),
        Some(destination_dir.path()),
        &["--format", "json", "check-path", "Sources/ReachuCore/Cart/CartManager.swift"],
    );
    let report = json_output(&mut cmd);
    let mapping = &report[0]["mapping"];

    assert_eq!(mapping["rule"], "fallback");
    assert_eq!(
        mapping["destination"],
        "library/io/reachu/core/managers/CartManager.kt"
    );
}

#[rstest]
fn text_output_describes_decision_and_mapping(destination_dir: TempDir) {
    run_portcheck_command(
        destination_dir.path(),
        Some(destination_dir.path()),
        &[
            "check-path",
            "Sources/ReachuCore/Widget.swift",
            "README.md",
        ],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains(
        "relevant Sources/ReachuCore/Widget.swift (inside portable surface 'Sources/')",
    ))
    .stdout(predicate::str::contains("-> no destination file (via Sources/)"))
    .stdout(predicate::str::contains(
        "irrelevant README.md (excluded by pattern 'README\\.md$')",
    ));
}

#[rstest]
fn without_destination_mapping_is_not_evaluated(destination_dir: TempDir) {
    run_portcheck_command(
        destination_dir.path(),
        None,
        &["check-path", "Sources/ReachuCore/Widget.swift"],
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("-> destination not checked"));
}
