//! Integration tests for writing generator outputs.

use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

use cimspec_core::{build, BuildOptions, Specialization};
use cimspec_defs::DefinitionReader;
use cimspec_generators::{
    generate, write_outputs, GeneratorKind, GeneratorOptions, StyleOverride,
};

const ROOT: &str = r#"
AUTHORS: Sea Ice Team
CONTACT: seaice@example.org
CONTRIBUTORS: Someone Else
QC_STATUS: complete
DESCRIPTION: Sea ice realm
GRID: sea_ice_grid
KEY_PROPERTIES: ""
PROCESSES:
  - sea_ice_dynamics
"#;

const GRID: &str = r#"
AUTHORS: Sea Ice Team
CONTACT: seaice@example.org
QC_STATUS: complete
DESCRIPTION: Sea ice grid
DETAILS:
  toplevel:
    description: Grid properties
    properties:
      - [layers, int, "1.1", "Number of layers"]
"#;

const DYNAMICS: &str = r#"
AUTHORS: Sea Ice Team
CONTACT: seaice@example.org
QC_STATUS: complete
DESCRIPTION: Sea ice dynamics
DETAILS:
  rheology:
    description: Rheology
    properties:
      - [kind, "ENUM:rheology_kinds", "1.N", "Rheology kinds"]
ENUMERATIONS:
  rheology_kinds:
    description: Rheology kinds
    is_open: false
    members:
      - [EVP, Elastic viscous plastic]
      - [VP, null]
"#;

fn tree() -> Specialization {
    let set = DefinitionReader::load_documents(
        "sea_ice",
        ROOT,
        &[("sea_ice_grid", GRID), ("sea_ice_dynamics", DYNAMICS)],
    )
    .unwrap();
    let outcome = build(&set, &BuildOptions::default());
    assert!(outcome.is_valid(), "Build failed: {:?}", outcome.report.errors);
    outcome.into_tree().unwrap().0
}

/// Every generator writes its file under the expected name.
#[test]
fn test_write_all_outputs() {
    let temp = tempdir().unwrap();
    let tree = tree();

    let written = write_outputs(
        &tree,
        &GeneratorKind::ALL,
        &GeneratorOptions::default(),
        temp.path().join("out"),
    )
    .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "_sea_ice.json",
            "_sea_ice.mm",
            "_sea_ice-ids.csv",
            "_sea_ice-ids-level-1.csv",
            "_sea_ice-ids-level-2.csv",
            "_sea_ice-ids-level-3.csv",
        ]
    );
    for path in &written {
        assert!(!fs::read_to_string(path).unwrap().is_empty());
    }
}

/// Identifiers are derived from parents and listed with readable labels.
#[test]
fn test_identifier_labels() {
    let ids = generate(&tree(), GeneratorKind::IdsLevel3, &GeneratorOptions::default()).unwrap();
    assert!(ids.contains(
        "cmip6.sea_ice.dynamics.rheology.kind, Sea Ice > Dynamics > Rheology > Kind, detail"
    ));
    assert!(ids.contains("cmip6.sea_ice.grid.layers, Sea Ice > Grid > Layers, detail"));
}

/// A custom namespace flows from the builder into the id listing.
#[test]
fn test_custom_namespace() {
    let set = DefinitionReader::load_documents(
        "sea_ice",
        ROOT,
        &[("sea_ice_grid", GRID), ("sea_ice_dynamics", DYNAMICS)],
    )
    .unwrap();
    let options = BuildOptions {
        namespace: "cmip7".to_string(),
    };
    let (tree, _) = build(&set, &options).into_tree().unwrap();
    let generator_options = GeneratorOptions {
        namespace: "cmip7".to_string(),
        ..Default::default()
    };

    let ids = generate(&tree, GeneratorKind::IdsLevel1, &generator_options).unwrap();
    let mut lines = ids.lines();
    assert_eq!(lines.next(), Some("cmip7-id, cmip7-label, cmip7-type"));
    assert_eq!(lines.next(), Some("cmip7.sea_ice, Sea Ice, realm"));
}

/// Closed enumerations carry no `Other` choice.
#[test]
fn test_closed_enumeration_json() {
    let json: serde_json::Value = serde_json::from_str(
        &generate(&tree(), GeneratorKind::Json, &GeneratorOptions::default()).unwrap(),
    )
    .unwrap();

    let leaf = &json["processes"][0]["propertySets"][0]["properties"][0];
    assert_eq!(leaf["cardinality"], "1.N");
    assert_eq!(leaf["enum"]["isOpen"], false);
    assert_eq!(leaf["enum"]["choices"].as_array().unwrap().len(), 2);
    assert!(json.get("keyProperties").is_none());
}

/// Style overrides reach the mindmap.
#[test]
fn test_mindmap_style_overrides() {
    let mut options = GeneratorOptions::default();
    let overrides: BTreeMap<String, StyleOverride> = [(
        "detail".to_string(),
        StyleOverride {
            bg_color: Some("#ABCDEF".to_string()),
            ..Default::default()
        },
    )]
    .into_iter()
    .collect();
    options.styles.apply(&overrides);

    let mm = generate(&tree(), GeneratorKind::Mindmap, &options).unwrap();
    assert!(mm.contains("BACKGROUND_COLOR=\"#ABCDEF\""));
    assert!(mm.contains("TEXT=\"EVP\""));
}

const PROC_ROOT: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
CONTRIBUTORS: Someone Else
QC_STATUS: draft
DESCRIPTION: Ocean realm
PROCESSES:
  - ocean_proc_a
"#;

const PROC_A: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
QC_STATUS: draft
DESCRIPTION: Process A
DETAILS:
  toplevel:
    description: Top level properties
    properties:
      - [name, str, "1.1", desc]
  group_one:
    description: Group one
    properties:
      - [x, bool, "0.1", d]
"#;

/// Declared leaves come first in both the JSON document and the id listing;
/// the injected `overview` follows them.
#[test]
fn test_declared_leaves_precede_injected() {
    let set = DefinitionReader::load_documents("ocean", PROC_ROOT, &[("ocean_proc_a", PROC_A)])
        .unwrap();
    let outcome = build(&set, &BuildOptions::default());
    assert!(outcome.is_valid(), "Build failed: {:?}", outcome.report.errors);
    let (tree, _) = outcome.into_tree().unwrap();
    let options = GeneratorOptions::default();

    let json: serde_json::Value =
        serde_json::from_str(&generate(&tree, GeneratorKind::Json, &options).unwrap()).unwrap();
    let process = &json["processes"][0];
    assert_eq!(process["id"], "cmip6.ocean.proc_a");

    let properties = process["properties"].as_array().unwrap();
    let ids: Vec<&str> = properties.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["cmip6.ocean.proc_a.name", "cmip6.ocean.proc_a.overview"]);
    assert_eq!(properties[0]["wasInjected"], false);
    assert_eq!(properties[1]["wasInjected"], true);
    assert_eq!(process["propertySets"][0]["id"], "cmip6.ocean.proc_a.group_one");
    assert_eq!(
        process["propertySets"][0]["properties"][0]["id"],
        "cmip6.ocean.proc_a.group_one.x"
    );

    let listing = generate(&tree, GeneratorKind::Ids, &options).unwrap();
    let rows: Vec<&str> = listing.lines().collect();
    let position = |row: &str| rows.iter().position(|r| *r == row).unwrap();

    let process_row = position("cmip6.ocean.proc_a, Ocean > Proc A, process");
    let name_row = position("cmip6.ocean.proc_a.name, Ocean > Proc A > Name, detail");
    let overview_row = position("cmip6.ocean.proc_a.overview, Ocean > Proc A > Overview, detail");
    let set_row = position("cmip6.ocean.proc_a.group_one, Ocean > Proc A > Group One, detail-set");
    let leaf_row = position("cmip6.ocean.proc_a.group_one.x, Ocean > Proc A > Group One > X, detail");
    assert!(process_row < name_row);
    assert!(name_row < overview_row);
    assert!(overview_row < set_row);
    assert!(set_row < leaf_row);
}
