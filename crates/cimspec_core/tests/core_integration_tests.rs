//! Integration tests for building and traversing specialization trees.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use cimspec_core::{
    build, load_and_build, BuildOptions, EventRecorder, Node, PropertyNode, Specialization,
    TraversalEngine, Visitor,
};
use cimspec_defs::DefinitionReader;

const ROOT: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
CONTRIBUTORS: Someone Else
QC_STATUS: draft
DESCRIPTION: Ocean realm
GRID: ocean_grid
KEY_PROPERTIES: ocean_key_properties
PROCESSES:
  - ocean_advection
"#;

const GRID: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
QC_STATUS: draft
DESCRIPTION: Ocean grid
DETAILS:
  discretisation:
    description: Grid discretisation
    properties:
      - [scheme, "ENUM:grid_types", "1.1", "Horizontal grid type"]
ENUMERATIONS:
  grid_types:
    description: Grid types
    is_open: true
    members:
      - [lat-lon, Regular lat-lon grid]
      - [tripolar, null]
"#;

const KEY_PROPERTIES: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
QC_STATUS: draft
DESCRIPTION: Ocean key properties
DETAILS:
  toplevel:
    description: Top level properties
    properties:
      - [model_family, str, "1.1", "Model family"]
"#;

const ADVECTION: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
QC_STATUS: draft
DESCRIPTION: Ocean advection
DETAILS:
  toplevel:
    description: Advection properties
    properties:
      - [scheme, "ENUM:advection_types", "1.1", "Advection scheme"]
ENUMERATIONS:
  advection_types:
    description: Advection schemes
    is_open: false
    members:
      - [centered, Centered scheme]
      - [upwind, null]
SUB_PROCESSES:
  momentum:
    DESCRIPTION: Momentum advection
    DETAILS:
      toplevel:
        description: Momentum properties
        properties:
          - [order, int, "0.1", "Scheme order"]
          - [flux, "ENUM:advection_types", "0.1", "Flux scheme"]
"#;

const INLINE: &str = r#"
AUTHORS: Ocean Team
CONTACT: ocean@example.org
CONTRIBUTORS: Someone Else
QC_STATUS: draft
DESCRIPTION: Ocean realm
GRID:
  DESCRIPTION: Ocean grid
  DETAILS:
    discretisation:
      description: Grid discretisation
      properties:
        - [scheme, "ENUM:grid_types", "1.1", "Horizontal grid type"]
  ENUMERATIONS:
    grid_types:
      description: Grid types
      is_open: true
      members:
        - [lat-lon, Regular lat-lon grid]
        - [tripolar, null]
KEY_PROPERTIES:
  DESCRIPTION: Ocean key properties
  DETAILS:
    toplevel:
      description: Top level properties
      properties:
        - [model_family, str, "1.1", "Model family"]
PROCESSES:
  advection:
    DESCRIPTION: Ocean advection
    DETAILS:
      toplevel:
        description: Advection properties
        properties:
          - [scheme, "ENUM:advection_types", "1.1", "Advection scheme"]
    ENUMERATIONS:
      advection_types:
        description: Advection schemes
        is_open: false
        members:
          - [centered, Centered scheme]
          - [upwind, null]
    SUB_PROCESSES:
      momentum:
        DESCRIPTION: Momentum advection
        DETAILS:
          toplevel:
            description: Momentum properties
            properties:
              - [order, int, "0.1", "Scheme order"]
              - [flux, "ENUM:advection_types", "0.1", "Flux scheme"]
"#;

fn write_module_set(dir: &Path) {
    fs::write(dir.join("ocean.yaml"), ROOT).unwrap();
    fs::write(dir.join("ocean_grid.yaml"), GRID).unwrap();
    fs::write(dir.join("ocean_key_properties.yaml"), KEY_PROPERTIES).unwrap();
    fs::write(dir.join("ocean_advection.yaml"), ADVECTION).unwrap();
}

fn module_tree() -> Specialization {
    let temp = tempdir().unwrap();
    write_module_set(temp.path());
    let outcome = load_and_build(temp.path(), "ocean", &BuildOptions::default()).unwrap();
    assert!(outcome.is_valid(), "Build failed: {:?}", outcome.report.errors);
    outcome.into_tree().unwrap().0
}

fn inline_tree() -> Specialization {
    let set = DefinitionReader::load_str("ocean", INLINE).unwrap();
    build(&set, &BuildOptions::default()).into_tree().unwrap().0
}

fn events(tree: &Specialization) -> Vec<String> {
    let mut recorder = EventRecorder::new();
    TraversalEngine::new(tree).run(&mut recorder).unwrap();
    recorder.events.iter().map(|e| e.to_string()).collect()
}

/// Topics are visited grid first, then key properties, then processes.
#[test]
fn test_topic_order() {
    let tree = module_tree();
    let topics: Vec<String> = events(&tree)
        .into_iter()
        .filter(|e| {
            e.starts_with("enter grid")
                || e.starts_with("enter key-properties")
                || e.starts_with("enter process")
                || e.starts_with("enter sub-process")
        })
        .collect();

    assert_eq!(
        topics,
        vec![
            "enter grid cmip6.ocean.grid",
            "enter key-properties cmip6.ocean.key_properties",
            "enter process cmip6.ocean.advection",
            "enter sub-process cmip6.ocean.advection.momentum",
        ]
    );
}

/// A leaf's enumeration events sit between its enter and exit.
#[test]
fn test_leaf_event_sequence() {
    let tree = module_tree();
    let events = events(&tree);
    let start = events
        .iter()
        .position(|e| e == "enter detail cmip6.ocean.grid.discretisation.scheme")
        .unwrap();

    assert_eq!(
        &events[start..start + 9],
        &[
            "enter detail cmip6.ocean.grid.discretisation.scheme",
            "enter enum cmip6.ocean.grid.discretisation.scheme.grid_types",
            "enter enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.lat-lon",
            "exit enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.lat-lon",
            "enter enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.tripolar",
            "exit enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.tripolar",
            "enter enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.Other",
            "exit enum-choice cmip6.ocean.grid.discretisation.scheme.grid_types.Other",
            "exit enum cmip6.ocean.grid.discretisation.scheme.grid_types",
        ]
    );
}

/// Sub-processes resolve enumerations declared by their owning process.
#[test]
fn test_sub_process_uses_owner_enumeration() {
    let temp = tempdir().unwrap();
    write_module_set(temp.path());
    let outcome = load_and_build(temp.path(), "ocean", &BuildOptions::default()).unwrap();

    assert!(outcome
        .registry
        .contains("cmip6.ocean.advection.momentum.flux.advection_types.upwind"));
}

/// Both dialects produce identical event streams.
#[test]
fn test_dialects_build_identical_trees() {
    assert_eq!(events(&module_tree()), events(&inline_tree()));
}

/// Every node has a unique identifier, and the registry indexes all of them.
#[test]
fn test_identifiers_are_unique() {
    let temp = tempdir().unwrap();
    write_module_set(temp.path());
    let outcome = load_and_build(temp.path(), "ocean", &BuildOptions::default()).unwrap();
    let (tree, registry) = outcome.into_tree().unwrap();

    let ids: HashSet<&str> = tree.nodes().map(|(_, node)| node.id.as_str()).collect();
    assert_eq!(ids.len(), tree.len());
    assert_eq!(registry.len(), tree.len());

    for (id, node) in tree.nodes() {
        assert_eq!(registry.get(&node.id), Some(id));
        if let Some(parent) = tree.parent(id) {
            assert_eq!(node.id, format!("{}.{}", parent.id, node.name));
        }
    }
}

#[derive(Default)]
struct LeafCounter {
    leaves: usize,
    injected: usize,
}

impl Visitor for LeafCounter {
    type Error = ();

    fn enter_property(&mut self, _node: &Node, property: &PropertyNode) -> Result<(), ()> {
        self.leaves += 1;
        if property.was_injected {
            self.injected += 1;
        }
        Ok(())
    }
}

/// Several visitors may walk one tree at the same time.
#[test]
fn test_parallel_traversals() {
    let tree = module_tree();

    let (counts, recorded) = std::thread::scope(|s| {
        let counter = s.spawn(|| {
            let mut counter = LeafCounter::default();
            TraversalEngine::new(&tree).run(&mut counter).unwrap();
            (counter.leaves, counter.injected)
        });
        let recorder = s.spawn(|| events(&tree));
        (counter.join().unwrap(), recorder.join().unwrap())
    });

    // Four topics each get name and overview injected.
    assert_eq!(counts, (13, 8));
    let exits = recorded.iter().filter(|e| e.starts_with("exit detail ")).count();
    assert_eq!(exits, counts.0);
    assert_eq!(recorded.first().map(String::as_str), Some("enter realm cmip6.ocean"));
}

/// Building the same set twice gives equal trees.
#[test]
fn test_build_is_deterministic() {
    let set = DefinitionReader::load_str("ocean", INLINE).unwrap();
    let first = build(&set, &BuildOptions::default());
    let second = build(&set, &BuildOptions::default());
    assert_eq!(first.tree, second.tree);
    assert_eq!(first.tree.unwrap().root().description, "Ocean realm");
}

/// One malformed companion does not stop the rest of the set from being
/// built and reported.
#[test]
fn test_malformed_companion_does_not_hide_other_errors() {
    let temp = tempdir().unwrap();
    write_module_set(temp.path());
    fs::write(
        temp.path().join("ocean_key_properties.yaml"),
        "DESCRIPTION: Missing owner fields\n",
    )
    .unwrap();
    fs::write(temp.path().join("ocean_advection.yaml"), "DETAILS: [unterminated").unwrap();

    let outcome = load_and_build(temp.path(), "ocean", &BuildOptions::default()).unwrap();
    assert!(!outcome.is_valid());

    let unreadable = outcome.report.errors_for("ocean_advection");
    assert_eq!(unreadable.len(), 1);
    assert!(unreadable[0].starts_with("definition cannot be read :: "));
    assert_eq!(outcome.report.errors_for("ocean_key_properties").len(), 3);
    assert!(outcome.registry.contains("cmip6.ocean.grid"));
}
