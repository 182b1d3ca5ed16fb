use super::common::*;

use serde_json::json;

use crate::assessment::{
    export_document, export_file_name, import_document, AveragesSnapshot, Dimension, DocumentKind,
    ImportError, Project, ProjectDocument, Score, ScaleOrientation, CURRENT_SCHEMA_VERSION,
};

fn import_value(value: serde_json::Value) -> Result<Project, ImportError> {
    import_document(&value.to_string())
}

#[test]
fn export_then_import_reproduces_the_grid() {
    let mut project = project_with_stages(&["Production", "Use"]);
    project.set_stage_changed("Use", true).expect("flag");
    score(&mut project, "Production", "Climate change", 5);
    project
        .set_score("Production", "Water use", None)
        .expect("explicit unknown");
    score(&mut project, "Use", "Climate change", 1);
    project
        .set_note("Use", "Climate change", "energy intensive")
        .expect("note");

    let raw = export_document(&project)
        .to_json_pretty()
        .expect("document serializes");
    let restored = import_document(&raw).expect("document imports");

    assert_eq!(restored.grid(), project.grid());
    assert_eq!(restored.lifecycle_stages(), project.lifecycle_stages());
    assert_eq!(restored.lifecycle_changed(), project.lifecycle_changed());
    assert_eq!(restored.selected_factors(), project.selected_factors());
    assert_eq!(restored.scale(), ScaleOrientation::HigherIsBetter);
    assert_eq!(restored.average_by_stage(), project.average_by_stage());
}

#[test]
fn snapshot_matches_recomputed_aggregates() {
    let mut project = project_with_stages(&["Production", "Use"]);
    score(&mut project, "Production", "Capex", 2);
    score(&mut project, "Use", "Capex", 3);

    let document = export_document(&project);
    let averages = document.averages.as_ref().expect("snapshot written");

    assert_eq!(document.schema_version, CURRENT_SCHEMA_VERSION);
    assert!(document.exported_at.is_some());
    assert_eq!(averages.overall, Some(2.5));
    assert_eq!(averages.by_stage.get("Production"), Some(&Some(2.0)));
    assert_eq!(averages.by_factor.get("Capex"), Some(&2.5));
}

#[test]
fn imported_snapshot_matches_recomputed_aggregates() {
    let mut project = project_with_stages(&["Production", "Use", "Disposal"]);
    score(&mut project, "Production", "Capex", 2);
    score(&mut project, "Production", "Water use", 3);
    score(&mut project, "Use", "Capex", 1);
    score(&mut project, "Use", "Fair wages", 3);

    let document = export_document(&project);
    let raw = document.to_json_pretty().expect("document serializes");
    let restored = import_document(&raw).expect("document imports");
    let snapshot = document.averages.as_ref().expect("snapshot written");

    assert_eq!(snapshot.by_stage.get("Disposal"), Some(&None));
    assert_eq!(AveragesSnapshot::of(&restored), *snapshot);
}

#[test]
fn padded_stage_names_are_trimmed_on_import() {
    let mut project = import_value(json!({
        "name": "Coating",
        "lifecycle_stages": ["Use ", " Production"],
        "lifecycle_changed": { "Use ": true },
        "selected_factors": { "Economic": ["Capex"] },
        "grid": { "Use ": { "Capex": { "score": 4 } } },
    }))
    .expect("imports");

    assert_eq!(project.lifecycle_stages(), ["Use", "Production"]);
    assert!(project.is_stage_changed("Use"));
    let cell = project.cell("Use", "Capex").expect("cell kept");
    assert_eq!(cell.score.map(Score::value), Some(4));

    let stage = project.add_stage("Use ", None).expect("existing stage");
    assert_eq!(stage.index, 0);
    assert_eq!(project.lifecycle_stages().len(), 2);

    assert!(matches!(
        import_value(json!({ "name": "Coating", "lifecycle_stages": ["Use", "Use "] })),
        Err(ImportError::InvalidField { .. })
    ));
}

#[test]
fn trl_accepts_integral_numbers_only() {
    let project = import_value(json!({ "name": "Panel", "trl": 4.0 })).expect("imports");
    assert_eq!(project.trl(), 4);

    assert!(matches!(
        import_value(json!({ "name": "Panel", "trl": 4.5 })),
        Err(ImportError::Schema(_))
    ));
}

#[test]
fn missing_optional_fields_take_defaults() {
    let project = import_value(json!({
        "schema_version": 2,
        "name": "Coating",
        "lifecycle_stages": ["Production"],
        "selected_factors": { "Economic": ["Capex"] },
    }))
    .expect("imports");

    assert_eq!(project.functional_unit, "");
    assert_eq!(project.description, "");
    assert_eq!(project.trl(), 4);
    assert!(!project.is_stage_changed("Production"));
    let cell = project.cell("Production", "Capex").expect("cell reconciled");
    assert!(!cell.is_known());
    assert_eq!(cell.note, "");
}

#[test]
fn legacy_project_dump_is_unconfirmed_and_keeps_scores() {
    let project = import_value(json!({
        "name": "Legacy foam",
        "trl": 3,
        "lifecycle_stages": ["Synthesis", "Use"],
        "lifecycle_changed": { "Use": true, "Gone": true },
        "selected_factors": {
            "Environmental": ["Climate change"],
            "Social": [],
            "Economic": ["Capex", "Capex"],
        },
        "grid": {
            "Synthesis": { "Climate change": { "score": 2.0, "note": "solvent" } },
            "Use": { "Capex": {} },
            "Stale": { "Capex": { "score": 5 } },
        },
    }))
    .expect("legacy imports");

    assert_eq!(project.scale(), ScaleOrientation::Unconfirmed);
    assert_eq!(project.trl(), 3);
    assert_eq!(project.selection(Dimension::Economic), ["Capex"]);
    assert!(!project.lifecycle_changed().contains_key("Gone"));
    assert!(project.grid().row("Stale").is_none());

    let cell = project.cell("Synthesis", "Climate change").expect("kept");
    assert_eq!(cell.value(), Some(2.0));
    assert_eq!(cell.note, "solvent");
    assert!(!project.cell("Use", "Capex").expect("defaulted").is_known());
    assert!(project.best_stage().is_none());
}

#[test]
fn legacy_results_export_uses_project_key() {
    let project = import_value(json!({
        "project": "Results only",
        "averages": { "by_stage": {}, "by_factor": {}, "overall": null },
    }))
    .expect("imports");

    assert_eq!(project.name(), "Results only");
    assert!(project.lifecycle_stages().is_empty());
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        import_document("{not json"),
        Err(ImportError::Malformed(_))
    ));
    assert!(matches!(
        import_value(json!([1, 2])),
        Err(ImportError::NotAnObject)
    ));
    assert!(matches!(
        import_value(json!({ "name": "  " })),
        Err(ImportError::MissingName)
    ));
    assert!(matches!(
        import_value(json!({ "name": "Panel", "trl": 12 })),
        Err(ImportError::InvalidField { .. })
    ));
    assert!(matches!(
        import_value(json!({ "name": "Panel", "lifecycle_stages": ["A", "A"] })),
        Err(ImportError::InvalidField { .. })
    ));
    assert!(matches!(
        import_value(json!({
            "name": "Panel",
            "lifecycle_stages": ["A"],
            "grid": { "A": { "Capex": { "score": 2.5 } } },
        })),
        Err(ImportError::Schema(_))
    ));
    assert!(matches!(
        import_value(json!({
            "name": "Panel",
            "grid": { "A": { "Capex": { "score": 9 } } },
        })),
        Err(ImportError::Schema(_))
    ));
}

#[test]
fn document_field_names_are_stable() {
    let project = project_with_stages(&["Production"]);
    let value = serde_json::to_value(export_document(&project)).expect("serializes");

    for field in [
        "schema_version",
        "name",
        "description",
        "trl",
        "scoping_notes",
        "core_function",
        "functional_unit",
        "lifecycle_stages",
        "lifecycle_changed",
        "selected_factors",
        "grid",
        "scale",
        "averages",
    ] {
        assert!(value.get(field).is_some(), "missing field {field}");
    }
    assert_eq!(value["grid"]["Production"]["Capex"], json!({ "score": null, "note": "" }));
    assert_eq!(value["selected_factors"]["Economic"][0], json!("Production cost"));
}

#[test]
fn parsed_documents_can_be_inspected_before_conversion() {
    let raw = json!({ "name": "Panel", "schema_version": 2, "scale": "lower_is_better" });
    let document = ProjectDocument::from_value(raw).expect("parses");

    assert_eq!(document.scale, ScaleOrientation::LowerIsBetter);
    assert_eq!(document.into_project().scale(), ScaleOrientation::LowerIsBetter);
}

#[test]
fn file_names_replace_spaces() {
    let project = Project::new("My Project", "");

    assert_eq!(export_file_name(&project, DocumentKind::Project), "My_Project.json");
    assert_eq!(
        export_file_name(&project, DocumentKind::Results),
        "My_Project_results.json"
    );
}
