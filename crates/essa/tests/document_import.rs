use essa::assessment::{
    export_document, import_document, write_grid_csv, Dimension, ImportConflict, ImportError,
    ScaleOrientation, Workspace,
};

const LEGACY_INSULATION: &str = include_str!("fixtures/legacy_insulation.json");

#[test]
fn legacy_document_imports_without_reinterpreting_scores() {
    let project = import_document(LEGACY_INSULATION).expect("legacy document imports");

    assert_eq!(project.name(), "Mycelium insulation board");
    assert_eq!(project.trl(), 3);
    assert_eq!(project.scale(), ScaleOrientation::Unconfirmed);
    assert_eq!(project.lifecycle_stages().len(), 5);
    assert!(project.factor_selection_complete());
    assert!(project.ready_for_results());

    let growth = project
        .cell("Growth", "Water use")
        .expect("growth cell present");
    assert_eq!(growth.value(), Some(4.0));
    assert_eq!(growth.note, "humidity control");

    let unassessed = project
        .cell("Substrate preparation", "Human health")
        .expect("cell present");
    assert!(!unassessed.is_known());
    assert_eq!(unassessed.note, "not assessed yet");

    assert_eq!(project.grid().cell_count(), 5 * 9);
}

#[test]
fn legacy_aggregates_are_computed_but_not_ranked() {
    let project = import_document(LEGACY_INSULATION).expect("legacy document imports");

    let stages = project.average_by_stage();
    let use_phase = stages
        .iter()
        .find(|entry| entry.stage == "Use phase")
        .expect("use phase listed");
    assert_eq!(use_phase.average, None);

    let end_of_life = stages
        .iter()
        .find(|entry| entry.stage == "End-of-life")
        .expect("end of life listed");
    assert_eq!(end_of_life.average, Some(1.0));

    assert!(project.best_stage().is_none());
    assert!(project.worst_stage().is_none());
    assert_eq!(
        project.highest_stage().expect("highest stage").stage,
        "Drying & pressing"
    );

    let summary = project.summary();
    assert!(summary.stages.iter().all(|entry| entry.label == "n/a"));
}

#[test]
fn confirming_orientation_enables_rankings() {
    let mut project = import_document(LEGACY_INSULATION).expect("legacy document imports");

    project.set_scale(ScaleOrientation::LowerIsBetter);

    assert_eq!(project.best_stage().expect("best").stage, "End-of-life");
    assert_eq!(project.worst_stage().expect("worst").stage, "Drying & pressing");

    let reexported = export_document(&project);
    assert_eq!(reexported.scale, ScaleOrientation::LowerIsBetter);
    let raw = reexported.to_json_pretty().expect("serializes");
    let reimported = import_document(&raw).expect("current document imports");
    assert_eq!(reimported.scale(), ScaleOrientation::LowerIsBetter);
    assert_eq!(reimported.grid(), project.grid());
}

#[test]
fn workspace_import_activates_the_project() {
    let mut workspace = Workspace::default();
    workspace.create("Other", "").expect("created");

    workspace
        .import(LEGACY_INSULATION, ImportConflict::Reject)
        .expect("imports");

    assert_eq!(workspace.active_name(), Some("Mycelium insulation board"));
    assert_eq!(
        workspace
            .active()
            .map(|project| project.selection(Dimension::Social).len()),
        Some(3)
    );
}

#[test]
fn truncated_document_is_malformed() {
    let truncated = &LEGACY_INSULATION[..LEGACY_INSULATION.len() / 2];

    assert!(matches!(
        import_document(truncated),
        Err(ImportError::Malformed(_))
    ));
}

#[test]
fn grid_csv_lists_every_cell() {
    let project = import_document(LEGACY_INSULATION).expect("legacy document imports");
    let mut buffer = Vec::new();

    write_grid_csv(&project, &mut buffer).expect("csv written");

    let text = String::from_utf8(buffer).expect("utf8");
    assert_eq!(text.lines().count(), 1 + 5 * 9);
    assert!(text.contains("Growth,,true,Environmental,Water use,4,humidity control"));
}
