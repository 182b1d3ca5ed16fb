use crate::assessment::project::Project;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct GridRow<'a> {
    stage: &'a str,
    section: &'a str,
    expected_to_change: bool,
    dimension: &'static str,
    factor: &'a str,
    score: Option<u8>,
    note: &'a str,
}

/// Writes one CSV row per cell, stages in life cycle order and factors in selection order.
pub fn write_grid_csv<W: Write>(project: &Project, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let factors = project.all_selected_factors();

    for stage in project.lifecycle_stages() {
        for factor in &factors {
            let Some(cell) = project.cell(stage, factor) else {
                continue;
            };
            csv_writer.serialize(GridRow {
                stage,
                section: project.stage_section(stage).unwrap_or_default(),
                expected_to_change: project.is_stage_changed(stage),
                dimension: project
                    .dimension_of(factor)
                    .map(|dimension| dimension.label())
                    .unwrap_or_default(),
                factor,
                score: cell.score.map(|score| score.value()),
                note: &cell.note,
            })?;
        }
    }

    csv_writer.flush()?;
    Ok(())
}
