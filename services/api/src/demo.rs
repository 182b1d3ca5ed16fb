use crate::infra::read_document;
use chrono::Local;
use clap::Args;
use essa::assessment::catalog::{self, TRL_TABLE};
use essa::assessment::{
    export_document, export_file_name, import_document, write_grid_csv, AssessmentSummary,
    Dimension, DocumentKind, Project, ScaleOrientation,
};
use essa::error::AppError;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Project document (JSON) to summarise
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Write the score grid as CSV to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Confirm the scale orientation of a legacy document before ranking stages
    #[arg(long, value_parser = crate::infra::parse_scale)]
    pub(crate) scale: Option<ScaleOrientation>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Only list the factors of one dimension
    #[arg(long, value_parser = crate::infra::parse_dimension)]
    pub(crate) dimension: Option<Dimension>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Write the sample project document to this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    /// Score orientation used for the sample project
    #[arg(long, value_parser = crate::infra::parse_scale)]
    pub(crate) scale: Option<ScaleOrientation>,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        input,
        csv,
        scale,
        json,
    } = args;

    let raw = read_document(&input)?;
    let mut project = import_document(&raw)?;
    if let Some(scale) = scale {
        project.set_scale(scale);
    }

    if let Some(path) = csv {
        let file = File::create(&path)?;
        write_grid_csv(&project, file)?;
        tracing::info!(path = %path.display(), "grid exported");
    }

    let summary = project.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        render_summary(&project, &summary);
    }
    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    println!("Technology readiness levels");
    for level in TRL_TABLE.iter() {
        println!(
            "- TRL {}: {} (engage: {})",
            level.level,
            level.definition,
            level.actors.join(", ")
        );
    }

    let dimensions = match args.dimension {
        Some(dimension) => vec![dimension],
        None => Dimension::ordered().to_vec(),
    };
    for dimension in dimensions {
        println!("\n{dimension} factors (* = selected by default)");
        for spec in catalog::factors(dimension) {
            let marker = if spec.default_selected { "*" } else { " " };
            let unit = if spec.unit.is_empty() {
                String::new()
            } else {
                format!(" [{}]", spec.unit)
            };
            println!("  {marker} {}{unit}: {}", spec.name, spec.explanation);
        }
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let project = demo_project(args.scale.unwrap_or_default())?;

    println!("Sustainability assessment demo");
    println!(
        "- {} (TRL {}): {}",
        project.name(),
        project.trl(),
        project.description
    );
    println!("- Functional unit: {}", project.functional_unit);
    render_summary(&project, &project.summary());

    if let Some(dir) = args.export_dir {
        let path = dir.join(export_file_name(&project, DocumentKind::Project));
        let document = export_document(&project).to_json_pretty()?;
        std::fs::write(&path, document)?;
        println!("\nProject document written to {}", path.display());
    }
    Ok(())
}

/// Sample bio-based insulation assessment scored against the default factors.
pub(crate) fn demo_project(scale: ScaleOrientation) -> Result<Project, AppError> {
    let mut project = Project::new(
        "Mycelium insulation board",
        "Insulation panels grown from mycelium on agricultural residues",
    );
    project.core_function = "Thermal insulation of building envelopes".to_string();
    project.functional_unit = "1 m2 of wall insulation, R = 3.0 m2K/W, 50 years".to_string();
    project.scoping_notes = "Benchmarked against expanded polystyrene boards".to_string();
    project.set_trl(3)?;
    project.set_scale(scale);
    project.select_default_factors();

    let changed = [
        "Raw material extraction",
        "Material synthesis / processing",
        "End-of-life (reuse/recycling/disposal)",
    ];
    for stage in changed {
        project.set_stage_changed(stage, true)?;
    }

    let stages = project.lifecycle_stages().to_vec();
    let factors = project.all_selected_factors();
    for (stage_index, stage) in stages.iter().enumerate() {
        if !project.is_stage_changed(stage) {
            continue;
        }
        for (factor_index, factor) in factors.iter().enumerate() {
            let score = demo_score(scale, stage_index, factor_index);
            project.set_score(stage, factor, score)?;
        }
    }
    project.set_note(
        &stages[0],
        &factors[0],
        "Residues replace fossil feedstock",
    )?;

    Ok(project)
}

/// Mostly favourable judgments with a few gaps, expressed on the requested scale.
fn demo_score(scale: ScaleOrientation, stage: usize, factor: usize) -> Option<i64> {
    if (stage + factor) % 7 == 6 {
        return None;
    }
    let favourable = 3 + ((stage * 3 + factor) % 3) as i64;
    match scale {
        ScaleOrientation::LowerIsBetter => Some(6 - favourable),
        ScaleOrientation::HigherIsBetter | ScaleOrientation::Unconfirmed => Some(favourable),
    }
}

fn format_average(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}

pub(crate) fn render_summary(project: &Project, summary: &AssessmentSummary) {
    println!(
        "\nResults for {} ({}), generated {}",
        summary.project,
        summary.scale.label(),
        Local::now().format("%Y-%m-%d %H:%M")
    );
    if summary.scale == ScaleOrientation::Unconfirmed {
        println!("  Scale orientation unconfirmed: pass --scale to rank stages.");
    }
    println!(
        "- Scored {}/{} cells | overall {} ({})",
        summary.progress.known,
        summary.progress.total,
        format_average(summary.overall),
        summary.overall_label
    );

    println!("Stages:");
    for entry in &summary.stages {
        let changed = if entry.expected_to_change { " [changes]" } else { "" };
        println!(
            "  - {}{changed}: {} ({})",
            entry.stage,
            format_average(entry.average),
            entry.label
        );
    }

    println!("Dimensions:");
    for entry in &summary.dimensions {
        println!(
            "  - {}: {}",
            entry.dimension,
            format_average(entry.average)
        );
    }

    println!("Factors:");
    for entry in &summary.factors {
        println!(
            "  - {}: {:.2} ({})",
            entry.factor, entry.average, entry.label
        );
    }

    if let Some(best) = &summary.best_stage {
        println!("Best stage: {} at {:.2} ({})", best.stage, best.average, best.label);
    }
    if let Some(worst) = &summary.worst_stage {
        println!(
            "Worst stage: {} at {:.2} ({})",
            worst.stage, worst.average, worst.label
        );
        for entry in &summary.worst_stage_breakdown {
            let score = entry
                .score
                .map(|score| score.to_string())
                .unwrap_or_else(|| "?".to_string());
            let dimension = project
                .dimension_of(&entry.factor)
                .map(Dimension::label)
                .unwrap_or("-");
            if entry.note.is_empty() {
                println!("    {score} {} [{dimension}]", entry.factor);
            } else {
                println!("    {score} {} [{dimension}]: {}", entry.factor, entry.note);
            }
        }
    }
}
