use crate::core::io::mmcif::MmcifFile;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureReader;
use crate::core::models::structure::StructuralModel;
use crate::engine::config::PipelineConfig;
use crate::engine::error::RecordError;
use crate::engine::layout::OutputLayout;
use crate::engine::normalizer::{self, SINGLE_PLACEHOLDER};
use crate::engine::outcome::{BatchReport, Outcome, Stage};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::resolver::{self, LigandSelection};
use crate::engine::retrieval::{CoordinateFormat, Resource, Retriever};
use crate::engine::{rewriter, validator};
use crate::workflows::cleanup;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Cannot prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

type StageResult<T> = Result<T, (Stage, RecordError)>;

trait AtStage<T> {
    fn at(self, stage: Stage) -> StageResult<T>;
}

impl<T, E: Into<RecordError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> StageResult<T> {
        self.map_err(|e| (stage, e.into()))
    }
}

/// Processes every identifier in order and classifies each record.
///
/// A failing record never stops the batch: its error is logged and recorded as
/// [`Outcome::Failed`]. Repeated identifiers are processed once and reported as
/// [`Outcome::Skipped`] afterwards.
///
/// # Errors
///
/// Only fails when the output directory cannot be created.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run<R: Retriever + ?Sized>(
    identifiers: &[String],
    config: &PipelineConfig,
    retriever: &R,
    reporter: &ProgressReporter,
) -> Result<BatchReport, BatchError> {
    fs::create_dir_all(&config.output_dir).map_err(|source| BatchError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;
    let layout = OutputLayout::new(&config.output_dir);

    reporter.report(Progress::BatchStart {
        total: identifiers.len() as u64,
    });
    info!(
        "Processing {} record(s) into {}",
        identifiers.len(),
        config.output_dir.display()
    );

    let mut seen = HashSet::new();
    let mut report = BatchReport::default();

    for id in identifiers {
        reporter.report(Progress::RecordStart { id: id.clone() });

        let outcome = if !seen.insert(id.as_str()) {
            info!("Skipping repeated identifier {}", id);
            Outcome::Skipped {
                reason: "duplicate identifier".to_string(),
            }
        } else {
            match process_record(id, config, &layout, retriever) {
                Ok(outcome) => outcome,
                Err((stage, error)) => {
                    error!("Record {} failed during {}: {}", id, stage, error);
                    Outcome::Failed { stage, error }
                }
            }
        };

        reporter.report(Progress::RecordFinish {
            id: id.clone(),
            kind: outcome.kind(),
            detail: outcome.detail(),
        });
        report.records.push((id.clone(), outcome));
    }

    if config.purge_intermediates {
        if let Err(e) = cleanup::purge_intermediates(&config.output_dir) {
            warn!("Could not remove intermediate files: {}", e);
        }
    }

    reporter.report(Progress::BatchFinish);
    info!("Batch complete: {}", report.summary());
    Ok(report)
}

#[instrument(skip_all, fields(id = %id))]
fn process_record<R: Retriever + ?Sized>(
    id: &str,
    config: &PipelineConfig,
    layout: &OutputLayout,
    retriever: &R,
) -> StageResult<Outcome> {
    info!("Retrieving coordinates");
    let mut model = load_coordinates(id, layout, retriever).at(Stage::Retrieval)?;

    if config.fetch_reflections {
        let path = layout.reflections(id);
        match retriever.fetch(id, &Resource::Reflections, &path) {
            Ok(()) => debug!("Reflection data saved to {}", path.display()),
            Err(e) => warn!("Reflection data unavailable: {}", e),
        }
    }

    info!("Resolving ligand codes");
    let selection = resolver::resolve(&model, &config.ignore_codes).at(Stage::Resolution)?;

    info!("Normalizing residues");
    let code_map = normalizer::normalize_to_path(
        &mut model,
        &selection,
        &config.removal_codes,
        &layout.normalized_coordinates(id),
    )
    .at(Stage::Normalization)?;

    for code in selection.codes() {
        let dest = layout.raw_definition(id, code);
        retriever
            .fetch(id, &Resource::LigandDefinition(code.clone()), &dest)
            .at(Stage::Retrieval)?;
        debug!("Ligand definition {} saved to {}", code, dest.display());
    }

    info!("Rewriting ligand definitions");
    let definition = layout.definition(id);
    match &selection {
        LigandSelection::Single(code) => {
            rewriter::rewrite_definition_file(
                &layout.raw_definition(id, code),
                code,
                SINGLE_PLACEHOLDER,
                &definition,
            )
            .at(Stage::Rewriting)?;

            info!("Validating ligand topology");
            let report = validator::validate(&definition, &model).at(Stage::Validation)?;
            if report.is_match() {
                Ok(Outcome::Success)
            } else {
                Ok(Outcome::Mismatch {
                    repaired: report.repaired,
                })
            }
        }
        LigandSelection::Multi(_) => {
            let mut parts = Vec::with_capacity(code_map.len());
            for (code, placeholder) in code_map.iter() {
                let dest = layout.ligand_definition(id, placeholder);
                rewriter::rewrite_definition_file(
                    &layout.raw_definition(id, code),
                    code,
                    placeholder,
                    &dest,
                )
                .at(Stage::Rewriting)?;
                parts.push((placeholder.to_string(), dest));
            }
            rewriter::merge_definitions(&parts, &definition).at(Stage::Rewriting)?;
            Ok(Outcome::SuccessMultiLigand { code_map })
        }
    }
}

/// Fetches and parses the PDB coordinates, falling back to mmCIF when that fails.
fn load_coordinates<R: Retriever + ?Sized>(
    id: &str,
    layout: &OutputLayout,
    retriever: &R,
) -> Result<StructuralModel, RecordError> {
    let pdb_path = layout.raw_coordinates(id, CoordinateFormat::Pdb);
    let primary = retriever
        .fetch(id, &Resource::Coordinates(CoordinateFormat::Pdb), &pdb_path)
        .map_err(RecordError::from)
        .and_then(|()| PdbFile::read_from_path(&pdb_path).map_err(RecordError::from));
    match primary {
        Ok(model) => return Ok(model),
        Err(e) => warn!("PDB coordinates unusable ({}), trying mmCIF", e),
    }

    let cif_path = layout.raw_coordinates(id, CoordinateFormat::Mmcif);
    retriever.fetch(id, &Resource::Coordinates(CoordinateFormat::Mmcif), &cif_path)?;
    let model = MmcifFile::read_from_path(&cif_path)?;
    debug!("Read coordinates from {}", cif_path.display());
    Ok(model)
}
