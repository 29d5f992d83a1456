//! Gas table generation service.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gt_gas::file::is_placeholder;
use gt_gas::{
    Environment, FieldSet, Mixture, TransportEngine, TransportTable, build_report,
    output_file_name,
};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::package;
use crate::progress::{GenerateProgressEvent, GenerateStage, PointProgress};

/// Default number of collisions handed to the engine.
pub const DEFAULT_COLLISIONS: u32 = 10;

/// How the field set is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateMode {
    /// One engine call for the whole set, written once at the end.
    Batch,
    /// One field at a time in spread order, rewriting the output after every
    /// point. An interrupted run resumes from its output file.
    #[default]
    Incremental,
}

/// Where the gas file goes.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    File(PathBuf),
    /// Directory for a name derived from the generation parameters.
    Directory(PathBuf),
}

/// Request to generate a gas table.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub mixture: Mixture,
    pub pressure_bar: f64,
    pub temperature_celsius: f64,
    pub fields: FieldSet,
    pub collisions: u32,
    pub output: OutputTarget,
    pub mode: GenerateMode,
    /// Also write the JSON report next to the gas file.
    pub write_report: bool,
    /// Bundle outputs into `<stem>.tar.gz`.
    pub package: bool,
    pub verbose: bool,
}

/// Response from a generation.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub archive_path: Option<PathBuf>,
    /// Fields computed by this call.
    pub computed: usize,
    /// Fields found already present in the output file.
    pub resumed: usize,
    pub table: TransportTable,
}

struct Progress<'a> {
    cb: Option<&'a mut dyn FnMut(GenerateProgressEvent)>,
    started: Instant,
    output: PathBuf,
}

impl Progress<'_> {
    fn emit(
        &mut self,
        stage: GenerateStage,
        message: Option<String>,
        point: Option<PointProgress>,
    ) {
        if let Some(cb) = self.cb.as_deref_mut() {
            let mut event = GenerateProgressEvent::stage(
                stage,
                self.started.elapsed().as_secs_f64(),
                self.output.clone(),
                message,
            );
            event.point = point;
            cb(event);
        }
    }
}

/// Resolve the gas file path, creating the parent directory if needed.
pub fn resolve_output_path(request: &GenerateRequest) -> AppResult<PathBuf> {
    let path = match &request.output {
        OutputTarget::File(path) => path.clone(),
        OutputTarget::Directory(dir) => {
            let environment =
                Environment::from_bar_celsius(request.pressure_bar, request.temperature_celsius);
            dir.join(output_file_name(
                &request.mixture,
                &environment,
                request.collisions,
                &request.fields,
            ))
        }
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| AppError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(path)
}

fn validate(request: &GenerateRequest) -> AppResult<()> {
    if !request.pressure_bar.is_finite() || request.pressure_bar <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "pressure must be positive, got {} bar",
            request.pressure_bar
        )));
    }
    if !request.temperature_celsius.is_finite() || request.temperature_celsius <= -273.15 {
        return Err(AppError::InvalidInput(format!(
            "temperature must be above absolute zero, got {} °C",
            request.temperature_celsius
        )));
    }
    if request.collisions == 0 {
        return Err(AppError::InvalidInput(
            "number of collisions must be at least 1".to_string(),
        ));
    }
    if request.fields.is_empty() {
        return Err(AppError::InvalidInput(
            "no electric field values requested".to_string(),
        ));
    }
    Ok(())
}

fn new_table(request: &GenerateRequest) -> TransportTable {
    let mut table = TransportTable::from_mixture(request.mixture.clone());
    table.set_pressure(request.pressure_bar);
    table.set_temperature(request.temperature_celsius);
    table
}

/// Generate a gas table.
pub fn generate(
    request: &GenerateRequest,
    engine: &dyn TransportEngine,
) -> AppResult<GenerateResponse> {
    generate_with_progress(request, engine, None)
}

/// Generate a gas table and stream progress events.
pub fn generate_with_progress(
    request: &GenerateRequest,
    engine: &dyn TransportEngine,
    progress_cb: Option<&mut dyn FnMut(GenerateProgressEvent)>,
) -> AppResult<GenerateResponse> {
    validate(request)?;
    let output_path = resolve_output_path(request)?;
    let mut progress = Progress {
        cb: progress_cb,
        started: Instant::now(),
        output: output_path.clone(),
    };

    info!(
        gas = %request.mixture,
        pressure_bar = request.pressure_bar,
        temperature_celsius = request.temperature_celsius,
        fields = %request.fields,
        collisions = request.collisions,
        output = %output_path.display(),
        "generating gas file"
    );
    progress.emit(GenerateStage::PreparingOutput, None, None);

    let (table, computed, resumed) = match request.mode {
        GenerateMode::Batch => {
            let mut table = new_table(request);
            table.generate(
                engine,
                request.fields.values(),
                request.collisions,
                request.verbose,
            )?;
            progress.emit(GenerateStage::WritingTable, None, None);
            table.write(&output_path)?;
            (table, request.fields.len(), 0)
        }
        GenerateMode::Incremental => {
            run_incremental(request, engine, &output_path, &mut progress)?
        }
    };

    let report_path = if request.write_report {
        let path = output_path.with_extension("json");
        progress.emit(GenerateStage::WritingReport, None, None);
        build_report(&table, &[]).write_json(&path)?;
        Some(path)
    } else {
        None
    };

    let archive_path = if request.package {
        let archive = output_path.with_extension("tar.gz");
        progress.emit(GenerateStage::Packaging, None, None);
        let mut files: Vec<&Path> = vec![output_path.as_path()];
        if let Some(report) = &report_path {
            files.push(report.as_path());
        }
        package::create_tarball(&archive, &files)?;
        Some(archive)
    } else {
        None
    };

    progress.emit(
        GenerateStage::Completed,
        Some(format!("{} field points in table", table.len())),
        None,
    );
    info!(
        computed,
        resumed,
        output = %output_path.display(),
        "gas file complete"
    );

    Ok(GenerateResponse {
        output_path,
        report_path,
        archive_path,
        computed,
        resumed,
        table,
    })
}

fn run_incremental(
    request: &GenerateRequest,
    engine: &dyn TransportEngine,
    output_path: &Path,
    progress: &mut Progress<'_>,
) -> AppResult<(TransportTable, usize, usize)> {
    let mut output = new_table(request);

    if output_path.exists() {
        if is_placeholder(output_path)? {
            warn!(
                path = %output_path.display(),
                "output file is empty, starting from scratch"
            );
        } else {
            output.merge_file(output_path, false)?;
        }
    } else {
        // reserve the name before the first, possibly long, computation
        fs::write(output_path, "").map_err(|source| AppError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;
    }

    let already = output.field_grid();
    let pending: Vec<f64> = request
        .fields
        .spread_order()
        .into_iter()
        .filter(|&e| !request.fields.is_covered(e, &already))
        .collect();
    let resumed = request.fields.len() - pending.len();
    if resumed > 0 {
        info!(resumed, remaining = pending.len(), "resuming from existing output");
        progress.emit(
            GenerateStage::Resuming {
                already_computed: resumed,
            },
            Some(format!(
                "{resumed} of {} fields already in {}",
                request.fields.len(),
                output_path.display()
            )),
            None,
        );
    }

    let total = pending.len();
    for (index, &electric_field) in pending.iter().enumerate() {
        progress.emit(
            GenerateStage::ComputingPoint,
            None,
            Some(PointProgress {
                index,
                total,
                electric_field,
            }),
        );
        info!(
            point = index + 1,
            total,
            electric_field,
            "computing field point"
        );

        let mut point = new_table(request);
        point.generate(engine, &[electric_field], request.collisions, request.verbose)?;
        output.merge(&point, false)?;
        output.write(output_path)?;
    }

    if total == 0 {
        info!("all requested fields already present");
    }

    Ok((output, total, resumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gt_gas::{AnalyticEngine, FieldSetSpec};

    fn request(output: OutputTarget) -> GenerateRequest {
        GenerateRequest {
            mixture: Mixture::from_tokens(&["Ar", "90", "CO2"]).unwrap(),
            pressure_bar: 1.0,
            temperature_celsius: 20.0,
            fields: FieldSetSpec::explicit(vec![100.0, 200.0]).build().unwrap(),
            collisions: DEFAULT_COLLISIONS,
            output,
            mode: GenerateMode::Batch,
            write_report: false,
            package: false,
            verbose: false,
        }
    }

    #[test]
    fn directory_target_uses_derived_name() {
        let dir = std::env::temp_dir().join(format!("gt_app_resolve_{}", std::process::id()));
        let path = resolve_output_path(&request(OutputTarget::Directory(dir.clone()))).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Ar_90-CO2_10-T20C-P1bar-nColl10-E100t200Vcm-nE2.gas")
        );
        assert!(dir.exists());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_bad_environment() {
        let mut req = request(OutputTarget::File(PathBuf::from("unused.gas")));
        req.pressure_bar = 0.0;
        let err = generate(&req, &AnalyticEngine::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let mut req = request(OutputTarget::File(PathBuf::from("unused.gas")));
        req.collisions = 0;
        assert!(generate(&req, &AnalyticEngine::new()).is_err());
    }
}
