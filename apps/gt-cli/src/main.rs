use clap::{ArgAction, Parser, Subcommand};
use gt_app::{
    AppError, AppResult, GenerateMode, GenerateProgressEvent, GenerateRequest, GenerateStage,
    MergeRequest, OutputTarget, ReadRequest, generate_service, merge_service, read_service,
};
use gt_gas::{AnalyticEngine, FieldRange, FieldSetSpec, MAX_RANGE_POINTS, Mixture};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "gas-cli")]
#[command(about = "Gas transport tables for gaseous detectors", long_about = None)]
struct Cli {
    /// Log at debug level, including per-point engine output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the report of an existing gas file
    Read {
        /// Gas file to read
        path: PathBuf,
        /// Write the report to this file instead of stdout
        #[arg(long)]
        json: Option<PathBuf>,
        /// Report at these fields [V/cm] instead of the stored grid
        #[arg(long, num_args = 1..)]
        efield: Vec<f64>,
    },
    /// Generate a gas file
    Generate {
        /// Mixture tokens, e.g. `Ar 97.7 C4H10` (one fraction may be omitted)
        #[arg(long, num_args = 1.., required = true)]
        components: Vec<String>,
        /// Pressure [bar]
        #[arg(long, default_value_t = 1.0)]
        pressure: f64,
        /// Temperature [°C]
        #[arg(long, default_value_t = 20.0)]
        temperature: f64,
        /// Explicit field values [V/cm]
        #[arg(long, num_args = 1..)]
        efield: Vec<f64>,
        /// Linear field range: START END N
        #[arg(long, num_args = 3, value_names = ["START", "END", "N"], action = ArgAction::Append)]
        efield_lin: Vec<f64>,
        /// Logarithmic field range: START END N
        #[arg(long, num_args = 3, value_names = ["START", "END", "N"], action = ArgAction::Append)]
        efield_log: Vec<f64>,
        /// Number of collisions handed to the engine
        #[arg(long, default_value_t = generate_service::DEFAULT_COLLISIONS)]
        collisions: u32,
        /// Output gas file
        #[arg(short, long, conflicts_with = "dir")]
        output: Option<PathBuf>,
        /// Output directory for an automatically named gas file
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Also write the JSON report next to the gas file
        #[arg(long)]
        json: bool,
        /// Compute all fields at once instead of point by point
        #[arg(long)]
        batch: bool,
        /// Bundle the outputs into a .tar.gz
        #[arg(long)]
        tar: bool,
    },
    /// Merge gas files; on shared fields the first listed wins
    Merge {
        /// Gas files to merge
        #[arg(required = true, num_args = merge_service::MIN_INPUTS..)]
        inputs: Vec<PathBuf>,
        /// Merged gas file
        #[arg(short, long)]
        output: PathBuf,
        /// Later files overwrite shared fields
        #[arg(long)]
        replace: bool,
        /// Also write the JSON report next to the merged file
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics on stderr, reports on stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let verbose = cli.verbose;
    match cli.command {
        Commands::Read { path, json, efield } => cmd_read(path, json, efield),
        Commands::Generate {
            components,
            pressure,
            temperature,
            efield,
            efield_lin,
            efield_log,
            collisions,
            output,
            dir,
            json,
            batch,
            tar,
        } => {
            let fields = field_spec(efield, &efield_lin, &efield_log)?;
            let target = match (output, dir) {
                (Some(path), _) => OutputTarget::File(path),
                (None, Some(dir)) => OutputTarget::Directory(dir),
                (None, None) => OutputTarget::Directory(PathBuf::from(".")),
            };
            let request = GenerateRequest {
                mixture: Mixture::from_tokens(&components)?,
                pressure_bar: pressure,
                temperature_celsius: temperature,
                fields: fields.build()?,
                collisions,
                output: target,
                mode: if batch {
                    GenerateMode::Batch
                } else {
                    GenerateMode::Incremental
                },
                write_report: json,
                package: tar,
                verbose,
            };
            cmd_generate(&request)
        }
        Commands::Merge {
            inputs,
            output,
            replace,
            json,
        } => cmd_merge(MergeRequest {
            inputs,
            output,
            replace,
            write_report: json,
        }),
    }
}

fn field_spec(explicit: Vec<f64>, lin: &[f64], log: &[f64]) -> AppResult<FieldSetSpec> {
    let mut spec = FieldSetSpec::explicit(explicit);
    for chunk in lin.chunks_exact(3) {
        spec = spec.with_range(FieldRange::linear(chunk[0], chunk[1], point_count(chunk[2])?));
    }
    for chunk in log.chunks_exact(3) {
        spec = spec.with_range(FieldRange::logarithmic(
            chunk[0],
            chunk[1],
            point_count(chunk[2])?,
        ));
    }
    Ok(spec)
}

fn point_count(n: f64) -> AppResult<usize> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_RANGE_POINTS as f64 {
        Ok(n as usize)
    } else {
        Err(AppError::InvalidInput(format!(
            "number of field points must be a whole number up to {MAX_RANGE_POINTS}, got {n}"
        )))
    }
}

fn cmd_read(path: PathBuf, json: Option<PathBuf>, efield: Vec<f64>) -> AppResult<()> {
    let request = ReadRequest {
        path,
        fields: efield,
        json_output: json,
    };
    let report = read_service::read_report(&request)?;
    match &request.json_output {
        Some(path) => println!("✓ Report written: {}", path.display()),
        None => println!("{}", report.to_json_pretty()?),
    }
    Ok(())
}

fn cmd_generate(request: &GenerateRequest) -> AppResult<()> {
    println!(
        "Generating {} at {} bar, {} °C: {}",
        request.mixture, request.pressure_bar, request.temperature_celsius, request.fields
    );

    let engine = AnalyticEngine::new();
    let response = generate_service::generate_with_progress(
        request,
        &engine,
        Some(&mut |event| render_cli_progress(&event)),
    )?;
    clear_progress_line();

    println!("✓ Gas file written: {}", response.output_path.display());
    if response.resumed > 0 {
        println!(
            "  Resumed: {} fields already present, {} computed",
            response.resumed, response.computed
        );
    }
    if let Some(path) = &response.report_path {
        println!("✓ Report written: {}", path.display());
    }
    if let Some(path) = &response.archive_path {
        println!("✓ Archive written: {}", path.display());
    }
    Ok(())
}

fn cmd_merge(request: MergeRequest) -> AppResult<()> {
    let response = merge_service::merge_files(&request)?;
    for (path, summary) in &response.summaries {
        if summary.skipped {
            println!("  {} (empty, skipped)", path.display());
        } else {
            println!(
                "  {}: {} added, {} replaced, {} kept",
                path.display(),
                summary.added,
                summary.replaced,
                summary.kept
            );
        }
    }
    println!(
        "✓ Merged {} field points into {}",
        response.table.len(),
        request.output.display()
    );
    if let Some((path, _)) = &response.report {
        println!("✓ Report written: {}", path.display());
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(80));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &GenerateProgressEvent) {
    match (&event.stage, &event.point) {
        (GenerateStage::ComputingPoint, Some(point)) => {
            let width = 28usize;
            let done = point.index as f64 / point.total.max(1) as f64;
            let filled = ((done * width as f64).round() as usize).min(width);
            print!(
                "\r[{}{}] {:>4}/{:<4} E = {} V/cm  elapsed={:.1}s",
                "#".repeat(filled),
                "-".repeat(width - filled),
                point.index + 1,
                point.total,
                point.electric_field,
                event.elapsed_wall_s
            );
            let _ = io::stdout().flush();
        }
        (stage, _) => {
            if let Some(message) = &event.message {
                clear_progress_line();
                println!("  [{}] {}", stage.label(), message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_with_ranges() {
        let cli = Cli::try_parse_from([
            "gas-cli",
            "generate",
            "--components",
            "Ar",
            "97.7",
            "C4H10",
            "--efield-lin",
            "0",
            "1000",
            "11",
            "--efield-log",
            "1000",
            "10000",
            "3",
            "--batch",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                components,
                efield_lin,
                efield_log,
                batch,
                pressure,
                collisions,
                ..
            } => {
                assert_eq!(components, vec!["Ar", "97.7", "C4H10"]);
                assert_eq!(efield_lin, vec![0.0, 1000.0, 11.0]);
                assert_eq!(efield_log, vec![1000.0, 10000.0, 3.0]);
                assert!(batch);
                assert_eq!(pressure, 1.0);
                assert_eq!(collisions, 10);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn output_and_dir_conflict() {
        let result = Cli::try_parse_from([
            "gas-cli",
            "generate",
            "--components",
            "Ar",
            "--efield",
            "100",
            "--output",
            "a.gas",
            "--dir",
            "out",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn merge_requires_output() {
        assert!(Cli::try_parse_from(["gas-cli", "merge", "a.gas", "b.gas"]).is_err());
        assert!(Cli::try_parse_from(["gas-cli", "merge", "a.gas", "-o", "c.gas"]).is_err());
        assert!(Cli::try_parse_from(["gas-cli", "merge", "a.gas", "b.gas", "-o", "c.gas"]).is_ok());
    }

    #[test]
    fn field_spec_from_ranges() {
        let spec = field_spec(vec![50.0], &[0.0, 100.0, 3.0], &[]).unwrap();
        let fields = spec.build().unwrap();
        assert_eq!(fields.values(), &[0.0, 50.0, 100.0]);
        assert!(point_count(2.5).is_err());
        assert!(point_count(1e20).is_err());
        assert_eq!(point_count(11.0).unwrap(), 11);
    }
}
