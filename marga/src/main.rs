//! Marga - trajectory cleaning from the command line
//!
//! Reads a JSON array of trajectory points, flags anomalies and (unless
//! `--detect-only`) corrects them, then writes the annotated array.
//!
//! # Usage
//!
//! ```bash
//! # GPS tier with default methods, result on stdout
//! marga --input track.json
//!
//! # Advanced tier, explicit methods, Kalman correction
//! marga --input track.json --output cleaned.json --detector advanced \
//!     --methods z_score,speed,time_gap --fix kalman
//!
//! # Detection only, with a config file
//! marga --input track.json --config configs/marga.toml --detect-only
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;

use marga::{
    AnomalySummary, CorrectionMethod, DetectionMethod, Detector, DetectorConfig, DetectorKind,
    Trajectory, TrajectoryPoint, create_detector,
};

#[derive(Parser)]
#[command(name = "marga")]
#[command(about = "Detect and correct anomalies in GPS trajectories")]
struct Args {
    /// Input JSON file (array of trajectory points)
    #[arg(short, long)]
    input: PathBuf,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Detector tier
    #[arg(short, long, value_enum, default_value = "gps")]
    detector: DetectorKind,

    /// Configuration file (defaults to configs/marga.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Detection methods, comma separated (tier defaults when omitted)
    #[arg(short, long, value_enum, value_delimiter = ',')]
    methods: Vec<DetectionMethod>,

    /// Correction method (configured default when omitted)
    #[arg(short, long, value_enum)]
    fix: Option<CorrectionMethod>,

    /// Only flag anomalies, do not correct
    #[arg(long)]
    detect_only: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::load_default()?,
    };

    let points: Vec<TrajectoryPoint> =
        serde_json::from_reader(BufReader::new(File::open(&args.input)?))?;
    log::info!("Loaded {} points from {}", points.len(), args.input.display());
    let trajectory: Trajectory = points.into();

    let detector = create_detector(args.detector, config);
    let methods = (!args.methods.is_empty()).then_some(args.methods.as_slice());

    let outcome = if args.detect_only {
        detector.detect(&trajectory, methods)?
    } else {
        detector.process(&trajectory, methods, args.fix)?
    };

    let summary = AnomalySummary::from_trajectory(&outcome.trajectory);
    log::info!("{}", summary);
    if !outcome.warnings.is_empty() {
        log::info!("{} warning(s) during cleaning", outcome.warnings.len());
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, &outcome.trajectory)?;
            writer.flush()?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &outcome.trajectory)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
