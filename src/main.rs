use anyhow::{Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use quakewatch::api::{DetectionSink, DetectionStore, JsonReportSink, LogSink, QuakeConfig, RecorderSink, StoreSink};
use quakewatch::args::{Cli, Commands, ReplayArgs, SimulateArgs};
use quakewatch::dispatch::Dispatcher;
use quakewatch::location::{location_feed, Coordinates};
use quakewatch::recording::{self, SampleRecorder};
use quakewatch::session::DetectionSession;
use quakewatch::simulate::ShakeProfile;
use quakewatch::util::now_ms;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        log::error!("Error: {:#}", e);
        process::exit(1);
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "quakewatch", "quakewatch").context("Could not determine project directories")
}

fn load_config(path: Option<PathBuf>) -> Result<QuakeConfig> {
    let path = match path {
        Some(path) => return QuakeConfig::load(&path),
        None => project_dirs()?.config_dir().join("config.kdl"),
    };
    QuakeConfig::load_or_default(path)
}

fn open_store() -> Result<DetectionStore> {
    let dirs = project_dirs()?;
    std::fs::create_dir_all(dirs.data_dir())?;
    let db_path = dirs.data_dir().join("detections.db");
    DetectionStore::open(&db_path).with_context(|| format!("Failed to open {}", db_path.display()))
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Replay(args) => replay(&config, args).await,
        Commands::Simulate(args) => simulate(args),
        Commands::History { limit } => {
            let events = open_store()?.recent(limit)?;
            if events.is_empty() {
                println!("No detections recorded.");
            }
            for e in events {
                println!(
                    "{} {} ({}, {}) energy={:.3} variance={:.3} peaks={}",
                    e.timestamp, e.device_id, e.latitude, e.longitude, e.energy, e.variance, e.peak_count
                );
            }
            Ok(())
        }
        Commands::Config => {
            let effective = serde_json::json!({
                "detector": config.detector_config(),
                "device_id": config.device_id(),
                "sinks": { "log": config.log_enabled(), "store": config.store_enabled() },
            });
            println!("{}", serde_json::to_string_pretty(&effective)?);
            Ok(())
        }
    }
}

async fn replay(config: &QuakeConfig, args: ReplayArgs) -> Result<()> {
    let mut detector_config = config.detector_config();
    args.tuning.apply(&mut detector_config);
    let device_id = args.device_id.clone().unwrap_or_else(|| config.device_id());

    let samples = recording::load_samples(&args.input)
        .with_context(|| format!("Failed to load samples from {}", args.input.display()))?;

    let mut sinks: Vec<Box<dyn DetectionSink>> = Vec::new();
    if config.log_enabled() {
        sinks.push(Box::new(LogSink));
    }
    if config.store_enabled() && !args.no_store {
        sinks.push(Box::new(StoreSink::new(open_store()?)));
    }
    if let Some(path) = &args.report {
        let file = File::create(path).with_context(|| format!("Failed to create report {}", path.display()))?;
        sinks.push(Box::new(JsonReportSink::new(BufWriter::new(file))));
    }
    if let Some(path) = &args.record {
        sinks.push(Box::new(RecorderSink::new(SampleRecorder::open(path)?)));
    }
    let dispatcher = Dispatcher::spawn(sinks);

    let (location, reader) = location_feed();
    let mut session = DetectionSession::start(detector_config, dispatcher.handle(), reader, device_id)?;
    if args.record.is_some() {
        session = session.with_sample_feed();
    }

    for sample in &samples {
        if let Some(fix) = Coordinates::from_fix(sample.latitude, sample.longitude) {
            location.publish(fix);
        }
        session.process(sample);
    }

    let summary = session.finish();
    let stats = dispatcher.close().await?;
    println!(
        "{} samples, {} windows evaluated, {} confirmed detections ({} sink failures)",
        summary.samples, summary.evaluations, summary.confirmations, stats.failures
    );
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let (latitude, longitude) = match args.location.as_deref() {
        Some([lat, lon]) => (*lat, *lon),
        _ => (0.0, 0.0),
    };
    let profile = ShakeProfile {
        rate_hz: args.rate,
        rest_seconds: args.rest_seconds,
        shake_seconds: args.seconds,
        frequency_hz: args.frequency,
        amplitude: args.amplitude,
        noise: args.noise,
        seed: args.seed,
        start_ms: now_ms(),
        latitude,
        longitude,
    };
    let samples = profile.generate();
    recording::save_samples(&args.output, &samples)
        .with_context(|| format!("Failed to save samples to {}", args.output.display()))?;
    println!("Wrote {} samples to {}", samples.len(), args.output.display());
    Ok(())
}
