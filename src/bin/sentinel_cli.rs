// Offline harness: drives a full monitoring session on a simulated clock
// from a WAV file or a synthetic scenario, printing RiskUpdate JSON lines
// and any emergency trigger to stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::Rng;

use sentinel_core::emergency::{StaticContactDirectory, StaticLocationProvider};
use sentinel_core::{AppConfig, Contact, GeoPoint, MonitoringSession};

#[derive(Parser, Debug)]
#[command(
    name = "sentinel_cli",
    about = "Deterministic risk-fusion harness for Sentinel Core"
)]
struct Cli {
    /// Override config file (defaults to built-in reference parameters)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed a mono WAV file through a session and stream risk updates
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Constant motion score applied every tick
        #[arg(long, default_value_t = 0.0)]
        motion: f32,
    },
    /// Run a synthetic session: calm voice, then agitation, optional panic
    Simulate {
        #[arg(long, default_value_t = 30)]
        seconds: u64,
        /// Second at which to inject a manual panic
        #[arg(long)]
        panic_at: Option<u64>,
        /// Second at which to cancel a pending pre-alert
        #[arg(long)]
        cancel_at: Option<u64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Analyze { input, motion } => run_analyze(config, &input, motion),
        Commands::Simulate {
            seconds,
            panic_at,
            cancel_at,
        } => run_simulate(config, seconds, panic_at, cancel_at),
    }
}

fn new_session(config: AppConfig) -> MonitoringSession {
    MonitoringSession::new(
        config,
        Arc::new(StaticLocationProvider(GeoPoint {
            lat: 35.6895,
            lng: 139.6917,
        })),
        Arc::new(StaticContactDirectory(vec![Contact {
            name: "Emergency Contact".to_string(),
            phone: "+15550100".to_string(),
        }])),
    )
}

/// Drive one session over pre-loaded frames with a simulated clock.
///
/// Per frame (25 ms steps): ingest; every 500 ms run stress inference;
/// every 1000 ms evaluate risk and print the update.
fn drive_session(
    session: &mut MonitoringSession,
    frames: &[Vec<f32>],
    frame_ms: u64,
    motion: f32,
    mut at_second: impl FnMut(&mut MonitoringSession, u64),
) -> Result<ExitCode> {
    let mut trigger_rx = session.subscribe_triggers();
    session.start(0);
    session.set_motion_score(motion);

    let mut next_inference_ms = 0u64;
    let mut next_tick_ms = 0u64;

    for (i, frame) in frames.iter().enumerate() {
        let now_ms = i as u64 * frame_ms;
        session.ingest_audio_frame(frame, now_ms);

        if now_ms >= next_inference_ms {
            session.run_stress_inference(now_ms);
            next_inference_ms += 500;
        }
        if now_ms >= next_tick_ms {
            at_second(session, now_ms / 1_000);
            let update = session.evaluate_tick(now_ms);
            println!("{}", serde_json::to_string(&update)?);
            next_tick_ms += 1_000;
        }
    }

    if let Ok(trigger) = trigger_rx.try_recv() {
        println!("{}", serde_json::to_string(&trigger)?);
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::from(0))
}

fn run_analyze(config: AppConfig, input: &PathBuf, motion: f32) -> Result<ExitCode> {
    let frame_size = config.audio.frame_size;
    let sample_rate = config.audio.sample_rate;

    let samples = read_wav_mono(input, sample_rate)?;
    let frames: Vec<Vec<f32>> = samples
        .chunks(frame_size)
        .map(|chunk| chunk.to_vec())
        .collect();
    let frame_ms = frame_size as u64 * 1_000 / sample_rate as u64;

    let mut session = new_session(config);
    drive_session(&mut session, &frames, frame_ms, motion, |_, _| {})
}

fn run_simulate(
    config: AppConfig,
    seconds: u64,
    panic_at: Option<u64>,
    cancel_at: Option<u64>,
) -> Result<ExitCode> {
    let frame_size = config.audio.frame_size;
    let sample_rate = config.audio.sample_rate as f32;
    let frame_ms = frame_size as u64 * 1_000 / sample_rate as u64;
    let frame_count = (seconds * 1_000 / frame_ms) as usize;

    // Calm voice for the first half, rising pitch and energy afterwards
    let mut rng = rand::thread_rng();
    let frames: Vec<Vec<f32>> = (0..frame_count)
        .map(|f| {
            let progress = f as f32 / frame_count as f32;
            let agitation = ((progress - 0.5) * 2.0).clamp(0.0, 1.0);
            let freq = 160.0 + 140.0 * agitation;
            let amplitude = 0.3 + 0.5 * agitation;
            (0..frame_size)
                .map(|i| {
                    let t = (f * frame_size + i) as f32 / sample_rate;
                    let noise: f32 = rng.gen_range(-0.02..0.02);
                    amplitude
                        * ((2.0 * std::f32::consts::PI * freq * t).sin()
                            + 0.3 * (2.0 * std::f32::consts::PI * freq * 8.0 * t).sin())
                        + noise
                })
                .collect()
        })
        .collect();

    let mut session = new_session(config);
    drive_session(&mut session, &frames, frame_ms, 0.4, |session, second| {
        if panic_at == Some(second) {
            session.panic();
        }
        if cancel_at == Some(second) {
            session.cancel();
        }
    })
}

/// Read a WAV file as normalized mono f32 samples, averaging channels.
fn read_wav_mono(path: &PathBuf, expected_rate: u32) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("opening WAV file {:?}", path))?;
    let spec = reader.spec();
    if spec.sample_rate != expected_rate {
        tracing::warn!(
            file_rate = spec.sample_rate,
            expected_rate,
            "sample rate mismatch; timing will be approximate"
        );
    }

    let channels = spec.channels as usize;
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("reading float samples")?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .context("reading integer samples")?
        }
    };

    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}
