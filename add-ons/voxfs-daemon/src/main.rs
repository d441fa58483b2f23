//! voxfs - hands-free control of a remote file-system API.
//!
//! Listens on the default microphone, interprets each utterance as a file-system command,
//! executes it over HTTP and reports progress to the status file(s) and the speaker. Runs
//! until a stop phrase, Ctrl-C, or a capture-device failure.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxfs_core::{ApiGateway, InterpreterConfig, StatusReporter, StopReason, Supervisor};
use voxfs_voice::{
    create_best_stt, create_best_tts, AudioCapture, EarConfig, MicrophoneListener, SpeechActor,
    SttBackend, VoiceEar,
};

fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[voxfs] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = InterpreterConfig::load().context("load voxfs config")?;

    match AudioCapture::list_input_devices() {
        Ok(devices) => tracing::info!(?devices, "input devices"),
        Err(e) => tracing::warn!(error = %e, "could not enumerate input devices"),
    }

    // The speech backends use blocking HTTP clients; build them before entering the runtime.
    let stt: Arc<dyn SttBackend> = Arc::from(create_best_stt());
    let speech = SpeechActor::spawn(create_best_tts(), config.speech_queue_capacity)
        .context("start speech output")?;

    let reporter = StatusReporter::new(config.status_files.clone(), speech.handle());
    let gateway = ApiGateway::from_config(&config).context("build API client")?;
    let listener = Arc::new(MicrophoneListener::new(VoiceEar::new(EarConfig::default()), stt));

    tracing::info!(
        api_base_url = %config.api_base_url,
        status_files = ?config.status_files,
        "voxfs started"
    );
    let mut supervisor = Supervisor::new(config, listener, gateway, reporter);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let finished = runtime.block_on(async {
        tokio::select! {
            reason = supervisor.run() => Some(reason),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("CTRL-C received; stopping voice control");
                None
            }
        }
    });

    let reason = match finished {
        Some(reason) => reason,
        None => {
            supervisor.stop(&StopReason::Interrupted);
            StopReason::Interrupted
        }
    };

    // A capture may still be running on the blocking pool; don't wait for its timeout.
    runtime.shutdown_timeout(Duration::from_secs(1));
    drop(supervisor);
    speech.join();

    match reason {
        StopReason::DeviceFailure(e) => Err(anyhow::anyhow!("capture device failure: {}", e)),
        StopReason::StopPhrase | StopReason::Interrupted => {
            tracing::info!(%reason, "voxfs stopped");
            Ok(())
        }
    }
}
