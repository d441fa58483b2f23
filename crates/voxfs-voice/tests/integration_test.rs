//! Integration tests for the speech edge
//!
//! Note: tests that open the microphone require audio hardware and are ignored by default.

use std::sync::Arc;
use std::time::Duration;
use voxfs_voice::{
    EarConfig, ListenOutcome, ListenWindow, Listener, MicrophoneListener, PlaceholderStt,
    ScriptedListener, VoiceEar,
};

#[tokio::test]
#[ignore] // Requires audio hardware and manual speech
async fn test_microphone_listen_cycle() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    println!("Say something within 8 seconds...");
    let listener = MicrophoneListener::new(
        VoiceEar::new(EarConfig::default()),
        Arc::new(PlaceholderStt::with_response("heard you")),
    );
    let outcome = listener
        .listen(ListenWindow::new(Duration::from_secs(8), Duration::from_secs(5)))
        .await;
    println!("outcome: {}", outcome);
    assert!(matches!(
        outcome,
        ListenOutcome::Transcript(_) | ListenOutcome::TimedOut | ListenOutcome::DeviceFailure(_)
    ));
}

#[tokio::test]
async fn test_scripted_listener_records_windows() {
    let listener = ScriptedListener::from_transcripts(["create a folder demo", "stop listening"]);
    let command = ListenWindow::new(Duration::from_secs(8), Duration::from_secs(5));
    let content = ListenWindow::new(Duration::from_secs(10), Duration::from_secs(10));

    assert_eq!(
        listener.listen(command).await,
        ListenOutcome::Transcript("create a folder demo".into())
    );
    assert_eq!(
        listener.listen(content).await,
        ListenOutcome::Transcript("stop listening".into())
    );
    assert_eq!(listener.windows(), vec![command, content]);
}
