// Unit tests for the batch runner

use super::*;
use crate::domain::errors::ConversionError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Transcoder double that replays scripted exit codes and records calls
#[derive(Default)]
struct ScriptedTranscoder {
    exits: Mutex<VecDeque<i32>>,
    calls: Mutex<Vec<PathBuf>>,
    cancel_on_first: Mutex<Option<CancelHandle>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedTranscoder {
    fn with_exits(exits: &[i32]) -> Self {
        Self {
            exits: Mutex::new(exits.iter().copied().collect()),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscoderPort for ScriptedTranscoder {
    async fn transcode(&self, command: &TranscodeCommand) -> Result<(), ConversionError> {
        self.calls.lock().unwrap().push(command.input.clone());

        if let Some(handle) = self.cancel_on_first.lock().unwrap().take() {
            handle.cancel();
        }

        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }

        let code = self.exits.lock().unwrap().pop_front().unwrap_or(0);
        if code == 0 {
            Ok(())
        } else {
            Err(ConversionError::Transcode {
                status: format!("exit code {}", code),
                stderr: "Invalid data found when processing input".to_string(),
            })
        }
    }

    fn program(&self) -> &Path {
        Path::new("ffmpeg")
    }
}

fn runner(transcoder: Arc<ScriptedTranscoder>) -> BatchRunner {
    BatchRunner::new(transcoder, CommandBuilder::new(2))
}

fn request(files: &[&str]) -> BatchRequest {
    BatchRequest {
        files: files.iter().map(PathBuf::from).collect(),
        form: JobForm::default(),
    }
}

fn drain(rx: &mut EventReceiver) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn progress(events: &[BatchEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress { processed, total } => Some((*processed, *total)),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_partial_failure_reports_progress_and_summary() {
    let transcoder = Arc::new(ScriptedTranscoder::with_exits(&[0, 0, 1]));
    let runner = runner(Arc::clone(&transcoder));
    let (tx, mut rx) = create_event_channel();

    let summary = runner
        .run(request(&["a.mp4", "b.mov", "c.gif"]), &tx)
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.outcome(), BatchOutcome::PartialFailure);
    assert!(summary.results[0].success && summary.results[1].success);
    let third = &summary.results[2];
    assert!(!third.success);
    assert!(!third.error.as_deref().unwrap_or_default().is_empty());
    assert_eq!(third.output, Some(PathBuf::from("c.webp")));

    let events = drain(&mut rx);
    assert_eq!(progress(&events), vec![(0, 3), (1, 3), (2, 3), (3, 3)]);
    assert!(matches!(events.first(), Some(BatchEvent::Progress { processed: 0, total: 3 })));
    assert!(matches!(events.get(1), Some(BatchEvent::Started { total: 3 })));
    assert!(matches!(events.last(), Some(BatchEvent::Completed(s)) if s.succeeded == 2));
    assert_eq!(runner.state(), RunnerState::Idle);
}

#[tokio::test]
async fn test_files_converted_once_each_in_order() {
    let transcoder = Arc::new(ScriptedTranscoder::default());
    let runner = runner(Arc::clone(&transcoder));
    let (tx, _rx) = create_event_channel();

    let files = ["z.mp4", "a.gif", "z.mp4", "m.webm"];
    let summary = runner.run(request(&files), &tx).await.unwrap();

    assert_eq!(summary.outcome(), BatchOutcome::AllSucceeded);
    let expected: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    assert_eq!(transcoder.calls(), expected);
}

#[tokio::test]
async fn test_empty_file_list_spawns_nothing() {
    let transcoder = Arc::new(ScriptedTranscoder::default());
    let runner = runner(Arc::clone(&transcoder));
    let (tx, mut rx) = create_event_channel();

    let err = runner.run(request(&[]), &tx).await.unwrap_err();
    assert!(matches!(err, VidWebpError::NoInputFiles));
    assert!(err.to_string().contains("No files selected"));
    assert!(transcoder.calls().is_empty());
    assert!(matches!(drain(&mut rx).as_slice(), [BatchEvent::Failed { .. }]));
    assert_eq!(runner.state(), RunnerState::Idle);
}

#[tokio::test]
async fn test_invalid_form_aborts_before_first_file() {
    let transcoder = Arc::new(ScriptedTranscoder::default());
    let runner = runner(Arc::clone(&transcoder));
    let (tx, mut rx) = create_event_channel();

    let mut req = request(&["a.mp4", "b.mp4"]);
    req.form.frame_rate = "0".to_string();

    let err = runner.run(req, &tx).await.unwrap_err();
    assert!(matches!(err, VidWebpError::Validation(_)));
    assert!(err.to_string().contains("frame rate must be greater than 0"));
    assert!(transcoder.calls().is_empty());
    assert_eq!(runner.state(), RunnerState::Idle);
    // Progress is reset even though validation rejects the batch
    assert!(matches!(
        drain(&mut rx).as_slice(),
        [BatchEvent::Progress { processed: 0, total: 2 }, BatchEvent::Failed { .. }]
    ));

    // Runner can be triggered again after a rejected batch
    let summary = runner.run(request(&["a.mp4"]), &tx).await.unwrap();
    assert_eq!(summary.succeeded, 1);
}

#[tokio::test]
async fn test_unplannable_input_is_batch_level_error() {
    let transcoder = Arc::new(ScriptedTranscoder::default());
    let runner = runner(Arc::clone(&transcoder));
    let (tx, mut rx) = create_event_channel();

    let err = runner.run(request(&["a.mp4", "/"]), &tx).await.unwrap_err();
    assert!(matches!(err, VidWebpError::Orchestration { .. }));
    assert_eq!(transcoder.calls(), vec![PathBuf::from("a.mp4")]);
    assert!(matches!(drain(&mut rx).last(), Some(BatchEvent::Failed { .. })));
    assert_eq!(runner.state(), RunnerState::Idle);
}

#[tokio::test]
async fn test_cancel_stops_before_next_file() {
    let transcoder = Arc::new(ScriptedTranscoder::default());
    let runner = runner(Arc::clone(&transcoder));
    *transcoder.cancel_on_first.lock().unwrap() = Some(runner.cancel_handle());
    let (tx, _rx) = create_event_channel();

    let summary = runner.run(request(&["a.mp4", "b.mp4", "c.mp4"]), &tx).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.outcome(), BatchOutcome::Cancelled);
    assert_eq!(summary.processed(), 1);
    assert_eq!(summary.total, 3);
    assert_eq!(transcoder.calls().len(), 1);

    // A fresh batch is not affected by the previous cancellation
    let again = runner.run(request(&["d.mp4"]), &tx).await.unwrap();
    assert!(!again.cancelled);
}

#[tokio::test]
async fn test_second_start_while_running_is_rejected() {
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let transcoder = Arc::new(ScriptedTranscoder {
        gate: Some((Arc::clone(&entered), Arc::clone(&release))),
        ..ScriptedTranscoder::default()
    });
    let runner = Arc::new(runner(Arc::clone(&transcoder)));
    let (tx, _rx) = create_event_channel();

    let handle = runner.spawn(request(&["a.mp4"]), tx.clone());
    entered.notified().await;
    assert_eq!(runner.state(), RunnerState::Running);

    let err = runner.run(request(&["b.mp4"]), &tx).await.unwrap_err();
    assert!(matches!(err, VidWebpError::AlreadyRunning));

    release.notify_one();
    let summary = handle.await.unwrap().unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(runner.state(), RunnerState::Idle);
    assert_eq!(transcoder.calls(), vec![PathBuf::from("a.mp4")]);
}

#[tokio::test]
async fn test_closed_event_channel_does_not_stop_batch() {
    let transcoder = Arc::new(ScriptedTranscoder::with_exits(&[1, 0]));
    let runner = runner(Arc::clone(&transcoder));
    let (tx, rx) = create_event_channel();
    drop(rx);

    let summary = runner.run(request(&["a.mp4", "b.mp4"]), &tx).await.unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed(), 1);
}
