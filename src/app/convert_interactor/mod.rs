// Convert interactor - Runs a batch of conversions one file at a time

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::model::*;
use crate::domain::rules::ParameterValidator;
use crate::error::{VidWebpError, VidWebpResult};
use crate::planner::{CommandBuilder, TranscodeCommand};
use crate::ports::TranscoderPort;

/// Events published by the worker to the presentation layer
#[derive(Debug, Clone)]
pub enum BatchEvent {
    /// Parameters validated; `total` files will be attempted
    Started { total: usize },
    FileStarted {
        index: usize,
        total: usize,
        input: PathBuf,
    },
    FileFinished {
        index: usize,
        result: ConversionResult,
    },
    /// Reset to 0 before validation, then emitted after every processed file
    Progress { processed: usize, total: usize },
    Completed(BatchSummary),
    /// Batch-level failure; no further events follow
    Failed { message: String },
}

pub type EventSender = mpsc::UnboundedSender<BatchEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<BatchEvent>;

pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Request to stop a running batch before its next file
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Whether a batch can be triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
}

/// Holds the trigger disabled for as long as it lives
struct TriggerGuard(Arc<AtomicBool>);

impl TriggerGuard {
    fn acquire(busy: &Arc<AtomicBool>) -> VidWebpResult<Self> {
        busy.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| VidWebpError::AlreadyRunning)?;
        Ok(Self(Arc::clone(busy)))
    }
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Files plus the raw form captured when the user triggered conversion
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub files: Vec<PathBuf>,
    pub form: JobForm,
}

/// Sequential batch runner
pub struct BatchRunner {
    transcoder: Arc<dyn TranscoderPort>,
    builder: CommandBuilder,
    busy: Arc<AtomicBool>,
    cancel: CancelHandle,
}

impl BatchRunner {
    /// Create new runner with injected transcoder port
    pub fn new(transcoder: Arc<dyn TranscoderPort>, builder: CommandBuilder) -> Self {
        Self {
            transcoder,
            builder,
            busy: Arc::new(AtomicBool::new(false)),
            cancel: CancelHandle::default(),
        }
    }

    pub fn state(&self) -> RunnerState {
        if self.busy.load(Ordering::SeqCst) {
            RunnerState::Running
        } else {
            RunnerState::Idle
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    /// Run the batch on a background task so the caller stays responsive
    pub fn spawn(
        self: &Arc<Self>,
        request: BatchRequest,
        events: EventSender,
    ) -> JoinHandle<VidWebpResult<BatchSummary>> {
        let runner = Arc::clone(self);
        tokio::spawn(async move { runner.run(request, &events).await })
    }

    /// Run the whole batch. The runner is idle again on every return path.
    pub async fn run(&self, request: BatchRequest, events: &EventSender) -> VidWebpResult<BatchSummary> {
        let _guard = TriggerGuard::acquire(&self.busy)?;
        self.cancel.reset();

        let outcome = self.run_batch(request, events).await;
        if let Err(e) = &outcome {
            match e {
                VidWebpError::NoInputFiles => warn!("{}", e),
                _ => error!("Batch aborted: {}", e),
            }
            emit(events, BatchEvent::Failed {
                message: e.to_string(),
            });
        }
        outcome
    }

    async fn run_batch(&self, request: BatchRequest, events: &EventSender) -> VidWebpResult<BatchSummary> {
        if request.files.is_empty() {
            return Err(VidWebpError::NoInputFiles);
        }

        let total = request.files.len();
        emit(events, BatchEvent::Progress { processed: 0, total });

        let parameters = ParameterValidator::validate(&request.form)?;
        let job = BatchJob::new(request.files, parameters);

        info!("Starting batch of {} file(s) with {} encoder threads", total, self.builder.threads());
        emit(events, BatchEvent::Started { total });

        let started_at = Utc::now();
        let mut results = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut cancelled = false;

        for (index, input) in job.files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("Batch cancelled after {} of {} file(s)", index, total);
                cancelled = true;
                break;
            }

            info!("Converting: {} ({}/{})", input.display(), index + 1, total);
            emit(events, BatchEvent::FileStarted {
                index,
                total,
                input: input.clone(),
            });

            let command = self.builder.build(input, &job.parameters)?;
            let result = self.convert_one(command).await;
            if result.success {
                succeeded += 1;
            }

            emit(events, BatchEvent::FileFinished {
                index,
                result: result.clone(),
            });
            results.push(result);
            emit(events, BatchEvent::Progress {
                processed: index + 1,
                total,
            });
        }

        let summary = BatchSummary {
            total,
            succeeded,
            cancelled,
            results,
            started_at,
            finished_at: Utc::now(),
        };

        match summary.outcome() {
            BatchOutcome::AllSucceeded => info!("Conversion complete ({}/{})", succeeded, total),
            BatchOutcome::PartialFailure => warn!("Conversion complete with failures ({}/{})", succeeded, total),
            BatchOutcome::Cancelled => warn!("Conversion cancelled ({}/{})", succeeded, total),
        }

        emit(events, BatchEvent::Completed(summary.clone()));
        Ok(summary)
    }

    /// Spawn, wait and classify one file; failures stay local to the file
    async fn convert_one(&self, command: TranscodeCommand) -> ConversionResult {
        let started = Instant::now();
        match self.transcoder.transcode(&command).await {
            Ok(()) => {
                info!("Converted {} -> {}", command.input.display(), command.output.display());
                ConversionResult::succeeded(command.input, command.output, started.elapsed())
            }
            Err(e) => {
                error!("Conversion failed for {}: {}", command.input.display(), e);
                ConversionResult::failed(command.input, Some(command.output), e.to_string(), started.elapsed())
            }
        }
    }
}

/// The presentation side may have gone away; the batch carries on regardless.
fn emit(events: &EventSender, event: BatchEvent) {
    let _ = events.send(event);
}

#[cfg(test)]
mod tests;
