use std::sync::Arc;

use tracing::debug;

use crate::adapters::FFmpegAdapter;
use crate::app::convert_interactor::BatchRunner;
use crate::config_initialization::TranscoderSettings;
use crate::planner::CommandBuilder;
use crate::ports::TranscoderPort;

pub trait AppContainer: Send + Sync {
    fn batch_runner(&self) -> Arc<BatchRunner>;
    fn transcoder(&self) -> Arc<dyn TranscoderPort>;
}

pub struct DefaultAppContainer {
    transcoder: Arc<dyn TranscoderPort>,
    batch_runner: Arc<BatchRunner>,
}

impl DefaultAppContainer {
    pub fn new(settings: &TranscoderSettings) -> Self {
        let adapter = FFmpegAdapter::locate(settings.ffmpeg_path.clone()).with_timeout(settings.timeout);
        debug!("Transcoder resolved to {}", adapter.program().display());

        let transcoder = Arc::new(adapter) as Arc<dyn TranscoderPort>;
        Self::with_transcoder(transcoder, CommandBuilder::new(settings.threads))
    }

    /// Wire the runner around an arbitrary transcoder port
    pub fn with_transcoder(transcoder: Arc<dyn TranscoderPort>, builder: CommandBuilder) -> Self {
        let batch_runner = Arc::new(BatchRunner::new(Arc::clone(&transcoder), builder));
        Self {
            transcoder,
            batch_runner,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn batch_runner(&self) -> Arc<BatchRunner> {
        Arc::clone(&self.batch_runner)
    }

    fn transcoder(&self) -> Arc<dyn TranscoderPort> {
        Arc::clone(&self.transcoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::convert_interactor::RunnerState;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_container_wires_configured_transcoder() {
        let settings = TranscoderSettings {
            ffmpeg_path: Some(PathBuf::from("/opt/bin/ffmpeg")),
            timeout: None,
            threads: 3,
        };
        let container = DefaultAppContainer::new(&settings);

        assert_eq!(container.transcoder().program(), Path::new("/opt/bin/ffmpeg"));
        let runner = container.batch_runner();
        assert_eq!(runner.builder().threads(), 3);
        assert_eq!(runner.state(), RunnerState::Idle);
        // Same runner instance every time
        assert!(Arc::ptr_eq(&runner, &container.batch_runner()));
    }
}
