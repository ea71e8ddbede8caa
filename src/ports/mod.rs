// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::ConversionError;
use crate::planner::TranscodeCommand;

/// Port for running one planned transcoder invocation
#[async_trait]
pub trait TranscoderPort: Send + Sync {
    /// Run the command to completion; `Ok` only for a zero exit status
    async fn transcode(&self, command: &TranscodeCommand) -> Result<(), ConversionError>;

    /// Executable this port launches, for display
    fn program(&self) -> &Path;
}
