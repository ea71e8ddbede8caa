// Application layer - Use case interactors

pub mod container;
pub mod convert_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::{
    create_event_channel, BatchEvent, BatchRequest, BatchRunner, CancelHandle, EventReceiver,
    EventSender, RunnerState,
};
