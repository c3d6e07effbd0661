pub mod audio;
pub mod cli;
pub mod event_loop;
pub mod keyboard;
pub mod latency;
pub mod logging;
pub mod midi;
pub mod net;
pub mod session;
pub mod ui;

pub use cli::Args;
pub use session::{create_shared_session, Session, SharedSession};

/// Names of the available MIDI input ports.
pub fn handle_device_list() -> Vec<String> {
    #[cfg(feature = "test-mock")]
    {
        midi::MockMidiEngine::list_device_names()
    }
    #[cfg(not(feature = "test-mock"))]
    {
        midi::MidirEngine::list_device_names()
    }
}
