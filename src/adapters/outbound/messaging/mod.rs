mod line;
mod recording;

pub use line::LineMessagingClient;
pub use recording::{RecordedMessage, RecordingMessenger};
