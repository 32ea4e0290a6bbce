//! Wayfinder: an assistive-navigation companion.
//!
//! Webcam frames plus the user's question go to a hosted vision model; the
//! answer comes back as speech through a narration queue that never overlaps
//! two utterances.

mod command;
mod logging;
mod session;

pub use command::{Command, parse_command};
pub use logging::init_logging;
pub use session::{Session, SessionConfig, messages};
