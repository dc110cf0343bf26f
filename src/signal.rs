use crate::session::{Readings, SessionError};


#[derive(Debug)]
pub enum MonitorSignal {
    SessionStarted,
    SessionFinished(SessionOutcome),
}

#[derive(Debug)]
pub enum GuiSignal {
    ReadRequested,
}

/// What one button press produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Completed(Readings),
    DeviceNotFound,
    Failed(String),
}

impl From<Result<Option<Readings>, SessionError>> for SessionOutcome {
    fn from(result: Result<Option<Readings>, SessionError>) -> Self {
        match result {
            Ok(Some(readings)) => SessionOutcome::Completed(readings),
            Ok(None) => SessionOutcome::DeviceNotFound,
            Err(err) => SessionOutcome::Failed(err.to_string()),
        }
    }
}
