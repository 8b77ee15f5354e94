//! Fallback for platforms without a supported exit-notification facility.

use super::{ExitEvent, Pid, ProcessEventSource};
use std::io;

/// Event source whose queue creation always fails with `Unsupported`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedEventSource;

impl ProcessEventSource for UnsupportedEventSource {
    type Queue = ();

    fn parent_pid(&self) -> Pid {
        0
    }

    fn create_event_queue(&self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "no process exit notification facility on this platform",
        ))
    }

    fn register_exit_notification(&self, _queue: &mut (), _pid: Pid) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    fn wait_for_event(&self, _queue: &mut ()) -> io::Result<Option<ExitEvent>> {
        Ok(None)
    }
}
