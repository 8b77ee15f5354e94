//! kqueue-based exit notification (macOS).

use super::{ExitEvent, Pid, ProcessEventSource};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};
use std::ptr;

/// Watches a process with `EVFILT_PROC` / `NOTE_EXIT` on a kqueue.
#[derive(Debug, Clone, Copy, Default)]
pub struct KqueueEventSource;

impl ProcessEventSource for KqueueEventSource {
    type Queue = OwnedFd;

    fn parent_pid(&self) -> Pid {
        std::os::unix::process::parent_id() as Pid
    }

    fn create_event_queue(&self) -> io::Result<OwnedFd> {
        let fd = unsafe { libc::kqueue() };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: kqueue() returned a fresh descriptor that nothing else owns.
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }

    fn register_exit_notification(&self, queue: &mut OwnedFd, pid: Pid) -> io::Result<()> {
        let change = libc::kevent {
            ident: pid as libc::uintptr_t,
            filter: libc::EVFILT_PROC,
            flags: libc::EV_ADD | libc::EV_ONESHOT,
            fflags: libc::NOTE_EXIT,
            data: 0,
            udata: ptr::null_mut(),
        };
        let rc = unsafe {
            libc::kevent(
                queue.as_raw_fd(),
                &change,
                1,
                ptr::null_mut(),
                0,
                ptr::null(),
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn wait_for_event(&self, queue: &mut OwnedFd) -> io::Result<Option<ExitEvent>> {
        loop {
            let mut event: libc::kevent = unsafe { std::mem::zeroed() };
            let n = unsafe {
                libc::kevent(
                    queue.as_raw_fd(),
                    ptr::null(),
                    0,
                    &mut event,
                    1,
                    ptr::null(),
                )
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if n == 0 || event.fflags & libc::NOTE_EXIT == 0 {
                return Ok(None);
            }
            return Ok(Some(ExitEvent {
                pid: event.ident as Pid,
            }));
        }
    }
}
