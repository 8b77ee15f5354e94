//! pidfd/epoll-based exit notification and `PR_SET_PDEATHSIG` (Linux).

use super::{ExitEvent, Pid, ProcessEventSource};
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

/// An epoll instance plus the pidfd registered on it.
#[derive(Debug)]
pub struct PidfdQueue {
    epoll: OwnedFd,
    // Kept open for as long as the subscription lives.
    pidfd: Option<OwnedFd>,
}

/// Watches a process through a pidfd, which becomes readable when the
/// process exits. Registered with `EPOLLONESHOT` so it fires at most once.
///
/// Requires Linux 5.3 or newer; older kernels fail registration with
/// `ENOSYS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidfdEventSource;

impl ProcessEventSource for PidfdEventSource {
    type Queue = PidfdQueue;

    fn parent_pid(&self) -> Pid {
        std::os::unix::process::parent_id() as Pid
    }

    fn create_event_queue(&self) -> io::Result<PidfdQueue> {
        let fd = unsafe { libc::epoll_create1(libc::EPOLL_CLOEXEC) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(PidfdQueue {
            // SAFETY: epoll_create1() returned a fresh descriptor.
            epoll: unsafe { OwnedFd::from_raw_fd(fd) },
            pidfd: None,
        })
    }

    fn register_exit_notification(&self, queue: &mut PidfdQueue, pid: Pid) -> io::Result<()> {
        let raw = unsafe { libc::syscall(libc::SYS_pidfd_open, pid, 0) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: pidfd_open() returned a fresh descriptor.
        let pidfd = unsafe { OwnedFd::from_raw_fd(raw as libc::c_int) };

        let mut event = libc::epoll_event {
            events: (libc::EPOLLIN | libc::EPOLLONESHOT) as u32,
            u64: pid as u64,
        };
        let rc = unsafe {
            libc::epoll_ctl(
                queue.epoll.as_raw_fd(),
                libc::EPOLL_CTL_ADD,
                pidfd.as_raw_fd(),
                &mut event,
            )
        };
        if rc < 0 {
            return Err(io::Error::last_os_error());
        }
        queue.pidfd = Some(pidfd);
        Ok(())
    }

    fn wait_for_event(&self, queue: &mut PidfdQueue) -> io::Result<Option<ExitEvent>> {
        loop {
            let mut event = libc::epoll_event { events: 0, u64: 0 };
            let n = unsafe { libc::epoll_wait(queue.epoll.as_raw_fd(), &mut event, 1, -1) };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if n == 0 {
                return Ok(None);
            }
            let data = event.u64;
            return Ok(Some(ExitEvent { pid: data as Pid }));
        }
    }
}

/// Asks the kernel to deliver `signal` to this process when its parent
/// thread exits (`PR_SET_PDEATHSIG`).
///
/// The setting is cleared across `fork` in the child, so it must be armed
/// by the process that wants to die with its parent.
pub fn set_kernel_death_signal(signal: libc::c_int) -> io::Result<()> {
    let rc = unsafe { libc::prctl(libc::PR_SET_PDEATHSIG, signal as libc::c_ulong) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
