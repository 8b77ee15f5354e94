// ============================================================================
// hwcheck-core/src/parent_watch/mod.rs
// ============================================================================
//
// PARENT-LIVENESS MONITOR: Self-termination when the parent process exits
//
// Helper processes call `setup_parent_death_signal` once at start-up. It
// subscribes to a one-shot "process exited" notification for the parent on
// a kernel event queue and hands the queue to a detached watcher thread.
// When the notification fires the watcher terminates the whole process.
//
// KEY COMPONENTS:
// - ProcessEventSource: trait over the kernel event facility
// - WatcherSpawner: spawns the detached watcher (threads in production)
// - Terminator: ends the process (std::process::exit in production)
// - ParentWatch: performs the ordered setup and owns the queue until hand-off
//
// This is best-effort: a parent that dies before the subscription is
// registered, or through a path the kernel notification does not cover, is
// never observed. The watcher cannot be cancelled once spawned. If it stops
// without terminating, it says why through the `WatcherStatus` returned by
// `ParentWatch::setup`.

use crate::config::{
    CoreConfig, DEFAULT_PARENT_EXIT_CODE, DEFAULT_WATCHER_THREAD_NAME, PARENT_EXIT_CODE_RANGE,
    WatchStrategy,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use thiserror::Error;

#[cfg(target_os = "macos")]
mod kqueue;
#[cfg(target_os = "linux")]
mod pidfd;
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
mod unsupported;

#[cfg(target_os = "macos")]
pub use kqueue::KqueueEventSource;
#[cfg(target_os = "linux")]
pub use pidfd::{PidfdEventSource, PidfdQueue, set_kernel_death_signal};
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub use unsupported::UnsupportedEventSource;

/// Process identifier as used by the kernel event facilities.
pub type Pid = i32;

/// The event source for the current platform.
#[cfg(target_os = "macos")]
pub type DefaultEventSource = KqueueEventSource;
/// The event source for the current platform.
#[cfg(target_os = "linux")]
pub type DefaultEventSource = PidfdEventSource;
/// The event source for the current platform.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub type DefaultEventSource = UnsupportedEventSource;

// ============================================================================
// ERRORS
// ============================================================================

/// Errors that can occur while arming the parent-liveness monitor.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The exit status would not report a failure (it must be in 1..=255).
    #[error("invalid parent exit code {0}: must be in 1..=255")]
    InvalidExitCode(i32),

    /// The kernel event queue could not be created.
    #[error("failed to create event queue: {0}")]
    QueueCreation(#[source] io::Error),

    /// The exit notification for the parent could not be registered.
    #[error("failed to register exit notification for parent pid {pid}: {source}")]
    Registration {
        /// The parent process id the subscription was for.
        pid: Pid,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The watcher thread could not be started.
    #[error("failed to spawn parent watcher: {0}")]
    Spawn(#[source] io::Error),

    /// The kernel parent-death signal could not be armed.
    #[error("failed to set parent death signal: {0}")]
    KernelSignal(#[source] io::Error),
}

/// Why a spawned watcher finished without terminating the process.
#[derive(Error, Debug)]
pub enum WatchStopped {
    /// The queue reported the exit of a process other than the parent.
    #[error("exit event for pid {pid} while watching parent {parent}")]
    UnrelatedEvent { pid: Pid, parent: Pid },

    /// The wait returned without an event.
    #[error("event wait returned without an event")]
    NoEvent,

    /// Waiting on the queue failed.
    #[error("waiting for parent exit failed: {0}")]
    WaitFailed(#[source] io::Error),
}

/// Handle on a running watcher, returned by a successful setup.
///
/// Dropping it does not affect the watcher.
#[derive(Debug)]
pub struct WatcherStatus {
    stopped: Receiver<WatchStopped>,
}

impl WatcherStatus {
    /// Blocks until the watcher finishes without terminating the process.
    ///
    /// `None` means the watcher went away without a reason, which only
    /// happens when a non-exiting `Terminator` returned.
    pub fn wait(&self) -> Option<WatchStopped> {
        self.stopped.recv().ok()
    }

    /// Returns the stop reason if the watcher has already finished.
    pub fn try_stopped(&self) -> Option<WatchStopped> {
        match self.stopped.try_recv() {
            Ok(reason) => Some(reason),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

// ============================================================================
// PLATFORM BOUNDARY
// ============================================================================

/// A notification delivered through the event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitEvent {
    /// The process the notification refers to.
    pub pid: Pid,
}

/// Trait over the kernel event-notification facility.
///
/// The source moves into the watcher thread together with its queue, so both
/// must be `Send`.
pub trait ProcessEventSource: Send + 'static {
    /// Event queue handle. Dropping it releases the OS resource.
    type Queue: Send + 'static;

    /// The current parent process id.
    fn parent_pid(&self) -> Pid;

    /// Creates a new event queue.
    fn create_event_queue(&self) -> io::Result<Self::Queue>;

    /// Registers a one-shot "process exited" subscription for `pid`.
    fn register_exit_notification(&self, queue: &mut Self::Queue, pid: Pid) -> io::Result<()>;

    /// Blocks until one event arrives. `Ok(None)` means the wait returned
    /// without an event.
    fn wait_for_event(&self, queue: &mut Self::Queue) -> io::Result<Option<ExitEvent>>;
}

/// Starts a detached unit of work.
pub trait WatcherSpawner {
    /// Spawns `task` without keeping a handle to it. On error the task is
    /// dropped without running.
    fn spawn_detached(&self, name: &str, task: Box<dyn FnOnce() + Send + 'static>)
    -> io::Result<()>;
}

/// Spawns the watcher on a named OS thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSpawner;

impl WatcherSpawner for ThreadSpawner {
    fn spawn_detached(
        &self,
        name: &str,
        task: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<()> {
        // Dropping the JoinHandle detaches the thread.
        thread::Builder::new()
            .name(name.to_string())
            .spawn(task)
            .map(|_| ())
    }
}

/// Ends the process on behalf of the watcher.
pub trait Terminator: Send + 'static {
    /// Terminates with `code`. Production implementations do not return.
    fn terminate(&self, code: i32);
}

/// Terminates through `std::process::exit`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

// ============================================================================
// SETUP
// ============================================================================

/// Arms the parent-liveness monitor.
///
/// # Examples
///
/// ```rust,no_run
/// use hwcheck_core::parent_watch::{ParentWatch, default_event_source};
///
/// ParentWatch::new(default_event_source())
///     .exit_code(3)
///     .setup()
///     .expect("parent watch");
/// ```
pub struct ParentWatch<E, S = ThreadSpawner, T = ProcessExit> {
    events: E,
    spawner: S,
    terminator: T,
    exit_code: i32,
    thread_name: String,
}

impl<E: ProcessEventSource> ParentWatch<E> {
    /// Creates a monitor that watches on an OS thread and exits the process.
    pub fn new(events: E) -> Self {
        Self {
            events,
            spawner: ThreadSpawner,
            terminator: ProcessExit,
            exit_code: DEFAULT_PARENT_EXIT_CODE,
            thread_name: DEFAULT_WATCHER_THREAD_NAME.to_string(),
        }
    }
}

impl<E, S, T> ParentWatch<E, S, T>
where
    E: ProcessEventSource,
    S: WatcherSpawner,
    T: Terminator,
{
    /// Replaces the spawner.
    pub fn with_spawner<S2: WatcherSpawner>(self, spawner: S2) -> ParentWatch<E, S2, T> {
        ParentWatch {
            events: self.events,
            spawner,
            terminator: self.terminator,
            exit_code: self.exit_code,
            thread_name: self.thread_name,
        }
    }

    /// Replaces the terminator.
    pub fn with_terminator<T2: Terminator>(self, terminator: T2) -> ParentWatch<E, S, T2> {
        ParentWatch {
            events: self.events,
            spawner: self.spawner,
            terminator,
            exit_code: self.exit_code,
            thread_name: self.thread_name,
        }
    }

    /// Sets the exit status used once the parent has exited.
    #[must_use]
    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Sets the watcher thread name.
    #[must_use]
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Takes the exit code and thread name from `config`.
    #[must_use]
    pub fn configure(self, config: &CoreConfig) -> Self {
        self.exit_code(config.parent_exit_code)
            .thread_name(config.watcher_thread_name.clone())
    }

    /// Performs the setup: queue creation, registration, then spawn.
    ///
    /// The exit code is checked before anything is created. The queue is
    /// released on every failure path. On success the watcher owns it.
    pub fn setup(self) -> Result<WatcherStatus, SetupError> {
        if !PARENT_EXIT_CODE_RANGE.contains(&self.exit_code) {
            log::error!("Refusing to watch parent with exit code {}", self.exit_code);
            return Err(SetupError::InvalidExitCode(self.exit_code));
        }

        let parent_pid = self.events.parent_pid();

        let mut queue = self.events.create_event_queue().map_err(|e| {
            log::debug!("Failed to create event queue for parent watch: {}", e);
            SetupError::QueueCreation(e)
        })?;

        if let Err(source) = self
            .events
            .register_exit_notification(&mut queue, parent_pid)
        {
            log::error!(
                "Failed to register exit notification for parent {}: {}",
                parent_pid,
                source
            );
            return Err(SetupError::Registration {
                pid: parent_pid,
                source,
            });
        }

        let ParentWatch {
            events,
            spawner,
            terminator,
            exit_code,
            thread_name,
        } = self;
        let (stopped_tx, stopped) = mpsc::channel();
        let watcher = Watcher {
            events,
            queue,
            terminator,
            parent_pid,
            exit_code,
            stopped: stopped_tx,
        };

        spawner
            .spawn_detached(&thread_name, Box::new(move || watcher.run()))
            .map_err(|e| {
                log::error!("Failed to spawn parent watcher thread: {}", e);
                SetupError::Spawn(e)
            })?;

        log::debug!("Watching parent process {} for exit", parent_pid);
        Ok(WatcherStatus { stopped })
    }
}

/// State moved into the detached watcher.
struct Watcher<E: ProcessEventSource, T> {
    events: E,
    queue: E::Queue,
    terminator: T,
    parent_pid: Pid,
    exit_code: i32,
    stopped: Sender<WatchStopped>,
}

impl<E: ProcessEventSource, T: Terminator> Watcher<E, T> {
    fn run(mut self) {
        let reason = match self.events.wait_for_event(&mut self.queue) {
            Ok(Some(event)) if event.pid == self.parent_pid => {
                log::info!(
                    "Parent process {} exited, terminating with status {}",
                    self.parent_pid,
                    self.exit_code
                );
                self.terminator.terminate(self.exit_code);
                return;
            }
            Ok(Some(event)) => {
                log::warn!(
                    "Ignoring exit event for pid {} while watching parent {}",
                    event.pid,
                    self.parent_pid
                );
                WatchStopped::UnrelatedEvent {
                    pid: event.pid,
                    parent: self.parent_pid,
                }
            }
            Ok(None) => {
                log::debug!("Parent watch returned without an event");
                WatchStopped::NoEvent
            }
            Err(e) => {
                log::error!("Waiting for parent exit failed: {}", e);
                WatchStopped::WaitFailed(e)
            }
        };
        // Nobody may be listening; the reason is already logged.
        let _ = self.stopped.send(reason);
    }
}

/// Returns the event source for the current platform.
#[must_use]
pub fn default_event_source() -> DefaultEventSource {
    DefaultEventSource::default()
}

/// Arms the parent-liveness monitor with the default configuration.
pub fn setup_parent_death_signal() -> Result<(), SetupError> {
    setup_with_config(&CoreConfig::default()).map(|_| ())
}

/// Arms the parent-liveness monitor using the strategy in `config`.
///
/// Returns the watcher's status handle for the event-queue strategy and
/// `None` for the kernel-signal strategy, which has no watcher.
pub fn setup_with_config(config: &CoreConfig) -> Result<Option<WatcherStatus>, SetupError> {
    match config.watch_strategy {
        WatchStrategy::EventQueue => ParentWatch::new(default_event_source())
            .configure(config)
            .setup()
            .map(Some),
        WatchStrategy::KernelSignal => arm_kernel_signal().map(|()| None),
    }
}

#[cfg(target_os = "linux")]
fn arm_kernel_signal() -> Result<(), SetupError> {
    set_kernel_death_signal(libc::SIGKILL).map_err(|e| {
        log::error!("Failed to set parent death signal: {}", e);
        SetupError::KernelSignal(e)
    })
}

#[cfg(not(target_os = "linux"))]
fn arm_kernel_signal() -> Result<(), SetupError> {
    log::error!("Parent death signal is only available on Linux");
    Err(SetupError::KernelSignal(io::Error::from(
        io::ErrorKind::Unsupported,
    )))
}
