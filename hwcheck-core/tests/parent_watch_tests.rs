use hwcheck_core::parent_watch::{
    ExitEvent, ParentWatch, Pid, ProcessEventSource, SetupError, Terminator, ThreadSpawner,
    WatchStopped, WatcherSpawner,
};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PARENT: Pid = 4242;
const TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(200);

// --- Test Helpers ---

/// Which step of the setup the stub should fail.
#[derive(Clone, Copy, PartialEq)]
enum Fault {
    None,
    QueueCreation,
    Registration,
}

/// Queue handle that reports when it is released.
struct StubQueue {
    events: Receiver<Option<ExitEvent>>,
    closed: Sender<()>,
}

impl Drop for StubQueue {
    fn drop(&mut self) {
        let _ = self.closed.send(());
    }
}

/// Event source stand-in. Events are delivered through `Harness::deliver`.
struct StubEventSource {
    fault: Fault,
    events: Mutex<Option<Receiver<Option<ExitEvent>>>>,
    closed: Sender<()>,
    registered: Arc<Mutex<Vec<Pid>>>,
}

impl ProcessEventSource for StubEventSource {
    type Queue = StubQueue;

    fn parent_pid(&self) -> Pid {
        PARENT
    }

    fn create_event_queue(&self) -> io::Result<StubQueue> {
        if self.fault == Fault::QueueCreation {
            return Err(io::Error::from_raw_os_error(libc::EMFILE));
        }
        let events = self
            .events
            .lock()
            .unwrap()
            .take()
            .expect("queue created once");
        Ok(StubQueue {
            events,
            closed: self.closed.clone(),
        })
    }

    fn register_exit_notification(&self, _queue: &mut StubQueue, pid: Pid) -> io::Result<()> {
        if self.fault == Fault::Registration {
            return Err(io::Error::from_raw_os_error(libc::ESRCH));
        }
        self.registered.lock().unwrap().push(pid);
        Ok(())
    }

    fn wait_for_event(&self, queue: &mut StubQueue) -> io::Result<Option<ExitEvent>> {
        queue
            .events
            .recv()
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Records termination requests instead of exiting.
struct RecordingTerminator(Sender<i32>);

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        let _ = self.0.send(code);
    }
}

/// Counts spawns and delegates to real threads.
#[derive(Clone, Default)]
struct CountingSpawner {
    spawned: Arc<AtomicUsize>,
    names: Arc<Mutex<Vec<String>>>,
}

impl WatcherSpawner for CountingSpawner {
    fn spawn_detached(
        &self,
        name: &str,
        task: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<()> {
        self.spawned.fetch_add(1, Ordering::SeqCst);
        self.names.lock().unwrap().push(name.to_string());
        ThreadSpawner.spawn_detached(name, task)
    }
}

/// Refuses to spawn, dropping the task.
struct FailingSpawner;

impl WatcherSpawner for FailingSpawner {
    fn spawn_detached(
        &self,
        _name: &str,
        _task: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<()> {
        Err(io::Error::from_raw_os_error(libc::EAGAIN))
    }
}

struct Harness {
    source: StubEventSource,
    deliver: Sender<Option<ExitEvent>>,
    closed: Receiver<()>,
    registered: Arc<Mutex<Vec<Pid>>>,
    terminations: Receiver<i32>,
    terminator: RecordingTerminator,
    spawner: CountingSpawner,
}

fn harness(fault: Fault) -> Harness {
    let (deliver, events) = mpsc::channel();
    let (closed_tx, closed) = mpsc::channel();
    let (term_tx, terminations) = mpsc::channel();
    let registered = Arc::new(Mutex::new(Vec::new()));
    Harness {
        source: StubEventSource {
            fault,
            events: Mutex::new(Some(events)),
            closed: closed_tx,
            registered: registered.clone(),
        },
        deliver,
        closed,
        registered,
        terminations,
        terminator: RecordingTerminator(term_tx),
        spawner: CountingSpawner::default(),
    }
}

// --- Setup failures ---

#[test]
fn test_queue_creation_failure_spawns_nothing() {
    let h = harness(Fault::QueueCreation);
    let spawned = h.spawner.spawned.clone();

    let result = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup();

    assert!(matches!(result, Err(SetupError::QueueCreation(_))));
    assert_eq!(spawned.load(Ordering::SeqCst), 0);
    assert!(h.registered.lock().unwrap().is_empty());
}

#[test]
fn test_registration_failure_closes_queue_and_spawns_nothing() {
    let h = harness(Fault::Registration);
    let spawned = h.spawner.spawned.clone();

    let result = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup();

    match result {
        Err(SetupError::Registration { pid, source }) => {
            assert_eq!(pid, PARENT);
            assert_eq!(source.raw_os_error(), Some(libc::ESRCH));
        }
        other => panic!("expected registration error, got {other:?}"),
    }
    assert_eq!(spawned.load(Ordering::SeqCst), 0);
    assert!(h.closed.try_recv().is_ok(), "queue was not released");
}

#[test]
fn test_spawn_failure_closes_queue() {
    let h = harness(Fault::None);

    let result = ParentWatch::new(h.source)
        .with_spawner(FailingSpawner)
        .with_terminator(h.terminator)
        .setup();

    assert!(matches!(result, Err(SetupError::Spawn(_))));
    assert!(h.closed.try_recv().is_ok(), "queue was not released");
    assert_eq!(*h.registered.lock().unwrap(), vec![PARENT]);
}

// --- Watcher behaviour ---

#[test]
fn test_watcher_terminates_only_on_parent_exit() {
    let h = harness(Fault::None);
    let spawned = h.spawner.spawned.clone();
    let names = h.spawner.names.clone();

    ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .exit_code(3)
        .thread_name("test-parent-watch")
        .setup()
        .expect("setup succeeds");

    assert_eq!(spawned.load(Ordering::SeqCst), 1);
    assert_eq!(*names.lock().unwrap(), vec!["test-parent-watch".to_string()]);
    assert_eq!(*h.registered.lock().unwrap(), vec![PARENT]);

    // Nothing happens until the notification arrives.
    assert_eq!(
        h.terminations.recv_timeout(QUIET),
        Err(RecvTimeoutError::Timeout)
    );

    h.deliver.send(Some(ExitEvent { pid: PARENT })).unwrap();
    assert_eq!(h.terminations.recv_timeout(TIMEOUT), Ok(3));
}

#[test]
fn test_default_exit_code_is_non_zero() {
    let h = harness(Fault::None);

    ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    h.deliver.send(Some(ExitEvent { pid: PARENT })).unwrap();
    let code = h.terminations.recv_timeout(TIMEOUT).unwrap();
    assert_ne!(code, 0);
}

#[test]
fn test_event_for_other_pid_does_not_terminate() {
    let h = harness(Fault::None);

    ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    h.deliver.send(Some(ExitEvent { pid: PARENT + 1 })).unwrap();

    // The watcher finishes and releases its queue without terminating.
    assert!(h.closed.recv_timeout(TIMEOUT).is_ok());
    assert!(h.terminations.try_recv().is_err());
}

#[test]
fn test_wake_without_event_does_not_terminate() {
    let h = harness(Fault::None);

    ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    h.deliver.send(None).unwrap();

    assert!(h.closed.recv_timeout(TIMEOUT).is_ok());
    assert!(h.terminations.try_recv().is_err());
}

#[test]
fn test_configure_applies_exit_code_and_thread_name() {
    let h = harness(Fault::None);
    let names = h.spawner.names.clone();
    let config = hwcheck_core::CoreConfigBuilder::new()
        .parent_exit_code(9)
        .watcher_thread_name("configured-watch")
        .build();

    ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .configure(&config)
        .setup()
        .expect("setup succeeds");

    assert_eq!(*names.lock().unwrap(), vec!["configured-watch".to_string()]);
    h.deliver.send(Some(ExitEvent { pid: PARENT })).unwrap();
    assert_eq!(h.terminations.recv_timeout(TIMEOUT), Ok(9));
}

// --- Exit code ---

#[test]
fn test_zero_exit_code_is_rejected_before_setup() {
    let h = harness(Fault::None);
    let spawned = h.spawner.spawned.clone();

    let result = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .exit_code(0)
        .setup();

    assert!(matches!(result, Err(SetupError::InvalidExitCode(0))));
    assert_eq!(spawned.load(Ordering::SeqCst), 0);
    assert!(h.registered.lock().unwrap().is_empty());
}

#[test]
fn test_out_of_range_exit_code_is_rejected() {
    for code in [-1, 256] {
        let h = harness(Fault::None);
        let result = ParentWatch::new(h.source)
            .with_spawner(h.spawner)
            .with_terminator(h.terminator)
            .exit_code(code)
            .setup();
        assert!(
            matches!(result, Err(SetupError::InvalidExitCode(c)) if c == code),
            "exit code {code} accepted"
        );
    }
}

// --- Watcher status ---

#[test]
fn test_status_reports_unrelated_event() {
    let h = harness(Fault::None);

    let status = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");
    assert!(status.try_stopped().is_none());

    h.deliver.send(Some(ExitEvent { pid: PARENT + 1 })).unwrap();
    match status.wait() {
        Some(WatchStopped::UnrelatedEvent { pid, parent }) => {
            assert_eq!(pid, PARENT + 1);
            assert_eq!(parent, PARENT);
        }
        other => panic!("unexpected stop reason: {other:?}"),
    }
    assert!(h.terminations.try_recv().is_err());
}

#[test]
fn test_status_reports_failed_wait() {
    let h = harness(Fault::None);

    let status = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    // Closing the event channel makes the stub wait fail.
    drop(h.deliver);
    assert!(matches!(status.wait(), Some(WatchStopped::WaitFailed(_))));
}

#[test]
fn test_status_reports_empty_wake() {
    let h = harness(Fault::None);

    let status = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    h.deliver.send(None).unwrap();
    assert!(matches!(status.wait(), Some(WatchStopped::NoEvent)));
}

#[test]
fn test_status_is_silent_after_parent_exit() {
    let h = harness(Fault::None);

    let status = ParentWatch::new(h.source)
        .with_spawner(h.spawner)
        .with_terminator(h.terminator)
        .setup()
        .expect("setup succeeds");

    h.deliver.send(Some(ExitEvent { pid: PARENT })).unwrap();
    assert_eq!(h.terminations.recv_timeout(TIMEOUT), Ok(1));
    // The recording terminator returns, so the watcher ends without a reason.
    assert!(status.wait().is_none());
}
