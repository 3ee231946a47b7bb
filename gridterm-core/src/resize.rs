/// Debounced resize handling
///
/// Hosts deliver resize notifications in bursts while a window edge is being
/// dragged. `ResizeCoalescer` collapses each burst into a single applied
/// resize: every notification restarts a quiet-period timer, and only the size
/// seen last when the timer finally fires is applied.
///
/// ```text
///   idle ──notify──▶ pending ──notify──▶ pending (timer restarted)
///                       │
///                       └──timer fires / force──▶ apply ──▶ listeners ──▶ idle
/// ```
///
/// The timer and the apply step run on a dedicated single-threaded tokio
/// runtime, so the host's event thread only ever enqueues a command.
use crate::geometry::Size;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

/// Default quiet period before a burst of resizes is applied
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// How long `shutdown` waits for the worker before abandoning it
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

/// Something whose geometry follows the display size
pub trait ResizeTarget: Send + Sync + 'static {
    /// Apply a new display size; returns `false` if it was rejected
    fn apply_resize(&self, size: Size) -> bool;
}

/// Callback run after each applied resize
pub type ResizeListener = Arc<dyn Fn(Size) -> anyhow::Result<()> + Send + Sync>;

/// Handle returned by [`ResizeCoalescer::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

enum Command {
    Resize(Size),
    Force,
    Shutdown,
}

/// State shared between the coalescer handle and its worker
struct Shared {
    target: Arc<dyn ResizeTarget>,
    listeners: Mutex<Vec<(ListenerId, ResizeListener)>>,
    applied: AtomicU64,
}

impl Shared {
    /// Resize the target, then notify listeners outside of any lock
    fn apply(&self, size: Size) {
        if !self.target.apply_resize(size) {
            debug!("Resize to {}x{} rejected", size.width, size.height);
            return;
        }
        self.applied.fetch_add(1, Ordering::SeqCst);

        // Snapshot so listeners may add/remove listeners without deadlocking
        let listeners: Vec<_> = self.listeners.lock().clone();
        for (id, listener) in listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(size))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Resize listener {:?} failed: {:#}", id, e),
                Err(_) => error!("Resize listener {:?} panicked", id),
            }
        }
    }
}

/// Coalesces bursts of resize notifications into single applied resizes
pub struct ResizeCoalescer {
    shared: Arc<Shared>,
    sender: UnboundedSender<Command>,
    runtime: Mutex<Option<Runtime>>,
    next_listener: AtomicU64,
    window: Duration,
}

impl ResizeCoalescer {
    /// Start the worker with the default 150 ms window
    pub fn new(target: Arc<dyn ResizeTarget>) -> anyhow::Result<Self> {
        Self::with_window(target, DEFAULT_DEBOUNCE)
    }

    pub fn with_window(target: Arc<dyn ResizeTarget>, window: Duration) -> anyhow::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("resize-coalescer")
            .enable_time()
            .build()?;

        let shared = Arc::new(Shared {
            target,
            listeners: Mutex::new(Vec::new()),
            applied: AtomicU64::new(0),
        });
        let (sender, receiver) = unbounded_channel();
        runtime.spawn(worker(shared.clone(), receiver, window));

        info!("Resize coalescer started ({}ms window)", window.as_millis());

        Ok(Self {
            shared,
            sender,
            runtime: Mutex::new(Some(runtime)),
            next_listener: AtomicU64::new(1),
            window,
        })
    }

    /// Record a raw resize notification from the host
    ///
    /// Non-positive sizes (windows being created or minimized) are dropped.
    pub fn notify(&self, width: i32, height: i32) {
        let size = Size::new(width, height);
        if !size.is_positive() {
            debug!("Ignoring resize notification {}x{}", width, height);
            return;
        }
        if self.sender.send(Command::Resize(size)).is_err() {
            debug!("Resize notification after shutdown dropped");
        }
    }

    /// Apply the last known size now, cancelling any pending timer
    pub fn force_resize(&self) {
        if self.sender.send(Command::Force).is_err() {
            debug!("Forced resize after shutdown dropped");
        }
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(Size) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.shared.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` if `id` was not registered
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.shared.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Number of resizes applied so far
    pub fn applied_count(&self) -> u64 {
        self.shared.applied.load(Ordering::SeqCst)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cancel pending work and stop the worker
    ///
    /// Waits up to 500 ms for the worker before abandoning it. Idempotent.
    pub fn shutdown(&self) {
        let Some(runtime) = self.runtime.lock().take() else {
            return;
        };
        let _ = self.sender.send(Command::Shutdown);
        runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        info!("Resize coalescer stopped");
    }
}

impl Drop for ResizeCoalescer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn worker(shared: Arc<Shared>, mut commands: UnboundedReceiver<Command>, window: Duration) {
    let mut pending: Option<Size> = None;
    let mut last_known: Option<Size> = None;
    let timer = tokio::time::sleep(window);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Resize(size)) => {
                    pending = Some(size);
                    last_known = Some(size);
                    timer.as_mut().reset(Instant::now() + window);
                }
                Some(Command::Force) => {
                    pending = None;
                    match last_known {
                        Some(size) => apply_on_worker(&shared, size).await,
                        None => warn!("Forced resize before any size was reported"),
                    }
                }
                Some(Command::Shutdown) | None => {
                    if pending.is_some() {
                        debug!("Dropping pending resize on shutdown");
                    }
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(size) = pending.take() {
                    apply_on_worker(&shared, size).await;
                }
            }
        }
    }
}

/// Run the blocking apply step without stalling the timer driver
async fn apply_on_worker(shared: &Arc<Shared>, size: Size) {
    let shared = shared.clone();
    if let Err(e) = tokio::task::spawn_blocking(move || shared.apply(size)).await {
        error!("Resize apply task failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[derive(Default)]
    struct RecordingTarget {
        applied: Mutex<Vec<Size>>,
    }

    impl ResizeTarget for RecordingTarget {
        fn apply_resize(&self, size: Size) -> bool {
            self.applied.lock().push(size);
            true
        }
    }

    fn coalescer(window_ms: u64) -> (ResizeCoalescer, Arc<RecordingTarget>) {
        let target = Arc::new(RecordingTarget::default());
        let coalescer =
            ResizeCoalescer::with_window(target.clone(), Duration::from_millis(window_ms))
                .unwrap();
        (coalescer, target)
    }

    fn listen(coalescer: &ResizeCoalescer) -> mpsc::Receiver<Size> {
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        coalescer.add_listener(move |size| {
            tx.lock().send(size)?;
            Ok(())
        });
        rx
    }

    #[test]
    fn test_burst_applies_last_size_once() {
        let (coalescer, target) = coalescer(150);
        let rx = listen(&coalescer);

        for width in [100, 101, 102] {
            coalescer.notify(width, 100);
            thread::sleep(Duration::from_millis(10));
        }

        let applied = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(applied, Size::new(102, 100));
        assert!(rx.recv_timeout(Duration::from_millis(400)).is_err());
        assert_eq!(coalescer.applied_count(), 1);
        assert_eq!(*target.applied.lock(), vec![Size::new(102, 100)]);
    }

    #[test]
    fn test_separate_bursts_apply_separately() {
        let (coalescer, _target) = coalescer(50);
        let rx = listen(&coalescer);

        coalescer.notify(200, 100);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Size::new(200, 100));

        coalescer.notify(300, 150);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Size::new(300, 150));
        assert_eq!(coalescer.applied_count(), 2);
    }

    #[test]
    fn test_non_positive_notifications_are_ignored() {
        let (coalescer, target) = coalescer(30);
        coalescer.notify(0, 100);
        coalescer.notify(100, -5);

        thread::sleep(Duration::from_millis(200));
        assert_eq!(coalescer.applied_count(), 0);
        assert!(target.applied.lock().is_empty());
    }

    #[test]
    fn test_force_applies_immediately_and_cancels_timer() {
        let (coalescer, _target) = coalescer(1_000);
        let rx = listen(&coalescer);

        coalescer.notify(640, 480);
        coalescer.force_resize();

        // Well inside the 1s window
        let applied = rx.recv_timeout(Duration::from_millis(500)).unwrap();
        assert_eq!(applied, Size::new(640, 480));
        // The pending timer was cancelled, so nothing follows
        assert!(rx.recv_timeout(Duration::from_millis(1_500)).is_err());
        assert_eq!(coalescer.applied_count(), 1);
    }

    #[test]
    fn test_force_without_known_size_does_nothing() {
        let (coalescer, target) = coalescer(30);
        coalescer.force_resize();
        thread::sleep(Duration::from_millis(100));
        assert!(target.applied.lock().is_empty());
    }

    #[test]
    fn test_failing_listeners_do_not_block_others() {
        let (coalescer, _target) = coalescer(20);
        coalescer.add_listener(|_| anyhow::bail!("listener error"));
        coalescer.add_listener(|_| panic!("listener panic"));
        let rx = listen(&coalescer);

        coalescer.notify(320, 200);
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), Size::new(320, 200));
    }

    #[test]
    fn test_remove_listener() {
        let (coalescer, _target) = coalescer(20);
        let (tx, rx) = mpsc::channel();
        let tx = Mutex::new(tx);
        let id = coalescer.add_listener(move |size| {
            tx.lock().send(size)?;
            Ok(())
        });

        assert!(coalescer.remove_listener(id));
        assert!(!coalescer.remove_listener(id));

        coalescer.notify(100, 100);
        thread::sleep(Duration::from_millis(200));
        assert_eq!(coalescer.applied_count(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_shutdown_cancels_pending_resize() {
        let (coalescer, target) = coalescer(200);
        coalescer.notify(500, 500);
        coalescer.shutdown();
        coalescer.shutdown();

        thread::sleep(Duration::from_millis(300));
        assert!(target.applied.lock().is_empty());

        // Notifications after shutdown are dropped quietly
        coalescer.notify(600, 600);
        coalescer.force_resize();
    }
}
