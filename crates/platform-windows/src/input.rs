//! Pointer position sources on Win32.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use shakefind_common::clock::MonotonicClock;
use shakefind_common::error::{ShakefindError, ShakefindResult};
use shakefind_platform_core::{InputBackend, PointerSample};
use windows::Win32::Foundation::{LPARAM, LRESULT, POINT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetCursorPos, PeekMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, HHOOK, MSG, MSLLHOOKSTRUCT, PM_REMOVE,
    WH_MOUSE_LL, WM_MOUSEMOVE,
};

/// Default spacing between polled samples (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Samples kept while nobody drains the hook queue.
const HOOK_QUEUE_LIMIT: usize = 1024;

/// Samples `GetCursorPos` at a fixed spacing.
///
/// Every due poll produces a sample, even when the pointer has not moved.
pub struct CursorPosBackend {
    clock: MonotonicClock,
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl CursorPosBackend {
    pub fn new(clock: MonotonicClock) -> Self {
        Self::with_interval(clock, DEFAULT_POLL_INTERVAL_MS)
    }

    pub fn with_interval(clock: MonotonicClock, interval_ms: u64) -> Self {
        Self {
            clock,
            interval_ms: interval_ms.max(1),
            last_ms: None,
        }
    }
}

impl InputBackend for CursorPosBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        let now_ms = self.clock.now_ms();
        if self
            .last_ms
            .is_some_and(|last| now_ms < last + self.interval_ms)
        {
            return Ok(None);
        }

        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| ShakefindError::input_tracking(format!("GetCursorPos failed: {e}")))?;

        self.last_ms = Some(now_ms);
        Ok(Some(PointerSample::new(point.x, point.y, now_ms)))
    }

    fn name(&self) -> &str {
        "cursor-pos"
    }

    fn is_available(&self) -> bool {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.is_ok()
    }
}

type HookQueue = Arc<Mutex<VecDeque<PointerSample>>>;

thread_local! {
    static HOOK_SINK: RefCell<Option<(HookQueue, MonotonicClock)>> = const { RefCell::new(None) };
}

unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 as u32 == WM_MOUSEMOVE {
        let hook = &*(lparam.0 as *const MSLLHOOKSTRUCT);
        HOOK_SINK.with(|sink| {
            if let Some((queue, clock)) = sink.borrow().as_ref() {
                if let Ok(mut queue) = queue.lock() {
                    if queue.len() >= HOOK_QUEUE_LIMIT {
                        queue.pop_front();
                    }
                    queue.push_back(PointerSample::new(hook.pt.x, hook.pt.y, clock.now_ms()));
                }
            }
        });
    }

    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}

/// Receives every pointer move through a `WH_MOUSE_LL` hook.
///
/// The hook lives on a dedicated thread that pumps messages; samples are
/// queued until [`poll`](InputBackend::poll) drains them.
pub struct LowLevelHookBackend {
    queue: HookQueue,
    stop_flag: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl LowLevelHookBackend {
    /// Start the hook thread and wait until the hook is installed.
    pub fn install(clock: MonotonicClock) -> ShakefindResult<Self> {
        let queue: HookQueue = Arc::new(Mutex::new(VecDeque::new()));
        let stop_flag = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        let thread_queue = Arc::clone(&queue);
        let thread_stop = Arc::clone(&stop_flag);
        let thread = thread::Builder::new()
            .name("shakefind-mouse-hook".to_string())
            .spawn(move || run_hook_thread(thread_queue, clock, thread_stop, ready_tx))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                queue,
                stop_flag,
                thread: Some(thread),
            }),
            Ok(Err(message)) => {
                let _ = thread.join();
                Err(ShakefindError::input_tracking(message))
            }
            Err(_) => {
                let _ = thread.join();
                Err(ShakefindError::input_tracking(
                    "mouse hook thread exited before reporting",
                ))
            }
        }
    }
}

fn run_hook_thread(
    queue: HookQueue,
    clock: MonotonicClock,
    stop_flag: Arc<AtomicBool>,
    ready: mpsc::Sender<Result<(), String>>,
) {
    HOOK_SINK.with(|sink| *sink.borrow_mut() = Some((queue, clock)));

    let hook = match unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), None, 0) } {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(format!("SetWindowsHookExW failed: {e}")));
            return;
        }
    };
    let _ = ready.send(Ok(()));
    tracing::debug!("Mouse hook installed");

    // Low-level hooks only fire while this thread pumps messages.
    let mut msg = MSG::default();
    while !stop_flag.load(Ordering::SeqCst) {
        unsafe {
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
        thread::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));
    }

    unsafe {
        let _ = UnhookWindowsHookEx(hook);
    }
    HOOK_SINK.with(|sink| *sink.borrow_mut() = None);
    tracing::debug!("Mouse hook removed");
}

impl InputBackend for LowLevelHookBackend {
    fn poll(&mut self) -> ShakefindResult<Option<PointerSample>> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| ShakefindError::input_tracking("mouse hook queue poisoned"))?;
        Ok(queue.pop_front())
    }

    fn name(&self) -> &str {
        "mouse-hook"
    }

    fn is_available(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for LowLevelHookBackend {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
