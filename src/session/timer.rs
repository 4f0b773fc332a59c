use log::{debug, info, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::SessionConfig;

/// Session length in ticks when nothing else is configured
pub const DEFAULT_TIMEOUT_SECONDS: u32 = 300;

/// Lifecycle of one countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
    Expired,
}

/// What a tick produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    Expired,
}

/// The countdown state machine, without any notion of wall time.
///
/// `start` (re)arms it at the initial count. Every `tick` while running
/// decrements the count; the tick that reaches zero returns
/// [`Tick::Expired`] and moves to [`TimerState::Expired`]. Ticks in any other
/// state return `None`.
#[derive(Debug, Clone)]
pub struct Countdown {
    initial: u32,
    remaining: u32,
    state: TimerState,
}

impl Countdown {
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            remaining: initial,
            state: TimerState::Stopped,
        }
    }

    /// Arm the countdown at its initial value and return that value
    pub fn start(&mut self) -> u32 {
        self.remaining = self.initial;
        self.state = TimerState::Running;
        self.remaining
    }

    pub fn tick(&mut self) -> Option<Tick> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = TimerState::Expired;
            Some(Tick::Expired)
        } else {
            Some(Tick::Remaining(self.remaining))
        }
    }

    pub fn stop(&mut self) {
        if self.state == TimerState::Running {
            self.state = TimerState::Stopped;
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> TimerState {
        self.state
    }
}

/// Handle to a running countdown thread. Dropping it stops the countdown.
#[derive(Debug)]
pub struct TimerHandle {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Whether the countdown is still ticking
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().map_or(false, |w| !w.is_finished())
    }

    /// Stop the countdown and wait for its thread to exit.
    ///
    /// No callback runs after this returns. Must not be called from inside
    /// the timer's own callbacks.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the worker immediately
        self.stop_tx.take();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Session timer thread panicked");
            }
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a countdown of `initial` ticks, one tick every `interval`.
///
/// `on_tick` receives the initial value right away and then every remaining
/// count down to zero. `on_expire` runs once, right after the zero tick.
/// Both run on the timer thread.
pub fn start_timer<T, E>(
    initial: u32,
    interval: Duration,
    mut on_tick: T,
    on_expire: E,
) -> TimerHandle
where
    T: FnMut(u32) + Send + 'static,
    E: FnOnce() + Send + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let worker = thread::spawn(move || {
        let mut countdown = Countdown::new(initial);
        on_tick(countdown.start());

        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                // stop requested or handle dropped
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    debug!("Session timer stopped with {} ticks left", countdown.remaining());
                    return;
                }
            }

            match countdown.tick() {
                Some(Tick::Remaining(remaining)) => on_tick(remaining),
                Some(Tick::Expired) => {
                    on_tick(0);
                    info!("Session timer expired");
                    on_expire();
                    return;
                }
                None => return,
            }
        }
    });

    TimerHandle {
        stop_tx: Some(stop_tx),
        worker: Some(worker),
    }
}

/// Stop a countdown started with [`start_timer`]
pub fn stop_timer(mut handle: TimerHandle) {
    handle.stop();
}

/// Owns the single countdown of a session.
///
/// Starting a new countdown always stops the previous one first, so at most
/// one is active.
#[derive(Debug)]
pub struct SessionTimer {
    timeout: u32,
    interval: Duration,
    active: Option<TimerHandle>,
}

impl SessionTimer {
    pub fn new(timeout: u32, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            active: None,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.timeout_seconds, Duration::from_millis(config.tick_millis))
    }

    /// Stop any running countdown and start a fresh one at the full timeout
    pub fn restart<T, E>(&mut self, on_tick: T, on_expire: E)
    where
        T: FnMut(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.stop();
        debug!("Starting session timer at {} ticks", self.timeout);
        self.active = Some(start_timer(self.timeout, self.interval, on_tick, on_expire));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            stop_timer(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().map_or(false, TimerHandle::is_running)
    }

    pub fn timeout(&self) -> u32 {
        self.timeout
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECONDS, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Receiver;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_countdown_expires_once_after_full_run() {
        let mut countdown = Countdown::new(DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(countdown.state(), TimerState::Stopped);
        assert_eq!(countdown.tick(), None);

        assert_eq!(countdown.start(), 300);

        let mut expirations = 0;
        let mut emitted = Vec::new();
        for _ in 0..DEFAULT_TIMEOUT_SECONDS {
            match countdown.tick() {
                Some(Tick::Remaining(r)) => emitted.push(r),
                Some(Tick::Expired) => expirations += 1,
                None => panic!("countdown stopped early"),
            }
        }

        assert_eq!(expirations, 1);
        assert_eq!(emitted.len(), 299);
        assert_eq!(emitted.first(), Some(&299));
        assert_eq!(emitted.last(), Some(&1));
        assert_eq!(countdown.state(), TimerState::Expired);
        assert_eq!(countdown.tick(), None);
    }

    #[test]
    fn test_countdown_restart_resets_count() {
        let mut countdown = Countdown::new(300);
        countdown.start();
        for _ in 0..120 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining(), 180);

        assert_eq!(countdown.start(), 300);
        assert_eq!(countdown.tick(), Some(Tick::Remaining(299)));
    }

    #[test]
    fn test_stopped_countdown_does_not_tick() {
        let mut countdown = Countdown::new(5);
        countdown.start();
        countdown.stop();
        assert_eq!(countdown.state(), TimerState::Stopped);
        assert_eq!(countdown.tick(), None);
    }

    fn channels() -> ((Sender<u32>, Receiver<u32>), (Sender<()>, Receiver<()>)) {
        (mpsc::channel(), mpsc::channel())
    }

    #[test]
    fn test_timer_thread_ticks_down_and_expires() {
        let ((tick_tx, tick_rx), (expire_tx, expire_rx)) = channels();

        let handle = start_timer(
            3,
            Duration::from_millis(5),
            move |remaining| {
                let _ = tick_tx.send(remaining);
            },
            move || {
                let _ = expire_tx.send(());
            },
        );

        expire_rx.recv_timeout(WAIT).expect("timer should expire");
        stop_timer(handle);

        let ticks: Vec<u32> = tick_rx.try_iter().collect();
        assert_eq!(ticks, vec![3, 2, 1, 0]);
        assert!(expire_rx.try_recv().is_err());
    }

    #[test]
    fn test_restart_silences_previous_timer() {
        let mut timer = SessionTimer::new(50, Duration::from_millis(5));

        let ((first_tx, first_rx), _) = channels();
        timer.restart(
            move |remaining| {
                let _ = first_tx.send(remaining);
            },
            || {},
        );
        assert_eq!(first_rx.recv_timeout(WAIT), Ok(50));
        assert_eq!(first_rx.recv_timeout(WAIT), Ok(49));

        let ((second_tx, second_rx), _) = channels();
        timer.restart(
            move |remaining| {
                let _ = second_tx.send(remaining);
            },
            || {},
        );
        assert!(timer.is_running());

        // the first thread has been joined and its callback dropped
        let _: Vec<u32> = first_rx.try_iter().collect();
        assert_eq!(first_rx.try_recv(), Err(mpsc::TryRecvError::Disconnected));

        assert_eq!(second_rx.recv_timeout(WAIT), Ok(50));

        timer.stop();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_stopped_timer_never_expires() {
        let ((_, _), (expire_tx, expire_rx)) = channels();
        let mut timer = SessionTimer::new(2, Duration::from_millis(50));
        timer.restart(|_| {}, move || {
            let _ = expire_tx.send(());
        });
        timer.stop();

        assert_eq!(
            expire_rx.recv_timeout(Duration::from_millis(300)),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
