// Session lifetime
// The inactivity countdown that logs a session out.

pub mod timer;

pub use timer::{
    start_timer, stop_timer, Countdown, SessionTimer, Tick, TimerHandle, TimerState,
    DEFAULT_TIMEOUT_SECONDS,
};
