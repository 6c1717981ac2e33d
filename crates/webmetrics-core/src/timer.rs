//! Per-request latency bracket.
//!
//! A `RequestTimer` runs the path timer and the aggregate timer side by
//! side. Requests to the aggregate key itself only feed the aggregate timer
//! so one request never counts twice in the same series.

use std::mem;

use crate::backend::TimerContext;
use crate::path::PathKey;
use crate::registry::MetricRegistry;

enum State {
    Idle,
    Running {
        path: Option<TimerContext>,
        total: TimerContext,
    },
    Stopped,
}

/// Single-use timer: idle -> running -> stopped.
pub struct RequestTimer {
    path: PathKey,
    state: State,
}

impl RequestTimer {
    pub fn new(path: PathKey) -> Self {
        Self {
            path,
            state: State::Idle,
        }
    }

    pub fn path(&self) -> &PathKey {
        &self.path
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Begin timing. Only the first call from the idle state has any effect.
    pub fn start(&mut self, registry: &MetricRegistry) {
        if !matches!(self.state, State::Idle) {
            return;
        }
        let path = if self.path.is_total() {
            None
        } else {
            Some(TimerContext::start(registry.resolve_timer(&self.path)))
        };
        let total = TimerContext::start(registry.resolve_timer(&PathKey::total()));
        self.state = State::Running { path, total };
    }

    /// Record elapsed time into every started series.
    ///
    /// Returns the number of observations recorded: 2 for a regular path,
    /// 1 for the aggregate key, 0 if the timer was not running.
    pub fn stop(&mut self) -> usize {
        match mem::replace(&mut self.state, State::Stopped) {
            State::Running { path, total } => {
                let mut recorded = 0;
                if let Some(ctx) = path {
                    ctx.stop();
                    recorded += 1;
                }
                total.stop();
                recorded + 1
            }
            State::Idle => {
                self.state = State::Idle;
                0
            }
            State::Stopped => 0,
        }
    }
}
