//! Sequential task queue.
//!
//! A [`TaskQueue`] is an unbounded FIFO drained by exactly one worker
//! (see [`worker`]). The worker takes a task with [`TaskQueue::next`],
//! runs it to completion and reports back with [`TaskQueue::finish`]
//! before the next task is handed out, so at most one task is in flight.

pub mod task;
pub mod worker;

use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use tracing::debug;

pub use task::{Origin, Task, TaskKind};

/// Consecutive failures tolerated for a repeated task before it is dropped.
pub const MAX_REPEAT_ATTEMPTS: u32 = 3;

/// Loop and repeat are two values of one mode, so they can never both be on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    Off,
    /// Repeat the current task.
    Song,
    /// Re-append every dequeued task to the tail.
    Queue,
}

impl std::fmt::Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Song => write!(f, "repeat current"),
            Self::Queue => write!(f, "loop queue"),
        }
    }
}

impl std::str::FromStr for LoopMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "song" | "repeat" | "one" => Ok(Self::Song),
            "queue" | "loop" | "all" => Ok(Self::Queue),
            other => Err(format!("unknown loop mode `{other}`")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Playing,
    TornDown,
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<Task>,
    current: Option<Task>,
    in_flight: bool,
    loop_mode: LoopMode,
    skip_requested: bool,
    repeat_failures: u32,
    torn_down: bool,
}

impl QueueState {
    fn take_next(&mut self) -> Option<Task> {
        if self.loop_mode == LoopMode::Song && !self.skip_requested {
            if let Some(current) = &self.current {
                return Some(current.clone());
            }
        }
        self.skip_requested = false;
        self.repeat_failures = 0;

        let next = self.pending.pop_front();
        if self.loop_mode == LoopMode::Queue {
            if let Some(task) = &next {
                self.pending.push_back(task.clone());
            }
        }
        self.current = next.clone();
        next
    }
}

pub struct TaskQueue {
    state: Mutex<QueueState>,
    ready: Notify,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            ready: Notify::new(),
        }
    }

    /// Appends `task` and returns its 1-based position among pending tasks.
    pub async fn enqueue(&self, task: Task) -> usize {
        let position = {
            let mut state = self.state.lock().await;
            state.pending.push_back(task);
            state.pending.len()
        };
        self.ready.notify_one();
        position
    }

    /// Waits for the next task to execute. Returns `None` once the queue has
    /// been torn down.
    pub async fn next(&self) -> Option<Task> {
        loop {
            {
                let mut state = self.state.lock().await;
                if state.torn_down {
                    return None;
                }
                if let Some(task) = state.take_next() {
                    state.in_flight = true;
                    return Some(task);
                }
            }
            self.ready.notified().await;
        }
    }

    /// Marks the in-flight task as done. A failed task under repeat stays in
    /// place until it has failed [`MAX_REPEAT_ATTEMPTS`] times in a row.
    pub async fn finish(&self, succeeded: bool) {
        let mut state = self.state.lock().await;
        state.in_flight = false;

        if succeeded {
            state.repeat_failures = 0;
        } else if state.loop_mode == LoopMode::Song {
            state.repeat_failures += 1;
            if state.repeat_failures >= MAX_REPEAT_ATTEMPTS {
                debug!("dropping repeated task after {} failures", state.repeat_failures);
                state.current = None;
                state.repeat_failures = 0;
            }
        }
    }

    /// Drops every not-yet-started task. The in-flight task keeps running but
    /// will not be offered again.
    pub async fn clear(&self) -> usize {
        let mut state = self.state.lock().await;
        let dropped = state.pending.len();
        state.pending.clear();
        state.current = None;
        state.skip_requested = false;
        dropped
    }

    /// Makes the next dequeue advance even when repeating.
    pub async fn skip(&self) {
        self.state.lock().await.skip_requested = true;
    }

    /// Clears the queue, resets the controller flags and stops the worker once
    /// the task it is running, if any, has finished.
    pub async fn teardown(&self) {
        {
            let mut state = self.state.lock().await;
            state.pending.clear();
            state.current = None;
            state.loop_mode = LoopMode::Off;
            state.skip_requested = false;
            state.repeat_failures = 0;
            state.torn_down = true;
        }
        self.ready.notify_one();
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;
        if state.torn_down {
            SessionStatus::TornDown
        } else if state.in_flight {
            SessionStatus::Playing
        } else {
            SessionStatus::Idle
        }
    }

    pub async fn set_loop_mode(&self, mode: LoopMode) -> LoopMode {
        let mut state = self.state.lock().await;
        state.loop_mode = mode;
        state.repeat_failures = 0;
        mode
    }

    pub async fn loop_mode(&self) -> LoopMode {
        self.state.lock().await.loop_mode
    }

    /// The task most recently handed out, if it has not been cleared.
    pub async fn current(&self) -> Option<Task> {
        self.state.lock().await.current.clone()
    }

    pub async fn snapshot(&self) -> (Option<Task>, Vec<Task>) {
        let state = self.state.lock().await;
        (state.current.clone(), state.pending.iter().cloned().collect())
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    pub async fn is_empty(&self) -> bool {
        let state = self.state.lock().await;
        !state.in_flight && state.pending.is_empty()
    }

    pub async fn shuffle(&self) -> usize {
        use rand::seq::SliceRandom;

        let mut state = self.state.lock().await;
        let mut tasks: Vec<Task> = state.pending.drain(..).collect();
        tasks.shuffle(&mut rand::thread_rng());
        let len = tasks.len();
        state.pending = tasks.into();
        len
    }

    /// Removes the pending task at 1-based `position`.
    pub async fn remove_at(&self, position: usize) -> Option<Task> {
        let mut state = self.state.lock().await;
        if position > 0 && position <= state.pending.len() {
            state.pending.remove(position - 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_mode_display() {
        assert_eq!(LoopMode::Off.to_string(), "off");
        assert_eq!(LoopMode::Song.to_string(), "repeat current");
        assert_eq!(LoopMode::Queue.to_string(), "loop queue");
    }

    #[test]
    fn test_loop_mode_parse() {
        assert_eq!("OFF".parse::<LoopMode>(), Ok(LoopMode::Off));
        assert_eq!("song".parse::<LoopMode>(), Ok(LoopMode::Song));
        assert_eq!("queue".parse::<LoopMode>(), Ok(LoopMode::Queue));
        assert!("sideways".parse::<LoopMode>().is_err());
    }

    #[tokio::test]
    async fn test_new_queue_is_idle() {
        let q = TaskQueue::new();
        assert!(q.is_empty().await);
        assert_eq!(q.status().await, SessionStatus::Idle);
        assert_eq!(q.loop_mode().await, LoopMode::Off);
        assert!(q.current().await.is_none());
    }
}
