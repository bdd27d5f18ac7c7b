use std::thread;
use std::time::Instant;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs blocking work off the UI thread.
pub trait TaskRunner {
    fn spawn(&self, task: Task);
}

pub struct ThreadRunner;

impl TaskRunner for ThreadRunner {
    fn spawn(&self, task: Task) {
        thread::spawn(task);
    }
}

pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
