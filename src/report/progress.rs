//! Progress notifications to the host UI.

/// Receives the running count of completed tests.
pub trait ProgressSink {
    fn update_testing_progress(&mut self, completed: usize);
}

impl<F> ProgressSink for F
where
    F: FnMut(usize),
{
    fn update_testing_progress(&mut self, completed: usize) {
        self(completed)
    }
}

/// Discards progress notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update_testing_progress(&mut self, _completed: usize) {}
}
