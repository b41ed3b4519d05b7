//! Progress reporting for long-running recognition calls.
//!
//! Backends may report from worker threads. [`ChannelProgress`] forwards
//! every report over a channel so the thread that owns the page can drain
//! the events without sharing any page state.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Receives `(index, total, message)` progress reports.
pub trait ProgressSink: Send + Sync {
    /// Report that item `index` of `total` is being processed.
    fn report(&self, index: usize, total: usize, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn report(&self, index: usize, total: usize, message: &str) {
        self(index, total, message)
    }
}

/// One progress report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Index of the item being processed
    pub index: usize,

    /// Total number of items
    pub total: usize,

    /// Human-readable status
    pub message: String,
}

impl ProgressEvent {
    /// Fraction complete in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.index as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Sink that forwards reports over a crossbeam channel.
#[derive(Debug, Clone)]
pub struct ChannelProgress {
    sender: Sender<ProgressEvent>,
}

impl ProgressSink for ChannelProgress {
    fn report(&self, index: usize, total: usize, message: &str) {
        let event = ProgressEvent {
            index,
            total,
            message: message.to_string(),
        };
        // Receiver gone means nobody is listening any more
        if self.sender.send(event).is_err() {
            log::trace!("Progress receiver dropped");
        }
    }
}

/// Create a channel-backed progress sink and its receiving end.
pub fn channel() -> (ChannelProgress, Receiver<ProgressEvent>) {
    let (sender, receiver) = unbounded();
    (ChannelProgress { sender }, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |index: usize, total: usize, message: &str| {
            seen.lock().unwrap().push(format!("{}/{} {}", index, total, message));
        };
        sink.report(1, 3, "box");
        assert_eq!(seen.into_inner().unwrap(), vec!["1/3 box".to_string()]);
    }

    #[test]
    fn test_channel_from_worker_thread() {
        let (sink, receiver) = channel();

        let worker = thread::spawn(move || {
            for i in 0..3 {
                sink.report(i + 1, 3, "recognizing");
            }
        });
        worker.join().unwrap();

        let events: Vec<ProgressEvent> = receiver.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].index, 3);
        assert_eq!(events[2].fraction(), 1.0);
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (sink, receiver) = channel();
        drop(receiver);
        sink.report(0, 1, "ignored");
    }

    #[test]
    fn test_fraction_of_empty_total() {
        let event = ProgressEvent {
            index: 0,
            total: 0,
            message: String::new(),
        };
        assert_eq!(event.fraction(), 1.0);
    }
}
