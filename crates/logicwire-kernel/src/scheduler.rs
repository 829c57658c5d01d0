//! Agenda - cooperative FIFO work queue
//!
//! Signal writes never re-enter the kernel synchronously beyond a connector
//! resync: element actions and observer deliveries are appended here and
//! executed in strict scheduling order by a single, non-reentrant drain.

use std::collections::VecDeque;
use std::convert::Infallible;

/// Outcome of a single drain call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainOutcome {
    /// Tasks executed by this drain
    pub executed: usize,
    /// Drain stopped by `halt()` with work still queued
    pub halted: bool,
    /// Drain was requested while another drain was in progress
    pub reentrant: bool,
}

/// FIFO scheduler
#[derive(Debug)]
pub struct Scheduler<T> {
    queue: VecDeque<T>,
    running: bool,
    halt_requested: bool,
    total_scheduled: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Scheduler {
            queue: VecDeque::new(),
            running: false,
            halt_requested: false,
            total_scheduled: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Scheduler {
            queue: VecDeque::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Append a task
    pub fn schedule(&mut self, task: T) {
        self.total_scheduled += 1;
        self.queue.push_back(task);
    }

    /// Stop the current drain after its in-flight task.
    ///
    /// Remaining tasks stay queued.
    pub fn halt(&mut self) {
        if self.running {
            self.running = false;
            self.halt_requested = true;
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Tasks ever scheduled
    #[inline]
    pub fn total_scheduled(&self) -> u64 {
        self.total_scheduled
    }

    /// Drop all queued tasks
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Enter the running state. Returns false if a drain is already active.
    pub fn begin(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.halt_requested = false;
        true
    }

    /// Next task of the active drain, or `None` once halted or empty.
    pub fn next(&mut self) -> Option<T> {
        if !self.running {
            return None;
        }
        self.queue.pop_front()
    }

    /// Leave the running state. Returns whether the drain was halted.
    pub fn finish(&mut self) -> bool {
        self.running = false;
        std::mem::take(&mut self.halt_requested)
    }

    /// Drop queued tasks for which `keep` returns false. Order of the
    /// remaining tasks is unchanged.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.queue.retain(keep);
    }

    /// Drain the queue, handing each task to `f`
    pub fn drain<F>(&mut self, mut f: F) -> DrainOutcome
    where
        F: FnMut(T),
    {
        self.drain_with(|_, task| f(task))
    }

    /// Drain the queue, handing each task to `f` together with the
    /// scheduler so the task can schedule follow-up work or halt.
    pub fn drain_with<F>(&mut self, mut f: F) -> DrainOutcome
    where
        F: FnMut(&mut Self, T),
    {
        let outcome = Self::drain_host(self, itself, usize::MAX, |agenda, task| {
            f(agenda, task);
            Ok::<(), Infallible>(())
        });
        match outcome {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Drain a scheduler owned by `host`.
    ///
    /// `agenda` projects the scheduler out of the host, so `run` gets the
    /// whole host and may schedule more work through it. The drain halts
    /// after `limit` tasks if work remains. An error from `run` ends the
    /// drain and leaves the rest of the queue in place.
    pub fn drain_host<H, E, F>(
        host: &mut H,
        agenda: fn(&mut H) -> &mut Scheduler<T>,
        limit: usize,
        mut run: F,
    ) -> Result<DrainOutcome, E>
    where
        F: FnMut(&mut H, T) -> Result<(), E>,
    {
        if !agenda(host).begin() {
            return Ok(DrainOutcome {
                reentrant: true,
                ..DrainOutcome::default()
            });
        }

        let mut executed = 0;
        while let Some(task) = agenda(host).next() {
            if let Err(err) = run(host, task) {
                agenda(host).finish();
                return Err(err);
            }
            executed += 1;

            let queue = agenda(host);
            if executed >= limit && !queue.is_empty() {
                queue.halt();
            }
        }

        let halted = agenda(host).finish();
        Ok(DrainOutcome {
            executed,
            halted,
            reentrant: false,
        })
    }
}

fn itself<T>(scheduler: &mut Scheduler<T>) -> &mut Scheduler<T> {
    scheduler
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_runs_everything_once() {
        let mut agenda = Scheduler::new();
        agenda.schedule("a");
        agenda.schedule("b");

        let mut seen = Vec::new();
        let outcome = agenda.drain(|task| seen.push(task));

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(outcome.executed, 2);
        assert!(agenda.is_empty());
        assert_eq!(agenda.drain(|_| {}).executed, 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut agenda = Scheduler::new();
        for i in 0..5 {
            agenda.schedule(i);
        }

        let mut seen = Vec::new();
        let outcome = agenda.drain_with(|_, task| seen.push(task));

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(outcome.executed, 5);
        assert!(!outcome.halted);
        assert!(agenda.is_empty());
        assert!(!agenda.is_running());
    }

    #[test]
    fn test_tasks_scheduled_during_drain_run_last() {
        let mut agenda = Scheduler::new();
        agenda.schedule(1u32);
        agenda.schedule(2u32);

        let mut seen = Vec::new();
        agenda.drain_with(|agenda, task| {
            seen.push(task);
            if task < 10 {
                agenda.schedule(task * 10);
            }
        });

        assert_eq!(seen, vec![1, 2, 10, 20]);
    }

    #[test]
    fn test_nested_drain_is_noop() {
        let mut agenda = Scheduler::new();
        agenda.schedule(0u8);
        agenda.schedule(1u8);

        let mut nested = Vec::new();
        agenda.drain_with(|agenda, _| {
            nested.push(agenda.drain_with(|_, _| unreachable!()));
        });

        assert_eq!(nested.len(), 2);
        assert!(nested.iter().all(|outcome| outcome.reentrant && outcome.executed == 0));
    }

    #[test]
    fn test_halt_leaves_remaining_tasks() {
        let mut agenda = Scheduler::new();
        for i in 0..4 {
            agenda.schedule(i);
        }

        let mut seen = Vec::new();
        let outcome = agenda.drain_with(|agenda, task| {
            seen.push(task);
            if task == 1 {
                agenda.halt();
            }
        });

        assert_eq!(seen, vec![0, 1]);
        assert!(outcome.halted);
        assert_eq!(agenda.len(), 2);

        // A later drain picks up where the halted one stopped
        let mut rest = Vec::new();
        let outcome = agenda.drain_with(|_, task| rest.push(task));
        assert_eq!(rest, vec![2, 3]);
        assert!(!outcome.halted);
    }

    #[test]
    fn test_halt_outside_drain_is_ignored() {
        let mut agenda: Scheduler<u8> = Scheduler::new();
        agenda.halt();
        agenda.schedule(1);
        let outcome = agenda.drain_with(|_, _| {});
        assert_eq!(outcome.executed, 1);
        assert!(!outcome.halted);
    }

    struct Host {
        agenda: Scheduler<u32>,
        seen: Vec<u32>,
    }

    fn host_agenda(host: &mut Host) -> &mut Scheduler<u32> {
        &mut host.agenda
    }

    #[test]
    fn test_host_drain_stops_at_limit() {
        let mut host = Host {
            agenda: Scheduler::new(),
            seen: Vec::new(),
        };
        host.agenda.schedule(0);

        // Every task schedules its successor, so only the limit ends the drain
        let outcome = Scheduler::drain_host(&mut host, host_agenda, 5, |host, task| {
            host.seen.push(task);
            host.agenda.schedule(task + 1);
            Ok::<(), ()>(())
        })
        .unwrap();

        assert_eq!(host.seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(outcome.executed, 5);
        assert!(outcome.halted);
        assert_eq!(host.agenda.len(), 1);
        assert!(!host.agenda.is_running());
    }

    #[test]
    fn test_host_drain_error_keeps_rest_queued() {
        let mut host = Host {
            agenda: Scheduler::new(),
            seen: Vec::new(),
        };
        for i in 0..4 {
            host.agenda.schedule(i);
        }

        let result = Scheduler::drain_host(&mut host, host_agenda, usize::MAX, |host, task| {
            if task == 2 {
                return Err(task);
            }
            host.seen.push(task);
            Ok(())
        });

        assert_eq!(result, Err(2));
        assert_eq!(host.seen, vec![0, 1]);
        assert_eq!(host.agenda.len(), 1);
        assert!(!host.agenda.is_running());
    }
}
