// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Frame-budgeted deferred-task scheduler.
//!
//! Background work is queued under a deduplication key from any thread and
//! drained FIFO on the render thread while frame time remains. A queue that
//! goes unserved for [`STARVATION_PURGE_FRAME_COUNT`] consecutive frames is
//! force-drained in full, trading one long frame for a hard bound on how
//! long deferred work can be postponed.

use crate::frame::timer::FrameTimer;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// A deferred unit of work. Runs exactly once on the render thread.
pub type FrameTask = Box<dyn FnOnce() + Send>;

/// Number of consecutive starved frames after which the scheduler drains the
/// queue synchronously, ignoring the frame budget.
pub const STARVATION_PURGE_FRAME_COUNT: u32 = 60;

/// Pending tasks plus the set of keys currently queued.
///
/// Invariant: a key is in `queued_keys` iff exactly one entry in `tasks`
/// carries it. The key leaves the set at dequeue time, before the task body
/// runs, so a task may reschedule itself under its own key.
struct TaskQueue {
    tasks: VecDeque<(String, FrameTask)>,
    queued_keys: HashSet<String>,
}

/// Queues deferred background tasks and drains them against the per-frame
/// time budget.
///
/// One scheduler exists per render session, owned by the driver and shared
/// (via `Arc`) with any producer threads that enqueue work. The internal
/// mutex guards only queue mutation; it is never held while a task body
/// runs, so long tasks cannot block producers.
pub struct FrameScheduler {
    queue: Mutex<TaskQueue>,
    // Consecutive frames in which tasks were pending but none ran. Only the
    // render thread writes it from process_tasks; stats readers may race.
    starved_frames: AtomicU32,
    budget_enforced: AtomicBool,
}

impl FrameScheduler {
    /// Creates an empty scheduler with budget enforcement on.
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(TaskQueue {
                tasks: VecDeque::new(),
                queued_keys: HashSet::new(),
            }),
            starved_frames: AtomicU32::new(0),
            budget_enforced: AtomicBool::new(true),
        }
    }

    /// Enables or disables the frame-budget check in
    /// [`process_tasks`](FrameScheduler::process_tasks).
    ///
    /// On emulated or software-rendered hosts the frame budget is already
    /// spent by the time the scheduler runs, every frame; with the check on,
    /// such hosts would only ever drain through starvation purges. Drivers
    /// for those hosts turn the check off at init.
    pub fn set_budget_enforced(&self, enforced: bool) {
        self.budget_enforced.store(enforced, Ordering::Relaxed);
        log::debug!("FrameScheduler: budget enforcement set to {enforced}");
    }

    /// Returns `true` iff a task with this key is currently pending.
    pub fn is_task_queued(&self, key: &str) -> bool {
        let queue = self.queue.lock().unwrap();
        queue.queued_keys.contains(key)
    }

    /// Number of tasks currently pending.
    pub fn pending_task_count(&self) -> usize {
        let queue = self.queue.lock().unwrap();
        queue.tasks.len()
    }

    /// Consecutive frames the queue has gone unserved. Reset whenever a
    /// frame processes at least one task, and by a starvation purge.
    pub fn starved_frame_count(&self) -> u32 {
        self.starved_frames.load(Ordering::Relaxed)
    }

    /// Queues `task` at the tail under `key`, unless a task with the same
    /// key is already pending.
    ///
    /// Duplicate scheduling is a silent no-op: the first task queued under a
    /// key wins until it is drained. This coalesces repeated requests for
    /// the same deferred work (a texture upload requested by both eyes of a
    /// frame must still run once). Callable from any thread; never fails.
    pub fn schedule_task(&self, key: &str, task: FrameTask) {
        let mut queue = self.queue.lock().unwrap();
        if !queue.queued_keys.insert(key.to_owned()) {
            log::trace!("FrameScheduler: task '{key}' already queued, coalescing");
            return;
        }
        queue.tasks.push_back((key.to_owned(), task));
        log::trace!(
            "FrameScheduler: queued task '{key}' ({} pending)",
            queue.tasks.len()
        );
    }

    /// Drains pending tasks FIFO while `timer` reports frame time remaining.
    ///
    /// Invoked once per frame on the render thread. The queue lock is
    /// released before each task body runs. A frame that finds tasks
    /// pending but completes none of them counts as starved; after
    /// [`STARVATION_PURGE_FRAME_COUNT`] consecutive starved frames every
    /// task pending at that point is drained synchronously, ignoring the
    /// budget.
    ///
    /// Tasks are opaque: a panicking task propagates out of this call, so
    /// task bodies must be panic-safe if later tasks in the same frame are
    /// to run.
    pub fn process_tasks(&self, timer: &FrameTimer) {
        let budget_enforced = self.budget_enforced.load(Ordering::Relaxed);
        let mut processed: u32 = 0;

        loop {
            if budget_enforced && !timer.is_time_remaining_in_frame() {
                break;
            }
            match self.dequeue_task() {
                Some((key, task)) => {
                    log::trace!("FrameScheduler: running task '{key}'");
                    task();
                    processed += 1;
                }
                None => break,
            }
        }

        let pending = self.pending_task_count();
        if processed > 0 {
            self.starved_frames.store(0, Ordering::Relaxed);
        } else if pending > 0 {
            let starved = self.starved_frames.fetch_add(1, Ordering::Relaxed) + 1;
            log::trace!("FrameScheduler: starved frame {starved} ({pending} tasks pending)");
            if starved >= STARVATION_PURGE_FRAME_COUNT {
                log::warn!(
                    "FrameScheduler: {starved} consecutive starved frames, force-draining {pending} tasks"
                );
                self.force_drain();
                self.starved_frames.store(0, Ordering::Relaxed);
            }
        }
    }

    /// Pops the head task and releases its key, under the lock.
    fn dequeue_task(&self) -> Option<(String, FrameTask)> {
        let mut queue = self.queue.lock().unwrap();
        let (key, task) = queue.tasks.pop_front()?;
        queue.queued_keys.remove(&key);
        Some((key, task))
    }

    /// Runs every task pending at the moment of the call, in FIFO order,
    /// with no budget checks. Tasks scheduled while the drain runs keep
    /// their place at the tail and wait for the next frame.
    fn force_drain(&self) {
        let snapshot = self.pending_task_count();
        for _ in 0..snapshot {
            match self.dequeue_task() {
                Some((key, task)) => {
                    log::trace!("FrameScheduler: purging task '{key}'");
                    task();
                }
                None => break,
            }
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending_tasks", &self.pending_task_count())
            .field("starved_frames", &self.starved_frame_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn generous_timer() -> FrameTimer {
        FrameTimer::new(Duration::from_secs(60))
    }

    fn expired_timer() -> FrameTimer {
        FrameTimer::new(Duration::ZERO)
    }

    #[test]
    fn duplicate_key_is_coalesced_first_wins() {
        let scheduler = FrameScheduler::new();
        let ran = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let ran = Arc::clone(&ran);
            scheduler.schedule_task("upload", Box::new(move || ran.lock().unwrap().push(tag)));
            assert_eq!(scheduler.pending_task_count(), 1, "queue length must stay 1");
        }
        assert!(scheduler.is_task_queued("upload"));

        scheduler.process_tasks(&generous_timer());
        assert_eq!(*ran.lock().unwrap(), vec!["first"]);
        assert!(!scheduler.is_task_queued("upload"));
    }

    #[test]
    fn tasks_drain_in_fifo_order() {
        let scheduler = FrameScheduler::new();
        let ran = Arc::new(Mutex::new(Vec::new()));

        for key in ["a", "b", "c"] {
            let ran = Arc::clone(&ran);
            scheduler.schedule_task(key, Box::new(move || ran.lock().unwrap().push(key)));
        }
        scheduler.process_tasks(&generous_timer());
        assert_eq!(*ran.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.pending_task_count(), 0);
    }

    #[test]
    fn key_is_reusable_after_drain() {
        let scheduler = FrameScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let count = Arc::clone(&count);
            scheduler.schedule_task(
                "recompile",
                Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                }),
            );
            scheduler.process_tasks(&generous_timer());
        }
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn task_may_reschedule_itself() {
        let scheduler = Arc::new(FrameScheduler::new());
        let count = Arc::new(AtomicUsize::new(0));

        let sched = Arc::clone(&scheduler);
        let c = Arc::clone(&count);
        scheduler.schedule_task(
            "retry",
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
                // The key was released at dequeue, so this enqueues.
                let c2 = Arc::clone(&c);
                sched.schedule_task(
                    "retry",
                    Box::new(move || {
                        c2.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        // Same pass picks up the rescheduled task; budget is generous.
        scheduler.process_tasks(&generous_timer());
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.pending_task_count(), 0);
    }

    #[test]
    fn expired_budget_runs_nothing_and_counts_starvation() {
        let scheduler = FrameScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ran);
        scheduler.schedule_task(
            "stalled",
            Box::new(move || {
                r.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.process_tasks(&expired_timer());
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.starved_frame_count(), 1);
        assert_eq!(scheduler.pending_task_count(), 1);
    }

    #[test]
    fn starvation_purge_drains_everything_on_frame_sixty() {
        let scheduler = FrameScheduler::new();
        let ran = Arc::new(Mutex::new(Vec::new()));
        for key in ["a", "b", "c"] {
            let ran = Arc::clone(&ran);
            scheduler.schedule_task(key, Box::new(move || ran.lock().unwrap().push(key)));
        }

        let timer = expired_timer();
        for frame in 1..STARVATION_PURGE_FRAME_COUNT {
            scheduler.process_tasks(&timer);
            assert_eq!(scheduler.starved_frame_count(), frame);
            assert!(ran.lock().unwrap().is_empty());
        }

        // Frame 60: the threshold is reached and the purge drains all three
        // tasks in order, without budget checks.
        scheduler.process_tasks(&timer);
        assert_eq!(*ran.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.starved_frame_count(), 0);
        assert_eq!(scheduler.pending_task_count(), 0);
    }

    #[test]
    fn processing_any_task_resets_starvation() {
        let scheduler = FrameScheduler::new();
        scheduler.schedule_task("x", Box::new(|| {}));

        for _ in 0..10 {
            scheduler.process_tasks(&expired_timer());
        }
        assert_eq!(scheduler.starved_frame_count(), 10);

        scheduler.schedule_task("y", Box::new(|| {}));
        scheduler.process_tasks(&generous_timer());
        assert_eq!(scheduler.starved_frame_count(), 0);
        assert_eq!(scheduler.pending_task_count(), 0);
    }

    #[test]
    fn unenforced_budget_drains_on_expired_timer() {
        let scheduler = FrameScheduler::new();
        scheduler.set_budget_enforced(false);
        let ran = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&ran);
        scheduler.schedule_task(
            "slow-host",
            Box::new(move || {
                r.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.process_tasks(&expired_timer());
        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.starved_frame_count(), 0);
    }

    #[test]
    fn producers_may_schedule_from_other_threads() {
        let scheduler = Arc::new(FrameScheduler::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let sched = Arc::clone(&scheduler);
            handles.push(thread::spawn(move || {
                for j in 0..8 {
                    sched.schedule_task(&format!("t{i}-{j}"), Box::new(|| {}));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(scheduler.pending_task_count(), 32);
        scheduler.process_tasks(&generous_timer());
        assert_eq!(scheduler.pending_task_count(), 0);
    }
}
