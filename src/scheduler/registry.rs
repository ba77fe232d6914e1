use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// The entire observable outcome of one job invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failure,
}

/// Body of a recurring job. One invocation runs to completion before the
/// next tick may start; the scheduler never overlaps invocations of the
/// same job.
pub trait PeriodicJob: Send + Sync + 'static {
    fn run(&self) -> impl Future<Output = JobOutcome> + Send;
}

/// Network reachability probe consulted before each run of a job that
/// requires connectivity.
pub trait Connectivity: Send + Sync + 'static {
    fn is_online(&self) -> bool;
}

/// Probe for environments without a reachability signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
pub struct JobSpec {
    pub name: String,
    pub interval: Duration,
    /// When set, ticks with the probe reporting offline are skipped
    /// entirely - not counted as failures.
    pub requires_network: bool,
}

/// In-process registry of named periodic jobs.
///
/// Each registered job owns one spawned task that ticks on a fixed
/// interval. The first tick fires immediately on registration.
pub struct JobScheduler<C> {
    probe: Arc<C>,
    jobs: HashMap<String, JoinHandle<()>>,
}

impl<C: Connectivity> JobScheduler<C> {
    pub fn new(probe: C) -> Self {
        Self {
            probe: Arc::new(probe),
            jobs: HashMap::new(),
        }
    }

    /// Register `job` under `spec.name`, replacing any pending instance of
    /// the same name. Registration is idempotent: however many times a name
    /// is registered, exactly one task for it is scheduled.
    pub fn register<J: PeriodicJob>(&mut self, spec: JobSpec, job: J) {
        if let Some(previous) = self.jobs.remove(&spec.name) {
            debug!(job = %spec.name, "Replacing scheduled job");
            previous.abort();
        }
        let name = spec.name.clone();
        let handle = tokio::spawn(run_job(spec, job, Arc::clone(&self.probe)));
        self.jobs.insert(name, handle);
    }

    /// Cancel a job. Returns false if no job with that name is registered.
    pub fn deregister(&mut self, name: &str) -> bool {
        match self.jobs.remove(name) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }
}

impl<C> Drop for JobScheduler<C> {
    fn drop(&mut self) {
        for handle in self.jobs.values() {
            handle.abort();
        }
    }
}

async fn run_job<C: Connectivity, J: PeriodicJob>(spec: JobSpec, job: J, probe: Arc<C>) {
    let mut interval = tokio::time::interval(spec.interval);
    // A late tick shifts the cadence instead of bursting to catch up
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        if spec.requires_network && !probe.is_online() {
            debug!(job = %spec.name, "Offline, skipping run");
            continue;
        }

        match job.run().await {
            JobOutcome::Success => debug!(job = %spec.name, "Job succeeded"),
            // No retry or backoff here; the next tick is the retry
            JobOutcome::Failure => warn!(job = %spec.name, "Job failed"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Offline;

    impl Connectivity for Offline {
        fn is_online(&self) -> bool {
            false
        }
    }

    struct CountingJob {
        runs: Arc<AtomicUsize>,
        outcome: JobOutcome,
    }

    impl PeriodicJob for CountingJob {
        fn run(&self) -> impl Future<Output = JobOutcome> + Send {
            self.runs.fetch_add(1, Ordering::SeqCst);
            std::future::ready(self.outcome)
        }
    }

    fn counting(runs: &Arc<AtomicUsize>, outcome: JobOutcome) -> CountingJob {
        CountingJob {
            runs: Arc::clone(runs),
            outcome,
        }
    }

    fn spec(name: &str) -> JobSpec {
        JobSpec {
            name: name.to_string(),
            interval: Duration::from_millis(10),
            requires_network: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn registering_twice_keeps_one_pending_instance() {
        let first_runs = Arc::new(AtomicUsize::new(0));
        let second_runs = Arc::new(AtomicUsize::new(0));

        let mut scheduler = JobScheduler::new(AlwaysOnline);
        scheduler.register(spec("keep-alive"), counting(&first_runs, JobOutcome::Success));
        scheduler.register(spec("keep-alive"), counting(&second_runs, JobOutcome::Success));

        assert_eq!(scheduler.pending_jobs(), 1);
        assert!(scheduler.is_registered("keep-alive"));

        tokio::time::sleep(Duration::from_millis(35)).await;

        // The replaced task was aborted before it ever ran
        assert_eq!(first_runs.load(Ordering::SeqCst), 0);
        assert!(second_runs.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn job_runs_on_its_interval() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(AlwaysOnline);
        scheduler.register(spec("tick"), counting(&runs, JobOutcome::Success));

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(runs.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_does_not_stop_the_cadence() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(AlwaysOnline);
        scheduler.register(spec("flaky"), counting(&runs, JobOutcome::Failure));

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(runs.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_ticks_are_skipped_for_network_jobs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(Offline);
        let mut network_spec = spec("net");
        network_spec.requires_network = true;
        scheduler.register(network_spec, counting(&runs, JobOutcome::Success));

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn offline_probe_does_not_block_local_jobs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(Offline);
        scheduler.register(spec("local"), counting(&runs, JobOutcome::Success));

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(runs.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deregister_cancels_the_job() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut scheduler = JobScheduler::new(AlwaysOnline);
        scheduler.register(spec("gone"), counting(&runs, JobOutcome::Success));

        assert!(scheduler.deregister("gone"));
        assert!(!scheduler.deregister("gone"));
        assert_eq!(scheduler.pending_jobs(), 0);

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
