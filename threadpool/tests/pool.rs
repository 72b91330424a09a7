use std::{
    env,
    num::NonZeroUsize,
    process::Command,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use parking_lot::Mutex;
use threadpool::{AtomicF64, CoordinatedPool, RendezvousBarrier};

const DEADLINE: Duration = Duration::from_secs(10);

/// Runs `f` on its own thread and fails if it doesn't finish before `DEADLINE`.
fn finishes_in_time<F>(f: F)
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        f();
        let _ = tx.send(());
    });

    rx.recv_timeout(DEADLINE)
        .expect("the pool deadlocked instead of finishing");
}

fn counters(n: usize) -> Arc<Vec<AtomicUsize>> {
    Arc::new((0..n).map(|_| AtomicUsize::new(0)).collect())
}

fn counting_pool(counts: &Arc<Vec<AtomicUsize>>) -> CoordinatedPool {
    let n = counts.len();
    let counts = Arc::clone(counts);

    CoordinatedPool::new(
        move |&i: &usize| {
            counts[i].fetch_add(1, Ordering::Relaxed);
        },
        0..n,
    )
    .unwrap()
}

#[test]
fn test_trigger_sync_runs_every_argument_once() {
    for n in 1..=8 {
        let counts = counters(n);
        let mut pool = counting_pool(&counts);
        assert_eq!(pool.size(), n);

        pool.trigger_sync();

        for (i, count) in counts.iter().enumerate() {
            assert_eq!(count.load(Ordering::Relaxed), 1, "worker {i} of {n}");
        }
    }
}

#[test]
fn test_repeated_trigger_sync_does_not_leak_completions() {
    const WORKERS: usize = 5;
    const ITERATIONS: usize = 40;

    let total = Arc::new(AtomicUsize::new(0));
    let mut pool = {
        let total = Arc::clone(&total);
        CoordinatedPool::new(
            move |&i: &usize| {
                // Uneven workloads so that completions would interleave across iterations.
                thread::sleep(Duration::from_micros((i as u64 % 3) * 200));
                total.fetch_add(1, Ordering::Relaxed);
            },
            0..WORKERS,
        )
        .unwrap()
    };

    for iteration in 1..=ITERATIONS {
        pool.trigger_sync();
        assert_eq!(total.load(Ordering::Relaxed), iteration * WORKERS);
    }
}

#[test]
fn test_sync_is_idempotent() {
    let counts = counters(3);
    let mut pool = counting_pool(&counts);

    assert!(pool.is_synced());
    pool.sync();

    pool.trigger();
    assert!(!pool.is_synced());

    pool.sync();
    pool.sync();
    assert!(pool.is_synced());

    assert!(counts.iter().all(|c| c.load(Ordering::Relaxed) == 1));
}

#[test]
fn test_queued_triggers_run_once_per_trigger_with_a_barrier() {
    const WORKERS: usize = 4;
    const TRIGGERS: usize = 3;

    let counts = counters(WORKERS);
    let barrier = Arc::new(RendezvousBarrier::new(NonZeroUsize::new(WORKERS).unwrap()));

    let mut pool = {
        let counts = Arc::clone(&counts);
        CoordinatedPool::new(
            move |&i: &usize| {
                counts[i].fetch_add(1, Ordering::Relaxed);
                barrier.arrive_and_wait();
            },
            0..WORKERS,
        )
        .unwrap()
    };

    for _ in 0..TRIGGERS {
        pool.trigger();
    }
    pool.sync();

    for count in counts.iter() {
        assert_eq!(count.load(Ordering::Relaxed), TRIGGERS);
    }
}

#[test]
fn test_queued_triggers_run_size_callbacks_each() {
    const WORKERS: usize = 3;
    const TRIGGERS: usize = 5;

    let counts = counters(WORKERS);
    let mut pool = counting_pool(&counts);

    for _ in 0..TRIGGERS {
        pool.trigger();
    }
    pool.sync();

    let total: usize = counts.iter().map(|c| c.load(Ordering::Relaxed)).sum();
    assert_eq!(total, WORKERS * TRIGGERS);
}

#[test]
fn test_writes_before_trigger_are_visible_to_workers() {
    const WORKERS: usize = 4;

    let input = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut pool = {
        let input = Arc::clone(&input);
        let seen = Arc::clone(&seen);
        CoordinatedPool::new(
            move |_: &usize| {
                seen.lock().push(input.load(Ordering::Relaxed));
            },
            0..WORKERS,
        )
        .unwrap()
    };

    for value in 1..=10 {
        input.store(value, Ordering::Relaxed);
        pool.trigger_sync();

        let mut seen = seen.lock();
        assert_eq!(*seen, vec![value; WORKERS]);
        seen.clear();
    }
}

#[test]
fn test_workers_are_named_after_the_pool() {
    const WORKERS: usize = 3;

    let names = Arc::new(Mutex::new(Vec::new()));
    let mut pool = {
        let names = Arc::clone(&names);
        CoordinatedPool::named(
            "probe",
            move |_: &usize| {
                let name = thread::current().name().map(str::to_string);
                names.lock().push(name);
            },
            0..WORKERS,
        )
        .unwrap()
    };

    pool.trigger_sync();

    let mut names: Vec<_> = names.lock().drain(..).flatten().collect();
    names.sort();
    assert_eq!(names, ["probe-0", "probe-1", "probe-2"]);
}

#[test]
fn test_empty_pool_never_blocks() {
    finishes_in_time(|| {
        let mut pool = CoordinatedPool::new(|_: &usize| {}, 0..0).unwrap();
        assert_eq!(pool.size(), 0);

        pool.trigger_sync();
        pool.trigger();
    });
}

#[test]
fn test_drop_idle_pool_terminates() {
    finishes_in_time(|| {
        let counts = counters(6);
        let pool = counting_pool(&counts);
        drop(pool);

        assert!(counts.iter().all(|c| c.load(Ordering::Relaxed) == 0));
    });
}

#[test]
fn test_drop_after_trigger_without_sync_terminates() {
    finishes_in_time(|| {
        let counts = counters(4);
        let mut pool = counting_pool(&counts);

        pool.trigger();
        drop(pool);

        // The in-flight iteration is finished, never abandoned half-way.
        assert!(counts.iter().all(|c| c.load(Ordering::Relaxed) == 1));
    });
}

#[test]
fn test_drop_after_trigger_with_barrier_terminates() {
    const WORKERS: usize = 5;

    finishes_in_time(|| {
        let counts = counters(WORKERS);
        let barrier = Arc::new(RendezvousBarrier::new(NonZeroUsize::new(WORKERS).unwrap()));

        let mut pool = {
            let counts = Arc::clone(&counts);
            CoordinatedPool::new(
                move |&i: &usize| {
                    thread::sleep(Duration::from_millis(i as u64));
                    barrier.arrive_and_wait();
                    counts[i].fetch_add(1, Ordering::Relaxed);
                    barrier.arrive_and_wait();
                },
                0..WORKERS,
            )
            .unwrap()
        };

        pool.trigger();
        pool.trigger();
        drop(pool);

        assert!(counts.iter().all(|c| c.load(Ordering::Relaxed) == 2));
    });
}

#[test]
fn test_partial_sums_reduce_into_accumulator() {
    const WORKERS: usize = 6;
    const ITERATIONS: usize = 100;

    let total = Arc::new(AtomicF64::new(0.));
    let barrier = RendezvousBarrier::new(NonZeroUsize::new(WORKERS).unwrap());

    let mut pool = {
        let total = Arc::clone(&total);
        CoordinatedPool::new(
            move |&i: &usize| {
                total.fetch_add((i + 1) as f64, Ordering::AcqRel);
                barrier.arrive_and_wait();
            },
            0..WORKERS,
        )
        .unwrap()
    };

    for iteration in 1..=ITERATIONS {
        pool.trigger_sync();

        let expected = (iteration * WORKERS * (WORKERS + 1) / 2) as f64;
        assert_eq!(total.load(Ordering::Acquire), expected);
    }
}

const ABORT_CHILD_VAR: &str = "THREADPOOL_ABORT_CHILD";

#[test]
fn test_panicking_callback_aborts_the_process() {
    if env::var_os(ABORT_CHILD_VAR).is_some() {
        let mut pool = CoordinatedPool::new(
            |&i: &usize| {
                if i == 1 {
                    panic!("kernel failure");
                }
            },
            0..3,
        )
        .unwrap();

        // Only reached if the panic was swallowed, which makes the child succeed.
        pool.trigger_sync();
        return;
    }

    let exe = env::current_exe().unwrap();
    let output = Command::new(exe)
        .args([
            "--exact",
            "test_panicking_callback_aborts_the_process",
            "--test-threads=1",
        ])
        .env(ABORT_CHILD_VAR, "1")
        .output()
        .unwrap();

    assert!(!output.status.success(), "child exited with {}", output.status);

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "expected SIGABRT");
    }
}
