use core::cell::Cell;
use std::{
    collections::HashSet,
    rc::Rc,
    sync::{Arc, Mutex},
    thread::scope,
};

use crate::{
    BasicMonoUlidGenerator, IdGenStatus, LockMonoUlidGenerator, RandSource, Randomness,
    SystemClock, ThreadRandom, TimeSource, Timestamp, Ulid, UlidGenerator,
};

#[derive(Clone)]
struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

struct MockRand {
    rand: u128,
}

impl RandSource for MockRand {
    fn fill(&self, dest: &mut [u8]) -> usize {
        let bytes = Randomness::from_u128(self.rand).to_bytes();
        let n = dest.len().min(bytes.len());
        dest[..n].copy_from_slice(&bytes[..n]);
        n
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl SharedMockStepTime {
    fn new(values: Vec<u64>, index: usize) -> Self {
        Self {
            clock: Rc::new(MockStepTime {
                values,
                index: Cell::new(index),
            }),
        }
    }
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.values[self.clock.index.get()]
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

struct FixedTime;
impl TimeSource for FixedTime {
    fn current_millis(&self) -> u64 {
        0
    }
}

#[derive(Clone)]
struct MinRand;
impl RandSource for MinRand {
    fn fill(&self, dest: &mut [u8]) -> usize {
        dest.fill(0);
        dest.len()
    }
}

struct MaxRand;
impl RandSource for MaxRand {
    fn fill(&self, dest: &mut [u8]) -> usize {
        dest.fill(0xFF);
        dest.len()
    }
}

trait IdGenStatusExt {
    fn unwrap_ready(self) -> Ulid;
    fn unwrap_pending(self) -> u64;
}

impl IdGenStatusExt for IdGenStatus {
    fn unwrap_ready(self) -> Ulid {
        match self {
            IdGenStatus::Ready { id } => id,
            IdGenStatus::Pending { yield_for } => {
                panic!("unexpected pending (yield for: {yield_for})")
            }
        }
    }

    fn unwrap_pending(self) -> u64 {
        match self {
            IdGenStatus::Ready { id } => panic!("unexpected ready ({id})"),
            IdGenStatus::Pending { yield_for } => yield_for,
        }
    }
}

fn exhausted_at_zero() -> Ulid {
    Ulid::from_parts(Timestamp::ZERO, Randomness::from_u128(Randomness::MAX))
}

fn run_id_sequence_increments_within_same_tick<G, T, R>(generator: G)
where
    G: UlidGenerator<T, R>,
    T: TimeSource,
    R: RandSource,
{
    let id1 = generator.next_id().unwrap_ready();
    let id2 = generator.next_id().unwrap_ready();
    let id3 = generator.next_id().unwrap_ready();

    assert_eq!(id1.millis(), 42);
    assert_eq!(id2.millis(), 42);
    assert_eq!(id3.millis(), 42);
    assert_eq!(id1.randomness().to_u128(), 42);
    assert_eq!(id2.randomness().to_u128(), 42 + 1);
    assert_eq!(id3.randomness().to_u128(), 42 + 2);
    assert!(id1 < id2 && id2 < id3);
    assert!(id1.encode().as_str() < id2.encode().as_str());
}

fn run_generator_returns_pending_when_random_exhausted<G, T, R>(generator: G)
where
    G: UlidGenerator<T, R>,
    T: TimeSource,
    R: RandSource,
{
    assert_eq!(generator.next_id().unwrap_pending(), 1);
    // Pending leaves the state alone, so it stays pending.
    assert_eq!(generator.try_next_id().unwrap().unwrap_pending(), 1);
}

fn run_generator_handles_rollover<G, T, R>(generator: G, shared_time: SharedMockStepTime)
where
    G: UlidGenerator<T, R>,
    T: TimeSource,
    R: RandSource,
{
    let id = generator.next_id().unwrap_ready();
    assert_eq!(id.millis(), 42);
    assert_eq!(id.randomness().to_u128(), Randomness::MAX);

    let yield_for = generator.next_id().unwrap_pending();
    assert_eq!(yield_for, 1);

    shared_time.clock.index.set(1);

    let next = generator.next_id().unwrap_ready();
    assert_eq!(next.millis(), 43);
    assert!(next > id);
}

fn run_generator_waits_for_clock_regression<G, T, R>(generator: G, shared_time: SharedMockStepTime)
where
    G: UlidGenerator<T, R>,
    T: TimeSource,
    R: RandSource,
{
    let id = generator.next_id().unwrap_ready();
    assert_eq!(id.millis(), 50);

    shared_time.clock.index.set(1);
    assert_eq!(generator.next_id().unwrap_pending(), 5);

    shared_time.clock.index.set(0);
    let next = generator.next_id().unwrap_ready();
    assert_eq!(next.millis(), 50);
    assert_eq!(next.randomness().to_u128(), id.randomness().to_u128() + 1);
}

fn run_generator_monotonic<G, T, R>(generator: G)
where
    G: UlidGenerator<T, R>,
    T: TimeSource,
    R: RandSource,
{
    const TOTAL_IDS: usize = 100_000;
    let mut last = Ulid::nil();

    for _ in 0..TOTAL_IDS {
        let id = loop {
            match generator.next_id() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { .. } => core::hint::spin_loop(),
            }
        };

        assert!(id > last, "{id} !> {last}");
        if id.millis() == last.millis() {
            assert_eq!(last.increment(1), Some(id));
        }
        last = id;
    }
}

fn run_generator_monotonic_threaded<G, T, R>(make_generator: impl Fn() -> G)
where
    G: UlidGenerator<T, R> + Send,
    T: TimeSource,
    R: RandSource,
{
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 20_000;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = make_generator();
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut last = Ulid::nil();
                for _ in 0..IDS_PER_THREAD {
                    loop {
                        match generator.next_id() {
                            IdGenStatus::Ready { id } => {
                                assert!(id > last);
                                last = id;
                                let mut set = seen_ids.lock().unwrap();
                                assert!(set.insert(id));
                                break;
                            }
                            IdGenStatus::Pending { .. } => std::thread::yield_now(),
                        }
                    }
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn basic_generator_sequence_test() {
    let generator = BasicMonoUlidGenerator::new(MockTime { millis: 42 }, MockRand { rand: 42 });
    run_id_sequence_increments_within_same_tick(generator);
}

#[test]
fn lock_generator_sequence_test() {
    let generator = LockMonoUlidGenerator::new(MockTime { millis: 42 }, MockRand { rand: 42 });
    run_id_sequence_increments_within_same_tick(generator);
}

#[test]
fn basic_generator_pending_test() {
    let generator = BasicMonoUlidGenerator::from_state(exhausted_at_zero(), FixedTime, MinRand);
    run_generator_returns_pending_when_random_exhausted(generator);
}

#[test]
fn lock_generator_pending_test() {
    let generator = LockMonoUlidGenerator::from_state(exhausted_at_zero(), FixedTime, MinRand);
    run_generator_returns_pending_when_random_exhausted(generator);
}

#[test]
fn basic_generator_rollover_test() {
    let shared_time = SharedMockStepTime::new(vec![42, 43], 0);
    let generator = BasicMonoUlidGenerator::new(shared_time.clone(), MaxRand);
    run_generator_handles_rollover(generator, shared_time);
}

#[test]
fn lock_generator_rollover_test() {
    let shared_time = SharedMockStepTime::new(vec![42, 43], 0);
    let generator = LockMonoUlidGenerator::new(shared_time.clone(), MaxRand);
    run_generator_handles_rollover(generator, shared_time);
}

#[test]
fn basic_generator_clock_regression_test() {
    let shared_time = SharedMockStepTime::new(vec![50, 45], 0);
    let generator = BasicMonoUlidGenerator::new(shared_time.clone(), MinRand);
    run_generator_waits_for_clock_regression(generator, shared_time);
}

#[test]
fn lock_generator_clock_regression_test() {
    let shared_time = SharedMockStepTime::new(vec![50, 45], 0);
    let generator = LockMonoUlidGenerator::new(shared_time.clone(), MinRand);
    run_generator_waits_for_clock_regression(generator, shared_time);
}

#[test]
fn basic_generator_system_clock_monotonic() {
    run_generator_monotonic(BasicMonoUlidGenerator::new(SystemClock, ThreadRandom));
}

#[test]
fn lock_generator_system_clock_monotonic() {
    run_generator_monotonic(LockMonoUlidGenerator::new(SystemClock, ThreadRandom));
}

#[test]
fn lock_generator_threaded_monotonic() {
    let generator = LockMonoUlidGenerator::new(SystemClock, ThreadRandom);
    run_generator_monotonic_threaded(|| generator.clone());
}

#[test]
fn clock_beyond_range_saturates() {
    let generator = BasicMonoUlidGenerator::new(MockTime { millis: u64::MAX }, MinRand);
    let a = generator.next_id().unwrap_ready();
    let b = generator.next_id().unwrap_ready();
    assert_eq!(a.millis(), Timestamp::MAX);
    assert_eq!(a.increment(1), Some(b));
}

#[cfg(not(feature = "parking-lot"))]
#[test]
fn lock_generator_poisoned_lock() {
    use crate::Error;

    let generator = LockMonoUlidGenerator::new(MockTime { millis: 42 }, MinRand);
    let shared = generator.clone();
    let res = std::thread::spawn(move || {
        let _guard = shared.state.lock().unwrap();
        panic!("poison the generator lock");
    })
    .join();
    assert!(res.is_err());

    assert_eq!(generator.try_next_id().unwrap_err(), Error::LockPoisoned);
    let id = generator.next_id().unwrap_ready();
    assert_eq!(id.millis(), 42);
}
