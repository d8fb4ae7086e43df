use std::hint::black_box;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::harness::{Core, Slot};
use crate::sync::CoreCell;

struct Ring {
    rounds: usize,
    visits: Vec<AtomicUsize>,
    order: CoreCell<Vec<usize>>,
}

struct RingTask {
    ring: *const Ring,
    id: usize,
}

/// Each task bumps its counter, logs itself and passes the core on to its
/// successor. The last task hands back to the main flow after its final round.
extern "C" fn ring_task(arg: *mut ()) {
    let task = unsafe { &*(arg as *const RingTask) };
    let ring = unsafe { &*task.ring };
    let core = Core::current();
    let n = ring.visits.len();

    for round in 0..ring.rounds {
        ring.visits[task.id].fetch_add(1, Ordering::Relaxed);
        ring.order.exclusive_access().push(task.id);
        if task.id == n - 1 && round == ring.rounds - 1 {
            core.switch(Slot::Task(task.id), Slot::Main);
        } else {
            core.switch(Slot::Task(task.id), Slot::Task((task.id + 1) % n));
        }
    }
}

/// Rotate the core between `n` tasks for `rounds` full turns, returning the
/// visit order and the per-task visit counts.
pub(super) fn run_ring(n: usize, rounds: usize) -> (Vec<usize>, Vec<usize>) {
    let core = Core::enter();
    let ring = Ring {
        rounds,
        visits: (0..n).map(|_| AtomicUsize::new(0)).collect(),
        order: unsafe { CoreCell::new(Vec::new()) },
    };
    let tasks: Vec<RingTask> = (0..n).map(|id| RingTask { ring: &ring, id }).collect();
    for task in &tasks {
        let id = core.spawn(ring_task, task as *const RingTask as *mut ());
        assert_eq!(id, task.id);
    }

    core.run(0);
    assert!(!core.lock.is_locked());
    assert_eq!(core.exits(), 0);

    let order = ring.order.exclusive_access().clone();
    let visits = ring.visits.iter().map(|v| v.load(Ordering::Relaxed)).collect();
    (order, visits)
}

#[test]
fn four_tasks_rotate_in_order() {
    const N: usize = 4;
    const ROUNDS: usize = 10;

    let (order, visits) = run_ring(N, ROUNDS);

    assert_eq!(order.len(), N * ROUNDS);
    assert!(order.iter().enumerate().all(|(i, &id)| id == i % N));
    assert_eq!(visits, vec![ROUNDS; N]);
}

#[test]
fn single_task_round_trips_with_main() {
    let (order, visits) = run_ring(1, 1);
    assert_eq!(order, vec![0]);
    assert_eq!(visits, vec![1]);
}

struct Canaries {
    a_intact: AtomicBool,
    b_intact: AtomicBool,
}

fn scribble(seed: u64) -> [u64; 8] {
    let mut words = [0u64; 8];
    for (i, w) in words.iter_mut().enumerate() {
        *w = seed.rotate_left(i as u32 * 7) ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    }
    words
}

/// Keeps values live in registers and on the stack across a switch to B and
/// back.
extern "C" fn canary_a(arg: *mut ()) {
    let canaries = unsafe { &*(arg as *const Canaries) };
    let core = Core::current();

    let seed = black_box(0xDEAD_BEEF_CAFE_F00D_u64);
    let words = black_box(scribble(seed));
    let (x, y, z) = (black_box(seed ^ 1), black_box(seed ^ 2), black_box(seed ^ 3));

    core.switch(Slot::Task(0), Slot::Task(1));

    let intact = words == scribble(seed) && x ^ y ^ z == seed ^ 1 ^ 2 ^ 3;
    canaries.a_intact.store(black_box(intact), Ordering::Relaxed);
    core.switch(Slot::Task(0), Slot::Main);
}

/// Scribbles over every register it can reach, then resumes A.
extern "C" fn canary_b(arg: *mut ()) {
    let canaries = unsafe { &*(arg as *const Canaries) };
    let core = Core::current();

    let seed = black_box(0x0123_4567_89AB_CDEF_u64);
    let words = black_box(scribble(seed));
    let mixed = words.iter().fold(seed, |acc, w| acc.rotate_left(5) ^ w);
    black_box(mixed);
    canaries.b_intact.store(words == scribble(seed), Ordering::Relaxed);

    core.switch(Slot::Task(1), Slot::Task(0));
}

#[test]
fn state_survives_a_round_trip() {
    let core = Core::enter();
    let canaries = Canaries {
        a_intact: AtomicBool::new(false),
        b_intact: AtomicBool::new(false),
    };
    let arg = &canaries as *const Canaries as *mut ();
    core.spawn(canary_a, arg);
    core.spawn(canary_b, arg);

    let main_words = black_box(scribble(42));
    core.run(0);

    assert!(canaries.b_intact.load(Ordering::Relaxed));
    assert!(canaries.a_intact.load(Ordering::Relaxed));
    assert_eq!(main_words, scribble(42));
    assert!(!core.lock.is_locked());
}
