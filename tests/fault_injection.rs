// Failure paths driven through injected fault switches.
//
// Invariants exercised:
// - Construction fails with either switch enabled and succeeds once cleared.
// - An insert that needs growth fails deterministically while a switch is on,
//   and the table keeps its previous generation and contents.
// - Clearing the switch lets the same insert succeed.
use probe_table::growth::PRIMES;
use probe_table::{DefaultHashBuilder, FaultPoint, FaultSwitches, OpenTable, TableError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("fault-{i}")).collect()
}

fn faulty(point: FaultPoint) -> Result<OpenTable<'static, u32>, TableError> {
    OpenTable::with_hasher_and_faults(DefaultHashBuilder::default(), FaultSwitches::new().with(point))
}

#[test]
fn construct_fails_on_alloc_fault() {
    init_tracing();
    assert_eq!(
        faulty(FaultPoint::GenerationAlloc).unwrap_err(),
        TableError::AllocationFailure {
            capacity: PRIMES[0]
        }
    );
}

#[test]
fn construct_fails_on_growth_overflow() {
    init_tracing();
    assert_eq!(
        faulty(FaultPoint::GrowthOverflow).unwrap_err(),
        TableError::GrowthExhausted {
            index: PRIMES.len()
        }
    );
}

#[test]
fn construct_succeeds_once_cleared() {
    let faults = FaultSwitches::new().with(FaultPoint::GenerationAlloc);
    faults.disable(FaultPoint::GenerationAlloc);
    let t: OpenTable<'_, u32> =
        OpenTable::with_hasher_and_faults(DefaultHashBuilder::default(), faults).unwrap();
    assert_eq!(t.capacity(), PRIMES[0]);
}

// Fills the first generation to its growth point, then checks that the
// growing insert fails with `expected` while `point` is enabled.
fn growth_blocked_by(point: FaultPoint, expected: TableError) {
    init_tracing();
    let keys = keys(PRIMES[0]);
    let vals: Vec<u32> = (0..PRIMES[0] as u32).collect();
    let mut t = OpenTable::with_hasher_and_faults(DefaultHashBuilder::default(), FaultSwitches::new())
        .unwrap();

    t.faults().enable(point);
    let mut failed_at = None;
    for (i, (k, v)) in keys.iter().zip(&vals).enumerate() {
        if let Err(e) = t.insert(k, v) {
            assert_eq!(e, expected);
            failed_at = Some(i);
            break;
        }
    }
    let failed_at = failed_at.expect("an insert must fail while the switch is on");
    assert_eq!(failed_at, PRIMES[0] - 1);

    // Unchanged: same generation, same entries.
    assert_eq!(t.generation(), 0);
    assert_eq!(t.len(), failed_at);
    assert_eq!(t.consumed(), PRIMES[0] - 1);
    assert!(t.find(&keys[failed_at]).is_none());
    for (k, v) in keys.iter().zip(&vals).take(failed_at) {
        assert_eq!(t.find(k), Some(v));
    }

    // Still blocked on retry.
    assert_eq!(t.insert(&keys[failed_at], &vals[failed_at]), Err(expected));

    t.faults().disable(point);
    t.insert(&keys[failed_at], &vals[failed_at]).unwrap();
    assert_eq!(t.generation(), 1);
    assert_eq!(t.len(), PRIMES[0]);
    assert_eq!(t.find(&keys[failed_at]), Some(&vals[failed_at]));
}

#[test]
fn insert_growth_fails_on_alloc_fault() {
    growth_blocked_by(
        FaultPoint::GenerationAlloc,
        TableError::AllocationFailure {
            capacity: PRIMES[1],
        },
    );
}

#[test]
fn insert_growth_fails_on_growth_overflow() {
    growth_blocked_by(
        FaultPoint::GrowthOverflow,
        TableError::GrowthExhausted {
            index: PRIMES.len(),
        },
    );
}

// Switches only matter when an allocation happens: inserts that fit in the
// current generation go through untouched.
#[test]
fn switches_ignored_without_growth() {
    let vals = [1u32, 2, 3];
    let mut t = OpenTable::with_hasher_and_faults(
        DefaultHashBuilder::default(),
        FaultSwitches::new(),
    )
    .unwrap();
    t.faults().enable(FaultPoint::GenerationAlloc);
    t.faults().enable(FaultPoint::GrowthOverflow);
    for (k, v) in ["a", "b", "c"].iter().zip(&vals) {
        t.insert(*k, v).unwrap();
    }
    assert_eq!(t.find("b"), Some(&2));
    assert_eq!(t.erase("a"), Some(&1));
    assert_eq!(t.len(), 2);
}
