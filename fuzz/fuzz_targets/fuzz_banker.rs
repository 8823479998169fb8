#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use osalgo_rs::{check_safety, DeadlockState, RequestOutcome};

#[derive(Arbitrary, Debug)]
struct Input {
    n: u8,
    m: u8,
    allocation: Vec<u8>,
    max: Vec<u8>,
    available: Vec<u8>,
    process: u8,
    request: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let n = (input.n % 8) as usize;
    let m = (input.m % 5) as usize;
    let widen = |v: &[u8]| v.iter().map(|&x| u32::from(x)).collect::<Vec<u32>>();
    let allocation = widen(&input.allocation);
    let max = widen(&input.max);
    let available = widen(&input.available);

    let report = match check_safety(n, m, &allocation, &max, &available) {
        Ok(r) => r,
        Err(_) => return,
    };
    if report.is_safe {
        assert_eq!(report.sequence.len(), n);
    } else {
        assert!(report.sequence.is_empty());
    }

    let Ok(state) = DeadlockState::from_flat(n, m, &allocation, &max, &available) else {
        return;
    };
    if let Ok(RequestOutcome::Granted { state, .. }) =
        state.request(input.process as usize, &widen(&input.request))
    {
        assert!(state.safety().is_safe);
    }
});
