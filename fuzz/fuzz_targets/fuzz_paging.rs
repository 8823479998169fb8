#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use osalgo_rs::{replay_pages, PagePolicy};

#[derive(Arbitrary, Debug)]
struct Input {
    policy: u8,
    capacity: u8,
    reference: Vec<u8>,
}

const POLICIES: [PagePolicy; 5] = [
    PagePolicy::Fifo,
    PagePolicy::Lru,
    PagePolicy::Optimal,
    PagePolicy::Lfu,
    PagePolicy::Mfu,
];

fuzz_target!(|input: Input| {
    let policy = POLICIES[input.policy as usize % POLICIES.len()];
    let capacity = input.capacity as usize;
    let reference: Vec<u32> = input.reference.iter().map(|&p| u32::from(p)).collect();

    let replay = match replay_pages(&reference, capacity, policy) {
        Ok(r) => r,
        Err(_) => {
            assert_eq!(capacity, 0);
            return;
        }
    };

    assert_eq!(replay.steps.len(), reference.len());
    for step in &replay.steps {
        assert!(step.frames.len() <= capacity);
        assert!(step.frames.contains(&step.page));
    }
});
