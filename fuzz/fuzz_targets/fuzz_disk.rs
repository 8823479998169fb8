#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use osalgo_rs::{schedule_disk, Direction, DiskPolicy};

#[derive(Arbitrary, Debug)]
struct Input {
    policy: u8,
    head: u16,
    disk_size: Option<u16>,
    down: bool,
    requests: Vec<u16>,
}

const POLICIES: [DiskPolicy; 6] = [
    DiskPolicy::Fcfs,
    DiskPolicy::Sstf,
    DiskPolicy::Scan,
    DiskPolicy::CScan,
    DiskPolicy::Look,
    DiskPolicy::CLook,
];

fuzz_target!(|input: Input| {
    let policy = POLICIES[input.policy as usize % POLICIES.len()];
    let direction = if input.down { Direction::Down } else { Direction::Up };
    let requests: Vec<u64> = input.requests.iter().map(|&t| u64::from(t)).collect();
    let disk_size = input.disk_size.map(u64::from);

    // Invalid geometry must be rejected, never panic
    if let Ok(s) = schedule_disk(&requests, u64::from(input.head), policy, disk_size, direction) {
        assert_eq!(s.sequence[0], u64::from(input.head));
        let travelled: u64 = s.sequence.windows(2).map(|w| w[0].abs_diff(w[1])).sum();
        assert_eq!(s.total_seek, travelled);
    }
});
