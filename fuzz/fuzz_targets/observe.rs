#![no_main]

use libfuzzer_sys::fuzz_target;
use slotscope::{
    BlockObservation, EstimatorConfig, FunctionObservation, LayoutCapacityEstimator, TargetPolicy,
};

const HEADER: usize = 17;

fn read_i64(bytes: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    i64::from_le_bytes(buf)
}

// Input layout: eight bytes of budget, eight bytes of fall-through penalty and one byte of
// placement divisor, then per block one flag byte, one length byte and that many signed
// eight-byte sizes. A flag byte of 0xff ends the current function instead.
fuzz_target!(|data: &[u8]| {
    if data.len() < HEADER {
        return;
    }

    let budget = read_i64(&data[0..8]) & i64::MAX;
    let penalty = read_i64(&data[8..16]) & i64::MAX;
    let divisor = i64::from(data[16].max(1));
    let (Ok(config), Ok(policy)) = (EstimatorConfig::new(budget), TargetPolicy::new(divisor, penalty))
    else {
        return;
    };
    let mut estimator = LayoutCapacityEstimator::new(config.with_policy(policy));

    let observe = |estimator: &mut LayoutCapacityEstimator, function: FunctionObservation| {
        let before = estimator.snapshot();
        if estimator.observe_function(&function).is_err() {
            assert_eq!(estimator.snapshot(), before);
        }
    };

    let mut blocks = Vec::new();
    let mut rest = &data[HEADER..];
    while let [flag, len, tail @ ..] = rest {
        if *flag == 0xff {
            observe(&mut estimator, FunctionObservation::new(std::mem::take(&mut blocks)));
            rest = &rest[1..];
            continue;
        }

        let len = usize::from(*len).min(tail.len() / 8);
        let sizes = tail[..len * 8].chunks_exact(8).map(read_i64).collect();
        blocks.push(BlockObservation::new(flag & 1 == 1, sizes));
        rest = &tail[len * 8..];
    }
    observe(&mut estimator, FunctionObservation::new(blocks));

    let state = estimator.snapshot();
    let leftover = i128::from(budget) - i128::from(state.code_size_bytes());
    let slots = leftover.div_euclid(i128::from(divisor));
    assert!(state.code_size_bytes() >= 0);
    assert_eq!(i128::from(state.leftover_bytes()), leftover);
    assert_eq!(
        state.function_placement_count(),
        i128::from(state.function_count()) + slots
    );
    assert_eq!(
        state.block_placement_count(),
        i128::from(state.block_count()) + slots
            - i128::from(state.fall_through_count()) * i128::from(penalty)
    );
});
