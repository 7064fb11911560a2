#![no_main]

use libfuzzer_sys::fuzz_target;
use speedup_stats::speedup::{mean_speedup_test, median_speedup_test, SpeedupConfig};

fuzz_target!(|data: &[u8]| {
    // First byte splits the remaining f64s between the two samples
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let values: Vec<f64> = rest
        .chunks_exact(8)
        .map(|chunk| f64::from_le_bytes(chunk.try_into().unwrap_or([0; 8])))
        .collect();
    let split = (split as usize).min(values.len());
    let (t_ref, t_opt) = values.split_at(split);

    // Errors are fine (bad input), panics are not
    let config = SpeedupConfig::default();
    let _ = mean_speedup_test(t_ref, t_opt, &config);
    let _ = median_speedup_test(t_ref, t_opt, &config);
});
