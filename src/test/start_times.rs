use crate::app::{StartTimeSampler, DEFAULT_SEED, DEFAULT_STREAM};

#[test]
fn samples_stay_in_unit_window() {
    let mut sampler = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM);
    for s in sampler.sample_n(100) {
        assert!((0.0..0.1).contains(&s), "start offset {s} out of range");
    }
}

#[test]
fn same_seed_and_stream_reproduce_the_sequence() {
    let a = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM).sample_n(10);
    let b = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM).sample_n(10);
    assert_eq!(a, b);
}

#[test]
fn different_stream_yields_a_different_sequence() {
    let a = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM).sample_n(10);
    let b = StartTimeSampler::new(DEFAULT_SEED, DEFAULT_STREAM + 1).sample_n(10);
    assert_ne!(a, b);
}
