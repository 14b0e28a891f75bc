#[macro_use]
extern crate bencher;

extern crate exr_header;
use exr_header::half_bits::*;

use bencher::Bencher;

const SAMPLE_COUNT: usize = 1920 * 1080;

fn floats() -> Vec<f32> {
    (0 .. SAMPLE_COUNT).map(|index| (index as f32 * 0.173).sin() * 70000.0).collect()
}

/// Convert one sample at a time
fn floats_to_half_bits_single(bench: &mut Bencher) {
    let floats = floats();
    let mut bits = vec![0_u16; SAMPLE_COUNT];

    bench.iter(||{
        for (target, &float) in bits.iter_mut().zip(&floats) {
            *target = float_to_half_bits(float);
        }

        bencher::black_box(&bits);
    })
}

/// Convert the whole slice at once
fn floats_to_half_bits_batch(bench: &mut Bencher) {
    let floats = floats();
    let mut bits = vec![0_u16; SAMPLE_COUNT];

    bench.iter(||{
        floats_to_half_bits(&floats, &mut bits);
        bencher::black_box(&bits);
    })
}

fn half_bits_to_floats_batch(bench: &mut Bencher) {
    let mut bits = vec![0_u16; SAMPLE_COUNT];
    floats_to_half_bits(&floats(), &mut bits);
    let mut floats = vec![0.0_f32; SAMPLE_COUNT];

    bench.iter(||{
        half_bits_to_floats(&bits, &mut floats);
        bencher::black_box(&floats);
    })
}

benchmark_group!(half_conversion,
    floats_to_half_bits_single,
    floats_to_half_bits_batch,
    half_bits_to_floats_batch
);

benchmark_main!(half_conversion);
