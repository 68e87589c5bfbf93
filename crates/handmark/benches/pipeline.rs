//! One pipeline pass on a synthetic 640×480 frame.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use handmark::{ColorInterval, HandPipeline, PipelineParams};
use image::{Rgb, RgbImage};

const SKIN: Rgb<u8> = Rgb([255, 0, 0]);
const BACKDROP: Rgb<u8> = Rgb([128, 128, 128]);

/// Palm with five 24 px fingers, wide enough to survive the default opening.
fn synthetic_hand() -> RgbImage {
    let tops = [250u32, 210, 200, 210, 250];
    RgbImage::from_fn(640, 480, |x, y| {
        let palm = (200..400).contains(&x) && (330..440).contains(&y);
        let finger = (0..5u32).any(|k| {
            let x0 = 200 + 44 * k;
            (x0..x0 + 24).contains(&x) && (tops[k as usize]..330).contains(&y)
        });
        if palm || finger {
            SKIN
        } else {
            BACKDROP
        }
    })
}

fn bench_pipeline(c: &mut Criterion) {
    let frame = synthetic_hand();
    let mut group = c.benchmark_group("pipeline");

    group.bench_function("process_640x480_default", |b| {
        let mut pipeline = HandPipeline::new(PipelineParams::default());
        pipeline.calibrator_mut().set_lower_bound(180);
        pipeline.calibrator_mut().set_upper_bound(240);
        b.iter(|| black_box(pipeline.process(black_box(&frame)).finger_count));
    });

    group.bench_function("process_640x480_no_annotation", |b| {
        let mut pipeline = HandPipeline::new(PipelineParams {
            annotate: false,
            ..PipelineParams::default()
        });
        let interval = ColorInterval::new(180, 240);
        pipeline.calibrator_mut().set_lower_bound(interval.min);
        pipeline.calibrator_mut().set_upper_bound(interval.max);
        b.iter(|| black_box(pipeline.process(black_box(&frame)).finger_count));
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
