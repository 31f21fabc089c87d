use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::io::Cursor;
use tfmini_core::{
    constants::FRAME_LEN,
    decode_next_frame,
    encoder::{encode_frame, FrameBuilder},
    types::Frame,
    FrameDecoder,
};

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode_frame", |b| {
        b.iter(|| encode_frame(black_box(2560), black_box(256), black_box(5)))
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let encoded = encode_frame(2560, 256, 5);

    group.throughput(Throughput::Bytes(FRAME_LEN as u64));
    group.bench_function("from_bytes", |b| {
        b.iter(|| Frame::from_bytes(black_box(&encoded)).unwrap())
    });
    group.bench_function("decode_next_frame", |b| {
        b.iter(|| decode_next_frame(&mut black_box(&encoded[..])).unwrap())
    });

    group.finish();
}

fn bench_resync(c: &mut Criterion) {
    let mut group = c.benchmark_group("resync");

    let mut stream = Vec::new();
    for i in 0..1000u16 {
        stream.extend_from_slice(&FrameBuilder::new(i).corrupt_checksum().build());
    }
    stream.extend_from_slice(&encode_frame(42, 0, 0));

    group.throughput(Throughput::Bytes(stream.len() as u64));
    group.bench_function("1000_bad_frames", |b| {
        b.iter(|| {
            let mut decoder = FrameDecoder::new(Cursor::new(black_box(&stream)));
            decoder.next_frame().unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_resync);
criterion_main!(benches);
