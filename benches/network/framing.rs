use super::BenchModule;
use criterion::{Criterion, Throughput};
use mqtt_link::network::framing::Framer;
use std::hint::black_box;

const MESSAGE: &[u8] = b"m|sensor2/humidity|55|1|-12|hello from the module\0";

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");
    group.throughput(Throughput::Elements(1));
    group.bench_function("encode", |b| {
        let mut framer: Framer<_> = Framer::new(BenchModule::default());
        b.iter(|| {
            framer.begin_outgoing(b'p').unwrap();
            framer.append_field(black_box("sensor1/temperature")).unwrap();
            framer.append_field(black_box(-1234i32)).unwrap();
            framer.append_field(black_box(true)).unwrap();
            framer.finish_outgoing().unwrap();
        })
    });
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");
    group.throughput(Throughput::Bytes(MESSAGE.len() as u64));
    group.bench_function("decode", |b| {
        let mut framer: Framer<_> = Framer::new(BenchModule::default());
        b.iter(|| {
            framer.stream_mut().inbound.extend(MESSAGE.iter().copied());
            framer.poll_incoming().unwrap();
            framer.read_tag();
            let topic_len = framer.read_str().map_or(0, str::len);
            let sum = i32::from(framer.read_u8()) + i32::from(framer.read_u16()) + framer.read_i32();
            framer.reset();
            black_box((topic_len, sum))
        })
    });
    group.finish();
}
