use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    network::framing::bench_encode,
    network::framing::bench_decode,
    network::application::mqtt::client::bench_publish,
    network::application::mqtt::client::bench_poll,
    network::application::mqtt::client::bench_publish_and_poll
);
criterion_main!(benches);
