use super::mock::MockStream;
use mqtt_link::network::framing::{Framer, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_fields_come_back_in_order() {
    let mut framer: Framer<_> = Framer::new(MockStream::loopback());
    framer.begin_outgoing(b'p').unwrap();
    framer.append_field("sensor1/temperature").unwrap();
    framer.append_field(1234u16).unwrap();
    framer.append_field(-5i8).unwrap();
    framer.append_field(70_000u32).unwrap();
    framer.append_field(-100_000i32).unwrap();
    framer.append_field(true).unwrap();
    framer.append_field("").unwrap();
    framer.finish_outgoing().unwrap();

    framer.poll_incoming().unwrap();
    assert!(framer.frame_ready());

    let frame = framer.frame().unwrap();
    assert_eq!(frame.tag(), Some(b'p'));
    assert_eq!(frame.field_count(), 7);

    assert_eq!(framer.read_tag(), Some(b'p'));
    assert_eq!(framer.read_str(), Some("sensor1/temperature"));
    assert_eq!(framer.read_u16(), 1234);
    assert_eq!(framer.read_i8(), -5);
    assert_eq!(framer.read_u32(), 70_000);
    assert_eq!(framer.read_i32(), -100_000);
    assert_eq!(framer.read_u8(), 1);
    assert_eq!(framer.fields_remaining(), 1);
    assert_eq!(framer.read_str(), Some(""));
    assert!(!framer.frame_ready());
    assert_eq!(framer.read_str(), None);
}

#[test]
fn test_frames_are_read_one_at_a_time() {
    let mut framer: Framer<_> = Framer::new(MockStream::new());
    framer.stream_mut().feed(b"c\0s|-3\0m|a/b|hi\0");

    let mut tags = Vec::new();
    for _ in 0..3 {
        framer.poll_incoming().unwrap();
        assert!(framer.frame_ready());
        tags.push(framer.frame().unwrap().tag().unwrap());
        framer.reset();
    }
    assert_eq!(tags, b"csm");
    assert_eq!(framer.stats().received, 3);
    assert_eq!(framer.stream().unread(), 0);
}

#[test]
fn test_oversized_value_is_rejected_before_writing() {
    let long = "x".repeat(120);
    let fields: [Value<'_>; 2] = ["topic".into(), long.as_str().into()];
    assert!(mqtt_link::network::framing::encoded_len(&fields) > 100);
    assert!(!Value::from("a|b").is_valid());
    assert!(!Value::from("a\0b").is_valid());
    assert!(Value::from(u32::MAX).is_valid());
}

#[test]
fn test_random_garbage_overflows_then_recovers() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut framer: Framer<_> = Framer::new(MockStream::new());

    for _ in 0..16 {
        let len = rng.gen_range(100..300usize);
        let garbage: Vec<u8> = (0..len).map(|_| rng.gen_range(1..=255u8)).collect();
        framer.stream_mut().feed(&garbage);

        framer.poll_incoming().unwrap();
        assert!(framer.overflowed());
        assert!(!framer.frame_ready());
        assert!(framer.frame().is_none());

        framer.flush().unwrap();
        assert_eq!(framer.stream().unread(), 0);

        // The rest of the garbage frame trickles in before the next real one.
        let tail_len = rng.gen_range(0..50usize);
        let tail: Vec<u8> = (0..tail_len).map(|_| rng.gen_range(1..=255u8)).collect();
        framer.stream_mut().feed(&tail);
        framer.poll_incoming().unwrap();
        assert!(!framer.frame_ready());

        framer.stream_mut().feed(b"\0r|ok\0");
        framer.poll_incoming().unwrap();
        assert!(framer.frame_ready());
        assert_eq!(framer.read_tag(), Some(b'r'));
        assert_eq!(framer.read_str(), Some("ok"));
        framer.reset();
    }
    assert_eq!(framer.stats().overflows, 16);
}

#[test]
fn test_partial_frame_waits_for_more_bytes() {
    let mut framer: Framer<_> = Framer::new(MockStream::new());
    framer.stream_mut().feed(b"m|sensor2/hum");
    framer.poll_incoming().unwrap();
    assert!(!framer.frame_ready());

    framer.stream_mut().feed(b"idity|55\0");
    framer.poll_incoming().unwrap();
    let frame = framer.frame().unwrap();
    assert_eq!(frame.fields().collect::<Vec<_>>(), ["sensor2/humidity", "55"]);
}
