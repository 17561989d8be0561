//! End-to-end tests for the serial handler: bytes in, consumer calls and
//! pong replies out.

use crate::mock_hw::{Call, MemorySource, RecordingConsumer};

use floppyctl::config::{CMD_PING, DeviceConfig, MAX_FRAME_LEN};
use floppyctl::protocol::{Position, SerialHandler, encode_frame, pong_frame};

fn handler() -> SerialHandler {
    SerialHandler::new(&DeviceConfig::default()).unwrap()
}

fn frame(address: u8, sub: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = [0u8; MAX_FRAME_LEN];
    let n = encode_frame(address, sub, command, payload, &mut buf).unwrap();
    buf[..n].to_vec()
}

fn device(sub_address: u8, command: u8, payload: &[u8]) -> Call {
    Call::Device {
        sub_address,
        command,
        payload: payload.to_vec(),
    }
}

// ── Reference frame ───────────────────────────────────────────

#[test]
fn note_on_reaches_device_handler() {
    let mut h = handler();
    let mut src = MemorySource::with(&[0x4D, 0x01, 0x03, 0x02, 0x09, 0x3C]);
    let mut c = RecordingConsumer::new();

    assert_eq!(h.drain_messages(&mut src, &mut c), 1);

    assert_eq!(c.calls, vec![device(3, 0x09, &[0x3C])]);
    assert!(src.tx.is_empty());
    assert_eq!(h.position(), Position::AwaitStart);
}

#[test]
fn new_rejects_invalid_config() {
    let config = DeviceConfig {
        device_address: 0x00,
        ..DeviceConfig::default()
    };
    assert!(SerialHandler::new(&config).is_err());
}

// ── Resynchronisation ─────────────────────────────────────────

#[test]
fn noise_without_start_byte_is_consumed() {
    let mut h = handler();
    let noise: Vec<u8> = (0u8..=255).filter(|b| *b != 0x4D).collect();
    let mut src = MemorySource::with(&noise);
    let mut c = RecordingConsumer::new();

    assert_eq!(h.drain_messages(&mut src, &mut c), 0);

    assert_eq!(src.pending(), 0);
    assert_eq!(h.position(), Position::AwaitStart);
    assert!(c.calls.is_empty());
}

#[test]
fn frame_after_noise_is_found() {
    let mut h = handler();
    let mut src = MemorySource::with(&[0x00, 0x13, 0xFF]);
    src.push(&frame(0x01, 2, 0x08, &[]));
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(2, 0x08, &[])]);
}

// ── Partial delivery ──────────────────────────────────────────

#[test]
fn byte_at_a_time_delivery_dispatches_once() {
    let bytes = frame(0x01, 5, 0x0E, &[0x20, 0x00]);
    let mut h = handler();
    let mut src = MemorySource::new();
    let mut c = RecordingConsumer::new();

    for b in &bytes {
        assert_eq!(h.drain_messages(&mut src, &mut c), 0);
        src.push(&[*b]);
        h.drain_messages(&mut src, &mut c);
    }
    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(5, 0x0E, &[0x20, 0x00])]);
}

#[test]
fn partial_body_waits_without_consuming() {
    let mut h = handler();
    let mut src = MemorySource::with(&[0x4D, 0x01, 0x01, 0x03, 0x09]);
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);
    assert_eq!(h.position(), Position::AwaitBody { declared: 3 });
    assert_eq!(src.pending(), 1, "body bytes stay buffered until complete");

    // Repeated polls with nothing new change nothing.
    for _ in 0..10 {
        assert_eq!(h.drain_messages(&mut src, &mut c), 0);
    }
    assert_eq!(src.pending(), 1);

    src.push(&[60, 127]);
    assert_eq!(h.drain_messages(&mut src, &mut c), 1);
    assert_eq!(c.calls, vec![device(1, 0x09, &[60, 127])]);
}

#[test]
fn read_failure_is_retried_on_next_drain() {
    let mut h = handler();
    let mut src = MemorySource::with(&frame(0x01, 1, 0x08, &[]));
    let mut c = RecordingConsumer::new();
    src.fail_reads = true;

    assert_eq!(h.drain_messages(&mut src, &mut c), 0);
    assert_eq!(h.position(), Position::AwaitStart);

    src.fail_reads = false;
    assert_eq!(h.drain_messages(&mut src, &mut c), 1);
}

#[test]
fn empty_source_makes_no_reads() {
    let mut h = handler();
    let mut src = MemorySource::new();
    let mut c = RecordingConsumer::new();

    assert_eq!(h.drain_messages(&mut src, &mut c), 0);
    assert_eq!(src.read_calls, 0);
}

// ── Addressing ────────────────────────────────────────────────

#[test]
fn frames_for_other_devices_are_ignored() {
    let mut h = handler();
    let mut src = MemorySource::with(&[0x4D, 0x02]);
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);
    assert_eq!(h.position(), Position::AwaitStart);

    src.push(&[0x01, 0x02, 0x08, 0x00]);
    h.drain_messages(&mut src, &mut c);
    assert!(c.calls.is_empty());
}

#[test]
fn foreign_frame_body_is_rescanned() {
    // A frame for device 0x02 whose body happens to contain a frame for us.
    // The body is not skipped, so the embedded frame is delivered.
    let mut h = handler();
    let mut src = MemorySource::with(&[0x4D, 0x02, 0x01, 0x05, 0x4D, 0x01, 0x01, 0x01, 0x08]);
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(1, 0x08, &[])]);
}

#[test]
fn sub_address_range_is_enforced() {
    let config = DeviceConfig {
        min_sub_address: 2,
        max_sub_address: 5,
        ..DeviceConfig::default()
    };

    for (sub, accepted) in [(0, true), (1, false), (2, true), (5, true), (6, false)] {
        let mut h = SerialHandler::new(&config).unwrap();
        let mut src = MemorySource::with(&frame(0x01, sub, 0x08, &[]));
        let mut c = RecordingConsumer::new();

        h.drain_messages(&mut src, &mut c);

        assert_eq!(c.calls.len(), usize::from(accepted), "sub-address {sub}");
        assert_eq!(h.position(), Position::AwaitStart);
    }
}

#[test]
fn broadcast_messages_go_to_system_handler() {
    let mut h = handler();
    let mut src = MemorySource::with(&frame(0x00, 0x00, 0xFA, &[]));
    src.push(&frame(0x00, 0x00, 0xFF, &[7, 8]));
    let mut c = RecordingConsumer::new();

    assert_eq!(h.drain_messages(&mut src, &mut c), 2);
    assert_eq!(
        c.calls,
        vec![
            Call::System {
                command: 0xFA,
                payload: vec![]
            },
            Call::System {
                command: 0xFF,
                payload: vec![7, 8]
            },
        ]
    );
}

// ── Ping / pong ───────────────────────────────────────────────

#[test]
fn broadcast_ping_is_answered_not_forwarded() {
    for payload in [&[][..], &[1u8, 2, 3][..]] {
        let mut h = handler();
        let mut src = MemorySource::with(&frame(0x00, 0x00, CMD_PING, payload));
        let mut c = RecordingConsumer::new();

        assert_eq!(h.drain_messages(&mut src, &mut c), 1);

        assert_eq!(src.tx, vec![0x4D, 0x00, 0x00, 0x04, 0x81, 0x01, 0x01, 0x08]);
        assert!(c.calls.is_empty());
    }
}

#[test]
fn pong_reflects_configuration() {
    let config = DeviceConfig {
        device_address: 0x05,
        min_sub_address: 3,
        max_sub_address: 6,
        ..DeviceConfig::default()
    };
    let mut h = SerialHandler::new(&config).unwrap();
    let mut src = MemorySource::with(&frame(0x00, 0x00, CMD_PING, &[]));
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);

    assert_eq!(src.tx, pong_frame(&config).to_vec());
    assert_eq!(&src.tx[5..], &[0x05, 3, 6]);
}

// ── Edge cases ────────────────────────────────────────────────

#[test]
fn zero_length_body_is_a_no_op() {
    for address in [0x00, 0x01] {
        let mut h = handler();
        let mut src = MemorySource::with(&[0x4D, address, 0x00, 0x00]);
        let mut c = RecordingConsumer::new();

        assert_eq!(h.drain_messages(&mut src, &mut c), 0);

        assert!(c.calls.is_empty());
        assert!(src.tx.is_empty());
        assert_eq!(h.position(), Position::AwaitStart);
    }
}

#[test]
fn oversized_body_is_dropped() {
    let config = DeviceConfig {
        max_body_size: 2,
        ..DeviceConfig::default()
    };
    let mut h = SerialHandler::new(&config).unwrap();
    let mut src = MemorySource::with(&frame(0x01, 1, 0x09, &[60, 61]));
    src.push(&frame(0x01, 1, 0x09, &[62]));
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(1, 0x09, &[62])]);
}

#[test]
fn scratch_reuse_never_leaks_previous_payload() {
    let mut h = handler();
    let mut src = MemorySource::with(&frame(0x01, 1, 0x09, &[1, 2, 3, 4, 5]));
    src.push(&frame(0x01, 2, 0x09, &[9]));
    src.push(&frame(0x01, 3, 0x08, &[]));
    let mut c = RecordingConsumer::new();

    assert_eq!(h.drain_messages(&mut src, &mut c), 3);

    assert_eq!(
        c.calls,
        vec![
            device(1, 0x09, &[1, 2, 3, 4, 5]),
            device(2, 0x09, &[9]),
            device(3, 0x08, &[]),
        ]
    );
}

#[test]
fn max_size_frame_round_trips() {
    let payload: Vec<u8> = (0..254).map(|i| i as u8).collect();
    let mut h = handler();
    let mut src = MemorySource::with(&frame(0x01, 8, 0x42, &payload));
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(8, 0x42, &payload)]);
}

#[test]
fn reset_abandons_partial_frame() {
    let mut h = handler();
    let mut src = MemorySource::with(&[0x4D, 0x01, 0x01, 0x02, 0x09]);
    let mut c = RecordingConsumer::new();

    h.drain_messages(&mut src, &mut c);
    assert_eq!(h.position(), Position::AwaitBody { declared: 2 });

    h.reset();
    // The leftover 0x09 and the next frame are scanned from scratch.
    src.push(&frame(0x01, 4, 0x08, &[]));
    h.drain_messages(&mut src, &mut c);

    assert_eq!(c.calls, vec![device(4, 0x08, &[])]);
}
