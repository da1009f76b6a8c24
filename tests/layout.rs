// Header layout conformance tests.
// A C or C++ peer reinterprets its receive buffer as
// `struct { uint32_t payloadSize; bool run; uint32_t subPackets; }`,
// so the encoded offsets must match that record on this platform.
use dmxp_udsperf::Perf::Structs::Header_Structs::{
    FRAGMENT_COUNT_OFFSET, PAYLOAD_SIZE_OFFSET, RUN_OFFSET,
};
use dmxp_udsperf::Perf::Structs::{PerfTopic, HEADER_SIZE};
use dmxp_udsperf::HeaderError;
use memoffset::offset_of;
use std::mem::size_of;

#[repr(C)]
#[allow(dead_code)]
struct CPerfTopic {
    payload_size: u32,
    run: bool,
    sub_packets: u32,
}

#[test]
fn test_header_matches_c_record_layout() {
    let size = size_of::<CPerfTopic>();
    let off_payload_size = offset_of!(CPerfTopic, payload_size);
    let off_run = offset_of!(CPerfTopic, run);
    let off_sub_packets = offset_of!(CPerfTopic, sub_packets);

    println!(
        "CPerfTopic => size: {size}, offsets: [payload_size:{off_payload_size}, run:{off_run}, sub_packets:{off_sub_packets}]"
    );

    assert_eq!(size, HEADER_SIZE);
    assert_eq!(off_payload_size, PAYLOAD_SIZE_OFFSET);
    assert_eq!(off_run, RUN_OFFSET);
    assert_eq!(off_sub_packets, FRAGMENT_COUNT_OFFSET);
}

#[test]
fn test_encode_uses_native_byte_order() {
    let bytes = PerfTopic::new(0x0102_0304, true, 7).encode();

    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(&bytes[0..4], &0x0102_0304u32.to_ne_bytes());
    // run is a single byte at its C offset, padding zeroed.
    assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
    assert_eq!(&bytes[8..12], &7u32.to_ne_bytes());

    let stop = PerfTopic::new(HEADER_SIZE as u32, false, 1).encode();
    assert_eq!(&stop[4..8], &[0, 0, 0, 0]);
}

#[test]
fn test_decode_ignores_payload_filler() {
    let topic = PerfTopic::new(8193, true, 2);
    let mut datagram = vec![0xABu8; 4096];
    datagram[..HEADER_SIZE].copy_from_slice(&topic.encode());

    assert_eq!(PerfTopic::decode(&datagram), Ok(topic));
}

#[test]
fn test_decode_rejects_short_datagram() {
    let bytes = PerfTopic::new(64, true, 1).encode();

    assert_eq!(
        PerfTopic::decode(&bytes[..HEADER_SIZE - 1]),
        Err(HeaderError::Truncated {
            len: HEADER_SIZE - 1,
            needed: HEADER_SIZE
        })
    );
    assert!(PerfTopic::decode(&[]).is_err());
}

#[test]
fn test_decode_ignores_run_padding() {
    // A C sender writes `bool run` as one byte and leaves the padding as
    // whatever was on its stack.
    let mut bytes = [0u8; HEADER_SIZE];
    bytes[PAYLOAD_SIZE_OFFSET..RUN_OFFSET].copy_from_slice(&64u32.to_ne_bytes());
    bytes[RUN_OFFSET..FRAGMENT_COUNT_OFFSET].copy_from_slice(&[0x01, 0xAA, 0x55, 0x7F]);
    bytes[FRAGMENT_COUNT_OFFSET..HEADER_SIZE].copy_from_slice(&1u32.to_ne_bytes());

    assert_eq!(PerfTopic::decode(&bytes), Ok(PerfTopic::new(64, true, 1)));

    bytes[RUN_OFFSET] = 0x00;
    assert_eq!(PerfTopic::decode(&bytes), Ok(PerfTopic::new(64, false, 1)));
}
