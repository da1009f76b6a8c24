use dmxp_udsperf::Perf::{LatencyMeter, TRANSMISSIONS_PER_ROUND_TRIP};
use dmxp_udsperf::PerfError;
use std::io;
use std::thread;
use std::time::Duration;

#[test]
fn test_latency_counts_two_transmissions_per_round_trip() {
    assert_eq!(TRANSMISSIONS_PER_ROUND_TRIP, 2);

    // 1000 round trips at 5 µs per transmission.
    let meter = LatencyMeter::new(1000).unwrap();
    let elapsed = Duration::from_nanos(2 * 1000 * 5_000);
    assert_eq!(meter.one_way_latency_us(elapsed), 5.0);
}

#[test]
fn test_latency_truncates_to_whole_nanoseconds() {
    let meter = LatencyMeter::new(1).unwrap();
    assert_eq!(meter.one_way_latency_us(Duration::from_nanos(2001)), 1.0);
    assert_eq!(meter.one_way_latency_us(Duration::from_nanos(3)), 0.001);
}

#[test]
fn test_latency_is_independent_of_round_trip_count() {
    // Same per-transmission cost, different run lengths.
    let per_transmission_ns = 7_300u64;
    let latencies: Vec<f64> = [250u64, 500, 1000, 2000]
        .iter()
        .map(|&n| {
            let meter = LatencyMeter::new(n).unwrap();
            meter.one_way_latency_us(Duration::from_nanos(per_transmission_ns * 2 * n))
        })
        .collect();

    for latency in &latencies {
        assert_eq!(*latency, 7.3);
    }
}

#[test]
fn test_timed_loop_with_constant_service_time() {
    let service = Duration::from_millis(1);

    let mut results = Vec::new();
    for round_trips in [10u64, 20] {
        let meter = LatencyMeter::new(round_trips).unwrap();
        let report = meter
            .measure(64, || {
                for _ in 0..round_trips {
                    // One receive plus one send per round trip.
                    thread::sleep(service * 2);
                }
                Ok(())
            })
            .unwrap();

        println!("round trips {} => {:.3} µs", round_trips, report.latency_us);
        assert_eq!(report.payload_size, 64);
        assert_eq!(report.round_trips, round_trips);
        assert!(report.elapsed >= service * 2 * round_trips as u32);
        results.push(report.latency_us);
    }

    let service_us = service.as_micros() as f64;
    for latency in &results {
        assert!(*latency >= service_us, "latency {} below service time", latency);
        assert!(*latency < service_us * 3.0, "latency {} far above service time", latency);
    }
}

#[test]
fn test_zero_round_trips_rejected() {
    assert!(matches!(LatencyMeter::new(0), Err(PerfError::Config(_))));
}

#[test]
fn test_loop_failure_propagates() {
    let meter = LatencyMeter::new(10).unwrap();
    let result = meter.measure(64, || {
        Err(PerfError::Receive(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "peer went away",
        )))
    });
    assert!(matches!(result, Err(PerfError::Receive(_))));
}
