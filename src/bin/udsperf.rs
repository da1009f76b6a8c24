// udsperf: run one side of the datagram socket latency benchmark.
//
// Start the leader first, then the follower:
//   udsperf leader --payload-size 64 --payload-size 4096 --round-trips 10000
//   udsperf follower

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dmxp_udsperf::Core::MAX_MESSAGE_SIZE;
use dmxp_udsperf::Perf::{
    Follower, LatencyReport, Leader, PerfBuilder, PerfConfig, FOLLOWER_SOCKET_PATH,
    LEADER_SOCKET_PATH,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_PAYLOAD_SIZE: u32 = 64;
const DEFAULT_ROUND_TRIPS: u64 = 10_000;

/// Datagram socket round-trip latency benchmark
#[derive(Parser, Debug)]
#[command(name = "udsperf")]
#[command(version, about = "Round-trip latency benchmark over Unix datagram sockets")]
struct Cli {
    #[command(subcommand)]
    role: Role,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Role {
    /// Wait for a follower, time the ping-pong loop and print the latency
    Leader {
        /// Address to bind and receive on
        #[arg(long, default_value = LEADER_SOCKET_PATH)]
        own: PathBuf,

        /// Follower address to send to
        #[arg(long, default_value = FOLLOWER_SOCKET_PATH)]
        peer: PathBuf,

        /// Payload size in bytes; repeat to sweep several sizes in one session
        #[arg(long = "payload-size", value_delimiter = ',', default_values_t = [DEFAULT_PAYLOAD_SIZE])]
        payload_sizes: Vec<u32>,

        /// Round trips timed per payload size
        #[arg(long, default_value_t = DEFAULT_ROUND_TRIPS)]
        round_trips: u64,

        /// Largest single datagram; bigger payloads are fragmented
        #[arg(long, default_value_t = MAX_MESSAGE_SIZE)]
        max_datagram_size: usize,
    },
    /// Register with the leader and echo messages until told to stop
    Follower {
        /// Address to bind and receive on
        #[arg(long, default_value = FOLLOWER_SOCKET_PATH)]
        own: PathBuf,

        /// Leader address to send to
        #[arg(long, default_value = LEADER_SOCKET_PATH)]
        peer: PathBuf,

        /// Largest single datagram; must match the leader
        #[arg(long, default_value_t = MAX_MESSAGE_SIZE)]
        max_datagram_size: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Any failure aborts the whole run; nothing is reported for a partial run.
    if let Err(err) = run(cli.role) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "udsperf=debug,dmxp_udsperf=debug"
    } else {
        "udsperf=info,dmxp_udsperf=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run(role: Role) -> anyhow::Result<()> {
    match role {
        Role::Leader {
            own,
            peer,
            payload_sizes,
            round_trips,
            max_datagram_size,
        } => {
            let config = build_config(own, peer, max_datagram_size)?;
            let reports = run_leader(&config, &payload_sizes, round_trips)?;
            for report in &reports {
                println!(
                    "payload {} B, {} round trips: {:.3} µs mean one-way latency",
                    report.payload_size, report.round_trips, report.latency_us
                );
            }
            Ok(())
        }
        Role::Follower {
            own,
            peer,
            max_datagram_size,
        } => {
            let config = build_config(own, peer, max_datagram_size)?;
            run_follower(&config)
        }
    }
}

fn build_config(own: PathBuf, peer: PathBuf, max_datagram_size: usize) -> anyhow::Result<PerfConfig> {
    PerfBuilder::new()
        .with_own_address(own)
        .with_peer_address(peer)
        .with_max_datagram_size(max_datagram_size)
        .build()
        .context("invalid benchmark settings")
}

fn run_leader(
    config: &PerfConfig,
    payload_sizes: &[u32],
    round_trips: u64,
) -> anyhow::Result<Vec<LatencyReport>> {
    let mut leader = Leader::open(config).context("leader setup failed")?;
    leader.await_follower().context("follower handshake failed")?;

    let mut reports = Vec::with_capacity(payload_sizes.len());
    for &payload_size in payload_sizes {
        let report = leader
            .measure(payload_size, round_trips)
            .with_context(|| format!("measurement with {} byte payload failed", payload_size))?;
        reports.push(report);
    }

    leader.terminate().context("termination failed")?;
    leader.close().context("leader shutdown failed")?;
    Ok(reports)
}

fn run_follower(config: &PerfConfig) -> anyhow::Result<()> {
    let mut follower = Follower::open(config).context("follower setup failed")?;
    follower
        .register()
        .context("registration failed, is the leader running?")?;

    let echoes = follower.run().context("echo loop failed")?;
    tracing::info!(echoes, "follower finished");

    follower.close().context("follower shutdown failed")?;
    Ok(())
}
