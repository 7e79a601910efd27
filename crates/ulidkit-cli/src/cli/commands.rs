use std::{io, io::Write, time::Duration};

use thiserror::Error;
use ulidkit::{
    BasicMonoUlidGenerator, IdGenStatus, RandSource, Randomness, SystemClock, ThreadRandom,
    TimeSource, Ulid,
};

use super::config::{Config, GenerateConfig, InspectConfig};

#[derive(Debug, Error)]
pub enum CommandError {
    /// A fixed timestamp leaves no later millisecond to roll over into.
    #[error("random field exhausted at timestamp {millis}ms after {generated} IDs")]
    RandomExhausted { millis: u64, generated: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Either the wall clock or a pinned `--timestamp`.
#[derive(Debug, Clone, Copy)]
enum Clock {
    System(SystemClock),
    Fixed(u64),
}

impl TimeSource for Clock {
    fn current_millis(&self) -> u64 {
        match self {
            Self::System(clock) => clock.current_millis(),
            Self::Fixed(millis) => *millis,
        }
    }
}

pub fn run(config: &Config, out: &mut impl Write) -> Result<(), CommandError> {
    match config {
        Config::Generate(config) => generate(config, out),
        Config::Inspect(config) => inspect(config, out),
    }
}

fn generate(config: &GenerateConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let clock = config
        .timestamp
        .map_or(Clock::System(SystemClock), |ts| Clock::Fixed(ts.millis()));

    if config.monotonic {
        let generator = BasicMonoUlidGenerator::new(clock, ThreadRandom);
        return write_monotonic(&generator, clock, config.count, out);
    }

    for _ in 0..config.count {
        let id = match config.timestamp {
            Some(ts) => Ulid::from_parts(ts, Randomness::random()),
            None => Ulid::new(),
        };
        writeln!(out, "{id}")?;
    }
    Ok(())
}

fn write_monotonic<R: RandSource>(
    generator: &BasicMonoUlidGenerator<Clock, R>,
    clock: Clock,
    count: usize,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let mut generated = 0;
    while generated < count {
        match generator.next_id() {
            IdGenStatus::Ready { id } => {
                writeln!(out, "{id}")?;
                generated += 1;
            }
            IdGenStatus::Pending { yield_for } => {
                if let Clock::Fixed(millis) = clock {
                    return Err(CommandError::RandomExhausted { millis, generated });
                }
                tracing::debug!(yield_for, generated, "generator pending, sleeping");
                std::thread::sleep(Duration::from_millis(yield_for));
            }
        }
    }
    Ok(())
}

fn inspect(config: &InspectConfig, out: &mut impl Write) -> Result<(), CommandError> {
    let label = if config.zone.is_utc() { "UTC" } else { "local" };
    for id in &config.ulids {
        let naive = id.to_naive(config.zone);
        writeln!(out, "{id}")?;
        writeln!(out, "  timestamp  {}", id.millis())?;
        writeln!(out, "  datetime   {} {label}", naive.format("%Y-%m-%d %H:%M:%S%.3f"))?;
        writeln!(out, "  random     0x{:020X}", id.randomness().to_u128())?;
    }
    Ok(())
}
