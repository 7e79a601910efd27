use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use ulidkit::{Timestamp, Ulid, Zone};

/// Upper bound on `--count`, to keep a typo from flooding the terminal.
pub const MAX_COUNT: usize = 10_000_000;

/// Command-line arguments for the `ulidkit` binary.
///
/// Options marked with an environment variable can also be set there or in a
/// `.env` file in the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ulidkit",
    version,
    about = "Generate and inspect ULIDs (sortable 128-bit identifiers)"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print new ULIDs, one per line.
    Generate(GenerateArgs),
    /// Decode ULIDs and print their timestamp and random field.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Number of ULIDs to print.
    ///
    /// Environment variable: `ULIDKIT_COUNT`
    #[arg(short = 'n', long, env = "ULIDKIT_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Make every ULID sort strictly after the previous one, even within the
    /// same millisecond.
    ///
    /// Environment variable: `ULIDKIT_MONOTONIC`
    #[arg(short, long, env = "ULIDKIT_MONOTONIC", default_value_t = false)]
    pub monotonic: bool,

    /// Use this timestamp (milliseconds since the Unix epoch) instead of the
    /// current time.
    #[arg(short, long)]
    pub timestamp: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// ULIDs to decode. Lowercase and the Crockford aliases (O, I, L) are
    /// accepted.
    #[arg(required = true)]
    pub ulids: Vec<String>,

    /// Timezone used to print calendar times.
    ///
    /// Environment variable: `ULIDKIT_ZONE`
    #[arg(short, long, env = "ULIDKIT_ZONE", value_enum, default_value_t = ZoneArg::Utc)]
    pub zone: ZoneArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneArg {
    Utc,
    Local,
}

impl From<ZoneArg> for Zone {
    fn from(zone: ZoneArg) -> Self {
        match zone {
            ZoneArg::Utc => Self::Utc,
            ZoneArg::Local => Self::Local,
        }
    }
}

/// Validated configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Config {
    Generate(GenerateConfig),
    Inspect(InspectConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub count: usize,
    pub monotonic: bool,
    pub timestamp: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectConfig {
    pub ulids: Vec<Ulid>,
    pub zone: Zone,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        match args.command {
            Command::Generate(args) => GenerateConfig::try_from(args).map(Self::Generate),
            Command::Inspect(args) => InspectConfig::try_from(args).map(Self::Inspect),
        }
    }
}

impl TryFrom<GenerateArgs> for GenerateConfig {
    type Error = anyhow::Error;

    fn try_from(args: GenerateArgs) -> Result<Self, Self::Error> {
        if args.count == 0 {
            bail!("--count (ULIDKIT_COUNT) must be greater than 0");
        }

        if args.count > MAX_COUNT {
            bail!(
                "--count (ULIDKIT_COUNT) is {}, above the maximum of {}",
                args.count,
                MAX_COUNT
            );
        }

        let timestamp = args
            .timestamp
            .map(Timestamp::from_millis)
            .transpose()
            .context("invalid --timestamp")?;

        Ok(Self {
            count: args.count,
            monotonic: args.monotonic,
            timestamp,
        })
    }
}

impl TryFrom<InspectArgs> for InspectConfig {
    type Error = anyhow::Error;

    fn try_from(args: InspectArgs) -> Result<Self, Self::Error> {
        let ulids = args
            .ulids
            .iter()
            .map(|s| Ulid::decode(s).with_context(|| format!("invalid ULID {s:?}")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ulids,
            zone: args.zone.into(),
        })
    }
}
