use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};
use log::LevelFilter;

use tsp_anneal::{AnnealConfig, CoolingSchedule, InitialTour, PointSource, StopCondition};

/// Approximates a shortest closed tour through 2D points with simulated
/// annealing and periodic reheating.
#[derive(Parser, Debug)]
#[command(name = "tsp-anneal", about, version)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "count"])))]
pub struct Cli {
    /// Delimited file with one `x,y` point per row
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Number of random points to generate
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(3..))]
    pub count: Option<u64>,

    /// Iterations between temperature resets
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub reheat: u64,

    /// Iterations to perform; without it `--animate` runs until stdin closes
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        required_unless_present = "animate"
    )]
    pub iterations: Option<u64>,

    /// PRNG seed for reproducible runs
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Stream a frame to stdout whenever the best tour improves
    #[arg(long)]
    pub animate: bool,

    /// Temperature at the start of every reheat cycle
    #[arg(long, default_value_t = 1.0, value_parser = positive_f64)]
    pub initial_temperature: f64,

    /// Lowest temperature reached by the linear and Lundy-Mees schedules;
    /// a geometric cycle must not cool below it
    #[arg(long, default_value_t = 1e-6, value_parser = positive_f64)]
    pub min_temperature: f64,

    /// Cooling schedule within a reheat cycle
    #[arg(long, value_enum, default_value_t = Cooling::Harmonic)]
    pub cooling: Cooling,

    /// Geometric cooling factor, in (0, 1)
    #[arg(long, default_value_t = 0.95, value_parser = unit_interval_f64)]
    pub alpha: f64,

    /// Lundy-Mees cooling parameter; derived from the temperatures and
    /// reheat interval when omitted
    #[arg(long, value_parser = positive_f64)]
    pub beta: Option<f64>,

    /// Start from the input order instead of a random shuffle
    #[arg(long)]
    pub keep_order: bool,

    /// Write the best tour as `x,y` rows
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Prefix log lines with a millisecond timestamp
    #[arg(long)]
    pub log_timestamp: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Cooling {
    Harmonic,
    Geometric,
    Linear,
    LundyMees,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    pub fn point_source(&self) -> PointSource {
        match (&self.file, self.count) {
            (Some(path), _) => PointSource::File(path.clone()),
            (None, Some(count)) => PointSource::Random {
                count: count as usize,
            },
            // clap enforces exactly one source.
            (None, None) => unreachable!("no point source"),
        }
    }

    pub fn stop_condition(&self) -> StopCondition {
        match self.iterations {
            Some(n) => StopCondition::Iterations(n as usize),
            None => StopCondition::External,
        }
    }

    /// Builds the run configuration, reporting combinations that no single
    /// flag can reject (e.g. a geometric cycle cooling below the floor) as
    /// usage errors.
    pub fn validated_config(&self, seed: u64) -> Result<AnnealConfig, clap::Error> {
        let config = self.anneal_config(seed);
        config
            .validate()
            .map_err(|e| Cli::command().error(ErrorKind::ValueValidation, e))?;
        Ok(config)
    }

    pub fn anneal_config(&self, seed: u64) -> AnnealConfig {
        let reheat = self.reheat as usize;
        let cooling = match self.cooling {
            Cooling::Harmonic => CoolingSchedule::Harmonic,
            Cooling::Geometric => CoolingSchedule::Geometric { alpha: self.alpha },
            Cooling::Linear => CoolingSchedule::Linear,
            Cooling::LundyMees => {
                let (t0, t_min) = (self.initial_temperature, self.min_temperature);
                let beta = self
                    .beta
                    .unwrap_or_else(|| (t0 - t_min) / (reheat as f64 * t0 * t_min));
                CoolingSchedule::LundyMees { beta }
            }
        };
        let initial_tour = if self.keep_order {
            InitialTour::Identity
        } else {
            InitialTour::Shuffled
        };

        AnnealConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(self.min_temperature)
            .with_cooling(cooling)
            .with_reheat_interval(reheat)
            .with_stop(self.stop_condition())
            .with_initial_tour(initial_tour)
            .with_seed(seed)
    }
}

fn positive_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("must be positive and finite, got {raw}"))
    }
}

fn unit_interval_f64(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(format!("must be in (0, 1), got {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("tsp-anneal").chain(args.iter().copied()))
    }

    #[test]
    fn parses_count_run() {
        let cli = parse(&["-n", "20", "-r", "50", "-i", "500", "-s", "7"]).expect("valid args");
        assert_eq!(cli.point_source(), PointSource::Random { count: 20 });
        let config = cli.anneal_config(7);
        assert_eq!(config.reheat_interval, 50);
        assert_eq!(config.stop, StopCondition::Iterations(500));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cooling, CoolingSchedule::Harmonic);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_file_run() {
        let cli = parse(&["--file", "pts.csv", "--reheat", "10", "--iterations", "3"])
            .expect("valid args");
        assert_eq!(cli.point_source(), PointSource::File(PathBuf::from("pts.csv")));
    }

    #[test]
    fn rejects_both_sources() {
        let err = parse(&["-f", "pts.csv", "-n", "10", "-r", "5", "-i", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_missing_source() {
        let err = parse(&["-r", "5", "-i", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_missing_reheat() {
        let err = parse(&["-n", "10", "-i", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_zero_reheat_and_small_count() {
        assert!(parse(&["-n", "10", "-r", "0", "-i", "5"]).is_err());
        assert!(parse(&["-n", "2", "-r", "5", "-i", "5"]).is_err());
        assert!(parse(&["-n", "10", "-r", "5", "-i", "0"]).is_err());
    }

    #[test]
    fn iterations_required_unless_animating() {
        let err = parse(&["-n", "10", "-r", "5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = parse(&["-n", "10", "-r", "5", "--animate"]).expect("animate without budget");
        assert_eq!(cli.stop_condition(), StopCondition::External);

        let cli = parse(&["-n", "10", "-r", "5", "-i", "9", "--animate"]).expect("animate with budget");
        assert_eq!(cli.stop_condition(), StopCondition::Iterations(9));
    }

    #[test]
    fn lundy_mees_beta_derived_from_reheat() {
        let cli = parse(&[
            "-n", "10", "-r", "100", "-i", "5", "--cooling", "lundy-mees",
            "--initial-temperature", "1", "--min-temperature", "0.01",
        ])
        .expect("valid args");
        match cli.anneal_config(0).cooling {
            CoolingSchedule::LundyMees { beta } => assert!((beta - 0.99).abs() < 1e-12),
            other => panic!("unexpected schedule {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_schedule_knobs() {
        for args in [
            ["--alpha", "1.5"],
            ["--alpha", "0"],
            ["--beta", "-1"],
            ["--initial-temperature", "0"],
            ["--initial-temperature", "nan"],
            ["--min-temperature", "-0.1"],
        ] {
            let err = parse(&["-n", "10", "-r", "5", "-i", "5", args[0], args[1]]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValueValidation, "{args:?}");
        }
    }

    #[test]
    fn combined_schedule_errors_are_usage_errors() {
        let cli = parse(&[
            "-n", "10", "-r", "5000", "-i", "5", "--cooling", "geometric", "--alpha", "0.5",
        ])
        .expect("each flag is valid on its own");
        let err = cli.validated_config(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("min_temperature"));

        let cli = parse(&[
            "-n", "10", "-r", "5", "-i", "5", "--cooling", "linear", "--min-temperature", "2",
        ])
        .expect("each flag is valid on its own");
        assert!(cli.validated_config(0).is_err());

        let cli = parse(&["-n", "10", "-r", "50", "-i", "5"]).expect("valid args");
        assert_eq!(cli.validated_config(3).unwrap().seed, Some(3));
    }

    #[test]
    fn keep_order_selects_identity() {
        let cli = parse(&["-n", "10", "-r", "5", "-i", "5", "--keep-order"]).expect("valid args");
        assert_eq!(cli.anneal_config(0).initial_tour, InitialTour::Identity);
    }
}
