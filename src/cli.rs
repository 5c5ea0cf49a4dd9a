use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Live terminal dashboard of CPU, memory, disk, network and GPU counters.
#[derive(Debug, Parser)]
#[command(name = "hwpulse", version, about)]
pub struct Cli {
    /// Refresh interval in whole seconds (defaults to 1)
    #[arg(allow_hyphen_values = true)]
    pub interval: Option<String>,

    /// Anything after the interval is ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

/// Outcome of reading the interval argument. `notice` carries the line to
/// show when the default had to be used or arguments were ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub every: Duration,
    pub notice: Option<String>,
}

impl Cli {
    /// Reads the interval from `args`. Help and version requests come back as
    /// the clap error to print; any other parse failure falls back to the
    /// default interval so the program never exits on bad input.
    pub fn interval_from<I, T>(args: I) -> Result<Interval, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli.interval()),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                Err(e)
            }
            Err(e) => Ok(Interval {
                every: Duration::from_secs(DEFAULT_INTERVAL_SECS),
                notice: Some(format!(
                    "Could not read arguments ({}), using {} second.",
                    e.kind(),
                    DEFAULT_INTERVAL_SECS
                )),
            }),
        }
    }

    pub fn interval(&self) -> Interval {
        let mut interval = parse_interval(self.interval.as_deref());
        if !self.extra.is_empty() {
            let ignored = format!("Ignoring extra arguments: {}", self.extra.join(" "));
            interval.notice = Some(match interval.notice {
                Some(notice) => format!("{} {}", notice, ignored),
                None => ignored,
            });
        }
        interval
    }
}

pub fn parse_interval(arg: Option<&str>) -> Interval {
    let fallback = |notice: String| Interval {
        every: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        notice: Some(notice),
    };

    match arg.map(str::trim) {
        None | Some("") => fallback(format!(
            "No refresh interval given, using {} second.",
            DEFAULT_INTERVAL_SECS
        )),
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs >= 1 => Interval {
                every: Duration::from_secs(secs),
                notice: None,
            },
            _ => fallback(format!(
                "Invalid refresh interval '{}', using {} second.",
                raw, DEFAULT_INTERVAL_SECS
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_interval() {
        let interval = parse_interval(Some("5"));
        assert_eq!(interval.every, Duration::from_secs(5));
        assert_eq!(interval.notice, None);
    }

    #[test]
    fn test_absent_interval() {
        let interval = parse_interval(None);
        assert_eq!(interval.every, Duration::from_secs(1));
        assert!(interval.notice.unwrap().contains("No refresh interval"));
    }

    #[test]
    fn test_invalid_intervals() {
        for raw in ["0", "-3", "1.5", "fast", "99999999999999999999999"] {
            let interval = parse_interval(Some(raw));
            assert_eq!(interval.every, Duration::from_secs(1), "{raw}");
            assert!(interval.notice.unwrap().contains(raw));
        }
    }

    #[test]
    fn test_cli_positional() {
        let cli = Cli::try_parse_from(["hwpulse", "3"]).unwrap();
        assert_eq!(cli.interval().every, Duration::from_secs(3));

        let cli = Cli::try_parse_from(["hwpulse"]).unwrap();
        assert!(cli.interval().notice.is_some());

        let cli = Cli::try_parse_from(["hwpulse", "-3"]).unwrap();
        assert_eq!(cli.interval().every, Duration::from_secs(1));
    }

    #[test]
    fn test_extra_arguments_are_ignored() {
        let interval = Cli::interval_from(["hwpulse", "5", "extra"]).unwrap();
        assert_eq!(interval.every, Duration::from_secs(5));
        assert!(interval.notice.unwrap().contains("extra"));

        let interval = Cli::interval_from(["hwpulse", "5", "--verbose", "-x"]).unwrap();
        assert_eq!(interval.every, Duration::from_secs(5));
    }

    #[test]
    fn test_unknown_flags_fall_back() {
        for args in [vec!["hwpulse", "--bogus"], vec!["hwpulse", "--bogus", "7", "x"]] {
            let interval = Cli::interval_from(args).unwrap();
            assert_eq!(interval.every, Duration::from_secs(1));
            assert!(interval.notice.is_some());
        }
    }

    #[test]
    fn test_help_is_passed_through() {
        let err = Cli::interval_from(["hwpulse", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
