use std::path::PathBuf;

use clap::Parser;
use conddb_core::DirectoryMode;
use conddb_types::TimePoint;

#[derive(Parser, Debug)]
#[command(
    name = "conddb",
    about = "Conditions database: versioned, time-varying payloads from a git repository",
    version
)]
pub struct Cli {
    /// Repository location (work tree or .git directory)
    #[arg(required_unless_present = "time_range")]
    pub repository: Option<String>,

    /// Branch, tag or object id to read from
    #[arg(required_unless_present = "time_range")]
    pub revspec: Option<String>,

    /// Path inside the snapshot
    pub path: Option<String>,

    /// Query time; prints the interval of validity on stderr
    pub time: Option<TimePoint>,

    /// List the times in [T0, T1) at which PATH changes
    #[arg(long, num_args = 2, value_names = ["T0", "T1"], conflicts_with_all = ["time", "walk", "index"])]
    pub boundaries: Option<Vec<TimePoint>>,

    /// Report the revision's kind and every entry of its snapshot
    #[arg(long, conflicts_with = "index")]
    pub walk: bool,

    /// Print every leaf path of the snapshot
    #[arg(long)]
    pub index: bool,

    /// Print the representable time span and exit
    #[arg(long)]
    pub time_range: bool,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How to answer for paths that are directories
    #[arg(long, value_enum)]
    pub dirs: Option<DirsArg>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum DirsArg {
    Reject,
    List,
    Json,
}

impl From<DirsArg> for DirectoryMode {
    fn from(arg: DirsArg) -> Self {
        match arg {
            DirsArg::Reject => DirectoryMode::Reject,
            DirsArg::List => DirectoryMode::List,
            DirsArg::Json => DirectoryMode::Json,
        }
    }
}

/// What a parsed command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    TimeRange,
    Get { path: String, time: Option<TimePoint> },
    Boundaries { path: String, t0: TimePoint, t1: TimePoint },
    Walk,
    Index,
}

impl Cli {
    /// Work out the requested mode, or explain why the arguments do not
    /// form one.
    pub fn mode(&self) -> Result<Mode, String> {
        if self.time_range {
            return Ok(Mode::TimeRange);
        }
        if self.walk || self.index {
            if self.path.is_some() {
                return Err("--walk and --index take no PATH".into());
            }
            return Ok(if self.walk { Mode::Walk } else { Mode::Index });
        }
        let path = self
            .path
            .clone()
            .ok_or_else(|| "PATH is required unless --walk, --index or --time-range is given".to_string())?;
        match self.boundaries.as_deref() {
            Some([t0, t1]) => Ok(Mode::Boundaries {
                path,
                t0: *t0,
                t1: *t1,
            }),
            Some(_) => Err("--boundaries takes exactly two times".into()),
            None => Ok(Mode::Get {
                path,
                time: self.time,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("conddb").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parse_untimed_get() {
        let cli = parse(&["repo", "main", "tracker/gas/pressure"]);
        assert_eq!(cli.repository.as_deref(), Some("repo"));
        assert_eq!(cli.revspec.as_deref(), Some("main"));
        assert_eq!(
            cli.mode().unwrap(),
            Mode::Get {
                path: "tracker/gas/pressure".into(),
                time: None
            }
        );
    }

    #[test]
    fn parse_timed_get() {
        let cli = parse(&["repo", "v1.0.0", "a/b", "100"]);
        assert_eq!(
            cli.mode().unwrap(),
            Mode::Get {
                path: "a/b".into(),
                time: Some(100)
            }
        );
    }

    #[test]
    fn parse_boundaries() {
        let cli = parse(&["repo", "main", "a/b", "--boundaries", "50", "200"]);
        assert_eq!(
            cli.mode().unwrap(),
            Mode::Boundaries {
                path: "a/b".into(),
                t0: 50,
                t1: 200
            }
        );
    }

    #[test]
    fn parse_walk_and_index() {
        assert_eq!(parse(&["repo", "main", "--walk"]).mode().unwrap(), Mode::Walk);
        assert_eq!(parse(&["repo", "main", "--index"]).mode().unwrap(), Mode::Index);
        assert!(parse(&["repo", "main", "a", "--walk"]).mode().is_err());
    }

    #[test]
    fn time_range_needs_no_repository() {
        assert_eq!(parse(&["--time-range"]).mode().unwrap(), Mode::TimeRange);
    }

    #[test]
    fn parse_dirs_and_config() {
        let cli = parse(&["repo", "main", "a", "--dirs", "json", "--config", "c.toml", "-v"]);
        assert_eq!(cli.dirs, Some(DirsArg::Json));
        assert_eq!(DirectoryMode::from(DirsArg::List), DirectoryMode::List);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn missing_path_is_a_mode_error() {
        assert!(parse(&["repo", "main"]).mode().is_err());
    }

    #[test]
    fn wrong_argument_shapes_are_rejected() {
        for args in [
            vec!["conddb"],
            vec!["conddb", "repo"],
            vec!["conddb", "repo", "main", "a", "not-a-time"],
            vec!["conddb", "repo", "main", "a", "1", "extra"],
            vec!["conddb", "repo", "main", "a", "--boundaries", "1"],
            vec!["conddb", "repo", "main", "--walk", "--index"],
        ] {
            assert!(Cli::try_parse_from(args.iter().copied()).is_err(), "{args:?}");
        }
    }
}
