use std::path::PathBuf;

use clap::{ArgAction, Parser};
use collector_core::Separator;

/// Command-line options. Anything left unset falls back to the config file,
/// then to the built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "image-collector",
    version,
    about = "Download the images listed in a text file",
    override_usage = "image-collector -f path/to/source_list.txt -d path/to/destination [OPTIONS]"
)]
pub struct Cli {
    /// Path to source file
    #[arg(short = 'f', long = "from", value_name = "PATH")]
    pub from: Option<PathBuf>,

    /// Path to destination folder [default: system temp dir]
    #[arg(short = 'd', long = "destination", value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Download with a pool of workers instead of one item at a time
    #[arg(short = 'c', long)]
    pub concurrently: bool,

    /// Max image size (MB) [default: 5]
    #[arg(short = 'm', long = "max-size", value_name = "MB")]
    pub max_size: Option<u64>,

    /// Max allowable redirects number [default: 5]
    #[arg(short = 'r', long = "max-redirects", value_name = "N")]
    pub max_redirects: Option<u32>,

    /// Connect and read timeout in seconds [default: 2]
    #[arg(short = 't', long = "max-timeout", value_name = "SECS")]
    pub max_timeout: Option<u64>,

    /// Transport retries per request [default: 1]
    #[arg(long = "max-retries", value_name = "N")]
    pub max_retries: Option<u32>,

    /// Do not overwrite already downloaded images that are still fresh
    #[arg(short = 'k', long)]
    pub keep: bool,

    /// Separator between URLs: one ASCII character or \n, \t, \s [default: whitespace]
    #[arg(short = 's', long, value_name = "CHAR", allow_hyphen_values = true)]
    pub separator: Option<Separator>,

    /// Worker count for --concurrently [default: 5]
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Bounded queue size for --concurrently [default: 100]
    #[arg(long = "queue-capacity", value_name = "N")]
    pub queue_capacity: Option<usize>,

    /// RON file with default settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to this file
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_match_the_documented_names() {
        let cli = Cli::try_parse_from([
            "image-collector",
            "-f",
            "urls.txt",
            "-d",
            "out",
            "-m",
            "3",
            "-r",
            "1",
            "-t",
            "4",
            "-k",
            "-c",
            "-s",
            ",",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.from, Some(PathBuf::from("urls.txt")));
        assert_eq!(cli.destination, Some(PathBuf::from("out")));
        assert_eq!(cli.max_size, Some(3));
        assert_eq!(cli.max_redirects, Some(1));
        assert_eq!(cli.max_timeout, Some(4));
        assert!(cli.keep);
        assert!(cli.concurrently);
        assert_eq!(cli.separator, Some(Separator::Byte(b',')));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn bad_separator_is_a_usage_error() {
        assert!(Cli::try_parse_from(["image-collector", "-s", "ab"]).is_err());
    }
}
