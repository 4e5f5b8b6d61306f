//! Command line definition

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::logging::DEFAULT_LOG_FILE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub debug: bool,
    pub log_file: PathBuf,
    pub autoplay: bool,
    pub now_playing: bool,
}

pub fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Control Spotify from the terminal and keep the queue topped up")
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Write debug logs to the log file"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("PATH")
                .default_value(DEFAULT_LOG_FILE)
                .help("Where debug logs are written"),
        )
        .arg(
            Arg::new("autoplay")
                .long("autoplay")
                .action(ArgAction::SetTrue)
                .help("Start with autoplay enabled"),
        )
        .arg(
            Arg::new("now-playing")
                .long("now-playing")
                .action(ArgAction::SetTrue)
                .help("Print the current track and exit"),
        )
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            debug: matches.get_flag("debug"),
            log_file: matches
                .get_one::<String>("log-file")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            autoplay: matches.get_flag("autoplay"),
            now_playing: matches.get_flag("now-playing"),
        }
    }

    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        let matches = command().try_get_matches_from(args).unwrap();
        CliOptions::from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let opts = parse(&["spotify-autoplay"]);
        assert!(!opts.debug);
        assert!(!opts.autoplay);
        assert_eq!(opts.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn flags_are_read() {
        let opts = parse(&["spotify-autoplay", "--debug", "--log-file", "/tmp/x.log", "--autoplay"]);
        assert!(opts.debug);
        assert!(opts.autoplay);
        assert_eq!(opts.log_file, PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }
}
