//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use urlfilter::SyncOptions;

#[derive(Debug, Parser)]
#[command(
    name = "urlfilter",
    version,
    about = "Filter a table through a shareable query string",
    long_about = "Filter a table through a shareable query string.\n\n\
        The query string is the single source of truth: paste one from a link \
        with --query, or edit criteria interactively with --interactive and \
        watch the location follow."
)]
pub struct Cli {
    /// Dataset: a JSON array of flat objects [default: bundled survey sample]
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Criterion schema as YAML [default: survey schema]
    #[arg(short, long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Initial query string, e.g. "region=東京&workers=100000"
    #[arg(short, long, default_value = "", value_name = "QUERY")]
    pub query: String,

    /// Match text criteria exactly instead of by substring
    #[arg(long)]
    pub exact_text: bool,

    /// Drop query parameters that are not criteria when rewriting the location
    #[arg(long)]
    pub drop_foreign_params: bool,

    /// Read commands from stdin and update the table after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Maximum column width, in terminal columns
    #[arg(long, default_value_t = 24, value_name = "N")]
    pub max_width: usize,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            preserve_foreign_params: !self.drop_foreign_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["urlfilter"]).unwrap();
        assert!(cli.data.is_none());
        assert_eq!(cli.query, "");
        assert_eq!(cli.max_width, 24);
        assert!(cli.sync_options().preserve_foreign_params);
        assert!(!cli.interactive);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "urlfilter",
            "--data",
            "rows.json",
            "-q",
            "?region=Tokyo",
            "--exact-text",
            "--drop-foreign-params",
            "-i",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("rows.json")));
        assert_eq!(cli.query, "?region=Tokyo");
        assert!(cli.exact_text);
        assert!(!cli.sync_options().preserve_foreign_params);
        assert!(cli.interactive);
        assert_eq!(cli.verbose, 2);
    }
}
