//! Command-line arguments for the terminal front end
//!
//! Supports:
//! - Starting from the sample document instead of the persisted buffer
//! - Overriding the viewport height
//! - Running without touching the state file

use std::path::PathBuf;

use clap::Parser;

/// Incremental syntax highlighting playground
///
/// Lines read from stdin are appended to the buffer one edit at a time;
/// the highlighted viewport is printed once input ends.
#[derive(Parser, Debug)]
#[command(name = "playground", version, about)]
pub struct CliArgs {
    /// Ignore the persisted buffer and start from the sample document
    #[arg(long)]
    pub reset: bool,

    /// Number of visible rows (overrides the config file)
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Never write the buffer back to the state file
    #[arg(long)]
    pub no_persist: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["playground"]);
        assert!(!args.reset);
        assert!(!args.no_persist);
        assert_eq!(args.rows, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_all_flags() {
        let args = CliArgs::parse_from([
            "playground",
            "--reset",
            "--rows",
            "12",
            "--no-persist",
            "--config",
            "/tmp/pg.yaml",
        ]);
        assert!(args.reset);
        assert!(args.no_persist);
        assert_eq!(args.rows, Some(12));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pg.yaml")));
    }

    #[test]
    fn test_rows_must_be_a_number() {
        assert!(CliArgs::try_parse_from(["playground", "--rows", "many"]).is_err());
    }
}
