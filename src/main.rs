use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use calbump::{incr, is_valid, BumpFlags, ReleaseTag};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Control log level. -vv for debug level.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Checks that a version matches a pattern
    Valid {
        /// The pattern to validate against, e.g. `vYYYY0M.BUILD[-RELEASE]`
        #[arg(short, long)]
        pattern: String,

        /// The version string to validate
        version: String,
    },

    /// Increments a version according to its pattern
    ///
    /// Calendar parts move to today (or `--date`, or stay put with
    /// `--pin-date`); any field right of a changed one resets; the requested
    /// bumps apply on top; the build id always advances.
    Bump {
        /// The version string to increment
        version: String,

        /// The pattern the version follows
        #[arg(short, long)]
        pattern: String,

        /// Increment the major version, resetting minor and patch
        #[arg(long)]
        major: bool,

        /// Increment the minor version, resetting patch
        #[arg(long)]
        minor: bool,

        /// Increment the patch version
        #[arg(long)]
        patch: bool,

        /// Switch the release tag (alpha, beta, dev, rc, post, final)
        #[arg(long)]
        tag: Option<ReleaseTag>,

        /// Increment the release number
        #[arg(long)]
        tag_num: bool,

        /// Keep the calendar parts of the old version unchanged
        #[arg(long)]
        pin_date: bool,

        /// Update calendar parts to this date instead of today
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "pin_date")]
        date: Option<NaiveDate>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> i32 {
    match cli.command {
        Commands::Valid { pattern, version } => {
            if is_valid(&version, &pattern) {
                println!("true");
                0
            } else {
                println!("false");
                1
            }
        }
        Commands::Bump {
            version,
            pattern,
            major,
            minor,
            patch,
            tag,
            tag_num,
            pin_date,
            date,
        } => {
            let flags = BumpFlags {
                major,
                minor,
                patch,
                release: tag,
                release_num: tag_num,
            };
            match incr(&version, &pattern, &flags, pin_date, date) {
                Some(new_version) => {
                    println!("{new_version}");
                    0
                }
                None => 1,
            }
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    std::process::exit(run(cli));
}
