use anyhow::Result;
use clap::Parser;
use env_logger::Env;

use get_build_number::cli::{self, RunArgs};
use get_build_number::ui::{self, ConsoleReporter};

#[derive(clap::Parser)]
#[command(
    name = "get-build-number",
    about = "Hand out monotonically increasing build numbers for CI builds"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Keep build numbers in this JSON file instead of the configured store")]
    store_file: Option<String>,

    #[arg(long, help = "Fill in branch and commit from the local git repository")]
    local: bool,

    #[arg(long, help = "Print the next build number without saving it")]
    dry_run: bool,

    #[arg(long, help = "Show the stored build numbers and exit")]
    list: bool,

    #[arg(short, long, help = "Enable debug logging on stderr")]
    verbose: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("get-build-number {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let run_args = RunArgs {
        config_path: args.config,
        store_file: args.store_file,
        local: args.local,
        dry_run: args.dry_run,
    };
    let mut reporter = ConsoleReporter;

    if args.list {
        match cli::stored_counters(&run_args, &mut reporter) {
            Ok((store, counters)) => ui::display_counters(&store, &counters),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match cli::run(&run_args, &mut reporter) {
        Ok(outcome) => {
            if run_args.dry_run && outcome.assignment.updated_counters().is_some() {
                ui::display_status(&format!("Dry run: {} was not saved", outcome.output));
            }
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
