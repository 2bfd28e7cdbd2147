use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use dustat::core::events;
use dustat::Mode;

#[derive(Parser, Debug)]
#[command(
    name = "dustat",
    version,
    about = "Count folders, files, bytes and images under a path",
    group(ArgGroup::new("mode").required(true).args(["single_threaded", "multi_threaded", "both"]))
)]
struct Cli {
    /// Path to analyze (default: current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Scan with a single thread using a breadth-first queue
    #[arg(short = 's', long)]
    single_threaded: bool,

    /// Scan with one concurrent task per directory entry
    #[arg(short = 'm', long)]
    multi_threaded: bool,

    /// Run the multi-threaded scan, then the single-threaded one
    #[arg(short = 'b', long)]
    both: bool,

    /// Maximum concurrent I/O operations for the multi-threaded scan
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Also write the results as JSON to this file
    #[arg(long)]
    export_json: Option<PathBuf>,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.both {
            Mode::Both
        } else if self.multi_threaded {
            Mode::MultiThreaded
        } else {
            Mode::SingleThreaded
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logs to stderr)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments; a missing or conflicting mode flag exits with usage here
    let cli = Cli::parse();
    let mode = cli.mode();

    let mut settings = dustat::config::settings::Settings::default();
    if let Some(conc) = cli.concurrency {
        settings = dustat::config::settings::Settings::with_concurrency(conc);
    }

    let (event_tx, event_rx) = events::create_event_channel();
    let event_log = events::spawn_event_logger(event_rx);

    let scanner = dustat::Scanner::new(settings, event_tx);
    let results = match scanner.calculate(mode, cli.path.clone()).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {e}\n");
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            std::process::exit(2);
        }
    };
    drop(scanner);
    events::finish_event_logger(event_log).await;

    for (i, tagged) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", dustat::export::text::render_result(tagged));
    }

    if let Some(ref export_path) = cli.export_json {
        let report = dustat::export::json::UsageReport::new(cli.path.clone(), &results);
        dustat::export::json::export_json(&report, export_path)?;
        println!("\nExported to: {}", export_path.display());
    }

    Ok(())
}
