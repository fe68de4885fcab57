use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use leaderscrape_core::{WikiClient, build_dataset, write_dataset};

#[derive(Debug, Parser)]
#[command(
    name = "leaderscrape",
    version,
    about = "Build a merged EN/FR Civilization VII leader dataset from the wiki"
)]
struct Cli {
    #[arg(long, value_name = "PATH", default_value = "leaders.civ7.json", help = "Output JSON path")]
    out: PathBuf,
    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 0.3,
        help = "Politeness delay between cross-language lookups"
    )]
    sleep: f64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let delay = Duration::from_secs_f64(cli.sleep.max(0.0));
    let client = WikiClient::new(delay)?;
    let dataset = build_dataset(&client)?;
    write_dataset(&cli.out, &dataset)?;

    println!(
        "Wrote {} ({} leaders merged)",
        cli.out.display(),
        dataset.leaders.len()
    );
    Ok(())
}
