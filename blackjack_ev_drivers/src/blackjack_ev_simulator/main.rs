mod simulation;

use blackjack_ev::{Rule, SearchConfig};
use blackjack_ev_drivers::{init_logger, load_config, DEFAULT_CONFIG_PATH};
use clap::Parser;

/// Plays whole shoes against itself, advising every hand from the live count.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Log every decision
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = CommandLineArgs::parse();
    init_logger(args.verbose)?;

    let config = load_config(&args.config)?;
    log::debug!("{:#?}", config);
    let rule: Rule = config.rule.try_into()?;
    let search: SearchConfig = config.search.into();
    simulation::simulate_shoes(&rule, &search, &config.blackjack_ev_simulator)?;
    Ok(())
}
