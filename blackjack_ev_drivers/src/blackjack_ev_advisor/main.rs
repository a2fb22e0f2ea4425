use anyhow::Context;
use blackjack_ev::{parse_ranks, Advisor, Rank, Rule, SearchConfig};
use blackjack_ev_drivers::{init_logger, load_config, DEFAULT_CONFIG_PATH};
use clap::Parser;

/// Prints the expectation of every action for one hand, given the cards
/// already seen from the shoe.
#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Dealer up card, e.g. "10"
    #[arg(short, long)]
    dealer: String,

    /// Player hand, e.g. "A,7"
    #[arg(short, long)]
    player: String,

    /// Other cards already dealt from this shoe. May be repeated.
    #[arg(short, long)]
    seen: Vec<String>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = CommandLineArgs::parse();
    init_logger(args.verbose)?;

    let config = load_config(&args.config)?;
    let rule: Rule = config.rule.try_into()?;
    let search: SearchConfig = config.search.into();

    let dealer_up_card: Rank = args.dealer.parse().context("dealer up card")?;
    let hand = parse_ranks(&args.player).context("player hand")?;
    let mut seen = Vec::new();
    for symbols in &args.seen {
        seen.extend(parse_ranks(symbols).context("seen cards")?);
    }

    let mut advisor = Advisor::new(rule, search);
    advisor.observe(dealer_up_card)?;
    advisor.observe_all(&hand)?;
    advisor.observe_all(&seen)?;

    let ex = advisor.expectations(dealer_up_card, &hand)?;
    let (best_ex, action) = ex.best();
    println!(
        "{} cards left in shoe",
        advisor.shoe().total_remaining()
    );
    println!("Stand:       {:+.6}", ex.stand);
    println!("Hit:         {:+.6}", ex.hit);
    println!("Double Down: {:+.6}", ex.double);
    println!("=> {} ({:+.6})", action, best_ex);
    Ok(())
}
