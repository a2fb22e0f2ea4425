use self::private::Statistics;
use blackjack_ev::simulation::{
    shoe::DealingShoe, RoundResult, Simulator, SimulatorEventHandler,
};
use blackjack_ev::{Action, Advisor, Error, Rank, Rule, SearchConfig};
use blackjack_ev_drivers::ConfigBlackjackSimulator;

const BET_PER_ROUND: u32 = 1;

mod private {
    #[derive(Debug, Clone, Copy, Default)]
    pub struct Statistics {
        current_money: i64,
        total_bet: u64,
        min_money: i64,
    }

    impl Statistics {
        pub fn settle(&mut self, bet: u32, net: i64) {
            self.total_bet += bet as u64;
            self.current_money += net;
            if self.min_money > self.current_money {
                self.min_money = self.current_money;
            }
        }

        pub fn get_current_money(&self) -> i64 {
            self.current_money
        }

        pub fn get_total_bet(&self) -> u64 {
            self.total_bet
        }

        pub fn get_rate(&self) -> f64 {
            if self.total_bet == 0 {
                return 0.0;
            }
            self.current_money as f64 / self.total_bet as f64
        }

        pub fn get_min_money(&self) -> i64 {
            self.min_money
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Handler {
    round_id: u64,
    shoe_id: u64,
    abandoned_rounds: u64,
    doubles: u64,
    stat: Statistics,
}

impl SimulatorEventHandler for Handler {
    fn on_new_shoe(&mut self, shoe: &DealingShoe) {
        self.shoe_id += 1;
        log::debug!(
            "shoe #{}: {} cards, first ones {}",
            self.shoe_id,
            shoe.remaining(),
            format_cards(shoe.preview_next_few_cards(10)),
        );
    }

    fn on_deal_cards(&mut self, dealer_up_card: Rank, hand: &[Rank]) {
        self.round_id += 1;
        log::debug!(
            "round #{}: dealer {}, player {}",
            self.round_id,
            dealer_up_card,
            format_cards(hand)
        );
    }

    fn on_make_decision(&mut self, decision: Action, hand: &[Rank]) {
        if decision == Action::Double {
            self.doubles += 1;
        }
        log::debug!("{} on {}", decision, format_cards(hand));
    }

    fn on_summary_round(&mut self, result: &RoundResult) {
        self.stat.settle(result.bet, result.net);
        log::debug!(
            "round #{}: dealer {} player {} -> {:?} ({:+})",
            self.round_id,
            format_cards(&result.dealer_cards),
            format_cards(&result.player_cards),
            result.outcome,
            result.net,
        );
    }

    fn on_round_abandoned(&mut self, error: &Error) {
        self.abandoned_rounds += 1;
        log::debug!("round #{} abandoned: {}", self.round_id, error);
    }
}

pub fn simulate_shoes(
    rule: &Rule,
    search: &SearchConfig,
    simulator_config: &ConfigBlackjackSimulator,
) -> Result<(), Error> {
    let mut advisor = Advisor::new(*rule, *search);
    let mut handler = Handler::default();
    let mut simulator = Simulator::new(
        rule,
        simulator_config.cut_card_remaining,
        simulator_config.seed,
    );

    for _ in 0..simulator_config.number_of_shoes {
        simulator.simulate_shoe(BET_PER_ROUND, &mut advisor, &mut handler)?;
        log::info!(
            "Money: {}. Total bet: {}. Rate: {:.2}%. Min money: {}.",
            handler.stat.get_current_money(),
            handler.stat.get_total_bet(),
            handler.stat.get_rate() * 100.0,
            handler.stat.get_min_money(),
        );
    }
    log::info!(
        "{} rounds over {} shoes, {} doubles, {} abandoned",
        handler.round_id,
        simulator_config.number_of_shoes,
        handler.doubles,
        handler.abandoned_rounds,
    );
    Ok(())
}

fn format_cards(cards: &[Rank]) -> String {
    cards
        .iter()
        .map(Rank::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
