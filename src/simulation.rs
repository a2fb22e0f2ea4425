pub mod hand;
pub mod shoe;

use crate::{advisor::Strategy, Action, Error, HandTotal, Rank, Result, Rule};
use blackjack_ev_macros::allowed_phase;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;

use self::{hand::Hand, shoe::DealingShoe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    PlaceBets,
    DealInitialCards,
    Play,
    DealerPlayAndSummary,
    StartNewShoe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerBust,
    DealerBlackjack,
    DealerBust,
    Win,
    Lose,
    Push,
}

impl Outcome {
    /// What the player gets back per unit of bet, on top of the bet itself.
    pub fn multiplier(self) -> i64 {
        match self {
            Outcome::DealerBust | Outcome::Win => 1,
            Outcome::Push => 0,
            Outcome::PlayerBust | Outcome::DealerBlackjack | Outcome::Lose => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub dealer_cards: Vec<Rank>,
    pub player_cards: Vec<Rank>,
    pub decisions: Vec<Action>,
    /// Final bet, doubled if the player doubled down.
    pub bet: u32,
    pub outcome: Outcome,
    pub net: i64,
}

impl RoundResult {
    pub fn number_of_cards(&self) -> usize {
        self.dealer_cards.len() + self.player_cards.len()
    }
}

/// Totals over the rounds of one shoe.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShoeSummary {
    pub rounds: u32,
    pub abandoned_rounds: u32,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub total_bet: u64,
    pub net: i64,
}

impl ShoeSummary {
    pub fn record(&mut self, result: &RoundResult) {
        self.rounds += 1;
        self.total_bet += result.bet as u64;
        self.net += result.net;
        match result.outcome.multiplier().cmp(&0) {
            Ordering::Greater => self.wins += 1,
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.pushes += 1,
        }
    }

    /// Net result per unit wagered.
    pub fn get_rate(&self) -> f64 {
        if self.total_bet == 0 {
            return 0.0;
        }
        self.net as f64 / self.total_bet as f64
    }
}

pub trait SimulatorEventHandler {
    fn on_new_shoe(&mut self, shoe: &DealingShoe);
    fn on_deal_cards(&mut self, dealer_up_card: Rank, hand: &[Rank]);
    fn on_make_decision(&mut self, decision: Action, hand: &[Rank]);
    fn on_summary_round(&mut self, result: &RoundResult);
    fn on_round_abandoned(&mut self, error: &Error);
}

/// Simulates a single player against the dealer. The dealer shows one up card
/// and draws the rest of her hand only after the player is done.
pub struct Simulator {
    rule: Rule,
    rng: StdRng,
    shoe_number: u32,

    // Game state
    current_game_phase: GamePhase,
    shoe: DealingShoe,
    dealer_hand: Hand,

    // My playing state
    current_hand: Hand,
    decisions: Vec<Action>,
}

impl Simulator {
    /// Creates a simulator with a freshly shuffled shoe of `rule.number_of_decks`
    /// decks. Pass a seed for a reproducible run.
    pub fn new(rule: &Rule, cut_card_remaining: usize, seed: Option<u64>) -> Self {
        let shoe = DealingShoe::with_number_of_decks(rule.number_of_decks, cut_card_remaining);
        Self::with_shoe(rule, shoe, seed)
    }

    pub fn with_shoe(rule: &Rule, mut shoe: DealingShoe, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        shoe.shuffle(&mut rng);
        Self {
            rule: *rule,
            rng,
            shoe_number: 1,
            current_game_phase: GamePhase::PlaceBets,
            shoe,
            dealer_hand: Hand::new(),
            current_hand: Hand::new(),
            decisions: Vec::new(),
        }
    }

    /// Plays one round with the given strategy. Every card dealt face up is
    /// shown to the strategy exactly once.
    ///
    /// Returns `None` if the shoe ran dry mid-round. The round is then thrown
    /// away and a new shoe started.
    #[allowed_phase(PlaceBets)]
    pub fn automatic_simulate_round<T: Strategy, U: SimulatorEventHandler>(
        &mut self,
        bet: u32,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<Option<RoundResult>> {
        let result = match self.play_round(bet, strategy, handler) {
            Ok(result) => result,
            Err(err @ (Error::NoCardsLeft | Error::EmptyShoe | Error::ShoeBelowFloor { .. })) => {
                log::warn!(
                    "abandoning round after {} cards: {}",
                    self.shoe.number_of_dealt_cards(),
                    err
                );
                handler.on_round_abandoned(&err);
                self.shuffle_new_shoe();
                strategy.on_new_shoe();
                handler.on_new_shoe(&self.shoe);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        handler.on_summary_round(&result);

        if self.start_new_shoe_if_necessary()? {
            strategy.on_new_shoe();
            handler.on_new_shoe(&self.shoe);
        }
        Ok(Some(result))
    }

    /// Plays rounds until the shoe is replaced.
    #[allowed_phase(PlaceBets)]
    pub fn simulate_shoe<T: Strategy, U: SimulatorEventHandler>(
        &mut self,
        bet: u32,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<ShoeSummary> {
        let shoe_number = self.shoe_number;
        let mut summary = ShoeSummary::default();
        while self.shoe_number == shoe_number {
            match self.automatic_simulate_round(bet, strategy, handler)? {
                Some(result) => summary.record(&result),
                None => summary.abandoned_rounds += 1,
            }
        }
        log::info!(
            "shoe {}: {} rounds, net {} over {} bet ({:+.4})",
            shoe_number,
            summary.rounds,
            summary.net,
            summary.total_bet,
            summary.get_rate()
        );
        Ok(summary)
    }

    /// Puts every card back and shuffles so that `firsts` are dealt first.
    /// The strategy watching this table must be told about the new shoe.
    #[allowed_phase(PlaceBets)]
    pub fn shuffle_with_firsts(&mut self, firsts: &[Rank]) -> Result<()> {
        self.shoe.shuffle_with_firsts(firsts, &mut self.rng)?;
        self.shoe_number += 1;
        Ok(())
    }

    #[allowed_phase(PlaceBets)]
    pub fn place_bets(&mut self, bet: u32) -> Result<()> {
        self.new_game();
        self.current_hand.set_original_bet(bet);
        self.current_game_phase = GamePhase::DealInitialCards;
        Ok(())
    }

    /// Deals the dealer's up card, then the player's two cards.
    #[allowed_phase(DealInitialCards)]
    pub fn deal_initial_cards(&mut self) -> Result<(Rank, Vec<Rank>)> {
        let up_card = self.shoe.deal_card()?;
        self.dealer_hand.receive_card(up_card);
        for _ in 0..2 {
            let card = self.shoe.deal_card()?;
            self.current_hand.receive_card(card);
        }
        self.current_game_phase = GamePhase::Play;
        Ok((up_card, self.current_hand.get_cards().to_vec()))
    }

    /// Carries out a decision. Returns the card dealt to the player, if any.
    pub fn play(&mut self, decision: Action) -> Result<Option<Rank>> {
        match decision {
            Action::Stand => self.play_stand().map(|_| None),
            Action::Hit => self.play_hit().map(Some),
            Action::Double => self.play_double().map(Some),
        }
    }

    #[allowed_phase(Play)]
    pub fn play_stand(&mut self) -> Result<()> {
        self.decisions.push(Action::Stand);
        self.current_game_phase = GamePhase::DealerPlayAndSummary;
        Ok(())
    }

    /// Play ends by itself once the hand busts or reaches 21.
    #[allowed_phase(Play)]
    pub fn play_hit(&mut self) -> Result<Rank> {
        let card = self.shoe.deal_card()?;
        self.decisions.push(Action::Hit);
        self.current_hand.receive_card(card);
        if self.current_hand.bust() || self.current_hand.total().total == 21 {
            self.current_game_phase = GamePhase::DealerPlayAndSummary;
        }
        Ok(card)
    }

    /// Doubles the bet, takes exactly one card and ends play.
    #[allowed_phase(Play)]
    pub fn play_double(&mut self) -> Result<Rank> {
        let card = self.shoe.deal_card()?;
        self.decisions.push(Action::Double);
        self.current_hand.double_down();
        self.current_hand.receive_card(card);
        self.current_game_phase = GamePhase::DealerPlayAndSummary;
        Ok(card)
    }

    /// Makes the dealer draw according to the rule and settles the bet.
    #[allowed_phase(DealerPlayAndSummary)]
    pub fn dealer_plays_and_summary(&mut self) -> Result<RoundResult> {
        let outcome = if self.current_hand.bust() {
            Outcome::PlayerBust
        } else {
            loop {
                let dealer_total = self.dealer_hand.total();
                if self.dealer_hand.is_natural() {
                    break Outcome::DealerBlackjack;
                }
                if self.dealer_must_stand(dealer_total) {
                    break self.compare_with_dealer(dealer_total);
                }
                let card = self.shoe.deal_card()?;
                self.dealer_hand.receive_card(card);
            }
        };

        let bet = self.current_hand.get_bet();
        self.current_game_phase = GamePhase::StartNewShoe;
        Ok(RoundResult {
            dealer_cards: self.dealer_hand.get_cards().to_vec(),
            player_cards: self.current_hand.get_cards().to_vec(),
            decisions: self.decisions.clone(),
            bet,
            outcome,
            net: outcome.multiplier() * bet as i64,
        })
    }

    /// Uses a new shoe if the cut card is reached. Returns true if it did.
    #[allowed_phase(StartNewShoe)]
    pub fn start_new_shoe_if_necessary(&mut self) -> Result<bool> {
        let reached = self.shoe.reached_cut_card();
        if reached {
            self.shuffle_new_shoe();
        }
        self.current_game_phase = GamePhase::PlaceBets;
        Ok(reached)
    }

    pub fn get_phase(&self) -> GamePhase {
        self.current_game_phase
    }

    pub fn get_shoe(&self) -> &DealingShoe {
        &self.shoe
    }

    fn play_round<T: Strategy, U: SimulatorEventHandler>(
        &mut self,
        bet: u32,
        strategy: &mut T,
        handler: &mut U,
    ) -> Result<RoundResult> {
        self.place_bets(bet)?;
        let (up_card, hand) = self.deal_initial_cards()?;
        strategy.observe_card(up_card)?;
        for &card in &hand {
            strategy.observe_card(card)?;
        }
        handler.on_deal_cards(up_card, &hand);

        while self.current_game_phase == GamePhase::Play {
            let decision = strategy.make_decision(up_card, self.current_hand.get_cards())?;
            handler.on_make_decision(decision, self.current_hand.get_cards());
            if let Some(card) = self.play(decision)? {
                strategy.observe_card(card)?;
            }
        }

        let result = self.dealer_plays_and_summary()?;
        for &card in &result.dealer_cards[1..] {
            strategy.observe_card(card)?;
        }
        Ok(result)
    }

    fn dealer_must_stand(&self, dealer_total: HandTotal) -> bool {
        match dealer_total.total.cmp(&17) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => !dealer_total.soft || !self.rule.dealer_hit_on_soft17,
        }
    }

    fn compare_with_dealer(&self, dealer_total: HandTotal) -> Outcome {
        if dealer_total.bust() {
            return Outcome::DealerBust;
        }
        match self.current_hand.total().total.cmp(&dealer_total.total) {
            Ordering::Greater => Outcome::Win,
            Ordering::Less => Outcome::Lose,
            Ordering::Equal => Outcome::Push,
        }
    }

    fn shuffle_new_shoe(&mut self) {
        self.shoe.shuffle(&mut self.rng);
        self.shoe_number += 1;
        self.new_game();
        self.current_game_phase = GamePhase::PlaceBets;
    }

    fn new_game(&mut self) {
        self.dealer_hand.clear();
        self.current_hand.clear();
        self.decisions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Advisor, SearchConfig};
    use Rank::*;

    #[derive(Default)]
    struct Recorder {
        new_shoes: u32,
        deals: u32,
        decisions: Vec<Action>,
        rounds: Vec<RoundResult>,
        abandoned: u32,
    }

    impl SimulatorEventHandler for Recorder {
        fn on_new_shoe(&mut self, _: &DealingShoe) {
            self.new_shoes += 1;
        }

        fn on_deal_cards(&mut self, _: Rank, hand: &[Rank]) {
            assert_eq!(hand.len(), 2);
            self.deals += 1;
        }

        fn on_make_decision(&mut self, decision: Action, _: &[Rank]) {
            self.decisions.push(decision);
        }

        fn on_summary_round(&mut self, result: &RoundResult) {
            self.rounds.push(result.clone());
        }

        fn on_round_abandoned(&mut self, _: &Error) {
            self.abandoned += 1;
        }
    }

    /// Stands on everything and counts what it sees.
    #[derive(Default)]
    struct AlwaysStand {
        observed: usize,
        new_shoes: u32,
    }

    impl Strategy for AlwaysStand {
        fn observe_card(&mut self, _: Rank) -> Result<()> {
            self.observed += 1;
            Ok(())
        }

        fn on_new_shoe(&mut self) {
            self.new_shoes += 1;
        }

        fn make_decision(&mut self, _: Rank, _: &[Rank]) -> Result<Action> {
            Ok(Action::Stand)
        }
    }

    fn single_deck() -> Rule {
        Rule {
            number_of_decks: 1,
            ..Default::default()
        }
    }

    fn stacked(rule: &Rule, firsts: &[Rank]) -> Simulator {
        let mut simulator = Simulator::new(rule, 0, Some(7));
        simulator.shuffle_with_firsts(firsts).unwrap();
        simulator
    }

    #[test]
    fn methods_are_guarded_by_phase() {
        let mut simulator = Simulator::new(&single_deck(), 0, Some(1));
        assert_eq!(
            simulator.play_hit(),
            Err(Error::WrongPhase {
                operation: "play_hit",
                expected: GamePhase::Play,
                actual: GamePhase::PlaceBets,
            })
        );
        simulator.place_bets(1).unwrap();
        assert!(matches!(
            simulator.place_bets(1),
            Err(Error::WrongPhase {
                expected: GamePhase::PlaceBets,
                actual: GamePhase::DealInitialCards,
                ..
            })
        ));
        assert!(simulator.dealer_plays_and_summary().is_err());
    }

    #[test]
    fn dealer_busts_on_two_kings() {
        let mut simulator = stacked(&single_deck(), &[Six, Ten, Nine, King, King]);
        simulator.place_bets(1).unwrap();
        let (up_card, hand) = simulator.deal_initial_cards().unwrap();
        assert_eq!(up_card, Six);
        assert_eq!(hand, vec![Ten, Nine]);
        simulator.play_stand().unwrap();
        let result = simulator.dealer_plays_and_summary().unwrap();
        assert_eq!(result.dealer_cards, vec![Six, King, King]);
        assert_eq!(result.outcome, Outcome::DealerBust);
        assert_eq!(result.net, 1);
        assert!(!simulator.start_new_shoe_if_necessary().unwrap());
        assert_eq!(simulator.get_phase(), GamePhase::PlaceBets);
    }

    #[test]
    fn dealer_blackjack_beats_player_natural() {
        let mut simulator = stacked(&single_deck(), &[Ace, Ace, King, King]);
        simulator.place_bets(1).unwrap();
        simulator.deal_initial_cards().unwrap();
        simulator.play_stand().unwrap();
        let result = simulator.dealer_plays_and_summary().unwrap();
        assert_eq!(result.outcome, Outcome::DealerBlackjack);
        assert_eq!(result.net, -1);
    }

    #[test]
    fn double_takes_one_card_for_twice_the_bet() {
        let mut simulator = stacked(&single_deck(), &[Six, Five, Six, Ten, Ten, Ten]);
        simulator.place_bets(1).unwrap();
        simulator.deal_initial_cards().unwrap();
        assert_eq!(simulator.play(Action::Double).unwrap(), Some(Ten));
        assert_eq!(simulator.get_phase(), GamePhase::DealerPlayAndSummary);
        assert!(simulator.play_hit().is_err());
        let result = simulator.dealer_plays_and_summary().unwrap();
        assert_eq!(result.player_cards, vec![Five, Six, Ten]);
        assert_eq!(result.outcome, Outcome::DealerBust);
        assert_eq!(result.bet, 2);
        assert_eq!(result.net, 2);
    }

    #[test]
    fn player_bust_ends_the_round_before_the_dealer_draws() {
        let mut simulator = stacked(&single_deck(), &[Ten, Ten, Six, Ten]);
        simulator.place_bets(1).unwrap();
        simulator.deal_initial_cards().unwrap();
        assert_eq!(simulator.play_hit().unwrap(), Ten);
        assert_eq!(simulator.get_phase(), GamePhase::DealerPlayAndSummary);
        let result = simulator.dealer_plays_and_summary().unwrap();
        assert_eq!(result.outcome, Outcome::PlayerBust);
        assert_eq!(result.dealer_cards, vec![Ten]);
        assert_eq!(result.net, -1);
    }

    #[test]
    fn dealer_soft_seventeen_follows_the_rule() {
        let firsts = [Six, Ten, Eight, Ace, Four];
        for (dealer_hit_on_soft17, outcome) in [(false, Outcome::Win), (true, Outcome::Lose)] {
            let rule = Rule {
                number_of_decks: 1,
                dealer_hit_on_soft17,
            };
            let mut simulator = stacked(&rule, &firsts);
            simulator.place_bets(1).unwrap();
            simulator.deal_initial_cards().unwrap();
            simulator.play_stand().unwrap();
            let result = simulator.dealer_plays_and_summary().unwrap();
            assert_eq!(result.outcome, outcome);
        }
    }

    #[test]
    fn advisor_sees_every_dealt_card() {
        let rule = single_deck();
        let mut simulator = stacked(&rule, &[Seven, Ten, Queen]);
        let mut advisor = Advisor::new(rule, SearchConfig::default());
        let mut recorder = Recorder::default();
        let result = simulator
            .automatic_simulate_round(1, &mut advisor, &mut recorder)
            .unwrap()
            .unwrap();
        assert_eq!(result.decisions, vec![Action::Stand]);
        assert_eq!(recorder.decisions, vec![Action::Stand]);
        assert_eq!(recorder.rounds, vec![result.clone()]);
        assert_eq!(
            advisor.shoe().total_remaining() as usize,
            52 - result.number_of_cards()
        );
        assert_eq!(simulator.get_shoe().number_of_dealt_cards(), result.number_of_cards());
    }

    #[test]
    fn simulating_a_shoe_plays_until_the_cut_card() {
        let rule = single_deck();
        let mut simulator = Simulator::new(&rule, 8, Some(42));
        let mut strategy = AlwaysStand::default();
        let mut recorder = Recorder::default();
        let summary = simulator
            .simulate_shoe(1, &mut strategy, &mut recorder)
            .unwrap();

        assert_eq!(strategy.new_shoes, 1);
        assert_eq!(recorder.new_shoes, 1);
        assert_eq!(summary.rounds as usize, recorder.rounds.len());
        assert_eq!(summary.abandoned_rounds, recorder.abandoned);
        assert!(summary.rounds > 0);
        assert_eq!(summary.wins + summary.losses + summary.pushes, summary.rounds);
        assert_eq!(summary.total_bet, summary.rounds as u64);

        let dealt: usize = recorder.rounds.iter().map(RoundResult::number_of_cards).sum();
        if summary.abandoned_rounds == 0 {
            assert_eq!(strategy.observed, dealt);
        } else {
            assert!(strategy.observed >= dealt);
        }
        assert_eq!(simulator.get_shoe().number_of_dealt_cards(), 0);
        assert_eq!(simulator.get_phase(), GamePhase::PlaceBets);
    }
}
