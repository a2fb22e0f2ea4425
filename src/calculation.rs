use crate::{
    evaluate_hand, Action, DealerTotal, Error, Frame, FrameTable, HandTotal, Rank, Result, Rule,
    SearchConfig, Shoe,
};
use std::cmp::Ordering;

/// Expectations of every action for one decision, in bets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Expectations {
    pub stand: f64,
    pub hit: f64,
    pub double: f64,
}

impl Expectations {
    /// Returns the best expectation and its action. Exact ties go to Stand,
    /// then Hit, then Double.
    pub fn best(&self) -> (f64, Action) {
        let (mut max_ex, mut action) = (self.stand, Action::Stand);
        if max_ex < self.hit {
            (max_ex, action) = (self.hit, Action::Hit);
        }
        if max_ex < self.double {
            (max_ex, action) = (self.double, Action::Double);
        }
        (max_ex, action)
    }

    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::Stand => self.stand,
            Action::Hit => self.hit,
            Action::Double => self.double,
        }
    }
}

/// Exhaustive expectation search over every card sequence the shoe can
/// still produce.
///
/// The engine never mutates a caller's shoe: each branch works on its own
/// copy. The only state it keeps is the cache of solved frames.
#[derive(Debug, Clone)]
pub struct Engine {
    rule: Rule,
    search: SearchConfig,
    ex_stand: FrameTable<f64>,
    ex_hit: FrameTable<f64>,
}

impl Engine {
    pub fn new(rule: Rule, search: SearchConfig) -> Self {
        Self {
            rule,
            search,
            ex_stand: FrameTable::new(),
            ex_hit: FrameTable::new(),
        }
    }

    /// Number of sub-results currently cached.
    pub fn cached_frames(&self) -> usize {
        self.ex_stand.len() + self.ex_hit.len()
    }

    pub fn clear_cache(&mut self) {
        self.ex_stand.clear();
        self.ex_hit.clear();
    }

    /// Picks the action with the highest expectation. See [`Expectations::best`]
    /// for how ties are broken.
    pub fn decide(
        &mut self,
        dealer_up_card: Rank,
        player_hand: &[Rank],
        shoe: &Shoe,
    ) -> Result<Action> {
        Ok(self.evaluate(dealer_up_card, player_hand, shoe)?.best().1)
    }

    /// Calculates the expectation of standing, hitting and doubling down.
    pub fn evaluate(
        &mut self,
        dealer_up_card: Rank,
        player_hand: &[Rank],
        shoe: &Shoe,
    ) -> Result<Expectations> {
        if player_hand.is_empty() {
            return Err(Error::EmptyHand);
        }
        let player = evaluate_hand(player_hand);
        if player.bust() {
            return Err(Error::BustHand(player.total));
        }
        self.check_shoe(shoe)?;

        let dealer = DealerTotal::from_up_card(dealer_up_card);
        self.clear_cache();
        let expectations = Expectations {
            stand: self.stand(shoe, dealer, player.total, false),
            hit: self.hit(shoe, dealer, player, false, 0),
            double: self.hit(shoe, dealer, player, true, 0),
        };

        log::debug!(
            "up {} hand {:?} ({}{}) over {} cards: stand {:.6} hit {:.6} double {:.6}, {} frames",
            dealer_up_card,
            player_hand,
            if player.soft { "soft " } else { "" },
            player.total,
            shoe.total_remaining(),
            expectations.stand,
            expectations.hit,
            expectations.double,
            self.cached_frames(),
        );
        Ok(expectations)
    }

    /// Expectation of taking one card, then playing on optimally (or standing
    /// straight away when `doubled`).
    pub fn expected_value_hit(
        &mut self,
        shoe: &Shoe,
        dealer: DealerTotal,
        player: HandTotal,
        doubled: bool,
    ) -> Result<f64> {
        self.check_shoe(shoe)?;
        self.clear_cache();
        Ok(self.hit(shoe, dealer, player, doubled, 0))
    }

    /// Expectation of standing on `player_total` while the dealer plays out.
    pub fn expected_value_stand(
        &mut self,
        shoe: &Shoe,
        dealer: DealerTotal,
        player_total: u8,
        doubled: bool,
    ) -> Result<f64> {
        self.check_shoe(shoe)?;
        self.clear_cache();
        Ok(self.stand(shoe, dealer, player_total, doubled))
    }

    fn check_shoe(&self, shoe: &Shoe) -> Result<()> {
        let remaining = shoe.total_remaining();
        if remaining == 0 {
            return Err(Error::EmptyShoe);
        }
        if remaining < self.search.min_cards_in_shoe {
            return Err(Error::ShoeBelowFloor {
                remaining,
                floor: self.search.min_cards_in_shoe,
            });
        }
        Ok(())
    }

    fn hit(
        &mut self,
        shoe: &Shoe,
        dealer: DealerTotal,
        player: HandTotal,
        doubled: bool,
        draws: u8,
    ) -> f64 {
        // The remaining draw allowance changes the answer only when capped.
        let depth = if self.search.max_player_draws.is_some() {
            draws
        } else {
            0
        };
        let frame = Frame::new(shoe, dealer, player, doubled).at_depth(depth);
        if self.search.memoize {
            if let Some(&ex) = self.ex_hit.get(&frame) {
                return ex;
            }
        }

        let bet = if doubled { 2.0 } else { 1.0 };
        let total = shoe.total_remaining() as f64;
        let may_hit_again = self
            .search
            .max_player_draws
            .map_or(true, |max_draws| draws + 1 < max_draws);

        // An exhausted shoe has nothing to weight and adds nothing.
        let mut ex = 0.0;
        for (rank, count) in shoe.remaining() {
            let p = count as f64 / total;
            let next_shoe = shoe.without(rank);
            let next = player.add(rank);

            let ex_next = if next.bust() {
                -bet
            } else if next.total == 21 || doubled || !may_hit_again {
                self.stand(&next_shoe, dealer, next.total, doubled)
            } else {
                let ex_hit = self.hit(&next_shoe, dealer, next, false, draws + 1);
                let ex_stand = self.stand(&next_shoe, dealer, next.total, false);
                ex_hit.max(ex_stand)
            };
            ex += p * ex_next;
        }

        if self.search.memoize {
            self.ex_hit.insert(frame, ex);
        }
        ex
    }

    fn stand(&mut self, shoe: &Shoe, dealer: DealerTotal, player_total: u8, doubled: bool) -> f64 {
        let frame = Frame::new(shoe, dealer, HandTotal::new(player_total, false), doubled);
        if self.search.memoize {
            if let Some(&ex) = self.ex_stand.get(&frame) {
                return ex;
            }
        }

        let bet = if doubled { 2.0 } else { 1.0 };
        let total = shoe.total_remaining() as f64;

        let mut ex = 0.0;
        for (rank, count) in shoe.remaining() {
            let p = count as f64 / total;
            let next = dealer.add(rank);

            let ex_next = if next.total > 21 {
                bet
            } else if next.total == 21 && dealer.can_blackjack {
                -bet
            } else if next.total == 17 && next.soft && self.rule.dealer_hit_on_soft17 {
                self.stand(&shoe.without(rank), next, player_total, doubled)
            } else if next.total >= 17 {
                match player_total.cmp(&next.total) {
                    Ordering::Greater => bet,
                    Ordering::Less => -bet,
                    Ordering::Equal => 0.0,
                }
            } else {
                self.stand(&shoe.without(rank), next, player_total, doubled)
            };
            ex += p * ex_next;
        }

        if self.search.memoize {
            self.ex_stand.insert(frame, ex);
        }
        ex
    }
}
