use crate::{Action, Engine, Expectations, Rank, Result, Rule, SearchConfig, Shoe};

/// Something that plays a hand while watching the cards come out of a shoe.
pub trait Strategy {
    /// Called once for every card that is dealt face up, in dealing order.
    fn observe_card(&mut self, rank: Rank) -> Result<()>;
    /// Called when the dealer starts a freshly shuffled shoe.
    fn on_new_shoe(&mut self);
    fn make_decision(&mut self, dealer_up_card: Rank, hand: &[Rank]) -> Result<Action>;
}

/// Holds the authoritative count of a live shoe and advises on hands against
/// it.
///
/// The shoe only changes through [`Advisor::observe`] and
/// [`Advisor::reshuffle`]. Advising never touches it.
#[derive(Debug, Clone)]
pub struct Advisor {
    engine: Engine,
    shoe: Shoe,
}

impl Advisor {
    pub fn new(rule: Rule, search: SearchConfig) -> Self {
        let shoe = Shoe::new(rule.number_of_decks);
        Self::with_shoe(rule, search, shoe)
    }

    /// Starts from a partially dealt or otherwise custom shoe.
    pub fn with_shoe(rule: Rule, search: SearchConfig, shoe: Shoe) -> Self {
        Self {
            engine: Engine::new(rule, search),
            shoe,
        }
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Records a card that was actually dealt. Each card must be observed once.
    pub fn observe(&mut self, rank: Rank) -> Result<()> {
        self.shoe.remove(rank)?;
        log::trace!("observed {}, {} left", rank, self.shoe.total_remaining());
        Ok(())
    }

    pub fn observe_all(&mut self, ranks: &[Rank]) -> Result<()> {
        ranks.iter().try_for_each(|&rank| self.observe(rank))
    }

    /// Puts every dealt card back.
    pub fn reshuffle(&mut self) {
        self.shoe.reset();
        log::debug!("reshuffled, {} cards in shoe", self.shoe.total_remaining());
    }

    pub fn expectations(&mut self, dealer_up_card: Rank, hand: &[Rank]) -> Result<Expectations> {
        self.engine.evaluate(dealer_up_card, hand, &self.shoe)
    }

    pub fn advise(&mut self, dealer_up_card: Rank, hand: &[Rank]) -> Result<Action> {
        self.engine.decide(dealer_up_card, hand, &self.shoe)
    }

    /// Advises every hand at the table against the same shoe.
    pub fn advise_all<H: AsRef<[Rank]>>(
        &mut self,
        dealer_up_card: Rank,
        hands: &[H],
    ) -> Result<Vec<Action>> {
        hands
            .iter()
            .map(|hand| self.advise(dealer_up_card, hand.as_ref()))
            .collect()
    }
}

impl Strategy for Advisor {
    fn observe_card(&mut self, rank: Rank) -> Result<()> {
        self.observe(rank)
    }

    fn on_new_shoe(&mut self) {
        self.reshuffle();
    }

    fn make_decision(&mut self, dealer_up_card: Rank, hand: &[Rank]) -> Result<Action> {
        self.advise(dealer_up_card, hand)
    }
}
