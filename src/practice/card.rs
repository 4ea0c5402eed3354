use super::judge::{
    judge,
    CharSpan,
    Judgement,
};
use crate::{
    core::UtsushiError,
    hints::HintView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardState {
    Pending, // Not focused yet
    Active,  // Has received focus, accepting input
    Locked,  // Completed; terminal
}

#[derive(Debug, Clone)]
pub struct Card {
    sentence: String,
    index: usize,
    state: CardState,
    input: String,
    judgement: Judgement,
    pub hint: HintView,
}

impl Card {
    pub fn new(index: usize, sentence: String) -> Self {
        Self {
            sentence,
            index,
            state: CardState::Pending,
            input: String::new(),
            judgement: Judgement::default(),
            hint: HintView::default(),
        }
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn judgement(&self) -> &Judgement {
        &self.judgement
    }

    pub fn is_locked(&self) -> bool {
        self.state == CardState::Locked
    }

    pub fn on_focus(&mut self) {
        if self.state == CardState::Pending {
            self.state = CardState::Active;
        }
    }

    /// Replaces the input buffer and re-judges it from scratch.
    /// Returns true when this input completed the card.
    pub fn apply_input(&mut self, input: &str) -> Result<bool, UtsushiError> {
        if self.is_locked() {
            return Err(UtsushiError::CardLocked(self.index));
        }

        self.input = input.to_string();
        self.judgement = judge(&self.sentence, &self.input);

        if self.judgement.complete {
            self.state = CardState::Locked;
            tracing::debug!(card = self.index, "Card completed");
        }

        Ok(self.judgement.complete)
    }
}

/// Render-ready snapshot of one card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView<'a> {
    pub index: usize,
    pub sentence: &'a str,
    pub spans: &'a [CharSpan],
    pub complete: bool,
    pub editable: bool,
    pub focused: bool,
    pub hint: &'a HintView,
}

impl Card {
    pub fn view(&self, focused: bool) -> CardView<'_> {
        CardView {
            index: self.index,
            sentence: &self.sentence,
            spans: &self.judgement.spans,
            complete: self.is_locked(),
            editable: !self.is_locked(),
            focused,
            hint: &self.hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut card = Card::new(0, "はい".to_string());
        assert_eq!(card.state(), CardState::Pending);

        // Pending cards already accept input
        assert!(!card.apply_input("は").unwrap());
        assert_eq!(card.state(), CardState::Pending);

        card.on_focus();
        assert_eq!(card.state(), CardState::Active);

        assert!(card.apply_input("はい").unwrap());
        assert_eq!(card.state(), CardState::Locked);

        card.on_focus();
        assert_eq!(card.state(), CardState::Locked);
    }

    #[test]
    fn test_locked_card_rejects_edits() {
        let mut card = Card::new(3, "はい".to_string());
        card.apply_input("はい").unwrap();

        assert!(matches!(card.apply_input("は"), Err(UtsushiError::CardLocked(3))));
        assert_eq!(card.input(), "はい");

        let view = card.view(false);
        assert!(view.complete);
        assert!(!view.editable);
    }

    #[test]
    fn test_input_recomputed_from_raw_buffer() {
        let mut card = Card::new(0, "猫が".to_string());
        card.apply_input("猫を").unwrap();
        assert_eq!(card.judgement().mistakes(), 1);

        card.apply_input("猫").unwrap();
        assert_eq!(card.judgement().mistakes(), 0);
        assert_eq!(card.judgement().spans, vec![CharSpan::Correct('猫')]);
    }
}
