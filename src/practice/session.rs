use super::card::{
    Card,
    CardView,
};
use crate::{
    core::UtsushiError,
    hints::{
        HintComposer,
        HintView,
    },
    segmentation::SentenceSegmenter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Updated,
    Completed { next_focus: Option<usize> },
}

/// The ordered card set for one piece of text, plus which card holds focus.
pub struct PracticeSession {
    segmenter: SentenceSegmenter,
    cards: Vec<Card>,
    focused: Option<usize>,
}

impl PracticeSession {
    pub fn new() -> Result<Self, UtsushiError> {
        Ok(Self { segmenter: SentenceSegmenter::new()?, cards: Vec::new(), focused: None })
    }

    /// Segments `text` and replaces every card. Blank text leaves the session untouched.
    pub fn load_text(&mut self, text: &str) -> usize {
        let text = text.trim();
        if text.is_empty() {
            return 0;
        }
        let sentences = self.segmenter.split(text);
        self.load_sentences(sentences)
    }

    pub fn load_sentences(&mut self, sentences: Vec<String>) -> usize {
        if sentences.is_empty() {
            return 0;
        }

        self.cards = sentences
            .into_iter()
            .enumerate()
            .map(|(index, sentence)| Card::new(index, sentence))
            .collect();
        self.focused = None;
        tracing::info!(cards = self.cards.len(), "Practice set loaded");

        // Index 0 exists since the set is non-empty
        let _ = self.focus(0);
        self.cards.len()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Result<&Card, UtsushiError> {
        self.cards.get(index).ok_or(UtsushiError::NoSuchCard(index))
    }

    fn card_mut(&mut self, index: usize) -> Result<&mut Card, UtsushiError> {
        self.cards.get_mut(index).ok_or(UtsushiError::NoSuchCard(index))
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focus(&mut self, index: usize) -> Result<(), UtsushiError> {
        self.card_mut(index)?.on_focus();
        self.focused = Some(index);
        Ok(())
    }

    /// Feeds the full current input of a card. Completion moves focus to the next
    /// card in order, if there is one.
    pub fn input(&mut self, index: usize, text: &str) -> Result<InputOutcome, UtsushiError> {
        let completed = self.card_mut(index)?.apply_input(text)?;
        if !completed {
            return Ok(InputOutcome::Updated);
        }

        let next = index + 1;
        let next_focus = if next < self.cards.len() {
            self.focus(next)?;
            Some(next)
        } else {
            None
        };

        Ok(InputOutcome::Completed { next_focus })
    }

    /// Runs a hint request for a card unless one is loading or already shown.
    pub async fn request_hint(
        &mut self,
        index: usize,
        composer: &HintComposer,
    ) -> Result<&HintView, UtsushiError> {
        if self.card(index)?.hint.control_enabled() {
            let sentence = {
                let card = self.card_mut(index)?;
                card.hint = HintView::Loading;
                card.sentence().to_string()
            };
            let view = HintView::from(composer.compose(&sentence).await);
            self.card_mut(index)?.hint = view;
        }

        Ok(&self.card(index)?.hint)
    }

    pub fn views(&self) -> Vec<CardView<'_>> {
        self.cards.iter().map(|card| card.view(self.focused == Some(card.index()))).collect()
    }

    pub fn is_finished(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|card| card.is_locked())
    }
}
