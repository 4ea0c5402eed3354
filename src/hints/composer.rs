use super::bunsetsu::{
    build_groups,
    BunsetsuGroup,
};
use crate::{
    core::UtsushiError,
    segmentation::TokenizerGateway,
};

#[derive(Clone)]
pub struct HintComposer {
    gateway: TokenizerGateway,
}

impl HintComposer {
    pub fn new(gateway: TokenizerGateway) -> Self {
        Self { gateway }
    }

    pub async fn compose(&self, sentence: &str) -> Result<Vec<BunsetsuGroup>, UtsushiError> {
        let analyzer = self.gateway.get_tokenizer().await?;
        let groups = build_groups(analyzer.tokenize(sentence));
        tracing::debug!(sentence, groups = groups.len(), "Composed hint");
        Ok(groups)
    }
}

/// Hint area of one card. The request control is enabled in `Hidden` and `Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HintView {
    #[default]
    Hidden,
    Loading,
    Ready(Vec<BunsetsuGroup>),
    Failed { message: String },
}

impl HintView {
    pub fn control_enabled(&self) -> bool {
        matches!(self, HintView::Hidden | HintView::Failed { .. })
    }

    pub fn groups(&self) -> &[BunsetsuGroup] {
        match self {
            HintView::Ready(groups) => groups,
            _ => &[],
        }
    }
}

impl From<Result<Vec<BunsetsuGroup>, UtsushiError>> for HintView {
    fn from(result: Result<Vec<BunsetsuGroup>, UtsushiError>) -> Self {
        match result {
            Ok(groups) => HintView::Ready(groups),
            Err(e) => {
                tracing::warn!(error = %e, "Hint request failed");
                HintView::Failed { message: e.to_string() }
            }
        }
    }
}
