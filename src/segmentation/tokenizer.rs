use std::{
    future::Future,
    path::{
        Path,
        PathBuf,
    },
    sync::Arc,
};

use futures::future::{
    BoxFuture,
    FutureExt,
    Shared,
};
use vibrato::Tokenizer;

use super::token_models::VibratoToken;
use crate::{
    core::{
        Token,
        UtsushiError,
    },
    dictionary::{
        ensure_dictionary,
        load_dictionary,
        DictType,
    },
};

pub trait MorphologicalAnalyzer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

pub type SharedAnalyzer = Arc<dyn MorphologicalAnalyzer>;

pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
    dict_type: DictType,
}

impl VibratoAnalyzer {
    pub fn new(tokenizer: Tokenizer, dict_type: DictType) -> Self {
        Self { tokenizer, dict_type }
    }

    /// Loads from `dictionary_path` when given, otherwise from the managed download.
    pub fn load(dict_type: DictType, dictionary_path: Option<&Path>) -> Result<Self, UtsushiError> {
        let tokenizer = init_vibrato(&dict_type, dictionary_path)?;
        Ok(Self::new(tokenizer, dict_type))
    }
}

impl MorphologicalAnalyzer for VibratoAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        worker
            .token_iter()
            .map(|token| VibratoToken::from(token).into_token(&self.dict_type))
            .collect()
    }
}

pub fn init_vibrato(
    dict_type: &DictType,
    dictionary_path: Option<&Path>,
) -> Result<Tokenizer, UtsushiError> {
    let dict_path = match dictionary_path {
        Some(path) => path.to_path_buf(),
        None => ensure_dictionary(dict_type)?,
    };
    let dict = load_dictionary(&dict_path)?;
    Ok(Tokenizer::new(dict))
}

type InitFuture = Shared<BoxFuture<'static, Result<SharedAnalyzer, String>>>;

/// One-shot, memoized analyzer initialization shared by every hint request.
///
/// All awaiters observe the same outcome. A failed initialization stays failed;
/// build a new gateway to try again.
#[derive(Clone)]
pub struct TokenizerGateway {
    init: InitFuture,
}

impl TokenizerGateway {
    /// Wraps `loader` without driving it; it runs on the first `get_tokenizer`.
    pub fn new<F>(loader: F) -> Self
    where
        F: Future<Output = Result<SharedAnalyzer, UtsushiError>> + Send + 'static,
    {
        let init = async move {
            loader.await.map_err(|e| {
                tracing::error!(error = %e, "Tokenizer initialization failed");
                e.to_string()
            })
        }
        .boxed()
        .shared();

        Self { init }
    }

    /// Like [`TokenizerGateway::new`] but starts loading immediately on the runtime.
    pub fn start<F>(loader: F) -> Self
    where
        F: Future<Output = Result<SharedAnalyzer, UtsushiError>> + Send + 'static,
    {
        let gateway = Self::new(loader);
        let warmup = gateway.init.clone();
        tokio::spawn(async move {
            if warmup.await.is_ok() {
                tracing::info!("Tokenizer ready");
            }
        });
        gateway
    }

    pub fn vibrato(dict_type: DictType, dictionary_path: Option<PathBuf>) -> Self {
        Self::start(async move {
            let analyzer = tokio::task::spawn_blocking(move || {
                VibratoAnalyzer::load(dict_type, dictionary_path.as_deref())
            })
            .await
            .map_err(|e| UtsushiError::Initialization(e.to_string()))??;

            Ok(Arc::new(analyzer) as SharedAnalyzer)
        })
    }

    pub async fn get_tokenizer(&self) -> Result<SharedAnalyzer, UtsushiError> {
        self.init.clone().await.map_err(UtsushiError::Initialization)
    }
}
