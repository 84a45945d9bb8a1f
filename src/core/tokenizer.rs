//! Tokenization for token statistics
//!
//! The report flow only depends on the [`Tokenizer`] trait, so any backend that can
//! produce token ids works. [`BpeTokenizer`] is the shipped backend, using tiktoken
//! encodings (cl100k_base by default).
//!
//! Supported models:
//! - gpt-4, gpt-4-turbo, gpt-3.5-turbo (cl100k_base)
//! - claude-3, claude-3.5 (uses cl100k_base as approximation)
//! - gpt-4o (o200k_base)
//!
//! Usage:
//! ```no_run
//! use ctxcat::core::tokenizer::{BpeTokenizer, TokenModel, Tokenizer};
//!
//! let tokenizer = BpeTokenizer::new(TokenModel::default()).unwrap();
//! let ids = tokenizer.encode("Hello world").unwrap();
//! assert!(!ids.is_empty());
//! ```

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tiktoken_rs::{cl100k_base, o200k_base, CoreBPE};

/// Largest window produced by [`chunk_tokens`]
pub const MAX_CHUNK_TOKENS: usize = 512;

/// Failure to tokenize a piece of text
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// The BPE tables could not be loaded
    #[error("{0}")]
    EncodingUnavailable(String),

    /// `tokenize_with_tensor` returned no rows
    #[error("tokenizer returned no input ids")]
    EmptyTensor,

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

/// Batched token ids, shaped like a model input tensor (one row per input)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTensor {
    pub input_ids: Vec<Vec<u32>>,
}

impl TokenTensor {
    /// Length of the first row, which is the token count for a single input
    pub fn token_count(&self) -> Result<usize, TokenizeError> {
        self.input_ids
            .first()
            .map(Vec::len)
            .ok_or(TokenizeError::EmptyTensor)
    }
}

/// Anything that can turn text into token ids
pub trait Tokenizer {
    /// Encode text into a flat sequence of token ids
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizeError>;

    /// Encode text into a single-row tensor
    fn tokenize_with_tensor(&self, text: &str) -> Result<TokenTensor, TokenizeError> {
        Ok(TokenTensor {
            input_ids: vec![self.encode(text)?],
        })
    }

    /// Number of tokens in `text`
    fn count(&self, text: &str) -> Result<usize, TokenizeError> {
        self.tokenize_with_tensor(text)?.token_count()
    }
}

/// Supported token models/encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenModel {
    /// cl100k_base encoding (GPT-4, GPT-3.5-turbo, Claude 3)
    #[default]
    Cl100k,
    /// o200k_base encoding (GPT-4o native)
    O200k,
    /// GPT-4 / GPT-4-turbo (alias for Cl100k)
    Gpt4,
    /// GPT-4o (alias for O200k)
    Gpt4o,
    /// GPT-3.5-turbo (alias for Cl100k)
    Gpt35Turbo,
    /// Claude 3 / 3.5 (approximated with Cl100k)
    Claude3,
}

impl TokenModel {
    fn get_bpe(&self) -> Result<&'static CoreBPE, TokenizeError> {
        let bpe = match self {
            TokenModel::O200k | TokenModel::Gpt4o => O200K_BPE.as_ref(),
            TokenModel::Cl100k
            | TokenModel::Gpt4
            | TokenModel::Gpt35Turbo
            | TokenModel::Claude3 => CL100K_BPE.as_ref(),
        };
        bpe.map_err(|e| TokenizeError::EncodingUnavailable(e.clone()))
    }

    /// List all available models
    pub fn available_models() -> &'static [&'static str] {
        &["cl100k", "o200k", "gpt4", "gpt4o", "gpt35", "claude3"]
    }
}

impl fmt::Display for TokenModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenModel::Cl100k => "cl100k",
            TokenModel::O200k => "o200k",
            TokenModel::Gpt4 => "gpt4",
            TokenModel::Gpt4o => "gpt4o",
            TokenModel::Gpt35Turbo => "gpt35",
            TokenModel::Claude3 => "claude3",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for TokenModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cl100k" | "cl100k_base" | "default" => Ok(TokenModel::Cl100k),
            "o200k" | "o200k_base" => Ok(TokenModel::O200k),
            "gpt4" | "gpt-4" | "gpt-4-turbo" => Ok(TokenModel::Gpt4),
            "gpt4o" | "gpt-4o" => Ok(TokenModel::Gpt4o),
            "gpt35" | "gpt-3.5" | "gpt-3.5-turbo" => Ok(TokenModel::Gpt35Turbo),
            "claude" | "claude3" | "claude-3" | "claude-3.5" => Ok(TokenModel::Claude3),
            _ => Err(format!(
                "Unknown model: {}. Available: {}",
                s,
                TokenModel::available_models().join(", ")
            )),
        }
    }
}

// Lazy-initialized BPE encodings (loaded once on first use)
static CL100K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| cl100k_base().map_err(|e| format!("Failed to load cl100k_base: {}", e)));

static O200K_BPE: Lazy<Result<CoreBPE, String>> =
    Lazy::new(|| o200k_base().map_err(|e| format!("Failed to load o200k_base: {}", e)));

/// tiktoken-backed tokenizer
pub struct BpeTokenizer {
    model: TokenModel,
    bpe: &'static CoreBPE,
}

impl BpeTokenizer {
    /// Load the encoding for `model`
    pub fn new(model: TokenModel) -> Result<Self, TokenizeError> {
        Ok(Self {
            model,
            bpe: model.get_bpe()?,
        })
    }
}

impl fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpeTokenizer")
            .field("model", &self.model)
            .finish()
    }
}

impl Tokenizer for BpeTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>, TokenizeError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.bpe.encode_with_special_tokens(text))
    }
}

/// Split token ids into consecutive windows of at most `size` tokens.
///
/// Windows do not overlap and the last one may be shorter. A `size` of zero falls
/// back to [`MAX_CHUNK_TOKENS`].
pub fn chunk_tokens(ids: &[u32], size: usize) -> Vec<Vec<u32>> {
    let size = if size == 0 { MAX_CHUNK_TOKENS } else { size };
    ids.chunks(size).map(<[u32]>::to_vec).collect()
}
