//! # Tokenizer Config (``config.json``)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{BpeError, BpeResult},
    types::TokenType,
    vocab::{
        MergeRules, TokenVocab,
        specials::{BASE_VOCAB_SIZE, SPECIAL_TOKENS},
    },
};

/// The persisted record of a trained tokenizer's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// The final vocabulary size.
    pub vocab_size: usize,

    /// The vocabulary size requested at training time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_vocab_size: Option<usize>,

    /// The number of learned merge rules.
    pub num_merges: usize,

    /// ``{ name -> id }`` for the reserved special tokens.
    pub special_tokens: BTreeMap<String, usize>,

    /// Specials plus byte tokens; always 260.
    pub base_vocab_size: usize,
}

impl TokenizerConfig {
    /// Describe a vocabulary and its merges.
    pub fn describe<T: TokenType>(
        vocab: &TokenVocab<T>,
        merges: &MergeRules<T>,
        target_vocab_size: Option<usize>,
    ) -> Self {
        Self {
            vocab_size: vocab.len(),
            target_vocab_size,
            num_merges: merges.len(),
            special_tokens: default_special_tokens(),
            base_vocab_size: BASE_VOCAB_SIZE,
        }
    }

    /// Check this config against the vocabulary and merges it accompanies.
    pub fn check<T: TokenType>(
        &self,
        vocab: &TokenVocab<T>,
        merges: &MergeRules<T>,
    ) -> BpeResult<()> {
        if self.special_tokens != default_special_tokens() {
            return Err(BpeError::VocabConflict(format!(
                "special tokens {:?} differ from the reserved table",
                self.special_tokens
            )));
        }
        if self.base_vocab_size != BASE_VOCAB_SIZE {
            return Err(BpeError::VocabConflict(format!(
                "base_vocab_size is {}, expected {BASE_VOCAB_SIZE}",
                self.base_vocab_size
            )));
        }
        if self.vocab_size != vocab.len() {
            return Err(BpeError::VocabConflict(format!(
                "vocab_size is {}, but the vocabulary has {} tokens",
                self.vocab_size,
                vocab.len()
            )));
        }
        if self.num_merges != merges.len() {
            return Err(BpeError::VocabConflict(format!(
                "num_merges is {}, but there are {} merge rules",
                self.num_merges,
                merges.len()
            )));
        }
        Ok(())
    }
}

/// The reserved ``{ name -> id }`` table.
pub fn default_special_tokens() -> BTreeMap<String, usize> {
    SPECIAL_TOKENS
        .iter()
        .map(|&(name, id)| (name.to_string(), id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_shape() {
        let vocab: TokenVocab<u32> = TokenVocab::from_learned(vec![b"ab".to_vec()]).unwrap();
        let merges = MergeRules::from_rules([crate::vocab::MergeRule::new((101, 102), 260)]).unwrap();

        let config = TokenizerConfig::describe(&vocab, &merges, Some(300));
        config.check(&vocab, &merges).unwrap();

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "vocab_size": 261,
                "target_vocab_size": 300,
                "num_merges": 1,
                "special_tokens": {"<PAD>": 0, "<UNK>": 1, "<BOS>": 2, "<EOS>": 3},
                "base_vocab_size": 260,
            })
        );
    }

    #[test]
    fn test_config_without_target() {
        let config: TokenizerConfig = serde_json::from_str(
            r#"{
                "vocab_size": 260,
                "num_merges": 0,
                "special_tokens": {"<PAD>": 0, "<UNK>": 1, "<BOS>": 2, "<EOS>": 3},
                "base_vocab_size": 260
            }"#,
        )
        .unwrap();
        assert_eq!(config.target_vocab_size, None);

        let vocab: TokenVocab<u32> = TokenVocab::new().unwrap();
        config.check(&vocab, &MergeRules::new()).unwrap();
    }

    #[test]
    fn test_config_check_rejects_mismatch() {
        let vocab: TokenVocab<u32> = TokenVocab::new().unwrap();
        let merges: MergeRules<u32> = MergeRules::new();

        let mut config = TokenizerConfig::describe(&vocab, &merges, None);
        config.special_tokens.insert("<BOS>".to_string(), 7);
        assert!(config.check(&vocab, &merges).is_err());

        let mut config = TokenizerConfig::describe(&vocab, &merges, None);
        config.vocab_size = 500;
        assert!(config.check(&vocab, &merges).is_err());
    }
}
