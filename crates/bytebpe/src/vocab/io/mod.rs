//! # Vocabulary IO
//!
//! A trained tokenizer is a directory of three artifacts:
//! * ``vocab.json`` - ``{ token_string: id }``, see [`vocab_json`].
//! * ``merges.txt`` - the merge rules in priority order, see [`merges_txt`].
//! * ``config.json`` - the [`TokenizerConfig`].
//!
//! ## Loading A Model Directory
//!
//! ```rust,no_run
//! use bytebpe::vocab::io::load_model_dir;
//!
//! fn example() -> bytebpe::BpeResult<()> {
//!     let (vocab, merges, config) = load_model_dir::<u32, _>("saved")?;
//!     assert_eq!(vocab.len(), config.vocab_size);
//!     assert_eq!(merges.len(), config.num_merges);
//!     Ok(())
//! }
//! ```

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

pub mod latin1;
pub mod merges_txt;
pub mod vocab_json;

#[doc(inline)]
pub use merges_txt::{load_merges_txt_path, read_merges_txt, save_merges_txt_path, write_merges_txt};
#[doc(inline)]
pub use vocab_json::{load_vocab_json_path, read_vocab_json, save_vocab_json_path, write_vocab_json};

use crate::{
    errors::{BpeError, BpeResult},
    tokenizer::TokenizerConfig,
    types::TokenType,
    vocab::{MergeRules, TokenVocab},
};

/// The vocabulary file name.
pub const VOCAB_FILE: &str = "vocab.json";

/// The merge rule file name.
pub const MERGES_FILE: &str = "merges.txt";

/// The config file name.
pub const CONFIG_FILE: &str = "config.json";

/// Load a [`TokenizerConfig`] from a ``config.json`` file.
pub fn load_config_path<P: AsRef<Path>>(path: P) -> BpeResult<TokenizerConfig> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Save a [`TokenizerConfig`] to a ``config.json`` file.
pub fn save_config_path<P: AsRef<Path>>(
    config: &TokenizerConfig,
    path: P,
) -> BpeResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Save a model directory; creating it if needed.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(vocab, merges, config)))]
pub fn save_model_dir<T, P>(
    dir: P,
    vocab: &TokenVocab<T>,
    merges: &MergeRules<T>,
    config: &TokenizerConfig,
) -> BpeResult<()>
where
    T: TokenType,
    P: AsRef<Path> + core::fmt::Debug,
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    save_vocab_json_path(vocab, dir.join(VOCAB_FILE))?;
    save_merges_txt_path(merges, dir.join(MERGES_FILE))?;
    save_config_path(config, dir.join(CONFIG_FILE))?;

    log::info!(
        "Saved tokenizer to {}: {} tokens, {} merge rules",
        dir.display(),
        vocab.len(),
        merges.len()
    );
    Ok(())
}

/// Load and cross-check a model directory.
///
/// ## Returns
/// [`BpeError::Load`] naming the offending artifact if any file is
/// missing, malformed, or inconsistent with the others.
#[cfg_attr(feature = "tracing", tracing::instrument)]
pub fn load_model_dir<T, P>(dir: P) -> BpeResult<(TokenVocab<T>, MergeRules<T>, TokenizerConfig)>
where
    T: TokenType,
    P: AsRef<Path> + core::fmt::Debug,
{
    let dir = dir.as_ref();

    let vocab_path = dir.join(VOCAB_FILE);
    let vocab: TokenVocab<T> =
        load_vocab_json_path(&vocab_path).map_err(|e| BpeError::load(&vocab_path, e))?;

    let merges_path = dir.join(MERGES_FILE);
    let merges: MergeRules<T> =
        load_merges_txt_path(&merges_path).map_err(|e| BpeError::load(&merges_path, e))?;
    merges
        .check_vocab(&vocab)
        .map_err(|e| BpeError::load(&merges_path, e))?;

    let config_path = dir.join(CONFIG_FILE);
    let config = load_config_path(&config_path).map_err(|e| BpeError::load(&config_path, e))?;
    config
        .check(&vocab, &merges)
        .map_err(|e| BpeError::load(&config_path, e))?;

    log::debug!(
        "Loaded tokenizer from {}: {} tokens, {} merge rules",
        dir.display(),
        vocab.len(),
        merges.len()
    );
    Ok((vocab, merges, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::MergeRule;

    fn sample() -> (TokenVocab<u32>, MergeRules<u32>, TokenizerConfig) {
        let vocab = TokenVocab::from_learned(vec![b"ab".to_vec(), b"ab ".to_vec()]).unwrap();
        let merges = MergeRules::from_rules([
            MergeRule::new((101, 102), 260),
            MergeRule::new((260, 36), 261),
        ])
        .unwrap();
        let config = TokenizerConfig::describe(&vocab, &merges, Some(262));
        (vocab, merges, config)
    }

    #[test]
    fn test_save_load_model_dir() {
        let (vocab, merges, config) = sample();

        tempdir::TempDir::new("model_dir_test")
            .and_then(|dir| {
                let path = dir.path().join("nested").join("saved");
                save_model_dir(&path, &vocab, &merges, &config).expect("failed to save");

                let (lvocab, lmerges, lconfig) =
                    load_model_dir::<u32, _>(&path).expect("failed to load");

                assert_eq!(lvocab.iter().collect::<Vec<_>>(), vocab.iter().collect::<Vec<_>>());
                assert_eq!(lmerges.rules(), merges.rules());
                assert_eq!(lconfig, config);

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_load_missing_artifact() {
        let (vocab, merges, config) = sample();

        tempdir::TempDir::new("model_dir_test")
            .and_then(|dir| {
                save_model_dir(dir.path(), &vocab, &merges, &config).unwrap();
                fs::remove_file(dir.path().join(MERGES_FILE))?;

                let err = load_model_dir::<u32, _>(dir.path()).unwrap_err();
                match err {
                    BpeError::Load { path, .. } => assert!(path.ends_with(MERGES_FILE)),
                    other => panic!("unexpected error: {other}"),
                }
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_load_inconsistent_merges() {
        let (vocab, _, _) = sample();
        let merges = MergeRules::from_rules([MergeRule::new((101, 102), 260)]).unwrap();
        let config = TokenizerConfig::describe(&vocab, &merges, None);

        tempdir::TempDir::new("model_dir_test")
            .and_then(|dir| {
                save_model_dir(dir.path(), &vocab, &merges, &config).unwrap();

                let err = load_model_dir::<u32, _>(dir.path()).unwrap_err();
                assert!(err.to_string().contains(MERGES_FILE), "{err}");
                Ok(())
            })
            .unwrap();
    }
}
