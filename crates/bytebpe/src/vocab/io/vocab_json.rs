//! # ``vocab.json`` IO
//!
//! A JSON object of ``{ token_string: id }``, in id order.
//! Special tokens are keyed by their names; every other token is keyed
//! by its bridged payload (see [`super::latin1`]).

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Serialize, Serializer};

use crate::{
    errors::{BpeError, BpeResult},
    types::{TokenType, token_to_usize},
    vocab::{
        TokenVocab,
        io::latin1::{bridge_bytes, unbridge_str},
        specials::{BASE_VOCAB_SIZE, BYTE_TOKEN_OFFSET, NUM_SPECIAL_TOKENS, special_id, special_name},
    },
};

/// The ``vocab.json`` key for `token`.
///
/// ## Returns
/// The special token name, the bridged payload, or `None` for undefined tokens.
pub fn token_string<T: TokenType>(
    vocab: &TokenVocab<T>,
    token: T,
) -> Option<String> {
    match special_name(token_to_usize(token)) {
        Some(name) => Some(name.to_string()),
        None => vocab.payload_for(token).map(bridge_bytes),
    }
}

struct VocabJson<'a, T: TokenType>(&'a TokenVocab<T>);

impl<T: TokenType> Serialize for VocabJson<'_, T> {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let vocab = self.0;
        serializer.collect_map(vocab.iter().map(|(token, payload)| {
            let key = match special_name(token_to_usize(token)) {
                Some(name) => name.to_string(),
                None => bridge_bytes(payload),
            };
            (key, token_to_usize(token))
        }))
    }
}

/// Save a [`TokenVocab`] to a ``vocab.json`` file.
pub fn save_vocab_json_path<T: TokenType, P: AsRef<Path>>(
    vocab: &TokenVocab<T>,
    path: P,
) -> BpeResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_vocab_json(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`TokenVocab`] as ``vocab.json`` to a [`Write`] writer.
///
/// ## Returns
/// [`BpeError::VocabConflict`] if a learned payload's bridged string
/// collides with a special token name.
pub fn write_vocab_json<T, W>(
    vocab: &TokenVocab<T>,
    writer: &mut W,
) -> BpeResult<()>
where
    T: TokenType,
    W: Write,
{
    for (token, payload) in vocab.iter().skip(BASE_VOCAB_SIZE) {
        let key = bridge_bytes(payload);
        if special_id(&key).is_some() {
            return Err(BpeError::VocabConflict(format!(
                "token {token} payload {key:?} collides with a special token name"
            )));
        }
    }

    serde_json::to_writer_pretty(&mut *writer, &VocabJson(vocab))?;
    writeln!(writer)?;
    Ok(())
}

/// Load a [`TokenVocab`] from a ``vocab.json`` file.
pub fn load_vocab_json_path<T, P>(path: P) -> BpeResult<TokenVocab<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_vocab_json(reader)
}

/// Read a [`TokenVocab`] from a ``vocab.json`` reader.
///
/// The ids must be dense from ``0``, and the first 260 entries must be
/// the reserved layout.
pub fn read_vocab_json<T, R>(reader: R) -> BpeResult<TokenVocab<T>>
where
    T: TokenType,
    R: Read,
{
    let entries: BTreeMap<String, u64> = serde_json::from_reader(reader)?;

    let mut by_id: Vec<(u64, String)> = entries.into_iter().map(|(k, id)| (id, k)).collect();
    by_id.sort();

    if by_id.len() < BASE_VOCAB_SIZE {
        return Err(BpeError::VocabConflict(format!(
            "{} entries; the base vocabulary alone has {BASE_VOCAB_SIZE}",
            by_id.len()
        )));
    }

    let mut learned: Vec<Vec<u8>> = Vec::with_capacity(by_id.len() - BASE_VOCAB_SIZE);
    for (expected, (id, key)) in by_id.into_iter().enumerate() {
        if id != expected as u64 {
            return Err(BpeError::VocabConflict(format!(
                "ids are not dense: expected {expected}, found {id} ({key:?})"
            )));
        }

        if expected < NUM_SPECIAL_TOKENS {
            if special_name(expected) != Some(key.as_str()) {
                return Err(BpeError::VocabConflict(format!(
                    "id {id} must be special token {:?}, found {key:?}",
                    special_name(expected).unwrap_or_default()
                )));
            }
            continue;
        }

        let payload = unbridge_str(&key)
            .ok_or_else(|| BpeError::Parse(format!("token {id} key {key:?} is not a byte string")))?;

        if expected < BASE_VOCAB_SIZE {
            if payload != [(expected - BYTE_TOKEN_OFFSET) as u8] {
                return Err(BpeError::VocabConflict(format!(
                    "id {id} must be byte {:#04x}, found {key:?}",
                    expected - BYTE_TOKEN_OFFSET
                )));
            }
        } else {
            learned.push(payload);
        }
    }

    TokenVocab::from_learned(learned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vocab() -> TokenVocab<u32> {
        TokenVocab::from_learned(vec![b"ab".to_vec(), "é".as_bytes().to_vec()]).unwrap()
    }

    #[test]
    fn test_token_string() {
        let vocab = sample_vocab();
        assert_eq!(token_string(&vocab, 1).as_deref(), Some("<UNK>"));
        assert_eq!(token_string(&vocab, 4).as_deref(), Some("\u{0}"));
        assert_eq!(token_string(&vocab, 260).as_deref(), Some("ab"));
        assert_eq!(token_string(&vocab, 261).as_deref(), Some("\u{C3}\u{A9}"));
        assert_eq!(token_string(&vocab, 262), None);
    }

    #[test]
    fn test_write_read_vocab_json() {
        let vocab = sample_vocab();

        let mut buf: Vec<u8> = Vec::new();
        write_vocab_json(&vocab, &mut buf).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("{\n  \"<PAD>\": 0,\n  \"<UNK>\": 1,"));
        assert!(text.contains("\"ab\": 260"));

        let loaded: TokenVocab<u32> = read_vocab_json(buf.as_slice()).unwrap();
        assert_eq!(loaded.len(), vocab.len());
        assert_eq!(
            loaded.iter().collect::<Vec<_>>(),
            vocab.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_write_rejects_special_name_payload() {
        let vocab: TokenVocab<u32> = TokenVocab::from_learned(vec![b"<EOS>".to_vec()]).unwrap();
        let mut buf: Vec<u8> = Vec::new();
        assert!(matches!(
            write_vocab_json(&vocab, &mut buf),
            Err(BpeError::VocabConflict(_))
        ));
    }

    fn base_entries() -> serde_json::Map<String, serde_json::Value> {
        let vocab: TokenVocab<u32> = TokenVocab::new().unwrap();
        let mut buf: Vec<u8> = Vec::new();
        write_vocab_json(&vocab, &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test]
    fn test_read_rejects_gaps() {
        let mut entries = base_entries();
        entries.insert("xyz".to_string(), 261.into());
        let json = serde_json::to_vec(&entries).unwrap();
        let err = read_vocab_json::<u32, _>(json.as_slice()).unwrap_err();
        assert!(err.to_string().contains("not dense"), "{err}");
    }

    #[test]
    fn test_read_rejects_wrong_base_layout() {
        let mut entries = base_entries();
        entries.insert("<PAD>".to_string(), 5.into());
        entries.insert("\u{1}".to_string(), 0.into());
        let json = serde_json::to_vec(&entries).unwrap();
        assert!(read_vocab_json::<u32, _>(json.as_slice()).is_err());
    }

    #[test]
    fn test_read_rejects_truncated() {
        assert!(read_vocab_json::<u32, _>(r#"{"<PAD>": 0}"#.as_bytes()).is_err());
        assert!(read_vocab_json::<u32, _>("not json".as_bytes()).is_err());
    }

    #[test]
    fn test_read_rejects_remapped_byte() {
        let mut entries = base_entries();
        entries.insert("ab".to_string(), 260.into());
        // Bridged "a" is byte token 101; moving it leaves a hole.
        entries.insert("a".to_string(), 261.into());
        let json = serde_json::to_vec(&entries).unwrap();
        assert!(read_vocab_json::<u32, _>(json.as_slice()).is_err());
    }
}
