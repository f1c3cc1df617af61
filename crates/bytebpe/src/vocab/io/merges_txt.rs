//! # ``merges.txt`` IO
//!
//! One rule per line, in priority order:
//! ```terminaloutput
//! {LEFT} {RIGHT} {NEW}
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{BpeError, BpeResult},
    types::{TokenType, token_from_usize},
    vocab::{MergeRule, MergeRules},
};

/// Save [`MergeRules`] to a ``merges.txt`` file.
pub fn save_merges_txt_path<T: TokenType, P: AsRef<Path>>(
    merges: &MergeRules<T>,
    path: P,
) -> BpeResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_merges_txt(merges, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write [`MergeRules`] to a [`Write`] writer.
pub fn write_merges_txt<T, W>(
    merges: &MergeRules<T>,
    writer: &mut W,
) -> BpeResult<()>
where
    T: TokenType,
    W: Write,
{
    for rule in merges.iter() {
        let (a, b) = rule.pair;
        writeln!(writer, "{a} {b} {}", rule.token)?;
    }
    Ok(())
}

/// Load [`MergeRules`] from a ``merges.txt`` file.
pub fn load_merges_txt_path<T, P>(path: P) -> BpeResult<MergeRules<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_merges_txt(reader)
}

/// Read [`MergeRules`] from a ``merges.txt`` line reader.
///
/// Blank lines are skipped; any other line must hold exactly three ids.
pub fn read_merges_txt<T, R>(reader: R) -> BpeResult<MergeRules<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut merges = MergeRules::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;

        let fields = line.split_whitespace().collect::<Vec<&str>>();
        if fields.is_empty() {
            continue;
        }
        let &[a, b, t] = fields.as_slice() else {
            return Err(BpeError::Parse(format!(
                "line {line_no}: expected 3 ids, found {:?}",
                line.trim()
            )));
        };

        let parse = |field: &str| -> BpeResult<T> {
            let id: usize = field
                .parse()
                .map_err(|e| BpeError::Parse(format!("line {line_no}: {field:?}: {e}")))?;
            token_from_usize(id)
        };

        merges
            .push(MergeRule::new((parse(a)?, parse(b)?), parse(t)?))
            .map_err(|e| BpeError::VocabConflict(format!("line {line_no}: {e}")))?;
    }

    Ok(merges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_merges_txt() {
        let merges = MergeRules::<u32>::from_rules([
            MergeRule::new((101, 102), 260),
            MergeRule::new((36, 260), 261),
        ])
        .unwrap();

        let mut buf: Vec<u8> = Vec::new();
        write_merges_txt(&merges, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "101 102 260\n36 260 261\n");

        let loaded: MergeRules<u32> = read_merges_txt(buf.as_slice()).unwrap();
        assert_eq!(loaded.rules(), merges.rules());
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let loaded: MergeRules<u16> = read_merges_txt("\n101 102 260\n  \n".as_bytes()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_read_rejects_malformed_lines() {
        let err = read_merges_txt::<u32, _>("101 102\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parse error: line 1: expected 3 ids, found \"101 102\""
        );

        assert!(read_merges_txt::<u32, _>("101 x 260\n".as_bytes()).is_err());
        assert!(read_merges_txt::<u32, _>("101 102 260 7\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_rejects_out_of_order_rules() {
        let err = read_merges_txt::<u32, _>("101 102 261\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BpeError::VocabConflict(_)));
    }
}
