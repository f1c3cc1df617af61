//! # Merge Rules ``{ (T, T) -> T }``
//!
//! The ordered list of learned merges. A rule's position is its priority:
//! earlier rules were learned first, and are applied first when encoding.

use crate::{
    errors::{BpeError, BpeResult},
    types::{CommonHashMap, Pair, TokenType, token_to_usize},
    vocab::{TokenVocab, specials::BASE_VOCAB_SIZE},
};

/// A single learned merge: ``pair -> token``.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule<T: TokenType> {
    /// The adjacent ``(left, right)`` pair.
    pub pair: Pair<T>,

    /// The token the pair merges into.
    pub token: T,
}

impl<T: TokenType> MergeRule<T> {
    /// Create a new rule.
    pub fn new(
        pair: Pair<T>,
        token: T,
    ) -> Self {
        Self { pair, token }
    }

    /// Replace every non-overlapping occurrence of the pair, scanning left to right.
    ///
    /// Compacts `tokens` in place, starting the scan at `start`.
    ///
    /// ## Returns
    /// The number of replacements made.
    pub fn apply(
        &self,
        tokens: &mut Vec<T>,
        start: usize,
    ) -> usize {
        let (a, b) = self.pair;
        let n = tokens.len();
        if n < 2 || start + 1 >= n {
            return 0;
        }

        let mut write = start;
        let mut read = start;
        let mut count = 0;
        while read < n {
            if read + 1 < n && tokens[read] == a && tokens[read + 1] == b {
                tokens[write] = self.token;
                read += 2;
                count += 1;
            } else {
                tokens[write] = tokens[read];
                read += 1;
            }
            write += 1;
        }
        tokens.truncate(write);
        count
    }
}

/// The ordered merge rule list, with a ``pair -> rank`` lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeRules<T: TokenType> {
    rules: Vec<MergeRule<T>>,
    ranks: CommonHashMap<Pair<T>, usize>,
}

impl<T: TokenType> MergeRules<T> {
    /// Create an empty rule list.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            ranks: CommonHashMap::new(),
        }
    }

    /// Build a rule list, validating each rule in order.
    pub fn from_rules<I>(rules: I) -> BpeResult<Self>
    where
        I: IntoIterator<Item = MergeRule<T>>,
    {
        let mut merges = Self::new();
        for rule in rules {
            merges.push(rule)?;
        }
        Ok(merges)
    }

    /// Append the next (lowest priority) rule.
    ///
    /// ## Returns
    /// [`BpeError::VocabConflict`] unless:
    /// * ``rule.token == 260 + self.len()``,
    /// * the token is greater than both parents,
    /// * the pair has no rule yet.
    pub fn push(
        &mut self,
        rule: MergeRule<T>,
    ) -> BpeResult<()> {
        let expected = BASE_VOCAB_SIZE + self.rules.len();
        let token = token_to_usize(rule.token);
        let (a, b) = rule.pair;

        if token != expected {
            return Err(BpeError::VocabConflict(format!(
                "merge rule {} -> {token}: expected new token {expected}",
                fmt_pair(rule.pair),
            )));
        }
        if token <= token_to_usize(a) || token <= token_to_usize(b) {
            return Err(BpeError::VocabConflict(format!(
                "merge rule {} -> {token}: new token must follow both parents",
                fmt_pair(rule.pair),
            )));
        }
        if let Some(&rank) = self.ranks.get(&rule.pair) {
            return Err(BpeError::VocabConflict(format!(
                "merge rule {} -> {token}: pair already merged by rule {rank}",
                fmt_pair(rule.pair),
            )));
        }

        self.ranks.insert(rule.pair, self.rules.len());
        self.rules.push(rule);
        Ok(())
    }

    /// The number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Are there no rules?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rules, in priority order.
    pub fn rules(&self) -> &[MergeRule<T>] {
        &self.rules
    }

    /// Iterate over the rules in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule<T>> + '_ {
        self.rules.iter()
    }

    /// The priority rank of `pair`, if it has a rule.
    #[inline(always)]
    pub fn rank(
        &self,
        pair: &Pair<T>,
    ) -> Option<usize> {
        self.ranks.get(pair).copied()
    }

    /// The ``(rank, rule)`` of `pair`, if it has a rule.
    #[inline(always)]
    pub fn lookup(
        &self,
        pair: &Pair<T>,
    ) -> Option<(usize, &MergeRule<T>)> {
        self.rank(pair).map(|rank| (rank, &self.rules[rank]))
    }

    /// Check these rules against the vocabulary they were learned with.
    ///
    /// Every learned token must have exactly one rule, and its payload
    /// must be the concatenation of its parents' payloads.
    pub fn check_vocab(
        &self,
        vocab: &TokenVocab<T>,
    ) -> BpeResult<()> {
        if self.len() != vocab.num_learned() {
            return Err(BpeError::VocabConflict(format!(
                "{} merge rules for {} learned tokens",
                self.len(),
                vocab.num_learned()
            )));
        }

        for rule in &self.rules {
            let (a, b) = rule.pair;
            let (Some(left), Some(right), Some(merged)) = (
                vocab.payload_for(a),
                vocab.payload_for(b),
                vocab.payload_for(rule.token),
            ) else {
                return Err(BpeError::VocabConflict(format!(
                    "merge rule {} -> {}: undefined token",
                    fmt_pair(rule.pair),
                    rule.token
                )));
            };

            if vocab.is_special(a)
                || vocab.is_special(b)
                || merged.len() != left.len() + right.len()
                || !merged.starts_with(left)
                || !merged.ends_with(right)
            {
                return Err(BpeError::VocabConflict(format!(
                    "merge rule {} -> {}: payload mismatch",
                    fmt_pair(rule.pair),
                    rule.token
                )));
            }
        }
        Ok(())
    }
}

fn fmt_pair<T: TokenType>((a, b): Pair<T>) -> String {
    format!("({a}, {b})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let rule: MergeRule<u32> = MergeRule::new((1, 2), 9);

        let mut tokens = vec![1, 2, 3, 1, 2, 2, 1];
        assert_eq!(rule.apply(&mut tokens, 0), 2);
        assert_eq!(tokens, vec![9, 3, 9, 2, 1]);

        let mut tokens = vec![1, 2, 1, 2];
        assert_eq!(rule.apply(&mut tokens, 1), 1);
        assert_eq!(tokens, vec![1, 2, 9]);

        let mut tokens = vec![1];
        assert_eq!(rule.apply(&mut tokens, 0), 0);
        assert_eq!(tokens, vec![1]);
    }

    #[test]
    fn test_apply_is_non_overlapping() {
        let rule: MergeRule<u32> = MergeRule::new((5, 5), 9);
        let mut tokens = vec![5, 5, 5];
        assert_eq!(rule.apply(&mut tokens, 0), 1);
        assert_eq!(tokens, vec![9, 5]);

        let mut tokens = vec![5, 5, 5, 5];
        assert_eq!(rule.apply(&mut tokens, 0), 2);
        assert_eq!(tokens, vec![9, 9]);
    }

    #[test]
    fn test_push_and_lookup() {
        let mut merges: MergeRules<u32> = MergeRules::new();
        assert!(merges.is_empty());

        merges.push(MergeRule::new((101, 102), 260)).unwrap();
        merges.push(MergeRule::new((260, 103), 261)).unwrap();

        assert_eq!(merges.len(), 2);
        assert_eq!(merges.rank(&(101, 102)), Some(0));
        assert_eq!(merges.rank(&(260, 103)), Some(1));
        assert_eq!(merges.rank(&(103, 260)), None);
        assert_eq!(
            merges.lookup(&(260, 103)),
            Some((1, &MergeRule::new((260, 103), 261)))
        );
        assert_eq!(
            merges.iter().map(|r| r.token).collect::<Vec<_>>(),
            vec![260, 261]
        );
    }

    #[test]
    fn test_push_rejects_bad_rules() {
        let mut merges: MergeRules<u32> = MergeRules::new();

        // Wrong token.
        assert!(merges.push(MergeRule::new((101, 102), 300)).is_err());

        // Parent not before the new token.
        assert!(merges.push(MergeRule::new((101, 260), 260)).is_err());

        merges.push(MergeRule::new((101, 102), 260)).unwrap();

        // Duplicate pair.
        let err = merges.push(MergeRule::new((101, 102), 261)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "merge rule (101, 102) -> 261: pair already merged by rule 0"
        );

        assert_eq!(merges.len(), 1);
    }

    #[test]
    fn test_from_rules() {
        let merges = MergeRules::<u16>::from_rules([
            MergeRule::new((4, 5), 260),
            MergeRule::new((260, 260), 261),
        ])
        .unwrap();
        assert_eq!(merges.rules().len(), 2);

        assert!(MergeRules::<u16>::from_rules([MergeRule::new((4, 5), 261)]).is_err());
    }

    #[test]
    fn test_check_vocab() {
        let vocab: TokenVocab<u32> =
            TokenVocab::from_learned(vec![b"ab".to_vec(), b"abc".to_vec()]).unwrap();

        let merges = MergeRules::from_rules([
            MergeRule::new((101, 102), 260),
            MergeRule::new((260, 103), 261),
        ])
        .unwrap();
        merges.check_vocab(&vocab).unwrap();

        // Wrong parents for "abc".
        let merges = MergeRules::from_rules([
            MergeRule::new((101, 102), 260),
            MergeRule::new((101, 260), 261),
        ])
        .unwrap();
        assert!(merges.check_vocab(&vocab).is_err());

        // Too few rules.
        let merges = MergeRules::from_rules([MergeRule::new((101, 102), 260)]).unwrap();
        assert!(merges.check_vocab(&vocab).is_err());
    }
}
