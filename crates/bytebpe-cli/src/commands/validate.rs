use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use bytebpe::Tokenizer;

use crate::{commands::model::ModelArgs, logging::LogArgs};

const RULE: &str = "================================================================================";

const BASIC_CASES: &[&str] = &[
    "Hello, world!",
    "The quick brown fox jumps over the lazy dog.",
    "I don't think so...",
    "This is a test of the tokenizer.",
    "Multiple sentences. Like this one. And this one!",
    "Numbers: 1234567890",
    "Special chars: !@#$%^&*()_+-=[]{}|;:,.<>?",
];

const EDGE_CASES: &[(&str, &str)] = &[
    ("Empty string", ""),
    ("Single space", " "),
    ("Multiple spaces", "   "),
    ("Single newline", "\n"),
    ("Multiple newlines", "\n\n\n"),
    ("Tab character", "\t"),
    ("Single char", "a"),
    ("Punctuation", "!@#$%^&*()"),
    ("Numbers", "123456789"),
    ("Leading spaces", "   leading spaces"),
    ("Trailing spaces", "trailing spaces   "),
    ("Mid spaces", "mid   dle   spaces"),
];

const UNICODE_CASES: &[(&str, &str)] = &[
    ("ASCII", "Hello, world!"),
    ("Accents", "H\u{e9}llo, w\u{f6}rld!"),
    ("Chinese", "\u{4f60}\u{597d}\u{4e16}\u{754c}"),
    ("Japanese", "\u{3053}\u{3093}\u{306b}\u{3061}\u{306f}"),
    ("Korean", "\u{c548}\u{b155}\u{d558}\u{c138}\u{c694}"),
    ("Russian", "\u{41f}\u{440}\u{438}\u{432}\u{435}\u{442} \u{43c}\u{438}\u{440}"),
    (
        "Arabic",
        "\u{645}\u{631}\u{62d}\u{628}\u{627} \u{628}\u{627}\u{644}\u{639}\u{627}\u{644}\u{645}",
    ),
    ("Emojis", "\u{1f30d}\u{1f30e}\u{1f30f}"),
    ("French", "caf\u{e9}"),
    ("Diaeresis", "na\u{ef}ve"),
];

const CONSISTENCY_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

/// Args for the validate command.
#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Corpus to measure compression on; skipped if absent.
    #[arg(long, default_value = None)]
    corpus: Option<String>,

    /// Characters of the corpus to measure.
    #[arg(long, default_value = "100000")]
    max_chars: usize,

    #[clap(flatten)]
    logging: LogArgs,
}

impl ValidateArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let tokenizer = self.model.load_tokenizer()?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        writeln!(out, "{RULE}\nTOKENIZER VALIDATION SUITE\n{RULE}")?;
        writeln!(out, "Tokenizer path: {}", self.model.model)?;
        writeln!(out, "Vocab size:     {}", tokenizer.vocab_size())?;

        let mut suite = Validator {
            tokenizer: &tokenizer,
            out: &mut out,
        };

        let checks = [
            ("Round-trip", suite.round_trip()?),
            ("Special tokens", suite.special_tokens()?),
            ("Edge cases", suite.edge_cases()?),
            ("Unicode", suite.unicode()?),
            ("Consistency", suite.consistency()?),
        ];

        let compression = match &self.corpus {
            Some(path) if Path::new(path).exists() => {
                let sample = read_prefix(path, self.max_chars)?;
                Some(suite.compression(&sample)?)
            }
            Some(path) => {
                log::warn!("Skipping compression test: corpus not found at {path}");
                None
            }
            None => None,
        };

        writeln!(out, "\n{RULE}\nSUMMARY\n{RULE}")?;
        for (name, passed) in &checks {
            writeln!(out, "  {:<16} {}", format!("{name}:"), pass_fail(*passed))?;
        }
        if let Some(metrics) = &compression {
            writeln!(
                out,
                "  {:<16} {:.2} chars/token ({})",
                "Compression:",
                metrics.chars_per_token(),
                metrics.rating()
            )?;
        }

        let passed = checks.iter().filter(|(_, passed)| *passed).count();
        writeln!(out, "\nOverall: {passed}/{} tests passed", checks.len())?;
        out.flush()?;

        if passed != checks.len() {
            return Err(format!("{} validation tests failed", checks.len() - passed).into());
        }
        Ok(())
    }
}

fn pass_fail(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

/// Read up to `max_chars` characters from the start of a file.
fn read_prefix<P: AsRef<Path>>(
    path: P,
    max_chars: usize,
) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut text = String::new();
    let mut chars = 0;

    let mut line = String::new();
    while chars < max_chars && reader.read_line(&mut line)? > 0 {
        let remaining = max_chars - chars;
        match line.char_indices().nth(remaining) {
            Some((end, _)) => {
                text.push_str(&line[..end]);
                chars = max_chars;
            }
            None => {
                chars += line.chars().count();
                text.push_str(&line);
            }
        }
        line.clear();
    }
    Ok(text)
}

/// Compression quality, by characters per token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionRating {
    Excellent,
    Good,
    Ok,
    Poor,
}

impl CompressionRating {
    pub fn from_chars_per_token(chars_per_token: f64) -> Self {
        if chars_per_token >= 3.5 {
            Self::Excellent
        } else if chars_per_token >= 3.0 {
            Self::Good
        } else if chars_per_token >= 2.0 {
            Self::Ok
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for CompressionRating {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Poor => "poor",
        })
    }
}

/// Compression measured over a corpus sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionMetrics {
    pub num_chars: usize,
    pub num_bytes: usize,
    pub num_tokens: usize,
}

impl CompressionMetrics {
    pub fn measure(
        tokenizer: &Tokenizer,
        text: &str,
    ) -> Self {
        Self {
            num_chars: text.chars().count(),
            num_bytes: text.len(),
            num_tokens: tokenizer.encode(text, false).len(),
        }
    }

    fn ratio(
        &self,
        n: usize,
    ) -> f64 {
        if self.num_tokens == 0 {
            0.0
        } else {
            n as f64 / self.num_tokens as f64
        }
    }

    pub fn chars_per_token(&self) -> f64 {
        self.ratio(self.num_chars)
    }

    pub fn bytes_per_token(&self) -> f64 {
        self.ratio(self.num_bytes)
    }

    pub fn rating(&self) -> CompressionRating {
        CompressionRating::from_chars_per_token(self.chars_per_token())
    }
}

type CheckResult = Result<bool, Box<dyn std::error::Error>>;

struct Validator<'a> {
    tokenizer: &'a Tokenizer,
    out: &'a mut dyn Write,
}

impl Validator<'_> {
    fn header(
        &mut self,
        title: &str,
    ) -> std::io::Result<()> {
        writeln!(self.out, "\n{RULE}\n{title}\n{RULE}")
    }

    fn footer(
        &mut self,
        name: &str,
        passed: bool,
    ) -> std::io::Result<()> {
        writeln!(self.out, "\n{}: {name}", pass_fail(passed))
    }

    /// Display keys for the first few tokens.
    fn token_keys(
        &self,
        tokens: &[u32],
    ) -> Vec<String> {
        tokens
            .iter()
            .take(10)
            .map(|&t| self.tokenizer.id_to_token(t))
            .collect()
    }

    /// Encode and decode `text`; report and return whether it survived.
    fn check_round_trip(
        &mut self,
        label: &str,
        text: &str,
    ) -> CheckResult {
        let tokens = self.tokenizer.encode(text, false);
        let decoded = self.tokenizer.decode(&tokens, true);

        writeln!(self.out, "\n--- {label} ---")?;
        writeln!(self.out, "Input:   {text:?}")?;
        writeln!(self.out, "Tokens:  {} {:?}", tokens.len(), self.token_keys(&tokens))?;
        writeln!(self.out, "Decoded: {decoded:?}")?;

        if decoded == text {
            let ratio = if tokens.is_empty() {
                0.0
            } else {
                text.chars().count() as f64 / tokens.len() as f64
            };
            writeln!(self.out, "PASS ({ratio:.2} chars/token)")?;
            return Ok(true);
        }

        writeln!(
            self.out,
            "FAIL: length {} -> {}",
            text.chars().count(),
            decoded.chars().count()
        )?;
        if let Some((idx, (a, b))) = text
            .chars()
            .zip(decoded.chars())
            .enumerate()
            .find(|(_, (a, b))| a != b)
        {
            writeln!(self.out, "  first diff at {idx}: {a:?} vs {b:?}")?;
        }
        Ok(false)
    }

    fn check_cases<'c, I>(
        &mut self,
        cases: I,
    ) -> CheckResult
    where
        I: IntoIterator<Item = (String, &'c str)>,
    {
        let mut all_passed = true;
        for (label, text) in cases {
            all_passed &= self.check_round_trip(&label, text)?;
        }
        Ok(all_passed)
    }

    fn round_trip(&mut self) -> CheckResult {
        self.header("TEST 1: Round-Trip Encoding/Decoding")?;
        let passed = self.check_cases(
            BASIC_CASES
                .iter()
                .enumerate()
                .map(|(idx, text)| (format!("Case {}", idx + 1), *text)),
        )?;
        self.footer("Round-trip test", passed)?;
        Ok(passed)
    }

    fn special_tokens(&mut self) -> CheckResult {
        self.header("TEST 2: Special Tokens")?;

        let text = "Hello, world!";
        let specials = *self.tokenizer.special_tokens();
        let without = self.tokenizer.encode(text, false);
        let with = self.tokenizer.encode(text, true);

        writeln!(self.out, "Text:             {text:?}")?;
        writeln!(self.out, "Without specials: {without:?}")?;
        writeln!(self.out, "With specials:    {with:?}")?;
        writeln!(
            self.out,
            "<PAD>={} <UNK>={} <BOS>={} <EOS>={}",
            specials.pad, specials.unk, specials.bos, specials.eos
        )?;

        let mut passed = true;

        let wrapped = with.first() == Some(&specials.bos)
            && with.last() == Some(&specials.eos)
            && with[1..with.len() - 1] == without[..];
        writeln!(self.out, "{}: <BOS> and <EOS> wrap the text", pass_fail(wrapped))?;
        passed &= wrapped;

        let kept = self.tokenizer.decode(&with, false);
        let skipped = self.tokenizer.decode(&with, true);
        writeln!(self.out, "Decoded (keep special): {kept:?}")?;
        writeln!(self.out, "Decoded (skip special): {skipped:?}")?;

        let skip_ok = skipped == text;
        writeln!(self.out, "{}: skipping special tokens", pass_fail(skip_ok))?;
        passed &= skip_ok;

        let keep_ok = kept == format!("<BOS>{text}<EOS>");
        writeln!(self.out, "{}: keeping special tokens", pass_fail(keep_ok))?;
        passed &= keep_ok;

        let unk_ok = self.tokenizer.token_to_id("never seen in training") == specials.unk
            && self.tokenizer.id_to_token(specials.unk) == "<UNK>";
        writeln!(self.out, "{}: unknown tokens map to <UNK>", pass_fail(unk_ok))?;
        passed &= unk_ok;

        self.footer("Special tokens test", passed)?;
        Ok(passed)
    }

    fn edge_cases(&mut self) -> CheckResult {
        self.header("TEST 3: Edge Cases")?;
        let passed = self.check_cases(
            EDGE_CASES
                .iter()
                .map(|(name, text)| (name.to_string(), *text)),
        )?;
        self.footer("Edge cases test", passed)?;
        Ok(passed)
    }

    fn unicode(&mut self) -> CheckResult {
        self.header("TEST 4: Unicode Handling")?;
        let passed = self.check_cases(
            UNICODE_CASES
                .iter()
                .map(|(name, text)| (format!("{name} ({} bytes)", text.len()), *text)),
        )?;
        self.footer("Unicode handling test", passed)?;
        Ok(passed)
    }

    fn consistency(&mut self) -> CheckResult {
        self.header("TEST 5: Consistency")?;

        let first = self.tokenizer.encode(CONSISTENCY_TEXT, false);
        writeln!(self.out, "Run 1: {first:?}")?;

        let mut passed = true;
        for run in 2..=5 {
            let tokens = self.tokenizer.encode(CONSISTENCY_TEXT, false);
            writeln!(self.out, "Run {run}: {tokens:?}")?;
            passed &= tokens == first;
        }

        self.footer("Consistency test", passed)?;
        Ok(passed)
    }

    fn compression(
        &mut self,
        sample: &str,
    ) -> Result<CompressionMetrics, Box<dyn std::error::Error>> {
        self.header("TEST 6: Compression Metrics")?;

        let metrics = CompressionMetrics::measure(self.tokenizer, sample);
        writeln!(self.out, "Characters:      {}", metrics.num_chars)?;
        writeln!(self.out, "Bytes (UTF-8):   {}", metrics.num_bytes)?;
        writeln!(self.out, "Tokens:          {}", metrics.num_tokens)?;
        writeln!(self.out, "Chars per token: {:.2}", metrics.chars_per_token())?;
        writeln!(self.out, "Bytes per token: {:.2}", metrics.bytes_per_token())?;
        writeln!(self.out, "Rating:          {}", metrics.rating())?;

        Ok(metrics)
    }
}
