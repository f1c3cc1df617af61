use std::io::{BufRead, Write};

use bytebpe::Tokenizer;

use crate::{
    commands::model::ModelArgs,
    input_output::{InputArgs, OutputArgs},
    logging::LogArgs,
};

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Wrap each line in <BOS> ... <EOS>.
    #[arg(long)]
    special: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl EncodeArgs {
    /// Run the encode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;
        let tokenizer = self.model.load_tokenizer()?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        run_encode(&mut reader, &mut writer, &tokenizer, self.special)
    }
}

/// Args for the decode command.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Keep <PAD> <UNK> <BOS> <EOS> in the output.
    #[arg(long)]
    keep_special: bool,

    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl DecodeArgs {
    /// Run the decode command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;
        let tokenizer = self.model.load_tokenizer()?;

        let mut reader = self.input.open_reader()?;
        let mut writer = self.output.open_writer()?;
        run_decode(&mut reader, &mut writer, &tokenizer, !self.keep_special)
    }
}

fn run_encode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &Tokenizer,
    add_special_tokens: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Read lines, but keep the end-of-line characters.
    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        let tokens = tokenizer.encode(&line, add_special_tokens);

        for (idx, token) in tokens.iter().enumerate() {
            write!(writer, "{}{}", if idx == 0 { "" } else { " " }, token)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        line.clear();
    }
    Ok(())
}

fn run_decode(
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
    tokenizer: &Tokenizer,
    skip_special_tokens: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for (idx, line) in reader.lines().enumerate() {
        let tokens = line?
            .split_whitespace()
            .map(|s| s.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("line {}: {e}", idx + 1))?;

        write!(writer, "{}", tokenizer.decode(&tokens, skip_special_tokens))?;
        writer.flush()?;
    }
    Ok(())
}
