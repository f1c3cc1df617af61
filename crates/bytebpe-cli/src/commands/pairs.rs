use std::{
    fs::File,
    io::{BufReader, Write},
};

use bytebpe::{
    training::{BpeTrainer, BpeTrainerOptions},
    vocab::{TokenVocab, io::vocab_json::token_string},
};

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the pairs command.
#[derive(clap::Args, Debug)]
pub struct PairsArgs {
    /// Corpus text file.
    #[arg(long)]
    corpus: String,

    /// Read at most this many corpus lines.
    #[arg(long, default_value = None)]
    max_lines: Option<usize>,

    /// Number of pairs to show.
    #[arg(long, default_value = "20")]
    top: usize,

    #[command(flatten)]
    output: OutputArgs,

    #[clap(flatten)]
    logging: LogArgs,
}

impl PairsArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(2)?;

        let options = BpeTrainerOptions::new(0).with_max_lines(self.max_lines);
        let mut trainer: BpeTrainer = options.init()?;
        let (lines, chunks) = trainer.update_from_reader(BufReader::new(File::open(&self.corpus)?))?;
        log::info!("Read {lines} lines, {chunks} chunks");

        let vocab: TokenVocab<u32> = TokenVocab::new()?;
        let mut writer = self.output.open_writer()?;
        for (rank, ((a, b), count)) in trainer.top_pairs::<u32>(self.top)?.into_iter().enumerate() {
            writeln!(
                writer,
                "{:>4} {count:>12}  {a:>3} {b:>3}  {:?}",
                rank + 1,
                format!(
                    "{}{}",
                    token_string(&vocab, a).unwrap_or_default(),
                    token_string(&vocab, b).unwrap_or_default()
                ),
            )?;
        }
        writer.flush()?;
        Ok(())
    }
}
