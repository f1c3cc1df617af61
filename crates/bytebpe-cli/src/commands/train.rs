use bytebpe::training::{BpeTrainerOptions, TrainingStop, train_with_options};

use crate::logging::LogArgs;

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Corpus text file.
    #[arg(long)]
    corpus: String,

    /// Target vocab size, including the 260 reserved and byte tokens.
    #[arg(long, default_value = "10000")]
    vocab_size: usize,

    /// Directory to save the model to.
    #[arg(long, default_value = "saved")]
    save_dir: String,

    /// Read at most this many corpus lines.
    #[arg(long, default_value = None)]
    max_lines: Option<usize>,

    /// Pair counting threads; 0 uses all cores.
    #[arg(long, default_value = "0")]
    threads: usize,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl TrainArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let options = BpeTrainerOptions::new(self.vocab_size)
            .with_max_lines(self.max_lines)
            .with_num_threads(self.threads);

        let summary = train_with_options(&self.corpus, &self.save_dir, options)?;

        match summary.stop {
            TrainingStop::TargetReached => {}
            stop => log::warn!("Training stopped early: {stop:?}"),
        }
        log::info!(
            "Vocabulary size: {} ({} merges), saved to {}",
            summary.vocab_size,
            summary.num_merges,
            self.save_dir
        );

        Ok(())
    }
}
