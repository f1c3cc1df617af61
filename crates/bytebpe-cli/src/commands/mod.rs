mod cat;
mod model;
mod pairs;
mod train;
mod validate;

/// Subcommands for bytebpe
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Train a new model from a text corpus.
    Train(train::TrainArgs),

    /// Encode text lines to space separated token ids.
    Encode(cat::EncodeArgs),

    /// Decode space separated token id lines back to text.
    Decode(cat::DecodeArgs),

    /// Run the validation suite against a saved model.
    Validate(validate::ValidateArgs),

    /// Show the most frequent byte pairs of a corpus.
    Pairs(pairs::PairsArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Train(cmd) => cmd.run(),
            Commands::Encode(cmd) => cmd.run(),
            Commands::Decode(cmd) => cmd.run(),
            Commands::Validate(cmd) => cmd.run(),
            Commands::Pairs(cmd) => cmd.run(),
        }
    }
}
