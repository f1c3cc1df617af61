use bytebpe::Tokenizer;

/// Saved model selection.
#[derive(clap::Args, Debug)]
pub struct ModelArgs {
    /// Model directory holding vocab.json, merges.txt and config.json.
    #[arg(long, default_value = "saved")]
    pub model: String,
}

impl ModelArgs {
    /// Load the selected tokenizer.
    pub fn load_tokenizer(&self) -> Result<Tokenizer, Box<dyn std::error::Error>> {
        log::info!("Loading tokenizer from {}", self.model);
        let tokenizer = Tokenizer::from_pretrained(&self.model)?;
        log::info!(
            "Loaded {} tokens, {} merge rules",
            tokenizer.vocab_size(),
            tokenizer.merge_rules().len()
        );
        Ok(tokenizer)
    }
}
