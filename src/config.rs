use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    /// API key for the generative search service.
    #[clap(env, long)]
    pub gemini_api_key: String,

    #[clap(env, long, default_value = "gemini-2.5-flash")]
    pub gemini_model: String,

    #[clap(env, long, default_value = "https://generativelanguage.googleapis.com/v1beta")]
    pub gemini_api_url: String,
}

impl Config {
    /// Reads the configuration from the environment only, for hosts that
    /// have no command line of their own.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse_from(["resto-finder-core"])
    }
}
