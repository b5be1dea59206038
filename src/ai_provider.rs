use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum AiProvider {
    /// Anthropic Messages API（APIキーが必要）
    #[default]
    Api,
    /// ローカルの claude CLI
    Claude,
}

impl AiProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::Api => "api",
            AiProvider::Claude => "claude",
        }
    }
}
