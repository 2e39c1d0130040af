use clap::Args;

#[derive(Args)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "CHECKLIST_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,
    /// Smartsheet API token the backend uses on your behalf
    #[arg(long, env = "SMARTSHEET_TOKEN", hide_env_values = true)]
    pub(crate) smartsheet_token: String,
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "CHECKLIST_PASSWORD", hide_env_values = true)]
    pub(crate) password: String,
}

#[derive(Args)]
pub(crate) struct WhoamiArgs {
    /// Emit JSON
    #[arg(long)]
    pub(crate) json: bool,
}
