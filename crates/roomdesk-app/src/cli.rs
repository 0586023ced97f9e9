use clap::Parser;

/// Roomdesk: desktop control plane for the meeting-room shell.
#[derive(Parser, Debug)]
#[command(name = "roomdesk", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Running from an installed package rather than a development checkout.
    #[arg(long)]
    pub packaged: bool,

    /// Raw launch arguments forwarded by the host; scanned for a deep link.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Args {
    /// Launch arguments as the process saw them: executable first.
    pub fn launch_args(&self) -> Vec<String> {
        let exe = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "roomdesk".to_string());
        std::iter::once(exe).chain(self.args.iter().cloned()).collect()
    }
}

pub fn parse() -> Args {
    Args::parse()
}
