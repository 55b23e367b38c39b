use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "hostpulse", version, about = "Host and container metrics with threshold alerting")]
pub struct Args {
    #[arg(short, long, help = "Path to the YAML configuration file (defaults apply when omitted)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Validate the configuration and exit")]
    pub check: bool,
}
