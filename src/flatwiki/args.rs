use clap::Parser;
use std::path::PathBuf;
use std::sync::OnceLock;

fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "flatwiki", bin_name = "flatwiki", version = get_version())]
#[command(about = "A small wiki served from a directory of flat files", long_about = None)]
pub struct Cli {
    /// JSON configuration file (defaults apply when it does not exist)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the page records
    #[arg(short, long, value_name = "DIR")]
    pub storage: Option<PathBuf>,

    /// Directory whose html/ folder overrides the built-in templates
    #[arg(long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, value_name = "HOST:PORT")]
    pub addr: Option<String>,

    /// Number of request handler threads
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
