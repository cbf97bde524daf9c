use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "apimctl")]
#[command(about = "Test APIs behind API Management with OAuth authentication")]
pub struct Cli {
    /// HTTP method to use (GET, POST, PUT, DELETE)
    #[arg(long, default_value = "GET")]
    pub method: String,

    /// JSON payload as a string (for POST/PUT requests)
    #[arg(long)]
    pub payload: Option<String>,

    /// Path to a JSON payload file (for POST/PUT requests); wins over --payload
    #[arg(long)]
    pub payload_file: Option<PathBuf>,

    /// API endpoint URL to test [default: $APIM_ENDPOINT]
    #[arg(long)]
    pub endpoint: Option<String>,
}
