//! Server configuration
//!
//! Every option can come from a command-line flag or an environment variable
//! (a `.env` file in the working directory is loaded first by `main`). The
//! parsed [`Args`] are resolved into a plain [`ServerConfig`] which is handed
//! to the store and the router.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Default per-request body limit for photo uploads (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Command-line arguments for survey-server
#[derive(Parser, Debug, Clone)]
#[command(name = "survey-server")]
#[command(about = "Survey answers and photo upload backend")]
#[command(version)]
pub struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    pub port: u16,

    /// Directory holding one `<participantId>.json` per participant
    #[arg(long, default_value = "./storage", env = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Directory holding uploaded photos (defaults to `<data-dir>/uploads`)
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Prefix for returned upload URLs, e.g. `https://example.com`
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Directory containing the prebuilt client bundle
    #[arg(long, default_value = "./client", env = "CLIENT_DIR")]
    pub client_dir: PathBuf,

    /// Maximum body size of a single upload request, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,
}

/// Resolved configuration shared by the store and HTTP handlers
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    /// Empty when upload URLs should be root-relative
    pub base_url: String,
    pub client_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Configuration rooted at `data_dir`, with every other option at its default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            upload_dir: data_dir.join("uploads"),
            data_dir,
            base_url: String::new(),
            client_dir: PathBuf::from("./client"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        let upload_dir = args
            .upload_dir
            .unwrap_or_else(|| args.data_dir.join("uploads"));

        Self {
            listen_addr: SocketAddr::new(args.host, args.port),
            data_dir: args.data_dir,
            upload_dir,
            base_url: normalize_base_url(args.base_url.as_deref()),
            client_dir: args.client_dir,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

/// Trim whitespace and trailing slashes; unset and blank both mean root-relative
fn normalize_base_url(raw: Option<&str>) -> String {
    raw.map(|url| url.trim().trim_end_matches('/').to_string())
        .unwrap_or_default()
}
