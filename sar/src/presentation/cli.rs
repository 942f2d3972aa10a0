use clap::{ArgGroup, Args, Parser, Subcommand};
use sar_core::DEFAULT_KEY;
use sar_core::codec::CodecId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sar",
    author,
    version,
    about = "Secure archive: build and search compressed, encrypted file archives",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Root directory of the default filesystem (paths without a *_local flag)
    #[arg(long = "fs-root", env = "SAR_FS_ROOT", default_value = ".", global = true)]
    pub fs_root: PathBuf,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Archive every file of a directory into a fresh container
    Build(BuildArgs),

    /// Extract records matching a file name and/or a content keyword
    Search(SearchArgs),

    /// List archive records without decoding them
    List {
        /// Archive directory or container file
        #[arg(long = "in_path")]
        in_path: PathBuf,

        /// The input path is on the local filesystem
        #[arg(long = "in_path_local")]
        in_path_local: bool,
    },
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Input directory with files
    #[arg(long = "in_path")]
    pub in_path: PathBuf,

    /// The input path is on the local filesystem
    #[arg(long = "in_path_local")]
    pub in_path_local: bool,

    /// Output directory; deleted first if it exists
    #[arg(long = "out_path")]
    pub out_path: PathBuf,

    /// The output path is on the local filesystem
    #[arg(long = "out_path_local")]
    pub out_path_local: bool,

    /// Password used to encrypt files
    #[arg(long, default_value = DEFAULT_KEY)]
    pub key: String,

    /// Compress each file before encryption
    #[arg(long)]
    pub compress: bool,

    /// Encrypt each file
    #[arg(long)]
    pub encrypt: bool,

    /// Compression codec (gzip is readable by legacy tools)
    #[arg(long, default_value = "gzip")]
    pub codec: CodecId,

    /// Random per-record IV kept in the salt field; legacy tools cannot read such records
    #[arg(long = "random-iv")]
    pub random_iv: bool,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Write a JSON job report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("filter")
        .required(true)
        .multiple(true)
        .args(["search_file", "search_keyword"])
))]
pub struct SearchArgs {
    /// Archive directory or container file
    #[arg(long = "in_path")]
    pub in_path: PathBuf,

    /// The input path is on the local filesystem
    #[arg(long = "in_path_local")]
    pub in_path_local: bool,

    /// Directory for extracted files
    #[arg(long = "out_path")]
    pub out_path: PathBuf,

    /// The output path is on the local filesystem
    #[arg(long = "out_path_local")]
    pub out_path_local: bool,

    /// Password the archive was built with
    #[arg(long, default_value = DEFAULT_KEY)]
    pub key: String,

    /// Search for the file <filename> (case sensitive)
    #[arg(long = "search_file")]
    pub search_file: Option<String>,

    /// Search for the keyword <keyword> (case sensitive)
    #[arg(long = "search_keyword")]
    pub search_keyword: Option<String>,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Write a JSON job report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}
