use std::path::{Path, PathBuf};

use sar_core::crypto::legacy::IvMode;
use sar_core::error::Result;
use sar_core::{
    BuildConfig, JobReport, Location, SealOptions, SearchConfig, SearchQuery, list, run_build,
    run_search,
};

use crate::presentation::cli::{BuildArgs, SearchArgs};

fn finish(report: JobReport, report_path: Option<PathBuf>) -> Result<bool> {
    if let Some(p) = report_path {
        report.write_json(&p)?;
    }
    Ok(report.success)
}

pub fn handle_build(args: BuildArgs, fs_root: &Path) -> Result<bool> {
    let cfg = BuildConfig {
        input: Location::new(args.in_path, args.in_path_local),
        output: Location::new(args.out_path, args.out_path_local),
        seal: SealOptions {
            compress: args.compress,
            encrypt: args.encrypt,
            password: args.key,
            codec: args.codec,
            iv_mode: if args.random_iv {
                IvMode::Random
            } else {
                IvMode::Zero
            },
        },
        workers: args.workers,
        fs_root: fs_root.to_path_buf(),
    };
    finish(run_build(&cfg)?, args.report)
}

pub fn handle_search(args: SearchArgs, fs_root: &Path) -> Result<bool> {
    let query = SearchQuery::new(args.search_file, args.search_keyword)?;
    let cfg = SearchConfig {
        input: Location::new(args.in_path, args.in_path_local),
        output: Location::new(args.out_path, args.out_path_local),
        password: args.key,
        query,
        workers: args.workers,
        fs_root: fs_root.to_path_buf(),
    };
    finish(run_search(&cfg)?, args.report)
}

pub fn handle_list(in_path: PathBuf, in_path_local: bool, fs_root: &Path) -> Result<bool> {
    let loc = Location::new(in_path, in_path_local);
    let storage = loc.storage(fs_root);
    list(storage.as_ref(), &loc.path, std::io::stdout().lock())?;
    Ok(true)
}
