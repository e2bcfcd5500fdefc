use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rs_video_poker::engine::Progress;
use rs_video_poker::pay::PayTable;
use rs_video_poker::strategy::TableCache;
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
pub struct TracingArgs {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl TracingArgs {
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum PayTableArg {
    #[value(name = "jacks-or-better-9-6")]
    JacksOrBetter96,
    #[value(name = "jacks-or-better-9-6-max-coin")]
    JacksOrBetter96MaxCoin,
    #[value(name = "jacks-or-better-8-5")]
    JacksOrBetter85,
    #[value(name = "jacks-or-better-6-5")]
    JacksOrBetter65,
    #[value(name = "double-double-bonus-9-6")]
    DoubleDoubleBonus96,
    DeucesWild,
}

impl PayTableArg {
    pub fn pay_table(self) -> PayTable {
        match self {
            PayTableArg::JacksOrBetter96 => PayTable::jacks_or_better_9_6(),
            PayTableArg::JacksOrBetter96MaxCoin => PayTable::jacks_or_better_9_6_max_coin(),
            PayTableArg::JacksOrBetter85 => PayTable::jacks_or_better_8_5(),
            PayTableArg::JacksOrBetter65 => PayTable::jacks_or_better_6_5(),
            PayTableArg::DoubleDoubleBonus96 => PayTable::double_double_bonus_9_6(),
            PayTableArg::DeucesWild => PayTable::deuces_wild_full_pay(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Directory for cached outcome tables, defaults to VIDEO_POKER_CACHE_DIR or the working directory
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Always build the outcome table and never write it
    #[arg(long)]
    pub no_cache: bool,
}

impl CacheArgs {
    pub fn cache(&self) -> Option<TableCache> {
        if self.no_cache {
            return None;
        }
        Some(match &self.cache_dir {
            Some(dir) => TableCache::new(dir),
            None => TableCache::from_env(),
        })
    }
}

/// Rewrites a percentage on stderr every tenth of a percent.
pub fn progress_printer() -> impl FnMut(Progress) {
    let mut shown = 0;
    move |p: Progress| {
        let permille = (p.fraction() * 1000.0) as u64;
        if permille > shown || p.processed == p.target {
            shown = permille;
            eprint!("{:.1}%\r", p.fraction() * 100.0);
            let _ = std::io::stderr().flush();
        }
    }
}
