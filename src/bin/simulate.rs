mod common;

use std::error::Error;

use clap::{Parser, ValueEnum};
use rs_video_poker::engine::{EngineConfig, Simulator, SimulatorStatistics, default_worker_count};
use rs_video_poker::game::MultiplierTable;
use rs_video_poker::pay::{JudgeRegistry, PayCalculator};
use rs_video_poker::strategy::{ForeknowledgeHoldSelector, HoldSelector, OptimalHoldSelector};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SelectorArg {
    /// Best expected value drawing from the cards that were not dealt
    Optimal,
    /// Best expected value as if the discards went back into the deck
    IgnoreDiscards,
    /// Knows the order of the deck
    Foreknowledge,
}

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    about = "Monte carlo simulation of video poker sessions",
    long_about = "Plays random games with a hold strategy and reports hits and return \
                  to player per pay title, for the main hand and every sub hand."
)]
struct Args {
    #[command(flatten)]
    tracing: common::TracingArgs,

    #[command(flatten)]
    cache: common::CacheArgs,

    /// Pay table to play
    #[arg(short, long, value_enum, default_value_t = common::PayTableArg::JacksOrBetter96)]
    pay_table: common::PayTableArg,

    /// How holds are chosen
    #[arg(short, long, value_enum, default_value_t = SelectorArg::Optimal)]
    selector: SelectorArg,

    /// Number of games
    #[arg(short = 'n', long, default_value_t = 10_000_000)]
    trials: u64,

    /// Extra lines dealt from the held cards of every game
    #[arg(long, default_value_t = 0)]
    sub_hands: usize,

    /// Carry Ultimate X streak multipliers between games
    #[arg(long)]
    ultimate_x: bool,

    /// Seed for repeatable runs
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads
    #[arg(short, long, default_value_t = default_worker_count())]
    workers: usize,
}

fn simulate<S: HoldSelector + Sync>(
    args: &Args,
    calc: PayCalculator,
    selector: S,
) -> Result<SimulatorStatistics, Box<dyn Error>> {
    let mut config = EngineConfig::default().with_workers(args.workers);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut simulator = Simulator::new(calc, selector)
        .with_sub_hands(args.sub_hands)
        .with_config(config);
    if args.ultimate_x {
        simulator = simulator.with_multipliers(MultiplierTable::ultimate_x_jacks_or_better_6_5());
    }
    let stats = simulator.run_parallel(args.trials, common::progress_printer())?;
    eprintln!();
    Ok(stats)
}

fn print_statistics(stats: &SimulatorStatistics) -> Result<(), Box<dyn Error>> {
    println!("Raw values:");
    println!("{}", serde_json::to_string_pretty(stats)?);
    println!("-------------------------------");
    println!("Main hand:");
    for title in stats.main_pay_statistics.keys() {
        println!("RTP({title}): {:.6}", stats.title_rtp(*title));
    }
    println!("-> RTP: {:.6}", stats.main_rtp());
    for i in 0..stats.sub_hand_count() {
        println!("-------------------------------");
        println!("Sub hand #{}:", i + 1);
        println!("-> RTP: {:.6}", stats.sub_rtp(i).unwrap_or_default());
    }
    println!("-------------------------------");
    println!("Total RTP: {:.6}", stats.total_rtp());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    args.tracing.init_tracing();

    let calc = PayCalculator::new(args.pay_table.pay_table(), &JudgeRegistry::standard())?;
    let stats = match args.selector {
        SelectorArg::Optimal => {
            let selector = OptimalHoldSelector::from_calculator(&calc, args.cache.cache().as_ref());
            simulate(&args, calc, selector)?
        }
        SelectorArg::IgnoreDiscards => {
            let selector = OptimalHoldSelector::from_calculator(&calc, args.cache.cache().as_ref())
                .ignoring_discards();
            simulate(&args, calc, selector)?
        }
        SelectorArg::Foreknowledge => {
            let selector = ForeknowledgeHoldSelector::new(calc.clone());
            simulate(&args, calc, selector)?
        }
    };
    print_statistics(&stats)
}
