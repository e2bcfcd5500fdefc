mod common;

use std::error::Error;

use clap::Parser;
use rs_video_poker::engine::{EngineConfig, RtpCalculator, default_worker_count};
use rs_video_poker::pay::{JudgeRegistry, PayCalculator};
use rs_video_poker::strategy::OptimalHoldSelector;

#[derive(Parser, Debug)]
#[command(
    name = "calculate_rtp",
    about = "Exact return to player of a video poker pay table",
    long_about = "Plays every one of the 2,598,960 possible deals with the hold that has \
                  the best expected value and reports how often each pay title is hit."
)]
struct Args {
    #[command(flatten)]
    tracing: common::TracingArgs,

    #[command(flatten)]
    cache: common::CacheArgs,

    /// Pay table to evaluate
    #[arg(short, long, value_enum, default_value_t = common::PayTableArg::JacksOrBetter96)]
    pay_table: common::PayTableArg,

    /// Worker threads
    #[arg(short, long, default_value_t = default_worker_count())]
    workers: usize,

    /// Print the merged statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    args.tracing.init_tracing();

    let pay_table = args.pay_table.pay_table();
    let calc = PayCalculator::new(pay_table.clone(), &JudgeRegistry::standard())?;
    let selector = OptimalHoldSelector::from_calculator(&calc, args.cache.cache().as_ref());
    let calculator =
        RtpCalculator::new(selector).with_config(EngineConfig::default().with_workers(args.workers));

    let result = calculator.calculate(common::progress_printer())?;
    eprintln!();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        println!("-----------------------------");
    }
    for row in result.breakdown(&pay_table) {
        println!("[{}]", row.title);
        println!("    Frequency: 1 for {:.2}", row.frequency);
        println!("    Probability: {:.8}", row.probability);
        println!("    Pay: {}", row.pay);
        println!("    RTP: {:.8}", row.rtp);
    }
    println!("Total RTP: {:.6}", result.total_rtp());
    Ok(())
}
