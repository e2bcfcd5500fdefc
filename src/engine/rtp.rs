use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::core::{Card, CardIter, DECK_SIZE, HAND_SIZE, binomial};
use crate::pay::{PayTable, PayTitle};
use crate::strategy::OptimalHoldSelector;

use super::{
    EngineConfig, EngineError, Progress, WorkerContext, WorkerError, run_partitioned, split_range,
};

/// Every five card hand a deck can deal.
pub fn hand_count() -> u64 {
    binomial(DECK_SIZE, HAND_SIZE) as u64
}

/// Title frequencies under optimal play. Every dealt hand adds one to
/// `case_count` and spreads a total weight of one over the titles its best
/// hold can end in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RtpStatistics {
    pub case_count: u64,
    pub result: BTreeMap<PayTitle, f64>,
}

/// Exhaustive return to player, or the part of it one worker computed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RtpResult {
    pub hand_count: u64,
    pub expected_value_sum: f64,
    pub statistics: RtpStatistics,
}

/// One line of an RTP report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RtpBreakdown {
    pub title: PayTitle,
    /// One hit in this many hands. Infinite when the title never happens.
    pub frequency: f64,
    pub probability: f64,
    pub pay: u32,
    /// This title's share of the return.
    pub rtp: f64,
}

impl RtpResult {
    fn empty(pay_table: &PayTable) -> Self {
        Self {
            statistics: RtpStatistics {
                case_count: 0,
                result: pay_table.titles().map(|t| (t, 0.0)).collect(),
            },
            ..Self::default()
        }
    }

    /// Average expected value of the best hold over every hand.
    pub fn total_rtp(&self) -> f64 {
        if self.hand_count == 0 {
            return 0.0;
        }
        self.expected_value_sum / self.hand_count as f64
    }

    /// Per title figures in pay table order.
    pub fn breakdown(&self, pay_table: &PayTable) -> Vec<RtpBreakdown> {
        let cases = self.statistics.case_count as f64;
        pay_table
            .entries()
            .iter()
            .map(|entry| {
                let hits = self
                    .statistics
                    .result
                    .get(&entry.title)
                    .copied()
                    .unwrap_or_default();
                let (probability, frequency) = if hits > 0.0 {
                    (hits / cases, cases / hits)
                } else {
                    (0.0, f64::INFINITY)
                };
                RtpBreakdown {
                    title: entry.title,
                    frequency,
                    probability,
                    pay: entry.payout,
                    rtp: probability * f64::from(entry.payout),
                }
            })
            .collect()
    }
}

/// Plays every possible deal with the optimal hold.
#[derive(Debug, Clone)]
pub struct RtpCalculator {
    selector: OptimalHoldSelector,
    config: EngineConfig,
}

impl RtpCalculator {
    pub fn new(selector: OptimalHoldSelector) -> Self {
        Self {
            selector,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Play the hands at positions `range` of the enumeration on this
    /// thread.
    pub fn calculate_range(&self, range: Range<u64>) -> RtpResult {
        let mut result = RtpResult::empty(self.selector.pay_table());
        for hand in CardIter::all_hands()
            .skip(range.start as usize)
            .take((range.end - range.start) as usize)
        {
            self.add_hand(&mut result, &hand);
        }
        result
    }

    fn add_hand(&self, result: &mut RtpResult, hand: &[Card]) {
        let best = self.selector.best_hold(hand);
        let cases = best.outcome.case_count as f64;
        for (title, weight) in result.statistics.result.iter_mut() {
            *weight += best.outcome.count(*title) as f64 / cases;
        }
        result.statistics.case_count += 1;
        result.expected_value_sum += best.expected_value;
        result.hand_count += 1;
    }

    fn calculate_partition(
        &self,
        context: &WorkerContext<'_>,
        range: Range<u64>,
    ) -> Result<RtpResult, WorkerError> {
        let mut result = RtpResult::empty(self.selector.pay_table());
        let hands = CardIter::all_hands()
            .skip(range.start as usize)
            .take((range.end - range.start) as usize);
        for (done, hand) in hands.enumerate() {
            self.add_hand(&mut result, &hand);
            context.tick(done as u64 + 1)?;
        }
        Ok(result)
    }

    /// Play the hands at positions `range` split over the configured
    /// workers.
    pub fn calculate_hands<P>(&self, range: Range<u64>, on_progress: P) -> Result<RtpResult, EngineError>
    where
        P: FnMut(Progress),
    {
        let len = range.end.saturating_sub(range.start);
        let jobs: Vec<(u64, Range<u64>)> = split_range(len, self.config.workers)
            .into_iter()
            .map(|r| (r.end - r.start, range.start + r.start..range.start + r.end))
            .collect();
        event!(Level::DEBUG, ?jobs, "rtp partitions");
        run_partitioned(
            &self.config,
            jobs,
            |context, job| self.calculate_partition(context, job),
            on_progress,
        )
    }

    /// The exact return to player of the pay table under optimal play.
    ///
    /// Published returns pay the royal at the five coin rate. With the one
    /// coin royal of `jacks_or_better_9_6` the same game returns 0.983735.
    ///
    /// ```no_run
    /// use rs_video_poker::engine::RtpCalculator;
    /// use rs_video_poker::pay::{JudgeRegistry, PayCalculator, PayTable};
    /// use rs_video_poker::strategy::{OptimalHoldSelector, TableCache};
    ///
    /// let pay_table = PayTable::jacks_or_better_9_6_max_coin();
    /// let calc = PayCalculator::new(pay_table, &JudgeRegistry::standard()).unwrap();
    /// let selector = OptimalHoldSelector::from_calculator(&calc, Some(&TableCache::from_env()));
    /// let result = RtpCalculator::new(selector).calculate(|_| {}).unwrap();
    /// assert!((result.total_rtp() - 0.995439).abs() < 1e-6);
    /// ```
    pub fn calculate<P>(&self, on_progress: P) -> Result<RtpResult, EngineError>
    where
        P: FnMut(Progress),
    {
        self.calculate_hands(0..hand_count(), on_progress)
    }
}
