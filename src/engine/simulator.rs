use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{Level, event};

use crate::game::{GameResult, MultiplierTable, VideoPokerGame};
use crate::pay::{HandResult, PayCalculator, PayTable, PayTitle};
use crate::strategy::HoldSelector;

use super::{EngineConfig, EngineError, Progress, WorkerContext, WorkerError, run_partitioned, split_count};

/// Per title hit counts and total pays of a simulated session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulatorStatistics {
    pub trial_count: u64,
    pub main_pay_count_statistics: BTreeMap<PayTitle, u64>,
    pub sub_pay_count_statistics_list: Vec<BTreeMap<PayTitle, u64>>,
    pub main_pay_statistics: BTreeMap<PayTitle, u64>,
    pub sub_pay_statistics_list: Vec<BTreeMap<PayTitle, u64>>,
}

fn zeroed(pay_table: &PayTable) -> BTreeMap<PayTitle, u64> {
    pay_table.titles().map(|t| (t, 0)).collect()
}

fn record_line(counts: &mut BTreeMap<PayTitle, u64>, pays: &mut BTreeMap<PayTitle, u64>, result: &HandResult) {
    if let Some(title) = result.pay_title {
        *counts.entry(title).or_default() += 1;
        *pays.entry(title).or_default() += u64::from(result.pay);
    }
}

fn rtp_of(pays: &BTreeMap<PayTitle, u64>, trials: u64) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    pays.values().sum::<u64>() as f64 / trials as f64
}

impl SimulatorStatistics {
    /// Every title of the pay table starts at zero on every line.
    pub fn new(pay_table: &PayTable, sub_hand_count: usize) -> Self {
        Self {
            trial_count: 0,
            main_pay_count_statistics: zeroed(pay_table),
            sub_pay_count_statistics_list: vec![zeroed(pay_table); sub_hand_count],
            main_pay_statistics: zeroed(pay_table),
            sub_pay_statistics_list: vec![zeroed(pay_table); sub_hand_count],
        }
    }

    pub fn record(&mut self, result: &GameResult) {
        self.trial_count += 1;
        record_line(
            &mut self.main_pay_count_statistics,
            &mut self.main_pay_statistics,
            &result.main,
        );
        let lines = self
            .sub_pay_count_statistics_list
            .iter_mut()
            .zip(self.sub_pay_statistics_list.iter_mut());
        for ((counts, pays), sub) in lines.zip(&result.subs) {
            record_line(counts, pays, sub);
        }
    }

    pub fn sub_hand_count(&self) -> usize {
        self.sub_pay_statistics_list.len()
    }

    /// Return of one title on the main line.
    pub fn title_rtp(&self, title: PayTitle) -> f64 {
        if self.trial_count == 0 {
            return 0.0;
        }
        self.main_pay_statistics.get(&title).copied().unwrap_or_default() as f64
            / self.trial_count as f64
    }

    pub fn main_rtp(&self) -> f64 {
        rtp_of(&self.main_pay_statistics, self.trial_count)
    }

    /// `None` past the last sub hand.
    pub fn sub_rtp(&self, index: usize) -> Option<f64> {
        self.sub_pay_statistics_list
            .get(index)
            .map(|pays| rtp_of(pays, self.trial_count))
    }

    /// Return per coin over every line played.
    pub fn total_rtp(&self) -> f64 {
        let lines = 1 + self.sub_hand_count() as u64;
        let total: u64 = self
            .sub_pay_statistics_list
            .iter()
            .chain(std::iter::once(&self.main_pay_statistics))
            .map(|pays| pays.values().sum::<u64>())
            .sum();
        if self.trial_count == 0 {
            return 0.0;
        }
        total as f64 / (self.trial_count * lines) as f64
    }
}

/// Monte carlo play of many games with a hold selector.
#[derive(Debug, Clone)]
pub struct Simulator<S> {
    calculator: PayCalculator,
    selector: S,
    multipliers: Option<MultiplierTable>,
    sub_hand_count: usize,
    config: EngineConfig,
}

impl<S: HoldSelector> Simulator<S> {
    pub fn new(calculator: PayCalculator, selector: S) -> Self {
        Self {
            calculator,
            selector,
            multipliers: None,
            sub_hand_count: 0,
            config: EngineConfig::default(),
        }
    }

    /// Deal this many extra lines from the held cards of every game.
    pub fn with_sub_hands(mut self, sub_hand_count: usize) -> Self {
        self.sub_hand_count = sub_hand_count;
        self
    }

    pub fn with_multipliers(mut self, multipliers: MultiplierTable) -> Self {
        self.multipliers = Some(multipliers);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    fn new_game(&self) -> VideoPokerGame {
        let game = VideoPokerGame::new(self.calculator.clone());
        match &self.multipliers {
            Some(m) => game.with_multipliers(m.clone()),
            None => game,
        }
    }

    fn play<R: Rng>(&self, game: &mut VideoPokerGame, stats: &mut SimulatorStatistics, rng: &mut R) {
        game.new_game(rng);
        let hold = self.selector.select_hold(game.hand(), game.deck());
        game.discard_and_draw(hold, self.sub_hand_count, rng);
        stats.record(&game.result());
    }

    /// Play `trials` games on this thread.
    pub fn run<R: Rng>(&self, trials: u64, rng: &mut R) -> SimulatorStatistics {
        let mut game = self.new_game();
        let mut stats = SimulatorStatistics::new(self.calculator.pay_table(), self.sub_hand_count);
        for _ in 0..trials {
            self.play(&mut game, &mut stats, rng);
        }
        stats
    }

    fn run_partition(
        &self,
        context: &WorkerContext<'_>,
        trials: u64,
    ) -> Result<SimulatorStatistics, WorkerError> {
        let mut rng = match self.config.worker_seed(context.id()) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut game = self.new_game();
        let mut stats = SimulatorStatistics::new(self.calculator.pay_table(), self.sub_hand_count);
        for done in 1..=trials {
            self.play(&mut game, &mut stats, &mut rng);
            context.tick(done)?;
        }
        Ok(stats)
    }
}

impl<S: HoldSelector + Sync> Simulator<S> {
    /// Play `trials` games split over the configured workers. A seeded
    /// config with the same worker count always gives the same statistics.
    pub fn run_parallel<P>(&self, trials: u64, on_progress: P) -> Result<SimulatorStatistics, EngineError>
    where
        P: FnMut(Progress),
    {
        let jobs: Vec<(u64, u64)> = split_count(trials, self.config.workers)
            .into_iter()
            .map(|n| (n, n))
            .collect();
        event!(Level::DEBUG, ?jobs, sub_hands = self.sub_hand_count, "simulation partitions");
        run_partitioned(
            &self.config,
            jobs,
            |context, n| self.run_partition(context, n),
            on_progress,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use serde_json::json;

    use super::*;
    use crate::engine::merge_values;
    use crate::strategy::ForeknowledgeHoldSelector;
    use crate::test_util::{jacks_or_better_calculator, jacks_or_better_selector};

    fn simulator() -> Simulator<crate::strategy::OptimalHoldSelector> {
        Simulator::new(jacks_or_better_calculator(), jacks_or_better_selector())
    }

    #[test]
    fn test_statistics_start_at_zero() {
        let stats = SimulatorStatistics::new(&PayTable::jacks_or_better_9_6(), 2);
        assert_eq!(9, stats.main_pay_count_statistics.len());
        assert!(stats.main_pay_statistics.values().all(|n| *n == 0));
        assert_eq!(2, stats.sub_hand_count());
        assert_eq!(0.0, stats.total_rtp());
        assert_eq!(None, stats.sub_rtp(2));
    }

    #[test]
    fn test_record_and_rtp() {
        let mut stats = SimulatorStatistics::new(&PayTable::jacks_or_better_9_6(), 1);
        let flush = HandResult {
            pay_title: Some(PayTitle::Flush),
            pay: 6,
        };
        stats.record(&GameResult {
            main: flush,
            subs: vec![HandResult::default()],
        });
        stats.record(&GameResult {
            main: HandResult::default(),
            subs: vec![flush],
        });
        assert_eq!(2, stats.trial_count);
        assert_eq!(Some(&1), stats.main_pay_count_statistics.get(&PayTitle::Flush));
        assert_eq!(3.0, stats.main_rtp());
        assert_eq!(3.0, stats.title_rtp(PayTitle::Flush));
        assert_eq!(Some(3.0), stats.sub_rtp(0));
        assert_eq!(3.0, stats.total_rtp());
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let sim = simulator().with_sub_hands(2);
        let a = sim.run(500, &mut StdRng::seed_from_u64(420));
        let b = sim.run(500, &mut StdRng::seed_from_u64(420));
        assert_eq!(a, b);
        assert_eq!(500, a.trial_count);
        assert_eq!(2, a.sub_hand_count());
    }

    #[test]
    fn test_merged_partials_sum() {
        let sim = simulator().with_sub_hands(1);
        let a = sim.run(300, &mut StdRng::seed_from_u64(1));
        let b = sim.run(200, &mut StdRng::seed_from_u64(2));

        let mut merged = serde_json::to_value(&a).unwrap();
        merge_values(&mut merged, &serde_json::to_value(&b).unwrap()).unwrap();
        let merged: SimulatorStatistics = serde_json::from_value(merged).unwrap();

        assert_eq!(500, merged.trial_count);
        for title in PayTable::jacks_or_better_9_6().titles() {
            assert_eq!(
                a.main_pay_statistics[&title] + b.main_pay_statistics[&title],
                merged.main_pay_statistics[&title]
            );
            assert_eq!(
                a.sub_pay_count_statistics_list[0][&title] + b.sub_pay_count_statistics_list[0][&title],
                merged.sub_pay_count_statistics_list[0][&title]
            );
        }
    }

    #[test]
    fn test_statistics_use_title_names() {
        let stats = SimulatorStatistics::new(&PayTable::jacks_or_better_6_5(), 0);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(json!(0), value["main_pay_statistics"]["ROYAL_STRAIGHT_FLUSH"]);
    }

    #[test_log::test]
    fn test_seeded_parallel_runs_repeat() {
        let config = EngineConfig::default().with_workers(3).with_seed(420);
        let sim = simulator().with_config(config);
        let a = sim.run_parallel(900, |_| {}).unwrap();
        let b = sim.run_parallel(900, |_| {}).unwrap();
        assert_eq!(900, a.trial_count);
        assert_eq!(a, b);
    }

    #[test]
    fn test_foreknowledge_never_pays_less() {
        let calc = jacks_or_better_calculator();
        let optimal = simulator().run(2_000, &mut StdRng::seed_from_u64(420));
        let cheating = Simulator::new(calc.clone(), ForeknowledgeHoldSelector::new(calc))
            .run(2_000, &mut StdRng::seed_from_u64(420));
        // Both sessions see the same deals, and knowing the deck can only help.
        assert!(cheating.main_rtp() >= optimal.main_rtp());
        assert!(cheating.main_rtp() > 1.0);
    }

    #[test]
    fn test_multipliers_raise_the_pay() {
        let calc = PayCalculator::new(
            PayTable::jacks_or_better_6_5(),
            &crate::pay::JudgeRegistry::standard(),
        )
        .unwrap();
        let plain = Simulator::new(calc.clone(), ForeknowledgeHoldSelector::new(calc.clone()))
            .run(1_000, &mut StdRng::seed_from_u64(420));
        let streak = Simulator::new(calc.clone(), ForeknowledgeHoldSelector::new(calc))
            .with_multipliers(MultiplierTable::ultimate_x_jacks_or_better_6_5())
            .run(1_000, &mut StdRng::seed_from_u64(420));
        assert_eq!(
            plain.main_pay_count_statistics,
            streak.main_pay_count_statistics
        );
        assert!(streak.main_rtp() > plain.main_rtp());
        let summed: f64 = PayTable::jacks_or_better_6_5()
            .titles()
            .map(|t| streak.title_rtp(t))
            .sum();
        assert_relative_eq!(streak.main_rtp(), summed, max_relative = 1e-12);
    }
}
