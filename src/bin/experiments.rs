//! Measurement driver for the list.
//!
//! Three experiments, each over a series of growing sizes:
//! - `rebalance`: total rebalancing work for random inserts, for deleting
//!   everything, and for a mixed insert/delete workload.
//! - `split-cost`: max and mean join cost of a split, at a random index and
//!   at the root's predecessor.
//! - `depth`: average rebalancing work and inserted-node depth, AVL against
//!   the unbalanced baseline, for three insertion orders.

use std::time::Instant;

use clap::{ArgAction, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use avl_list::{Avl, Balance, BalancedList, BstList, Unbalanced};

#[derive(Debug, Parser)]
#[command(about = "Measure rebalancing, split and depth behaviour of the list")]
struct Options {
    #[command(subcommand)]
    experiment: Experiment,
    /// Number of sizes to measure
    #[arg(long, env = "AVL_LIST_ROUNDS", default_value_t = 10, global = true)]
    rounds: u32,
    /// Size unit; sizes grow from it by doubling (or linearly for `depth`)
    #[arg(long, default_value_t = 1000, global = true)]
    base: usize,
    /// Seed for every random choice
    #[arg(long, env = "AVL_LIST_SEED", default_value_t = 100, global = true)]
    seed: u64,
    /// Enables verbose logging
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Experiment {
    /// Rebalancing work of random inserts, full deletion and mixed edits
    Rebalance,
    /// Join costs of a split at a random index and at the root's predecessor
    SplitCost,
    /// AVL against the unbalanced baseline for three insertion orders
    Depth,
}

fn main() {
    let opts = Options::parse();

    let level = match opts.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?opts, "starting");
    let mut rng = StdRng::seed_from_u64(opts.seed);
    let start = Instant::now();
    match opts.experiment {
        Experiment::Rebalance => rebalance(&opts, &mut rng),
        Experiment::SplitCost => split_cost(&opts, &mut rng),
        Experiment::Depth => depth(&opts, &mut rng),
    }
    info!(elapsed = ?start.elapsed(), "done");
}

fn doubling_sizes(opts: &Options) -> impl Iterator<Item = (u32, usize)> + '_ {
    (1..=opts.rounds).map(|i| (i, opts.base << i))
}

// =============================================================================
// Rebalancing work
// =============================================================================

/// Insert `count` values at uniformly random positions.
fn insert_randomly<B: Balance>(list: &mut BalancedList<usize, B>, count: usize, rng: &mut StdRng) -> usize {
    let mut fixes = 0;
    for i in 0..count {
        let index = rng.gen_range(0..=list.len());
        fixes += list.insert(index, i);
    }
    fixes
}

fn delete_randomly(list: &mut BalancedList<usize>, rng: &mut StdRng) -> usize {
    let index = rng.gen_range(0..list.len());
    list.delete(index).unwrap()
}

fn rebalance(opts: &Options, rng: &mut StdRng) {
    println!("-- random inserts --");
    for (i, size) in doubling_sizes(opts) {
        let mut list = BalancedList::new();
        let fixes = insert_randomly(&mut list, size, rng);
        println!("{fixes} operations done (size={size}, index={i})");
    }

    println!("-- delete everything --");
    for (i, size) in doubling_sizes(opts) {
        let mut list = BalancedList::new();
        insert_randomly(&mut list, size, rng);
        let mut fixes = 0;
        while !list.is_empty() {
            fixes += delete_randomly(&mut list, rng);
        }
        println!("{fixes} operations done (size={size}, index={i})");
    }

    println!("-- mixed edits --");
    for (i, size) in doubling_sizes(opts) {
        let mut list = BalancedList::new();
        insert_randomly(&mut list, size / 2, rng);
        let mut fixes = 0;
        for _ in 0..size / 4 {
            if rng.gen_bool(0.5) || list.is_empty() {
                let index = rng.gen_range(0..=list.len());
                fixes += list.insert(index, list.len());
            } else {
                fixes += delete_randomly(&mut list, rng);
            }
        }
        println!("{fixes} operations done (size={size}, index={i})");
    }
}

// =============================================================================
// Split cost
// =============================================================================

fn split_cost(opts: &Options, rng: &mut StdRng) {
    for (i, size) in doubling_sizes(opts) {
        let mut list = BalancedList::new();
        insert_randomly(&mut list, size, rng);
        let copy = list.clone();

        let index = rng.gen_range(0..list.len());
        let (_, _, _, cost) = list.split_measured(index).unwrap();
        println!(
            "max_cost_random_index={}, avg_cost_random_index={:.3}, i={i}, size={size}",
            cost.max(),
            cost.mean()
        );

        let index = root_predecessor(&copy);
        let (_, _, _, cost) = copy.split_measured(index).unwrap();
        println!(
            "max_cost_root_pred={}, avg_cost_root_pred={:.3}, i={i}, size={size}",
            cost.max(),
            cost.mean()
        );
        println!();
    }
}

/// Index just before the root. The root is the only node at depth 0.
fn root_predecessor(list: &BalancedList<usize>) -> usize {
    let root = (0..list.len())
        .find(|&index| list.depth(index) == Ok(0))
        .unwrap_or(0);
    root.saturating_sub(1)
}

// =============================================================================
// Depth: AVL against the unbalanced baseline
// =============================================================================

#[derive(Debug, Default)]
struct Averages {
    fixes: usize,
    depth: usize,
    count: usize,
}

impl Averages {
    fn record<B: Balance>(&mut self, list: &mut BalancedList<usize, B>, index: usize, value: usize) {
        self.fixes += list.insert(index, value);
        self.depth += list.depth(index).unwrap();
        self.count += 1;
    }

    fn report(&self, kind: &str, policy: &str, i: u32) {
        let count = self.count.max(1) as f64;
        println!(
            "{:.3} operations done (size={}, index={i}, type={kind}_{policy})",
            self.fixes as f64 / count,
            self.count
        );
        println!(
            "{:.3} average depth (size={}, index={i}, type={kind}_{policy})",
            self.depth as f64 / count,
            self.count
        );
    }
}

/// `2i - 2^floor(log2(2i))`: visits positions so a plain tree stays shallow.
fn balanced_order(i: usize) -> usize {
    let doubled = 2 * i;
    doubled - (1usize << doubled.ilog2())
}

fn compare<F>(kind: &str, i: u32, size: usize, mut next_index: F)
where
    F: FnMut(usize, usize) -> usize,
{
    let mut avl: BalancedList<usize, Avl> = BalancedList::new();
    let mut plain: BstList<usize> = BstList::default();
    let (mut avl_stats, mut plain_stats) = (Averages::default(), Averages::default());
    for value in 1..=size {
        let index = next_index(value, avl.len());
        avl_stats.record(&mut avl, index, value);
        plain_stats.record(&mut plain, index, value);
    }
    avl_stats.report(kind, Avl::NAME, i);
    plain_stats.report(kind, Unbalanced::NAME, i);
    debug!(kind, avl_height = avl.height(), plain_height = plain.height(), "heights");
}

fn depth(opts: &Options, rng: &mut StdRng) {
    for i in 1..=opts.rounds {
        let size = opts.base * i as usize;
        compare("arithmetic", i, size, |_, _| 0);
        compare("balanced", i, size, |value, _| balanced_order(value));
        compare("random", i, size, |_, len| rng.gen_range(0..=len));
        println!();
    }
}
