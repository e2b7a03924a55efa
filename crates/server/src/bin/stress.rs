//! Load generator: matches batches of random points across worker threads
//! and reports points per second.

use clap::Parser;
use district_matcher::{CascadingMatcher, CollectionCache, FileStore, MatcherConfig, Point};
use district_matcher_server::{init_tracing, load_config};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

const LON_RANGE: (f64, f64) = (-124.77, -66.95);
const LAT_RANGE: (f64, f64) = (24.52, 49.38);

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML matcher configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of `<key>.geojson` collections (overrides the config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Worker threads (default: available cores minus one)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Points per batch
    #[arg(short, long, default_value_t = 10_000)]
    batch: usize,

    /// Stop after this many batches instead of running forever
    #[arg(long)]
    batches: Option<u64>,

    /// Share one cache between workers instead of one cache per worker
    #[arg(long)]
    shared_cache: bool,

    /// Seed for reproducible point streams
    #[arg(long)]
    seed: Option<u64>,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

fn build_matchers(
    config: &MatcherConfig,
    workers: usize,
    shared: bool,
) -> anyhow::Result<Vec<CascadingMatcher>> {
    let shared_cache = if shared {
        let store = Arc::new(FileStore::new(config.data_dir.clone()));
        Some(Arc::new(CollectionCache::new(store, config.cache_capacity)?))
    } else {
        None
    };

    (0..workers)
        .map(|_| -> anyhow::Result<CascadingMatcher> {
            let mut builder = CascadingMatcher::builder()
                .config(config.clone())
                .warm_up(true);
            if let Some(cache) = &shared_cache {
                builder = builder.cache(Arc::clone(cache));
            }
            Ok(builder.build()?)
        })
        .collect()
}

fn random_points(rng: &mut StdRng, count: usize) -> Vec<Point> {
    (0..count)
        .map(|_| {
            Point::new(
                rng.gen_range(LON_RANGE.0..LON_RANGE.1),
                rng.gen_range(LAT_RANGE.0..LAT_RANGE.1),
            )
        })
        .collect()
}

fn run_batch(matchers: &[CascadingMatcher], points: &[Point]) -> anyhow::Result<usize> {
    let chunk = points.len().div_ceil(matchers.len()).max(1);

    std::thread::scope(|s| {
        let handles: Vec<_> = matchers
            .iter()
            .zip(points.chunks(chunk))
            .map(|(matcher, points)| {
                s.spawn(move || -> district_matcher::Result<usize> {
                    let mut matched = 0;
                    for point in points {
                        matched += matcher.match_point(point)?.len();
                    }
                    Ok(matched)
                })
            })
            .collect();

        let mut total = 0;
        for handle in handles {
            let matched = handle
                .join()
                .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
            total += matched;
        }
        Ok(total)
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }

    let workers = args.workers.unwrap_or_else(default_workers).max(1);
    info!(
        "Using {} workers ({} cache)",
        workers,
        if args.shared_cache { "shared" } else { "per-worker" }
    );

    let matchers = build_matchers(&config, workers, args.shared_cache)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut completed = 0u64;
    while args.batches.is_none_or(|limit| completed < limit) {
        let points = random_points(&mut rng, args.batch);

        let started = Instant::now();
        let matched = run_batch(&matchers, &points)?;
        let total = started.elapsed().as_secs_f64();

        println!(
            "{} points matched in {:.2}s ({:.1}pps)",
            args.batch,
            total,
            args.batch as f64 / total
        );
        info!("Batch {} produced {} matches", completed, matched);
        completed += 1;
    }

    for (worker, matcher) in matchers.iter().enumerate() {
        let stats = matcher.cache().stats();
        info!(
            "Worker {} cache: {} hits, {} loads, {} evictions ({:.1}% hit ratio)",
            worker,
            stats.hits,
            stats.loads,
            stats.evictions,
            stats.hit_ratio() * 100.0
        );
        if args.shared_cache {
            break;
        }
    }

    Ok(())
}
