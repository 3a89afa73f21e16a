//! Replays the hot/cold playground scenarios with logged events.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use hotcold_rx::prelude::*;
use tokio::time::sleep;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Hot and cold observables, side by side
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value_t = Scenario::Cold)]
    scenario: Scenario,

    /// Tick interval in milliseconds
    #[arg(long, default_value_t = 1_000)]
    interval_ms: u64,

    /// Log level
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Cold,
    Hot,
    ColdToHot,
    RefCounted,
    Share,
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("hotcold={0},hotcold_rx={0}", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TickConfig::default().with_interval(Duration::from_millis(args.interval_ms));
    let ticks = |n: u32| config.interval * n;

    info!(scenario = ?args.scenario, interval = ?config.interval, "running scenario");

    match args.scenario {
        Scenario::Cold => cold(config, ticks).await?,
        Scenario::Hot => hot(config, ticks).await?,
        Scenario::ColdToHot => cold_to_hot(config, ticks).await?,
        Scenario::RefCounted => ref_counted(config, ticks).await?,
        Scenario::Share => share(config, ticks).await?,
        Scenario::Scan => scan(),
    }

    info!("scenario finished");

    Ok(())
}

async fn cold(config: TickConfig, ticks: impl Fn(u32) -> Duration) -> Result<()> {
    let bag = DisposeBag::new();
    let cold_1 = cold_ticks(config)?;
    let cold_2 = cold_ticks(config)?;

    cold_1.debug("cold 1").subscribe_fn(|_| {}).disposed_by(&bag);
    sleep(ticks(5)).await;

    cold_2.debug("   cold 2").subscribe_fn(|_| {}).disposed_by(&bag);
    sleep(ticks(5)).await;

    Ok(())
}

async fn hot(config: TickConfig, ticks: impl Fn(u32) -> Duration) -> Result<()> {
    let bag = DisposeBag::new();
    let hot = HotTicks::new(config)?;
    let hot_1 = hot.observable();
    let hot_2 = hot.observable();

    hot_1
        .debug("hot 1 subscription:1")
        .subscribe_fn(|_| {})
        .disposed_by(&bag);
    hot_1
        .debug("    hot 1 subscription:2")
        .subscribe_fn(|_| {})
        .disposed_by(&bag);
    sleep(ticks(5)).await;

    hot_2
        .debug("        hot 2")
        .subscribe_fn(|_| {})
        .disposed_by(&bag);
    sleep(ticks(5)).await;

    Ok(())
}

async fn cold_to_hot(config: TickConfig, ticks: impl Fn(u32) -> Duration) -> Result<()> {
    let cold = cold_ticks(config)?.debug("cold coldToHot");
    let adapter = make_hot(&cold);
    let hot = adapter.observable().debug("hot coldToHot");
    let first = hot
        .debug("    hot coldToHot subscription:1")
        .subscribe_fn(|_| {});

    sleep(ticks(5)).await;

    let second = hot
        .debug("         hot coldToHot subscription:2")
        .subscribe_fn(|_| {});

    sleep(ticks(5)).await;
    first.unsubscribe();
    sleep(ticks(5)).await;
    second.unsubscribe();
    sleep(ticks(3)).await;

    info!(
        connected = adapter.is_connected(),
        "naive adapter after all subscribers left"
    );

    Ok(())
}

async fn ref_counted(config: TickConfig, ticks: impl Fn(u32) -> Duration) -> Result<()> {
    let cold = cold_ticks(config)?.debug("cold coldToHotRefCounted");
    let adapter = make_hot_ref_counted_publish(&cold);
    let hot = adapter.observable();

    shared_run(&hot, "coldToHotRefCounted", &ticks).await;

    info!(
        connected = adapter.is_connected(),
        subscribers = adapter.subscriber_count(),
        "ref counted adapter after all subscribers left"
    );

    Ok(())
}

async fn share(config: TickConfig, ticks: impl Fn(u32) -> Duration) -> Result<()> {
    let cold = cold_ticks(config)?.debug("cold coldToHotOutOfTheBox");
    let hot = cold.share();

    shared_run(&hot, "coldToHotOutOfTheBox", &ticks).await;

    Ok(())
}

/// First subscriber for 15 ticks, second joins after 5 and stays 15.
async fn shared_run(hot: &Observable<u64>, label: &str, ticks: &impl Fn(u32) -> Duration) {
    let first = hot
        .debug(format!("    hot {label} subscription:1"))
        .subscribe_fn(|_| {});

    sleep(ticks(5)).await;

    let second = hot
        .debug(format!("        hot {label} subscription:2"))
        .subscribe_fn(|_| {});

    sleep(ticks(10)).await;
    first.unsubscribe();
    sleep(ticks(10)).await;
    second.unsubscribe();
    sleep(ticks(3)).await;
}

fn scan() {
    let reducer = ActionReducer::new();
    let _states = reducer.states().debug("filters").subscribe_fn(|_| {});

    reducer.add("Date filter");
    reducer.add("Amount filter");
    reducer.delete("Amount filter");

    info!(filters = ?reducer.filters(), "final filters");
}
