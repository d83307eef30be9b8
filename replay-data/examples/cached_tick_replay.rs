use replay_data::{
    cache::CachedTickProducer,
    container::{DataContainer, QuoteColumns, TradeColumns},
    event::TradeId,
    producer::MarketDataProducer,
};
use replay_instrument::{OrderSide, instrument::InstrumentId};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;

fn main() {
    // Initialise INFO Tracing log subscriber
    init_logging();

    // Build a DataContainer holding columnar quote and trade data for one instrument
    let eurusd = InstrumentId::new("EUR/USD", "SIM");
    let mut container = DataContainer::new();
    container.add_quotes(
        eurusd.clone(),
        QuoteColumns {
            bid: vec![dec!(1.0000), dec!(1.0001), dec!(1.0003), dec!(1.0002)],
            ask: vec![dec!(1.0002), dec!(1.0003), dec!(1.0005), dec!(1.0004)],
            bid_size: vec![dec!(100_000); 4],
            ask_size: vec![dec!(120_000); 4],
            ts_ns: vec![1_000, 2_000, 3_000, 5_000],
        },
    );
    container.add_trades(
        eurusd,
        TradeColumns {
            price: vec![dec!(1.0001), dec!(1.0004)],
            size: vec![dec!(50_000), dec!(25_000)],
            match_id: vec![TradeId::new("E-1"), TradeId::new("E-2")],
            aggressor_side: vec![OrderSide::Buy, OrderSide::Sell],
            ts_ns: vec![2_000, 4_000],
        },
    );

    let mut producer = CachedTickProducer::new(Arc::new(container));

    // First replay merges and materializes the full container traversal
    producer.setup(1_000, 5_000).unwrap();
    info!(cached = producer.cached_len(), "armed replay window [1000, 5000]");
    while let Some(tick) = producer.next() {
        info!("{tick}");
    }

    // Subsequent windows are served from the cache
    producer.setup(2_000, 4_000).unwrap();
    info!("armed replay window [2000, 4000]");
    while let Some(tick) = producer.next() {
        info!("{tick}");
    }
}

// Initialise an INFO `Subscriber` for `Tracing` Json logs and install it as the global default.
fn init_logging() {
    tracing_subscriber::fmt()
        // Filter messages based on the INFO
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        // Disable colours on release builds
        .with_ansi(cfg!(debug_assertions))
        // Enable Json formatting
        .json()
        // Install this Tracing subscriber as global default
        .init()
}
