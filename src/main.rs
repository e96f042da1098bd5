//! Crypto Position Risk Calculator
//!
//! Sizes leveraged positions from a risk budget and grades take-profit
//! targets by risk/reward.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crypto_risk_calc::config::{AppConfig, OrderType};
use crypto_risk_calc::history::{equity_curve, HistorySummary, TradeHistory, TradeRecord};
use crypto_risk_calc::price::{ManualPrice, PriceSource, StaticQuotes};
use crypto_risk_calc::profile::{pnl_profile, Level as ProfileLevel};
use crypto_risk_calc::{calculate, Side, TradeInput};

const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.jsonl";

/// Leveraged position sizing and risk/reward calculator.
#[derive(Parser)]
#[command(name = "riskcalc")]
#[command(about = "Size leveraged crypto positions from a risk budget", long_about = None)]
struct Cli {
    /// Directory holding config.json and history.jsonl [default: ~/.crypto_calculator]
    #[arg(short, long, env = "RISKCALC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate position size, fees, liquidation and target risk/reward
    Calc {
        /// Position direction (long or short)
        #[arg(short, long, default_value = "long")]
        side: Side,

        /// Trading symbol
        #[arg(long, default_value = "BTCUSDT")]
        symbol: String,

        /// Entry price; looked up from the reference quotes if omitted
        #[arg(short, long)]
        entry: Option<Decimal>,

        /// Stop-loss price
        #[arg(long)]
        stop: Decimal,

        /// Take-profit price (repeat for several targets)
        #[arg(long = "tp", required = true)]
        take_profits: Vec<Decimal>,

        /// Leverage [default: from config]
        #[arg(short = 'x', long)]
        leverage: Option<Decimal>,

        /// Account capital [default: from config]
        #[arg(short, long)]
        capital: Option<Decimal>,

        /// Risk per trade in percent [default: from config]
        #[arg(short, long)]
        risk: Option<Decimal>,

        /// Per-side fee in percent [default: from config and order type]
        #[arg(long)]
        fee: Option<Decimal>,

        /// Order type used to pick the fee (maker or taker)
        #[arg(long)]
        order_type: Option<OrderType>,

        /// Exchange recorded with the trade [default: from config]
        #[arg(long)]
        exchange: Option<String>,

        /// Free-form notes stored with the trade
        #[arg(long, default_value = "")]
        notes: String,

        /// Print the P&L profile across stop, entry and targets
        #[arg(long)]
        profile: bool,

        /// Do not append the calculation to the history
        #[arg(long)]
        no_save: bool,
    },

    /// Inspect or export the trade history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List recent calculations
    List {
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Export the full history as CSV
    Export {
        /// Output file
        path: PathBuf,
    },

    /// Summary statistics and planned P&L curve
    Stats,

    /// Delete every record
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Update one or more settings
    Set {
        #[arg(long)]
        capital: Option<Decimal>,

        /// Risk per trade in percent
        #[arg(long)]
        risk: Option<Decimal>,

        /// Taker fee per side in percent
        #[arg(long)]
        taker_fee: Option<Decimal>,

        /// Maker fee per side in percent
        #[arg(long)]
        maker_fee: Option<Decimal>,

        #[arg(long)]
        order_type: Option<OrderType>,

        #[arg(long)]
        leverage: Option<Decimal>,

        #[arg(long)]
        exchange: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let config_path = data_dir.join(CONFIG_FILE);
    let history_path = data_dir.join(HISTORY_FILE);

    match cli.command {
        Commands::Calc {
            side,
            symbol,
            entry,
            stop,
            take_profits,
            leverage,
            capital,
            risk,
            fee,
            order_type,
            exchange,
            notes,
            profile,
            no_save,
        } => {
            let config = AppConfig::load(&config_path)?;

            let entry_price = match entry {
                Some(price) => ManualPrice(price).price(&symbol)?,
                None => {
                    let price = StaticQuotes::reference().price(&symbol).with_context(|| {
                        format!("no reference price for {symbol}; pass --entry")
                    })?;
                    info!(symbol = %symbol, price = %price, "Using reference quote as entry");
                    price
                }
            };

            let fee_percent = match (fee, order_type) {
                (Some(fee), _) => fee,
                (None, Some(order_type)) => config.fee_percent_for(order_type),
                (None, None) => config.fee_percent(),
            };

            let input = TradeInput {
                entry_price,
                stop_loss: stop,
                take_profits,
                leverage: leverage.unwrap_or(config.default_leverage),
                capital: capital.unwrap_or(config.capital),
                risk_percent: risk.unwrap_or(config.risk_percent),
                fee_percent,
                side,
            };

            let result = calculate(&input)?;

            println!(
                "\n{} {} | Entry: {} | SL: {} | Lev: {}x | Fee: {}%",
                symbol, input.side, input.entry_price, input.stop_loss, input.leverage,
                input.fee_percent
            );
            print!("{}", result);

            if profile {
                println!("\n--- P&L Profile ---");
                for point in pnl_profile(&input)? {
                    println!(
                        "  {:<12} {:>16} {:>+9.2}%",
                        level_label(point.level),
                        point.price.round_dp(8),
                        point.pnl_percent.round_dp(2)
                    );
                }
            }

            if !no_save {
                let mut history = TradeHistory::open(&history_path)?;
                let exchange = exchange.unwrap_or_else(|| config.exchange.clone());
                history.append(TradeRecord::new(exchange, symbol, notes, input, result))?;
                println!("\nSaved to {}", history.path().display());
            }
        }

        Commands::History { action } => run_history(action, &history_path)?,

        Commands::Config { action } => run_config(action, &config_path)?,
    }

    Ok(())
}

fn run_history(action: HistoryAction, history_path: &Path) -> Result<()> {
    let mut history = TradeHistory::open(history_path)?;

    match action {
        HistoryAction::List { limit } => {
            if history.is_empty() {
                println!("No trades recorded yet. Use 'riskcalc calc' to add one.");
                return Ok(());
            }

            println!(
                "\n{:<20} {:<10} {:<12} {:<6} {:>12} {:>12} {:>5} {:>12} {:>8}",
                "TIMESTAMP", "EXCHANGE", "SYMBOL", "SIDE", "ENTRY", "SL", "LEV", "SIZE", "BEST R:R"
            );
            println!("{}", "-".repeat(105));

            for record in history.recent(limit) {
                let best = record
                    .result
                    .best_target
                    .map(|b| format!("{:.2}", b.risk_reward.round_dp(2)))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<20} {:<10} {:<12} {:<6} {:>12} {:>12} {:>5} {:>12.2} {:>8}",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    truncate(&record.exchange, 10),
                    truncate(&record.symbol, 12),
                    record.input.side,
                    record.input.entry_price,
                    record.input.stop_loss,
                    record.input.leverage,
                    record.result.position_size_base.round_dp(2),
                    best
                );
            }
        }

        HistoryAction::Export { path } => {
            let rows = history.export_csv(&path)?;
            if rows == 0 {
                println!("No data to export.");
            } else {
                println!("Exported {} trades to {}", rows, path.display());
            }
        }

        HistoryAction::Stats => {
            let summary = HistorySummary::from_records(history.records());
            print!("{}", summary);

            let curve = equity_curve(history.records());
            if !curve.is_empty() {
                println!("\n--- Planned P&L Curve (first target) ---");
                for point in curve {
                    println!(
                        "  #{:<4} {:>+12.2} {:>+14.2}",
                        point.trade_number,
                        point.pnl.round_dp(2),
                        point.cumulative.round_dp(2)
                    );
                }
            }
        }

        HistoryAction::Clear { yes } => {
            if !yes {
                bail!("refusing to clear {} records without --yes", history.len());
            }
            let removed = history.len();
            history.clear()?;
            println!("Removed {} records.", removed);
        }
    }

    Ok(())
}

fn run_config(action: ConfigAction, config_path: &Path) -> Result<()> {
    let mut config = AppConfig::load(config_path)?;

    match action {
        ConfigAction::Show => {
            println!("\n=== Configuration ({}) ===\n", config_path.display());
            println!("  Capital:           ${}", config.capital);
            println!("  Risk per Trade:    {}%", config.risk_percent);
            println!("  Taker Fee:         {}%", config.taker_fee_percent);
            println!("  Maker Fee:         {}%", config.maker_fee_percent);
            println!("  Order Type:        {}", config.order_type);
            println!("  Default Leverage:  {}x", config.default_leverage);
            println!("  Exchange:          {}", config.exchange);
            if let Some(updated) = config.last_updated {
                println!("  Last Updated:      {}", updated.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        ConfigAction::Set {
            capital,
            risk,
            taker_fee,
            maker_fee,
            order_type,
            leverage,
            exchange,
        } => {
            if let Some(v) = capital {
                config.capital = v;
            }
            if let Some(v) = risk {
                config.risk_percent = v;
            }
            if let Some(v) = taker_fee {
                config.taker_fee_percent = v;
            }
            if let Some(v) = maker_fee {
                config.maker_fee_percent = v;
            }
            if let Some(v) = order_type {
                config.order_type = v;
            }
            if let Some(v) = leverage {
                config.default_leverage = v;
            }
            if let Some(v) = exchange {
                config.exchange = v;
            }

            config.save(config_path)?;
            println!("Configuration saved to {}", config_path.display());
        }
    }

    Ok(())
}

fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".crypto_calculator")
}

fn level_label(level: ProfileLevel) -> String {
    match level {
        ProfileLevel::RangeLow => "range low".to_string(),
        ProfileLevel::StopLoss => "stop loss".to_string(),
        ProfileLevel::Entry => "entry".to_string(),
        ProfileLevel::TakeProfit(n) => format!("TP{}", n),
        ProfileLevel::RangeHigh => "range high".to_string(),
    }
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
