//! Faultwatch CLI
//!
//! Command-line dashboard for a Faultwatch server:
//! - Submit sensor readings
//! - Show recent predictions
//! - Show safe ranges and server status

use clap::{Parser, Subcommand};
use faultwatch::client::{ClientError, DashboardClient, HttpDashboardApi, SubmitFailure};
use faultwatch::config::{generate_default_config, Config};
use faultwatch_core::dashboard::{BarColor, Dashboard, FormState};
use faultwatch_core::sensor::SensorKey;
use faultwatch_core::wire::{probability_percent, PredictionResult};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "faultwatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fault-risk dashboard for filling-line sensors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Configuration file for safe ranges
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit one set of sensor readings
    Predict {
        /// Temperature (°C)
        #[arg(long, default_value = "")]
        temp: String,
        /// Pressure (bar)
        #[arg(long, default_value = "")]
        pressure: String,
        /// Flow rate (L/min)
        #[arg(long, default_value = "")]
        flow: String,
        /// Vibration (mm/s)
        #[arg(long, default_value = "")]
        vibration: String,
        /// Fill height (mm)
        #[arg(long, default_value = "")]
        fillheight: String,
        /// Power (kW)
        #[arg(long, default_value = "")]
        power: String,
        /// CO2 (ppm)
        #[arg(long, default_value = "")]
        co2: String,
        /// Humidity (%)
        #[arg(long, default_value = "")]
        humidity: String,
    },

    /// Show recent predictions
    Logs,

    /// Show the safe range of each sensor
    Ranges,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    let ranges = config.safe_ranges();

    match cli.command {
        Commands::Predict {
            temp,
            pressure,
            flow,
            vibration,
            fillheight,
            power,
            co2,
            humidity,
        } => {
            let mut form = FormState::new();
            for (key, text) in SensorKey::ALL.into_iter().zip([
                temp, pressure, flow, vibration, fillheight, power, co2, humidity,
            ]) {
                form.set(key, text);
            }

            let api = HttpDashboardApi::new(&cli.api_url, Duration::from_secs(10))?;
            let client = DashboardClient::new(api, ranges);
            client.init().await;

            match client.submit(form).await {
                Ok(result) => {
                    let dashboard = client.snapshot().await;
                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                    } else {
                        print_prediction(&result, &dashboard);
                    }
                }
                Err(SubmitFailure::Invalid(e)) => {
                    eprintln!("{}", e);
                    eprintln!();
                    eprintln!("Example:");
                    eprintln!("  faultwatch-cli predict --temp 50 --pressure 3 --flow 55 \\");
                    eprintln!("    --vibration 2 --fillheight 100 --power 27 --co2 650 \\");
                    eprintln!("    --humidity 50");
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Logs => {
            let api = HttpDashboardApi::new(&cli.api_url, Duration::from_secs(10))?;
            let client = DashboardClient::new(api, ranges);

            if !client.refresh_logs().await {
                eprintln!("Failed to load logs from {}", cli.api_url);
                std::process::exit(1);
            }

            let dashboard = client.snapshot().await;
            let line = dashboard.charts().line();

            if cli.format == "json" {
                let rows: Vec<_> = line
                    .labels()
                    .iter()
                    .zip(line.data())
                    .map(|(timestamp, percent)| {
                        serde_json::json!({ "timestamp": timestamp, "percent": percent })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if line.is_empty() {
                println!("No predictions yet.");
            } else {
                println!("{:<22} {:>6}", "Timestamp", "Risk");
                println!("{}", "-".repeat(29));
                for (timestamp, percent) in line.labels().iter().zip(line.data()) {
                    println!("{:<22} {:>5}%", timestamp, percent);
                }
            }
        }

        Commands::Ranges => {
            println!("{:<12} {:<18} {:>10} {:>10}", "Key", "Sensor", "Min", "Max");
            println!("{}", "-".repeat(53));
            for (key, range) in ranges.iter() {
                println!(
                    "{:<12} {:<18} {:>10} {:>10}",
                    key.as_str(),
                    format!("{} ({})", key.label(), key.unit()),
                    range.min,
                    range.max
                );
            }
        }

        Commands::Status => {
            let api = HttpDashboardApi::new(&cli.api_url, Duration::from_secs(5))?;

            match api.health().await {
                Ok(health) => {
                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&health)?);
                    } else {
                        println!("Faultwatch v{}", health.version);
                        println!();
                        println!("Status:     {}", health.status);
                        println!("Predictor:  {} ({})", health.predictor, health.predictor_status);
                        println!("Logs:       {}", health.log_entries);
                        println!("Uptime:     {}", format_duration(health.uptime_seconds));
                    }
                }
                Err(e @ ClientError::Status { .. }) => {
                    eprintln!("API returned error: {}", e);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Faultwatch API at {}", api.base_url());
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Faultwatch server is running:");
                    eprintln!("  cargo run --bin faultwatch");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            if let Some(path) = output {
                std::fs::write(&path, &config)?;
                println!("Config written to {:?}", path);
            } else {
                print!("{}", config);
            }
        }
    }

    Ok(())
}

fn print_prediction(result: &PredictionResult, dashboard: &Dashboard) {
    println!(
        "Fault risk: {}%  [{}] {}",
        probability_percent(result.probability),
        dashboard.fault().error_code,
        dashboard.fault().error_description
    );
    println!();
    println!("{:<22} {:>10} {:>22}", "Sensor", "Value", "Safe range");
    println!("{}", "-".repeat(60));

    for bar in dashboard.charts().bar().bars() {
        let value = bar.value.map(|v| v.to_string()).unwrap_or_default();
        let flag = match bar.color {
            BarColor::Green => "",
            BarColor::Red => "  OUT",
        };
        println!(
            "{:<22} {:>10} {:>22}{}",
            format!("{} ({})", bar.key.label(), bar.key.unit()),
            value,
            bar.range.to_string(),
            flag
        );
    }

    let line = dashboard.charts().line();
    if !line.is_empty() {
        let series: Vec<String> = line.data().iter().map(|p| format!("{}%", p)).collect();
        println!();
        println!("Recent risk ({}): {}", line.data().len(), series.join(" "));
    }

    if !result.contributions.is_empty() {
        println!();
        println!("Contributions:");
        let mut contributions: Vec<_> = result.contributions.iter().collect();
        contributions.sort_by(|a, b| b.1.total_cmp(a.1));
        for (feature, weight) in contributions.into_iter().filter(|(_, w)| **w > 0.0) {
            println!("  {:<14} {:.3}", feature, weight);
        }
    }
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}
