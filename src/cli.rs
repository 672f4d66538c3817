//! Command-line interface.
//!
//! Every report command prints pretty JSON on stdout. Data is read from the database named
//! by the configuration, or from a JSON snapshot when `--snapshot` is given.

use crate::{
    config::{
        database::{create_connection, create_tables},
        settings::Settings,
    },
    core::{
        bucketing::{DateRange, Granularity},
        dashboard::DashboardOptions,
        report::{
            generate_bank_summary, generate_dashboard, generate_payable_report, generate_payment_series,
            generate_warning_summary,
        },
    },
    errors::{Error, Result},
    source::{DatabaseSource, LedgerData, LedgerSource},
};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Accounts-payable dashboard reports.
#[derive(Parser, Debug)]
#[command(name = "ap-tracker", version)]
#[command(about = "Multi-currency accounts-payable dashboard reports")]
pub struct Cli {
    /// Read the ledger from a JSON snapshot instead of the database
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Settings file (defaults to `ap-tracker.toml` when present)
    #[arg(long, global = true, env = "AP_TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report to produce
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Every report in one document
    Dashboard(DashboardArgs),
    /// Bank balances per account and in total
    Banks,
    /// Overdue, urgent and important payables
    Warnings(WarningArgs),
    /// Payments bucketed over time
    Series(SeriesArgs),
    /// Reconciliation of a single payable
    Reconcile(ReconcileArgs),
    /// Create the database tables
    InitDb,
}

/// Reference date shared by the date-sensitive reports.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TodayArgs {
    /// Date the report is computed for (YYYY-MM-DD, defaults to the local date)
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

impl TodayArgs {
    /// The requested date or the local date.
    #[must_use]
    pub fn resolve(self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Payment series window and resolution.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RangeArgs {
    /// First payment date included (defaults to the start of the lookback window)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last payment date included (defaults to today)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Bucket size: day, month or year
    #[arg(long)]
    pub granularity: Option<Granularity>,
}

impl RangeArgs {
    /// Fills unset bounds from the configured lookback window ending at `today`.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::InvalidRange`] if the resulting start is after the end.
    pub fn resolve(self, today: NaiveDate, settings: &Settings) -> Result<(DateRange, Granularity)> {
        let end = self.to.unwrap_or(today);
        let lookback = DateRange::trailing_months(end, settings.dashboard.series_lookback_months);
        let range = DateRange::new(self.from.unwrap_or_else(|| lookback.start()), end)?;
        let granularity = self.granularity.unwrap_or(settings.dashboard.default_granularity);
        Ok((range, granularity))
    }
}

/// `dashboard` options.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DashboardArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub today: TodayArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub range: RangeArgs,

    /// Days ahead of today that still count as urgent
    #[arg(long)]
    pub urgent_window: Option<u32>,
}

/// `warnings` options.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WarningArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub today: TodayArgs,

    /// Days ahead of today that still count as urgent
    #[arg(long)]
    pub urgent_window: Option<u32>,
}

/// `series` options.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SeriesArgs {
    #[command(flatten)]
    #[allow(missing_docs)]
    pub today: TodayArgs,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub range: RangeArgs,
}

/// `reconcile` options.
#[derive(Args, Debug, Clone, Copy)]
pub struct ReconcileArgs {
    /// Payable id
    #[arg(long)]
    pub payable: i64,

    #[command(flatten)]
    #[allow(missing_docs)]
    pub today: TodayArgs,

    /// Days ahead of today that still count as urgent
    #[arg(long)]
    pub urgent_window: Option<u32>,
}

/// Runs the parsed command and returns the JSON document to print.
///
/// `database_url` is only used when no snapshot is given, or for `init-db`.
pub async fn execute(cli: &Cli, settings: &Settings, database_url: &str) -> Result<String> {
    if matches!(cli.command, Command::InitDb) {
        let db = create_connection(database_url).await?;
        create_tables(&db).await?;
        return to_json(&serde_json::json!({ "initialized": database_url }));
    }

    match &cli.snapshot {
        Some(path) => {
            info!("Reading ledger snapshot from {}", path.display());
            let data = LedgerData::load(path)?;
            run_report(&data, &cli.command, settings).await
        }
        None => {
            let db = create_connection(database_url).await?;
            run_report(&DatabaseSource::new(&db), &cli.command, settings).await
        }
    }
}

async fn run_report<S: LedgerSource>(source: &S, command: &Command, settings: &Settings) -> Result<String> {
    let default_window = settings.dashboard.urgent_window_days;

    match *command {
        Command::Dashboard(args) => {
            let today = args.today.resolve();
            let (range, granularity) = args.range.resolve(today, settings)?;
            let options = DashboardOptions {
                today,
                urgent_window_days: args.urgent_window.unwrap_or(default_window),
                range,
                granularity,
            };
            to_json(&generate_dashboard(source, options).await?)
        }
        Command::Banks => to_json(&generate_bank_summary(source).await?),
        Command::Warnings(args) => {
            let window = args.urgent_window.unwrap_or(default_window);
            to_json(&generate_warning_summary(source, args.today.resolve(), window).await?)
        }
        Command::Series(args) => {
            let (range, granularity) = args.range.resolve(args.today.resolve(), settings)?;
            to_json(&generate_payment_series(source, range, granularity).await?)
        }
        Command::Reconcile(args) => {
            let window = args.urgent_window.unwrap_or(default_window);
            to_json(&generate_payable_report(source, args.payable, args.today.resolve(), window).await?)
        }
        Command::InitDb => Err(Error::Config {
            message: "init-db does not read a ledger".to_string(),
        }),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::date;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "currencies": [
            {"code": "CNY", "name": "Yuan", "symbol": "¥", "exchangeRateToUsd": 7.2, "isActive": true}
        ],
        "payables": [
            {"id": 1, "payableNumber": "AP-1", "amount": "1,000", "currencyCode": "usd",
             "dueDate": "2024-06-12", "importance": "normal", "status": "pending"},
            {"id": 2, "payableNumber": "AP-2", "amount": 720, "currencyCode": "CNY",
             "dueDate": "2024-06-18", "importance": "important", "status": "pending"}
        ],
        "paymentRecords": [
            {"id": 1, "payableId": 1, "amount": 400, "currencyCode": "USD", "paymentDate": "2024-06-01"}
        ]
    }"#;

    fn snapshot_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();
        file
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_dashboard_args() {
        let cli = parse(&[
            "ap-tracker",
            "dashboard",
            "--today",
            "2024-06-15",
            "--granularity",
            "daily",
            "--urgent-window",
            "3",
        ]);
        let Command::Dashboard(args) = cli.command else {
            panic!("expected dashboard");
        };
        assert_eq!(args.today.today, Some(date(2024, 6, 15)));
        assert_eq!(args.range.granularity, Some(Granularity::Day));
        assert_eq!(args.urgent_window, Some(3));
    }

    #[test]
    fn test_global_snapshot_flag_after_subcommand() {
        let cli = parse(&["ap-tracker", "banks", "--snapshot", "ledger.json"]);
        assert_eq!(cli.snapshot, Some(PathBuf::from("ledger.json")));
        assert!(matches!(cli.command, Command::Banks));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Cli::try_parse_from(["ap-tracker", "series", "--granularity", "weekly"]).is_err());
        assert!(Cli::try_parse_from(["ap-tracker", "warnings", "--today", "15/06/2024"]).is_err());
        assert!(Cli::try_parse_from(["ap-tracker", "reconcile"]).is_err());
    }

    #[test]
    fn test_range_defaults_to_lookback_window() {
        let settings = Settings::default();
        let (range, granularity) = RangeArgs::default().resolve(date(2024, 6, 15), &settings).unwrap();
        assert_eq!(range.start(), date(2023, 7, 1));
        assert_eq!(range.end(), date(2024, 6, 15));
        assert_eq!(granularity, Granularity::Month);
    }

    #[test]
    fn test_inverted_range_fails() {
        let args = RangeArgs {
            from: Some(date(2024, 7, 1)),
            to: Some(date(2024, 6, 1)),
            granularity: None,
        };
        let result = args.resolve(date(2024, 6, 15), &Settings::default());
        assert!(matches!(result, Err(Error::InvalidRange { .. })));
    }

    #[tokio::test]
    async fn test_warnings_from_snapshot() -> Result<()> {
        let file = snapshot_file();
        let path = file.path().to_str().unwrap();
        let cli = parse(&["ap-tracker", "--snapshot", path, "warnings", "--today", "2024-06-15"]);

        let output = execute(&cli, &Settings::default(), "sqlite::memory:").await?;
        let json: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(json["summary"]["overdue"]["count"], 1);
        assert_eq!(json["summary"]["overdue"]["totalUsd"], 600.0);
        assert_eq!(json["summary"]["urgent"]["count"], 1);
        assert_eq!(json["summary"]["urgent"]["totalUsd"], 100.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_reconcile_from_snapshot() -> Result<()> {
        let file = snapshot_file();
        let path = file.path().to_str().unwrap();
        let cli = parse(&[
            "ap-tracker",
            "reconcile",
            "--payable",
            "1",
            "--today",
            "2024-06-10",
            "--snapshot",
            path,
        ]);

        let output = execute(&cli, &Settings::default(), "sqlite::memory:").await?;
        let json: serde_json::Value = serde_json::from_str(&output)?;

        assert_eq!(json["remainingUsd"], 600.0);
        assert_eq!(json["status"], "partial");
        assert_eq!(json["warning"], "urgent");
        assert_eq!(json["daysUntilDue"], 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_init_db_creates_tables() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.sqlite").display());
        let cli = parse(&["ap-tracker", "init-db"]);

        execute(&cli, &Settings::default(), &url).await?;

        let db = create_connection(&url).await?;
        let banks = generate_bank_summary(&DatabaseSource::new(&db)).await?;
        assert_eq!(banks.aggregate.account_count, 0);
        Ok(())
    }
}
