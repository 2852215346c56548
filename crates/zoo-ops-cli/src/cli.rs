//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use zoo_ops_core::export::ExportFormat;
use zoo_ops_core::models::{
    HealthStatus, InventoryCategory, MedicationStatus, TaskPriority, TaskStatus, TreatmentOutcome,
};
use zoo_ops_core::notifications::NotificationCategory;
use zoo_ops_core::views::{InventoryTab, TaskTab};
use zoo_ops_core::Language;

#[derive(Debug, Parser)]
#[command(name = "zoo-ops", version, about = "Zoo operations from the terminal")]
pub struct Cli {
    /// API base URL (overrides ZOO_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Preference database (overrides ZOO_PREFS_PATH)
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    /// Acting user, by name or id
    #[arg(long, short, env = "ZOO_USER")]
    pub user: String,

    /// Display language (en, hi); saved for later runs
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Use seeded in-memory data instead of the API
    #[arg(long, global = true)]
    pub demo: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List animals visible to the user
    Animals {
        #[arg(long)]
        search: Option<String>,
    },
    /// List active alerts
    Alerts {
        #[command(subcommand)]
        action: Option<AlertAction>,
    },
    /// Inventory items and stock
    Inventory {
        #[arg(long, default_value = "all")]
        tab: InventoryTab,
        #[arg(long)]
        search: Option<String>,
        #[command(subcommand)]
        action: Option<InventoryAction>,
    },
    /// Task board
    Tasks {
        #[arg(long, default_value = "all")]
        tab: TaskTab,
        #[command(subcommand)]
        action: Option<TaskAction>,
    },
    /// Medications and treatments
    Meds {
        #[command(subcommand)]
        action: Option<MedAction>,
    },
    /// Feeding records and costs
    Feeding {
        #[command(subcommand)]
        action: Option<FeedingAction>,
    },
    /// Logs other staff shared with you
    SharedLogs,
    /// Submit a daily log for an animal
    Log(LogArgs),
    /// Raise an SOS alert
    Sos {
        /// Animal id or name
        animal: String,
        message: String,
    },
    /// Export a collection as CSV or a PDF report
    Export {
        kind: ExportKind,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Notification settings
    Notifications {
        #[command(subcommand)]
        action: NotificationAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum AlertAction {
    Dismiss { id: String },
}

#[derive(Debug, Subcommand)]
pub enum InventoryAction {
    Add {
        name: String,
        #[arg(long, default_value = "food")]
        category: InventoryCategory,
        #[arg(long)]
        quantity: f64,
        #[arg(long)]
        unit: String,
        #[arg(long)]
        min_threshold: f64,
        /// Cost per unit in rupees
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long)]
        expiry: Option<String>,
    },
    Restock {
        id: String,
        amount: f64,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskAction {
    Create {
        title: String,
        /// Assignee name
        #[arg(long)]
        assignee: String,
        /// Due date (YYYY-MM-DD or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        due: String,
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        animal: Option<String>,
    },
    Status {
        id: String,
        status: TaskStatus,
    },
    Comment {
        id: String,
        text: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum MedAction {
    Prescribe {
        /// Animal id or name
        animal: String,
        name: String,
        #[arg(long)]
        dosage: String,
        #[arg(long)]
        frequency: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    Administer {
        id: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    Status {
        id: String,
        status: MedicationStatus,
    },
    /// Record how a treatment ended (kept on this device)
    Outcome {
        id: String,
        outcome: TreatmentOutcome,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum FeedingAction {
    Add {
        /// Animal id or name
        animal: String,
        feed_type: String,
        amount: String,
        /// Cost in rupees, e.g. 1200 or ₹1,200
        cost: String,
    },
    Fed {
        id: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct LogArgs {
    /// Animal id or name
    pub animal: String,
    #[arg(long, default_value = "good")]
    pub health: HealthStatus,
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub mood: u8,
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub appetite: u8,
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub movement: u8,
    #[arg(long, default_value = "")]
    pub injuries: String,
    /// General observation text
    #[arg(long)]
    pub text: Option<String>,
    /// Voice recording to transcribe instead of typing
    #[arg(long)]
    pub audio: Option<PathBuf>,
    #[arg(long)]
    pub image: Option<PathBuf>,
    #[arg(long)]
    pub gate_image: Option<PathBuf>,
    #[arg(long)]
    pub video: Option<PathBuf>,
    /// User ids to share the log with
    #[arg(long)]
    pub share: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    /// Animal records (PDF: health report)
    Animals,
    Feeding,
    Inventory,
    Tasks,
    Medications,
}

impl ExportKind {
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ExportKind::Animals => "animals",
            ExportKind::Feeding => "feeding-records",
            ExportKind::Inventory => "inventory",
            ExportKind::Tasks => "tasks",
            ExportKind::Medications => "medications",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum NotificationAction {
    Show,
    Enable,
    Disable,
    Set {
        category: NotificationCategory,
        #[arg(action = ArgAction::Set)]
        on: bool,
    },
    Test {
        category: NotificationCategory,
    },
    /// Deliver reminders for alerts, low stock and overdue tasks
    Remind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_inventory_restock() {
        let cli = Cli::try_parse_from(["zoo-ops", "--user", "Vikram Singh", "inventory", "restock", "inv-4", "10"]).unwrap();
        match cli.command {
            Commands::Inventory {
                action: Some(InventoryAction::Restock { id, amount }),
                ..
            } => {
                assert_eq!(id, "inv-4");
                assert_eq!(amount, 10.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parses_log_flags() {
        let cli = Cli::try_parse_from([
            "zoo-ops", "-vv", "--demo", "--user", "u2", "log", "A001", "--health", "fair", "--mood", "30",
            "--share", "u3", "--share", "u4",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.demo);
        let Commands::Log(args) = cli.command else {
            panic!("expected log command");
        };
        assert_eq!(args.health, HealthStatus::Fair);
        assert_eq!(args.mood, 30);
        assert_eq!(args.share, vec!["u3", "u4"]);
    }

    #[test]
    fn test_rejects_out_of_range_slider() {
        assert!(Cli::try_parse_from(["zoo-ops", "--user", "u2", "log", "A001", "--mood", "150"]).is_err());
    }

    #[test]
    fn test_export_format_and_lang() {
        let cli = Cli::try_parse_from([
            "zoo-ops", "--user", "u1", "--lang", "hi", "export", "tasks", "--format", "pdf",
        ])
        .unwrap();
        assert_eq!(cli.lang, Some(Language::Hi));
        assert!(matches!(
            cli.command,
            Commands::Export {
                kind: ExportKind::Tasks,
                format: ExportFormat::Pdf,
                ..
            }
        ));
    }
}
