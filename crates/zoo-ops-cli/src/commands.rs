//! Subcommand handlers. Each drives one screen controller.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use tracing::warn;
use zoo_ops_core::api::Upload;
use zoo_ops_core::export::{
    animal_records, export_file_name, format_rupees, health_report, render_pdf, save_export, to_csv, ExportFormat, PageLayout,
};
use zoo_ops_core::models::{Animal, FeedingDraft, InventoryDraft, MedicationDraft, TaskDraft};
use zoo_ops_core::notifications::{NotificationCategory, NotificationCenter, TracingSink};
use zoo_ops_core::screens::{
    load_sources, AudioClip, DailyLogScreen, InventoryScreen, LoadReport, MedicationScreen, OfficerDashboard,
    ScreenStatus, SharedLogsScreen, TaskScreen, ZookeeperDashboard,
};
use zoo_ops_core::views::{resolve_animal, visible_animals};
use zoo_ops_core::{Collection, Message, PreferenceStore, ScreenController, Session, Stores};

use crate::cli::{
    AlertAction, Commands, ExportKind, FeedingAction, InventoryAction, LogArgs, MedAction, NotificationAction,
    TaskAction,
};

/// Everything a command needs.
pub struct Ctx<'a> {
    pub stores: Arc<Stores>,
    pub session: Session,
    pub prefs: &'a PreferenceStore,
}

impl Ctx<'_> {
    fn say(&self, message: Message) {
        println!("{}", message.text(self.session.language));
    }

    /// Fail only when nothing loaded; partial data is shown with a warning.
    fn check(&self, report: LoadReport) -> Result<()> {
        match report.status() {
            ScreenStatus::Ready => Ok(()),
            ScreenStatus::Partial { failed } => {
                warn!("Some data could not be loaded: {:?}", failed);
                Ok(())
            }
            ScreenStatus::Failed => {
                let err = report
                    .error(self.session.language)
                    .map(|e| anyhow!("{} ({})", e.message, e.detail.unwrap_or_default()))
                    .unwrap_or_else(|| anyhow!("load failed"));
                Err(err)
            }
        }
    }

    async fn animal(&self, query: &str) -> Result<Animal> {
        self.stores.animals.ensure_loaded().await?;
        let animals = self.stores.animals.items();
        resolve_animal(&animals, query)
            .cloned()
            .ok_or_else(|| anyhow!("No animal matches '{}'", query))
    }
}

pub async fn run(command: Commands, ctx: &Ctx<'_>) -> Result<()> {
    match command {
        Commands::Animals { search } => animals(ctx, search).await,
        Commands::Alerts { action } => alerts(ctx, action).await,
        Commands::Inventory { tab, search, action } => {
            let mut screen = InventoryScreen::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            screen.tab = tab;
            screen.search = search.unwrap_or_default();
            inventory(ctx, screen, action).await
        }
        Commands::Tasks { tab, action } => {
            let mut screen = TaskScreen::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            screen.tab = tab;
            tasks(ctx, screen, action).await
        }
        Commands::Meds { action } => meds(ctx, action).await,
        Commands::Feeding { action } => feeding(ctx, action).await,
        Commands::SharedLogs => shared_logs(ctx).await,
        Commands::Log(args) => daily_log(ctx, args).await,
        Commands::Sos { animal, message } => {
            let animal = ctx.animal(&animal).await?;
            let dashboard = ZookeeperDashboard::new(ctx.stores.clone(), ctx.session.clone());
            let mut dialog = dashboard.sos_dialog();
            ctx.check(dialog.load().await)?;
            dialog.animal_id = animal.id;
            dialog.message = message;
            ctx.say(dialog.send().await?);
            Ok(())
        }
        Commands::Export { kind, format, out } => export(ctx, kind, format, &out).await,
        Commands::Notifications { action } => notifications(ctx, action).await,
    }
}

// =========================================================================
// Listings
// =========================================================================

async fn animals(ctx: &Ctx<'_>, search: Option<String>) -> Result<()> {
    let mut dashboard = ZookeeperDashboard::new(ctx.stores.clone(), ctx.session.clone());
    ctx.check(dashboard.load().await)?;
    dashboard.search = search.unwrap_or_default();
    for a in dashboard.animals() {
        println!(
            "{:<6} {:<12} {:<12} {:<10} {}",
            a.id,
            a.name,
            a.species,
            a.health,
            a.enclosure.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn alerts(ctx: &Ctx<'_>, action: Option<AlertAction>) -> Result<()> {
    let dashboard = ZookeeperDashboard::new(ctx.stores.clone(), ctx.session.clone());
    ctx.check(dashboard.load().await)?;
    match action {
        Some(AlertAction::Dismiss { id }) => ctx.say(dashboard.dismiss_alert(&id).await?),
        None => {
            for a in dashboard.active_alerts() {
                println!(
                    "{:<10} [{}] {} ({})",
                    a.id,
                    a.kind,
                    a.message,
                    a.location.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

async fn shared_logs(ctx: &Ctx<'_>) -> Result<()> {
    let screen = SharedLogsScreen::new(ctx.stores.clone(), ctx.session.clone());
    ctx.check(screen.load().await)?;
    for log in screen.logs() {
        let animal = log.animal.as_ref().map_or("Unknown", |a| a.name.as_str());
        println!(
            "{} {} by {}: {}",
            log.observation.created_at.as_deref().unwrap_or("-"),
            animal,
            log.observation.submitted_by.as_deref().unwrap_or("-"),
            log.observation.note()
        );
    }
    Ok(())
}

// =========================================================================
// Inventory and feeding
// =========================================================================

async fn inventory(ctx: &Ctx<'_>, mut screen: InventoryScreen, action: Option<InventoryAction>) -> Result<()> {
    match action {
        Some(InventoryAction::Add {
            name,
            category,
            quantity,
            unit,
            min_threshold,
            cost,
            supplier,
            expiry,
        }) => {
            screen.draft = InventoryDraft {
                name,
                category,
                quantity,
                unit,
                min_threshold,
                cost,
                supplier,
                expiry_date: expiry,
            };
            ctx.say(screen.save().await?);
        }
        Some(InventoryAction::Restock { id, amount }) => ctx.say(screen.restock(&id, amount).await?),
        Some(InventoryAction::Delete { id }) => ctx.say(screen.delete(&id).await?),
        None => {
            let badges = screen.badges();
            println!(
                "all {} | food {} | medicine {} | low {}",
                badges.all, badges.food, badges.medicine, badges.low
            );
            for i in screen.items() {
                let flag = if i.is_low_stock() { " LOW" } else { "" };
                println!("{:<8} {:<28} {} {}{}", i.id, i.name, i.quantity, i.unit, flag);
            }
            println!("Total value: {}", format_rupees(screen.total_value()));
        }
    }
    Ok(())
}

async fn feeding(ctx: &Ctx<'_>, action: Option<FeedingAction>) -> Result<()> {
    let mut dashboard = OfficerDashboard::new(ctx.stores.clone(), ctx.session.clone());
    ctx.check(dashboard.load().await)?;
    match action {
        Some(FeedingAction::Add {
            animal,
            feed_type,
            amount,
            cost,
        }) => {
            let animal = ctx.animal(&animal).await?;
            dashboard.draft = FeedingDraft {
                animal_id: animal.id,
                feed_type,
                amount,
                ..Default::default()
            };
            dashboard.set_cost(&cost)?;
            ctx.say(dashboard.add_feeding().await?);
        }
        Some(FeedingAction::Fed { id }) => ctx.say(dashboard.mark_fed(&id).await?),
        None => {
            for row in dashboard.rows() {
                let name = row.animal.as_ref().map_or("Unknown", |a| a.name.as_str());
                println!(
                    "{:<10} {:<10} {:<14} {:<8} {:<10} {}",
                    row.record.id,
                    name,
                    row.record.feed_type,
                    row.record.amount.as_deref().unwrap_or("-"),
                    format_rupees(row.record.cost),
                    row.record.status.as_str()
                );
            }
            println!("Total cost: {}", format_rupees(dashboard.total_cost()));
        }
    }
    Ok(())
}

// =========================================================================
// Tasks and medications
// =========================================================================

async fn tasks(ctx: &Ctx<'_>, mut screen: TaskScreen, action: Option<TaskAction>) -> Result<()> {
    match action {
        Some(TaskAction::Create {
            title,
            assignee,
            due,
            priority,
            description,
            animal,
        }) => {
            let animal_id = match animal {
                Some(q) => Some(ctx.animal(&q).await?.id),
                None => None,
            };
            screen.draft = TaskDraft {
                title,
                description,
                assigned_to: assignee,
                animal_id,
                priority,
                due_date: due,
                ..Default::default()
            };
            ctx.say(screen.create().await?);
        }
        Some(TaskAction::Status { id, status }) => ctx.say(screen.change_status(&id, status).await?),
        Some(TaskAction::Comment { id, text }) => ctx.say(screen.add_comment(&id, &text).await?),
        Some(TaskAction::Delete { id }) => ctx.say(screen.delete(&id).await?),
        None => {
            let counts = screen.counts();
            println!(
                "total {} | pending {} | in progress {} | completed {}",
                counts.total, counts.pending, counts.in_progress, counts.completed
            );
            let overdue: Vec<String> = screen.overdue(Utc::now()).into_iter().map(|t| t.id).collect();
            for t in screen.tasks() {
                let flag = if overdue.contains(&t.id) { " OVERDUE" } else { "" };
                println!(
                    "{:<10} [{}] {:<32} -> {} due {}{}",
                    t.id,
                    t.status,
                    t.title,
                    t.assigned_to,
                    t.due_date,
                    flag
                );
            }
        }
    }
    Ok(())
}

async fn meds(ctx: &Ctx<'_>, action: Option<MedAction>) -> Result<()> {
    let mut screen = MedicationScreen::new(ctx.stores.clone(), ctx.session.clone());
    ctx.check(screen.load().await)?;
    match action {
        Some(MedAction::Prescribe {
            animal,
            name,
            dosage,
            frequency,
            start,
            end,
            purpose,
            notes,
        }) => {
            let animal = ctx.animal(&animal).await?;
            screen.draft = MedicationDraft {
                animal_id: animal.id,
                medication_name: name,
                dosage,
                frequency,
                start_date: start,
                end_date: end,
                purpose,
                notes,
                ..Default::default()
            };
            ctx.say(screen.prescribe().await?);
        }
        Some(MedAction::Administer { id, notes }) => ctx.say(screen.log_administration(&id, &notes).await?),
        Some(MedAction::Status { id, status }) => ctx.say(screen.change_status(&id, status).await?),
        Some(MedAction::Outcome { id, outcome, notes }) => {
            ctx.say(screen.record_outcome(ctx.prefs, &id, outcome, &notes)?)
        }
        None => {
            println!("Active:");
            for m in screen.active() {
                println!(
                    "  {:<8} {:<28} {} {} ({} doses)",
                    m.id,
                    m.medication_name,
                    m.dosage,
                    m.frequency,
                    m.administration_count()
                );
            }
            println!("Finished:");
            for m in screen.finished() {
                println!("  {:<8} {:<28} {}", m.id, m.medication_name, m.status);
            }
        }
    }
    Ok(())
}

// =========================================================================
// Daily log
// =========================================================================

fn upload(path: &Path) -> Result<Upload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Upload::from_path_bytes(&name, bytes))
}

async fn daily_log(ctx: &Ctx<'_>, args: LogArgs) -> Result<()> {
    let animal = ctx.animal(&args.animal).await?;
    let mut screen = DailyLogScreen::new(ctx.stores.clone(), ctx.session.clone(), animal);
    ctx.check(screen.load().await)?;

    screen.form.health = args.health;
    screen.form.mood = args.mood;
    screen.form.appetite = args.appetite;
    screen.form.movement = args.movement;
    screen.form.injuries = args.injuries;
    screen.form.animal_image = args.image.as_deref().map(upload).transpose()?;
    screen.form.gate_image = args.gate_image.as_deref().map(upload).transpose()?;
    screen.form.video = args.video.as_deref().map(upload).transpose()?;
    for user_id in &args.share {
        screen.toggle_share(user_id);
    }
    if let Some(text) = &args.text {
        screen.set_observation_text(text)?;
    }

    if let Some(path) = &args.audio {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        screen.start_recording()?;
        screen.stop_recording(AudioClip::new(bytes))?;
        ctx.say(screen.transcribe().await?);
        println!("{}", screen.form.general_text());
    }

    ctx.say(screen.submit().await?);
    if let Some(processed) = screen.processed() {
        println!("{}", serde_json::to_string_pretty(processed)?);
    }
    Ok(())
}

// =========================================================================
// Export
// =========================================================================

async fn export(ctx: &Ctx<'_>, kind: ExportKind, format: ExportFormat, out: &Path) -> Result<()> {
    let (csv, report) = match kind {
        ExportKind::Animals => {
            ctx.stores.animals.ensure_loaded().await?;
            let all = ctx.stores.animals.items();
            let visible: Vec<Animal> = visible_animals(&all, &ctx.session.user).into_iter().cloned().collect();
            (to_csv(&animal_records(&visible)), health_report(&visible))
        }
        ExportKind::Feeding => {
            let screen = OfficerDashboard::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            (screen.export_csv(), screen.feeding_report())
        }
        ExportKind::Inventory => {
            let screen = InventoryScreen::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            (screen.export_csv(), screen.report())
        }
        ExportKind::Tasks => {
            let screen = TaskScreen::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            (screen.export_csv(), screen.report())
        }
        ExportKind::Medications => {
            let screen = MedicationScreen::new(ctx.stores.clone(), ctx.session.clone());
            ctx.check(screen.load().await)?;
            (screen.export_csv(), screen.report(ctx.prefs)?)
        }
    };

    let today = Utc::now().date_naive();
    let bytes = match format {
        ExportFormat::Csv => csv
            .map_err(|_| anyhow!(Message::NoDataToExport.text(ctx.session.language)))?
            .into_bytes(),
        ExportFormat::Pdf => {
            let generated = today.format("%d/%m/%Y").to_string();
            render_pdf(&report, &generated, &PageLayout::default())
        }
    };
    let file_name = export_file_name(kind.file_prefix(), today, format);
    let path = save_export(out, &file_name, &bytes)?;
    println!("{}", path.display());
    Ok(())
}

// =========================================================================
// Notifications
// =========================================================================

async fn notifications(ctx: &Ctx<'_>, action: NotificationAction) -> Result<()> {
    let mut center = NotificationCenter::new(ctx.prefs, Arc::new(TracingSink::default()), ctx.session.language)?;
    match action {
        NotificationAction::Show => {
            let prefs = center.preferences();
            println!("permission: {:?}", center.permission());
            println!("enabled: {}", prefs.enabled);
            for category in NotificationCategory::ALL {
                println!("  {:<10} {}", category, prefs.category_enabled(category));
            }
        }
        NotificationAction::Enable => {
            if center.preferences().enabled {
                ctx.say(Message::NotificationsEnabled);
            } else {
                ctx.say(center.toggle()?);
            }
        }
        NotificationAction::Disable => {
            if center.preferences().enabled {
                ctx.say(center.toggle()?);
            } else {
                ctx.say(Message::NotificationsDisabled);
            }
        }
        NotificationAction::Set { category, on } => {
            center.update_preference(category, on)?;
            ctx.say(Message::ItemSaved);
        }
        NotificationAction::Test { category } => ctx.say(center.send_test(category)),
        NotificationAction::Remind => {
            let sources = [Collection::Alerts, Collection::Inventory, Collection::Tasks];
            ctx.check(load_sources(&ctx.stores, &sources).await)?;
            let shown = center.dispatch_reminders(
                &ctx.stores.alerts.items(),
                &ctx.stores.inventory.items(),
                &ctx.stores.tasks.items(),
                Utc::now(),
            );
            println!("{} reminders delivered", shown);
        }
    }
    Ok(())
}
