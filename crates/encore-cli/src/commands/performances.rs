//! Performance commands.

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, Months, NaiveDate};
use clap::{Args, Subcommand};

use encore_core::models::{
    CalendarEvent, CreatePerformanceRequest, Performance, SearchFilters,
    UpdatePerformanceRequest,
};
use encore_core::{PerformanceApi, PerformanceCatalog, PerformanceId, validation};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct PerformancesCommand {
    #[command(subcommand)]
    pub command: PerformancesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PerformancesSubcommand {
    /// List all performances
    List(ListArgs),

    /// Search performances by keyword, genre or band
    Search(SearchArgs),

    /// Show performances on a calendar
    Calendar(CalendarArgs),

    /// List performances you created
    Mine(ListArgs),

    /// Create a performance
    Create(CreateArgs),

    /// Update fields of a performance
    Update(UpdateArgs),

    /// Delete a performance
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show up to N performances after today
    #[arg(long, value_name = "N")]
    pub upcoming: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Match title, description, band or venue
    #[arg(long)]
    pub keyword: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub band: Option<String>,

    /// Filter the full listing locally instead of asking the server
    #[arg(long)]
    pub local: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// First day (YYYY-MM-DD), defaults to the first of this month
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day (YYYY-MM-DD), defaults to the end of the month of --from
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only show one day
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub on: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,

    /// Description
    #[arg(long)]
    pub content: String,

    #[arg(long)]
    pub genre: String,

    #[arg(long)]
    pub band: String,

    #[arg(long)]
    pub venue: String,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,

    /// Start time (HH:MM)
    #[arg(long)]
    pub start: String,

    /// End time (HH:MM)
    #[arg(long)]
    pub end: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: PerformanceId,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub band: Option<String>,

    #[arg(long)]
    pub venue: Option<String>,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: PerformanceId,
}

pub async fn handle(cmd: PerformancesCommand, ctx: &CliContext) -> Result<()> {
    match cmd.command {
        PerformancesSubcommand::List(args) => list(args, ctx).await,
        PerformancesSubcommand::Search(args) => search(args, ctx).await,
        PerformancesSubcommand::Calendar(args) => calendar(args, ctx).await,
        PerformancesSubcommand::Mine(args) => mine(args, ctx).await,
        PerformancesSubcommand::Create(args) => create(args, ctx).await,
        PerformancesSubcommand::Update(args) => update(args, ctx).await,
        PerformancesSubcommand::Delete(args) => delete(args, ctx).await,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_listing(performances: Vec<Performance>, args: &ListArgs) -> Result<()> {
    let mut catalog = PerformanceCatalog::new();
    catalog.set_performances(performances);

    match args.upcoming {
        Some(limit) => {
            let upcoming: Vec<&Performance> = catalog.upcoming(today(), limit);
            output::json_lines(&upcoming, args.pretty, "No upcoming performances.")
        }
        None => output::json_lines(catalog.performances(), args.pretty, "No performances found."),
    }
}

async fn list(args: ListArgs, ctx: &CliContext) -> Result<()> {
    let performances = ctx
        .gateway
        .list_performances()
        .await
        .context("Failed to list performances")?;
    print_listing(performances, &args)
}

async fn mine(args: ListArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let performances = ctx
        .gateway
        .my_performances()
        .await
        .context("Failed to list your performances")?;
    print_listing(performances, &args)
}

async fn search(args: SearchArgs, ctx: &CliContext) -> Result<()> {
    let filters = SearchFilters {
        keyword: args.keyword,
        genre: args.genre,
        band_name: args.band,
    };

    let mut catalog = PerformanceCatalog::new();
    if args.local {
        let all = ctx
            .gateway
            .list_performances()
            .await
            .context("Failed to list performances")?;
        catalog.set_performances(all);
        let found = catalog.filter_local(&filters);
        catalog.set_search_filters(filters);
        catalog.set_filtered(found);
    } else {
        let found = ctx
            .gateway
            .search_performances(&filters)
            .await
            .context("Failed to search performances")?;
        catalog.set_search_filters(filters);
        catalog.set_filtered(found);
    }

    output::json_lines(catalog.filtered(), args.pretty, "No matching performances.")
}

fn month_end(start: NaiveDate) -> NaiveDate {
    start
        .with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(start)
}

async fn calendar(args: CalendarArgs, ctx: &CliContext) -> Result<()> {
    let (start, end) = match (args.on, args.from, args.to) {
        (Some(day), _, _) => (day, day),
        (None, from, to) => {
            let start = from.unwrap_or_else(|| today().with_day(1).unwrap_or_else(today));
            (start, to.unwrap_or_else(|| month_end(start)))
        }
    };
    if end < start {
        bail!("--to must not be before --from");
    }

    let performances = ctx
        .gateway
        .performances_between(start, end)
        .await
        .context("Failed to load calendar")?;

    let mut catalog = PerformanceCatalog::new();
    catalog.set_performances(performances);
    let events = match args.on {
        Some(day) => catalog.events_on(day),
        None => catalog.calendar_events(),
    };

    if events.is_empty() {
        output::note(&format!("No performances between {} and {}.", start, end));
        return Ok(());
    }
    for event in &events {
        print_event(event);
    }
    Ok(())
}

fn print_event(event: &CalendarEvent) {
    println!(
        "{}  {}  {} @ {} ({}, {}) #{}",
        event.date, event.time, event.title, event.venue, event.band_name, event.genre, event.id
    );
}

async fn create(args: CreateArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let request = CreatePerformanceRequest {
        title: args.title,
        content: args.content,
        genre: args.genre,
        band_name: args.band,
        venue: args.venue,
        performance_date: args.date,
        start_time: args.start,
        end_time: args.end,
    };
    validation::new_performance(&request, today())?;

    let performance = ctx
        .gateway
        .create_performance(&request)
        .await
        .context("Failed to create performance")?;

    output::success("Performance created");
    output::field("ID", &performance.id.to_string());
    output::field("Title", &performance.title);
    output::field("Date", &performance.performance_date);
    Ok(())
}

async fn update(args: UpdateArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let request = UpdatePerformanceRequest {
        title: args.title,
        content: args.content,
        genre: args.genre,
        band_name: args.band,
        venue: args.venue,
        performance_date: args.date,
        start_time: args.start,
        end_time: args.end,
    };
    validation::performance_update(&request, today())?;

    let performance = ctx
        .gateway
        .update_performance(args.id, &request)
        .await
        .context("Failed to update performance")?;

    output::success("Performance updated");
    output::field("ID", &performance.id.to_string());
    output::field("Title", &performance.title);
    Ok(())
}

async fn delete(args: DeleteArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    ctx.gateway
        .delete_performance(args.id)
        .await
        .context("Failed to delete performance")?;
    output::success(&format!("Performance {} deleted", args.id));
    Ok(())
}
