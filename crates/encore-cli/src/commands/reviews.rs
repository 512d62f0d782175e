//! Review commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use encore_core::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use encore_core::{PerformanceId, ReviewApi, ReviewId, validation};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct ReviewsCommand {
    #[command(subcommand)]
    pub command: ReviewsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ReviewsSubcommand {
    /// Review a performance
    Create(CreateArgs),

    /// List reviews of a performance
    List(ListArgs),

    /// List reviews you wrote
    Mine(MineArgs),

    /// Change the rating or text of a review
    Update(UpdateArgs),

    /// Delete a review
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Performance to review
    #[arg(long)]
    pub performance: PerformanceId,

    /// Rating from 1 to 5
    #[arg(long)]
    pub rating: u8,

    #[arg(long)]
    pub content: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub performance: PerformanceId,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct MineArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: ReviewId,

    #[arg(long)]
    pub rating: Option<u8>,

    #[arg(long)]
    pub content: Option<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: ReviewId,
}

pub async fn handle(cmd: ReviewsCommand, ctx: &CliContext) -> Result<()> {
    match cmd.command {
        ReviewsSubcommand::Create(args) => create(args, ctx).await,
        ReviewsSubcommand::List(args) => list(args, ctx).await,
        ReviewsSubcommand::Mine(args) => mine(args, ctx).await,
        ReviewsSubcommand::Update(args) => update(args, ctx).await,
        ReviewsSubcommand::Delete(args) => delete(args, ctx).await,
    }
}

fn print_review(review: &Review) {
    output::field("ID", &review.id.to_string());
    output::field("Performance", &review.performance_id.to_string());
    output::field("Rating", &"★".repeat(usize::from(review.rating)));
    output::field("Review", &review.content);
}

async fn create(args: CreateArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let request = CreateReviewRequest {
        content: args.content,
        rating: args.rating,
        performance_id: args.performance,
    };
    validation::new_review(&request)?;

    let review = ctx
        .gateway
        .create_review(&request)
        .await
        .context("Failed to create review")?;

    output::success("Review posted");
    print_review(&review);
    Ok(())
}

async fn list(args: ListArgs, ctx: &CliContext) -> Result<()> {
    let reviews = ctx
        .gateway
        .reviews_for_performance(args.performance)
        .await
        .context("Failed to list reviews")?;
    output::json_lines(&reviews, args.pretty, "No reviews yet.")
}

async fn mine(args: MineArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let reviews = ctx
        .gateway
        .my_reviews()
        .await
        .context("Failed to list your reviews")?;
    output::json_lines(&reviews, args.pretty, "You have not written any reviews.")
}

async fn update(args: UpdateArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    if args.rating.is_none() && args.content.is_none() {
        bail!("Nothing to update. Pass --rating and/or --content.");
    }
    let request = UpdateReviewRequest {
        content: args.content,
        rating: args.rating,
    };
    validation::review_update(&request)?;

    let review = ctx
        .gateway
        .update_review(args.id, &request)
        .await
        .context("Failed to update review")?;

    output::success("Review updated");
    print_review(&review);
    Ok(())
}

async fn delete(args: DeleteArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    ctx.gateway
        .delete_review(args.id)
        .await
        .context("Failed to delete review")?;
    output::success(&format!("Review {} deleted", args.id));
    Ok(())
}
