//! Profile and token commands.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};

use encore_core::models::UpdateProfileRequest;
use encore_core::{UserApi, UserId};

use crate::commands::print_user;
use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UsersSubcommand {
    /// Show your profile
    Profile(ProfileArgs),

    /// Change fields of your profile
    UpdateProfile(UpdateProfileArgs),

    /// Show another user's public profile
    Get(GetArgs),

    /// Exchange the current token for a fresh one
    RefreshToken,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateProfileArgs {
    #[arg(long)]
    pub nickname: Option<String>,

    #[arg(long)]
    pub instagram_id: Option<String>,

    #[arg(long)]
    pub band_name: Option<String>,

    #[arg(long)]
    pub profile_image_url: Option<String>,

    #[arg(long)]
    pub representative_video_url: Option<String>,

    /// Comma-separated genres
    #[arg(long)]
    pub favorite_genres: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    pub id: UserId,

    /// Print the profile as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: UsersCommand, ctx: &CliContext) -> Result<()> {
    match cmd.command {
        UsersSubcommand::Profile(args) => profile(args, ctx).await,
        UsersSubcommand::UpdateProfile(args) => update_profile(args, ctx).await,
        UsersSubcommand::Get(args) => get(args, ctx).await,
        UsersSubcommand::RefreshToken => refresh_token(ctx).await,
    }
}

async fn profile(args: ProfileArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let user = ctx
        .gateway
        .profile()
        .await
        .context("Failed to load profile")?;

    if args.json {
        output::json_pretty(&user)
    } else {
        print_user(&user);
        Ok(())
    }
}

async fn update_profile(args: UpdateProfileArgs, ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    let request = UpdateProfileRequest {
        nickname: args.nickname,
        instagram_id: args.instagram_id,
        band_name: args.band_name,
        profile_image_url: args.profile_image_url,
        representative_video_url: args.representative_video_url,
        favorite_genres: args.favorite_genres,
        bio: args.bio,
    };
    if request.is_empty() {
        bail!("Nothing to update. Pass at least one profile field.");
    }

    let user = ctx
        .gateway
        .update_profile(&request)
        .await
        .context("Failed to update profile")?;

    output::success("Profile updated");
    print_user(&user);
    Ok(())
}

async fn get(args: GetArgs, ctx: &CliContext) -> Result<()> {
    let user = ctx
        .gateway
        .user(args.id)
        .await
        .context("Failed to load user")?;

    if args.json {
        output::json_pretty(&user)
    } else {
        print_user(&user);
        Ok(())
    }
}

async fn refresh_token(ctx: &CliContext) -> Result<()> {
    ctx.require_session()?;
    output::note("Refreshing token...");

    let auth = ctx
        .gateway
        .refresh_token()
        .await
        .context("Failed to refresh token")?;
    ctx.session.set_auth(auth);

    output::success("Token refreshed");
    Ok(())
}
