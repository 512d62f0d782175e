//! Account and session commands.

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::{Args, Subcommand, ValueEnum};

use encore_core::models::Role;
use encore_core::validation::{self, SignUpForm};
use encore_core::{AuthApi, Credentials, SessionStatus, TokenStatus};

use crate::commands::print_user;
use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Create an account and sign in
    Signup(SignupArgs),

    /// Sign in and store the session
    Signin(SigninArgs),

    /// Email a verification code
    SendVerification(SendVerificationArgs),

    /// Confirm an email address with a verification code
    Verify(VerifyArgs),

    /// Clear the stored session
    Logout,

    /// Display the signed-in user
    Whoami(WhoamiArgs),

    /// Display the session state and token expiry
    Status,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RoleArg {
    User,
    Performer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::User => Role::User,
            RoleArg::Performer => Role::Performer,
        }
    }
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// Display name
    #[arg(long)]
    pub name: String,

    #[arg(long, value_enum, default_value_t = RoleArg::User)]
    pub role: RoleArg,
}

#[derive(Args, Debug)]
pub struct SigninArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct SendVerificationArgs {
    #[arg(long)]
    pub email: String,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[arg(long)]
    pub email: String,

    /// Code received by email
    #[arg(long)]
    pub code: String,
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn handle(cmd: AuthCommand, ctx: &CliContext) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Signup(args) => signup(args, ctx).await,
        AuthSubcommand::Signin(args) => signin(args, ctx).await,
        AuthSubcommand::SendVerification(args) => send_verification(args, ctx).await,
        AuthSubcommand::Verify(args) => verify(args, ctx).await,
        AuthSubcommand::Logout => logout(ctx),
        AuthSubcommand::Whoami(args) => whoami(args, ctx),
        AuthSubcommand::Status => status(ctx),
    }
}

async fn signup(args: SignupArgs, ctx: &CliContext) -> Result<()> {
    let form = SignUpForm {
        confirm_password: args.confirm_password.unwrap_or_else(|| args.password.clone()),
        email: args.email,
        password: args.password,
        name: args.name,
        role: args.role.into(),
    };
    let request = validation::sign_up(&form)?;

    output::note("Creating account...");
    let auth = ctx
        .gateway
        .sign_up(&request)
        .await
        .context("Failed to sign up")?;
    ctx.session.set_auth(auth);

    output::success("Account created");
    if let Some(user) = ctx.session.user() {
        print_user(&user);
    }
    Ok(())
}

async fn signin(args: SigninArgs, ctx: &CliContext) -> Result<()> {
    let credentials = Credentials::new(&args.email, args.password);
    let request = validation::sign_in(&credentials)?;

    output::note("Signing in...");
    let auth = ctx
        .gateway
        .sign_in(&request)
        .await
        .context("Failed to sign in")?;
    ctx.session.set_auth(auth);

    output::success("Signed in successfully");
    if let Some(user) = ctx.session.user() {
        output::field("Name", user.display_name());
        output::field("Email", &user.email);
    }
    Ok(())
}

async fn send_verification(args: SendVerificationArgs, ctx: &CliContext) -> Result<()> {
    let email = args.email.trim();
    ctx.gateway
        .send_verification_email(email)
        .await
        .context("Failed to send verification email")?;
    output::success(&format!("Verification code sent to {}", email));
    Ok(())
}

async fn verify(args: VerifyArgs, ctx: &CliContext) -> Result<()> {
    let request = validation::email_verification(&args.email, &args.code)?;
    ctx.gateway
        .verify_email(&request)
        .await
        .context("Failed to verify email")?;
    output::success("Email verified");
    Ok(())
}

fn logout(ctx: &CliContext) -> Result<()> {
    if ctx.session.logout() {
        output::success("Signed out");
    } else {
        output::note("No active session.");
    }
    Ok(())
}

fn whoami(args: WhoamiArgs, ctx: &CliContext) -> Result<()> {
    let user = ctx.require_session()?;

    if args.json {
        output::json_pretty(&user)?;
    } else {
        print_user(&user);
    }
    Ok(())
}

fn status(ctx: &CliContext) -> Result<()> {
    let state = match ctx.session.status() {
        SessionStatus::Authenticated => "authenticated",
        SessionStatus::Unauthenticated => "unauthenticated",
        SessionStatus::Loading => "loading",
    };
    output::field("Session", state);

    if let Some(token) = ctx.session.token() {
        let expiry = match ctx.session.inspector().inspect(token.as_str()) {
            TokenStatus::Valid {
                expires_at: Some(at),
            } => format_timestamp(at),
            TokenStatus::Valid { expires_at: None } => "never".to_string(),
            TokenStatus::Expired { expired_at } => {
                format!("{} (expired)", format_timestamp(expired_at))
            }
            TokenStatus::Malformed => "unreadable".to_string(),
        };
        output::field("Token expires", &expiry);
    }
    if let Some(user) = ctx.session.user() {
        output::field("Email", &user.email);
    }
    Ok(())
}

fn format_timestamp(seconds: i64) -> String {
    DateTime::from_timestamp(seconds, 0)
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| seconds.to_string())
}
