//! Mint a shop session token for local development and scripted API calls.
//! In production tokens come from the shop's authentication flow.
//!
//! Usage: issue-token --shop demo-shop.myshopify.com [--ttl-seconds 3600]
//!   JWT_SECRET must match the one the API runs with.

use clap::Parser;

use countdown_api::middleware::session::issue_session_token;

#[derive(Parser)]
#[command(name = "issue-token", about = "Issue a session token for a shop")]
struct Args {
    /// Shop domain the token is scoped to
    #[arg(long)]
    shop: String,

    /// Token lifetime (defaults to JWT_EXPIRY_SECONDS, then one day)
    #[arg(long)]
    ttl_seconds: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| anyhow::anyhow!("Missing required env var: JWT_SECRET"))?;
    let ttl = match args.ttl_seconds {
        Some(ttl) => ttl,
        None => std::env::var("JWT_EXPIRY_SECONDS")
            .unwrap_or_else(|_| "86400".into())
            .parse()?,
    };

    let token = issue_session_token(&args.shop.to_lowercase(), &secret, ttl)?;
    println!("{token}");
    Ok(())
}
