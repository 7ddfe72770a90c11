//! One-shot link and user commands

use chrono::Utc;
use colored::Colorize;

use super::CliError;
use crate::interfaces::format_ttl;
use crate::runtime::lifetime::startup::AppContext;
use crate::services::{VisitOutcome, parse_user_id};

pub fn register(ctx: &AppContext) -> Result<(), CliError> {
    let account = ctx.user_service.register_new_user()?;
    println!("{} Your UUID: {}", "✓".bold().green(), account.id.to_string().cyan());
    println!(
        "{} Store it safely - it is the only way to manage your links.",
        "ℹ".bold().blue()
    );
    Ok(())
}

pub fn create_link(
    ctx: &AppContext,
    owner: &str,
    url: &str,
    max_visits: u32,
) -> Result<(), CliError> {
    let owner_id = parse_user_id(owner)?;
    let link = ctx
        .link_service
        .create_short_link(owner_id, url, max_visits)?;
    println!(
        "{} Short link created: {} -> {}",
        "✓".bold().green(),
        ctx.link_service.to_full_short_url(&link.code).cyan(),
        link.original_url.blue().underline()
    );
    println!(
        "{} Expires at: {}",
        "ℹ".bold().blue(),
        link.expires_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .yellow()
    );
    Ok(())
}

pub fn visit_link(ctx: &AppContext, raw: &str) -> Result<(), CliError> {
    match ctx.link_service.visit(raw)? {
        VisitOutcome::Success(link) => {
            println!(
                "{} {} ({}/{})",
                "→".bold().green(),
                link.original_url.blue().underline(),
                link.visit_count,
                link.max_visits
            );
            Ok(())
        }
        // 其余结果已经由 notifier 报告
        _ => Ok(()),
    }
}

pub fn list_links(ctx: &AppContext, owner: &str) -> Result<(), CliError> {
    let owner_id = parse_user_id(owner)?;
    let links = ctx.link_service.list_links(owner_id);

    if links.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    let now = Utc::now();
    println!("{}", "Short link list:".bold().green());
    println!();
    for link in &links {
        println!(
            "  {} -> {} {} {}",
            ctx.link_service.to_full_short_url(&link.code).cyan(),
            link.original_url.blue().underline(),
            format!(
                "(visits: {}/{}, {} left)",
                link.visit_count,
                link.max_visits,
                link.remaining_visits()
            )
            .dimmed()
            .cyan(),
            format!("(ttl: {})", format_ttl(now, link)).dimmed().yellow()
        );
    }
    println!();
    println!(
        "{} Total {} short links",
        "ℹ".bold().blue(),
        links.len().to_string().green()
    );
    Ok(())
}

pub fn delete_link(ctx: &AppContext, owner: &str, raw: &str) -> Result<(), CliError> {
    let owner_id = parse_user_id(owner)?;
    if ctx.link_service.delete_short_link(owner_id, raw)? {
        println!("{} Link removed", "✓".bold().green());
        Ok(())
    } else {
        Err(CliError::CommandError("Link not found".to_string()))
    }
}

pub fn update_link(
    ctx: &AppContext,
    owner: &str,
    raw: &str,
    max_visits: Option<u32>,
    refresh_ttl: bool,
) -> Result<(), CliError> {
    let owner_id = parse_user_id(owner)?;
    let link = ctx
        .link_service
        .update_short_link(owner_id, raw, max_visits, refresh_ttl)?;
    println!(
        "{} Short link updated: {} (limit {}, expires {})",
        "✓".bold().green(),
        link.code.cyan(),
        link.max_visits,
        link.expires_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .yellow()
    );
    Ok(())
}

pub fn sweep(ctx: &AppContext) -> Result<(), CliError> {
    let removed = ctx.link_service.remove_expired()?;
    println!(
        "{} Removed expired links: {}",
        "✓".bold().green(),
        removed.len().to_string().green()
    );
    Ok(())
}
