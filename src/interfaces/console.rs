//! Interactive console front-end
//!
//! Two menus: the main menu (register, login, open) and, once logged in,
//! the user menu. Service failures are reported through the [`Notifier`]
//! and never end the loop; only `0` in the main menu or end of input does.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::errors::{Result, ShortlinkError};
use crate::interfaces::format_ttl;
use crate::runtime::lifetime::startup::AppContext;
use crate::system::Notifier;

enum MenuAction {
    Continue,
    Leave,
}

pub struct ConsoleRunner<'a, R: BufRead, W: Write> {
    ctx: &'a AppContext,
    notifier: Arc<dyn Notifier>,
    input: R,
    output: W,
}

impl<'a> ConsoleRunner<'a, io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(ctx: &'a AppContext, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(ctx, notifier, io::stdin().lock(), io::stdout())
    }
}

impl<'a, R: BufRead, W: Write> ConsoleRunner<'a, R, W> {
    pub fn new(ctx: &'a AppContext, notifier: Arc<dyn Notifier>, input: R, output: W) -> Self {
        Self {
            ctx,
            notifier,
            input,
            output,
        }
    }

    /// Run until the user exits or input is exhausted.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== Short links ===")?;
            writeln!(self.output, "1. Register new user")?;
            writeln!(self.output, "2. Log in with UUID")?;
            writeln!(self.output, "3. Open short link")?;
            writeln!(self.output, "0. Exit")?;

            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "1" => self.register()?,
                "2" => {
                    if let Some(user_id) = self.login()? {
                        if let MenuAction::Leave = self.user_menu(user_id)? {
                            return Ok(());
                        }
                    }
                }
                "3" => self.open_link()?,
                "0" => {
                    writeln!(self.output, "Bye.")?;
                    return Ok(());
                }
                _ => self.notifier.warning("Unknown option."),
            }
        }
    }

    /// `Leave` means input ran out and the whole console should stop.
    fn user_menu(&mut self, user_id: Uuid) -> io::Result<MenuAction> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== User {} ===", user_id)?;
            writeln!(self.output, "1. Create short link")?;
            writeln!(self.output, "2. My links")?;
            writeln!(self.output, "3. Edit link")?;
            writeln!(self.output, "4. Delete link")?;
            writeln!(self.output, "5. Open short link")?;
            writeln!(self.output, "0. Log out")?;

            let Some(choice) = self.prompt("Choose: ")? else {
                return Ok(MenuAction::Leave);
            };
            let step = match choice.as_str() {
                "1" => self.create_link(user_id),
                "2" => self.list_links(user_id),
                "3" => self.update_link(user_id),
                "4" => self.delete_link(user_id),
                "5" => self.open_link(),
                "0" => return Ok(MenuAction::Continue),
                _ => {
                    self.notifier.warning("Unknown option.");
                    Ok(())
                }
            };
            step?;
        }
    }

    fn register(&mut self) -> io::Result<()> {
        match self.ctx.user_service.register_new_user() {
            Ok(account) => {
                writeln!(self.output, "Your UUID: {}", account.id)?;
                writeln!(
                    self.output,
                    "Store it safely - it is the only way to manage your links."
                )?;
            }
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn login(&mut self) -> io::Result<Option<Uuid>> {
        let Some(raw) = self.prompt("UUID: ")? else {
            return Ok(None);
        };
        match self.ctx.user_service.login(&raw) {
            Ok(account) => {
                self.notifier.info("Logged in.");
                Ok(Some(account.id))
            }
            Err(e) => {
                self.report(&e);
                Ok(None)
            }
        }
    }

    fn open_link(&mut self) -> io::Result<()> {
        let Some(raw) = self.prompt("Short link: ")? else {
            return Ok(());
        };
        match self.ctx.link_service.visit(&raw) {
            Ok(outcome) => {
                if let Some(url) = outcome.destination() {
                    writeln!(self.output, "-> {}", url)?;
                }
            }
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn create_link(&mut self, user_id: Uuid) -> io::Result<()> {
        let Some(url) = self.prompt("Original URL: ")? else {
            return Ok(());
        };
        let Some(raw_limit) = self.prompt("Visit limit: ")? else {
            return Ok(());
        };

        let created = parse_limit(&raw_limit).and_then(|limit| {
            self.ctx
                .link_service
                .create_short_link(user_id, &url, limit)
        });
        match created {
            Ok(link) => {
                writeln!(
                    self.output,
                    "Short link: {}",
                    self.ctx.link_service.to_full_short_url(&link.code)
                )?;
            }
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn list_links(&mut self, user_id: Uuid) -> io::Result<()> {
        let links = self.ctx.link_service.list_links(user_id);
        if links.is_empty() {
            writeln!(self.output, "No links yet.")?;
            return Ok(());
        }

        let now = Utc::now();
        for link in &links {
            writeln!(
                self.output,
                "{} -> {} | visits {}/{} | ttl {}",
                self.ctx.link_service.to_full_short_url(&link.code),
                link.original_url,
                link.visit_count,
                link.max_visits,
                format_ttl(now, link)
            )?;
        }
        Ok(())
    }

    fn update_link(&mut self, user_id: Uuid) -> io::Result<()> {
        let Some(raw) = self.prompt("Short link: ")? else {
            return Ok(());
        };
        let Some(raw_limit) = self.prompt("New visit limit (empty to keep): ")? else {
            return Ok(());
        };
        let Some(raw_refresh) = self.prompt("Restart TTL? (y/N): ")? else {
            return Ok(());
        };

        let max_visits = if raw_limit.is_empty() {
            Ok(None)
        } else {
            parse_limit(&raw_limit).map(Some)
        };
        let refresh = matches!(raw_refresh.to_ascii_lowercase().as_str(), "y" | "yes");

        let updated = max_visits.and_then(|limit| {
            self.ctx
                .link_service
                .update_short_link(user_id, &raw, limit, refresh)
        });
        match updated {
            Ok(link) => self.notifier.info(&format!(
                "Link {} updated: limit {}, ttl {}",
                link.code,
                link.max_visits,
                format_ttl(Utc::now(), &link)
            )),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    fn delete_link(&mut self, user_id: Uuid) -> io::Result<()> {
        let Some(raw) = self.prompt("Short link: ")? else {
            return Ok(());
        };
        match self.ctx.link_service.delete_short_link(user_id, &raw) {
            Ok(true) => self.notifier.info("Link removed."),
            Ok(false) => self.notifier.warning("Short link not found."),
            Err(e) => self.report(&e),
        }
        Ok(())
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&self, err: &ShortlinkError) {
        self.notifier.error(err.message());
    }
}

fn parse_limit(raw: &str) -> Result<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ShortlinkError::invalid_input("Visit limit must be a non-negative integer"))
}
