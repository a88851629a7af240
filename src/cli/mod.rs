mod list;
mod remove;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};

use crate::{
    config::Config,
    gmail::{self, Category},
    sweep::{FixedDelay, MutateOp},
};

#[derive(Parser)]
#[command(version, about = "Janitor for an unread-heavy remote mailbox")]
pub struct Args {
    /// Alternative config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Verify the stored credentials against the remote mailbox
    AuthTest,
    /// List unread messages received within the last days
    ListRecent {
        #[arg(long, default_value_t = 30)]
        days: u32,
        #[arg(long, default_value_t = 50)]
        max: u32,
    },
    /// List the oldest unread messages past an age floor
    ListOldest {
        #[arg(long, default_value_t = 50)]
        limit: usize,
        #[arg(long, default_value_t = 365)]
        min_age_days: u32,
        /// How many candidates to scan before picking the oldest
        #[arg(long, default_value_t = 1000)]
        scan_cap: usize,
    },
    /// Remove unread messages older than the given age
    DeleteOld {
        #[arg(long)]
        days: u32,
        /// Move to trash instead of deleting permanently
        #[arg(long)]
        trash: bool,
        #[arg(long, default_value_t = 10_000)]
        scan_cap: usize,
        /// Actually remove; without this only the match count is reported
        #[arg(long)]
        execute: bool,
    },
    /// Mass-remove a year of mail by category (dry run unless --execute)
    Purge {
        #[arg(long)]
        year: i16,
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Restrict to unread messages
        #[arg(long)]
        unread: bool,
        #[arg(long)]
        trash: bool,
        #[arg(long)]
        execute: bool,
        /// Dry-run sample size
        #[arg(long, default_value_t = 50)]
        sample: u32,
        /// Stop after this many messages
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Delete a single message by id
    Delete { id: String },
    /// Remove an explicit list of message ids
    BatchDelete {
        #[arg(long)]
        trash: bool,
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn op_for(trash: bool) -> MutateOp {
    if trash { MutateOp::Trash } else { MutateOp::Delete }
}

pub async fn run(args: &Args, config: &Config) -> Result<()> {
    let session = gmail::authenticate(config.auth())
        .await
        .context("could not authenticate to the mail provider")?;
    let pacer = FixedDelay::from_millis(config.pacing_ms());

    match &args.command {
        Command::AuthTest => list::auth_test(&session).await,
        Command::ListRecent { days, max } => list::recent(&session, *days, *max, pacer).await,
        Command::ListOldest {
            limit,
            min_age_days,
            scan_cap,
        } => list::oldest(&session, *limit, *min_age_days, *scan_cap, pacer).await,
        Command::DeleteOld {
            days,
            trash,
            scan_cap,
            execute,
        } => remove::older_than(&session, *days, op_for(*trash), *scan_cap, *execute, pacer).await,
        Command::Purge {
            year,
            category,
            unread,
            trash,
            execute,
            sample,
            limit,
        } => {
            let request = remove::PurgeArgs {
                year: *year,
                category: *category,
                unread_only: *unread,
                op: op_for(*trash),
                execute: *execute,
                sample_size: *sample,
                hard_limit: *limit,
            };
            remove::purge(&session, request, pacer).await
        }
        Command::Delete { id } => remove::single(&session, id).await,
        Command::BatchDelete { trash, ids } => {
            remove::batch(&session, ids, op_for(*trash), pacer).await
        }
    }
}
