use anyhow::{Result, bail};
use log::warn;

use crate::{
    gmail::{Category, GmailSession},
    ops::{self, PurgeRequest},
    sweep::{FixedDelay, Mode, MutateOp, MutationSummary, PurgeOutput, Report},
};

pub struct PurgeArgs {
    pub year: i16,
    pub category: Option<Category>,
    pub unread_only: bool,
    pub op: MutateOp,
    pub execute: bool,
    pub sample_size: u32,
    pub hard_limit: Option<u64>,
}

pub async fn older_than(
    session: &GmailSession,
    days: u32,
    op: MutateOp,
    scan_cap: usize,
    execute: bool,
    pacer: FixedDelay,
) -> Result<()> {
    if !execute {
        let count = ops::count_older_than(session, days, scan_cap, &pacer).await?;
        println!("{count} unread message(s) older than {days} days; rerun with --execute");
        return Ok(());
    }

    let summary = ops::delete_older_than(session, days, op, scan_cap, &pacer).await?;
    print_mutation(&summary)
}

pub async fn purge(session: &GmailSession, args: PurgeArgs, pacer: FixedDelay) -> Result<()> {
    let request = PurgeRequest {
        year: args.year,
        category: args.category,
        unread_only: args.unread_only,
        op: args.op,
        mode: Mode {
            dry_run: !args.execute,
            sample_size: args.sample_size,
            hard_limit: args.hard_limit,
        },
    };

    match ops::mass_purge(session, request, &pacer).await? {
        PurgeOutput::Analysis(report) => print_report(&report),
        PurgeOutput::Purged(summary) => print_mutation(&summary),
    }
}

pub async fn single(session: &GmailSession, id: &str) -> Result<()> {
    ops::delete_message(session, id).await?;
    println!("Deleted {id}");

    Ok(())
}

pub async fn batch(
    session: &GmailSession,
    ids: &[String],
    op: MutateOp,
    pacer: FixedDelay,
) -> Result<()> {
    let summary = ops::delete_batch(session, ids, op, &pacer).await?;
    print_mutation(&summary)
}

fn print_report(report: &Report) -> Result<()> {
    println!("sampled {} message(s)", report.total_sampled);
    if !report.top_senders.is_empty() {
        println!("top senders:");
        for (sender, count) in &report.top_senders {
            println!("  {count:>6}  {sender}");
        }
    }
    if !report.sample_subjects.is_empty() {
        println!("sample subjects:");
        for subject in &report.sample_subjects {
            println!("  {subject}");
        }
    }
    if let Some(error) = &report.error {
        warn!("analysis ended early: {error}");
    }
    println!("dry run only; rerun with --execute to remove matches");

    Ok(())
}

fn print_mutation(summary: &MutationSummary) -> Result<()> {
    println!("attempted: {}", summary.result.attempted());
    println!("removed:   {}", summary.result.succeeded());
    if !summary.result.is_complete() {
        println!("failed:    {}", summary.result.failed_ids().len());
    }
    if let Some(error) = &summary.error {
        bail!("stopped early: {error}");
    }

    Ok(())
}
