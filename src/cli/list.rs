use anyhow::{Result, bail};

use crate::{
    gmail::GmailSession,
    mailbox::MessageSummary,
    ops,
    sweep::FixedDelay,
};

pub async fn auth_test(session: &GmailSession) -> Result<()> {
    if ops::test_authentication(session).await {
        println!("Authentication successful");
        Ok(())
    } else {
        bail!("authentication failed, check the stored credentials")
    }
}

pub async fn recent(session: &GmailSession, days: u32, max: u32, pacer: FixedDelay) -> Result<()> {
    let summaries = ops::recent_unread(session, days, max, &pacer).await?;
    if summaries.is_empty() {
        println!("No unread messages in the last {days} days");
        return Ok(());
    }
    print_summaries(&summaries);

    Ok(())
}

pub async fn oldest(
    session: &GmailSession,
    limit: usize,
    min_age_days: u32,
    scan_cap: usize,
    pacer: FixedDelay,
) -> Result<()> {
    let summaries = ops::oldest_unread(session, limit, min_age_days, scan_cap, &pacer).await?;
    if summaries.is_empty() {
        println!("No unread messages older than {min_age_days} days");
        return Ok(());
    }
    print_summaries(&summaries);

    Ok(())
}

fn print_summaries(summaries: &[MessageSummary]) {
    for summary in summaries {
        println!(
            "{}  {}  {}  [{}]",
            summary.date().for_display(),
            summary.sender(),
            summary.subject(),
            summary.id(),
        );
    }
    println!("{} message(s)", summaries.len());
}
