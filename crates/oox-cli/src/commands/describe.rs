//! Describe command implementation.

use super::resolve::resolve_ranking;
use crate::cli::DescribeArgs;
use crate::client::{DescribeBody, OoxClient};
use crate::config::Config;
use crate::error::Result;
use crate::input::{parse_tier_overrides, QuizResults};
use crate::output::Formatter;
use oox_domain::assign_tiers;

/// Execute the describe command.
pub async fn execute_describe(
    args: DescribeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let overrides = parse_tier_overrides(&args.tiers)?;
    let results = QuizResults::read(&args.file)?;

    let ranking = resolve_ranking(&results, formatter)?;
    let body = DescribeBody::new(
        &assign_tiers(&ranking, &overrides),
        &results.health_statuses(),
    );

    let client = OoxClient::new(args.server.as_deref().unwrap_or(&config.server_url));
    let job_id = client.submit(&body).await?;
    eprintln!(
        "{}",
        formatter.info(&format!("Job {} submitted to {}", job_id, client.base_url()))
    );

    let narrative = client.wait_for(&job_id, config.poll_interval()).await?;
    println!("{}", formatter.format_narrative(&narrative)?);
    Ok(())
}
