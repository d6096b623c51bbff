//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::error::Result;
use crate::input::{parse_tier_overrides, QuizResults};
use crate::output::Formatter;
use crate::repl;
use oox_domain::{assign_tiers, CategoryCode, FinalOrder};

/// Execute the resolve command.
pub fn execute_resolve(args: ResolveArgs, formatter: &Formatter) -> Result<()> {
    let overrides = parse_tier_overrides(&args.tiers)?;
    let results = QuizResults::read(&args.file)?;

    let ranking = resolve_ranking(&results, formatter)?;
    let tiered = assign_tiers(&ranking, &overrides);

    println!(
        "{}",
        formatter.format_ranking(&tiered, &results.health_statuses())?
    );
    Ok(())
}

/// Compute the final order and resolve any conflicts on the terminal.
pub(crate) fn resolve_ranking(
    results: &QuizResults,
    formatter: &Formatter,
) -> Result<Vec<CategoryCode>> {
    let order = FinalOrder::from_matches(&results.matches);
    if order.is_resolved() {
        return Ok(order.into_ranking()?);
    }

    eprintln!(
        "{}",
        formatter.info(&format!(
            "{} conflict block(s) need a manual ranking",
            order.conflict_count()
        ))
    );
    let ranking = repl::resolve_interactively(order, formatter)?;
    eprintln!("{}", formatter.success("All conflicts resolved"));
    Ok(ranking)
}
