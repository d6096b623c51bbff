//! Rank command implementation.

use crate::cli::RankArgs;
use crate::error::Result;
use crate::input::QuizResults;
use crate::output::Formatter;
use oox_domain::FinalOrder;

/// Execute the rank command.
pub fn execute_rank(args: RankArgs, formatter: &Formatter) -> Result<()> {
    let results = QuizResults::read(&args.file)?;
    let order = FinalOrder::from_matches(&results.matches);

    println!("{}", formatter.format_order(order.elements())?);

    let conflicts = order.conflict_count();
    if conflicts > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} conflict block(s) left; run `oox resolve` to rank them",
                conflicts
            ))
        );
    }
    Ok(())
}
