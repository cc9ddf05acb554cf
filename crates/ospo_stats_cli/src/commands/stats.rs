use ospo_stats::stats::{self, YearlyCount};

use super::{CommandResult, connect};
use crate::StatsAction;

fn render(label: &str, series: &[YearlyCount]) -> String {
    let mut out = format!("{:<6} {:>10} {:>12}\n", "year", label, "cumulative");
    for row in series {
        out.push_str(&format!("{:<6} {:>10} {:>12}\n", row.year, row.count, row.cumulative));
    }
    out
}

pub(crate) async fn handle_stats(action: StatsAction, database_url: &str) -> CommandResult {
    let db = connect(database_url).await?;

    let (label, series) = match action {
        StatsAction::Repos => ("repos", stats::repos_by_year(&db).await?),
        StatsAction::Commits => ("commits", stats::commits_by_year(&db).await?),
        StatsAction::Stargazers => ("stargazers", stats::stargazers_by_year(&db).await?),
    };

    if series.is_empty() {
        println!("No {label} stored yet.");
    } else {
        print!("{}", render(label, &series));
    }
    Ok(())
}
