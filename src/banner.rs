use console::{measure_text_width, style};
use std::iter;

use crate::transfer::TransferPlan;

/// Prints a boxed, colorized summary of the transfer about to run.
///
/// The box is sized to the widest **visible** line, using
/// [`console::measure_text_width`] so ANSI color codes in the content do not
/// throw off the padding. Borders are styled separately from the content.
pub fn print_banner(plan: &TransferPlan) {
    let lines = banner_lines(plan);

    let max_width = lines
        .iter()
        .map(|l| measure_text_width(l)) // ignore ANSI in content
        .max()
        .unwrap_or(0)
        + 2;

    let border = "═".repeat(max_width);
    let top = style(format!("╔{}╗", border)).blue().bold();
    let bottom = style(format!("╚{}╝", border)).blue().bold();
    let left = style("║ ").blue().bold().to_string();
    let right = style("║").blue().bold().to_string();

    println!();
    println!("{top}");
    for line in lines {
        let visible = measure_text_width(&line);
        let pad = max_width - visible; // includes the one space after left border
        println!("{}{}{}{}", left, line, " ".repeat(pad - 1), right);
    }
    println!("{bottom}");
    println!();
}

/// Lines of the transfer summary, in display order.
///
/// The mirror warning is yellow and bold, so callers measuring width must
/// use visible width rather than `str::len()`.
fn banner_lines(plan: &TransferPlan) -> Vec<String> {
    let top = ["Transfer repository history with rewritten authorship", ""]
        .into_iter()
        .map(|s| s.to_string());

    let details = [
        format!("Source:       {}", plan.source),
        format!("Destination:  {}", plan.destination),
        format!(
            "New identity: {} <{}>",
            plan.identity.name, plan.identity.email
        ),
        format!("Local clone:  {}", plan.clone_dir.display()),
    ]
    .into_iter();

    let warning = iter::once(String::new()).chain(
        [
            "Every commit's author and committer will be replaced.",
            "The destination is pushed with --mirror: refs not in the",
            "source (branches and tags) are deleted there.",
        ]
        .into_iter()
        .map(|s| style(s).yellow().bold().to_string()),
    );

    top.chain(details).chain(warning).collect()
}
