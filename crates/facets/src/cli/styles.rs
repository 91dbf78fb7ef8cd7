use console::Style;
use once_cell::sync::Lazy;

pub static TITLE: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static DIM: Lazy<Style> = Lazy::new(|| Style::new().color256(246).italic());
pub static HEADING: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static RULE_AUTO: Lazy<Style> = Lazy::new(|| Style::new().cyan().italic());
pub static VIEW_NAME: Lazy<Style> = Lazy::new(|| Style::new().yellow().bold());

pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static WARNING: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static ERROR: Lazy<Style> = Lazy::new(|| Style::new().red());

/// Status badge colors, keyed by record status.
pub fn status_style(status: &str) -> Style {
    match status {
        "Published" => Style::new().green(),
        "Schedule" => Style::new().blue(),
        "Pending review" => Style::new().magenta(),
        "Draft" => Style::new().yellow(),
        _ => Style::new(),
    }
}
