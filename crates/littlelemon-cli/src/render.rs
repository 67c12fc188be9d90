//! Plain-text rendering of menu rows and the profile.

use littlelemon_core::utils::truncate;
use littlelemon_core::{MenuEntry, Profile};

const TITLE_WIDTH: usize = 24;
const DESCRIPTION_WIDTH: usize = 60;

pub fn render_entry(entry: &MenuEntry) -> String {
    let mut out = format!(
        "{:>4}  {:<width$} {:>8}  {}",
        entry.id,
        truncate(&entry.title, TITLE_WIDTH),
        entry.price_display(),
        entry.category,
        width = TITLE_WIDTH,
    );
    if !entry.description.is_empty() {
        out.push_str(&format!("\n      {}", truncate(&entry.description, DESCRIPTION_WIDTH)));
    }
    out
}

/// Render a list of rows with a footer showing how old the cache is
pub fn render_menu(rows: &[MenuEntry], cache_age: &str) -> String {
    if rows.is_empty() {
        return format!("No menu items to show (menu cached: {})", cache_age);
    }

    let mut lines: Vec<String> = rows.iter().map(render_entry).collect();
    lines.push(String::new());
    lines.push(format!("{} item(s), menu cached {}", rows.len(), cache_age));
    lines.join("\n")
}

pub fn render_profile(profile: &Profile) -> String {
    format!(
        "First name: {}\nLast name:  {}\nEmail:      {}",
        profile.first_name, profile.last_name, profile.email
    )
}
