//! Terminal rendering of the markdown produced by the core display types.

use anyhow::Result;
use labtrack_core::models::{Affordance, StepStatus};
use termimad::{
    crossterm::style::{style, Color, Stylize},
    MadSkin,
};

/// Renders markdown with termimad, or prints it verbatim when plain output
/// is requested.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.quote_mark.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Print markdown to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                // Keep the hash marks so step ids stay visible
                println!("{}", style(line).with(header_color(line)));
            } else if let Some(message) = line.strip_prefix("Error: ") {
                println!("{} {message}", style("Error:").red());
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

/// Color of a heading line: step headings take the color of their status,
/// everything else stays blue.
fn header_color(line: &str) -> Color {
    StepStatus::ALL
        .iter()
        .find(|status| line.contains(status.with_icon()))
        .map_or(Color::Blue, |status| affordance_color(status.affordance()))
}

fn affordance_color(affordance: Affordance) -> Color {
    match affordance {
        Affordance::Neutral => Color::Blue,
        Affordance::Success => Color::Green,
        Affordance::Warning => Color::Red,
        Affordance::Paused => Color::DarkYellow,
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
