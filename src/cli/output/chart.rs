use std::io::Write;

use ansi_term::Colour;
use anyhow::Result;

use crate::{analysis::weekly::WeeklyTable, utils::time::date_to_label};

/// Draws the weekly table. Implementations decide where the chart ends up.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    fn render(&self, title: &str, table: &WeeklyTable) -> Result<()>;
}

const PALETTE: [Colour; 6] = [
    Colour::Blue,
    Colour::Red,
    Colour::Yellow,
    Colour::Green,
    Colour::Purple,
    Colour::Cyan,
];

/// Stacked horizontal bars in the terminal, one line per week.
pub struct TerminalChart {
    /// Amount of characters used by the longest bar.
    pub width: usize,
    pub colored: bool,
}

impl Default for TerminalChart {
    fn default() -> Self {
        Self {
            width: 60,
            colored: true,
        }
    }
}

impl TerminalChart {
    pub fn draw(&self, out: &mut impl Write, title: &str, table: &WeeklyTable) -> Result<()> {
        writeln!(out, "{title}")?;
        writeln!(out)?;

        let max = table
            .weeks
            .iter()
            .map(|v| *v.total())
            .fold(0., f64::max);

        for week in &table.weeks {
            let mut line = String::new();
            let mut drawn = 0usize;
            let mut stacked = 0.;
            for (index, hours) in week.hours.iter().enumerate() {
                stacked += **hours;
                // rounding the running total keeps the bar length proportional to the week total
                let end = scale(stacked, max, self.width);
                let segment = "█".repeat(end.saturating_sub(drawn));
                drawn = drawn.max(end);
                line.push_str(&self.paint(index, &segment));
            }
            writeln!(
                out,
                "{} {}{} {:.1}",
                date_to_label(week.week_start),
                line,
                " ".repeat(self.width.saturating_sub(drawn)),
                *week.total()
            )?;
        }

        writeln!(out)?;
        for (index, category) in table.categories.iter().enumerate() {
            writeln!(out, "{} {category}", self.paint(index, "█"))?;
        }
        Ok(())
    }

    fn paint(&self, index: usize, value: &str) -> String {
        if self.colored {
            PALETTE[index % PALETTE.len()].paint(value).to_string()
        } else {
            value.to_string()
        }
    }
}

fn scale(value: f64, max: f64, width: usize) -> usize {
    if max <= 0. {
        0
    } else {
        (value / max * width as f64).round() as usize
    }
}

impl ChartRenderer for TerminalChart {
    fn render(&self, title: &str, table: &WeeklyTable) -> Result<()> {
        let mut out = std::io::stdout().lock();
        self.draw(&mut out, title, table)?;
        writeln!(out)?;
        Ok(())
    }
}
