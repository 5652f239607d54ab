use std::io::Write;

use anyhow::Result;

use crate::analysis::sets::SetReport;

const TABLE_WIDTH: usize = 70;

/// Prints a human readable set report.
pub fn print_set_report(out: &mut impl Write, source: &str, report: &SetReport) -> Result<()> {
    writeln!(out, "CSV file: {source}")?;
    writeln!(out, "Category: {}", report.category)?;
    writeln!(out)?;

    writeln!(out, "=== Sessions ===")?;
    writeln!(out)?;
    writeln!(out, "Total:      {}", report.total_sessions)?;
    writeln!(out, "Assigned:   {}", report.assigned_sessions)?;
    writeln!(out, "Unassigned: {}", report.unassigned.len())?;
    writeln!(out)?;

    if !report.unassigned.is_empty() {
        writeln!(out, "=== Unassigned sessions ===")?;
        writeln!(out)?;
        for session in &report.unassigned {
            writeln!(
                out,
                "{}\t{}\t{}",
                session.start.format("%Y-%m-%d %H:%M"),
                session.notes,
                session.hours
            )?;
        }
        writeln!(out)?;
        writeln!(out, "Unassigned total: {}", report.unassigned_hours)?;
        writeln!(out)?;
    }

    writeln!(out, "=== Hours per set ===")?;
    writeln!(out)?;
    for set in &report.sets {
        writeln!(out, "Set {} (units {}):", set.set, set.units)?;
        writeln!(out, "  Lecture:   {}", set.lecture)?;
        writeln!(out, "  Review:    {}", set.review)?;
        writeln!(out, "  Practice:  {}", set.practice)?;
        if !set.other.is_zero() {
            writeln!(out, "  Other:     {}", set.other)?;
        }
        writeln!(out, "  Total:     {}", set.total())?;
        writeln!(out)?;
    }

    writeln!(out, "=== Summary ===")?;
    writeln!(out)?;
    writeln!(
        out,
        "Set  | Units   | Lect  | Review | Pract | Other  | Total"
    )?;
    writeln!(out, "{}", "-".repeat(TABLE_WIDTH))?;
    for set in &report.sets {
        writeln!(
            out,
            "{:>3}  | {:<7} | {:<5} | {:<6} | {:<5} | {:<6} | {:<5}",
            set.set.get(),
            set.units,
            set.lecture.to_string(),
            set.review.to_string(),
            set.practice.to_string(),
            set.other.to_string(),
            set.total().to_string()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn print_set_report_json(out: &mut impl Write, report: &SetReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
