use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use montyhall_engine::{ProgressEvent, SimulationResult};

const RULE_WIDTH: usize = 50;

pub fn write_banner(out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).cyan())?;
    writeln!(
        out,
        "{}",
        format!("Monty Hall Simulator v{}", env!("CARGO_PKG_VERSION"))
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).cyan())?;
    Ok(())
}

pub fn write_progress(out: &mut dyn Write, event: &ProgressEvent) -> Result<()> {
    writeln!(
        out,
        "  {} {}/{} games ({:.1}%) after {:.3}s",
        "chunk complete:".dimmed(),
        group_thousands(event.completed_trials),
        group_thousands(event.total_trials),
        event.fraction() * 100.0,
        event.elapsed_seconds
    )?;
    Ok(())
}

pub fn generate_console_report(out: &mut dyn Write, result: &SimulationResult) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "Simulation Results".bright_yellow().bold())?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH).yellow())?;
    writeln!(
        out,
        "Simulation runtime: {:.3} seconds",
        result.duration_seconds()
    )?;
    writeln!(out, "Threads used: {}", result.total_threads_used)?;
    writeln!(out)?;
    writeln!(out, "Total number of games simulated:")?;
    writeln!(out, "        {:>14}", group_thousands(result.total_games_played))?;
    writeln!(out, "{}", "Stay with First Door Choice".bold())?;
    writeln!(
        out,
        "  Wins: {:>14}; Ratio W/T: {}",
        group_thousands(result.total_wins_with_stay),
        format_percent(result.win_ratio_with_stay())
    )?;
    writeln!(out, "{}", "Switch Doors After Shown Goat Door".bold())?;
    writeln!(
        out,
        "  Wins: {:>14}; Ratio W/T: {}",
        group_thousands(result.total_wins_with_switch),
        format_percent(result.win_ratio_with_switch()).green()
    )?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, result: &SimulationResult) -> Result<()> {
    let json_output = serde_json::to_string_pretty(result)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

/// Render `1234567` as `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn format_percent(ratio: f64) -> String {
    format!("{:.5}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SimulationResult {
        SimulationResult {
            total_games_played: 1_000_000,
            total_threads_used: 4,
            total_wins_with_stay: 333_000,
            total_wins_with_switch: 667_000,
            ..SimulationResult::default()
        }
    }

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(100_000), "100,000");
        assert_eq!(
            group_thousands(9_223_372_036_854_775_806),
            "9,223,372,036,854,775,806"
        );
    }

    #[test]
    fn console_report_lists_both_strategies() {
        let mut buf = Vec::new();
        generate_console_report(&mut buf, &sample_result()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Simulation Results"));
        assert!(text.contains("1,000,000"));
        assert!(text.contains("Stay with First Door Choice"));
        assert!(text.contains("333,000"));
        assert!(text.contains("33.30000%"));
        assert!(text.contains("66.70000%"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total_wins_with_switch"], 667_000);
        assert_eq!(value["total_threads_used"], 4);
    }

    #[test]
    fn progress_line_shows_fraction() {
        let mut buf = Vec::new();
        let event = ProgressEvent {
            completed_trials: 2_000,
            total_trials: 2_500,
            elapsed_seconds: 1.25,
        };
        write_progress(&mut buf, &event).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("2,000/2,500"));
        assert!(text.contains("80.0%"));
    }

    #[test]
    fn banner_names_the_tool() {
        let mut buf = Vec::new();
        write_banner(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Monty Hall Simulator"));
    }
}
