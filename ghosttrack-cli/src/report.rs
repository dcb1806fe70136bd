use anyhow::Result;
use colored::Colorize;
use ghosttrack_core::{CommandOutcome, GhostStats, PartyEntry, RemainingEntry, format_grid};
use serde_json::json;
use std::io::Write;

const BAR_WIDTH: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Console,
    Json,
}

impl ReportFormat {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == "json" { Self::Json } else { Self::Console }
    }
}

/// Renders command results in the selected format.
pub struct Reporter<W: Write> {
    format: ReportFormat,
    columns: usize,
    out: W,
}

impl<W: Write> Reporter<W> {
    pub const fn new(format: ReportFormat, columns: usize, out: W) -> Self {
        Self {
            format,
            columns,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn outcome(&mut self, line: &str, outcome: &CommandOutcome) -> Result<()> {
        match self.format {
            ReportFormat::Json => self.json_line(&json!({
                "command": line,
                "applied": outcome.applied,
            })),
            ReportFormat::Console => {
                if outcome.applied {
                    writeln!(self.out, "{} {line}", "✔".green())?;
                } else {
                    writeln!(self.out, "{} {line} {}", "·".dimmed(), "(no change)".dimmed())?;
                }
                Ok(())
            }
        }
    }

    pub fn stats(&mut self, title: &str, stats: &GhostStats) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "report": title, "stats": stats }));
        }
        writeln!(self.out, "{}", format!("📊 {title}").bright_cyan().bold())?;
        writeln!(
            self.out,
            "Identified: {} ({:.1}%)   Rejected: {} ({:.1}%)",
            stats.identified_total.to_string().green(),
            stats.identified_percent,
            stats.rejected_total.to_string().red(),
            stats.rejected_percent
        )?;
        match &stats.leader {
            Some(leader) => writeln!(
                self.out,
                "Leader: {} {:.1}%",
                leader.label().bold(),
                leader.share_percent
            )?,
            None => writeln!(self.out, "Leader: -")?,
        }
        let width = stats
            .leaderboard
            .iter()
            .map(|e| e.name.chars().count())
            .max()
            .unwrap_or(0);
        for entry in &stats.leaderboard {
            let filled = entry.total_count.saturating_mul(BAR_WIDTH) / stats.max_total.max(1);
            let bar = "█".repeat(usize::try_from(filled).unwrap_or(0));
            writeln!(
                self.out,
                "  {:<width$} {} {} ({}/{}) {:.1}%",
                entry.name,
                bar.cyan(),
                entry.total_count,
                entry.identified_count,
                entry.rejected_count,
                entry.total_share_percent
            )?;
        }
        Ok(())
    }

    pub fn remaining(&mut self, entries: &[RemainingEntry]) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "report": "remaining", "entries": entries }));
        }
        let left = entries.iter().filter(|e| !e.is_removed).count();
        writeln!(
            self.out,
            "{}",
            format!("👻 Remaining ({left}/{})", entries.len())
                .bright_yellow()
                .bold()
        )?;
        writeln!(self.out, "{}", format_grid(entries, self.columns, "\n"))?;
        Ok(())
    }

    pub fn party(&mut self, entries: &[PartyEntry]) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "report": "party", "entries": entries }));
        }
        writeln!(self.out, "{}", "🧑‍🤝‍🧑 Party".bright_blue().bold())?;
        if entries.is_empty() {
            writeln!(self.out, "  (empty)")?;
        }
        for (idx, entry) in entries.iter().enumerate() {
            writeln!(
                self.out,
                "  {}. {} {} (start {})",
                idx + 1,
                entry.nickname.bold(),
                entry.count,
                entry.initial_count
            )?;
        }
        Ok(())
    }

    pub fn search(&mut self, query: &str, names: &[&str]) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "report": "search", "query": query, "names": names }));
        }
        if names.is_empty() {
            writeln!(self.out, "no ghost matches `{query}`")?;
        } else {
            writeln!(self.out, "{}", names.join(", "))?;
        }
        Ok(())
    }

    pub fn help(&mut self, text: &str) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "report": "help", "text": text }));
        }
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Report a rejected input line; processing continues.
    pub fn warning(&mut self, line: &str, message: &str) -> Result<()> {
        if self.format == ReportFormat::Json {
            return self.json_line(&json!({ "command": line, "error": message }));
        }
        writeln!(self.out, "{} {line}: {message}", "⚠".yellow())?;
        Ok(())
    }

    fn json_line(&mut self, value: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        Ok(())
    }
}
