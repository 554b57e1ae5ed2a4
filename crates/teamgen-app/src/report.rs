// Output formatting: terminal report and JSON.

use std::fmt;

use serde::Serialize;
use teamgen_core::{BalanceResult, GameMode, OptionBreakdown, RatedPlayer};

fn pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Input positions of `players`, joined for display ("3, 5").
fn positions(result: &BalanceResult, players: &[RatedPlayer]) -> String {
    players
        .iter()
        .map(|p| match result.position_of(&p.name) {
            Some(pos) => pos.to_string(),
            None => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// First word of a display name, used in the headline.
fn short_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn write_team(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    team: &[RatedPlayer],
    total: f64,
    win: f64,
) -> fmt::Result {
    writeln!(f, "  {title}")?;
    for p in team {
        writeln!(f, "    {} ({})", p.name, p.rating.round())?;
    }
    writeln!(f, "    Total ELO: {}", total.round())?;
    writeln!(f, "    Win prob: {}", pct(win))
}

/// Plain-text rendering of a balance result.
struct TextReport<'a>(&'a BalanceResult);

impl TextReport<'_> {
    /// One "Pick A"/"Pick B" block: captain 2 drafts `drafted`, captain 1
    /// keeps `kept`.
    fn write_option(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        drafted: &[RatedPlayer],
        kept: &[RatedPlayer],
        option: &OptionBreakdown,
    ) -> fmt::Result {
        let result = self.0;
        let [captain1, captain2] = &result.captains;
        let mut team_a = vec![captain1.clone()];
        team_a.extend_from_slice(kept);
        let mut team_b = vec![captain2.clone()];
        team_b.extend_from_slice(drafted);

        writeln!(f, "Pick {label}")?;
        writeln!(f, "  If Captain 2 picks {}", positions(result, drafted))?;
        write_team(f, "Final Team A", &team_a, option.sum1, option.p1)?;
        write_team(f, "Final Team B", &team_b, option.sum2, option.p2)?;
        writeln!(f, "  ELO Difference: {}", option.delta.round())
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let [captain1, captain2] = &result.captains;

        if let Some(adj) = &result.advisory {
            writeln!(f, "{adj}")?;
            writeln!(f)?;
        }

        writeln!(f, "Recommended Pick ({})", result.mode)?;
        writeln!(
            f,
            "  {} vs {}",
            short_name(&captain1.name),
            short_name(&captain2.name)
        )?;
        writeln!(
            f,
            "  {} vs {}",
            positions(result, &result.split_a),
            positions(result, &result.split_b)
        )?;
        writeln!(
            f,
            "  Captain 2 picks {}",
            positions(result, result.recommended_split())
        )?;
        writeln!(f)?;

        self.write_option(f, "A", &result.split_a, &result.split_b, &result.option_a)?;
        writeln!(f)?;
        self.write_option(f, "B", &result.split_b, &result.split_a, &result.option_b)
    }
}

/// Render a balance result as a plain-text report.
pub fn render_text(result: &BalanceResult) -> String {
    TextReport(result).to_string()
}

/// Render a balance result as pretty JSON.
pub fn render_json(result: &BalanceResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

struct SlotList<'a>(&'a [String]);

impl fmt::Display for SlotList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            let role = match i {
                0 => " (Captain 1)",
                1 => " (Captain 2)",
                _ => "",
            };
            let shown = if name.is_empty() { "-" } else { name.as_str() };
            writeln!(f, "Player {}{}: {}", i + 1, role, shown)?;
        }
        Ok(())
    }
}

/// Render autofilled slots, one per line, marking the captain slots.
pub fn render_slots(slots: &[String]) -> String {
    SlotList(slots).to_string()
}

#[derive(Serialize)]
struct ModeSummary {
    mode: GameMode,
    players: usize,
}

/// Render the loaded modes and how many rated players each has.
pub fn render_modes(modes: &[(GameMode, usize)], json: bool) -> serde_json::Result<String> {
    if json {
        let rows: Vec<ModeSummary> = modes
            .iter()
            .map(|&(mode, players)| ModeSummary { mode, players })
            .collect();
        return serde_json::to_string_pretty(&rows);
    }
    Ok(modes
        .iter()
        .map(|(mode, players)| format!("{:<8} {:>4} players\n", mode.label(), players))
        .collect())
}

/// Names containing `filter` (case-insensitive), keeping leaderboard order.
pub fn matching_names<'a>(names: &'a [String], filter: Option<&str>) -> Vec<&'a str> {
    let needle = filter.map(|f| f.trim().to_lowercase()).unwrap_or_default();
    names
        .iter()
        .filter(|n| n.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

/// Render a name listing, one per line, or as a JSON array.
pub fn render_names(names: &[&str], json: bool) -> serde_json::Result<String> {
    if json {
        return serde_json::to_string_pretty(names);
    }
    Ok(names.iter().map(|n| format!("{n}\n")).collect())
}
