use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::simulation::ChampionHistogram;

/// Championship odds of one team.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub team: String,
    pub wins: u64,
    pub win_probability: f64,
    /// Fair decimal odds (100% return to player)
    pub fair_odds: Option<f64>,
    /// Decimal odds at the report's return-to-player factor
    pub rtp_odds: Option<f64>,
}

/// Decimal odds for a win probability, scaled by a return-to-player factor
/// and rounded to 2 decimals. No odds for an impossible outcome.
pub fn calculate_odd(win_probability: f64, return_to_player: f64) -> Option<f64> {
    if win_probability > 0.0 {
        Some((return_to_player / win_probability * 100.0).round() / 100.0)
    } else {
        None
    }
}

/// Build one row per team, including teams that never won, sorted by wins
/// (descending) then name.
pub fn build_rows(
    histogram: &ChampionHistogram,
    teams: &[String],
    n_iter: usize,
    return_to_player: f64,
) -> Vec<ReportRow> {
    let mut names: Vec<&str> = teams.iter().map(String::as_str).collect();
    for (team, _) in histogram.iter() {
        if !names.contains(&team) {
            names.push(team);
        }
    }

    let mut rows: Vec<ReportRow> = names
        .into_iter()
        .map(|team| {
            let wins = histogram.get(team);
            let win_probability = if n_iter > 0 { wins as f64 / n_iter as f64 } else { 0.0 };
            ReportRow {
                team: team.to_string(),
                wins,
                win_probability,
                fair_odds: calculate_odd(win_probability, 1.0),
                rtp_odds: calculate_odd(win_probability, return_to_player),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.team.cmp(&b.team)));
    rows
}

fn headers(return_to_player: f64) -> [String; 5] {
    [
        "Team Name".to_string(),
        "Number of wins".to_string(),
        "Probability of winning".to_string(),
        "Odd 100% RTP".to_string(),
        format!("Odd {}% RTP", (return_to_player * 100.0).round()),
    ]
}

fn odd_cell(odd: Option<f64>) -> String {
    odd.map(|o| format!("{:.2}", o)).unwrap_or_default()
}

/// Render rows as an aligned plain-text table.
pub fn render_table(rows: &[ReportRow], return_to_player: f64) -> String {
    let headers = headers(return_to_player);
    let cells: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            [
                r.team.clone(),
                r.wins.to_string(),
                format!("{:.4}", r.win_probability),
                odd_cell(r.fair_odds),
                odd_cell(r.rtp_odds),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(String::len).collect();
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, row: &[String; 5]| {
        let mut text = String::new();
        for (i, (cell, w)) in row.iter().zip(&widths).enumerate() {
            if i > 0 {
                text.push_str("  ");
            }
            // Names left-aligned, numbers right-aligned
            if i == 0 {
                let _ = write!(text, "{:<w$}", cell, w = *w);
            } else {
                let _ = write!(text, "{:>w$}", cell, w = *w);
            }
        }
        out.push_str(text.trim_end());
        out.push('\n');
    };

    line(&mut out, &headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &cells {
        line(&mut out, row);
    }
    out
}

#[derive(Serialize)]
struct CsvRow<'a> {
    team: &'a str,
    wins: u64,
    win_probability: f64,
    fair_odds: Option<f64>,
    rtp_odds: Option<f64>,
}

/// Write rows to a CSV file with the same headers as the table.
pub fn write_csv(rows: &[ReportRow], return_to_player: f64, path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(headers(return_to_player))?;
    for r in rows {
        writer.serialize(CsvRow {
            team: &r.team,
            wins: r.wins,
            win_probability: r.win_probability,
            fair_odds: r.fair_odds,
            rtp_odds: r.rtp_odds,
        })?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "results saved");
    Ok(())
}

/// Default results file for a run.
pub fn results_path(
    data_dir: &Path,
    n_iter: usize,
    season_to_play: i32,
    season_data: i32,
    playoffs_only: bool,
) -> PathBuf {
    let playoffs_only = if playoffs_only { "True" } else { "False" };
    data_dir.join(format!(
        "n_iter_{}_season_to_play_{}_season_data_{}_playoffs_only_{}.csv",
        n_iter, season_to_play, season_data, playoffs_only
    ))
}
