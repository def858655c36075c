use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

use crate::config::EngineConfig;
use crate::models::{FixtureRequest, MatchAnalysis, GOAL_LINES};
use crate::services::EstimationEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

/// An input file may hold one fixture or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureInput {
    Many(Vec<FixtureRequest>),
    One(Box<FixtureRequest>),
}

pub fn load_engine(config_path: Option<&Path>) -> Result<EstimationEngine> {
    let config = EngineConfig::load_with_override(config_path).context("loading engine config")?;
    Ok(EstimationEngine::new(config))
}

pub fn parse_fixtures(raw: &str) -> Result<Vec<FixtureRequest>> {
    let input: FixtureInput = serde_json::from_str(raw).context("parsing fixture input")?;
    Ok(match input {
        FixtureInput::Many(fixtures) => fixtures,
        FixtureInput::One(fixture) => vec![*fixture],
    })
}

pub fn estimate_from_file(input: &Path, format: OutputFormat, config_path: Option<&Path>) -> Result<()> {
    let engine = load_engine(config_path)?;
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading fixture file {}", input.display()))?;
    let fixtures = parse_fixtures(&raw)?;

    if fixtures.is_empty() {
        println!("📭 No fixtures found in {}", input.display());
        return Ok(());
    }

    let analyses: Vec<MatchAnalysis> = fixtures.iter().map(|f| engine.analyze(f)).collect();
    tracing::info!("Estimated {} fixtures from {}", analyses.len(), input.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &analyses)?;
            writeln!(out)?;
        }
        OutputFormat::Table => print_table(&mut out, &analyses)?,
        OutputFormat::Csv => write_csv(&mut out, &analyses)?,
    }

    Ok(())
}

pub fn show_config(config_path: Option<&Path>) -> Result<()> {
    let engine = load_engine(config_path)?;
    println!("{}", serde_json::to_string_pretty(engine.config())?);
    Ok(())
}

fn print_table<W: Write>(out: &mut W, analyses: &[MatchAnalysis]) -> Result<()> {
    for (i, analysis) in analyses.iter().enumerate() {
        let e = &analysis.estimate;
        writeln!(out, "{}. {} vs {}", i + 1, analysis.home_team, analysis.away_team)?;
        writeln!(
            out,
            "   1X2: Home {}% | Draw {}% | Away {}%",
            e.outcome.home, e.outcome.draw, e.outcome.away
        )?;
        let lines: Vec<String> = e
            .goals
            .iter()
            .map(|g| format!("O/U {}: {}/{}", g.threshold, g.over, g.under))
            .collect();
        writeln!(out, "   Goals (xG {}): {}", e.expected_goals, lines.join(" | "))?;
        writeln!(out, "   BTTS: Yes {}% | No {}%", e.btts.yes, e.btts.no)?;
        writeln!(
            out,
            "   H2H: {} meetings ({:?}){}",
            analysis.head_to_head.matches,
            analysis.head_to_head.reliability,
            if analysis.head_to_head.blended { ", blended" } else { "" }
        )?;
        writeln!(out, "   Confidence: {}%", e.confidence)?;
        for suggestion in &analysis.suggestions {
            writeln!(
                out,
                "   🎯 [{}] {} ({}%, confidence {})",
                suggestion.market, suggestion.claim, suggestion.probability, suggestion.confidence
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One CSV row per fixture, Over/Under columns for every published goal line.
pub fn write_csv<W: Write>(out: W, analyses: &[MatchAnalysis]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header: Vec<String> = ["home_team", "away_team", "home", "draw", "away", "expected_goals"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for line in GOAL_LINES {
        header.push(format!("over_{}", line));
        header.push(format!("under_{}", line));
    }
    header.extend(
        ["btts_yes", "btts_no", "confidence", "h2h_matches", "h2h_reliability", "top_suggestion"]
            .iter()
            .map(|s| s.to_string()),
    );
    writer.write_record(&header)?;

    for analysis in analyses {
        let e = &analysis.estimate;
        let mut record = vec![
            analysis.home_team.clone(),
            analysis.away_team.clone(),
            e.outcome.home.to_string(),
            e.outcome.draw.to_string(),
            e.outcome.away.to_string(),
            e.expected_goals.to_string(),
        ];
        for line in GOAL_LINES {
            match e.goals_line(line) {
                Some(g) => {
                    record.push(g.over.to_string());
                    record.push(g.under.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        record.push(e.btts.yes.to_string());
        record.push(e.btts.no.to_string());
        record.push(e.confidence.to_string());
        record.push(analysis.head_to_head.matches.to_string());
        record.push(format!("{:?}", analysis.head_to_head.reliability).to_lowercase());
        record.push(
            analysis
                .suggestions
                .first()
                .map(|s| s.claim.clone())
                .unwrap_or_default(),
        );
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
