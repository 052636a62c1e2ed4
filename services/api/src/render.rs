use chrono::{DateTime, Local};
use clap::ValueEnum;
use lead_desk::error::AppError;
use lead_desk::leads::{Lead, LeadRow, SelectionView};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub(crate) fn write_rows(rows: &[LeadRow], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => {
            render_table(rows);
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows).map_err(io::Error::from)?;
            println!("{json}");
            Ok(())
        }
        OutputFormat::Csv => write_csv(rows, io::stdout().lock()),
    }
}

fn write_csv<W: Write>(rows: &[LeadRow], out: W) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).map_err(io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn render_table(rows: &[LeadRow]) {
    if rows.is_empty() {
        println!("  (no leads match the current filters)");
        return;
    }

    println!(
        "  {:<10} {:<22} {:<22} {:>6} {:<12} {:<14}",
        "ID", "NAME", "COMPANY", "SCORE", "BAND", "STATUS"
    );
    for row in rows {
        println!(
            "  {:<10} {:<22} {:<22} {:>6} {:<12} {:<14}",
            truncate(row.id.as_str(), 10),
            truncate(&row.name, 22),
            truncate(row.company.as_deref().unwrap_or("-"), 22),
            row.score
                .map(|score| format!("{score:.0}"))
                .unwrap_or_else(|| "-".to_string()),
            row.band.as_deref().unwrap_or("-"),
            row.status
        );
    }
}

pub(crate) fn render_detail(lead: &Lead) {
    println!("{} <{}>", lead.name, lead.email);
    println!("  Company:   {}", lead.company.as_deref().unwrap_or("-"));
    println!("  Website:   {}", lead.website.as_deref().unwrap_or("-"));
    println!("  Industry:  {}", lead.industry.as_deref().unwrap_or("-"));
    println!("  Size:      {}", lead.company_size.as_deref().unwrap_or("-"));
    println!("  Status:    {}", lead.status);
    println!(
        "  Fit:       {} | band {} | use case {}",
        lead.fit_score
            .map(|score| format!("{:.0}%", score * 100.0))
            .unwrap_or_else(|| "-".to_string()),
        lead.fit_band.as_deref().unwrap_or("-"),
        lead.use_case_label.as_deref().unwrap_or("-")
    );
    println!("  Label:     {}", lead.label.as_deref().unwrap_or("-"));
    println!("  Created:   {}", format_timestamp(&lead.created_at));
    println!("  Updated:   {}", format_timestamp(&lead.updated_at));
    if !lead.problem_text.is_empty() {
        println!("  Problem:   {}", lead.problem_text);
    }
    if let Some(rationale) = lead.model_rationale.as_deref().or(lead.rationale.as_deref()) {
        println!("  Rationale: {rationale}");
    }
}

pub(crate) fn render_selection(view: &SelectionView) {
    match (&view.lead, view.open) {
        (Some(lead), true) => println!(
            "  Detail view open on {} ({}, outreach {:?})",
            lead.id, lead.status, view.phase
        ),
        (Some(lead), false) => println!("  Detail view closed (last lead {})", lead.id),
        (None, _) => println!("  Detail view closed"),
    }
}

/// RFC 3339 timestamps render in local time; anything else is shown as-is.
pub(crate) fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
