//! Output formatting for the CLI.

use crate::client::Narrative;
use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use oox_domain::{CategoryCode, HealthStatus, OrderElement, Tier};
use serde_json::json;
use std::collections::HashMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a final order that may still hold conflict blocks.
    pub fn format_order(&self, order: &[OrderElement]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let elements: Vec<serde_json::Value> = order.iter().map(element_json).collect();
                Ok(serde_json::to_string_pretty(&json!({ "order": elements }))?)
            }
            OutputFormat::Table => Ok(self.format_order_table(order)),
            OutputFormat::Quiet => Ok(order
                .iter()
                .map(|element| codes_text(element.codes(), " "))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_order_table(&self, order: &[OrderElement]) -> String {
        if order.is_empty() {
            return self.colorize("No matches to rank.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Rank", "Element", "Tier"]);

        let mut position = 0;
        for element in order {
            let (rank, tier) = match element {
                OrderElement::Single(_) => (
                    (position + 1).to_string(),
                    Tier::for_position(position).to_string(),
                ),
                OrderElement::Block(codes) => (
                    format!("{}-{}", position + 1, position + codes.len()),
                    self.colorize("conflict", "yellow"),
                ),
            };
            let text = match element {
                OrderElement::Single(code) => code.to_string(),
                OrderElement::Block(codes) => format!("{{{}}}", codes_text(codes, ", ")),
            };
            builder.push_record([rank, text, tier]);
            position += element.len();
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a resolved ranking with tiers and health.
    pub fn format_ranking(
        &self,
        ranking: &[(CategoryCode, Tier)],
        health: &[(CategoryCode, HealthStatus)],
    ) -> Result<String> {
        let health: HashMap<&CategoryCode, HealthStatus> =
            health.iter().map(|(code, status)| (code, *status)).collect();
        let status_of = |code: &CategoryCode| {
            health.get(code).copied().unwrap_or(HealthStatus::Normal)
        };

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = ranking
                    .iter()
                    .map(|(code, tier)| {
                        json!({
                            "code": code.as_str(),
                            "tier": tier.as_str(),
                            "health": status_of(code).as_str(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Quiet => Ok(ranking
                .iter()
                .map(|(code, _)| code.as_str())
                .collect::<Vec<_>>()
                .join(" ")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Rank", "Code", "Tier", "Health"]);
                for (index, (code, tier)) in ranking.iter().enumerate() {
                    builder.push_record([
                        (index + 1).to_string(),
                        code.to_string(),
                        tier.to_string(),
                        self.health_marker(status_of(code)),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a generated narrative.
    pub fn format_narrative(&self, narrative: &Narrative) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(narrative)?),
            OutputFormat::Quiet => Ok(narrative.title.clone()),
            OutputFormat::Table => {
                let title = if self.color_enabled {
                    narrative.title.bold().to_string()
                } else {
                    narrative.title.clone()
                };
                Ok(format!("{}\n\n{}", title, narrative.description))
            }
        }
    }

    /// Format a conflict block as shown by the interactive prompt.
    pub fn conflict(&self, index: usize, total: usize, block: &[CategoryCode]) -> String {
        let msg = format!(
            "Conflict {}/{}: rank {} from most to least preferred",
            index,
            total,
            codes_text(block, ", ")
        );
        self.colorize(&msg, "cyan")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn health_marker(&self, status: HealthStatus) -> String {
        let color = match status {
            HealthStatus::Healthy => "green",
            HealthStatus::Normal => "blue",
            HealthStatus::Unhealthy => "red",
        };
        self.colorize(status.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn element_json(element: &OrderElement) -> serde_json::Value {
    match element {
        OrderElement::Single(code) => json!(code.as_str()),
        OrderElement::Block(codes) => {
            json!(codes.iter().map(CategoryCode::as_str).collect::<Vec<_>>())
        }
    }
}

fn codes_text(codes: &[CategoryCode], separator: &str) -> String {
    codes
        .iter()
        .map(CategoryCode::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
