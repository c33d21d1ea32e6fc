//! Console formatting for replies and metrics

use shopwise_application::{ChatExit, ChatOutcome};
use shopwise_domain::{Product, ToolMetricsSnapshot};

use crate::commands::OutputFormat;

pub fn format_outcome(outcome: &ChatOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_text(outcome),
        OutputFormat::Json => serde_json::json!({
            "text": outcome.response.text,
            "products": outcome.response.products,
            "iterations": outcome.iterations,
            "exit": exit_label(outcome.exit),
        })
        .to_string(),
    }
}

fn exit_label(exit: ChatExit) -> &'static str {
    match exit {
        ChatExit::Completed => "completed",
        ChatExit::BudgetExhausted => "budget_exhausted",
        ChatExit::MissingCredentials => "missing_credentials",
        ChatExit::Recovered => "recovered",
    }
}

fn format_text(outcome: &ChatOutcome) -> String {
    let mut out = outcome.response.text.trim_end().to_string();
    if !outcome.response.products.is_empty() {
        out.push_str("\n\n");
        out.push_str(&product_table(&outcome.response.products));
    }
    out
}

fn product_table(products: &[Product]) -> String {
    let mut lines = vec![format!(
        "{:>5}  {:<40}  {:>10}  {:<10}  {:>6}",
        "ID", "TITLE", "PRICE", "BRAND", "RATING"
    )];
    for p in products {
        lines.push(format!(
            "{:>5}  {:<40}  {:>10}  {:<10}  {:>6}",
            p.id,
            shopwise_domain::util::truncate_str(&p.title, 40),
            format!("{:.2} {}", p.price, p.currency),
            p.brand.as_deref().unwrap_or("-"),
            p.rating.map_or_else(|| "-".to_string(), |r| format!("{:.1}", r)),
        ));
    }
    lines.join("\n")
}

pub fn metrics_table(snapshots: &[ToolMetricsSnapshot]) -> String {
    let mut lines = vec![format!(
        "{:<22} {:>6} {:>6} {:>6} {:>6} {:>10}",
        "TOOL", "RUNS", "OK", "FAIL", "CACHE", "AVG MS"
    )];
    for s in snapshots {
        lines.push(format!(
            "{:<22} {:>6} {:>6} {:>6} {:>6} {:>10.1}",
            s.tool_name,
            s.execution_count,
            s.success_count,
            s.failure_count,
            s.cache_hits,
            s.average_latency_ms
        ));
    }
    lines.join("\n")
}
