use std::env;
use std::io::{self, BufRead, Write};
use std::process;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use retention_pipeline::export;
use retention_pipeline::prediction_loader::{load_predictions_cached, CustomerRecord};
use retention_pipeline::types::{DashboardQuery, THRESHOLD_DEFAULT};
use retention_pipeline::view::{self, DashboardView, ACTION_TABLE_ROWS};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DashboardJson {
    generated_at: String,
    source: String,
    threshold: f64,
    load_ms: u128,
    render_ms: u128,
    kpis: KpiJson,
    segments: Vec<SegmentJson>,
    actions: Vec<ActionRowJson>,
    actions_total: usize,
    action_summary: Vec<ActionSummaryJson>,
}

#[derive(Serialize)]
struct KpiJson {
    total_customers: usize,
    at_risk_customers: usize,
    revenue_at_risk: f64,
    net_savings_total: f64,
}

#[derive(Serialize)]
struct SegmentJson {
    value_segment: String,
    expected_loss: f64,
}

#[derive(Serialize)]
struct ActionRowJson {
    customer_id: String,
    churn_probability: f64,
    value_segment: String,
    tenure: u32,
    monthly_charges: f64,
    expected_loss: f64,
    retention_cost: f64,
    net_savings: f64,
    action: String,
}

#[derive(Serialize)]
struct ActionSummaryJson {
    action: String,
    customers: usize,
    total_net_savings: f64,
}

fn action_row_json(record: &CustomerRecord) -> ActionRowJson {
    ActionRowJson {
        customer_id: record.customer_id.clone(),
        churn_probability: record.churn_probability,
        value_segment: record.value_segment.clone(),
        tenure: record.tenure,
        monthly_charges: record.monthly_charges,
        expected_loss: record.expected_loss,
        retention_cost: record.retention_cost,
        net_savings: record.net_savings,
        action: record.action.clone(),
    }
}

fn build_json(
    dashboard: &DashboardView,
    source: &str,
    load_ms: u128,
    render_ms: u128,
) -> DashboardJson {
    DashboardJson {
        generated_at: Utc::now().to_rfc3339(),
        source: source.to_string(),
        threshold: dashboard.threshold,
        load_ms,
        render_ms,
        kpis: KpiJson {
            total_customers: dashboard.kpis.total_customers,
            at_risk_customers: dashboard.kpis.at_risk_customers,
            revenue_at_risk: dashboard.kpis.revenue_at_risk,
            net_savings_total: dashboard.kpis.net_savings_total,
        },
        segments: dashboard
            .segments
            .iter()
            .map(|s| SegmentJson {
                value_segment: s.value_segment.clone(),
                expected_loss: s.expected_loss,
            })
            .collect(),
        actions: dashboard.action_table().iter().map(action_row_json).collect(),
        actions_total: dashboard.actions.len(),
        action_summary: dashboard
            .action_summary
            .iter()
            .map(|r| ActionSummaryJson {
                action: r.action.clone(),
                customers: r.customers,
                total_net_savings: r.total_net_savings,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

/// Format a dollar amount with comma-grouped thousands.
fn format_dollars(amount: f64) -> String {
    let digits = (amount.abs().trunc() as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0.0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Proportional bar for the segment exposure chart.
fn exposure_bar(value: f64, max: f64) -> String {
    const WIDTH: usize = 24;
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * WIDTH as f64).round().max(1.0) as usize;
    "\u{2588}".repeat(len.min(WIDTH))
}

fn print_human(dashboard: &DashboardView, source: &str, load_ms: u128, render_ms: u128) {
    let rule = "\u{2550}".repeat(62);
    println!();
    println!("  \u{2554}{}\u{2557}", rule);
    println!(
        "  \u{2551}{:^62}\u{2551}",
        "CHURN RETENTION \u{2014} Decision Dashboard"
    );
    println!("  \u{255a}{}\u{255d}", rule);
    println!();
    println!(
        "  {}  \u{00b7}  churn probability threshold {:.2}",
        source, dashboard.threshold
    );
    println!();

    let kpis = &dashboard.kpis;
    println!(
        "  Total customers {:>10}    High-risk customers {:>8}",
        format_dollars(kpis.total_customers as f64),
        format_dollars(kpis.at_risk_customers as f64),
    );
    println!(
        "  Revenue at risk {:>10}    Potential net savings {:>6}",
        format!("${}", format_dollars(kpis.revenue_at_risk)),
        format!("${}", format_dollars(kpis.net_savings_total)),
    );
    println!();

    // Section 1: where the money is at risk.
    println!("  {:\u{2500}<64}", "");
    println!("  Revenue at risk by value segment");
    println!();
    if dashboard.segments.is_empty() {
        println!("  No customers exceed the current churn probability threshold.");
    } else {
        let max = dashboard.segments[0].expected_loss;
        for segment in &dashboard.segments {
            println!(
                "  {:<10} {:>12}  {}",
                segment.value_segment,
                format!("${}", format_dollars(segment.expected_loss)),
                exposure_bar(segment.expected_loss, max),
            );
        }
    }
    println!();

    // Section 2: who to act on.
    println!("  {:\u{2500}<64}", "");
    println!("  Retention priorities (ranked by net savings)");
    println!();
    if dashboard.actions.is_empty() {
        println!("  No customers have a positive retention ROI at this threshold.");
    } else {
        println!(
            "     {:<12} {:>5} {:>8} {:>7} {:>8} {:>10} {:>8} {:>10}  {}",
            "customer", "churn", "segment", "tenure", "monthly", "exp. loss", "cost", "net", "action"
        );
        for (i, c) in dashboard.action_table().iter().enumerate() {
            println!(
                "  {:>2}. {:<12} {:>5.2} {:>8} {:>7} {:>8} {:>10} {:>8} {:>10}  {}",
                i + 1,
                c.customer_id,
                c.churn_probability,
                c.value_segment,
                c.tenure,
                format!("${:.2}", c.monthly_charges),
                format!("${}", format_dollars(c.expected_loss)),
                format!("${}", format_dollars(c.retention_cost)),
                format!("${}", format_dollars(c.net_savings)),
                c.action,
            );
        }
        if dashboard.actions.len() > ACTION_TABLE_ROWS {
            println!(
                "      +{} more in the full export",
                dashboard.actions.len() - ACTION_TABLE_ROWS
            );
        }
    }
    println!();

    // Section 3: what to do.
    println!("  {:\u{2500}<64}", "");
    println!("  Retention actions summary");
    println!();
    if dashboard.action_summary.is_empty() {
        println!("  No retention actions recommended at this threshold.");
    } else {
        for rollup in &dashboard.action_summary {
            println!(
                "  {:<32} {:>4} customers {:>12}",
                rollup.action,
                rollup.customers,
                format!("${}", format_dollars(rollup.total_net_savings)),
            );
        }
    }

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Rendered in {}ms",
        load_ms, render_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Render cycles
// ---------------------------------------------------------------------------

async fn run_cycle(
    records: Arc<Vec<CustomerRecord>>,
    source: &str,
    threshold: f64,
    cycle: usize,
    json_output: bool,
    export_path: Option<&str>,
    load_ms: u128,
) {
    let query = DashboardQuery::new(format!("render-{:03}", cycle), threshold);

    let render_start = Instant::now();
    let dashboard = view::render(records, query).await;
    let render_ms = render_start.elapsed().as_millis();

    if json_output {
        let digest = build_json(&dashboard, source, load_ms, render_ms);
        println!("{}", serde_json::to_string_pretty(&digest).unwrap());
    } else {
        print_human(&dashboard, source, load_ms, render_ms);
    }

    if let Some(path) = export_path {
        if dashboard.actions.is_empty() {
            println!("  Nothing to export: no retention targets at this threshold.");
        } else {
            match export::write_retention_list_file(path, &dashboard.actions) {
                Ok(()) => println!(
                    "  Retention list written to {} ({} customers).",
                    path,
                    dashboard.actions.len()
                ),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!(
            "Usage: retention-server <predictions.csv> [--threshold T] [--json] \
             [--export PATH] [--interactive]"
        );
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --threshold    Churn probability threshold in [0.1, 0.9] (default: 0.6)");
        eprintln!("  --json         Output the view model as JSON instead of formatted text");
        eprintln!(
            "  --export       Write the full retention list (default name: {})",
            export::EXPORT_FILE_NAME
        );
        eprintln!("  --interactive  Re-render for thresholds read from stdin");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  retention-server data/churn_predictions.csv --threshold 0.7");
        eprintln!(
            "  retention-server data/churn_predictions.csv --json --export {}",
            export::EXPORT_FILE_NAME
        );
        process::exit(1);
    }

    let csv_path = &args[1];

    // Parse optional flags
    let mut threshold = THRESHOLD_DEFAULT;
    let mut json_output = false;
    let mut export_path: Option<String> = None;
    let mut interactive = false;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--threshold" => {
                if i + 1 < args.len() {
                    threshold = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --threshold requires a number");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --threshold requires a value");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            "--export" => {
                if i + 1 < args.len() {
                    export_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --export requires a path");
                    process::exit(1);
                }
            }
            "--interactive" => {
                interactive = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    // Load the prediction table once; it is cached for the process
    // lifetime and every render cycle starts from it.
    let load_start = Instant::now();
    let records = match load_predictions_cached(csv_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    // An empty table is terminal for the whole run: there is nothing to
    // threshold, aggregate, or export.
    if records.is_empty() {
        eprintln!("Error: prediction table at '{}' has no rows", csv_path);
        process::exit(1);
    }

    let mut cycle = 1;
    run_cycle(
        Arc::clone(&records),
        csv_path,
        threshold,
        cycle,
        json_output,
        export_path.as_deref(),
        load_ms,
    )
    .await;

    if interactive {
        let stdin = io::stdin();
        loop {
            print!("threshold> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error: {}", e);
                    break;
                }
            }

            let input = line.trim();
            if input.is_empty() || input == "q" {
                break;
            }
            let threshold: f64 = match input.parse() {
                Ok(t) => t,
                Err(_) => {
                    println!("  Enter a threshold between 0.10 and 0.90, or q to quit.");
                    continue;
                }
            };

            cycle += 1;
            run_cycle(
                Arc::clone(&records),
                csv_path,
                threshold,
                cycle,
                json_output,
                export_path.as_deref(),
                load_ms,
            )
            .await;
        }
    }
}
