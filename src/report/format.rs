//! Rendering of the run summary.
//!
//! Output is Telegram "Markdown" (legacy mode): `*bold*` and `` `code` ``.
//! The same text is printed to stdout for dry runs and the `history` command.

use chrono::NaiveDate;

use crate::domain::{HistoryRow, LiquiditySnapshot, RatioSet, RollingAverages, WeekOverWeek, quarter_label};

const RULE: &str = "━━━━━━━━━━━━━━━━━━";

/// Everything the report needs, already computed.
#[derive(Debug, Clone)]
pub struct ReportInput<'a> {
    pub report_date: NaiveDate,
    pub snapshot: &'a LiquiditySnapshot,
    pub ratios: RatioSet,
    pub reserves_wow: WeekOverWeek,
    pub assets_wow: WeekOverWeek,
    pub avg_short: RollingAverages,
    pub avg_long: RollingAverages,
}

/// Format the message sent to the chat.
pub fn format_report(input: &ReportInput<'_>) -> String {
    let s = input.snapshot;
    let mut out = String::new();

    out.push_str("🇺🇸 *US Liquidity Monitor*\n");
    out.push_str(&format!("📅 Report date: {}\n", input.report_date));
    out.push_str(RULE);
    out.push_str("\n\n");

    out.push_str("💰 *Current Levels*\n");
    out.push_str(&format!("• Bank reserves: `{} B`\n", fmt_level(s.reserves.current.value)));
    out.push_str(&format!(
        "  (as of {} | {})\n",
        s.reserves.current.date,
        input.reserves_wow.display()
    ));
    out.push_str(&format!("• Bank total assets: `{} B`\n", fmt_level(s.assets.current.value)));
    out.push_str(&format!(
        "  (as of {} | {})\n",
        s.assets.current.date,
        input.assets_wow.display()
    ));
    out.push_str(&format!("• Nominal GDP: `{} B`\n", fmt_level(s.gdp.value)));
    out.push_str(&format!("  (period: {})\n", quarter_label(s.gdp.date)));
    out.push_str(RULE);
    out.push_str("\n\n");

    out.push_str("📊 *Ratios*\n\n");
    push_ratio_block(
        &mut out,
        "1️⃣ *Reserves / Total Assets*",
        input.ratios.reserve_to_asset,
        (&input.avg_short, input.avg_short.reserve_to_asset),
        (&input.avg_long, input.avg_long.reserve_to_asset),
    );
    out.push('\n');
    push_ratio_block(
        &mut out,
        "2️⃣ *Reserves / GDP*",
        input.ratios.reserve_to_gdp,
        (&input.avg_short, input.avg_short.reserve_to_gdp),
        (&input.avg_long, input.avg_long.reserve_to_gdp),
    );

    out
}

fn push_ratio_block(
    out: &mut String,
    title: &str,
    current: f64,
    short: (&RollingAverages, f64),
    long: (&RollingAverages, f64),
) {
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!("   Current: `{current:.2}%`\n"));
    for (avg, value) in [short, long] {
        let diff = format_signed_pp(current - value);
        out.push_str(&format!(
            "   {}-period avg: `{value:.2}%` (vs now {diff}, n={})\n",
            avg.window, avg.rows_used
        ));
    }
}

/// Difference between two percentages, in percentage points: `+0.39pp`.
fn format_signed_pp(value: f64) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}pp")
}

/// Plain-text table of stored rows plus the trailing averages.
pub fn format_history(rows: &[&HistoryRow], short: Option<RollingAverages>, long: Option<RollingAverages>) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("History is empty.\n");
        return out;
    }

    out.push_str(
        format!(
            "{:<10} {:>12} {:>12} {:>12} {:>10} {:>10}",
            "date", "reserves_b", "assets_b", "gdp_b", "res/asset", "res/gdp"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<12} {:-<12} {:-<12} {:-<10} {:-<10}",
            "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in rows {
        out.push_str(&format!(
            "{:<10} {:>12} {:>12} {:>12} {:>9.2}% {:>9.2}%\n",
            r.report_date,
            fmt_level(r.reserves),
            fmt_level(r.assets),
            fmt_level(r.gdp),
            r.reserve_to_asset,
            r.reserve_to_gdp,
        ));
    }

    out.push('\n');
    for avg in [short, long].into_iter().flatten() {
        out.push_str(&format!(
            "{}-period avg (n={}): res/asset {:.2}% | res/gdp {:.2}%\n",
            avg.window, avg.rows_used, avg.reserve_to_asset, avg.reserve_to_gdp
        ));
    }

    out
}

/// One decimal with thousands separators: `23500.04` -> `23,500.0`.
pub fn fmt_level(value: f64) -> String {
    let fixed = format!("{:.1}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.0" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}
