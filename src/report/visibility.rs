//! Weekly or monthly GEO visibility audit.
//!
//! Besides the input payload this report reads the chart directory written by
//! the `charts` program: each chart is embedded only if its PNG exists there.

use std::path::Path;

use crate::format;
use crate::layout::HorizontalAlignment::{Center, Left};
use crate::layout::{Cell, ChartImage, DataTable, Fragment, SectionBlock, SectionBody, TextBlock};
use crate::metadata::DocumentInfo;
use crate::model::visibility::{AiAnalysis, QueryPerformance, VisibilityMetrics, VisibilityReport};
use crate::richtext::Span;
use crate::theme::{PriorityScale, StyleName, Swatch, TextStyle, Theme, Thresholds, Verdict};

use super::{
    document_header, footer_lines, ordinal, page_break, table_section, RenderContext, Report,
};

pub const TITLE: &str = "GEO Visibility Report";
const INFO_TITLE: &str = "GEO Visibility Audit Report";
const MASTHEAD_RIGHT: &str = "GEO VISIBILITY AUDIT";

/// Width of an embedded chart, matching the body column.
const CHART_WIDTH_MM: f64 = 120.0;

const FINDING_LIMIT: usize = 5;
const ENGINE_LIMIT: usize = 5;
const QUERY_LIMIT: usize = 6;
const RECOMMENDATION_LIMIT: usize = 5;
const AI_HIGHLIGHT_LIMIT: usize = 5;
const AI_CATEGORY_LIMIT: usize = 6;
const AI_ACTION_LIMIT: usize = 7;

const FINDING_CHARS: usize = 100;
const QUERY_CHARS: usize = 35;
const INSIGHT_CHARS: usize = 80;
const ACTION_CHARS: usize = 100;

/// Chart files this report looks for.
pub const TREND_CHART: &str = "citation_trend.png";
pub const ENGINE_CHART: &str = "engine_performance.png";
pub const QUERY_CHART: &str = "top_queries.png";

pub fn assemble(report: &VisibilityReport, charts_dir: &Path, context: &RenderContext) -> Report {
    let theme = &context.theme;
    let kind = if report.is_monthly() {
        "MONTHLY REPORT"
    } else {
        "WEEKLY REPORT"
    };
    let masthead = (kind, MASTHEAD_RIGHT);

    let generated = if report.generated_at.is_empty() {
        context.display_date("")
    } else {
        report.generated_at.clone()
    };
    let mut fragments = document_header(
        theme,
        masthead,
        TITLE,
        format!("{} | Generated: {}", report.period, generated),
    );
    fragments.push(executive_summary(&report.metrics, theme));
    fragments.extend(chart_section(
        charts_dir,
        TREND_CHART,
        "trend-chart",
        "Citation Trend",
        "Citation rate over the period against the 50% pass threshold.",
    ));
    fragments.extend(key_findings(report, theme));
    if let Some(engines) = engine_performance(report, theme) {
        fragments.push(engines);
        fragments.extend(chart_section(charts_dir, ENGINE_CHART, "engine-chart", "", ""));
    }
    fragments.extend(page_break(masthead));

    if let Some(ai) = report.ai() {
        fragments.extend(ai_sections(ai, theme));
        fragments.extend(page_break(masthead));
    }

    if let Some(queries) = top_queries(report, theme) {
        fragments.push(queries);
        fragments.extend(chart_section(charts_dir, QUERY_CHART, "top-queries-chart", "", ""));
    }
    fragments.extend(worst_queries(report, theme));
    fragments.extend(recommendations(&report.metrics, theme));
    fragments.extend(footer_lines(
        theme,
        false,
        &[format!("Generated by GEO Tracker | {}", context.timestamp())],
    ));

    let subject = if report.period.is_empty() {
        "GEO visibility audit".to_owned()
    } else {
        report.period.clone()
    };
    Report {
        info: DocumentInfo::new(INFO_TITLE, subject),
        fragments,
    }
}

fn strong(style: TextStyle) -> TextStyle {
    TextStyle { bold: true, ..style }
}

/// Two-tier label in the three-tier colour.
fn verdict_cell(theme: &Theme, rate: f64, style: TextStyle) -> Cell {
    let verdict = Verdict::classify(rate, Thresholds::VISIBILITY);
    Cell::colored(
        verdict.two_tier().label(),
        strong(style),
        theme.verdict_color(verdict),
    )
}

fn change_cell(theme: &Theme, change: f64, style: TextStyle) -> Cell {
    Cell::colored(format::change(change), style, theme.change_color(change))
}

/// A section holding `file` from `charts_dir`, if the chart was written.
pub fn chart_section(
    charts_dir: &Path,
    file: &str,
    id: &str,
    title: &str,
    description: &str,
) -> Option<Fragment> {
    let path = charts_dir.join(file);
    if !path.is_file() {
        return None;
    }
    Some(Fragment::section(SectionBlock::new(
        id,
        title,
        description,
        SectionBody::Chart(ChartImage {
            path,
            width_mm: CHART_WIDTH_MM,
        }),
    )))
}

/// Headline metrics. Always present.
pub fn executive_summary(metrics: &VisibilityMetrics, theme: &Theme) -> Fragment {
    let center = theme.style(StyleName::TableCellCenter);
    let value = strong(center);
    let table = DataTable::new(theme, theme.palette.black)
        .column("Citation Rate", 2.8, Center)
        .column("Total Tests", 2.8, Center)
        .column("Share of Voice", 2.8, Center)
        .column("Verdict", 2.8, Center)
        .with_row(vec![
            Cell::styled(format::percent(metrics.citation_rate), value),
            Cell::styled(format::number(metrics.total_tests), value),
            Cell::styled(format::percent(metrics.share_of_voice), value),
            verdict_cell(theme, metrics.citation_rate, center),
        ])
        .with_row(vec![
            change_cell(theme, metrics.citation_rate_change, center),
            Cell::styled("-", center),
            Cell::styled("-", center),
            Cell::styled("-", center),
        ]);
    table_section(
        "executive-summary",
        "Executive Summary",
        "Core AI visibility figures for the period: citation rate and test volume at a glance.",
        table,
    )
}

pub fn key_findings(report: &VisibilityReport, theme: &Theme) -> Option<Fragment> {
    if report.highlights.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("No.", 1.2, Center)
        .column("Finding", 10.3, Left);
    for (index, highlight) in report.highlights.iter().take(FINDING_LIMIT).enumerate() {
        table.push_row(vec![
            Cell::styled(ordinal(index), center),
            Cell::styled(format::truncate(highlight, FINDING_CHARS), cell),
        ]);
    }
    Some(table_section(
        "key-findings",
        "Key Findings",
        "Main insights and results observed during the period.",
        table,
    ))
}

pub fn engine_performance(report: &VisibilityReport, theme: &Theme) -> Option<Fragment> {
    if report.engine_performance.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("Engine", 3.0, Left)
        .column("Rate", 2.0, Center)
        .column("Tests", 2.0, Center)
        .column("Change", 2.2, Center)
        .column("Status", 2.3, Center);
    for engine in report.engine_performance.iter().take(ENGINE_LIMIT) {
        table.push_row(vec![
            Cell::styled(engine.engine.to_uppercase(), strong(cell)),
            Cell::styled(format::percent(engine.citation_rate), center),
            Cell::styled(format::number(engine.total_tests), center),
            change_cell(theme, engine.change, center),
            verdict_cell(theme, engine.citation_rate, center),
        ]);
    }
    Some(table_section(
        "engines",
        "Engine Performance",
        "Citation results per AI engine. Compare each engine's rate and how it moved.",
        table,
    ))
}

fn query_table(
    theme: &Theme,
    header_fill: Swatch,
    queries: &[QueryPerformance],
    always_fail: bool,
) -> DataTable {
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);
    let mut table = DataTable::new(theme, header_fill)
        .column("Query", 7.5, Left)
        .column("Rate", 2.0, Center)
        .column("Status", 2.0, Center);
    for query in queries.iter().take(QUERY_LIMIT) {
        let verdict = if always_fail {
            Verdict::Fail
        } else {
            Verdict::classify(query.citation_rate, Thresholds::VISIBILITY).two_tier()
        };
        table.push_row(vec![
            Cell::styled(format::truncate(&query.query, QUERY_CHARS), cell),
            Cell::styled(format::percent(query.citation_rate), center),
            Cell::colored(verdict.label(), strong(center), theme.verdict_color(verdict)),
        ]);
    }
    table
}

pub fn top_queries(report: &VisibilityReport, theme: &Theme) -> Option<Fragment> {
    if report.top_queries.is_empty() {
        return None;
    }
    Some(table_section(
        "top-queries",
        "Top Queries",
        "Queries with the highest citation rates. Reuse what works in these query types.",
        query_table(theme, theme.palette.black, &report.top_queries, false),
    ))
}

pub fn worst_queries(report: &VisibilityReport, theme: &Theme) -> Option<Fragment> {
    if report.worst_queries.is_empty() {
        return None;
    }
    Some(table_section(
        "needs-improvement",
        "Needs Improvement",
        "Queries with low citation rates. Content optimization can lift these results.",
        query_table(theme, theme.palette.fail, &report.worst_queries, true),
    ))
}

/// Recommendations derived from the headline metrics.
pub fn derived_recommendations(metrics: &VisibilityMetrics) -> Vec<(&'static str, &'static str)> {
    let rate = metrics.citation_rate;
    let mut items = if rate < 30.0 {
        vec![
            ("HIGH", "Restructure content for better AI extraction"),
            ("HIGH", "Revisit target keywords"),
        ]
    } else if rate < 60.0 {
        vec![
            ("MEDIUM", "Maintain current strategy and keep monitoring"),
            ("MEDIUM", "Run content A/B tests"),
        ]
    } else {
        vec![
            ("LOW", "Explore new query areas"),
            ("LOW", "Strengthen competitor monitoring"),
        ]
    };
    if metrics.citation_rate_change < 0.0 {
        items.push(("HIGH", "Investigate the cause of the decline"));
    }
    items.truncate(RECOMMENDATION_LIMIT);
    items
}

pub fn recommendations(metrics: &VisibilityMetrics, theme: &Theme) -> Option<Fragment> {
    let items = derived_recommendations(metrics);
    if items.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = strong(theme.style(StyleName::TableCellCenter));
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("Priority", 2.5, Center)
        .column("Recommendation", 9.0, Left);
    for (priority, text) in items {
        table.push_row(vec![
            Cell::colored(priority, center, theme.priority_color(priority, PriorityScale::Audit)),
            Cell::styled(text, cell),
        ]);
    }
    Some(table_section(
        "recommendations",
        "Recommendations",
        "Strategic recommendations drawn from the results. Act on them in order of priority.",
        table,
    ))
}

/// The AI analysis block; the caller checks that the analysis is non-empty.
pub fn ai_sections(ai: &AiAnalysis, theme: &Theme) -> Vec<Fragment> {
    [
        ai_summary(ai, theme),
        ai_categories(ai, theme),
        ai_competitors(ai, theme),
        ai_actions(ai, theme),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn ai_summary(ai: &AiAnalysis, theme: &Theme) -> Option<Fragment> {
    if ai.summary.trim().is_empty() {
        return None;
    }
    let body = theme.style(StyleName::Body);
    let mut notes = vec![TextBlock::styled(ai.summary.clone(), body).with_space_after(8)];
    notes.extend(ai.highlights.iter().take(AI_HIGHLIGHT_LIMIT).enumerate().map(
        |(index, highlight)| {
            TextBlock::new(vec![
                Span::styled(format!("{}  ", ordinal(index)), body).colored(theme.palette.gray),
                Span::styled(highlight.clone(), body),
            ])
            .with_space_after(body.spacing())
        },
    ));
    Some(Fragment::section(SectionBlock::new(
        "ai-analysis",
        "AI Analysis",
        "Overall insights the AI drew from the data: key trends and strategic implications.",
        SectionBody::Notes(notes),
    )))
}

fn ai_categories(ai: &AiAnalysis, theme: &Theme) -> Option<Fragment> {
    if ai.category_analysis.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = strong(theme.style(StyleName::TableCellCenter));
    let mut table = DataTable::new(theme, theme.palette.insight_header)
        .column("Category", 2.5, Left)
        .column("Rate", 1.8, Center)
        .column("Insight", 7.2, Left);
    for category in ai.category_analysis.iter().take(AI_CATEGORY_LIMIT) {
        let verdict = Verdict::classify(category.citation_rate, Thresholds::VISIBILITY);
        table.push_row(vec![
            Cell::styled(category.category.clone(), strong(cell)),
            Cell::colored(
                format::percent(category.citation_rate),
                center,
                theme.verdict_color(verdict),
            ),
            Cell::styled(format::truncate(&category.insight, INSIGHT_CHARS), cell),
        ]);
    }
    Some(table_section(
        "ai-categories",
        "Category Insights",
        "Citation results and their causes per category, with strengths and directions for improvement.",
        table,
    ))
}

fn ai_competitors(ai: &AiAnalysis, theme: &Theme) -> Option<Fragment> {
    if ai.competitor_analysis.trim().is_empty() {
        return None;
    }
    Some(Fragment::section(SectionBlock::new(
        "ai-competitors",
        "Competitor Analysis",
        "How competitors are positioned in AI search results. Use it to shape differentiation.",
        SectionBody::Notes(vec![TextBlock::styled(
            ai.competitor_analysis.clone(),
            theme.style(StyleName::Body),
        )]),
    )))
}

fn ai_actions(ai: &AiAnalysis, theme: &Theme) -> Option<Fragment> {
    if ai.action_items.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = strong(theme.style(StyleName::TableCellCenter));
    let mut table = DataTable::new(theme, theme.palette.action_header)
        .column("No.", 1.2, Center)
        .column("Action Item", 10.3, Left);
    for (index, item) in ai.action_items.iter().take(AI_ACTION_LIMIT).enumerate() {
        table.push_row(vec![
            Cell::styled(ordinal(index), center),
            Cell::styled(format::truncate(item, ACTION_CHARS), cell),
        ]);
    }
    Some(table_section(
        "ai-actions",
        "Action Items",
        "Concrete improvements proposed by the AI analysis, in order of priority.",
        table,
    ))
}
