//! AI insights report: how AI answers mention a brand.

use serde_json::Value;

use crate::format;
use crate::input::value_text;
use crate::layout::HorizontalAlignment::{Center, Left};
use crate::layout::{Cell, DataTable, Fragment};
use crate::metadata::DocumentInfo;
use crate::model::insights::InsightsReport;
use crate::theme::{PriorityScale, StyleName, TextStyle, Theme};

use super::{document_header, footer_lines, page_break, table_section, RenderContext, Report};

pub const TITLE: &str = "AI Insights Report";
const MASTHEAD_RIGHT: &str = "AI INSIGHTS REPORT";

const KEYWORD_LIMIT: usize = 10;
const CATEGORY_LIMIT: usize = 8;
const PATTERN_LIMIT: usize = 5;
const GAP_LIMIT: usize = 6;
const ACTION_LIMIT: usize = 6;

pub fn assemble(report: &InsightsReport, context: &RenderContext) -> Report {
    let theme = &context.theme;
    let masthead = (report.brand_name.as_str(), MASTHEAD_RIGHT);

    let date = context.display_date(&report.metadata.analyzed_at);
    let mut fragments = document_header(
        theme,
        masthead,
        TITLE,
        format!("AI response pattern analysis | {}", date),
    );
    fragments.push(summary(report, theme));
    fragments.extend(keywords(report, theme));
    fragments.extend(category_insights(report, theme));
    fragments.extend(page_break(masthead));
    fragments.extend(citation_patterns(report, theme));
    fragments.extend(content_gaps(report, theme));
    fragments.extend(actions(report, theme));
    fragments.extend(footer_lines(
        theme,
        false,
        &[format!("Generated by GEO Tracker | {}", context.timestamp())],
    ));

    let subject = if report.brand_name.is_empty() {
        "AI response insights".to_owned()
    } else {
        report.brand_name.clone()
    };
    Report {
        info: DocumentInfo::new(TITLE, subject),
        fragments,
    }
}

fn strong(style: TextStyle) -> TextStyle {
    TextStyle { bold: true, ..style }
}

/// Response counts and the derived citation rate. Always present.
pub fn summary(report: &InsightsReport, theme: &Theme) -> Fragment {
    let value = strong(theme.style(StyleName::TableCellCenter));
    let table = DataTable::new(theme, theme.palette.black)
        .column("RESPONSES", 2.2, Center)
        .column("CITED", 2.2, Center)
        .column("RATE", 2.2, Center)
        .column("KEYWORDS", 2.2, Center)
        .column("ACTIONS", 2.2, Center)
        .with_row(vec![
            Cell::styled(format::number(report.metadata.total_responses), value),
            Cell::styled(format::number(report.metadata.cited_responses), value),
            Cell::styled(format::percent(report.citation_rate()), value),
            Cell::styled(report.common_keywords.len().to_string(), value),
            Cell::styled(report.actionable_insights.len().to_string(), value),
        ]);

    table_section(
        "summary",
        "Analysis Summary",
        "Key figures of the AI response analysis: how many answers were examined and how often the brand was cited.",
        table,
    )
}

pub fn keywords(report: &InsightsReport, theme: &Theme) -> Option<Fragment> {
    if report.common_keywords.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("KEYWORD", 3.5, Left)
        .column("DESCRIPTION", 8.0, Left);
    for keyword in report.common_keywords.iter().take(KEYWORD_LIMIT) {
        table.push_row(vec![
            Cell::styled(keyword.keyword.clone(), strong(cell)),
            Cell::styled(format::truncate(&keyword.description, 50), cell),
        ]);
    }
    Some(table_section(
        "keywords",
        "Target Keywords",
        "Keywords AI answers mention most often. Content that includes them is more likely to be cited.",
        table,
    ))
}

pub fn category_insights(report: &InsightsReport, theme: &Theme) -> Option<Fragment> {
    if report.category_insights.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("CATEGORY", 3.5, Left)
        .column("RECOMMENDATION", 8.0, Left);
    for insight in report.category_insights.iter().take(CATEGORY_LIMIT) {
        table.push_row(vec![
            Cell::styled(insight.category.clone(), strong(cell)),
            Cell::styled(format::truncate(&insight.recommendation, 60), cell),
        ]);
    }
    Some(table_section(
        "category-insights",
        "Category Insights",
        "AI response patterns per category with strategic recommendations.",
        table,
    ))
}

/// Text of a pattern entry; structured entries are shown as compact JSON.
fn pattern_text(value: Option<&Value>) -> String {
    value.map(value_text).unwrap_or_default()
}

/// Cited and uncited answer patterns side by side.
pub fn citation_patterns(report: &InsightsReport, theme: &Theme) -> Option<Fragment> {
    let cited = &report.citation_patterns.cited_patterns;
    let uncited = &report.citation_patterns.uncited_patterns;
    if cited.is_empty() && uncited.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let mut table = DataTable::new(theme, theme.palette.black)
        .column_filled("CITED PATTERNS", 5.75, Left, theme.palette.pass)
        .column_filled("UNCITED PATTERNS", 5.75, Left, theme.palette.fail);
    let rows = cited.len().max(uncited.len()).min(PATTERN_LIMIT);
    for index in 0..rows {
        table.push_row(vec![
            Cell::styled(pattern_text(cited.get(index)), cell),
            Cell::styled(pattern_text(uncited.get(index)), cell),
        ]);
    }
    Some(table_section(
        "citation-patterns",
        "Citation Patterns",
        "How answers that cite the brand differ from answers that do not.",
        table,
    ))
}

pub fn content_gaps(report: &InsightsReport, theme: &Theme) -> Option<Fragment> {
    if report.content_gaps.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let mut table = DataTable::new(theme, theme.palette.warning)
        .column("AREA", 3.5, Left)
        .column("RECOMMENDATION", 8.0, Left);
    for gap in report.content_gaps.iter().take(GAP_LIMIT) {
        table.push_row(vec![
            Cell::styled(gap.area.clone(), strong(cell)),
            Cell::styled(format::truncate(&gap.recommendation, 50), cell),
        ]);
    }
    Some(table_section(
        "content-gaps",
        "Content Gaps",
        "Areas the current content does not cover well enough.",
        table,
    ))
}

/// Prioritised actions; `low` reads in the informational colour.
pub fn actions(report: &InsightsReport, theme: &Theme) -> Option<Fragment> {
    if report.actionable_insights.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = strong(theme.style(StyleName::TableCellCenter));
    let mut table = DataTable::new(theme, theme.palette.black)
        .column("ACTION", 4.0, Left)
        .column("DESCRIPTION", 5.5, Left)
        .column("PRIORITY", 2.0, Center);
    for action in report.actionable_insights.iter().take(ACTION_LIMIT) {
        let priority = if action.priority.is_empty() {
            "low"
        } else {
            action.priority.as_str()
        };
        table.push_row(vec![
            Cell::styled(action.title.clone(), strong(cell)),
            Cell::styled(format::truncate(&action.description, 40), cell),
            Cell::colored(
                format::priority_label(priority),
                center,
                theme.priority_color(priority, PriorityScale::Insights),
            ),
        ]);
    }
    Some(table_section(
        "actions",
        "Action Guide",
        "Steps that improve AI visibility. Work through them in order of priority.",
        table,
    ))
}
