//! GEO score audit report.

use crate::format;
use crate::layout::HorizontalAlignment::{Center, Left};
use crate::layout::{Cell, DataTable, Frame, Fragment};
use crate::metadata::DocumentInfo;
use crate::model::score::{Category, Page, ScoreReport};
use crate::richtext::Span;
use crate::routes::{group_pages, route_path, RouteGroup};
use crate::theme::{PriorityScale, StyleName, TextStyle, Theme, Thresholds, Verdict};

use super::{document_header, footer_lines, page_break, table_section, RenderContext, Report};

pub const TITLE: &str = "GEO Score Audit Report";
const MASTHEAD: (&str, &str) = ("GEO SCORE", "SITE OPTIMIZATION AUDIT");

const CATEGORY_LIMIT: usize = 10;
const ITEM_LIMIT: usize = 10;
const RECOMMENDATION_LIMIT: usize = 8;
const DETAIL_CHARS: usize = 35;
const ISSUE_CHARS: usize = 40;
const PATH_CHARS: usize = 20;
const PATH_TAIL: usize = 17;

/// Builds the complete audit document.
pub fn assemble(report: &ScoreReport, context: &RenderContext) -> Report {
    let theme = &context.theme;
    let mut fragments = header(report, context);
    fragments.push(score_summary(report, theme));
    fragments.extend(category_analysis(report, theme));
    fragments.extend(category_details(report, theme));
    fragments.extend(page_break(MASTHEAD));
    fragments.extend(recommendations(report, theme));
    fragments.extend(route_sections(report, theme));
    fragments.push(certification(report, context));
    fragments.extend(footer_lines(
        theme,
        true,
        &[
            "GEO Tracker | GEO Score Analysis Platform".to_owned(),
            "This is an automatically generated audit document.".to_owned(),
        ],
    ));

    let subject = if report.url.is_empty() {
        "GEO score audit".to_owned()
    } else {
        report.url.clone()
    };
    Report {
        info: DocumentInfo::new(TITLE, subject),
        fragments,
    }
}

pub fn header(report: &ScoreReport, context: &RenderContext) -> Vec<Fragment> {
    let date = context.display_date(&report.analyzed_at);
    let subtitle = if report.url.is_empty() {
        format!("Analyzed: {}", date)
    } else {
        format!("Target: {} | {}", report.url, date)
    };
    document_header(&context.theme, MASTHEAD, TITLE, subtitle)
}

fn grade_description(grade: &str) -> &'static str {
    match grade {
        "A+" => "GEO optimization is at the highest level.",
        "A" => "GEO optimization meets a high standard.",
        "B+" => "GEO optimization is above average.",
        "B" => "Basic GEO optimization is in place.",
        "C+" => "Some improvements are recommended.",
        "C" => "Significant improvements are needed.",
        "D" => "Major improvements are needed.",
        "F" => "Comprehensive GEO optimization is needed.",
        _ => "",
    }
}

/// Score, grade, page count and verdict. Always present.
pub fn score_summary(report: &ScoreReport, theme: &Theme) -> Fragment {
    let grade = report.grade_or_default();
    let verdict = Verdict::classify(report.total_score, Thresholds::AUDIT);
    let center = theme.style(StyleName::TableCellCenter);

    let table = DataTable::new(theme, theme.palette.black)
        .column("SCORE", 2.8, Center)
        .column("GRADE", 2.8, Center)
        .column("PAGES", 2.8, Center)
        .column("VERDICT", 2.8, Center)
        .with_row(vec![
            Cell::styled(format::number(report.total_score), theme.style(StyleName::MetricValue)),
            Cell::colored(grade, theme.style(StyleName::GradeValue), theme.grade_color(grade)),
            Cell::styled(report.pages.len().to_string(), theme.style(StyleName::GradeValue)),
            Cell::colored(
                verdict.label(),
                theme.style(StyleName::Verdict),
                theme.verdict_color(verdict),
            ),
        ])
        .with_row(vec![
            Cell::styled("/ 100", center),
            Cell::default(),
            Cell::styled("pages", center),
            Cell::default(),
        ]);

    let description = format!(
        "GEO optimization score and grade of the site. {}",
        grade_description(grade)
    );
    table_section("score-summary", "Score Summary", description.trim_end(), table)
}

/// One row per scoring category.
pub fn category_analysis(report: &ScoreReport, theme: &Theme) -> Option<Fragment> {
    if report.categories.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);

    let mut table = DataTable::new(theme, theme.palette.black)
        .column("CATEGORY", 3.5, Left)
        .column("SCORE", 3.0, Center)
        .column("RATE", 2.5, Center)
        .column("STATUS", 2.5, Center);
    for (key, category) in report.categories.iter().take(CATEGORY_LIMIT) {
        let verdict = Verdict::classify(category.percentage, Thresholds::AUDIT);
        table.push_row(vec![
            Cell::styled(format::category_label(key), bold(cell)),
            Cell::styled(format::ratio(category.score, category.max_score), center),
            Cell::styled(format::percent(category.percentage), center),
            verdict_cell(theme, verdict, center),
        ]);
    }

    Some(table_section(
        "categories",
        "Category Analysis",
        "Optimization score of each core category. Review how every area performs and find the ones that need work.",
        table,
    ))
}

fn category_description(key: &str, label: &str) -> String {
    match key {
        "structure" => "Document structure: HTML layout, heading hierarchy and semantic markup.".to_owned(),
        "schema" => "Coverage of Schema.org structured data markup.".to_owned(),
        "url" => "URL structure, path clarity and keyword usage.".to_owned(),
        "meta" => "Meta tags, Open Graph properties and descriptions.".to_owned(),
        "content" => "Content quality, keyword density and readability.".to_owned(),
        _ => format!("Item scores for {}.", label),
    }
}

/// One item table per category that carries items.
pub fn category_details(report: &ScoreReport, theme: &Theme) -> Vec<Fragment> {
    report
        .categories
        .iter()
        .take(CATEGORY_LIMIT)
        .filter(|(_, category)| !category.items.is_empty())
        .map(|(key, category)| detail_section(key, category, theme))
        .collect()
}

fn detail_section(key: &str, category: &Category, theme: &Theme) -> Fragment {
    let label = format::category_label(key);
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);

    let mut table = DataTable::new(theme, theme.palette.gray_dark)
        .column("ITEM", 3.0, Left)
        .column("SCORE", 1.8, Center)
        .column("STATUS", 1.8, Center)
        .column("DETAIL", 4.9, Left);
    for item in category.items.iter().take(ITEM_LIMIT) {
        let verdict = if item.passed { Verdict::Pass } else { Verdict::Fail };
        table.push_row(vec![
            Cell::styled(item.name.clone(), cell),
            Cell::styled(
                format!(
                    "{}/{}",
                    format::number(item.score),
                    format::number(item.max_score)
                ),
                center,
            ),
            verdict_cell(theme, verdict, center),
            Cell::styled(format::truncate(&item.detail, DETAIL_CHARS), cell),
        ]);
    }

    let description = category_description(key, &label);
    table_section(format!("detail:{}", key), label, description, table)
}

/// Prioritised improvement list.
pub fn recommendations(report: &ScoreReport, theme: &Theme) -> Option<Fragment> {
    if report.recommendations.is_empty() {
        return None;
    }
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);

    let mut table = DataTable::new(theme, theme.palette.black)
        .column("PRIORITY", 2.2, Center)
        .column("CATEGORY", 2.5, Center)
        .column("ISSUE", 6.8, Left);
    for recommendation in report.recommendations.iter().take(RECOMMENDATION_LIMIT) {
        let priority = if recommendation.priority.is_empty() {
            "low"
        } else {
            recommendation.priority.as_str()
        };
        table.push_row(vec![
            Cell::colored(
                priority.to_uppercase(),
                bold(center),
                theme.priority_color(priority, PriorityScale::Audit),
            ),
            Cell::styled(format::category_label(&recommendation.category), center),
            Cell::styled(format::truncate(&recommendation.issue, ISSUE_CHARS), cell),
        ]);
    }

    let description = format!(
        "{} improvement recommendations in total. Apply them step by step in order of priority.",
        report.recommendations.len()
    );
    Some(table_section(
        "recommendations",
        "Recommendations",
        description,
        table,
    ))
}

/// Per-route page tables; only for multi-page reports.
pub fn route_sections(report: &ScoreReport, theme: &Theme) -> Vec<Fragment> {
    if report.pages.len() <= 1 {
        return Vec::new();
    }
    group_pages(&report.pages, |page| page.url.as_str())
        .iter()
        .map(|group| route_section(group, theme))
        .collect()
}

fn route_section(group: &RouteGroup<'_, Page>, theme: &Theme) -> Fragment {
    let cell = theme.style(StyleName::TableCell);
    let center = theme.style(StyleName::TableCellCenter);
    let small = |style: TextStyle| TextStyle { size: 7, leading: 9, ..style };

    let mut table = DataTable::new(theme, theme.palette.gray_dark)
        .column("PATH", 3.5, Left)
        .column("STR", 1.2, Center)
        .column("SCH", 1.2, Center)
        .column("URL", 1.2, Center)
        .column("META", 1.2, Center)
        .column("TOTAL", 1.5, Center)
        .column("STATUS", 1.7, Center);
    for page in &group.pages {
        let scores = &page.scores;
        let path = format::truncate_head(&route_path(&page.url), PATH_CHARS, PATH_TAIL);
        let verdict = Verdict::classify(scores.total, Thresholds::AUDIT);
        table.push_row(vec![
            Cell::styled(path, small(cell)),
            Cell::styled(format::number(scores.structure), small(center)),
            Cell::styled(format::number(scores.schema), small(center)),
            Cell::styled(format::number(scores.url), small(center)),
            Cell::styled(format::number(scores.meta), small(center)),
            Cell::styled(format::number(scores.total), bold(small(center))),
            verdict_cell(theme, verdict, small(center)),
        ]);
    }

    let shown = group.pages.len();
    let mut description = format!("Category scores of the {} pages under this route.", shown + group.hidden);
    if group.hidden > 0 {
        description.push_str(&format!(" The first {} are listed.", shown));
    }
    table_section(
        format!("route:{}", group.route),
        format!("Route: {}", group.display_name()),
        description,
        table,
    )
}

/// Final score, grade and document identifier. Always present.
pub fn certification(report: &ScoreReport, context: &RenderContext) -> Fragment {
    let theme = &context.theme;
    let grade = report.grade_or_default();
    let style = theme.style(StyleName::Certification);

    let table = DataTable::new(theme, theme.palette.black)
        .framed(Frame::Box)
        .column("AUDIT CERTIFICATION", 11.5, Center)
        .with_row(vec![Cell::new(
            vec![Span::styled(
                format!("Final Score: {}/100", format::number(report.total_score)),
                style,
            )
            .bold()
            .with_size(Some(16))],
            Center,
        )])
        .with_row(vec![Cell::new(
            vec![Span::styled(format!("Grade: {}", grade), style)
                .bold()
                .with_size(Some(14))
                .colored(theme.grade_color(grade))],
            Center,
        )])
        .with_row(vec![Cell::styled(
            format!("Document ID: {}", format::document_id(&context.generated_at)),
            style,
        )])
        .with_row(vec![Cell::styled(
            format!("Generated: {}", context.timestamp()),
            style,
        )]);

    table_section(
        "certification",
        "Certification",
        "Certifies that the GEO optimization analysis is complete. Every assessment follows the standard GEO criteria.",
        table,
    )
}

fn bold(style: TextStyle) -> TextStyle {
    TextStyle { bold: true, ..style }
}

fn verdict_cell(theme: &Theme, verdict: Verdict, style: TextStyle) -> Cell {
    Cell::colored(verdict.label(), bold(style), theme.verdict_color(verdict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_json;
    use crate::layout::{contains_text, find_section, section_ids};
    use chrono::{Local, TimeZone};

    fn context() -> RenderContext {
        let at = Local
            .with_ymd_and_hms(2024, 1, 15, 9, 30, 0)
            .single()
            .expect("valid local time");
        RenderContext::at(Theme::audit(), at)
    }

    fn sample() -> ScoreReport {
        parse_json(
            r#"{
                "url": "https://example.com",
                "analyzedAt": "2024-01-15T10:30:00Z",
                "totalScore": 72,
                "grade": "B",
                "pages": [
                    {"url": "https://example.com/", "scores": {"structure": 80, "schema": 60, "url": 90, "meta": 70, "total": 75}},
                    {"url": "https://example.com/blog/first-post", "scores": {"total": 45}},
                    {"url": "https://example.com/blog/second", "scores": {"total": 65}},
                    {"url": "https://example.com/about", "scores": {"total": 80}}
                ],
                "categories": {
                    "structure": {"score": 20, "maxScore": 25, "percentage": 80, "items": [
                        {"name": "Heading hierarchy", "score": 5, "maxScore": 5, "passed": true, "detail": "All pages use a single h1 followed by ordered subheadings"},
                        {"name": "Semantic tags", "score": 0, "maxScore": 5, "passed": false, "detail": "missing"}
                    ]},
                    "schema": {"score": 10, "maxScore": 25, "percentage": 40},
                    "custom": {"score": 5, "maxScore": 10, "percentage": 55, "items": []}
                },
                "recommendations": [
                    {"priority": "high", "category": "schema", "issue": "Add Organization and WebSite structured data to the home page"},
                    {"priority": "low", "category": "meta", "issue": "Shorten titles"}
                ]
            }"#,
        )
        .expect("valid sample")
    }

    #[test]
    fn sections_follow_the_audit_order() {
        let report = assemble(&sample(), &context());
        assert_eq!(
            section_ids(&report.fragments),
            [
                "score-summary",
                "categories",
                "detail:structure",
                "recommendations",
                "route:/",
                "route:/blog",
                "route:/about",
                "certification",
            ]
        );
        assert_eq!(report.info.title, TITLE);
        assert_eq!(report.info.subject, "https://example.com");
    }

    #[test]
    fn summary_colours_grade_and_verdict() {
        let report = assemble(&sample(), &context());
        let summary = find_section(&report.fragments, "score-summary").expect("summary");
        let table = summary.table().expect("summary table");
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("72"));
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("B"));
        assert_eq!(table.cell_text(0, 2).as_deref(), Some("4"));
        assert_eq!(table.cell_text(0, 3).as_deref(), Some("PASS"));
        assert!(summary.description.contains("Basic GEO optimization"));
    }

    #[test]
    fn category_rows_keep_input_order_and_labels() {
        let report = assemble(&sample(), &context());
        let table = find_section(&report.fragments, "categories")
            .and_then(|section| section.table())
            .expect("category table");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("STRUCTURE"));
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("20 / 25"));
        assert_eq!(table.cell_text(0, 2).as_deref(), Some("80%"));
        assert_eq!(table.cell_text(1, 3).as_deref(), Some("FAIL"));
        assert_eq!(table.cell_text(2, 0).as_deref(), Some("CUSTOM"));
        assert_eq!(table.cell_text(2, 3).as_deref(), Some("WARN"));
    }

    #[test]
    fn detail_rows_truncate_long_text() {
        let report = assemble(&sample(), &context());
        let table = find_section(&report.fragments, "detail:structure")
            .and_then(|section| section.table())
            .expect("detail table");
        assert_eq!(table.cell_text(0, 2).as_deref(), Some("PASS"));
        assert_eq!(table.cell_text(1, 2).as_deref(), Some("FAIL"));
        let detail = table.cell_text(0, 3).expect("detail cell");
        assert_eq!(detail.chars().count(), DETAIL_CHARS + 3);
        assert!(detail.ends_with("..."));
        assert_eq!(table.cell_text(1, 3).as_deref(), Some("missing"));
    }

    #[test]
    fn recommendations_are_capped_and_upper_cased() {
        let mut input = sample();
        let template = input.recommendations[0].clone();
        input.recommendations = vec![template; 12];
        let report = assemble(&input, &context());
        let section = find_section(&report.fragments, "recommendations").expect("section");
        let table = section.table().expect("table");
        assert_eq!(table.row_count(), RECOMMENDATION_LIMIT);
        assert_eq!(table.cell_text(0, 0).as_deref(), Some("HIGH"));
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("SCHEMA"));
        assert!(section.description.starts_with("12 "));
    }

    #[test]
    fn single_page_reports_skip_route_tables() {
        let mut input = sample();
        input.pages.truncate(1);
        let report = assemble(&input, &context());
        assert!(section_ids(&report.fragments)
            .iter()
            .all(|id| !id.starts_with("route:")));
    }

    #[test]
    fn route_groups_use_root_label_and_page_cap() {
        let mut input = sample();
        let extra = input.pages[1].clone();
        input.pages.extend(std::iter::repeat(extra).take(10));
        let report = assemble(&input, &context());
        let root = find_section(&report.fragments, "route:/").expect("root group");
        assert_eq!(root.title, "Route: / (root)");
        let blog = find_section(&report.fragments, "route:/blog").expect("blog group");
        assert_eq!(blog.table().map(|table| table.row_count()), Some(8));
        assert!(blog.description.contains("12 pages"));
    }

    #[test]
    fn empty_input_still_renders_summary_and_certification() {
        let report = assemble(&ScoreReport::default(), &context());
        assert_eq!(
            section_ids(&report.fragments),
            ["score-summary", "certification"]
        );
        let summary = find_section(&report.fragments, "score-summary").expect("summary");
        let table = summary.table().expect("table");
        assert_eq!(table.cell_text(0, 1).as_deref(), Some("F"));
        assert_eq!(table.cell_text(0, 3).as_deref(), Some("FAIL"));
        assert!(contains_text(&report.fragments, "Analyzed: 2024-01-15"));
    }

    #[test]
    fn certification_carries_document_id() {
        let report = assemble(&sample(), &context());
        assert!(contains_text(&report.fragments, "Document ID: GEO-20240115093000"));
        assert!(contains_text(&report.fragments, "Generated: 2024-01-15 09:30"));
        assert!(contains_text(&report.fragments, "Final Score: 72/100"));
        assert!(contains_text(
            &report.fragments,
            "This is an automatically generated audit document."
        ));
    }
}
