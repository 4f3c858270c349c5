use crate::element::{element, Child, Node, Props};
use crate::filter::FilterState;
use crate::results::{ResultsDocument, TestRecord};
use crate::stats::{format_percent, percent_accurate};

const RESULT_HELP: &str = "Color key:
    Green: improved accuracy
    Light green: no initial error
    Orange: no accuracy change
    Red: accuracy worsened
    Gray: timeout
    Dark Gray: error";

const TARGET_HELP: &str = "Color key:
    Dark green: better than target
    Green: matched target
    Orange: improved but did not match target
    Yellow: no accuracy change";

fn td(text: impl Into<Child>) -> Node {
    element("td", Props::new(), text)
}

fn help_button(title: &str) -> Node {
    element("span", Props::new().class("help-button").set("title", title), "?")
}

/// One row for a test. `index` is the row's position among rendered rows and
/// names the detail link anchor.
pub fn table_row(test: &TestRecord, index: usize, max_score: f64) -> Node {
    let max = test.max_score(max_score);
    element(
        "tr",
        Props::new().class(test.status.as_str()),
        vec![
            td(test.name.as_str()),
            td(format_percent(percent_accurate(test.start, max))),
            td(format_percent(percent_accurate(test.end, max))),
            td(format_percent(percent_accurate(test.target, max))),
            td(test.time.to_string()),
            td(element(
                "a",
                Props::new()
                    .id(format!("test{}", index))
                    .set("href", test.detail_href()),
                "»",
            )),
        ],
    )
}

/// Rows for every test whose status is not filtered out, in original order.
pub fn table_body(doc: &ResultsDocument, filter: &FilterState, max_score: f64) -> Node {
    let rows: Vec<Node> = filter
        .visible(&doc.tests)
        .enumerate()
        .map(|(i, t)| table_row(t, i, max_score))
        .collect();
    element("tbody", Props::new(), rows)
}

pub fn results_table(doc: &ResultsDocument, filter: &FilterState, max_score: f64) -> Node {
    let head = element(
        "thead",
        Props::new(),
        element(
            "tr",
            Props::new(),
            vec![
                element("th", Props::new(), "Test"),
                element("th", Props::new(), "Start"),
                element(
                    "th",
                    Props::new(),
                    vec![Child::from("Result"), Child::from(help_button(RESULT_HELP))],
                ),
                element(
                    "th",
                    Props::new(),
                    vec![Child::from("Target"), Child::from(help_button(TARGET_HELP))],
                ),
                element("th", Props::new(), "Time"),
                element("th", Props::new(), Child::Empty),
            ],
        ),
    );
    element(
        "table",
        Props::new().id("results"),
        vec![head, table_body(doc, filter, max_score)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{CostAccuracy, CostPoint, RunTime, StatusTag};

    fn record(name: &str, status: StatusTag) -> TestRecord {
        TestRecord {
            name: name.into(),
            status,
            start: Some(32.0),
            end: Some(8.0),
            target: None,
            time: RunTime::Millis(1500.0),
            link: format!("{}-dir", name),
            bits: None,
        }
    }

    fn doc(tests: Vec<TestRecord>) -> ResultsDocument {
        ResultsDocument {
            tests,
            merged_cost_accuracy: CostAccuracy(CostPoint(1.0, 0.5), Vec::new()),
        }
    }

    #[test]
    fn row_cells() {
        let row = table_row(&record("sqrt", StatusTag::ImpStart), 3, 64.0);
        let tr = row.as_element().unwrap();
        assert!(tr.has_class("imp-start"));
        let cells: Vec<String> = tr.find_all("td").iter().map(|c| c.text_content()).collect();
        assert_eq!(cells, vec!["sqrt", "50.0%", "87.5%", "-", "1.5s", "»"]);
        let link = tr.find_by_id("test3").unwrap();
        assert_eq!(link.attr("href"), Some("sqrt-dir/graph.html"));
    }

    #[test]
    fn excluded_rows_are_dropped_and_ids_follow_rendered_order() {
        let d = doc(vec![
            record("a", StatusTag::Crash),
            record("b", StatusTag::ImpStart),
            record("c", StatusTag::Timeout),
            record("d", StatusTag::ImpStart),
        ]);
        let filter = FilterState::with_excluded([StatusTag::Crash, StatusTag::Timeout]);
        let body = table_body(&d, &filter, 64.0);
        let tbody = body.as_element().unwrap();
        assert_eq!(tbody.child_count(), 2);
        assert_eq!(tbody.find_by_id("test0").unwrap().attr("href"), Some("b-dir/graph.html"));
        assert_eq!(tbody.find_by_id("test1").unwrap().attr("href"), Some("d-dir/graph.html"));
    }

    #[test]
    fn empty_tests_give_empty_body() {
        let body = table_body(&doc(Vec::new()), &FilterState::new(), 64.0);
        assert_eq!(body.to_html(), "<tbody></tbody>");
    }

    #[test]
    fn header_has_help_buttons() {
        let table = results_table(&doc(Vec::new()), &FilterState::new(), 64.0);
        let table = table.as_element().unwrap();
        assert_eq!(table.find_all("th").len(), 6);
        assert_eq!(table.find_all("span").len(), 2);
    }
}
