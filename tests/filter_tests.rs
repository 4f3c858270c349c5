use results_report::app::ReportApp;
use results_report::config::ReportConfig;
use results_report::filter::{FilterState, TagGroup};
use results_report::filter_ui::{build_filters, FilterEvent};
use results_report::loader::{ResultsLoader, ResultsSource};
use results_report::results::{ResultsDocument, StatusTag};
use std::io::Write;

const RESULTS: &str = r#"{
    "tests": [
        {"name": "a", "status": "imp-start", "start": 20.0, "end": 2.0, "time": 10.0, "link": "a"},
        {"name": "b", "status": "eq-target", "start": 8.0, "end": 1.0, "target": 1.0, "time": 10.0, "link": "b"},
        {"name": "c", "status": "gt-start", "start": 4.0, "end": 3.0, "time": 10.0, "link": "c"},
        {"name": "d", "status": "lt-target", "start": 4.0, "end": 3.5, "target": 1.0, "time": 10.0, "link": "d"},
        {"name": "e", "status": "timeout", "start": null, "end": null, "time": 10.0, "link": "e"},
        {"name": "f", "status": "crash", "start": null, "end": null, "time": 10.0, "link": "f"}
    ],
    "merged-cost-accuracy": [[1.0, 0.5], [[2.0, 0.9]]]
}"#;

fn row_names(body: &results_report::element::Node) -> Vec<String> {
    let tbody = body.as_element().unwrap().find_all("tbody")[0];
    tbody
        .child_elements()
        .map(|tr| tr.child_elements().next().unwrap().text_content())
        .collect()
}

fn results_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RESULTS.as_bytes()).unwrap();
    file
}

#[test]
fn test_group_toggle_restores_rows() {
    let file = results_file();
    let loader = ResultsLoader::new(ResultsSource::parse(&file.path().to_string_lossy()));
    let mut app = ReportApp::new(loader, ReportConfig::default());

    let all = row_names(&app.render());
    assert_eq!(all.len(), 6);

    let body = app.dispatch(FilterEvent::ToggleGroup(TagGroup::Improved));
    assert_eq!(row_names(&body), vec!["c", "d", "e", "f"]);

    let body = app.dispatch(FilterEvent::ToggleGroup(TagGroup::Improved));
    assert_eq!(row_names(&body), all);
}

#[test]
fn test_gt_start_survives_both_groups() {
    let doc = ResultsDocument::from_json(RESULTS).unwrap();
    let mut filter = FilterState::new();
    filter.toggle_group(TagGroup::Improved);
    filter.toggle_group(TagGroup::Regressed);

    let names: Vec<&str> = filter.visible(&doc.tests).map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["c"]);
}

#[test]
fn test_single_tag_toggle_makes_leader_partial() {
    let doc = ResultsDocument::from_json(RESULTS).unwrap();
    let mut filter = FilterState::new();
    FilterEvent::ToggleTag(StatusTag::Crash).apply(&mut filter);

    assert!(!filter.group_checked(TagGroup::Regressed));
    assert!(filter.group_partial(TagGroup::Regressed));
    assert!(filter.group_checked(TagGroup::Improved));

    let filters = build_filters(&doc, &filter);
    let html = filters.to_html();
    assert!(html.contains("regressed leader partial"), "{}", html);
}

#[test]
fn test_rerender_matches_fresh_render() {
    let doc = ResultsDocument::from_json(RESULTS).unwrap();
    let config = ReportConfig::default();

    let mut toggled = FilterState::new();
    toggled.toggle_tag(StatusTag::Timeout);
    toggled.toggle_tag(StatusTag::Timeout);

    assert_eq!(
        results_report::page::render_page(&doc, &toggled, &config),
        results_report::page::render_page(&doc, &FilterState::new(), &config)
    );
}
