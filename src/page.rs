use crate::charts::{plot_pareto, plot_xy};
use crate::config::ReportConfig;
use crate::element::{element, escape_html, Child, Node, Props};
use crate::error::{ReportError, Result};
use crate::filter::{FilterState, TagGroup};
use crate::filter_ui::build_filters;
use crate::results::ResultsDocument;
use crate::stats::{compute_summary, format_percent, SummaryStats};
use crate::table::results_table;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

const XY_TITLE: &str = "Output vs Input Accuracy";
const XY_CAPTION: &str = "Each point represents a run below. Its horizontal position shows initial accuracy, and vertical position shows final accuracy. Points above the line are improved.";
const PARETO_TITLE: &str = "Accuracy vs Speed";
const PARETO_CAPTION: &str = "A joint speed-accuracy pareto curve. Accuracy is on the vertical axis, speed is on the horizontal axis. Up and to the right is better. The initial program is shown by the red square.";

const STYLE: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;max-width:1000px;margin:0 auto;padding:16px;color:#222}
header{display:flex;align-items:center;gap:16px;border-bottom:1px solid #ddd;margin-bottom:16px}
header h1{flex:1;font-weight:500}
header img{height:48px}
nav ul{list-style:none;margin:0;padding:0}
#large{display:flex;flex-wrap:wrap;gap:24px;margin:16px 0;font-size:1.1em}
#large .number{display:block;font-size:1.8em;font-weight:600}
#large .unit{color:#888;font-weight:300}
.figure-row{display:flex;flex-wrap:wrap;gap:24px}
figure{flex:1;min-width:320px;margin:0}
figure svg{width:100%;height:auto}
figcaption{color:#555;font-size:0.9em}
svg.clickable a{cursor:pointer}
#filters{margin:16px 0}
#filters label{margin-right:12px;white-space:nowrap}
#filters .leader.partial{font-style:italic}
#filters label[title]{color:#999}
.section-title{font-weight:600;margin-bottom:4px}
table{width:100%;border-collapse:collapse}
th,td{padding:4px 8px;border-bottom:1px solid #eee;text-align:left}
tbody tr{cursor:pointer}
.help-button{display:inline-block;margin-left:4px;color:#888;cursor:help}
.hidden{display:none}
tr.imp-start td:nth-child(3){background:#cfc}
tr.ex-start td:nth-child(3),tr.eq-start td:nth-child(3){background:#e8f8e8}
tr.apx-start td:nth-child(3),tr.lt-start td:nth-child(3){background:#fe9}
tr.uni-start td:nth-child(3){background:#fcc}
tr.gt-target td:nth-child(4){background:#8c8}
tr.eq-target td:nth-child(4){background:#cfc}
tr.lt-target td:nth-child(4){background:#fd9}
tr.timeout td:nth-child(3){background:#ddd}
tr.error td:nth-child(3),tr.crash td:nth-child(3){background:#aaa}
.error-state{border:1px solid #c00;background:#fee;padding:16px}
"#;

const SCRIPT: &str = r#"
const GROUPS = __GROUPS__;
function memberBoxes(group) {
  return GROUPS[group].map(function (tag) {
    return document.querySelector('#filters label[data-label="' + tag + '"] input');
  }).filter(function (box) { return box; });
}
function syncLeaders() {
  document.querySelectorAll('#filters label[data-group]').forEach(function (label) {
    const boxes = memberBoxes(label.dataset.group);
    const off = boxes.filter(function (box) { return !box.checked; }).length;
    label.querySelector('input').checked = off === 0;
    label.classList.toggle('partial', off > 0 && off < boxes.length);
  });
}
function applyFilters() {
  const hidden = [];
  document.querySelectorAll('#filters label[data-label] input').forEach(function (box) {
    if (!box.checked) { hidden.push(box.parentNode.dataset.label); }
  });
  document.querySelectorAll('#results tbody tr, #xy a').forEach(function (el) {
    const off = hidden.some(function (tag) { return el.classList.contains(tag); });
    el.classList.toggle('hidden', off);
  });
  syncLeaders();
}
document.querySelectorAll('#filters label[data-group] input').forEach(function (box) {
  box.addEventListener('change', function () {
    const live = memberBoxes(box.parentNode.dataset.group).filter(function (child) {
      return !child.disabled;
    });
    const show = live.some(function (child) { return !child.checked; });
    live.forEach(function (child) { child.checked = show; });
    applyFilters();
  });
});
document.querySelectorAll('#filters label[data-label] input').forEach(function (box) {
  box.addEventListener('change', applyFilters);
});
document.querySelectorAll('#results tbody tr').forEach(function (tr) {
  tr.addEventListener('click', function (e) {
    if (e.target.tagName !== 'A') { tr.querySelector('a').click(); }
  });
});
"#;

fn header(config: &ReportConfig) -> Node {
    let navigation = element(
        "nav",
        Props::new(),
        element(
            "ul",
            Props::new(),
            element(
                "li",
                Props::new(),
                element("a", Props::new().set("href", config.timeline_href.as_str()), "Metrics"),
            ),
        ),
    );
    element(
        "header",
        Props::new(),
        vec![
            element("h1", Props::new(), config.title.as_str()),
            element("img", Props::new().set("src", config.logo.as_str()), Child::Empty),
            navigation,
        ],
    )
}

fn stat(label: &str, number: Node) -> Node {
    element("div", Props::new(), vec![Child::from(label), Child::from(number)])
}

pub fn stats_block(summary: &SummaryStats) -> Node {
    element(
        "div",
        Props::new().id("large"),
        vec![
            stat(
                "Average Percentage Accurate: ",
                element(
                    "span",
                    Props::new().class("number"),
                    vec![
                        Child::from(format_percent(summary.mean_start_pct)),
                        Child::from(element("span", Props::new().class("unit"), " → ")),
                        Child::from(format_percent(summary.mean_end_pct)),
                    ],
                ),
            ),
            stat(
                "Time:",
                element("span", Props::new().class("number"), summary.time_label()),
            ),
            stat(
                "Bad Runs:",
                element(
                    "span",
                    Props::new()
                        .class("number")
                        .set("title", "Crashes and timeouts are considered bad runs."),
                    summary.bad_runs_label(),
                ),
            ),
            stat(
                "Speedup:",
                element(
                    "span",
                    Props::new()
                        .class("number")
                        .set(
                            "title",
                            "Aggregate speedup of fastest alternative that improves accuracy.",
                        ),
                    summary.speedup_label(),
                ),
            ),
        ],
    )
}

fn figure(id: &str, title: &str, chart: Node, caption: &str) -> Node {
    element(
        "figure",
        Props::new().id(id),
        vec![
            element("h2", Props::new(), title),
            chart,
            element("figcaption", Props::new(), caption),
        ],
    )
}

/// Build the whole page body from scratch for the given filter state.
pub fn render_body(doc: &ResultsDocument, filter: &FilterState, config: &ReportConfig) -> Node {
    let summary = compute_summary(doc, config.max_score);
    let figures = element(
        "div",
        Props::new().class("figure-row"),
        vec![
            figure("xy", XY_TITLE, plot_xy(&doc.tests, filter, config), XY_CAPTION),
            figure("pareto", PARETO_TITLE, plot_pareto(doc, filter, config), PARETO_CAPTION),
        ],
    );
    element(
        "body",
        Props::new(),
        vec![
            header(config),
            stats_block(&summary),
            figures,
            build_filters(doc, filter),
            results_table(doc, filter, config.max_score),
        ],
    )
}

/// Body shown when the results could not be loaded.
pub fn error_body(err: &ReportError, config: &ReportConfig) -> Node {
    element(
        "body",
        Props::new(),
        vec![
            header(config),
            element(
                "div",
                Props::new().class("error-state"),
                vec![
                    element("h2", Props::new(), "Could not load results"),
                    element("pre", Props::new(), err.to_string()),
                ],
            ),
        ],
    )
}

fn groups_json() -> String {
    let groups: BTreeMap<&str, Vec<&str>> = TagGroup::all()
        .iter()
        .map(|g| (g.key(), g.members().iter().map(|t| t.as_str()).collect()))
        .collect();
    serde_json::to_string(&groups).unwrap_or_else(|_| "{}".to_string())
}

/// Wrap a body node in a complete HTML document.
pub fn wrap_document(title: &str, body: &Node) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{style}</style>
</head>
{body}
<script>{script}</script>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body,
        script = SCRIPT.replace("__GROUPS__", &groups_json()),
    )
}

pub fn render_page(doc: &ResultsDocument, filter: &FilterState, config: &ReportConfig) -> String {
    wrap_document(&config.title, &render_body(doc, filter, config))
}

pub fn render_error_page(err: &ReportError, config: &ReportConfig) -> String {
    wrap_document(&config.title, &error_body(err, config))
}

pub fn save_report(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    info!(path = %path.display(), bytes = html.len(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_json_lists_members() {
        let json: serde_json::Value = serde_json::from_str(&groups_json()).unwrap();
        assert_eq!(json["improved"][0], "imp-start");
        assert_eq!(json["regressed"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn error_page_shows_message() {
        let err = ReportError::HttpStatus {
            url: "http://host/results.json".into(),
            status: 500,
        };
        let html = render_error_page(&err, &ReportConfig::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Could not load results"));
        assert!(html.contains("returned status 500"));
    }
}
