use crate::config::{ParetoScope, ReportConfig};
use crate::element::{element, Node, Props};
use crate::filter::FilterState;
use crate::plot::{self, Axis, Datum, Margins, MarkStyle, PlotSpec, Symbol, TickFormat};
use crate::results::{ResultsDocument, TestRecord};

const VIEW_BOX: &str = "0 0 420 420";
const FRONTIER_BLUE: &str = "#00a";
const INITIAL_RED: &str = "#d00";

fn chart_margins() -> Margins {
    Margins {
        top: 20.0,
        right: 10.0,
        bottom: 10.0,
        left: 40.0,
    }
}

fn percent_axis(domain: Option<(f64, f64)>) -> Axis {
    Axis {
        domain,
        nice: true,
        line: true,
        tick_format: TickFormat::Percent,
    }
}

/// Initial vs. final accuracy, one clickable dot per visible test.
///
/// Tests without both scores (crashes, timeouts) have nothing to place and
/// are skipped.
pub fn plot_xy(tests: &[TestRecord], filter: &FilterState, config: &ReportConfig) -> Node {
    let points: Vec<Datum> = filter
        .visible(tests)
        .filter_map(|t| {
            let max = t.max_score(config.max_score);
            let (start, end) = (t.start?, t.end?);
            Some(
                Datum::new(
                    TestRecord::accuracy(start, max),
                    TestRecord::accuracy(end, max),
                )
                .href(t.detail_href())
                .title(t.name.clone())
                .class(t.status.as_str()),
            )
        })
        .collect();

    let chart = PlotSpec {
        marks: vec![
            plot::line(
                vec![(0.0, 0.0), (1.0, 1.0)],
                MarkStyle::default().stroke("#ddd"),
            ),
            plot::dot(
                points,
                MarkStyle::default().fill(FRONTIER_BLUE).stroke_width(2.0),
            ),
        ],
        margins: chart_margins(),
        x: percent_axis(None),
        y: percent_axis(None),
        class_name: Some("clickable".to_string()),
        ..PlotSpec::default()
    };
    let mut out = plot::plot(&chart);
    out.set_attr("viewBox", VIEW_BOX);
    out
}

/// Suite-wide speed/accuracy tradeoff. The initial program is a red square,
/// the frontier a blue line.
pub fn plot_pareto(doc: &ResultsDocument, filter: &FilterState, config: &ReportConfig) -> Node {
    if config.pareto_scope == ParetoScope::HideWhenFiltered && !filter.is_empty() {
        return element(
            "p",
            Props::new().class("pareto-hidden"),
            "The pareto curve covers every test and is hidden while filters are active.",
        );
    }

    let initial = doc.merged_cost_accuracy.initial();
    let frontier: Vec<(f64, f64)> = doc
        .merged_cost_accuracy
        .frontier()
        .iter()
        .map(|p| (p.cost(), p.accuracy()))
        .collect();

    let start = Datum::new(initial.cost(), initial.accuracy()).title("Initial program");

    let chart = PlotSpec {
        marks: vec![
            plot::dot(
                vec![start],
                MarkStyle::default()
                    .stroke(INITIAL_RED)
                    .symbol(Symbol::Square)
                    .stroke_width(2.0),
            ),
            plot::line(
                frontier,
                MarkStyle::default().stroke(FRONTIER_BLUE).stroke_width(2.0),
            ),
        ],
        margins: chart_margins(),
        x: Axis {
            domain: None,
            nice: true,
            line: true,
            tick_format: TickFormat::Multiplier,
        },
        y: percent_axis(Some((0.0, 1.0))),
        ..PlotSpec::default()
    };
    let mut out = plot::plot(&chart);
    out.set_attr("viewBox", VIEW_BOX);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{CostAccuracy, CostPoint, RunTime, StatusTag};

    fn record(name: &str, status: StatusTag, start: Option<f64>, end: Option<f64>) -> TestRecord {
        TestRecord {
            name: name.into(),
            status,
            start,
            end,
            target: None,
            time: RunTime::Millis(10.0),
            link: name.into(),
            bits: None,
        }
    }

    fn doc(tests: Vec<TestRecord>) -> ResultsDocument {
        ResultsDocument {
            tests,
            merged_cost_accuracy: CostAccuracy(
                CostPoint(1.0, 0.4),
                vec![
                    CostPoint(0.5, 0.95),
                    CostPoint(2.0, 0.8),
                    CostPoint(6.0, 0.5),
                ],
            ),
        }
    }

    fn links(svg: &Node) -> Vec<String> {
        svg.as_element()
            .unwrap()
            .find_all("a")
            .iter()
            .filter_map(|a| a.attr("href").map(str::to_string))
            .collect()
    }

    #[test]
    fn scatter_respects_filter() {
        let d = doc(vec![
            record("a", StatusTag::ImpStart, Some(32.0), Some(1.0)),
            record("b", StatusTag::UniStart, Some(1.0), Some(8.0)),
        ]);
        let filter = FilterState::with_excluded([StatusTag::UniStart]);
        let svg = plot_xy(&d.tests, &filter, &ReportConfig::default());
        assert_eq!(links(&svg), vec!["a/graph.html".to_string()]);
        assert_eq!(svg.as_element().unwrap().attr("viewBox"), Some(VIEW_BOX));
    }

    #[test]
    fn scatter_skips_unscored_tests() {
        let d = doc(vec![record("c", StatusTag::Crash, None, None)]);
        let svg = plot_xy(&d.tests, &FilterState::new(), &ReportConfig::default());
        assert!(svg.as_element().unwrap().find_all("circle").is_empty());
    }

    #[test]
    fn scatter_accepts_empty_tests() {
        let svg = plot_xy(&[], &FilterState::new(), &ReportConfig::default());
        assert_eq!(svg.as_element().unwrap().tag(), "svg");
    }

    #[test]
    fn pareto_ignores_filters_by_default() {
        let d = doc(Vec::new());
        let filter = FilterState::with_excluded([StatusTag::Crash]);
        let svg = plot_pareto(&d, &filter, &ReportConfig::default());
        let svg = svg.as_element().unwrap();
        assert_eq!(svg.find_all("rect").len(), 1);
        assert_eq!(svg.find_all("path").len(), 1);
    }

    #[test]
    fn pareto_can_hide_while_filtered() {
        let config = ReportConfig {
            pareto_scope: ParetoScope::HideWhenFiltered,
            ..ReportConfig::default()
        };
        let d = doc(Vec::new());
        let hidden = plot_pareto(&d, &FilterState::with_excluded([StatusTag::Crash]), &config);
        assert_eq!(hidden.as_element().unwrap().tag(), "p");
        let shown = plot_pareto(&d, &FilterState::new(), &config);
        assert_eq!(shown.as_element().unwrap().tag(), "svg");
    }
}
