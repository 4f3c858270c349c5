use crate::element::{element, Child, Node, Props};
use crate::filter::{FilterState, TagGroup};
use crate::results::{ResultsDocument, StatusTag};
use std::collections::BTreeMap;

/// A click on one of the filter checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    ToggleTag(StatusTag),
    ToggleGroup(TagGroup),
}

impl FilterEvent {
    /// Apply the click to the filter state.
    pub fn apply(self, filter: &mut FilterState) {
        match self {
            FilterEvent::ToggleTag(tag) => {
                filter.toggle_tag(tag);
            }
            FilterEvent::ToggleGroup(group) => {
                filter.toggle_group(group);
            }
        }
    }
}

pub fn tag_counts(doc: &ResultsDocument) -> BTreeMap<StatusTag, usize> {
    let mut counts = BTreeMap::new();
    for test in &doc.tests {
        *counts.entry(test.status).or_insert(0) += 1;
    }
    counts
}

const RENDER_EXCLUDED_TITLE: &str =
    "Hidden when the report was rendered; re-render without this tag to show it.";

pub fn checkbox_label(
    class: &str,
    text: String,
    checked: bool,
    disabled: bool,
    data: (&str, &str),
) -> Node {
    element(
        "label",
        Props::new().class(class).set(data.0, data.1),
        vec![
            Child::from(element(
                "input",
                Props::new()
                    .set("type", "checkbox")
                    .set("checked", checked)
                    .set("disabled", disabled),
                Child::Empty,
            )),
            Child::from(text),
        ],
    )
}

/// Rows of a tag excluded at render time are not in the page at all, so
/// its box cannot bring them back and is rendered disabled.
fn child_checkbox(tag: StatusTag, count: usize, filter: &FilterState) -> Node {
    let excluded = filter.is_excluded(tag);
    let mut label = checkbox_label(
        tag.as_str(),
        format!("{} ({})", tag.label(), count),
        !excluded,
        excluded,
        ("data-label", tag.as_str()),
    );
    if excluded {
        label.set_attr("title", RENDER_EXCLUDED_TITLE);
    }
    label
}

fn leader_checkbox(group: TagGroup, filter: &FilterState) -> Node {
    let mut class = format!("{} leader", group.key());
    if filter.group_partial(group) {
        class.push_str(" partial");
    }
    checkbox_label(
        &class,
        group.label().to_string(),
        filter.group_checked(group),
        false,
        ("data-group", group.key()),
    )
}

/// The filter block: one leader per group, and every member tag with its
/// count under "Advanced".
pub fn build_filters(doc: &ResultsDocument, filter: &FilterState) -> Node {
    let counts = tag_counts(doc);
    let leaders: Vec<Node> = TagGroup::all()
        .iter()
        .map(|g| leader_checkbox(*g, filter))
        .collect();
    let children: Vec<Node> = TagGroup::all()
        .iter()
        .flat_map(|g| g.members().iter())
        .map(|t| child_checkbox(*t, counts.get(t).copied().unwrap_or(0), filter))
        .collect();

    element(
        "div",
        Props::new().id("filters"),
        vec![
            element("div", Props::new().class("section-title"), "Filters"),
            element("div", Props::new().id("filter-group"), leaders),
            element(
                "details",
                Props::new(),
                vec![
                    Child::from(element("summary", Props::new(), "Advanced")),
                    Child::from(children),
                ],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::results::{CostAccuracy, CostPoint, RunTime, TestRecord};

    fn doc(statuses: &[StatusTag]) -> ResultsDocument {
        ResultsDocument {
            tests: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| TestRecord {
                    name: format!("t{}", i),
                    status: *s,
                    start: Some(4.0),
                    end: Some(1.0),
                    target: None,
                    time: RunTime::Millis(5.0),
                    link: format!("{}", i),
                    bits: None,
                })
                .collect(),
            merged_cost_accuracy: CostAccuracy(CostPoint(1.0, 0.5), Vec::new()),
        }
    }

    fn label<'a>(root: &'a Element, attr: &str, value: &str) -> &'a Element {
        root.find_all("label")
            .into_iter()
            .find(|l| l.attr(attr) == Some(value))
            .unwrap()
    }

    fn checked(label: &Element) -> bool {
        label.find_all("input")[0].attr("checked").is_some()
    }

    #[test]
    fn counts_show_zero_for_missing_tags() {
        let d = doc(&[StatusTag::ImpStart, StatusTag::ImpStart, StatusTag::Crash]);
        let node = build_filters(&d, &FilterState::new());
        let root = node.as_element().unwrap();
        assert_eq!(
            label(root, "data-label", "imp-start").text_content(),
            "Improved start (2)"
        );
        assert_eq!(label(root, "data-label", "crash").text_content(), "Crash (1)");
        assert_eq!(label(root, "data-label", "timeout").text_content(), "Timeout (0)");
    }

    #[test]
    fn checkbox_state_mirrors_filter() {
        let d = doc(&[StatusTag::Crash]);
        let filter = FilterState::with_excluded([StatusTag::Crash]);
        let node = build_filters(&d, &filter);
        let root = node.as_element().unwrap();
        assert!(!checked(label(root, "data-label", "crash")));
        assert!(checked(label(root, "data-label", "error")));
        let leader = label(root, "data-group", "regressed");
        assert!(!checked(leader));
        assert!(leader.has_class("partial"));
        assert!(checked(label(root, "data-group", "improved")));
    }

    #[test]
    fn render_excluded_tags_are_disabled() {
        let filter = FilterState::with_excluded([StatusTag::Crash]);
        assert_eq!(
            child_checkbox(StatusTag::Crash, 1, &filter).to_html(),
            format!(
                "<label class=\"crash\" data-label=\"crash\" title=\"{}\">\
                 <input type=\"checkbox\" disabled>Crash (1)</label>",
                RENDER_EXCLUDED_TITLE
            )
        );

        let d = doc(&[StatusTag::Crash, StatusTag::Timeout]);
        let node = build_filters(&d, &filter);
        let root = node.as_element().unwrap();
        let timeout = label(root, "data-label", "timeout").find_all("input")[0];
        assert!(timeout.attr("disabled").is_none());
        let leader = label(root, "data-group", "regressed").find_all("input")[0];
        assert!(leader.attr("disabled").is_none());
    }

    #[test]
    fn events_update_filter() {
        let mut filter = FilterState::new();
        FilterEvent::ToggleGroup(TagGroup::Improved).apply(&mut filter);
        assert!(filter.is_excluded(StatusTag::ImpStart));
        FilterEvent::ToggleTag(StatusTag::ImpStart).apply(&mut filter);
        assert!(!filter.is_excluded(StatusTag::ImpStart));
        assert!(filter.is_excluded(StatusTag::EqTarget));
    }
}
