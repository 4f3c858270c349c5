//! Declarative SVG plots.
//!
//! A [`PlotSpec`] holds marks (dots and lines bound to data) plus axis and
//! size options; [`plot`] turns it into an `<svg>` element node that callers
//! may still mutate (e.g. to set a `viewBox`). Dots that carry an `href` are
//! wrapped in SVG anchors so each datum is clickable.

use crate::element::{element, fmt_num, Child, Node, Props};

const TICKS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    pub x: f64,
    pub y: f64,
    pub href: Option<String>,
    pub title: Option<String>,
    pub class: Option<String>,
}

impl Datum {
    pub fn new(x: f64, y: f64) -> Self {
        Datum {
            x,
            y,
            href: None,
            title: None,
            class: None,
        }
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Symbol {
    #[default]
    Circle,
    Square,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkStyle {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_width: f64,
    pub symbol: Symbol,
    pub radius: f64,
}

impl Default for MarkStyle {
    fn default() -> Self {
        MarkStyle {
            stroke: None,
            fill: None,
            stroke_width: 1.5,
            symbol: Symbol::Circle,
            radius: 3.0,
        }
    }
}

impl MarkStyle {
    pub fn stroke(mut self, color: &str) -> Self {
        self.stroke = Some(color.to_string());
        self
    }

    pub fn fill(mut self, color: &str) -> Self {
        self.fill = Some(color.to_string());
        self
    }

    pub fn stroke_width(mut self, w: f64) -> Self {
        self.stroke_width = w;
        self
    }

    pub fn symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Dot { data: Vec<Datum>, style: MarkStyle },
    Line { data: Vec<(f64, f64)>, style: MarkStyle },
}

pub fn dot(data: Vec<Datum>, style: MarkStyle) -> Mark {
    Mark::Dot { data, style }
}

pub fn line(data: Vec<(f64, f64)>, style: MarkStyle) -> Mark {
    Mark::Line { data, style }
}

impl Mark {
    fn points(&self) -> Vec<(f64, f64)> {
        match self {
            Mark::Dot { data, .. } => data.iter().map(|d| (d.x, d.y)).collect(),
            Mark::Line { data, .. } => data.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickFormat {
    #[default]
    Number,
    /// Fractions rendered as whole percentages.
    Percent,
    /// Cost multipliers, `2×`.
    Multiplier,
}

impl TickFormat {
    pub fn format(&self, v: f64) -> String {
        match self {
            TickFormat::Number => fmt_num(v),
            TickFormat::Percent => format!("{:.0}%", v * 100.0),
            TickFormat::Multiplier => format!("{}×", fmt_num(v)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub domain: Option<(f64, f64)>,
    pub nice: bool,
    pub line: bool,
    pub tick_format: TickFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    pub marks: Vec<Mark>,
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub x: Axis,
    pub y: Axis,
    pub class_name: Option<String>,
}

impl Default for PlotSpec {
    fn default() -> Self {
        PlotSpec {
            marks: Vec::new(),
            width: 400.0,
            height: 400.0,
            margins: Margins::default(),
            x: Axis::default(),
            y: Axis::default(),
            class_name: None,
        }
    }
}

/// Linear mapping from a data domain onto a pixel range.
#[derive(Debug, Clone, Copy)]
struct Scale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl Scale {
    fn apply(&self, v: f64) -> f64 {
        let span = (self.d1 - self.d0).max(1e-9);
        self.r0 + (v - self.d0) / span * (self.r1 - self.r0)
    }
}

pub fn nice_ticks(min: f64, max: f64, ticks: usize) -> (f64, f64, usize) {
    let range = (max - min).abs().max(1e-9);
    let rough = range / (ticks as f64 - 1.0);
    let mag = 10f64.powf(rough.abs().log10().floor());
    let norm = rough / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize + 1;
    (start, step, count)
}

/// Resolve an axis domain from explicit config or the data extent.
pub fn resolve_domain(axis: &Axis, values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = match axis.domain {
        Some(d) => d,
        None => {
            let (lo, hi) = values
                .filter(|v| v.is_finite())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
            if lo.is_finite() {
                (lo, hi)
            } else {
                (0.0, 1.0)
            }
        }
    };
    if (hi - lo).abs() < 1e-9 {
        lo -= 0.5;
        hi += 0.5;
    }
    if axis.nice && axis.domain.is_none() {
        let (start, step, count) = nice_ticks(lo, hi, TICKS);
        lo = start;
        hi = start + step * (count - 1) as f64;
    }
    (lo, hi)
}

fn tick_values(lo: f64, hi: f64) -> Vec<f64> {
    let (start, step, count) = nice_ticks(lo, hi, TICKS);
    (0..count)
        .map(|i| start + step * i as f64)
        .filter(|v| *v >= lo - 1e-9 && *v <= hi + 1e-9)
        .collect()
}

fn style_props(style: &MarkStyle, default_fill: &str) -> Props {
    Props::new()
        .set("fill", style.fill.as_deref().unwrap_or(default_fill))
        .set("stroke", style.stroke.as_deref().unwrap_or("none"))
        .set("stroke-width", style.stroke_width)
}

fn render_dot(d: &Datum, x: &Scale, y: &Scale, style: &MarkStyle) -> Node {
    let (cx, cy) = (x.apply(d.x), y.apply(d.y));
    let title = d
        .title
        .as_ref()
        .map(|t| element("title", Props::new(), t.as_str()));
    let default_fill = if style.stroke.is_some() {
        "none"
    } else {
        "currentColor"
    };
    let shape = match style.symbol {
        Symbol::Circle => element(
            "circle",
            style_props(style, default_fill)
                .set("cx", cx)
                .set("cy", cy)
                .set("r", style.radius),
            title,
        ),
        Symbol::Square => element(
            "rect",
            style_props(style, default_fill)
                .set("x", cx - style.radius)
                .set("y", cy - style.radius)
                .set("width", style.radius * 2.0)
                .set("height", style.radius * 2.0),
            title,
        ),
    };
    let mut node = match &d.href {
        Some(href) => element("a", Props::new().set("href", href.as_str()), shape),
        None => shape,
    };
    if let Some(class) = &d.class {
        node.set_attr("class", class.as_str());
    }
    node
}

fn render_line(data: &[(f64, f64)], x: &Scale, y: &Scale, style: &MarkStyle) -> Node {
    let mut d = String::new();
    for (i, (px, py)) in data.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!(
            "{}{},{}",
            cmd,
            fmt_num(x.apply(*px)),
            fmt_num(y.apply(*py))
        ));
    }
    let stroke = style.stroke.as_deref().unwrap_or("currentColor");
    element(
        "path",
        Props::new()
            .set("fill", "none")
            .set("stroke", stroke)
            .set("stroke-width", style.stroke_width)
            .set("d", d),
        Child::Empty,
    )
}

fn render_x_axis(axis: &Axis, x: &Scale, y0: f64, y1: f64) -> Node {
    let mut children: Vec<Node> = Vec::new();
    for v in tick_values(x.d0, x.d1) {
        let px = x.apply(v);
        children.push(element(
            "line",
            Props::new()
                .set("x1", px)
                .set("x2", px)
                .set("y1", y0)
                .set("y2", y1)
                .set("stroke", "#eee"),
            Child::Empty,
        ));
        children.push(element(
            "text",
            Props::new()
                .set("x", px)
                .set("y", y0 + 14.0)
                .set("text-anchor", "middle")
                .set("font-size", 10.0)
                .set("fill", "#666"),
            axis.tick_format.format(v),
        ));
    }
    if axis.line {
        children.push(element(
            "line",
            Props::new()
                .set("x1", x.r0)
                .set("x2", x.r1)
                .set("y1", y0)
                .set("y2", y0)
                .set("stroke", "currentColor"),
            Child::Empty,
        ));
    }
    element("g", Props::new().class("axis x-axis"), children)
}

fn render_y_axis(axis: &Axis, y: &Scale, x0: f64, x1: f64) -> Node {
    let mut children: Vec<Node> = Vec::new();
    for v in tick_values(y.d0, y.d1) {
        let py = y.apply(v);
        children.push(element(
            "line",
            Props::new()
                .set("x1", x0)
                .set("x2", x1)
                .set("y1", py)
                .set("y2", py)
                .set("stroke", "#eee"),
            Child::Empty,
        ));
        children.push(element(
            "text",
            Props::new()
                .set("x", x0 - 4.0)
                .set("y", py)
                .set("text-anchor", "end")
                .set("dominant-baseline", "middle")
                .set("font-size", 10.0)
                .set("fill", "#666"),
            axis.tick_format.format(v),
        ));
    }
    if axis.line {
        children.push(element(
            "line",
            Props::new()
                .set("x1", x0)
                .set("x2", x0)
                .set("y1", y.r0)
                .set("y2", y.r1)
                .set("stroke", "currentColor"),
            Child::Empty,
        ));
    }
    element("g", Props::new().class("axis y-axis"), children)
}

/// Render a plot to an `<svg>` node.
pub fn plot(chart: &PlotSpec) -> Node {
    let m = &chart.margins;
    let points: Vec<(f64, f64)> = chart.marks.iter().flat_map(Mark::points).collect();
    let (x0, x1) = resolve_domain(&chart.x, points.iter().map(|p| p.0));
    let (y0, y1) = resolve_domain(&chart.y, points.iter().map(|p| p.1));

    let x = Scale {
        d0: x0,
        d1: x1,
        r0: m.left,
        r1: chart.width - m.right,
    };
    let y = Scale {
        d0: y0,
        d1: y1,
        r0: chart.height - m.bottom,
        r1: m.top,
    };

    let marks: Vec<Node> = chart
        .marks
        .iter()
        .map(|mark| match mark {
            Mark::Dot { data, style } => element(
                "g",
                Props::new().class("dots"),
                data.iter()
                    .map(|d| render_dot(d, &x, &y, style))
                    .collect::<Vec<_>>(),
            ),
            Mark::Line { data, style } => render_line(data, &x, &y, style),
        })
        .collect();

    let mut props = Props::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("width", chart.width)
        .set("height", chart.height)
        .set(
            "viewBox",
            format!("0 0 {} {}", fmt_num(chart.width), fmt_num(chart.height)),
        );
    if let Some(class) = &chart.class_name {
        props = props.class(class.as_str());
    }

    element(
        "svg",
        props,
        vec![
            render_y_axis(&chart.y, &y, x.r0, x.r1),
            render_x_axis(&chart.x, &x, y.r0, y.r1),
            element("g", Props::new().class("marks"), marks),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_cover_range() {
        let (start, step, count) = nice_ticks(0.0, 1.0, 6);
        assert_eq!(start, 0.0);
        assert!(count >= 3);
        assert!(start + step * (count - 1) as f64 >= 1.0 - 1e-9);
    }

    #[test]
    fn explicit_domain_is_kept() {
        let axis = Axis {
            domain: Some((0.0, 1.0)),
            nice: true,
            ..Axis::default()
        };
        assert_eq!(resolve_domain(&axis, [5.0, 9.0].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn empty_data_gets_unit_domain() {
        let axis = Axis::default();
        assert_eq!(resolve_domain(&axis, std::iter::empty()), (0.0, 1.0));
    }

    #[test]
    fn dots_with_href_are_anchors() {
        let chart = PlotSpec {
            marks: vec![dot(
                vec![
                    Datum::new(0.2, 0.4).href("a/graph.html"),
                    Datum::new(0.5, 0.5),
                ],
                MarkStyle::default().fill("#00a"),
            )],
            ..PlotSpec::default()
        };
        let svg = plot(&chart);
        let svg = svg.as_element().unwrap();
        assert_eq!(svg.find_all("circle").len(), 2);
        let anchors = svg.find_all("a");
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].attr("href"), Some("a/graph.html"));
    }

    #[test]
    fn square_symbol_renders_rect() {
        let chart = PlotSpec {
            marks: vec![dot(
                vec![Datum::new(1.0, 0.5)],
                MarkStyle::default().stroke("#d00").symbol(Symbol::Square),
            )],
            ..PlotSpec::default()
        };
        let svg = plot(&chart);
        let marks = svg.as_element().unwrap().find_all("rect");
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].attr("fill"), Some("none"));
    }

    #[test]
    fn tick_formats() {
        assert_eq!(TickFormat::Percent.format(0.25), "25%");
        assert_eq!(TickFormat::Multiplier.format(2.0), "2×");
        assert_eq!(TickFormat::Number.format(1.5), "1.5");
    }
}
