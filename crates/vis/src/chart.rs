use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Serialize;

use crate::error::Result;
use crate::series::SeriesVars;

/// Identifies a chart or a series across one report rendering: it names the
/// DOM element a chart mounts on, the data file a series is written to and
/// the JavaScript arrays published inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub(crate) struct Id(u64);

impl Id {
    pub fn next() -> Id {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn data_file(&self) -> String {
        format!("data{self}.js")
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One rendered chart, as the index page template sees it: the element id,
/// the data files to pull in and the script mounting the plot.
#[derive(Serialize, Debug)]
pub(crate) struct Chart {
    id: Id,
    data_files: Vec<String>,
    script: String,
}

impl Chart {
    /// Assembles a chart from its traces: serializes the trace and layout
    /// specs, binds each trace to its series arrays and emits the mount
    /// call for the charting library.
    pub fn assemble(
        data_files: Vec<String>,
        traces: &[(SeriesVars, Trace)],
        layout: &Layout,
    ) -> Result<Chart> {
        let id = Id::next();
        let mut script = String::new();

        for (index, (series, trace)) in traces.iter().enumerate() {
            let spec = serde_json::to_string(trace)?;

            script.push_str(&format!("const trace{index} = {spec};\n"));
            script.push_str(&format!(
                "trace{index}.x = {xs}; trace{index}.y = {ys}; trace{index}.text = {ts};\n",
                xs = series.xs,
                ys = series.ys,
                ts = series.ts,
            ));
        }

        let trace_list = (0..traces.len())
            .map(|index| format!("trace{index}"))
            .collect::<Vec<String>>()
            .join(", ");
        let layout_spec = serde_json::to_string(layout)?;

        script.push_str(&format!(
            "Plotly.newPlot(\"chart{id}\", [{trace_list}], {layout_spec});"
        ));

        Ok(Self {
            id,
            data_files,
            script,
        })
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct Trace {
    #[serde(rename = "type")]
    kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "yaxis", skip_serializing_if = "Option::is_none")]
    y_axis: Option<String>,
    #[serde(rename = "hoverinfo")]
    hover_info: HoverInfo,
}

impl Trace {
    pub fn bar() -> Trace {
        Self {
            kind: TraceKind::Bar,
            mode: None,
            name: None,
            y_axis: None,
            hover_info: HoverInfo::Text,
        }
    }

    pub fn line() -> Trace {
        Self {
            kind: TraceKind::Scatter,
            mode: Some(Mode::Lines),
            name: None,
            y_axis: None,
            hover_info: HoverInfo::Text,
        }
    }

    pub fn named(mut self, name: &str) -> Trace {
        self.name = Some(name.to_owned());
        self
    }

    /// Plots this trace against the right-hand y axis.
    pub fn on_secondary_axis(mut self) -> Trace {
        self.y_axis = Some(String::from("y2"));
        self
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Mode {
    Lines,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HoverInfo {
    Text,
}

#[derive(Serialize, Debug)]
pub(crate) struct Layout {
    title: Title,
    #[serde(rename = "xaxis")]
    x_axis: Axis,
    #[serde(rename = "yaxis")]
    y_axis: Axis,
    #[serde(rename = "yaxis2", skip_serializing_if = "Option::is_none")]
    y_axis2: Option<Axis>,
    width: u32,
    height: u32,
    #[serde(rename = "showlegend")]
    show_legend: bool,
    #[serde(rename = "hovermode")]
    hover_mode: HoverMode,
}

impl Layout {
    pub fn new(title: &str, x_title: &str, y_title: &str) -> Layout {
        Self {
            title: Title::from(title),
            x_axis: Axis::date(x_title),
            y_axis: Axis::linear(y_title),
            y_axis2: None,
            width: 960,
            height: 500,
            show_legend: false,
            hover_mode: HoverMode::Closest,
        }
    }

    /// Adds a right-hand y axis overlaying the first one and turns the
    /// legend on, since two series are otherwise indistinguishable.
    pub fn with_secondary_axis(mut self, title: &str) -> Layout {
        self.y_axis2 = Some(Axis::secondary(title));
        self.show_legend = true;
        self
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct Title {
    text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Title {
        Self {
            text: text.to_owned(),
        }
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct Axis {
    #[serde(rename = "type")]
    kind: AxisKind,
    title: Title,
    #[serde(rename = "showgrid")]
    show_grid: bool,
    #[serde(rename = "zeroline")]
    zero_line: bool,
    #[serde(rename = "autorange")]
    auto_range: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    side: Option<Side>,
}

impl Axis {
    pub fn date(title: &str) -> Axis {
        Axis {
            kind: AxisKind::Date,
            ..Axis::linear(title)
        }
    }

    pub fn linear(title: &str) -> Axis {
        Axis {
            kind: AxisKind::Linear,
            title: Title::from(title),
            show_grid: false,
            zero_line: false,
            auto_range: true,
            overlaying: None,
            side: None,
        }
    }

    pub fn secondary(title: &str) -> Axis {
        Axis {
            overlaying: Some(String::from("y")),
            side: Some(Side::Right),
            ..Axis::linear(title)
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AxisKind {
    Linear,
    Date,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Side {
    Right,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "lowercase")]
pub(crate) enum HoverMode {
    Closest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_a_bar_trace() {
        let spec = serde_json::to_string(&Trace::bar()).unwrap();

        assert_eq!(spec, r#"{"type":"bar","hoverinfo":"text"}"#);
    }

    #[test]
    fn serializes_a_named_line_trace_on_the_secondary_axis() {
        let trace = Trace::line().named("messages").on_secondary_axis();

        let spec = serde_json::to_string(&trace).unwrap();

        assert_eq!(
            spec,
            r#"{"type":"scatter","mode":"lines","name":"messages","yaxis":"y2","hoverinfo":"text"}"#
        );
    }

    #[test]
    fn a_layout_carries_the_second_axis_only_when_asked() {
        let plain = serde_json::to_string(&Layout::new("t", "x", "y")).unwrap();
        let overlaid =
            serde_json::to_string(&Layout::new("t", "x", "y").with_secondary_axis("y2")).unwrap();

        assert!(!plain.contains("yaxis2"));
        assert!(overlaid.contains(r#""yaxis2":{"type":"linear""#));
        assert!(overlaid.contains(r#""overlaying":"y""#));
        assert!(overlaid.contains(r#""side":"right""#));
    }

    #[test]
    fn a_chart_script_binds_every_trace_to_its_series() {
        let first = SeriesVars {
            xs: String::from("xs8"),
            ys: String::from("ys8"),
            ts: String::from("ts8"),
        };
        let second = SeriesVars {
            xs: String::from("xs9"),
            ys: String::from("ys9"),
            ts: String::from("ts9"),
        };
        let traces = vec![(first, Trace::line()), (second, Trace::line().on_secondary_axis())];

        let chart =
            Chart::assemble(Vec::new(), &traces, &Layout::new("t", "x", "y")).unwrap();

        assert!(chart.script.contains("trace0.x = xs8; trace0.y = ys8; trace0.text = ts8;"));
        assert!(chart.script.contains("trace1.x = xs9; trace1.y = ys9; trace1.text = ts9;"));
        assert!(chart.script.contains(&format!("Plotly.newPlot(\"chart{}\", [trace0, trace1]", chart.id)));
    }
}
