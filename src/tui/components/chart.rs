//! # Chart Component
//!
//! Draws a [`ChartView`]'s plot area: bar, line, or pie. Title and analysis
//! are drawn by the surrounding `Message`; this widget only fills the fixed
//! [`CHART_HEIGHT`] rows it is given.
//!
//! An unsupported chart type leaves the area empty.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Chart, Dataset, GraphType, Paragraph, Widget,
};

use crate::api::DataPoint;
use crate::core::render::{ChartForm, ChartView, PieSlice, Rgb};

/// Rows reserved for the plot area of every chart.
pub const CHART_HEIGHT: u16 = 12;

const BAR_COLOR: Color = Color::Rgb(0x3B, 0x82, 0xF6);
const LINE_COLOR: Color = Color::Rgb(0x06, 0xB6, 0xD4);
const AXIS_COLOR: Color = Color::Rgb(0x94, 0xA3, 0xB8);

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

pub struct ChartPlot<'a> {
    pub view: &'a ChartView,
}

impl Widget for ChartPlot<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match &self.view.form {
            ChartForm::Bar => render_bar(&self.view.points, area, buf),
            ChartForm::Line => render_line(&self.view.points, area, buf),
            ChartForm::Pie(slices) => render_pie(slices, area, buf),
            ChartForm::Unsupported(kind) => {
                log::debug!("Leaving chart area empty for type {:?}", kind);
            }
        }
    }
}

/// Integer bar heights; negative values draw as empty bars.
fn bar_value(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

fn render_bar(points: &[DataPoint], area: Rect, buf: &mut Buffer) {
    if points.is_empty() {
        return;
    }
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value(bar_value(p.value))
                .text_value(format_value(p.value))
                .label(Line::from(p.name.clone()))
        })
        .collect();

    let n = u16::try_from(points.len()).unwrap_or(u16::MAX).max(1);
    let gap = 1u16;
    let bar_width = (area.width.saturating_sub(gap.saturating_mul(n - 1)) / n).clamp(1, 12);

    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap)
        .bar_style(Style::default().fg(BAR_COLOR))
        .value_style(Style::default().fg(Color::White).bg(BAR_COLOR))
        .label_style(Style::default().fg(AXIS_COLOR))
        .render(area, buf);
}

/// Y-axis bounds that always include zero and never collapse to a point.
fn y_bounds(points: &[DataPoint]) -> [f64; 2] {
    let min = points.iter().map(|p| p.value).fold(0.0_f64, f64::min);
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if (max - min).abs() < f64::EPSILON {
        [min, min + 1.0]
    } else {
        [min, max]
    }
}

fn render_line(points: &[DataPoint], area: Rect, buf: &mut Buffer) {
    if points.is_empty() {
        return;
    }
    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();
    let [y_min, y_max] = y_bounds(points);
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);

    let x_labels = match (points.first(), points.last()) {
        (Some(first), Some(last)) if points.len() > 1 => vec![first.name.clone(), last.name.clone()],
        (Some(only), _) => vec![only.name.clone()],
        _ => vec![],
    };

    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(LINE_COLOR))
        .data(&data);

    Chart::new(vec![dataset])
        .x_axis(
            Axis::default()
                .style(Style::default().fg(AXIS_COLOR))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(AXIS_COLOR))
                .bounds([y_min, y_max])
                .labels(vec![format_value(y_min), format_value(y_max)]),
        )
        .render(area, buf);
}

/// Which slice a point at `angle` (radians, `0..TAU`, clockwise from 12
/// o'clock) falls in.
fn slice_at(slices: &[PieSlice], angle: f64) -> Option<usize> {
    let fraction = angle / std::f64::consts::TAU;
    let mut acc = 0.0;
    for (i, slice) in slices.iter().enumerate() {
        acc += slice.share;
        if fraction < acc {
            return Some(i);
        }
    }
    None
}

/// Sample points inside the unit disc, bucketed by slice.
fn pie_points(slices: &[PieSlice], cols: u16, rows: u16) -> Vec<Vec<(f64, f64)>> {
    let mut buckets = vec![Vec::new(); slices.len()];
    // Braille gives 2x4 dots per cell.
    let (nx, ny) = (cols as usize * 2, rows as usize * 4);
    for iy in 0..ny {
        for ix in 0..nx {
            let x = (ix as f64 + 0.5) / nx as f64 * 2.0 - 1.0;
            let y = 1.0 - (iy as f64 + 0.5) / ny as f64 * 2.0;
            if x * x + y * y > 1.0 {
                continue;
            }
            let angle = x.atan2(y).rem_euclid(std::f64::consts::TAU);
            if let Some(i) = slice_at(slices, angle) {
                buckets[i].push((x, y));
            }
        }
    }
    buckets
}

fn render_pie(slices: &[PieSlice], area: Rect, buf: &mut Buffer) {
    if slices.is_empty() {
        return;
    }
    // Cells are about twice as tall as wide, so a round pie is 2*h columns.
    let disc_width = area.height.saturating_mul(2).min(area.width / 2).max(1);
    let [disc_area, legend_area] =
        Layout::horizontal([Constraint::Length(disc_width + 2), Constraint::Min(0)]).areas(area);

    let buckets = pie_points(slices, disc_width, disc_area.height);
    Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (slice, coords) in slices.iter().zip(&buckets) {
                ctx.draw(&Points {
                    coords,
                    color: color(slice.color),
                });
            }
        })
        .render(disc_area, buf);

    let legend: Vec<Line> = slices
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color(s.color))),
                Span::styled(s.name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" {} ({:.0}%)", format_value(s.value), s.share * 100.0),
                    Style::default().fg(AXIS_COLOR).add_modifier(Modifier::DIM),
                ),
            ])
        })
        .collect();
    Paragraph::new(legend).render(legend_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::PIE_PALETTE;

    fn slice(share: f64, i: usize) -> PieSlice {
        PieSlice {
            name: format!("s{i}"),
            value: share * 100.0,
            share,
            color: PIE_PALETTE[i],
        }
    }

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    fn view(form: ChartForm, values: &[f64]) -> ChartView {
        ChartView {
            title: "T".into(),
            analysis: None,
            form,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| DataPoint {
                    name: format!("p{i}"),
                    value: *v,
                })
                .collect(),
        }
    }

    #[test]
    fn slice_lookup_follows_cumulative_share() {
        let slices = vec![slice(0.5, 0), slice(0.25, 1), slice(0.25, 2)];
        assert_eq!(slice_at(&slices, 0.1), Some(0));
        assert_eq!(slice_at(&slices, std::f64::consts::PI * 1.2), Some(1));
        assert_eq!(slice_at(&slices, std::f64::consts::TAU * 0.9), Some(2));
    }

    #[test]
    fn zero_total_pie_draws_nothing() {
        let slices = vec![slice(0.0, 0)];
        let buckets = pie_points(&slices, 10, 5);
        assert!(buckets[0].is_empty());
    }

    #[test]
    fn bar_values_clamp_and_round() {
        assert_eq!(bar_value(23.4), 23);
        assert_eq!(bar_value(-5.0), 0);
        assert_eq!(bar_value(f64::NAN), 0);
        assert_eq!(format_value(15.0), "15");
        assert_eq!(format_value(1.5), "1.50");
    }

    #[test]
    fn y_bounds_include_zero() {
        let v = view(ChartForm::Line, &[5.0, 9.0]);
        assert_eq!(y_bounds(&v.points), [0.0, 9.0]);
        let flat = view(ChartForm::Line, &[0.0]);
        assert_eq!(y_bounds(&flat.points), [0.0, 1.0]);
    }

    #[test]
    fn unsupported_chart_leaves_area_blank() {
        let v = view(ChartForm::Unsupported("radar".into()), &[1.0, 2.0]);
        let area = Rect::new(0, 0, 30, CHART_HEIGHT);
        let mut buf = Buffer::empty(area);
        ChartPlot { view: &v }.render(area, &mut buf);
        assert!(buffer_text(&buf).trim().is_empty());
    }

    #[test]
    fn bar_chart_shows_labels() {
        let v = view(ChartForm::Bar, &[23.0, 15.0]);
        let area = Rect::new(0, 0, 30, CHART_HEIGHT);
        let mut buf = Buffer::empty(area);
        ChartPlot { view: &v }.render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("p0"));
        assert!(text.contains("p1"));
    }

    #[test]
    fn pie_legend_lists_every_slice() {
        let slices = vec![slice(0.6, 0), slice(0.4, 1)];
        let v = view(ChartForm::Pie(slices), &[60.0, 40.0]);
        let area = Rect::new(0, 0, 60, CHART_HEIGHT);
        let mut buf = Buffer::empty(area);
        ChartPlot { view: &v }.render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("s0"));
        assert!(text.contains("(40%)"));
    }

    #[test]
    fn bar_chart_with_huge_series_renders() {
        // 65_536 points would truncate to a zero divisor as a u16
        let v = view(ChartForm::Bar, &vec![1.0; 65_536]);
        let area = Rect::new(0, 0, 30, CHART_HEIGHT);
        let mut buf = Buffer::empty(area);
        ChartPlot { view: &v }.render(area, &mut buf);
    }
}
