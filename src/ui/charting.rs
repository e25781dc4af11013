use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};

use crate::presenter::{chart_bounds, format_label, ChartModel};

/// Draws acetone as a solid line and CO2 as a stippled one, both with a
/// dot on every real sample
pub fn render_chart(model: &ChartModel, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let (x_bounds, y_bounds) = if model.acetone.is_empty() {
        chart_bounds(&[])
    } else {
        (model.x_bounds, model.y_bounds)
    };

    let datasets = vec![
        Dataset::default()
            .name("Acetone Level (ppm)")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Line)
            .data(&model.acetone),
        Dataset::default()
            .marker(Marker::Dot)
            .style(Style::default().fg(Color::Magenta))
            .graph_type(GraphType::Scatter)
            .data(&model.acetone),
        Dataset::default()
            .name("CO2 Level (ppm)")
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::Yellow))
            .graph_type(GraphType::Scatter)
            .data(&model.co2_dashed),
        // sample markers on the CO2 series
        Dataset::default()
            .marker(Marker::Dot)
            .style(Style::default().fg(Color::Yellow))
            .graph_type(GraphType::Scatter)
            .data(&model.co2),
    ];

    let y_mid = (y_bounds[0] + y_bounds[1]) / 2.0;

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Acetone and CO2 Levels Over Time "),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .x_axis(
            Axis::default()
                .title("Time (seconds)")
                .bounds(x_bounds)
                .labels(vec![
                    Span::styled(format_label(x_bounds[0]), bold_style),
                    Span::styled(format_label(x_bounds[1]), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Levels (ppm)")
                .bounds(y_bounds)
                .labels(vec![
                    Span::styled(format!("{:.2}", y_bounds[0]), bold_style),
                    Span::styled(format!("{:.2}", y_mid), bold_style),
                    Span::styled(format!("{:.2}", y_bounds[1]), bold_style),
                ]),
        )
        .render(area, buf);
}
