use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::RegionColors;
use luas_tanaman::data::aggregate::{AggregateViews, AreaCount, RegionMean, YearMean};

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Chart panels (central panel)
// ---------------------------------------------------------------------------

/// Render the three summary charts one below the other.
pub fn charts(ui: &mut Ui, views: &AggregateViews, colors: &RegionColors) {
    ui.heading("Cultivated area distribution");
    distribution_chart(ui, &views.distribution);
    ui.add_space(8.0);

    ui.heading("Mean cultivated area per year");
    trend_chart(ui, &views.trend);
    ui.add_space(8.0);

    ui.heading(format!("Top {} regions by mean cultivated area", views.ranking.len()));
    ranking_chart(ui, &views.ranking, colors);
}

fn distribution_chart(ui: &mut Ui, distribution: &[AreaCount]) {
    // Bars as wide as the tightest gap between neighbouring area values.
    let width = distribution
        .windows(2)
        .map(|w| w[1].area - w[0].area)
        .fold(f64::INFINITY, f64::min);
    let width = if width.is_finite() && width > 0.0 { width * 0.9 } else { 1.0 };

    let bars: Vec<Bar> = distribution
        .iter()
        .map(|d| Bar::new(d.area, d.count as f64).width(width))
        .collect();

    Plot::new("distribution_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Cultivated area (ha)")
        .y_axis_label("Observations")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Observations")
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

fn trend_chart(ui: &mut Ui, trend: &[YearMean]) {
    let points: Vec<[f64; 2]> = trend.iter().map(|t| [t.year as f64, t.mean]).collect();

    Plot::new("trend_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Mean area (ha)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .name("Mean area")
                    .color(Color32::LIGHT_GREEN)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(3.0)
                    .color(Color32::LIGHT_GREEN),
            );
        });
}

fn ranking_chart(ui: &mut Ui, ranking: &[RegionMean], colors: &RegionColors) {
    let n = ranking.len();

    Plot::new("ranking_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Mean area (ha)")
        .show_y(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            // Highest mean on top.
            for (i, entry) in ranking.iter().enumerate() {
                let color = colors.color_for(&entry.region);
                let bar = Bar::new((n - i) as f64, entry.mean)
                    .width(0.7)
                    .name(&entry.region)
                    .fill(color);
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(&entry.region)
                        .color(color)
                        .horizontal(),
                );
            }
        });
}
