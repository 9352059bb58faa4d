use chrono::DateTime;
use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use rusty_dash::data::aggregate::proportions;
use rusty_dash::data::model::CellValue;

use crate::state::AppState;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render KPIs, charts and the filtered rows.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to start  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            kpi_row(ui, state);
            ui.separator();
            top_groups_chart(ui, state);
            trend_chart(ui, state);
            shares(ui, state);
            ui.separator();
            rows_table(ui, state);
        });
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

fn kpi_row(ui: &mut Ui, state: &AppState) {
    let rows = state.filtered.as_ref().map_or(0, |t| t.n_rows());
    ui.columns(3, |cols: &mut [Ui]| {
        kpi_card(&mut cols[0], "Rows", rows.to_string());
        if let (Some(value), Some(m)) = (&state.value_column, &state.metrics) {
            let mean = m.mean.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"));
            kpi_card(&mut cols[1], &format!("Avg {value}"), mean);
            kpi_card(&mut cols[2], &format!("Sum {value}"), format!("{:.2}", m.sum));
        }
    });
}

fn kpi_card(ui: &mut Ui, label: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(label);
            ui.heading(value);
        });
    });
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

fn top_groups_chart(ui: &mut Ui, state: &AppState) {
    let (Some(group), Some(value)) = (&state.group_column, &state.value_column) else {
        ui.label("Select a group and numeric value in the sidebar to see a chart.");
        return;
    };
    ui.strong(format!("Top {} {group} by {value}", state.config.top_n));

    let bars: Vec<Bar> = state
        .top_groups
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let color = state
                .color_map
                .as_ref()
                .map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(&row.group));
            Bar::new(i as f64, row.total)
                .name(row.group.to_string())
                .fill(color)
        })
        .collect();
    let labels: Vec<String> = state.top_groups.iter().map(|r| r.group.to_string()).collect();

    Plot::new("top_groups_plot")
        .height(260.0)
        .y_axis_label(value.as_str())
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(value.as_str()));
        });
}

fn trend_chart(ui: &mut Ui, state: &AppState) {
    let (Some(date), Some(value)) = (&state.date_column, &state.value_column) else {
        return;
    };
    ui.strong(format!("{value} trend over {date}"));

    let points: PlotPoints = state
        .trend
        .iter()
        .filter_map(|p| Some([temporal_x(&p.at)?, p.total]))
        .collect();

    Plot::new("trend_plot")
        .height(220.0)
        .legend(Legend::default())
        .y_axis_label(value.as_str())
        .x_axis_formatter(|mark, _range| {
            DateTime::from_timestamp((mark.value * SECONDS_PER_DAY) as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name(value.as_str()).width(1.5));
        });
}

/// Days since the Unix epoch, as the trend plot's x coordinate.
fn temporal_x(value: &CellValue) -> Option<f64> {
    let dt = match value {
        CellValue::Date(d) => d.and_hms_opt(0, 0, 0)?,
        CellValue::DateTime(dt) => *dt,
        _ => return None,
    };
    Some(dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY)
}

fn shares(ui: &mut Ui, state: &AppState) {
    let Some(color_map) = &state.color_map else {
        return;
    };
    if state.top_groups.is_empty() {
        return;
    }
    ui.strong(format!("Top {} {} proportion", state.config.top_n, color_map.column));
    for (row, share) in state.top_groups.iter().zip(proportions(&state.top_groups)) {
        let color = color_map.color_for(&row.group);
        ui.label(RichText::new(format!("■ {}  {:.1}%", row.group, share * 100.0)).color(color));
    }
}

// ---------------------------------------------------------------------------
// Filtered rows
// ---------------------------------------------------------------------------

fn rows_table(ui: &mut Ui, state: &AppState) {
    let Some(table) = &state.filtered else {
        return;
    };
    ui.strong("Filtered data");

    ui.push_id("rows_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(400.0)
            .columns(TableColumn::auto().at_least(60.0), table.n_cols())
            .header(20.0, |mut header| {
                for name in table.column_names() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.n_rows(), |mut row| {
                    let index = row.index();
                    for column in table.columns() {
                        row.col(|ui: &mut Ui| {
                            ui.label(display_cell(&column.values[index]));
                        });
                    }
                });
            });
    });
}

/// Cell text for the grid: numbers with two decimals, blanks for missing.
fn display_cell(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::Integer(i) => format!("{:.2}", *i as f64),
        CellValue::Float(v) => format!("{v:.2}"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shows_every_number_with_two_decimals() {
        assert_eq!(display_cell(&CellValue::Integer(5)), "5.00");
        assert_eq!(display_cell(&CellValue::Float(2.346)), "2.35");
        assert_eq!(display_cell(&CellValue::Null), "");
        assert_eq!(display_cell(&CellValue::from("North")), "North");
    }
}
