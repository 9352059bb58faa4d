use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_dash::data::catalog::CatalogEntry;
use rusty_dash::data::model::ColumnKind;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – column roles and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let catalogs = state.catalogs.clone();
    let value_options = state.columns_of_kind(ColumnKind::Numeric);
    let group_options = state.columns_of_kind(ColumnKind::Categorical);
    let date_options = state.columns_of_kind(ColumnKind::Temporal);

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Column roles ----
            if let Some(col) = column_picker(ui, "Value (numeric)", "value_col", &value_options, &state.value_column) {
                state.set_value_column(col);
            }
            if let Some(col) = column_picker(ui, "Group by (categorical)", "group_col", &group_options, &state.group_column) {
                state.set_group_column(col);
            }
            if let Some(col) = column_picker(ui, "Date for trend", "date_col", &date_options, &state.date_column) {
                state.set_date_column(col);
            }
            ui.separator();

            // ---- Per-column multi-select (collapsible) ----
            for catalog in &catalogs {
                let col = &catalog.column;
                let picked = state.picks.get(col).cloned().unwrap_or_default();

                // Show what is selected in the header
                let header_text = if picked.contains(&CatalogEntry::All) {
                    format!("{col}  (ALL)")
                } else {
                    format!("{col}  ({}/{})", picked.len(), catalog.len() - 1)
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                action = Some(PickAction::All(col.clone()));
                            }
                            if ui.small_button("None").clicked() {
                                action = Some(PickAction::None(col.clone()));
                            }
                        });

                        for entry in &catalog.entries {
                            let mut checked = picked.contains(entry);
                            if ui.checkbox(&mut checked, entry.to_string()).changed() {
                                action = Some(PickAction::Toggle(col.clone(), entry.clone()));
                            }
                        }

                        if catalog.dropped > 0 {
                            ui.weak(format!("{} more values not listed", catalog.dropped));
                        }
                    });
            }
        });

    // At most one widget changes per frame.
    match action {
        Some(PickAction::All(col)) => state.select_all(&col),
        Some(PickAction::None(col)) => state.select_none(&col),
        Some(PickAction::Toggle(col, entry)) => state.toggle_pick(&col, &entry),
        None => {}
    }
}

enum PickAction {
    All(String),
    None(String),
    Toggle(String, CatalogEntry),
}

/// A combo box over `options`; returns the newly chosen column, if any.
fn column_picker(
    ui: &mut Ui,
    label: &str,
    id: &str,
    options: &[String],
    current: &Option<String>,
) -> Option<String> {
    ui.strong(label);
    if options.is_empty() {
        ui.weak("No suitable column");
        return None;
    }

    let mut chosen = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or("–"))
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                if ui
                    .selectable_label(current.as_deref() == Some(opt.as_str()), opt)
                    .clicked()
                {
                    chosen = Some(opt.clone());
                }
            }
        });
    chosen
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.filtered.is_some(), egui::Button::new("Download filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
            ui.strong(name.to_string_lossy());
        }
        if let (Some(table), Some(filtered)) = (&state.table, &state.filtered) {
            ui.label(format!(
                "{} rows loaded, {} match the filters",
                table.n_rows(),
                filtered.n_rows()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "tsv", "parquet", "pq", "json"],
        )
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        open_path(state, &path);
    }
}

/// Open a dataset, reporting failures in the status line.
pub fn open_path(state: &mut AppState, path: &std::path::Path) {
    if let Err(e) = state.open(path) {
        log::error!("Failed to load file: {e}");
        state.status_message = Some(format!("Error: {e}"));
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(state.config.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    let result = state
        .export_bytes()
        .map_err(|e| e.to_string())
        .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));
    match result {
        Ok(()) => {
            log::info!("Wrote filtered rows to {}", path.display());
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to write {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
