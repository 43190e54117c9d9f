use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use luas_tanaman::config::PREVIEW_ROWS;
use luas_tanaman::data::model::{Dataset, AREA_COLUMN, DATASET_COLUMNS};
use luas_tanaman::inference::features::FEATURE_SCHEMA;
use luas_tanaman::inference::predictor::format_prediction;
use luas_tanaman::state::AppState;

pub const TITLE: &str = "Cultivated Land Area Prediction – West Java";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

pub fn title_bar(ui: &mut Ui) {
    ui.add_space(4.0);
    ui.heading(TITLE);
    ui.label("Method: Linear Regression");
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Left side panel – dataset information
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &AppState) {
    let ctx = &state.context;

    ui.heading("Dataset information");
    ui.separator();

    ui.label(format!("Rows: {}", ctx.dataset.len()));
    ui.add_space(4.0);

    ui.strong("Columns used");
    for column in &FEATURE_SCHEMA {
        ui.label(format!("{} ({})", column.name, column.kind));
    }
    ui.label(format!("→ {AREA_COLUMN}"));
    let model = ctx.predictor.model();
    ui.small(format!("Model inputs: {}", model.feature_names().join(", ")));
    if let Some(target) = model.target() {
        ui.small(format!("Model target: {target}"));
    }

    if let Ok(domain) = &ctx.domain {
        ui.add_space(4.0);
        ui.label(format!("Regions: {}", domain.regions.len()));
        ui.label(format!("Conditions: {}", domain.conditions.len()));
        ui.label(format!("Years: {} – {}", domain.year_min, domain.year_max));
    }

    if let Err(e) = &ctx.builder {
        ui.add_space(8.0);
        ui.label(RichText::new(format!("Model schema error: {e}")).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Prediction inputs and result
// ---------------------------------------------------------------------------

pub fn prediction_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Prediction input");

    let domain = match &state.context.domain {
        Ok(domain) => domain.clone(),
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::YELLOW));
            return;
        }
    };
    let Some(selection) = state.selection.clone() else {
        return;
    };

    ui.columns(2, |cols| {
        cols[0].label("Regency / City");
        egui::ComboBox::from_id_salt("region")
            .selected_text(&selection.region)
            .width(cols[0].available_width())
            .show_ui(&mut cols[0], |ui: &mut Ui| {
                for region in &domain.regions {
                    if ui.selectable_label(*region == selection.region, region).clicked() {
                        state.select_region(region);
                    }
                }
            });

        cols[1].label("Plant condition");
        egui::ComboBox::from_id_salt("condition")
            .selected_text(&selection.condition)
            .width(cols[1].available_width())
            .show_ui(&mut cols[1], |ui: &mut Ui| {
                for condition in &domain.conditions {
                    if ui
                        .selectable_label(*condition == selection.condition, condition)
                        .clicked()
                    {
                        state.select_condition(condition);
                    }
                }
            });
    });

    let mut year = selection.year;
    if ui
        .add(egui::Slider::new(&mut year, domain.year_range()).text("Year"))
        .changed()
    {
        state.select_year(year);
    }

    ui.add_space(6.0);
    if ui.button("Predict cultivated area").clicked() {
        state.run_prediction();
    }

    match &state.prediction {
        Some(Ok(value)) => {
            ui.label(
                RichText::new(format!("Estimated cultivated area: {}", format_prediction(*value)))
                    .strong()
                    .color(Color32::from_rgb(0x2e, 0xa0, 0x43)),
            );
            ui.small(
                "Note: this value is an estimate based on the historical patterns \
                 in the data used for training.",
            );
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Prediction failed: {e}")).color(Color32::RED));
        }
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Raw data preview
// ---------------------------------------------------------------------------

pub fn data_preview(ui: &mut Ui, dataset: &Dataset) {
    egui::CollapsingHeader::new(RichText::new("View raw data sample").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows = dataset.head(PREVIEW_ROWS);
            if rows.is_empty() {
                ui.label("No rows loaded.");
                return;
            }

            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::auto())
                .columns(Column::auto().at_least(80.0), DATASET_COLUMNS.len())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in DATASET_COLUMNS {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let idx = row.index();
                        let obs = &rows[idx];
                        row.col(|ui| {
                            ui.label(idx.to_string());
                        });
                        row.col(|ui| {
                            ui.label(&obs.region);
                        });
                        row.col(|ui| {
                            ui.label(&obs.condition);
                        });
                        row.col(|ui| {
                            ui.label(obs.year.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.2}", obs.area));
                        });
                    });
                });
        });
}
