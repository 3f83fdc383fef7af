/*!
 * Desktop dashboard for wbi-africa: digital payments adoption across Africa
 *
 * A cross-platform egui application providing:
 * - One country selector driving the whole view
 * - Metric cards, a trend projection, a tile-grid choropleth and a line chart
 * - Export of the current view (CSV, JSON and SVG) to a chosen folder
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2, pos2};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::thread;
use wbi_africa::dashboard::{
    self, COUNTRY_LABEL, FOOTER, FORECAST_HEADING, MAP_HEADING, MAP_LEGEND, MAP_TITLE,
    NO_CHART_DATA, NO_MAP_DATA, SUBTITLE, TITLE, USAGE_LABEL, YEAR_LABEL,
};
use wbi_africa::viz::{TileLayout, map::tile_rgb, palette};
use wbi_africa::{Client, Config, DashboardService, DashboardView, roster, storage, trend, viz};

type Service = DashboardService<Client>;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 520.0])
            .with_title("Africa Digital Payments - wbi-africa"),
        ..Default::default()
    };

    eframe::run_native("Africa Digital Payments", options, Box::new(create_app))
}

fn create_app(
    cc: &eframe::CreationContext<'_>,
) -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
    cc.egui_ctx.set_visuals(egui::Visuals::dark());
    Ok(Box::new(DashboardApp::new()?))
}

/// Main application state
struct DashboardApp {
    service: Arc<Service>,

    // Selection
    selected: usize,
    loaded_for: Option<usize>,
    view: Option<DashboardView>,

    // Export
    output_path: String,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background operation
    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

enum OperationResult {
    Loaded(usize, Box<DashboardView>),
    Exported(String),
    Error(String),
}

impl DashboardApp {
    fn new() -> Result<Self> {
        let config_path = std::env::var_os("WBI_AFRICA_CONFIG").map(PathBuf::from);
        let config = Config::load(config_path.as_deref())?;
        let service = Arc::new(DashboardService::from_config(config)?);

        // Default to user's home directory for exports
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        Ok(Self {
            service,
            selected: 0,
            loaded_for: None,
            view: None,
            output_path: home_dir,
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            operation_receiver: None,
        })
    }

    fn selected_country(&self) -> &'static roster::CountryRef {
        &roster::all()[self.selected.min(roster::all().len() - 1)]
    }

    fn start_load(&mut self) {
        let idx = self.selected;
        let country = *self.selected_country();
        self.is_loading = true;
        self.error_message.clear();
        self.status_message = format!(
            "Fetching World Bank data for {} and the map...",
            country.display_name
        );

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);
        let service = Arc::clone(&self.service);

        // The first load also builds the fleet snapshot, which touches every roster country.
        thread::spawn(move || {
            let view = service.view(&country, trend::current_year());
            let _ = sender.send(OperationResult::Loaded(idx, Box::new(view)));
        });
    }

    fn start_export(&mut self) {
        let Some(view) = self.view.clone() else {
            self.error_message = "Nothing to export yet".to_string();
            return;
        };
        if self.output_path.trim().is_empty() {
            self.error_message = "Please specify an output directory".to_string();
            return;
        }

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Exporting...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);
        let output_dir = PathBuf::from(self.output_path.trim());

        thread::spawn(move || {
            let result = match export_view(&view, &output_dir) {
                Ok(files) => OperationResult::Exported(format!(
                    "Files created:\n{}",
                    files.join("\n")
                )),
                Err(err) => OperationResult::Error(format!("Export failed: {err:#}")),
            };
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Loaded(idx, view) => {
                    self.loaded_for = Some(idx);
                    self.view = Some(*view);
                    self.status_message.clear();
                }
                OperationResult::Exported(message) => {
                    self.status_message = message;
                    self.error_message.clear();
                }
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Select a Country");
        ui.add_space(6.0);
        egui::ComboBox::from_id_salt("country")
            .selected_text(self.selected_country().display_name)
            .width(220.0)
            .show_ui(ui, |ui| {
                for (i, c) in roster::all().iter().enumerate() {
                    ui.selectable_value(&mut self.selected, i, c.display_name);
                }
            });

        ui.add_space(10.0);
        if ui
            .add_enabled(!self.is_loading, egui::Button::new("Refresh data"))
            .on_hover_text("Drop cached series and fetch again")
            .clicked()
        {
            self.service.refresh();
            self.loaded_for = None;
        }

        ui.add_space(16.0);
        ui.separator();
        ui.label("Export");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.output_path);
            if ui.button("Browse").clicked()
                && let Some(path) = rfd::FileDialog::new().pick_folder()
            {
                self.output_path = path.to_string_lossy().to_string();
            }
        });
        if ui
            .add_enabled(
                !self.is_loading && self.view.is_some(),
                egui::Button::new("Export view"),
            )
            .clicked()
        {
            self.start_export();
        }

        ui.add_space(10.0);
        if self.is_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Processing...");
            });
        }
        if !self.status_message.is_empty() {
            ui.colored_label(Color32::LIGHT_GREEN, &self.status_message);
        }
        if !self.error_message.is_empty() {
            ui.colored_label(Color32::RED, &self.error_message);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_operation_result();

        if !self.is_loading && self.loaded_for != Some(self.selected) {
            self.start_load();
        }

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::SidePanel::left("controls")
            .min_width(240.0)
            .show(ctx, |ui| self.controls(ui));

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.vertical_centered(|ui| ui.small(FOOTER));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(TITLE)
                            .heading()
                            .color(Color32::from_rgb(255, 75, 75)),
                    );
                    ui.label(SUBTITLE);
                });
                ui.add_space(12.0);

                let Some(view) = self.view.as_ref() else {
                    ui.label("Loading...");
                    return;
                };

                metrics_row(ui, view);
                ui.add_space(10.0);

                if let Some(block) = view.forecast_block() {
                    ui.group(|ui| {
                        ui.strong(FORECAST_HEADING);
                        for line in block.lines() {
                            ui.monospace(line);
                        }
                    });
                    ui.add_space(10.0);
                }

                ui.heading(MAP_HEADING);
                if view.snapshot.is_empty() {
                    ui.colored_label(Color32::YELLOW, NO_MAP_DATA);
                } else {
                    choropleth(ui, view);
                }
                ui.add_space(12.0);

                ui.heading(dashboard::chart_heading(&view.country));
                if view.series.is_empty() {
                    ui.colored_label(Color32::YELLOW, NO_CHART_DATA);
                } else {
                    line_chart(ui, view);
                }
            });
        });
    }
}

fn metrics_row(ui: &mut egui::Ui, view: &DashboardView) {
    let Some(m) = view.metrics.as_ref() else {
        ui.colored_label(
            Color32::YELLOW,
            dashboard::no_metrics_message(&view.country),
        );
        return;
    };
    ui.columns(3, |cols| {
        let cards = [
            (USAGE_LABEL, m.value_label()),
            (YEAR_LABEL, m.year_label()),
            (COUNTRY_LABEL, m.country_name.to_string()),
        ];
        for (col, (label, value)) in cols.iter_mut().zip(cards) {
            col.group(|ui| {
                ui.small(label);
                ui.heading(value);
            });
        }
    });
}

fn rgb32((r, g, b): (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(r, g, b)
}

fn choropleth(ui: &mut egui::Ui, view: &DashboardView) {
    let width = ui.available_width().min(760.0);
    let height = width * 0.72;
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::hover());
    let rect = response.rect;
    let Some(range) = view.snapshot.value_range() else {
        return;
    };

    painter.text(
        pos2(rect.center().x, rect.top() + 10.0),
        Align2::CENTER_CENTER,
        MAP_TITLE,
        FontId::proportional(15.0),
        Color32::WHITE,
    );

    let legend_band = 46.0;
    let layout = TileLayout::fit(
        rect.left() as f64,
        (rect.top() + 26.0) as f64,
        rect.width() as f64,
        (rect.height() - 26.0 - legend_band) as f64,
    );
    let mut hovered: Option<&roster::CountryRef> = None;
    for country in roster::all() {
        let (x0, y0, x1, y1) = layout.cell(country);
        let tile = Rect::from_min_max(
            pos2(x0 as f32, y0 as f32),
            pos2(x1 as f32, y1 as f32),
        );
        let fill = tile_rgb(&view.snapshot, country.iso3, range);
        painter.rect_filled(tile, 2.0, rgb32(fill));
        if country.iso3 == view.country.iso3 {
            painter.rect_stroke(tile, 2.0, Stroke::new(2.5, Color32::from_rgb(255, 75, 75)));
        }
        painter.text(
            tile.center(),
            Align2::CENTER_CENTER,
            country.iso3,
            FontId::proportional(layout.label_px() as f32),
            rgb32(palette::label_rgb(fill)),
        );
        if let Some(pos) = response.hover_pos()
            && tile.contains(pos)
        {
            hovered = Some(country);
        }
    }

    // color bar
    let bar_top = rect.bottom() - legend_band + 16.0;
    let bar = Rect::from_min_size(
        pos2(rect.center().x - rect.width() * 0.25, bar_top),
        Vec2::new(rect.width() * 0.5, 12.0),
    );
    let steps = 48;
    for i in 0..steps {
        let x0 = bar.left() + bar.width() * i as f32 / steps as f32;
        let x1 = bar.left() + bar.width() * (i + 1) as f32 / steps as f32;
        let t = (i as f64 + 0.5) / steps as f64;
        painter.rect_filled(
            Rect::from_min_max(pos2(x0, bar.top()), pos2(x1 + 0.5, bar.bottom())),
            0.0,
            rgb32(palette::viridis_rgb(t)),
        );
    }
    let small = FontId::proportional(11.0);
    painter.text(
        pos2(bar.center().x, bar.top() - 8.0),
        Align2::CENTER_CENTER,
        MAP_LEGEND,
        small.clone(),
        Color32::LIGHT_GRAY,
    );
    painter.text(
        pos2(bar.left(), bar.bottom() + 9.0),
        Align2::CENTER_CENTER,
        dashboard::format_percent(range.0),
        small.clone(),
        Color32::LIGHT_GRAY,
    );
    painter.text(
        pos2(bar.right(), bar.bottom() + 9.0),
        Align2::CENTER_CENTER,
        dashboard::format_percent(range.1),
        small.clone(),
        Color32::LIGHT_GRAY,
    );

    if let Some(c) = hovered {
        let value = view
            .snapshot
            .get(c.iso3)
            .map(dashboard::format_percent)
            .unwrap_or_else(|| "no data".to_string());
        painter.text(
            pos2(rect.left() + 4.0, rect.bottom() - 8.0),
            Align2::LEFT_CENTER,
            format!("{}: {value}", c.display_name),
            small,
            Color32::WHITE,
        );
    }
}

fn line_chart(ui: &mut egui::Ui, view: &DashboardView) {
    let width = ui.available_width().min(760.0);
    let (response, painter) =
        ui.allocate_painter(Vec2::new(width, width * 0.5), Sense::hover());
    let outer = response.rect;
    let plot = Rect::from_min_max(
        pos2(outer.left() + 48.0, outer.top() + 10.0),
        pos2(outer.right() - 10.0, outer.bottom() - 28.0),
    );

    let observed: Vec<(f64, f64)> = view
        .series
        .points()
        .iter()
        .map(|p| (p.year as f64, p.value))
        .collect();
    let projected: Vec<(f64, f64)> = view
        .forecast
        .iter()
        .map(|p| (p.year as f64, p.predicted_value))
        .collect();
    let all = || observed.iter().chain(projected.iter());
    let (x0, x1) = span(all().map(|p| p.0));
    let (y0, y1) = span(all().map(|p| p.1));

    let to_screen = |(x, y): (f64, f64)| -> Pos2 {
        pos2(
            plot.left() + ((x - x0) / (x1 - x0)) as f32 * plot.width(),
            plot.bottom() - ((y - y0) / (y1 - y0)) as f32 * plot.height(),
        )
    };

    let axis = Stroke::new(1.0, Color32::GRAY);
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);

    let small = FontId::proportional(11.0);
    for (y, anchor) in [(y0, plot.bottom()), (y1, plot.top())] {
        painter.text(
            pos2(plot.left() - 4.0, anchor),
            Align2::RIGHT_CENTER,
            format!("{y:.0}"),
            small.clone(),
            Color32::LIGHT_GRAY,
        );
    }
    for (x, anchor) in [(x0, plot.left()), (x1, plot.right())] {
        painter.text(
            pos2(anchor, plot.bottom() + 10.0),
            Align2::CENTER_CENTER,
            format!("{}", x.round() as i32),
            small.clone(),
            Color32::LIGHT_GRAY,
        );
    }
    painter.text(
        pos2(plot.center().x, outer.bottom() - 6.0),
        Align2::CENTER_CENTER,
        dashboard::CHART_Y_LABEL,
        small,
        Color32::GRAY,
    );

    let blue = rgb32((palette::OBSERVED.0, palette::OBSERVED.1, palette::OBSERVED.2));
    let orange = rgb32((palette::PROJECTED.0, palette::PROJECTED.1, palette::PROJECTED.2));
    let pts: Vec<Pos2> = observed.iter().copied().map(to_screen).collect();
    painter.add(egui::Shape::line(pts.clone(), Stroke::new(2.0, blue)));
    for p in pts {
        painter.circle_filled(p, 2.5, blue);
    }
    if !projected.is_empty() {
        let pts: Vec<Pos2> = projected.iter().copied().map(to_screen).collect();
        painter.add(egui::Shape::line(pts.clone(), Stroke::new(2.0, orange)));
        for p in pts {
            painter.circle_stroke(p, 2.5, Stroke::new(1.0, orange));
        }
    }

    if let Some(pos) = response.hover_pos()
        && let Some(&(x, y)) = observed
            .iter()
            .min_by(|a, b| {
                (to_screen(**a).x - pos.x)
                    .abs()
                    .total_cmp(&(to_screen(**b).x - pos.x).abs())
            })
    {
        response.on_hover_text(format!(
            "{}: {}",
            x as i32,
            dashboard::format_percent(y)
        ));
    }
}

/// Data range widened when degenerate, so the chart never divides by zero.
fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (0.0, 1.0)
    } else if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

/// Write snapshot CSV, dashboard JSON and both SVGs into `dir`.
fn export_view(view: &DashboardView, dir: &std::path::Path) -> Result<Vec<String>> {
    let iso = view.country.iso3;
    let snapshot_csv = dir.join("africa_snapshot.csv");
    let dashboard_json = dir.join(format!("dashboard_{iso}.json"));
    let map_svg = dir.join("africa_map.svg");
    let chart_svg = dir.join(format!("chart_{iso}.svg"));

    storage::save_snapshot_csv(&view.snapshot, &snapshot_csv)?;
    storage::save_dashboard_json(view, &dashboard_json)?;
    let map = viz::render_choropleth(
        &view.snapshot,
        MAP_TITLE,
        viz::DEFAULT_WIDTH,
        viz::DEFAULT_HEIGHT,
    )?;
    viz::save_svg(&map_svg, &map)?;
    let chart = viz::render_line_chart(
        &view.series,
        &view.forecast,
        &dashboard::chart_title(&view.country),
        viz::DEFAULT_WIDTH,
        viz::DEFAULT_HEIGHT,
    )?;
    viz::save_svg(&chart_svg, &chart)?;

    Ok([snapshot_csv, dashboard_json, map_svg, chart_svg]
        .iter()
        .map(|p| p.to_string_lossy().to_string())
        .collect())
}
