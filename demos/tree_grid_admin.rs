#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use chrono::Local;
use eframe::egui;
use egui_tree_grid::{ExportParams, SimulatedStore, TreeGrid, TreeGridOptions};

struct App {
    grid: TreeGrid,
    store: SimulatedStore,
    search: String,
    toasts: Vec<(String, f64)>,
    show_debug: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            grid: TreeGrid::new(TreeGridOptions {
                debug_event_log: true,
                debug_integrity: cfg!(debug_assertions),
                ..Default::default()
            }),
            store: SimulatedStore::with_fake_data(7),
            search: String::new(),
            toasts: Vec::new(),
            show_debug: false,
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_title("egui_tree_grid admin demo"),
        ..Default::default()
    };

    eframe::run_native(
        "egui_tree_grid admin demo",
        options,
        Box::new(|_cc| Ok(Box::new(App::default()))),
    )
}

impl App {
    fn export(&mut self, now: f64, params: &ExportParams) {
        let file_name = params.csv_file_name();
        let message = match std::fs::write(&file_name, self.grid.export_csv(params)) {
            Ok(()) => format!("Exported {file_name}"),
            Err(err) => format!("Export failed: {err}"),
        };
        self.toasts.push((message, now));
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        egui::TopBottomPanel::top("tree_grid_demo_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                if ui.text_edit_singleline(&mut self.search).changed() {
                    self.grid.set_search(self.search.clone());
                }
                if ui.button("Expand all").clicked() {
                    self.grid.view_mut().expand_all();
                }
                if ui.button("Collapse all").clicked() {
                    self.grid.view_mut().collapse_all();
                }
                let export = ui.button("Export CSV");
                if export.clicked() {
                    self.export(now, &ExportParams::default_now());
                }
                export.context_menu(|ui| {
                    if ui.button("Export CSV with time").clicked() {
                        self.export(now, &ExportParams::at(&Local::now()));
                    }
                });
                if ui
                    .button("Simulate server update")
                    .on_hover_text("Re-randomize every count on the server side")
                    .clicked()
                {
                    self.store.recount();
                    self.grid.invalidate(now);
                }
                if ui
                    .button("Fail next request")
                    .on_hover_text("The next mutation is rejected by the store")
                    .clicked()
                {
                    self.store.fail_next(1);
                }
                ui.checkbox(&mut self.show_debug, "Debug log");
                if self.grid.is_loading() {
                    ui.spinner();
                }
            });
            ui.add(
                egui::Label::new(
                    "Drag a row onto another row: top edge drops before, bottom edge after, \
                     middle makes it a child. Rest on a collapsed group to expand it. \
                     Double-click a label to rename.",
                )
                .selectable(false),
            );
        });

        for failure in self.grid.take_failures() {
            self.toasts.push((format!("Request failed: {failure}"), now));
        }
        self.toasts.retain(|(_, shown_at)| now - shown_at < 4.0);
        if !self.toasts.is_empty() {
            egui::TopBottomPanel::bottom("tree_grid_demo_toasts").show(ctx, |ui| {
                for (message, _) in &self.toasts {
                    ui.colored_label(ui.visuals().warn_fg_color, message);
                }
            });
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        if self.show_debug {
            egui::SidePanel::right("tree_grid_demo_debug")
                .default_width(320.0)
                .show(ctx, |ui| {
                    if ui.button("Clear").clicked() {
                        self.grid.debug_log_clear();
                    }
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            ui.monospace(self.grid.debug_log_text());
                        });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.grid.ui(ui, &mut self.store);
        });
    }
}
