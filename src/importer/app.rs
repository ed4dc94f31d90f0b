use std::path::{Path, PathBuf};

use eframe::egui;
use uvtt_import::config::AppConfig;
use uvtt_import::ui::{
    ImportAction, ModalSpec, ToolbarAction, file_filter, import_modal, import_toolbar_action,
};
use uvtt_import::{
    DirectoryHost, ImportError, ImportOptions, NotificationLevel, read_uvtt_file,
    run_import_action,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tool {
    Select,
    Fog,
}

pub struct ImporterApp {
    config: AppConfig,
    options: ImportOptions,
    host: DirectoryHost,
    toolbar_action: ToolbarAction,
    modal: ModalSpec,
    current_tool: Tool,
    modal_open: bool,
    status_message: String,
}

impl ImporterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let plugin_id = config.import.plugin_id.clone();
        let host = Self::make_host(&config, config.output.directory.clone());
        Self {
            options: ImportOptions::from(&config.import),
            host,
            toolbar_action: import_toolbar_action(&plugin_id),
            modal: import_modal(&plugin_id),
            current_tool: Tool::Fog,
            modal_open: false,
            status_message: String::from("Ready - select the fog tool and import a map"),
            config,
        }
    }

    fn make_host(config: &AppConfig, root: PathBuf) -> DirectoryHost {
        DirectoryHost::new(
            root,
            config.import.grid_dpi,
            config.import.player_id.clone(),
        )
    }

    fn choose_output(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_directory(self.host.root())
            .pick_folder()
        {
            self.host = Self::make_host(&self.config, dir);
            self.status_message = format!("Output: {}", self.host.root().display());
        }
    }

    fn handle_file_select(&mut self, action: ImportAction) {
        let (filter_name, extensions) = file_filter();
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter_name, extensions)
            .pick_file()
        else {
            return;
        };

        match self.import_file(action, &path) {
            Ok(()) => {
                self.status_message = format!("Imported: {}", path.display());
            }
            Err(e) => {
                self.status_message = format!("Error importing file: {}", e);
            }
        }
    }

    fn import_file(&mut self, action: ImportAction, path: &Path) -> Result<(), ImportError> {
        let content = read_uvtt_file(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        run_import_action(&mut self.host, action, &file_name, &content, &self.options)
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Tool:");
            if ui
                .selectable_label(self.current_tool == Tool::Select, "Select")
                .clicked()
            {
                self.current_tool = Tool::Select;
            }
            if ui
                .selectable_label(self.current_tool == Tool::Fog, "Fog")
                .clicked()
            {
                self.current_tool = Tool::Fog;
            }

            // The import action lives in the fog tool's submenu
            if self.current_tool == Tool::Fog {
                ui.separator();
                if ui
                    .button(&self.toolbar_action.label)
                    .on_hover_text(&self.toolbar_action.id)
                    .clicked()
                {
                    self.modal_open = true;
                }
            }

            ui.separator();

            if ui.button("Output folder...").clicked() {
                self.choose_output();
            }
            ui.label(format!("DPI: {}", self.config.import.grid_dpi));
        });
    }

    fn render_modal(&mut self, ctx: &egui::Context) {
        let mut open = self.modal_open;
        let mut chosen: Option<ImportAction> = None;

        egui::Window::new("Import UVTT/DD2VTT File")
            .id(egui::Id::new(&self.modal.id))
            .collapsible(false)
            .resizable(false)
            .fixed_size([self.modal.width as f32, self.modal.height as f32])
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(ImportAction::CreateScene.description());
                    if ui
                        .button(ImportAction::CreateScene.button_label())
                        .clicked()
                    {
                        chosen = Some(ImportAction::CreateScene);
                    }

                    ui.add_space(8.0);
                    ui.weak("or");
                    ui.add_space(8.0);

                    ui.label(ImportAction::ImportItems.description());
                    if ui
                        .button(ImportAction::ImportItems.button_label())
                        .clicked()
                    {
                        chosen = Some(ImportAction::ImportItems);
                    }
                });
            });

        self.modal_open = open;
        if let Some(action) = chosen {
            self.handle_file_select(action);
        }
    }

    fn render_notifications(&self, ui: &mut egui::Ui) {
        ui.heading("Notifications");
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (level, message) in self.host.notifications().iter().rev() {
                let color = match level {
                    NotificationLevel::Error => egui::Color32::RED,
                    NotificationLevel::Warning => egui::Color32::YELLOW,
                    NotificationLevel::Success => egui::Color32::GREEN,
                    _ => ui.visuals().text_color(),
                };
                ui.colored_label(color, message);
            }
        });
    }
}

impl eframe::App for ImporterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                self.modal_open = false;
            }
        });

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "Items: {} | Fog filled: {}",
                        self.host.items().len(),
                        self.host.fog_filled()
                    ));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_notifications(ui);
        });

        if self.modal_open {
            self.render_modal(ctx);
        }
    }
}
