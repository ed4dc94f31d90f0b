//! Entry points shown to the user: the fog-tool toolbar action, the import
//! modal and the dispatch of its two buttons.

use tracing::{debug, error, warn};

use crate::error::ImportError;
use crate::host::{NotificationLevel, SceneHost};
use crate::import::{ImportOptions, add_items_from_vtt, upload_scene_from_vtt};
use crate::items::plugin_key;
use crate::uvtt::SUPPORTED_EXTENSIONS;

pub const FOG_TOOL_ID: &str = "rodeo.owlbear.tool/fog";
pub const IMPORT_LABEL: &str = "Import UVTT/DD2VTT";
pub const FILE_FILTER_NAME: &str = "Universal VTT";

#[derive(Debug, Clone, PartialEq)]
pub struct ToolbarAction {
    pub id: String,
    pub label: String,
    /// Tool that must be active for the action to show
    pub active_tool: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalSpec {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

pub fn import_toolbar_action(plugin_id: &str) -> ToolbarAction {
    ToolbarAction {
        id: plugin_key(plugin_id, "import-uvtt"),
        label: IMPORT_LABEL.to_string(),
        active_tool: FOG_TOOL_ID.to_string(),
    }
}

pub fn import_modal(plugin_id: &str) -> ModalSpec {
    ModalSpec {
        id: plugin_key(plugin_id, "import-modal"),
        width: 400,
        height: 250,
    }
}

/// Picker filter: display name and extensions without dots
pub fn file_filter() -> (&'static str, &'static [&'static str]) {
    (FILE_FILTER_NAME, &SUPPORTED_EXTENSIONS)
}

/// The two buttons of the import modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    CreateScene,
    ImportItems,
}

impl ImportAction {
    pub fn button_label(&self) -> &'static str {
        match self {
            ImportAction::CreateScene => "Create New Scene",
            ImportAction::ImportItems => "Import Items to Scene",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ImportAction::CreateScene => {
                "Select a UVTT, DD2VTT, or DF2VTT file to create a new scene."
            }
            ImportAction::ImportItems => "Add walls, doors, and lights to the current scene.",
        }
    }
}

/// Run one modal action on a selected file and report the outcome to the
/// user through host notifications
///
/// Failures are shown as an error notification and returned.
pub fn run_import_action<H: SceneHost + ?Sized>(
    host: &mut H,
    action: ImportAction,
    file_name: &str,
    content: &str,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    let result = match action {
        ImportAction::CreateScene => {
            upload_scene_from_vtt(host, file_name, content).and_then(|name| {
                host.notify(&format!("Created scene {}", name), NotificationLevel::Success)?;
                Ok(())
            })
        }
        ImportAction::ImportItems => import_items(host, content, options),
    };

    if let Err(err) = &result {
        error!(file = file_name, error = %err, "import failed");
        if let Err(notify_err) = host.notify(&format!("Error: {}", err), NotificationLevel::Error) {
            warn!(error = %notify_err, "failed to show error notification");
        }
    }
    result
}

fn import_items<H: SceneHost + ?Sized>(
    host: &mut H,
    content: &str,
    options: &ImportOptions,
) -> Result<(), ImportError> {
    host.notify("Adding items to current scene...", NotificationLevel::Info)?;
    let summary = add_items_from_vtt(host, content, options)?;
    debug!(items = summary.total(), "items added to current scene");
    host.notify(
        "Added walls, doors, and lights to the current scene",
        NotificationLevel::Success,
    )?;
    Ok(())
}
