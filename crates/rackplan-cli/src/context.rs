use crate::script::{join_words, EditorAction};
use rackplan_core::{AppConfig, RackError, RackResult};
use rackplan_domain::commands::{self, Command, CommandKind};
use rackplan_domain::placement::{can_place, top_unit};
use rackplan_domain::{
    DeviceType, History, Layout, LayoutView, PlacedDevice, Rack, RackUpdate,
};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
    pub undo_description: Option<String>,
    pub redo_description: Option<String>,
    pub history_length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub kind: CommandKind,
    pub description: String,
    pub created_at: String,
}

impl From<&Command> for HistoryEntry {
    fn from(command: &Command) -> Self {
        Self {
            kind: command.kind(),
            description: command.description().to_string(),
            created_at: command.created_at.to_rfc3339(),
        }
    }
}

/// A layout being edited plus its undo/redo history.
pub struct EditorSession {
    pub layout: Layout,
    pub history: History,
}

impl EditorSession {
    pub fn new(config: &AppConfig) -> Self {
        let rack = Rack::new(
            config.effective_default_rack_name(),
            config.effective_default_rack_height(),
        );
        Self {
            layout: Layout::new(rack),
            history: History::from_config(config),
        }
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            undo_description: self.history.undo_description().map(str::to_string),
            redo_description: self.history.redo_description().map(str::to_string),
            history_length: self.history.history_length(),
        }
    }

    fn device(&self, index: usize) -> RackResult<&PlacedDevice> {
        self.layout
            .device_at(index)
            .ok_or_else(|| RackError::device_not_found(index))
    }

    fn execute(&mut self, action: &EditorAction, command: Command) -> RackResult<Value> {
        let kind = command.kind();
        let description = command.description().to_string();
        self.history.execute(command, &mut self.layout)?;
        Ok(json!({
            "action": action.name(),
            "kind": kind,
            "description": description,
            "status": self.status(),
        }))
    }

    /// Build the command for an action, check it, and run it through the history.
    pub fn apply(&mut self, action: &EditorAction) -> RackResult<Value> {
        let command = match action {
            EditorAction::AddType {
                slug,
                u_height,
                half,
                model,
            } => {
                let model = join_words(model).unwrap_or_else(|| slug.clone());
                let mut device_type = DeviceType::new(slug.clone(), model, *u_height);
                device_type.is_full_depth = !*half;
                commands::add_device_type(&device_type)
            }
            EditorAction::Place {
                slug,
                position,
                face,
            } => {
                let face = (*face).into();
                can_place(&self.layout, slug, *position, face, None)?;
                commands::place_device(&PlacedDevice::new(slug.clone(), *position, face))
            }
            EditorAction::Move { index, position } => {
                let device = self.device(*index)?;
                can_place(
                    &self.layout,
                    &device.device_type,
                    *position,
                    device.face,
                    Some(*index),
                )?;
                commands::move_device(*index, device.position, *position)
            }
            EditorAction::Remove { index } => commands::remove_device(&self.layout, *index)?,
            EditorAction::Face { index, face } => {
                let face = (*face).into();
                let device = self.device(*index)?;
                can_place(
                    &self.layout,
                    &device.device_type,
                    device.position,
                    face,
                    Some(*index),
                )?;
                commands::update_device_face(*index, device.face, face)
            }
            EditorAction::Rename { index, name } => {
                let device = self.device(*index)?;
                commands::update_device_name(*index, device.name.clone(), join_words(name))
            }
            EditorAction::DeleteType { slug } => {
                commands::delete_device_type(&self.layout, slug)?
            }
            EditorAction::RackHeight { height } => {
                self.check_height(*height)?;
                commands::update_rack_from(&self.layout, RackUpdate::height(*height))?
            }
            EditorAction::RackName { name } => {
                let name = join_words(name)
                    .ok_or_else(|| RackError::Validation("missing rack name".to_string()))?;
                commands::update_rack_from(&self.layout, RackUpdate::name(name))?
            }
            EditorAction::Clear => commands::clear_rack(&self.layout),
            EditorAction::Undo => {
                let applied = self.history.undo(&mut self.layout)?;
                return Ok(json!({
                    "action": action.name(),
                    "applied": applied,
                    "status": self.status(),
                }));
            }
            EditorAction::Redo => {
                let applied = self.history.redo(&mut self.layout)?;
                return Ok(json!({
                    "action": action.name(),
                    "applied": applied,
                    "status": self.status(),
                }));
            }
            EditorAction::History => {
                let undo: Vec<HistoryEntry> =
                    self.history.undo_entries().map(HistoryEntry::from).collect();
                let redo: Vec<HistoryEntry> =
                    self.history.redo_entries().map(HistoryEntry::from).collect();
                return Ok(json!({
                    "action": action.name(),
                    "undo": undo,
                    "redo": redo,
                    "max_depth": self.history.max_depth(),
                }));
            }
            EditorAction::Show => return Ok(self.summary()),
        };
        self.execute(action, command)
    }

    /// Devices must keep fitting when the rack shrinks.
    fn check_height(&self, height: u32) -> RackResult<()> {
        if height == 0 {
            return Err(RackError::Validation(
                "rack height must be at least 1".to_string(),
            ));
        }
        for device in &self.layout.rack.devices {
            let u_height = self
                .layout
                .device_type(&device.device_type)
                .map(|t| t.u_height)
                .unwrap_or(1);
            let top = top_unit(device.position, u_height)?;
            if top > height {
                return Err(RackError::Validation(format!(
                    "{} reaches U{}, above a {}U rack",
                    device.display_name(),
                    top,
                    height
                )));
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> Value {
        json!({
            "action": "show",
            "layout": self.layout,
            "status": self.status(),
        })
    }
}
