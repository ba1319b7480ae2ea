//! Stop editor side panel
//!
//! Bound to at most one stop. Edits happen on a draft; `save` turns the
//! draft into a [`StopPatch`] for the owning sequence. An empty name is
//! rejected here and never reaches the sequence.

use crate::error::{Error, Result};
use crate::stop::{Stop, StopId, StopPatch};
use serde::{Deserialize, Serialize};

/// Prompt shown when a save is attempted with an empty name
pub const EMPTY_NAME_PROMPT: &str = "Stop name is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    Closed,
    Viewing,
    Editing,
}

/// Editable fields of the bound stop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopDraft {
    pub name: String,
    pub description: String,
}

impl StopDraft {
    fn from_stop(stop: &Stop) -> Self {
        Self {
            name: stop.name.clone(),
            description: stop.description.clone().unwrap_or_default(),
        }
    }
}

/// Side panel state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopEditorPanel {
    stop_id: Option<StopId>,
    mode: PanelMode,
    draft: StopDraft,
    /// Blocking inline prompt, set by a rejected save
    prompt: Option<String>,
}

impl StopEditorPanel {
    pub fn new() -> Self {
        Self {
            stop_id: None,
            mode: PanelMode::Closed,
            draft: StopDraft::default(),
            prompt: None,
        }
    }

    /// Bind to `stop` and show it, optionally straight in edit mode
    pub fn open(&mut self, stop: &Stop, editing: bool) {
        self.stop_id = Some(stop.id.clone());
        self.draft = StopDraft::from_stop(stop);
        self.prompt = None;
        self.mode = if editing {
            PanelMode::Editing
        } else {
            PanelMode::Viewing
        };
    }

    pub fn begin_edit(&mut self) {
        if self.stop_id.is_some() {
            self.mode = PanelMode::Editing;
        }
    }

    /// Drop the draft and go back to viewing `stop`
    pub fn cancel_edit(&mut self, stop: &Stop) {
        if self.stop_id.as_ref() == Some(&stop.id) {
            self.draft = StopDraft::from_stop(stop);
            self.prompt = None;
            self.mode = PanelMode::Viewing;
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Validate the draft and produce the patch to apply
    ///
    /// On success the panel leaves edit mode but stays bound.
    pub fn save(&mut self) -> Result<(StopId, StopPatch)> {
        let stop_id = self
            .stop_id
            .clone()
            .ok_or_else(|| Error::UnknownStop("panel is not bound to a stop".to_string()))?;

        let name = self.draft.name.trim();
        if name.is_empty() {
            self.prompt = Some(EMPTY_NAME_PROMPT.to_string());
            return Err(Error::InvalidStopName(EMPTY_NAME_PROMPT.to_string()));
        }

        let description = self.draft.description.trim();
        let patch = StopPatch::default()
            .name(name)
            .description((!description.is_empty()).then(|| description.to_string()));

        self.prompt = None;
        self.mode = PanelMode::Viewing;
        Ok((stop_id, patch))
    }

    /// Unbind and close; returns the stop to delete
    pub fn delete(&mut self) -> Option<StopId> {
        let stop_id = self.stop_id.take();
        self.close();
        stop_id
    }

    pub fn close(&mut self) {
        self.stop_id = None;
        self.draft = StopDraft::default();
        self.prompt = None;
        self.mode = PanelMode::Closed;
    }

    pub fn stop_id(&self) -> Option<&StopId> {
        self.stop_id.as_ref()
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn draft(&self) -> &StopDraft {
        &self.draft
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }
}

impl Default for StopEditorPanel {
    fn default() -> Self {
        Self::new()
    }
}
