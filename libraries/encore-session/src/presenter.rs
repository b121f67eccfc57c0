//! Status display contract
//!
//! A presenter turns declarative render requests into a visible status
//! message with action controls. Each render replaces the text and fields
//! wholesale and may hand back a new display handle.

use crate::enablement::EnablementSnapshot;
use crate::error::PresenterError;
use crate::types::{ControlId, SessionId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Title of a freshly opened display
pub const INITIAL_TITLE: &str = "Playlist";

/// Description of a freshly opened display
pub const INITIAL_DESCRIPTION: &str = "Initialized";

/// Opaque reference to a rendered status display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayHandle(pub String);

impl DisplayHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One named line in the status display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusField {
    pub name: String,
    pub value: String,
}

impl StatusField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single change to the display content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUpdate {
    SetTitle(String),
    SetDescription(String),
    SetFields(Vec<StatusField>),
}

/// Everything a presenter needs for one render
///
/// `controls: None` suppresses the action controls entirely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderRequest {
    pub updates: Vec<DisplayUpdate>,
    pub controls: Option<EnablementSnapshot>,
}

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.updates.push(DisplayUpdate::SetTitle(title.into()));
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.updates
            .push(DisplayUpdate::SetDescription(description.into()));
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: Vec<StatusField>) -> Self {
        self.updates.push(DisplayUpdate::SetFields(fields));
        self
    }

    #[must_use]
    pub fn controls(mut self, snapshot: EnablementSnapshot) -> Self {
        self.controls = Some(snapshot);
        self
    }

    /// Last description set by this request, if any
    pub fn description_text(&self) -> Option<&str> {
        self.updates.iter().rev().find_map(|u| match u {
            DisplayUpdate::SetDescription(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last title set by this request, if any
    pub fn title_text(&self) -> Option<&str> {
        self.updates.iter().rev().find_map(|u| match u {
            DisplayUpdate::SetTitle(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Last field list set by this request, if any
    pub fn field_list(&self) -> Option<&[StatusField]> {
        self.updates.iter().rev().find_map(|u| match u {
            DisplayUpdate::SetFields(fields) => Some(fields.as_slice()),
            _ => None,
        })
    }
}

/// Visual emphasis of a control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
}

/// One drawable control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlButton {
    pub id: ControlId,
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
}

impl ControlButton {
    fn new(id: ControlId, label: &str, style: ButtonStyle, disabled: bool) -> Self {
        Self {
            id,
            label: label.to_string(),
            style,
            disabled,
        }
    }
}

/// Lay out the controls for a snapshot
///
/// Row one always holds the transport controls. Row two (volume and shuffle)
/// is present only while expanded.
pub fn control_rows(snapshot: &EnablementSnapshot) -> Vec<Vec<ControlButton>> {
    let (pause_label, pause_style) = if snapshot.is_paused {
        ("▶", ButtonStyle::Success)
    } else {
        ("⏸", ButtonStyle::Secondary)
    };
    let more_style = if snapshot.is_expanded {
        ButtonStyle::Success
    } else {
        ButtonStyle::Secondary
    };

    let mut rows = vec![vec![
        ControlButton::new(ControlId::Prev, "⏮", ButtonStyle::Primary, snapshot.disable_prev),
        ControlButton::new(ControlId::Next, "⏭", ButtonStyle::Primary, snapshot.disable_next),
        ControlButton::new(ControlId::Pause, pause_label, pause_style, snapshot.disable_pause),
        ControlButton::new(ControlId::Stop, "⏹", ButtonStyle::Danger, snapshot.disable_stop),
        ControlButton::new(ControlId::More, "…", more_style, snapshot.disable_more),
    ]];

    if snapshot.is_expanded {
        rows.push(vec![
            ControlButton::new(
                ControlId::VolumeUp,
                "🔊",
                ButtonStyle::Primary,
                snapshot.disable_volume_up,
            ),
            ControlButton::new(
                ControlId::VolumeDown,
                "🔈",
                ButtonStyle::Primary,
                snapshot.disable_volume_down,
            ),
            ControlButton::new(
                ControlId::Shuffle,
                "🔀",
                ButtonStyle::Primary,
                snapshot.disable_shuffle,
            ),
        ]);
    }

    rows
}

/// Renders session status for users
///
/// Implementations own the transport (chat message, terminal, ...). Every
/// call for one session is awaited before the next is issued.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Create the initial display for a session
    async fn open(&self, session: &SessionId) -> Result<DisplayHandle, PresenterError>;

    /// Apply a render request, returning the handle to use from now on
    async fn render(
        &self,
        display: &DisplayHandle,
        request: RenderRequest,
    ) -> Result<DisplayHandle, PresenterError>;

    /// Remove the display
    async fn delete(&self, display: &DisplayHandle) -> Result<(), PresenterError>;
}
