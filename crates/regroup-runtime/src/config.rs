#![forbid(unsafe_code)]

//! Board configuration as data.
//!
//! Groups every tunable of a [`SectionBoard`](crate::board::SectionBoard)
//! into one [`BoardConfig`] that can be loaded from TOML or JSON (feature
//! `config`).
//!
//! ```toml
//! rollback_message = "Couldn't save the new section order."
//!
//! [gesture]
//! activation_distance = 5
//!
//! [constraints]
//! item_vertical_only = false
//! ```
//!
//! # Defaults
//!
//! `BoardConfig::default()` reproduces the component defaults exactly:
//! [`GestureConfig::default`], [`DragConstraints::default`],
//! [`NoticeConfig::default`].

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use regroup_core::constraint::MovementConstraint;
use regroup_core::drag::DragConstraints;
use regroup_core::gesture::GestureConfig;

use crate::error::ConfigError;
use crate::notice::NoticeConfig;

/// Default text of the notice raised when a commit is rolled back.
pub const DEFAULT_ROLLBACK_MESSAGE: &str =
    "Couldn't save the new section order. Your sections were restored.";

// ---------------------------------------------------------------------------
// BoardConfig
// ---------------------------------------------------------------------------

/// Every tunable of a section board.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct BoardConfig {
    pub gesture: GesturePolicy,
    pub constraints: ConstraintPolicy,
    pub notices: NoticePolicy,
    /// Notice text shown after a failed commit is rolled back.
    pub rollback_message: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            gesture: GesturePolicy::default(),
            constraints: ConstraintPolicy::default(),
            notices: NoticePolicy::default(),
            rollback_message: DEFAULT_ROLLBACK_MESSAGE.to_string(),
        }
    }
}

impl BoardConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gesture.activation_distance == 0 {
            errors.push("gesture.activation_distance must be > 0".into());
        }
        if self.gesture.activation_distance > MAX_ACTIVATION_DISTANCE {
            errors.push(format!(
                "gesture.activation_distance must be <= {MAX_ACTIVATION_DISTANCE}, got {}",
                self.gesture.activation_distance
            ));
        }
        if self.notices.max_queued == 0 {
            errors.push("notices.max_queued must be > 0".into());
        }
        if self.rollback_message.trim().is_empty() {
            errors.push("rollback_message must not be empty".into());
        }

        errors
    }

    /// `self` if valid, otherwise every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            activation_distance: self.gesture.activation_distance,
            keyboard: self.gesture.keyboard,
        }
    }

    #[must_use]
    pub fn to_drag_constraints(&self) -> DragConstraints {
        let c = &self.constraints;
        DragConstraints {
            item: MovementConstraint {
                vertical_only: c.item_vertical_only,
                within_parent: c.item_within_parent,
            },
            group: MovementConstraint {
                vertical_only: c.group_vertical_only,
                within_parent: c.group_within_parent,
            },
        }
    }

    #[must_use]
    pub fn to_notice_config(&self) -> NoticeConfig {
        NoticeConfig {
            max_queued: self.notices.max_queued,
            dedup_window_ms: self.notices.dedup_window_ms,
        }
    }
}

const MAX_ACTIVATION_DISTANCE: u32 = 64;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Drag activation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct GesturePolicy {
    /// Manhattan distance a pressed handle must travel before a drag starts.
    pub activation_distance: u32,
    /// Allow Space/Enter on a focused handle to start a keyboard drag.
    pub keyboard: bool,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        let defaults = GestureConfig::default();
        Self {
            activation_distance: defaults.activation_distance,
            keyboard: defaults.keyboard,
        }
    }
}

/// Movement restrictions per drag kind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ConstraintPolicy {
    pub item_vertical_only: bool,
    pub item_within_parent: bool,
    pub group_vertical_only: bool,
    pub group_within_parent: bool,
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        let DragConstraints { item, group } = DragConstraints::default();
        Self {
            item_vertical_only: item.vertical_only,
            item_within_parent: item.within_parent,
            group_vertical_only: group.vertical_only,
            group_within_parent: group.within_parent,
        }
    }
}

/// Notice queue sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct NoticePolicy {
    pub max_queued: usize,
    pub dedup_window_ms: u64,
}

impl Default for NoticePolicy {
    fn default() -> Self {
        let defaults = NoticeConfig::default();
        Self {
            max_queued: defaults.max_queued,
            dedup_window_ms: defaults.dedup_window_ms,
        }
    }
}
