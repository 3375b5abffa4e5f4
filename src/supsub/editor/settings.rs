//! Attach-time settings of an editor instance

use crate::supsub::mark::{Mark, MarkMode};
use serde::{Deserialize, Serialize};

/// Everything an editor is attached with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Id of the backing field the editor mirrors.
    pub element: String,
    #[serde(rename = "type")]
    pub mode: MarkMode,
    pub classes: EditorClasses,
    /// Extra classes appended to the default ones.
    pub custom: CustomClasses,
    pub buttons: Buttons,
}

impl EditorSettings {
    pub fn new(element: impl Into<String>, mode: MarkMode) -> Self {
        Self {
            element: element.into(),
            mode,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorClasses {
    pub wrap: String,
    pub editor: String,
    // Lowercase aliases: layered config files reach serde with their keys lowercased.
    #[serde(alias = "contentwrap")]
    pub content_wrap: String,
    pub content: String,
    pub toolbar: String,
    #[serde(alias = "toolbargroup")]
    pub toolbar_group: String,
    pub button: String,
}

impl Default for EditorClasses {
    fn default() -> Self {
        Self {
            wrap: "ousupsub-wrap".into(),
            editor: "editor_ousupsub".into(),
            content_wrap: "editor_ousupsub_content_wrap".into(),
            content: "editor_ousupsub_content".into(),
            toolbar: "editor_ousupsub_toolbar".into(),
            toolbar_group: "ousupsub_group".into(),
            button: "ousupsub-button".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomClasses {
    pub wrap: String,
    pub editor: String,
    #[serde(alias = "contentwrap")]
    pub content_wrap: String,
    pub content: String,
    pub toolbar: String,
    #[serde(alias = "toolbargroup")]
    pub toolbar_group: String,
    pub button: String,
}

/// Button metadata, keyed by mark name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buttons {
    pub superscript: ButtonSettings,
    pub subscript: ButtonSettings,
}

impl Default for Buttons {
    fn default() -> Self {
        Self {
            superscript: ButtonSettings::new("Superscript", "x<sup>2</sup>"),
            subscript: ButtonSettings::new("Subscript", "x<sub>2</sub>"),
        }
    }
}

impl Buttons {
    pub fn get(&self, mark: Mark) -> &ButtonSettings {
        match mark {
            Mark::Superscript => &self.superscript,
            Mark::Subscript => &self.subscript,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSettings {
    pub title: String,
    /// Icon markup, rendered as is.
    pub icon: String,
}

impl ButtonSettings {
    pub fn new(title: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
        }
    }
}

/// A toolbar button as the host should render it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolbarButton {
    pub mark: Mark,
    /// Space separated class list.
    pub class: String,
    pub title: String,
    pub icon: String,
    pub active: bool,
}

/// Join a default class with its custom addition.
pub(crate) fn class_list(base: &str, custom: &str) -> String {
    format!("{} {}", base, custom).trim().to_string()
}
