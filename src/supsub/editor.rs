//! Headless editor controller
//!
//! An [`Editor`] owns one document, its selection, its undo history and the mirror field value,
//! and turns host events (keys, toolbar clicks, pastes, blur, outside clicks, selection
//! changes) into calls on the classifier, the format engine, the sanitizer and the history.
//! The host renders; the editor only keeps state.
//!
//! Editors are usually managed through an [`EditorRegistry`], which also routes selection
//! changes to the editor that owns them.
//!
//! Hotkeys follow the caret, not the key. With the caret inside a run, either arrow leaves
//! that run; neither one switches to the other mark or is ignored for the current one. Hosts
//! that want a key to switch marks in place call [`format::apply`] with the new mark, which
//! splits the run at the caret.

pub mod input;
pub mod observer;
pub mod registry;
pub mod settings;

pub use input::{ClipboardPayload, Key, KeyEvent, KeyOutcome};
pub use observer::{SelectionChange, SelectionObserver};
pub use registry::EditorRegistry;
pub use settings::{ButtonSettings, Buttons, EditorClasses, EditorSettings, ToolbarButton};

use crate::supsub::classifier::{classify, Classification};
use crate::supsub::dom::{delete_contents, html, Document, Node, Position, Selection, PLACEHOLDER};
use crate::supsub::format;
use crate::supsub::history::History;
use crate::supsub::mark::Mark;
use crate::supsub::sanitizer;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, trace};

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

/// Where the initial content of an editor comes from: backing field values by id.
pub trait FieldSource {
    fn field_value(&self, id: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field_value(&self, id: &str) -> Option<&str> {
        self.get(id).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// No backing field with this id.
    MissingField(String),
    EmptyElementId,
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::MissingField(id) => write!(f, "no field with id '{}'", id),
            AttachError::EmptyElementId => write!(f, "editor settings name no field"),
        }
    }
}

impl std::error::Error for AttachError {}

#[derive(Debug, Clone)]
pub struct Editor {
    settings: EditorSettings,
    document: Document,
    selection: Option<Selection>,
    history: History,
    /// Value of the backing field.
    mirror: String,
    active: Option<Mark>,
}

impl Editor {
    /// Attach to the field named by `settings.element`, loading its value as initial content.
    /// The history is seeded with a snapshot of that content.
    pub fn attach(settings: EditorSettings, fields: &impl FieldSource) -> Result<Self, AttachError> {
        if settings.element.is_empty() {
            return Err(AttachError::EmptyElementId);
        }
        let value = fields
            .field_value(&settings.element)
            .ok_or_else(|| AttachError::MissingField(settings.element.clone()))?;

        let mut document = Document::from_html(value);
        document.normalize();
        let mut editor = Self {
            mirror: value.to_owned(),
            settings,
            document,
            selection: None,
            history: History::new(),
            active: None,
        };
        editor.save_history();
        debug!(id = %editor.id(), mode = ?editor.settings.mode, "editor attached");
        Ok(editor)
    }

    pub fn id(&self) -> &str {
        &self.settings.element
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Move the selection without the side effects of a selection change event.
    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// Raw value of the backing field.
    pub fn content(&self) -> &str {
        &self.mirror
    }

    /// Sanitized snapshot of the current document.
    pub fn clean_html(&self) -> String {
        sanitizer::clean_snapshot(&self.document)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The mark whose button is highlighted.
    pub fn active_button(&self) -> Option<Mark> {
        self.active
    }

    pub fn toolbar(&self) -> Vec<ToolbarButton> {
        let classes = &self.settings.classes;
        self.settings
            .mode
            .marks()
            .into_iter()
            .map(|mark| {
                let base = format!("{} {}", classes.button, mark.button_class());
                let button = self.settings.buttons.get(mark);
                ToolbarButton {
                    mark,
                    class: settings::class_list(&base, &self.settings.custom.button),
                    title: button.title.clone(),
                    icon: button.icon.clone(),
                    active: self.active == Some(mark),
                }
            })
            .collect()
    }

    pub fn save_history(&mut self) -> bool {
        let snapshot = self.clean_html();
        self.history.save(snapshot)
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo().map(str::to_owned) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().map(str::to_owned) {
            Some(snapshot) => {
                self.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, snapshot: &str) {
        self.document.set_html(snapshot);
        self.document.normalize();
        self.mirror = snapshot.to_owned();
        self.selection = Some(Selection::caret(self.document.end()));
        self.update_active_button();
    }

    fn refresh_mirror(&mut self) {
        self.mirror = self.clean_html();
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> KeyOutcome {
        let mut outcome = KeyOutcome::Default;
        if let Some(mark) = event.mark_hotkey() {
            self.hotkey(mark);
            outcome = KeyOutcome::Handled;
        }
        if event.ctrl {
            self.save_history();
        }
        if event.key == Key::Enter {
            outcome = KeyOutcome::Handled;
        }
        if event.is_ctrl_char('z') {
            self.undo();
            outcome = KeyOutcome::Handled;
        }
        if event.is_ctrl_char('y') {
            self.redo();
            outcome = KeyOutcome::Handled;
        }
        self.reset_empty_format();
        self.refresh_mirror();
        outcome
    }

    /// In an empty editor, drop a placeholder at the caret so typing does not pick up the
    /// format of content that was deleted.
    fn reset_empty_format(&mut self) {
        if !sanitizer::clean(&self.document.inner_html()).is_empty() {
            return;
        }
        let classification = classify(&self.document, self.selection.as_ref());
        if matches!(
            classification,
            Classification::CollapsedInMark(_) | Classification::RangeWhollyInMark(_)
        ) {
            return;
        }
        let Some(range) = self.selection.as_ref().and_then(|s| self.document.range_of(s)) else {
            return;
        };
        let mut placeholder = [0; 4];
        if let Some(caret) = self.document.insert_text(&range.start, PLACEHOLDER.encode_utf8(&mut placeholder)) {
            self.selection = Some(Selection::caret(caret));
        }
    }

    /// Hotkey dispatch. A caret inside a mark always targets that mark, and a range inside
    /// one mark always unformats it; otherwise the key's own mark is applied if offered.
    pub fn hotkey(&mut self, mark: Mark) {
        let classification = classify(&self.document, self.selection.as_ref());
        match classification {
            Classification::CollapsedInMark(current) => self.set_format(current, classification),
            Classification::RangeWhollyInMark(_) => self.set_format(mark, classification),
            _ if self.settings.mode.supports(mark) => self.set_format(mark, classification),
            _ => trace!(%mark, "hotkey for a mark this editor does not offer"),
        }
    }

    /// Toolbar click. Returns whether the document was formatted; a click with the caret in
    /// the other mark only refocuses the editor.
    pub fn click_button(&mut self, mark: Mark) -> bool {
        if !self.settings.mode.supports(mark) {
            return false;
        }
        let classification = classify(&self.document, self.selection.as_ref());
        if let Classification::CollapsedInMark(current) = classification {
            if current != mark {
                trace!(%mark, %current, "caret in the other mark");
                return false;
            }
        }
        self.set_format(mark, classification);
        true
    }

    fn set_format(&mut self, mark: Mark, classification: Classification) {
        let selection = format::apply(&mut self.document, self.selection.as_ref(), mark, &classification);
        if selection.is_some() {
            self.selection = selection;
        }
        self.refresh_mirror();
        self.save_history();
        self.update_active_button();
    }

    /// Paste clipboard content at the selection, replacing it. HTML is preferred over text.
    pub fn paste(&mut self, payload: &ClipboardPayload) {
        match (&payload.html, &payload.text) {
            (Some(html), _) => {
                let cleaned = sanitizer::clean_paste(html);
                self.insert_html(&LINE_BREAKS.replace_all(&cleaned, ""));
            }
            (None, Some(text)) => {
                self.insert_text(&LINE_BREAKS.replace_all(text, ""));
            }
            (None, None) => trace!("empty clipboard"),
        }
        self.save_history();
        self.refresh_mirror();
    }

    /// Collapse the selection, deleting what it covers. Without a selection the point is the
    /// end of the document.
    fn collapse_selection(&mut self) -> Position {
        let range = self.selection.as_ref().and_then(|s| self.document.range_of(s));
        match range {
            Some(range) if range.is_collapsed() => range.start,
            Some(range) => delete_contents(&mut self.document, &range),
            None => self.document.end(),
        }
    }

    fn insert_html(&mut self, markup: &str) {
        let nodes = html::parse_fragment(markup);
        let inserted: usize = nodes.iter().map(Node::text_len).sum();
        let point = self.collapse_selection();
        let Some((parent, index)) = self.document.split_text_at(&point) else {
            return;
        };
        let offset = self.document.text_offset(&Position::new(parent.clone(), index));
        self.document.insert_children(&parent, index, nodes);
        self.document.normalize();
        let caret = self.document.position_at_text_offset(offset + inserted);
        self.selection = Some(Selection::caret(caret));
    }

    /// Type `text` at the selection, replacing it. The document is normalized afterwards so
    /// the deletion leaves no empty nodes between runs of the same mark.
    pub fn insert_text(&mut self, text: &str) {
        let point = self.collapse_selection();
        if let Some(caret) = self.document.insert_text(&point, text) {
            let offset = self.document.text_offset(&caret);
            self.document.normalize();
            self.selection = Some(Selection::caret(self.document.position_at_text_offset(offset)));
        }
        self.refresh_mirror();
    }

    pub fn blur(&mut self) {
        self.save_history();
    }

    /// A click anywhere outside the editor: the sanitized snapshot replaces both the mirror
    /// and the document.
    pub fn click_outside(&mut self) {
        let clean = self.clean_html();
        self.document.set_html(&clean);
        self.document.normalize();
        self.mirror = clean;
        self.selection = None;
        self.active = None;
    }

    pub fn handle_selection_change(&mut self, selection: Option<Selection>) {
        self.selection = selection;
        self.update_active_button();
    }

    fn update_active_button(&mut self) {
        self.active = match classify(&self.document, self.selection.as_ref()) {
            Classification::CollapsedInMark(mark) => Some(mark),
            Classification::RangeWhollyInMark(path) => {
                self.document.element(&path).and_then(|element| element.as_mark())
            }
            _ => None,
        };
    }
}
