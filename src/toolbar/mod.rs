//! Toolbar state
//!
//! The toolbar owns the button store plus the on/off state of toggle
//! buttons. Toggled flags are indexed like the store and kept aligned on
//! every push and removal.
//!
//! Modal exclusivity is recomputed from scratch on each modal activation:
//! every button is re-enabled, then all but the activated one are disabled.

pub mod defaults;

use crate::error::StoreError;
use crate::models::ButtonDescriptor;
use crate::store::{EventKind, ListStore, Notification, SubscriptionId};

pub use defaults::DEFAULT_BUTTONS;

#[derive(Debug)]
pub struct Toolbar {
    buttons: ListStore<ButtonDescriptor>,
    toggled: Vec<bool>,
}

impl Toolbar {
    pub fn new(buttons: Vec<ButtonDescriptor>) -> Self {
        let toggled = vec![false; buttons.len()];
        Self {
            buttons: ListStore::new("buttons", buttons),
            toggled,
        }
    }

    pub fn buttons(&self) -> &[ButtonDescriptor] {
        self.buttons.items()
    }

    pub fn get(&self, index: usize) -> Option<&ButtonDescriptor> {
        self.buttons.get(index)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// Index of the first button bound to `action`
    pub fn position(&self, action: &str) -> Option<usize> {
        self.buttons().iter().position(|b| b.action == action)
    }

    pub fn is_toggled(&self, index: usize) -> bool {
        self.toggled.get(index).copied().unwrap_or(false)
    }

    /// Indices of buttons that are not disabled
    pub fn enabled_indices(&self) -> Vec<usize> {
        self.buttons()
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.disabled)
            .map(|(i, _)| i)
            .collect()
    }

    /// Append a button at runtime; returns its index
    pub fn register(&mut self, button: ButtonDescriptor) -> usize {
        self.toggled.push(false);
        self.buttons.push(button)
    }

    pub fn remove(&mut self, index: usize) -> Result<ButtonDescriptor, StoreError> {
        let removed = self.buttons.remove(index)?;
        self.toggled.remove(index);
        Ok(removed)
    }

    /// Replace a descriptor through the store
    pub fn set(&mut self, index: usize, button: ButtonDescriptor) -> Result<(), StoreError> {
        self.buttons.set(index, button)
    }

    /// Disable every button except `index`
    pub fn disable_buttons_except(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            });
        }
        for i in 0..self.len() {
            if i != index {
                let button = self.buttons.items()[i].with_disabled(true);
                self.buttons.set(i, button)?;
            }
        }
        Ok(())
    }

    /// Enable every button
    pub fn enable_buttons(&mut self) -> Result<(), StoreError> {
        for i in 0..self.len() {
            let button = self.buttons.items()[i].with_disabled(false);
            self.buttons.set(i, button)?;
        }
        Ok(())
    }

    /// Flip a toggle button after its action ran
    ///
    /// Returns the new toggled flag (always false for plain buttons).
    pub fn after_click(&mut self, index: usize) -> Result<bool, StoreError> {
        let active = !self.is_toggled(index);
        self.set_toggled(index, active)?;
        Ok(self.is_toggled(index))
    }

    /// Set a toggle button's flag and re-lay the enabled state
    ///
    /// Switching a modal button on disables every other button and switches
    /// off any other modal button; the indices of those displaced modal
    /// buttons are returned so their owners can undo what they showed.
    /// Plain buttons have no flag and are left alone.
    pub fn set_toggled(&mut self, index: usize, active: bool) -> Result<Vec<usize>, StoreError> {
        let button = self
            .get(index)
            .cloned()
            .ok_or(StoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            })?;
        if !button.toggle {
            return Ok(Vec::new());
        }

        self.toggled[index] = active;

        let mut displaced = Vec::new();
        if button.modal && active {
            // Only one modal button can be on; the newcomer wins
            displaced = (0..self.len())
                .filter(|&i| i != index && self.toggled[i] && self.buttons.items()[i].modal)
                .collect();
            for &i in &displaced {
                self.toggled[i] = false;
            }
            self.enable_buttons()?;
            self.disable_buttons_except(index)?;
        } else if button.modal || self.active_modal().is_none() {
            self.enable_buttons()?;
        }
        Ok(displaced)
    }

    /// Index of the modal button currently switched on
    pub fn active_modal(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.toggled[i] && self.buttons.items()[i].modal)
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&Notification<ButtonDescriptor>) -> Result<(), String> + 'static,
    ) -> SubscriptionId {
        self.buttons.on(kind, callback)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.buttons.off(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolbar() -> Toolbar {
        Toolbar::new(vec![
            ButtonDescriptor::new("bold", "format_bold", "Bold", ""),
            ButtonDescriptor::new("preview", "visibility", "Preview", "").modal(),
            ButtonDescriptor::new("fullscreen", "fullscreen", "Fullscreen", "").modal(),
            ButtonDescriptor::new("snippets", "library_add", "Snippets", "").toggle(),
        ])
    }

    #[test]
    fn test_plain_button_has_no_state() {
        let mut toolbar = toolbar();
        assert!(!toolbar.after_click(0).unwrap());
        assert_eq!(toolbar.enabled_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_modal_toggle_disables_others() {
        let mut toolbar = toolbar();
        assert!(toolbar.after_click(1).unwrap());
        assert_eq!(toolbar.enabled_indices(), vec![1]);

        // Toggling off restores everything
        assert!(!toolbar.after_click(1).unwrap());
        assert_eq!(toolbar.enabled_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_second_modal_replaces_first() {
        let mut toolbar = toolbar();
        toolbar.after_click(1).unwrap();
        toolbar.after_click(2).unwrap();

        assert_eq!(toolbar.enabled_indices(), vec![2]);
        assert!(toolbar.is_toggled(2));
        assert!(!toolbar.is_toggled(1));
    }

    #[test]
    fn test_non_modal_toggle_enables_all() {
        let mut toolbar = toolbar();
        toolbar.disable_buttons_except(0).unwrap();
        assert!(toolbar.after_click(3).unwrap());
        assert_eq!(toolbar.enabled_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_set_toggled_reports_displaced_modal() {
        let mut toolbar = toolbar();
        assert!(toolbar.set_toggled(1, true).unwrap().is_empty());
        assert_eq!(toolbar.set_toggled(2, true).unwrap(), vec![1]);
        assert_eq!(toolbar.active_modal(), Some(2));
    }

    #[test]
    fn test_non_modal_flag_keeps_modal_layout() {
        let mut toolbar = toolbar();
        toolbar.set_toggled(1, true).unwrap();
        toolbar.set_toggled(3, true).unwrap();

        assert!(toolbar.is_toggled(3));
        assert_eq!(toolbar.enabled_indices(), vec![1]);
    }

    #[test]
    fn test_toggled_flags_follow_removal() {
        let mut toolbar = toolbar();
        toolbar.after_click(3).unwrap();
        toolbar.remove(1).unwrap();

        assert_eq!(toolbar.len(), 3);
        assert!(toolbar.is_toggled(2));
        assert_eq!(toolbar.position("snippets"), Some(2));
    }

    #[test]
    fn test_register_appends() {
        let mut toolbar = toolbar();
        let index = toolbar.register(ButtonDescriptor::new("table", "table", "Table", ""));
        assert_eq!(index, 4);
        assert!(!toolbar.is_toggled(4));
    }

    #[test]
    fn test_disable_out_of_bounds() {
        let mut toolbar = toolbar();
        assert!(toolbar.disable_buttons_except(9).is_err());
        assert_eq!(toolbar.enabled_indices().len(), 4);
    }
}
