//! Which record, if any, is open in a dialog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    View,
    Edit,
    Reply,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open { kind: ModalKind, id: Uuid },
}

impl ModalState {
    /// Open a dialog, replacing whatever was open.
    pub fn open(&mut self, kind: ModalKind, id: Uuid) {
        *self = Self::Open { kind, id };
    }

    pub fn close(&mut self) {
        *self = Self::Closed;
    }

    pub fn current(&self) -> Option<(ModalKind, Uuid)> {
        match *self {
            Self::Closed => None,
            Self::Open { kind, id } => Some((kind, id)),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_replaces_previous_modal() {
        let mut modal = ModalState::default();
        assert!(!modal.is_open());

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        modal.open(ModalKind::View, first);
        modal.open(ModalKind::ConfirmDelete, second);
        assert_eq!(modal.current(), Some((ModalKind::ConfirmDelete, second)));

        modal.close();
        assert_eq!(modal.current(), None);
    }
}
