/// Whether the form adds a new item or renames an existing one.
///
/// `Edit` is the edit session: `target` is an index into the list and must
/// keep pointing at the same item while the session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Add,
    Edit {
        target: usize,
    },
}

impl FormMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    pub fn target(&self) -> Option<usize> {
        match self {
            FormMode::Edit { target } => Some(*target),
            FormMode::Add => None,
        }
    }

    /// Keep the session consistent after the item at `index` was removed.
    /// Removing the target ends the session; removing an earlier item
    /// shifts the target down.
    pub fn item_removed(&mut self, index: usize) {
        if let FormMode::Edit { target } = *self {
            if target == index {
                *self = FormMode::Add;
            } else if target > index {
                *self = FormMode::Edit { target: target - 1 };
            }
        }
    }
}
