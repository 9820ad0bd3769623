use crate::io::storage::Storage;
use crate::model::item::Item;
use crate::model::session::FormMode;
use crate::ops::filter;
use crate::ops::list_store::{ListError, ListStore, LoadWarning};

/// Everything a user can do to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Form submitted: add in Add-Mode, rename the target in Edit-Mode
    Submit(String),
    /// Edit affordance on the item at this position
    EditActivate(usize),
    /// Leave Edit-Mode without renaming
    CancelEdit,
    /// Remove affordance on the item at this position; needs confirmation
    RemoveActivate(usize),
    ConfirmRemove,
    CancelRemove,
    FilterChange(String),
    ClearActivate,
}

/// A recoverable input problem shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    EmptyInput,
    DuplicateItem,
}

impl Warning {
    pub fn message(self) -> &'static str {
        match self {
            Warning::EmptyInput => "Please enter a value",
            Warning::DuplicateItem => "This item is already in your list.",
        }
    }
}

/// What handling an intent did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Item),
    Renamed { index: usize, item: Item },
    /// Edit-Mode entered; `text` goes into the input field
    EditStarted { index: usize, text: String },
    EditCancelled,
    /// Removal is waiting for `ConfirmRemove` or `CancelRemove`
    ConfirmRemoval { index: usize, item: Item },
    Removed { index: usize, item: Item },
    RemovalCancelled,
    FilterChanged,
    Cleared,
    Warned(Warning),
    /// Nothing to do (stale position, no pending removal)
    Ignored,
}

/// Add/Edit form state machine over a [`ListStore`].
///
/// The store is the only source of truth; the filter and the form mode
/// are presentation state and never reach storage.
pub struct Controller<S: Storage> {
    store: ListStore<S>,
    mode: FormMode,
    /// Position and item the user was asked about
    pending_removal: Option<(usize, Item)>,
    filter: String,
}

impl<S: Storage> Controller<S> {
    pub fn new(store: ListStore<S>) -> Self {
        Controller {
            store,
            mode: FormMode::Add,
            pending_removal: None,
            filter: String::new(),
        }
    }

    pub fn store(&self) -> &ListStore<S> {
        &self.store
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn pending_removal(&self) -> Option<usize> {
        self.pending_removal.as_ref().map(|(index, _)| *index)
    }

    /// Positions of the items the filter lets through.
    pub fn visible(&self) -> Vec<usize> {
        filter::visible_indices(self.store.items(), &self.filter)
    }

    pub fn show_clear_button(&self) -> bool {
        self.store.should_show_clear_button()
    }

    /// A problem the store hit reading storage, reported once.
    pub fn take_warning(&mut self) -> Option<LoadWarning> {
        self.store.take_warning()
    }

    /// Handle one intent to completion.
    ///
    /// Input problems come back as [`Outcome::Warned`] and stale positions
    /// as [`Outcome::Ignored`]; only storage failures are errors.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome, ListError> {
        match intent {
            Intent::Submit(text) => self.submit(&text),
            Intent::EditActivate(index) => Ok(self.begin_edit(index)),
            Intent::CancelEdit => {
                if self.mode.is_editing() {
                    self.mode = FormMode::Add;
                    Ok(Outcome::EditCancelled)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            Intent::RemoveActivate(index) => match self.store.get(index) {
                Some(item) => {
                    self.pending_removal = Some((index, item.clone()));
                    Ok(Outcome::ConfirmRemoval {
                        index,
                        item: item.clone(),
                    })
                }
                None => Ok(Outcome::Ignored),
            },
            Intent::ConfirmRemove => self.confirm_remove(),
            Intent::CancelRemove => Ok(match self.pending_removal.take() {
                Some(_) => Outcome::RemovalCancelled,
                None => Outcome::Ignored,
            }),
            Intent::FilterChange(text) => {
                self.filter = text;
                Ok(Outcome::FilterChanged)
            }
            Intent::ClearActivate => {
                self.store.clear()?;
                self.mode = FormMode::Add;
                self.pending_removal = None;
                Ok(Outcome::Cleared)
            }
        }
    }

    fn submit(&mut self, text: &str) -> Result<Outcome, ListError> {
        let result = match self.mode {
            FormMode::Add => self.store.add(text).map(Outcome::Added),
            FormMode::Edit { target } => self
                .store
                .rename(target, text)
                .map(|item| Outcome::Renamed {
                    index: target,
                    item,
                }),
        };
        match result {
            Ok(outcome) => {
                self.mode = FormMode::Add;
                Ok(outcome)
            }
            Err(ListError::EmptyInput) => Ok(Outcome::Warned(Warning::EmptyInput)),
            Err(ListError::DuplicateItem(_)) => Ok(Outcome::Warned(Warning::DuplicateItem)),
            Err(ListError::NotFound(index)) => {
                tracing::debug!(index, "edit target vanished, leaving edit mode");
                self.mode = FormMode::Add;
                Ok(Outcome::Ignored)
            }
            Err(e) => Err(e),
        }
    }

    fn begin_edit(&mut self, index: usize) -> Outcome {
        match self.store.get(index) {
            Some(item) => {
                self.mode = FormMode::Edit { target: index };
                Outcome::EditStarted {
                    index,
                    text: item.as_str().to_string(),
                }
            }
            None => Outcome::Ignored,
        }
    }

    fn confirm_remove(&mut self) -> Result<Outcome, ListError> {
        let Some((index, expected)) = self.pending_removal.take() else {
            return Ok(Outcome::Ignored);
        };
        match self.store.remove_checked(index, &expected) {
            Ok(item) => {
                self.mode.item_removed(index);
                Ok(Outcome::Removed { index, item })
            }
            Err(ListError::NotFound(_)) => Ok(Outcome::Ignored),
            Err(e) => Err(e),
        }
    }
}
