//! Create / edit form state for directory fields.

use thiserror::Error;

use admissions_core::AppError;
use admissions_core::types::FieldId;
use admissions_entity::field::validation::{
    sanitize_field_name, validate_default_value, validate_display_name, validate_field_name,
};
use admissions_entity::field::{
    CreateFieldDto, DirectoryField, FieldStats, FieldType, UpdateFieldDto,
};

use super::lock::{EditLock, LockReason};

/// A submission the form refuses to send.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldFormError {
    /// The system name is missing or malformed.
    #[error("{0}")]
    Name(&'static str),
    /// The display name is missing or too short.
    #[error("{0}")]
    DisplayName(&'static str),
    /// The default value does not fit the selected type.
    #[error("{0}")]
    DefaultValue(&'static str),
    /// The edit form matches the stored field.
    #[error("No changes to save")]
    NoChanges,
    /// The control is locked.
    #[error("{0}")]
    Locked(LockReason),
    /// A required flag cannot be cleared on a unique or boolean field.
    #[error("Unique and boolean fields are always required")]
    RequiredForced,
    /// The required flag of a system field is fixed.
    #[error("Required flag of a system field cannot be changed")]
    SystemRequired,
    /// No field is selected for editing.
    #[error("No field is selected")]
    NoSelection,
}

impl From<FieldFormError> for AppError {
    fn from(err: FieldFormError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Which form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Creating a new field.
    Create,
    /// Editing the selected field.
    Edit(FieldId),
}

/// Usage statistics of the selected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsState {
    /// No field selected.
    Idle,
    /// Request in progress.
    Loading(FieldId),
    /// Statistics for the field.
    Loaded(FieldId, FieldStats),
    /// Statistics could not be fetched.
    Failed(FieldId),
}

/// Editable copy of a field's attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDraft {
    /// System name, already sanitized.
    pub name: String,
    /// Label.
    pub display_name: String,
    /// Value type.
    pub field_type: FieldType,
    /// Required flag.
    pub is_required: bool,
    /// Unique flag.
    pub is_unique: bool,
    /// Whether the default value control is on.
    pub has_default: bool,
    /// Default value text.
    pub default_value: String,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: String::new(),
            field_type: FieldType::String,
            is_required: false,
            is_unique: false,
            has_default: false,
            default_value: String::new(),
        }
    }
}

impl FieldDraft {
    /// Draft initialised from a stored field.
    pub fn from_field(field: &DirectoryField) -> Self {
        Self {
            name: field.name.clone(),
            display_name: field.display_name.clone(),
            field_type: field.field_type,
            is_required: field.is_required,
            is_unique: field.is_unique,
            has_default: field.has_default_value(),
            default_value: field.default_value.clone().unwrap_or_default(),
        }
    }

    /// The default value that would be stored: `None` when the toggle is
    /// off or the text is blank.
    pub fn resolved_default(&self) -> Option<String> {
        if !self.has_default {
            return None;
        }
        let trimmed = self.default_value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Check the draft before submission.
    pub fn validate(&self) -> Result<(), FieldFormError> {
        if let Some(message) = validate_field_name(&self.name) {
            return Err(FieldFormError::Name(message));
        }
        if let Some(message) = validate_display_name(&self.display_name) {
            return Err(FieldFormError::DisplayName(message));
        }
        if self.has_default {
            if let Some(message) = validate_default_value(self.field_type, &self.default_value) {
                return Err(FieldFormError::DefaultValue(message));
            }
        }
        Ok(())
    }

    fn set_has_default(&mut self, on: bool) {
        self.has_default = on;
        if !on {
            self.default_value.clear();
        }
    }

    fn force_boolean_rules(&mut self) {
        self.is_required = true;
        self.is_unique = false;
    }
}

/// State machine behind the field dialog.
#[derive(Debug, Clone)]
pub struct FieldEditor {
    /// Current mode.
    mode: EditorMode,
    /// Draft of the create form.
    create_draft: FieldDraft,
    /// Stored version of the selected field.
    original: Option<DirectoryField>,
    /// Draft of the edit form.
    edit_draft: Option<FieldDraft>,
    /// Statistics of the selected field.
    stats: StatsState,
}

impl Default for FieldEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldEditor {
    /// A fresh editor in create mode.
    pub fn new() -> Self {
        Self {
            mode: EditorMode::Create,
            create_draft: FieldDraft::default(),
            original: None,
            edit_draft: None,
            stats: StatsState::Idle,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// The selected field, in edit mode.
    pub fn selected(&self) -> Option<&DirectoryField> {
        self.original.as_ref()
    }

    /// Statistics of the selected field.
    pub fn stats(&self) -> StatsState {
        self.stats
    }

    /// Draft of the visible form.
    pub fn draft(&self) -> &FieldDraft {
        match (&self.mode, &self.edit_draft) {
            (EditorMode::Edit(_), Some(draft)) => draft,
            _ => &self.create_draft,
        }
    }

    fn draft_mut(&mut self) -> &mut FieldDraft {
        match (&self.mode, &mut self.edit_draft) {
            (EditorMode::Edit(_), Some(draft)) => draft,
            _ => &mut self.create_draft,
        }
    }

    /// Open a field for editing. Statistics start loading.
    pub fn select_field(&mut self, field: &DirectoryField) {
        self.mode = EditorMode::Edit(field.id);
        self.edit_draft = Some(FieldDraft::from_field(field));
        self.original = Some(field.clone());
        self.stats = StatsState::Loading(field.id);
    }

    /// Switch to the create form.
    pub fn start_create(&mut self) {
        self.mode = EditorMode::Create;
        self.original = None;
        self.edit_draft = None;
        self.stats = StatsState::Idle;
    }

    /// Close the dialog and forget everything.
    pub fn close(&mut self) {
        self.start_create();
        self.reset_create_draft();
    }

    /// Clear the create form.
    pub fn reset_create_draft(&mut self) {
        self.create_draft = FieldDraft::default();
    }

    /// Record statistics for `field_id`. Ignored unless that field is still
    /// selected; returns whether they were applied.
    pub fn apply_stats(&mut self, field_id: FieldId, stats: Option<FieldStats>) -> bool {
        if self.mode != EditorMode::Edit(field_id) {
            return false;
        }
        self.stats = match stats {
            Some(stats) => StatsState::Loaded(field_id, stats),
            None => StatsState::Failed(field_id),
        };
        true
    }

    /// Lock state of the visible form.
    pub fn lock(&self) -> EditLock {
        let EditorMode::Edit(_) = self.mode else {
            return EditLock::unlocked();
        };
        match (self.stats, &self.original) {
            (StatsState::Loaded(_, stats), Some(field)) => EditLock::from_stats(field, &stats),
            (StatsState::Failed(_), _) => EditLock::unavailable(),
            _ => EditLock::loading(),
        }
    }

    /// Set the system name, dropping characters it may not contain.
    pub fn set_name(&mut self, input: &str) {
        self.draft_mut().name = sanitize_field_name(input);
    }

    /// Set the display name.
    pub fn set_display_name(&mut self, input: &str) {
        self.draft_mut().display_name = input.to_string();
    }

    /// Choose the value type.
    ///
    /// In the create form this resets the flags and the default toggle;
    /// BOOLEAN then forces required, not unique, and a default.
    pub fn set_type(&mut self, field_type: FieldType) -> Result<(), FieldFormError> {
        if let Some(reason) = self.lock().field_type {
            return Err(FieldFormError::Locked(reason));
        }

        let creating = self.mode == EditorMode::Create;
        let draft = self.draft_mut();
        draft.field_type = field_type;
        if creating {
            draft.is_required = false;
            draft.is_unique = false;
            draft.set_has_default(false);
        }
        if field_type == FieldType::Boolean {
            draft.force_boolean_rules();
            if creating {
                draft.has_default = true;
            }
        }
        Ok(())
    }

    /// Set the required flag. It cannot be cleared on a unique or boolean
    /// field, and it cannot be changed at all on a system field.
    pub fn set_required(&mut self, required: bool) -> Result<(), FieldFormError> {
        if matches!(self.mode, EditorMode::Edit(_)) && self.selected().is_some_and(|f| f.is_system)
        {
            return Err(FieldFormError::SystemRequired);
        }
        let draft = self.draft_mut();
        if !required && (draft.is_unique || draft.field_type == FieldType::Boolean) {
            return Err(FieldFormError::RequiredForced);
        }
        draft.is_required = required;
        Ok(())
    }

    /// Set the unique flag; unique implies required.
    pub fn set_unique(&mut self, unique: bool) -> Result<(), FieldFormError> {
        if let Some(reason) = self.lock().unique {
            return Err(FieldFormError::Locked(reason));
        }
        let draft = self.draft_mut();
        if unique && draft.field_type == FieldType::Boolean {
            return Ok(());
        }
        draft.is_unique = unique;
        if unique {
            draft.is_required = true;
        }
        Ok(())
    }

    /// Toggle the default value control. Turning it off clears the value.
    pub fn set_has_default(&mut self, on: bool) {
        self.draft_mut().set_has_default(on);
    }

    /// Set the default value text and switch the toggle on.
    pub fn set_default_value(&mut self, value: &str) {
        let draft = self.draft_mut();
        draft.has_default = true;
        draft.default_value = value.to_string();
    }

    /// Body of the create request, once the create draft passes validation.
    pub fn build_create_request(&self) -> Result<CreateFieldDto, FieldFormError> {
        let draft = &self.create_draft;
        draft.validate()?;

        Ok(CreateFieldDto {
            name: draft.name.clone(),
            display_name: draft.display_name.trim().to_string(),
            field_type: draft.field_type,
            is_required: draft.is_required || draft.is_unique,
            is_unique: draft.is_unique,
            default_value: draft.resolved_default(),
            is_system: false,
        })
    }

    /// Minimal update body for the selected field.
    pub fn build_update_request(&self) -> Result<(FieldId, UpdateFieldDto), FieldFormError> {
        let (Some(original), Some(draft)) = (&self.original, &self.edit_draft) else {
            return Err(FieldFormError::NoSelection);
        };
        draft.validate()?;

        let display_name = draft.display_name.trim();
        let mut dto = UpdateFieldDto::default();
        if draft.name != original.name {
            dto.name = Some(draft.name.clone());
        }
        if display_name != original.display_name {
            dto.display_name = Some(display_name.to_string());
        }
        if draft.field_type != original.field_type {
            dto.field_type = Some(draft.field_type);
        }
        if draft.is_required != original.is_required {
            dto.is_required = Some(draft.is_required);
        }
        if draft.is_unique != original.is_unique {
            dto.is_unique = Some(draft.is_unique);
        }

        let resolved = draft.resolved_default();
        let stored = original.default_value.clone().filter(|v| !v.is_empty());
        if resolved != stored {
            dto.default_value = Some(resolved);
        }

        if dto.is_empty() {
            return Err(FieldFormError::NoChanges);
        }
        Ok((original.id, dto))
    }
}
