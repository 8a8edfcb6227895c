//! Places server-side field errors next to the matching form inputs.

use crate::client::FieldError;
use tracing::debug;

pub const INVALID_CLASS: &str = "is-invalid";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormInput {
    pub name: Option<String>,
    pub id: Option<String>,
    pub invalid: bool,
    /// Feedback text shown under the input.
    pub feedback: Option<String>,
}

impl FormInput {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Inputs of one form container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormErrors {
    container_id: String,
    inputs: Vec<FormInput>,
}

impl FormErrors {
    #[must_use]
    pub fn new(container_id: impl Into<String>, inputs: Vec<FormInput>) -> Self {
        Self {
            container_id: container_id.into(),
            inputs,
        }
    }

    #[must_use]
    pub fn inputs(&self) -> &[FormInput] {
        &self.inputs
    }

    /// Finds the input for `field`: by name, then by id, then by
    /// `<prefix>-<field>` where the prefix is the container id up to its
    /// first `-` (`register-form` looks for `register-username`).
    #[must_use]
    pub fn resolve(&self, field: &str) -> Option<usize> {
        let by_name = || {
            self.inputs
                .iter()
                .position(|input| input.name.as_deref() == Some(field))
        };
        let by_id = |id: &str| {
            self.inputs
                .iter()
                .position(|input| input.id.as_deref() == Some(id))
        };

        by_name().or_else(|| by_id(field)).or_else(|| {
            let (prefix, _) = self.container_id.split_once('-')?;
            by_id(&format!("{prefix}-{field}"))
        })
    }

    /// Clears earlier errors, then marks each resolvable field. Returns how
    /// many errors were placed.
    pub fn show(&mut self, errors: &[FieldError]) -> usize {
        self.clear();

        let mut placed = 0;
        for error in errors {
            if error.field.is_empty() {
                continue;
            }
            let Some(index) = self.resolve(&error.field) else {
                debug!("no input for field error {}", error.field);
                continue;
            };
            if let Some(input) = self.inputs.get_mut(index) {
                input.invalid = true;
                input.feedback = Some(error.message.clone());
                placed += 1;
            }
        }
        placed
    }

    pub fn clear(&mut self) {
        for input in &mut self.inputs {
            input.invalid = false;
            input.feedback = None;
        }
    }
}
