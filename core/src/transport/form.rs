//! Job submission payload.

use std::path::{Path, PathBuf};

use crate::error::StartError;

/// A file attached to the submission under a form field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileField {
    /// Form field name.
    pub name: String,
    /// Local file to upload.
    pub path: PathBuf,
}

/// Text fields and file attachments submitted to start a job.
///
/// The server owns the meaning of the fields; the client only checks that
/// the payload is well formed before sending it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobForm {
    fields: Vec<(String, String)>,
    files: Vec<FileField>,
}

impl JobForm {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a text field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Adds a file attachment.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.push(FileField {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// Adds an entry written as `name=value`, or `@name=path` for a file.
    ///
    /// # Errors
    /// Returns `StartError::Validation` if the entry has no `=` or no name.
    pub fn push_assignment(&mut self, entry: &str) -> Result<(), StartError> {
        let (name, value) = entry
            .split_once('=')
            .ok_or_else(|| StartError::Validation(format!("expected name=value, got `{entry}`")))?;

        match name.strip_prefix('@') {
            Some(file_name) => {
                check_name(file_name)?;
                self.files.push(FileField {
                    name: file_name.to_string(),
                    path: PathBuf::from(value),
                });
            }
            None => {
                check_name(name)?;
                self.fields.push((name.to_string(), value.to_string()));
            }
        }
        Ok(())
    }

    /// Text fields in insertion order.
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// File attachments in insertion order.
    #[must_use]
    pub fn files(&self) -> &[FileField] {
        &self.files
    }

    /// Looks up the first text field with this name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if nothing would be submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Checks the payload before any network call.
    ///
    /// # Errors
    /// Returns `StartError::Validation` for an empty form, a blank field
    /// name, or an attachment that is not a readable file.
    pub fn validate(&self) -> Result<(), StartError> {
        if self.is_empty() {
            return Err(StartError::Validation("form has no fields".into()));
        }
        for (name, _) in &self.fields {
            check_name(name)?;
        }
        for file in &self.files {
            check_name(&file.name)?;
            check_file(&file.path)?;
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<(), StartError> {
    if name.trim().is_empty() {
        return Err(StartError::Validation("form field name is empty".into()));
    }
    Ok(())
}

fn check_file(path: &Path) -> Result<(), StartError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StartError::Validation(format!(
            "attachment {} is not a readable file",
            path.display()
        )))
    }
}
