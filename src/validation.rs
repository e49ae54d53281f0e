use crate::{CanvasIndex, CanvasStore, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,    // harmless, resolved by consumers
    Warning, // repaired at the checkpoint
    Error,   // the canvas must not adopt this list
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected_ids: Vec<ItemId>,
    pub issue_type: ValidationIssueType,
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    DuplicateId,
    EmptySection,
    StaleBackReference,
    StaleSelection,
    StaleInsertPosition,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.of_severity(ValidationSeverity::Error)
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.of_severity(ValidationSeverity::Warning)
    }

    pub fn info(&self) -> Vec<&ValidationIssue> {
        self.of_severity(ValidationSeverity::Info)
    }

    fn of_severity(&self, severity: ValidationSeverity) -> Vec<&ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    /// Passed if nothing is severe enough to block adoption
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// One line per issue, for logs
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Structural checks over a canvas item list
pub struct Validator;

impl Validator {
    /// Check a top-level list against the canvas invariants
    pub fn validate_items(items: &[Item]) -> ValidationResult {
        let mut result = ValidationResult::new();
        let index = CanvasIndex::build(items);

        if !index.duplicates().is_empty() {
            let mut duplicates = index.duplicates().to_vec();
            duplicates.sort();
            duplicates.dedup();
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Error,
                message: format!("{} id(s) occur more than once", duplicates.len()),
                affected_ids: duplicates,
                issue_type: ValidationIssueType::DuplicateId,
            });
        }

        for item in items {
            match item {
                Item::Section(section) => {
                    if section.areas.is_empty() {
                        result.add_issue(ValidationIssue {
                            severity: ValidationSeverity::Error,
                            message: format!("Section {} has no areas", section.id),
                            affected_ids: vec![section.id],
                            issue_type: ValidationIssueType::EmptySection,
                        });
                    }

                    let stale: Vec<ItemId> = section
                        .widgets()
                        .filter(|w| w.section_id != Some(section.id))
                        .map(|w| w.id)
                        .collect();
                    if !stale.is_empty() {
                        result.add_issue(Self::stale_back_reference(stale));
                    }
                }
                Item::Widget(widget) => {
                    if widget.section_id.is_some() {
                        result.add_issue(Self::stale_back_reference(vec![widget.id]));
                    }
                }
            }
        }

        result
    }

    fn stale_back_reference(ids: Vec<ItemId>) -> ValidationIssue {
        ValidationIssue {
            severity: ValidationSeverity::Warning,
            message: format!("{} widget(s) name the wrong owning section", ids.len()),
            affected_ids: ids,
            issue_type: ValidationIssueType::StaleBackReference,
        }
    }

    /// Items plus the transient UI state that refers into them
    pub fn validate_store(store: &CanvasStore) -> ValidationResult {
        let mut result = Self::validate_items(store.items());

        if let Some(selected) = store.selected_widget() {
            if store.locate(selected).is_none() {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    message: format!("Selection {} no longer exists", selected),
                    affected_ids: vec![selected],
                    issue_type: ValidationIssueType::StaleSelection,
                });
            }
        }

        if let Some(position) = store.insert_position() {
            if store.locate(position.relative_to).is_none() {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    message: format!(
                        "Insert position refers to missing item {}; new sections will be appended",
                        position.relative_to
                    ),
                    affected_ids: vec![position.relative_to],
                    issue_type: ValidationIssueType::StaleInsertPosition,
                });
            }
        }

        result
    }
}

/// Extension trait for the store to add validation
pub trait ValidatedCanvas {
    fn validate(&self) -> ValidationResult;

    /// Highest severity reported per id
    fn ids_with_issues(&self, result: &ValidationResult) -> HashMap<ItemId, ValidationSeverity>;
}

impl ValidatedCanvas for CanvasStore {
    fn validate(&self) -> ValidationResult {
        Validator::validate_store(self)
    }

    fn ids_with_issues(&self, result: &ValidationResult) -> HashMap<ItemId, ValidationSeverity> {
        let mut ids = HashMap::new();

        for issue in &result.issues {
            for id in &issue.affected_ids {
                ids.entry(*id)
                    .and_modify(|severity| {
                        if issue.severity > *severity {
                            *severity = issue.severity;
                        }
                    })
                    .or_insert(issue.severity);
            }
        }

        ids
    }
}
