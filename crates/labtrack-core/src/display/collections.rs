//! Collection wrapper types for displaying groups of domain objects.

use std::{fmt, ops::Index};

use crate::{
    models::{Case, Technician, WorkstationStep, WorkstationType},
    tracker::TrackerRow,
};

/// Newtype wrapper for displaying the steps of a case.
///
/// # Examples
///
/// ```rust
/// use labtrack_core::display::Steps;
///
/// let steps = Steps(vec![]);
/// assert_eq!(steps.to_string(), "No steps recorded.\n");
/// ```
pub struct Steps(pub Vec<WorkstationStep>);

impl Steps {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, index: usize) -> Option<&WorkstationStep> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WorkstationStep> {
        self.0.iter()
    }
}

impl Index<usize> for Steps {
    type Output = WorkstationStep;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a Steps {
    type Item = &'a WorkstationStep;
    type IntoIter = std::slice::Iter<'a, WorkstationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps recorded.");
        }
        for step in &self.0 {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a lab's cases as a list.
pub struct Cases(pub Vec<Case>);

impl fmt::Display for Cases {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No cases found.");
        }
        for case in &self.0 {
            writeln!(f, "- **{}** (ID: {})", case.case_number, case.id)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying the technician catalog.
pub struct Technicians(pub Vec<Technician>);

impl fmt::Display for Technicians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No technicians found.");
        }
        self.0.iter().try_for_each(|t| write!(f, "{t}"))
    }
}

/// Newtype wrapper for displaying the workstation type catalog.
pub struct WorkstationTypes(pub Vec<WorkstationType>);

impl fmt::Display for WorkstationTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No workstation types found.");
        }
        self.0.iter().try_for_each(|t| write!(f, "{t}"))
    }
}

/// Tracker rows: persisted steps with the edit focus marked, then the
/// creation draft.
pub struct Rows<'a>(pub Vec<TrackerRow<'a>>);

impl fmt::Display for Rows<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No steps recorded.");
        }
        self.0.iter().try_for_each(|row| write!(f, "{row}"))
    }
}
