/*
[INPUT]:  Task descriptions supplied by the owning view
[OUTPUT]: Completion tracking that gates the "finish job" transition
[POS]:    Wizard sub-component - checklist embedded in field values
[UPDATE]: When task shape or completion rules change
*/

use serde::{Deserialize, Serialize};

use crate::error::ChecklistError;

pub type TaskId = u32;

/// A single checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistTask {
    pub id: TaskId,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Ordered set of tasks, each independently markable complete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChecklist {
    tasks: Vec<ChecklistTask>,
}

impl TaskChecklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a checklist with ids assigned from 1 in iteration order
    pub fn from_descriptions<I, T>(descriptions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut checklist = Self::new();
        for description in descriptions {
            checklist.push(description);
        }
        checklist
    }

    /// Append a pending task and return its id
    pub fn push(&mut self, description: impl Into<String>) -> TaskId {
        let id = self.next_id();
        self.tasks.push(ChecklistTask {
            id,
            description: description.into(),
            completed: false,
        });
        id
    }

    /// One past the highest id, or the lowest free id once the top is taken
    fn next_id(&self) -> TaskId {
        let highest = self.tasks.iter().map(|task| task.id).max().unwrap_or(0);
        highest.checked_add(1).unwrap_or_else(|| {
            (1..TaskId::MAX)
                .find(|id| self.tasks.iter().all(|task| task.id != *id))
                .unwrap_or(TaskId::MAX)
        })
    }

    /// Flip a task's completion flag, returning the new value
    pub fn toggle(&mut self, id: TaskId) -> Result<bool, ChecklistError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(ChecklistError::UnknownTask { id })?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    /// True iff the set is non-empty and every task is completed
    pub fn is_complete(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.completed)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whole-number completion percentage, rounded down; 0 for an empty list
    pub fn percent_complete(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        ((self.completed_count() * 100) / self.total()) as u8
    }

    pub fn tasks(&self) -> &[ChecklistTask] {
        &self.tasks
    }

    pub fn pending(&self) -> impl Iterator<Item = &ChecklistTask> {
        self.tasks.iter().filter(|task| !task.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_checklist_is_never_complete() {
        let checklist = TaskChecklist::new();
        assert!(!checklist.is_complete());
        assert_eq!(checklist.percent_complete(), 0);
    }

    #[test]
    fn test_push_after_highest_id_reuses_free_ids() {
        let mut checklist = TaskChecklist {
            tasks: vec![ChecklistTask {
                id: TaskId::MAX,
                description: "Windows".to_string(),
                completed: false,
            }],
        };
        assert_eq!(checklist.push("Dust shelves"), 1);
        assert_eq!(checklist.push("Empty bins"), 2);
        assert_eq!(checklist.total(), 3);
        assert_eq!(checklist.toggle(TaskId::MAX), Ok(true));
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut checklist = TaskChecklist::from_descriptions(["Vacuum", "Mop"]);
        let before = checklist.clone();

        assert_eq!(checklist.toggle(1), Ok(true));
        assert_eq!(checklist.toggle(1), Ok(false));
        assert_eq!(checklist, before);
    }

    #[test]
    fn test_complete_only_when_all_done() {
        let mut checklist = TaskChecklist::from_descriptions(["Vacuum", "Mop", "Dust"]);
        checklist.toggle(1).unwrap();
        checklist.toggle(2).unwrap();
        assert!(!checklist.is_complete());
        assert_eq!(checklist.percent_complete(), 66);

        checklist.toggle(3).unwrap();
        assert!(checklist.is_complete());
        assert_eq!(checklist.percent_complete(), 100);
        assert_eq!(checklist.pending().count(), 0);
    }

    #[test]
    fn test_unknown_task() {
        let mut checklist = TaskChecklist::from_descriptions(["Vacuum"]);
        assert_eq!(
            checklist.toggle(9),
            Err(ChecklistError::UnknownTask { id: 9 })
        );
    }

    #[test]
    fn test_push_assigns_next_id() {
        let mut checklist = TaskChecklist::from_descriptions(["Vacuum", "Mop"]);
        assert_eq!(checklist.push("Windows"), 3);
        assert_eq!(checklist.total(), 3);
    }
}
