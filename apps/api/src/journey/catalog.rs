//! Curriculum Catalog: the immutable, ordered 30-day task list.
//!
//! The builtin curriculum ships embedded in the binary and is validated once
//! at startup. Categories are a closed enum, so an unknown category in the
//! data fails construction instead of leaking into the state machine.

use serde::{Deserialize, Serialize};

use crate::journey::error::JourneyError;

/// Number of days in the builtin curriculum.
pub const JOURNEY_DAYS: u32 = 30;

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/soft_skills_journey.json");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Communication,
    Leadership,
    EmotionalIntelligence,
    Productivity,
    Career,
}

impl Category {
    /// Display label used by the product UI.
    pub fn label(self) -> &'static str {
        match self {
            Category::Communication => "Comunicação",
            Category::Leadership => "Liderança",
            Category::EmotionalIntelligence => "Inteligência Emocional",
            Category::Productivity => "Produtividade",
            Category::Career => "Carreira",
        }
    }
}

/// One day of the curriculum. Content fields are opaque to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDefinition {
    pub day: u32,
    pub category: Category,
    pub title: String,
    pub action: String,
    pub why_it_matters: String,
    pub reading: String,
    pub reflection: String,
    pub xp_reward: u32,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    tasks: Vec<TaskDefinition>,
}

impl Catalog {
    /// Parses and validates the embedded curriculum.
    pub fn builtin() -> Result<Self, JourneyError> {
        let catalog = Self::from_json(BUILTIN_CATALOG_JSON)?;
        if catalog.len() != JOURNEY_DAYS {
            return Err(JourneyError::InvalidCatalog(format!(
                "expected {JOURNEY_DAYS} days, found {}",
                catalog.len()
            )));
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, JourneyError> {
        let tasks: Vec<TaskDefinition> = serde_json::from_str(json)
            .map_err(|e| JourneyError::InvalidCatalog(e.to_string()))?;
        Self::from_tasks(tasks)
    }

    /// Validates a task list: days must be exactly 1..=N in order, every reward positive.
    pub fn from_tasks(tasks: Vec<TaskDefinition>) -> Result<Self, JourneyError> {
        if tasks.is_empty() {
            return Err(JourneyError::InvalidCatalog("catalog is empty".to_string()));
        }
        for (index, task) in tasks.iter().enumerate() {
            let expected = index as u32 + 1;
            if task.day != expected {
                return Err(JourneyError::InvalidCatalog(format!(
                    "expected day {expected} at position {index}, found day {}",
                    task.day
                )));
            }
            if task.xp_reward == 0 {
                return Err(JourneyError::InvalidCatalog(format!(
                    "day {} has a zero xp reward",
                    task.day
                )));
            }
        }
        Ok(Self { tasks })
    }

    /// All tasks ordered by day ascending.
    pub fn all_tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn get_task(&self, day: u32) -> Result<&TaskDefinition, JourneyError> {
        if day == 0 {
            return Err(JourneyError::NotFound(day));
        }
        self.tasks
            .get(day as usize - 1)
            .ok_or(JourneyError::NotFound(day))
    }

    pub fn len(&self) -> u32 {
        self.tasks.len() as u32
    }

    pub fn total_xp(&self) -> u32 {
        self.tasks.iter().map(|t| t.xp_reward).sum()
    }
}

#[cfg(test)]
pub(crate) fn test_task(day: u32, xp_reward: u32) -> TaskDefinition {
    TaskDefinition {
        day,
        category: Category::Communication,
        title: format!("Day {day}"),
        action: "Act".to_string(),
        why_it_matters: "Because".to_string(),
        reading: "A book".to_string(),
        reflection: "How did it go?".to_string(),
        xp_reward,
    }
}
