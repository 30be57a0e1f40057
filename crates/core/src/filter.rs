// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The dependent filter cascade.
//!
//! Filters form a fixed hierarchy: cycle > bimester > grade > section > week.
//! Writing any level clears every level below it, so a selected child can
//! never outlive the parent it was chosen under.

use crate::error::CoreError;
use campus_domain::{BimesterId, CycleId, GradeId, SectionId, WeekId};

/// A level of the filter hierarchy, ordered root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterLevel {
    /// Academic cycle (root).
    Cycle,
    /// Bimester within the cycle.
    Bimester,
    /// Grade offered in the bimester.
    Grade,
    /// Section of the grade.
    Section,
    /// Optional week filter (leaf).
    Week,
}

impl FilterLevel {
    /// Every level, root first.
    pub const ALL: [Self; 5] = [
        Self::Cycle,
        Self::Bimester,
        Self::Grade,
        Self::Section,
        Self::Week,
    ];

    /// Returns the level name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cycle => "cycle",
            Self::Bimester => "bimester",
            Self::Grade => "grade",
            Self::Section => "section",
            Self::Week => "week",
        }
    }

    /// Returns the level directly above this one.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Cycle => None,
            Self::Bimester => Some(Self::Cycle),
            Self::Grade => Some(Self::Bimester),
            Self::Section => Some(Self::Grade),
            Self::Week => Some(Self::Section),
        }
    }

    /// Returns every level strictly below this one.
    #[must_use]
    pub fn descendants(self) -> &'static [Self] {
        let index: usize = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        &Self::ALL[index + 1..]
    }
}

impl std::fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values to seed a filter state with.
///
/// Values below the first unset level are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitialFilters {
    /// Initial cycle.
    pub cycle: Option<CycleId>,
    /// Initial bimester.
    pub bimester: Option<BimesterId>,
    /// Initial grade.
    pub grade: Option<GradeId>,
    /// Initial section.
    pub section: Option<SectionId>,
    /// Initial week.
    pub week: Option<WeekId>,
}

/// The current selection at every level of the cascade.
///
/// Invariant: a level is only set when every level above it is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    cycle: Option<CycleId>,
    bimester: Option<BimesterId>,
    grade: Option<GradeId>,
    section: Option<SectionId>,
    week: Option<WeekId>,
}

impl FilterState {
    /// Creates an empty filter state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cycle: None,
            bimester: None,
            grade: None,
            section: None,
            week: None,
        }
    }

    /// Creates a filter state from initial values, truncating at the first
    /// unset level so the ancestry invariant holds.
    #[must_use]
    pub const fn from_initial(initial: InitialFilters) -> Self {
        let mut state: Self = Self::new();
        let Some(cycle) = initial.cycle else {
            return state;
        };
        state.cycle = Some(cycle);
        let Some(bimester) = initial.bimester else {
            return state;
        };
        state.bimester = Some(bimester);
        let Some(grade) = initial.grade else {
            return state;
        };
        state.grade = Some(grade);
        let Some(section) = initial.section else {
            return state;
        };
        state.section = Some(section);
        state.week = initial.week;
        state
    }

    /// The selected cycle.
    #[must_use]
    pub const fn cycle(&self) -> Option<CycleId> {
        self.cycle
    }

    /// The selected bimester.
    #[must_use]
    pub const fn bimester(&self) -> Option<BimesterId> {
        self.bimester
    }

    /// The selected grade.
    #[must_use]
    pub const fn grade(&self) -> Option<GradeId> {
        self.grade
    }

    /// The selected section.
    #[must_use]
    pub const fn section(&self) -> Option<SectionId> {
        self.section
    }

    /// The selected week.
    #[must_use]
    pub const fn week(&self) -> Option<WeekId> {
        self.week
    }

    /// Returns whether a level currently holds a value.
    #[must_use]
    pub const fn is_set(&self, level: FilterLevel) -> bool {
        match level {
            FilterLevel::Cycle => self.cycle.is_some(),
            FilterLevel::Bimester => self.bimester.is_some(),
            FilterLevel::Grade => self.grade.is_some(),
            FilterLevel::Section => self.section.is_some(),
            FilterLevel::Week => self.week.is_some(),
        }
    }

    /// Selects a cycle, clearing every level below it.
    pub const fn set_cycle(&mut self, cycle: Option<CycleId>) {
        self.cycle = cycle;
        self.clear_below(FilterLevel::Cycle);
    }

    /// Selects a bimester, clearing every level below it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAncestor` when selecting a bimester
    /// while no cycle is selected. The state is left unchanged.
    pub fn set_bimester(&mut self, bimester: Option<BimesterId>) -> Result<(), CoreError> {
        self.require_ancestors(FilterLevel::Bimester, bimester.is_some())?;
        self.bimester = bimester;
        self.clear_below(FilterLevel::Bimester);
        Ok(())
    }

    /// Selects a grade, clearing every level below it.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAncestor` when selecting a grade while
    /// the cycle or bimester is unset. The state is left unchanged.
    pub fn set_grade(&mut self, grade: Option<GradeId>) -> Result<(), CoreError> {
        self.require_ancestors(FilterLevel::Grade, grade.is_some())?;
        self.grade = grade;
        self.clear_below(FilterLevel::Grade);
        Ok(())
    }

    /// Selects a section, clearing the week.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAncestor` when selecting a section while
    /// any level above it is unset. The state is left unchanged.
    pub fn set_section(&mut self, section: Option<SectionId>) -> Result<(), CoreError> {
        self.require_ancestors(FilterLevel::Section, section.is_some())?;
        self.section = section;
        self.clear_below(FilterLevel::Section);
        Ok(())
    }

    /// Selects a week.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingAncestor` when selecting a week while
    /// any level above it is unset. The state is left unchanged.
    pub fn set_week(&mut self, week: Option<WeekId>) -> Result<(), CoreError> {
        self.require_ancestors(FilterLevel::Week, week.is_some())?;
        self.week = week;
        Ok(())
    }

    /// Clears every level.
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns whether cycle, bimester, grade, and section are all selected.
    ///
    /// The week is optional: reports can run at section granularity.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.cycle.is_some()
            && self.bimester.is_some()
            && self.grade.is_some()
            && self.section.is_some()
    }

    /// Returns whether cycle and bimester are both selected.
    #[must_use]
    pub const fn has_basic_selection(&self) -> bool {
        self.cycle.is_some() && self.bimester.is_some()
    }

    /// Returns the deepest level that holds a value.
    #[must_use]
    pub fn deepest_level(&self) -> Option<FilterLevel> {
        FilterLevel::ALL
            .iter()
            .rev()
            .copied()
            .find(|level| self.is_set(*level))
    }

    const fn clear_below(&mut self, level: FilterLevel) {
        match level {
            FilterLevel::Cycle => {
                self.bimester = None;
                self.grade = None;
                self.section = None;
                self.week = None;
            }
            FilterLevel::Bimester => {
                self.grade = None;
                self.section = None;
                self.week = None;
            }
            FilterLevel::Grade => {
                self.section = None;
                self.week = None;
            }
            FilterLevel::Section => self.week = None,
            FilterLevel::Week => {}
        }
    }

    fn require_ancestors(&self, level: FilterLevel, setting: bool) -> Result<(), CoreError> {
        if !setting {
            return Ok(());
        }
        let mut ancestor: Option<FilterLevel> = level.parent();
        let mut first_missing: Option<FilterLevel> = None;
        while let Some(current) = ancestor {
            if !self.is_set(current) {
                first_missing = Some(current);
            }
            ancestor = current.parent();
        }
        match first_missing {
            Some(missing) => Err(CoreError::MissingAncestor { level, missing }),
            None => Ok(()),
        }
    }
}
