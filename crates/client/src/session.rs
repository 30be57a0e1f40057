// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The filter cascade wired to its option and report loaders.

use crate::loader::{Loadable, Loader};
use crate::reports::AttendanceReportService;
use crate::transport::Transport;
use campus::{CoreError, FilterState, InitialFilters};
use campus_domain::{
    Bimester, BimesterId, CycleId, Grade, GradeId, ReportParams, Section, SectionAttendanceReport,
    SectionId, Week, WeekId,
};
use tracing::debug;

/// Key of the section options: both the grade and the bimester.
pub type SectionOptionsKey = (GradeId, BimesterId);

/// Key of the section report: the section and the report parameters.
pub type ReportKey = (SectionId, ReportParams);

/// Owns a [`FilterState`] and keeps every loader keyed by it.
///
/// After each filter change the loaders are re-keyed from the new state.
/// A loader whose key did not change keeps its data and makes no request.
/// Must be created and mutated inside a tokio runtime.
#[derive(Debug)]
pub struct FilterSession {
    filters: FilterState,
    params: ReportParams,
    bimesters: Loader<CycleId, Vec<Bimester>>,
    grades: Loader<BimesterId, Vec<Grade>>,
    sections: Loader<SectionOptionsKey, Vec<Section>>,
    weeks: Loader<BimesterId, Vec<Week>>,
    report: Loader<ReportKey, SectionAttendanceReport>,
}

impl FilterSession {
    /// Creates a session seeded with initial filter values.
    ///
    /// Initial values are truncated at the first missing level, and the
    /// loaders for the surviving levels start fetching right away.
    #[must_use]
    pub fn new<T: Transport>(service: &AttendanceReportService<T>, initial: InitialFilters) -> Self {
        let svc = service.clone();
        let bimesters = Loader::new("bimesters", move |cycle: CycleId| {
            let svc = svc.clone();
            async move { svc.bimesters(cycle).await }
        });
        let svc = service.clone();
        let grades = Loader::new("grades", move |bimester: BimesterId| {
            let svc = svc.clone();
            async move { svc.grades(bimester).await }
        });
        let svc = service.clone();
        let sections = Loader::new("sections", move |(grade, bimester): SectionOptionsKey| {
            let svc = svc.clone();
            async move { svc.sections(grade, bimester).await }
        });
        let svc = service.clone();
        let weeks = Loader::new("weeks", move |bimester: BimesterId| {
            let svc = svc.clone();
            async move { svc.weeks(bimester).await }
        });
        let svc = service.clone();
        let report = Loader::new("section_report", move |(section, params): ReportKey| {
            let svc = svc.clone();
            async move { svc.section_report(section, &params).await }
        });

        let session: Self = Self {
            filters: FilterState::from_initial(initial),
            params: ReportParams::default(),
            bimesters,
            grades,
            sections,
            weeks,
            report,
        };
        session.sync();
        session
    }

    fn sync(&self) {
        let filters: &FilterState = &self.filters;
        debug!(filters = ?filters, "Re-keying loaders");
        self.bimesters.set_key(filters.cycle());
        self.grades.set_key(filters.bimester());
        self.sections
            .set_key(filters.grade().zip(filters.bimester()));
        self.weeks.set_key(filters.bimester());
        self.report.set_key(
            filters
                .section()
                .map(|section| (section, self.params.clone().with_week(filters.week()))),
        );
    }

    /// The current filter values.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The report parameters other than the week.
    #[must_use]
    pub const fn params(&self) -> &ReportParams {
        &self.params
    }

    /// Selects a cycle, clearing every level below it.
    pub fn set_cycle(&mut self, cycle: Option<CycleId>) {
        self.filters.set_cycle(cycle);
        self.sync();
    }

    /// Selects a bimester, clearing every level below it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session unchanged, if no cycle is
    /// selected.
    pub fn set_bimester(&mut self, bimester: Option<BimesterId>) -> Result<(), CoreError> {
        self.filters.set_bimester(bimester)?;
        self.sync();
        Ok(())
    }

    /// Selects a grade, clearing every level below it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session unchanged, if a level above is
    /// not selected.
    pub fn set_grade(&mut self, grade: Option<GradeId>) -> Result<(), CoreError> {
        self.filters.set_grade(grade)?;
        self.sync();
        Ok(())
    }

    /// Selects a section, clearing the week.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session unchanged, if a level above is
    /// not selected.
    pub fn set_section(&mut self, section: Option<SectionId>) -> Result<(), CoreError> {
        self.filters.set_section(section)?;
        self.sync();
        Ok(())
    }

    /// Selects a week.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the session unchanged, if a level above is
    /// not selected.
    pub fn set_week(&mut self, week: Option<WeekId>) -> Result<(), CoreError> {
        self.filters.set_week(week)?;
        self.sync();
        Ok(())
    }

    /// Replaces the report parameters. The week always comes from the
    /// filters, so a week in `params` is ignored.
    pub fn set_report_params(&mut self, params: ReportParams) {
        self.params = params.with_week(None);
        self.sync();
    }

    /// Clears every filter.
    pub fn reset(&mut self) {
        self.filters.reset();
        self.sync();
    }

    /// Fetches the section report again with the same key.
    pub fn reload_report(&self) {
        self.report.reload();
    }

    /// Bimester options.
    #[must_use]
    pub const fn bimesters(&self) -> &Loader<CycleId, Vec<Bimester>> {
        &self.bimesters
    }

    /// Grade options.
    #[must_use]
    pub const fn grades(&self) -> &Loader<BimesterId, Vec<Grade>> {
        &self.grades
    }

    /// Section options.
    #[must_use]
    pub const fn sections(&self) -> &Loader<SectionOptionsKey, Vec<Section>> {
        &self.sections
    }

    /// Week options.
    #[must_use]
    pub const fn weeks(&self) -> &Loader<BimesterId, Vec<Week>> {
        &self.weeks
    }

    /// The section report.
    #[must_use]
    pub const fn report(&self) -> &Loader<ReportKey, SectionAttendanceReport> {
        &self.report
    }

    /// Waits for every loader to settle and returns the report state.
    pub async fn settled(&self) -> Loadable<SectionAttendanceReport> {
        self.bimesters.settled().await;
        self.grades.settled().await;
        self.sections.settled().await;
        self.weeks.settled().await;
        self.report.settled().await
    }
}
