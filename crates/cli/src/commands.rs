// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus::InitialFilters;
use campus_client::{
    CampusClient, ClientConfig, EvaluationGridEditor, FilterSession, GridSaveEntry, GridScope,
    HttpTransport, Loadable, SaveReport,
};
use campus_domain::{
    AttendanceStatistics, BimesterId, CycleId, EvaluationKey, GradeId, GridCell, ReportParams,
    SectionAttendanceReport, SectionId, WeekId,
};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail};
use std::fmt::Display;
use std::path::Path;
use time::Date;
use tracing::info;

fn print_options<T, F: Fn(&T) -> String>(level: &str, state: &Loadable<Vec<T>>, render: F) {
    match (&state.data, &state.error) {
        (_, Some(error)) => println!("{level}: failed to load ({error})"),
        (Some(items), None) if items.is_empty() => println!("{level}: none"),
        (Some(items), None) => {
            println!("{level}:");
            for item in items {
                println!("  {}", render(item));
            }
        }
        (None, None) => println!("{level}: not requested"),
    }
}

fn labelled(id: impl Display, name: &str) -> String {
    format!("{id:>6}  {name}")
}

/// Walks the cascade level by level, waiting for each level's options.
pub async fn options(
    config: ClientConfig,
    cycle: CycleId,
    bimester: Option<BimesterId>,
    grade: Option<GradeId>,
) -> Result<()> {
    let client: CampusClient<HttpTransport> = CampusClient::connect(config)?;
    let mut session: FilterSession = client.filter_session(InitialFilters::default());

    session.set_cycle(Some(cycle));
    print_options("Bimesters", &session.bimesters().settled().await, |b| {
        labelled(b.id, &b.name)
    });

    let Some(bimester) = bimester else {
        return Ok(());
    };
    session.set_bimester(Some(bimester))?;
    print_options("Grades", &session.grades().settled().await, |g| {
        labelled(g.id, &g.name)
    });
    print_options("Weeks", &session.weeks().settled().await, |w| {
        format!(
            "{:>6}  Week {} ({} to {})",
            w.id, w.number, w.start_date, w.end_date
        )
    });

    if let Some(grade) = grade {
        session.set_grade(Some(grade))?;
        print_options("Sections", &session.sections().settled().await, |s| {
            labelled(s.id, &s.name)
        });
    }
    Ok(())
}

/// Prints a section report followed by its statistics.
pub async fn report(
    config: ClientConfig,
    section: SectionId,
    week: Option<WeekId>,
    from: Option<Date>,
    to: Option<Date>,
) -> Result<()> {
    let client: CampusClient<HttpTransport> = CampusClient::connect(config)?;
    let params: ReportParams = ReportParams::new(week, from, to)?;

    let report: SectionAttendanceReport = client
        .reports()
        .section_report(section, &params)
        .await
        .wrap_err_with(|| format!("loading the report of section {section}"))?;
    println!("Section {section}: {} students", report.students.len());
    for row in &report.students {
        let marks: Vec<&str> = row.marks.iter().map(|m| m.status_code.as_str()).collect();
        println!("  {:<32} {}", row.full_name, marks.join(" "));
    }

    let stats: AttendanceStatistics = client
        .reports()
        .section_statistics(section, &params)
        .await
        .wrap_err("loading attendance statistics")?;
    println!(
        "Attendance {:.1}% (present {}, late {}, absent {}, justified {})",
        stats.attendance_rate,
        stats.counts.present,
        stats.counts.late,
        stats.counts.absent,
        stats.counts.justified
    );
    Ok(())
}

/// Buffers the edits of a JSON file over the current grid and saves them.
pub async fn save_grid(config: ClientConfig, scope: GridScope, edits: &Path) -> Result<()> {
    let raw: String = std::fs::read_to_string(edits)
        .wrap_err_with(|| format!("reading {}", edits.display()))?;
    let entries: Vec<GridSaveEntry> =
        serde_json::from_str(&raw).wrap_err_with(|| format!("parsing {}", edits.display()))?;
    if entries.is_empty() {
        info!("No edits to save");
        return Ok(());
    }

    let client: CampusClient<HttpTransport> = CampusClient::connect(config)?;
    let mut editor: EvaluationGridEditor<HttpTransport> = client.grid_editor(scope);
    editor.load().await.wrap_err("loading the evaluation grid")?;
    for entry in entries {
        let key: EvaluationKey = entry.key();
        editor.set_value(
            key,
            GridCell {
                scale_code: entry.scale_code,
                notes: entry.notes,
            },
        );
    }

    let report: SaveReport<EvaluationKey> = editor.save().await;
    println!(
        "Saved {} of {} changes",
        report.result.succeeded.len(),
        report.result.len()
    );
    for failure in &report.result.failed {
        println!("  {}: {}", failure.key, failure.reason);
    }
    if !report.refreshed {
        info!("The grid was not reloaded after saving");
    }
    if let Some(banner) = report.banner {
        bail!("{banner}");
    }
    Ok(())
}
