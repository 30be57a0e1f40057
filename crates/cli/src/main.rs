// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `campus` - operator command line for the Campus records backend.
//!
//! Drives the same filter session, report service, and grid editor the
//! client application uses, which makes it handy for checking a backend
//! by hand.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod commands;

use campus_client::{ClientConfig, DEFAULT_BASE_URL};
use campus_domain::{BimesterId, CycleId, GradeId, SectionId, TeacherId, TopicId, WeekId};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::Result;
use std::path::PathBuf;
use std::time::Duration;
use time::Date;
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let filter: EnvFilter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(args.log_level().into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match args.run().await {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "campus", author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the backend
    #[arg(long, env = "CAMPUS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "CAMPUS_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    async fn run(self) -> Result<()> {
        let config: ClientConfig = ClientConfig {
            bearer_token: self.token,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::with_base_url(&self.api_url)
        };
        self.command.run(config).await
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Walk the filter cascade and print the options of each level
    #[command(visible_alias = "o")]
    Options {
        /// School cycle
        #[arg(long)]
        cycle: CycleId,
        /// Bimester, to also list grades and weeks
        #[arg(long)]
        bimester: Option<BimesterId>,
        /// Grade, to also list sections
        #[arg(long, requires = "bimester")]
        grade: Option<GradeId>,
    },

    /// Print the attendance report and statistics of a section
    #[command(visible_alias = "r")]
    Report {
        /// Section
        #[arg(long)]
        section: SectionId,
        /// Restrict to one week
        #[arg(long)]
        week: Option<WeekId>,
        /// First day (YYYY-MM-DD)
        #[arg(long, value_parser = campus_domain::date_format::parse_date)]
        from: Option<Date>,
        /// Last day (YYYY-MM-DD)
        #[arg(long, value_parser = campus_domain::date_format::parse_date)]
        to: Option<Date>,
    },

    /// Load evaluation grid edits from a JSON file and save them
    #[command(visible_alias = "s")]
    SaveGrid {
        /// Evaluated topic
        #[arg(long)]
        topic: TopicId,
        /// Section
        #[arg(long)]
        section: SectionId,
        /// Bimester
        #[arg(long)]
        bimester: BimesterId,
        /// Teacher recording the evaluations
        #[arg(long)]
        teacher: TeacherId,
        /// JSON array of `{enrollmentId, categoryId, scaleCode, notes?}`
        #[arg(long)]
        edits: PathBuf,
    },
}

impl Command {
    async fn run(self, config: ClientConfig) -> Result<()> {
        match self {
            Self::Options {
                cycle,
                bimester,
                grade,
            } => commands::options(config, cycle, bimester, grade).await,
            Self::Report {
                section,
                week,
                from,
                to,
            } => commands::report(config, section, week, from, to).await,
            Self::SaveGrid {
                topic,
                section,
                bimester,
                teacher,
                edits,
            } => {
                let scope: campus_client::GridScope = campus_client::GridScope {
                    topic_id: topic,
                    section_id: section,
                    bimester_id: bimester,
                    teacher_id: teacher,
                };
                commands::save_grid(config, scope, &edits).await
            }
        }
    }
}
