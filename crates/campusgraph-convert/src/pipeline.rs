//! The conversion pipeline: load → map → derive → serialize.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use campusgraph_core::{Issue, Namespace};
use campusgraph_graph::{Graph, GraphStats};
use campusgraph_manifest::RunId;

use crate::config::ConvertConfig;
use crate::diagnostics::count_by_kind;
use crate::error::{ConvertError, Result};
use crate::mapping::Mapper;
use crate::records::{
    AssignedHoursRow, CourseInstanceRow, CoursePlanningRow, CourseRow, ProgrammeCourseRow,
    ProgrammeRow, RegistrationRow, ReportedHoursRow, SeniorTeacherRow, StudentRow,
};
use crate::tables::{load, TableData, TableName, TableRecord, TableSource};
use crate::{manifest, persist};

/// Rows read and mapped for one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: TableName,
    pub origin: String,
    pub rows: usize,
    /// Rows (or joined row pairs) that produced graph content.
    pub mapped: usize,
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub tables: Vec<TableReport>,
    pub divisions_linked: usize,
    pub schema_triples: usize,
    pub issues: Vec<Issue>,
    pub issue_counts: BTreeMap<String, usize>,
    pub graph: GraphStats,
}

/// A finished conversion held in memory.
pub struct Conversion {
    pub graph: Graph,
    pub report: ConversionReport,
    /// Raw input tables, in load order.
    pub inputs: Vec<TableData>,
}

/// Result of [`convert_to_file`].
#[derive(Debug)]
pub struct ConversionOutcome {
    pub report: ConversionReport,
    pub output: PathBuf,
    pub bytes: usize,
    pub run_id: Option<RunId>,
}

/// Reads tables from a source and keeps what was read for the report.
struct Loader<'a> {
    source: &'a dyn TableSource,
    tables: Vec<TableReport>,
    inputs: Vec<TableData>,
}

impl<'a> Loader<'a> {
    fn new(source: &'a dyn TableSource) -> Self {
        Self {
            source,
            tables: Vec::new(),
            inputs: Vec::new(),
        }
    }

    /// Load a table. Absent optional tables yield `None`; an absent
    /// required table is an error.
    fn load<R: TableRecord>(&mut self) -> Result<Option<Vec<(usize, R)>>> {
        let table = R::TABLE;
        let Some(data) = self.source.read(table)? else {
            if table.is_required() {
                return Err(ConvertError::MissingTable {
                    table: table.to_string(),
                    origin: self.source.describe(),
                });
            }
            tracing::info!(%table, "Optional table not present, skipping");
            return Ok(None);
        };

        let rows = load::<R>(&data)?;
        tracing::info!(%table, origin = %data.origin, rows = rows.len(), "Table loaded");
        self.tables.push(TableReport {
            table,
            origin: data.origin.clone(),
            rows: rows.len(),
            mapped: 0,
        });
        self.inputs.push(data);
        Ok(Some(rows))
    }

    fn mapped(&mut self, table: TableName, mapped: usize) {
        if let Some(report) = self.tables.iter_mut().find(|t| t.table == table) {
            report.mapped = mapped;
        }
    }
}

/// Load every table from `source` and build the graph.
pub fn run_conversion(source: &dyn TableSource, config: &ConvertConfig) -> Result<Conversion> {
    let start = Instant::now();
    let ns = Namespace::new(config.base_iri.clone())?;
    let mut loader = Loader::new(source);

    let instances = loader.load::<CourseInstanceRow>()?.unwrap_or_default();
    let plannings = loader.load::<CoursePlanningRow>()?.unwrap_or_default();
    let students = loader.load::<StudentRow>()?.unwrap_or_default();
    let teachers = loader.load::<SeniorTeacherRow>()?;
    let courses = loader.load::<CourseRow>()?;
    let programmes = loader.load::<ProgrammeRow>()?;
    let programme_courses = loader.load::<ProgrammeCourseRow>()?;
    let registrations = loader.load::<RegistrationRow>()?;
    let assigned = loader.load::<AssignedHoursRow>()?;
    let reported = loader.load::<ReportedHoursRow>()?;

    let mut mapper = Mapper::new(ns, config.strict);
    for report in &loader.tables {
        mapper.mark_loaded(report.table);
    }

    mapper.learn_program_aliases(
        programmes.as_deref().unwrap_or_default(),
        programme_courses.as_deref().unwrap_or_default(),
    )?;

    if let Some(rows) = &teachers {
        let n = mapper.map_senior_teachers(rows)?;
        loader.mapped(TableName::SeniorTeachers, n);
    }
    if let Some(rows) = &courses {
        let n = mapper.map_courses(rows)?;
        loader.mapped(TableName::Courses, n);
    }
    if let Some(rows) = &programmes {
        let n = mapper.map_programmes(rows)?;
        loader.mapped(TableName::Programmes, n);
    }

    let n = mapper.map_course_instances(&instances, &plannings)?;
    loader.mapped(TableName::CourseInstances, n);
    loader.mapped(TableName::CoursePlannings, n);

    if let Some(rows) = &programme_courses {
        let n = mapper.map_programme_courses(rows)?;
        loader.mapped(TableName::ProgrammeCourses, n);
    }

    let n = mapper.map_students(&students)?;
    loader.mapped(TableName::Students, n);

    if let Some(rows) = &registrations {
        let n = mapper.map_registrations(rows)?;
        loader.mapped(TableName::Registrations, n);
    }
    if let Some(rows) = &assigned {
        let n = mapper.map_assigned_hours(rows)?;
        loader.mapped(TableName::AssignedHours, n);
    }
    if let Some(rows) = &reported {
        let n = mapper.map_reported_hours(rows)?;
        loader.mapped(TableName::ReportedHours, n);
    }

    let divisions_linked = mapper.derive_division_departments()?;
    let (mut graph, issues) = mapper.finish();
    let schema_triples = if config.emit_schema {
        graph.add_schema()
    } else {
        0
    };

    let report = ConversionReport {
        tables: loader.tables,
        divisions_linked,
        schema_triples,
        issue_counts: count_by_kind(&issues),
        issues,
        graph: graph.stats(),
    };

    tracing::info!(
        triples = report.graph.triples,
        nodes = report.graph.nodes,
        issues = report.issues.len(),
        divisions_linked,
        duration_ms = start.elapsed().as_millis() as u64,
        "Conversion complete"
    );

    Ok(Conversion {
        graph,
        report,
        inputs: loader.inputs,
    })
}

/// Execute a full run: convert → write output → manifest.
pub fn convert_to_file(
    source: &dyn TableSource,
    config: &ConvertConfig,
) -> Result<ConversionOutcome> {
    let mut session = config
        .manifest_dir
        .as_ref()
        .map(|_| manifest::start_session(config, &source.describe()));

    let result = run_conversion(source, config).and_then(|conversion| {
        let preamble = read_preamble(config)?;
        let bytes = persist::render(&conversion.graph, config.format, preamble.as_deref())?;
        let output = PathBuf::from(&config.output_path);
        persist::write_atomic(&output, &bytes)?;
        Ok((conversion, output, bytes))
    });

    let (conversion, output, bytes) = match result {
        Ok(done) => done,
        Err(e) => {
            tracing::error!(error = %e, "Conversion failed");
            if let (Some(mut session), Some(dir)) = (session.take(), &config.manifest_dir) {
                manifest::record_failure(&mut session, &e.to_string());
                manifest::finalize_and_store(session, dir);
            }
            return Err(e);
        }
    };

    tracing::info!(
        path = %output.display(),
        format = %config.format,
        bytes = bytes.len(),
        "Graph written"
    );

    let mut run_id = None;
    if let (Some(mut session), Some(dir)) = (session, &config.manifest_dir) {
        manifest::record_inputs(&mut session, &conversion.inputs, &conversion.report);
        session.record_output(
            &output.display().to_string(),
            &config.format.to_string(),
            &bytes,
            conversion.graph.len(),
        );
        manifest::record_report(&mut session, &conversion.report);
        run_id = manifest::finalize_and_store(session, dir).map(|m| m.id);
    }

    Ok(ConversionOutcome {
        report: conversion.report,
        output,
        bytes: bytes.len(),
        run_id,
    })
}

/// The ontology document to place ahead of the data, if any.
fn read_preamble(config: &ConvertConfig) -> Result<Option<String>> {
    let Some(path) = &config.ontology_path else {
        return Ok(None);
    };
    if !config.format.supports_preamble() {
        tracing::warn!(
            format = %config.format,
            ontology = %path,
            "Ontology preamble is only written with Turtle output, ignoring"
        );
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}
