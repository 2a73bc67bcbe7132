//! `vaudit inspect`, `vaudit run`, `vaudit all`: load both sources, run the
//! audit modules, print summaries and export reports.

use std::path::{Path, PathBuf};

use serde::Serialize;
use vaudit_recon::session::SessionSummary;
use vaudit_recon::{AuditModule, AuditReport, AuditSession, ModuleOutcome, ReportTable};

use crate::exit_codes::{audit_exit_code, EXIT_EXCEPTIONS, EXIT_SUCCESS, EXIT_USAGE};
use crate::settings::resolve_config;
use crate::CliError;

/// Input files shared by every audit command.
#[derive(clap::Args)]
pub struct Sources {
    /// Master inventory (CIQ) workbook or CSV
    #[arg(long)]
    pub master: PathBuf,

    /// Site dump workbook (all sheets are merged) or CSV
    #[arg(long)]
    pub system: PathBuf,
}

pub struct RunArgs {
    pub module: AuditModule,
    pub sources: Sources,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub master_key: Option<String>,
    pub system_key: Option<String>,
}

#[derive(Serialize)]
struct RunMeta<'a> {
    engine_version: &'static str,
    run_at: String,
    master: &'a Path,
    system: &'a Path,
    config: &'a str,
}

impl<'a> RunMeta<'a> {
    fn new(sources: &'a Sources, config: &'a str) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION"),
            run_at: chrono::Utc::now().to_rfc3339(),
            master: &sources.master,
            system: &sources.system,
            config,
        }
    }
}

#[derive(Serialize)]
struct InspectOutput<'a> {
    master: &'a Path,
    system: &'a Path,
    #[serde(flatten)]
    summary: SessionSummary,
}

#[derive(Serialize)]
struct RunOutput<'a> {
    meta: RunMeta<'a>,
    report: &'a AuditReport,
}

#[derive(Serialize)]
struct AllOutput<'a> {
    meta: RunMeta<'a>,
    exit_code: u8,
    modules: &'a [ModuleOutcome],
}

fn load(sources: &Sources) -> Result<AuditSession, CliError> {
    vaudit_io::load_session(&sources.master, &sources.system).map_err(|e| CliError::audit(&e))
}

fn emit_json<T: Serialize>(value: &T, json: bool, output: Option<&Path>) -> Result<(), CliError> {
    if !json && output.is_none() {
        return Ok(());
    }
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::export(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::export(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json {
        println!("{json_str}");
    }
    Ok(())
}

// ============================================================================
// inspect
// ============================================================================

pub fn cmd_inspect(sources: Sources, json: bool) -> Result<(), CliError> {
    let session = load(&sources)?;
    let summary = session.summary();

    if json {
        let out = InspectOutput {
            master: &sources.master,
            system: &sources.system,
            summary,
        };
        return emit_json(&out, true, None);
    }

    println!("master: {} ({} records)", sources.master.display(), summary.master_records);
    println!("  columns: {}", summary.master_columns.join(", "));
    println!(
        "system: {} ({} records from {} sheet(s))",
        sources.system.display(),
        summary.system_records,
        summary.system_sheets.len()
    );
    for sheet in &summary.system_sheets {
        println!("  sheet '{}': {} rows", sheet.name, sheet.rows);
    }
    println!("  columns: {}", summary.system_columns.join(", "));
    Ok(())
}

// ============================================================================
// run
// ============================================================================

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let module = args.module;

    if args.export.is_some() && !module.exportable() {
        return Err(CliError {
            code: EXIT_USAGE,
            message: format!("the {module} audit has no exportable report"),
            hint: Some("export is available for integrity, frequency, mapping and key-join".into()),
        });
    }

    let (mut config, source) = resolve_config(args.config.as_deref())?;
    if let (Some(m), Some(s)) = (args.master_key, args.system_key) {
        config.key_join.master_key = Some(m);
        config.key_join.system_key = Some(s);
        config
            .validate()
            .map_err(|e| CliError::audit(&e).with_hint("--master-key and --system-key must name columns"))?;
    }

    let session = load(&args.sources)?;
    let report = vaudit_recon::run_module(module, &session, &config).map_err(|e| {
        let err = CliError::audit(&e);
        match e {
            vaudit_recon::AuditError::MissingColumn { .. } => {
                err.with_hint("column names are configurable; see `vaudit config show`")
            }
            _ => err,
        }
    })?;

    let meta = RunMeta::new(&args.sources, &source);
    emit_json(&RunOutput { meta, report: &report }, args.json, args.output.as_deref())?;

    print_summary(&report);
    if !args.json {
        print_table(&report.table);
    }

    if let Some(path) = &args.export {
        vaudit_io::export::write_report(&report.table, path).map_err(|e| CliError::audit(&e))?;
        eprintln!("exported {} row(s) to {}", report.table.len(), path.display());
    }

    if report.clean {
        Ok(())
    } else {
        Err(CliError {
            code: EXIT_EXCEPTIONS,
            message: String::new(),
            hint: None,
        })
    }
}

// ============================================================================
// all
// ============================================================================

pub fn cmd_all(
    sources: Sources,
    config: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let (config, source) = resolve_config(config.as_deref())?;
    let session = load(&sources)?;
    let outcomes = vaudit_recon::run_all(&session, &config);

    let exit_code = outcomes.iter().map(outcome_exit_code).max().unwrap_or(EXIT_SUCCESS);

    let meta = RunMeta::new(&sources, &source);
    emit_json(
        &AllOutput {
            meta,
            exit_code,
            modules: &outcomes,
        },
        json,
        output.as_deref(),
    )?;

    for outcome in &outcomes {
        match outcome {
            ModuleOutcome::Completed(report) => print_summary(report),
            ModuleOutcome::Failed { module, error } => {
                eprintln!("{}: error: {error}", module.title());
            }
        }
    }

    match exit_code {
        EXIT_SUCCESS => Ok(()),
        code => Err(CliError {
            code,
            message: String::new(),
            hint: None,
        }),
    }
}

fn outcome_exit_code(outcome: &ModuleOutcome) -> u8 {
    match outcome {
        ModuleOutcome::Completed(report) if report.clean => EXIT_SUCCESS,
        ModuleOutcome::Completed(_) => EXIT_EXCEPTIONS,
        ModuleOutcome::Failed { error, .. } => audit_exit_code(error),
    }
}

// ============================================================================
// Human output
// ============================================================================

fn print_summary(report: &AuditReport) {
    let counters: Vec<String> = report
        .summary
        .iter()
        .map(|c| format!("{} {}", c.value, c.label.to_lowercase()))
        .collect();
    eprintln!(
        "{}: {} ({})",
        report.title,
        if report.clean { "clean" } else { "exceptions found" },
        counters.join(", ")
    );
}

/// Render `-` for missing values.
pub(crate) fn render_table(table: &ReportTable) -> String {
    let cell = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, v) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell(v).chars().count());
            }
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(table.columns.clone()));
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row.iter().map(cell).collect()));
        out.push('\n');
    }
    out
}

fn print_table(table: &ReportTable) {
    if table.is_empty() {
        return;
    }
    print!("{}", render_table(table));
}
