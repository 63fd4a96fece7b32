//! pnl — offline, deterministic CLI for the PNL governance engine.
//!
//! Loads the two input files, runs the pipeline under the requested lens,
//! writes canonical artifacts (snapshot.json, gates.json, optional
//! report.json), prints the gate summary, and exits 0 when shippable or 2
//! when any ship-stopper gate fails. Input/usage problems exit 1 before any
//! computation.

use std::process::ExitCode;

use clap::Parser;

use pnl_io::canonical_json::write_canonical_file;
use pnl_pipeline::{run, run_gate, GateReport, PipelineOutputs, UiState};

mod args;
use args::{parse_and_validate, Args, ValidatedArgs};

fn main() -> ExitCode {
    let args = Args::parse();
    let validated = match parse_and_validate(args) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("pnl: {e}");
            return ExitCode::from(1);
        }
    };

    match real_main(&validated) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pnl: {e}");
            ExitCode::from(1)
        }
    }
}

fn real_main(v: &ValidatedArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let loaded = pnl_io::loader::load_all(&v.rows, &v.mapping)?;

    if v.validate_only {
        if !v.quiet {
            println!(
                "inputs OK: {} rows, {} mapping entries",
                loaded.rows.len(),
                loaded.table.len()
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = pnl_core::variables::EngineConfig::default();
    let outputs = run(&loaded.rows, &loaded.table, &v.lens, &v.file_id, &config)?;

    // Re-run the gate with the UI descriptor when one was supplied; the
    // snapshot itself never changes.
    let gates = match &v.ui {
        Some(path) => {
            let ui: UiState = serde_json::from_str(&std::fs::read_to_string(path)?)?;
            run_gate(&outputs.snapshot, Some(&ui))
        }
        None => outputs.gates.clone(),
    };

    write_artifacts(v, &outputs, &gates)?;
    print_summary(v, &outputs, &gates);

    Ok(if gates.shippable { ExitCode::SUCCESS } else { ExitCode::from(2) })
}

fn write_artifacts(
    v: &ValidatedArgs,
    outputs: &PipelineOutputs,
    gates: &GateReport,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot_value = serde_json::to_value(&outputs.snapshot)?;
    let gates_value = serde_json::to_value(gates)?;

    write_canonical_file(&v.out.join("snapshot.json"), &snapshot_value)?;
    write_canonical_file(&v.out.join("gates.json"), &gates_value)?;

    if v.emit_report {
        let model = pnl_report::build_model(&snapshot_value, &gates_value)?;
        let rendered = pnl_report::render_json(&model)?;
        write_canonical_file(&v.out.join("report.json"), &serde_json::from_str(&rendered)?)?;
    }
    Ok(())
}

fn print_summary(v: &ValidatedArgs, outputs: &PipelineOutputs, gates: &GateReport) {
    if v.quiet {
        // Keep the two lines scripts depend on.
        println!("{}", outputs.snapshot.id);
        println!("OVERALL: {}", if gates.shippable { "PASS" } else { "FAIL" });
        return;
    }

    println!("snapshot: {}", outputs.snapshot.id);
    println!("period:   {}", period_line(&outputs.snapshot.period));
    println!("lens:     {}", outputs.snapshot.lens);
    println!();

    let width = gates.results.iter().map(|r| r.gate_id.len()).max().unwrap_or(10);
    for r in &gates.results {
        let status = if r.passed { "PASS" } else { "FAIL" };
        println!("{status:<4} {:<width$}  {}", r.gate_id, r.reason);
    }
    if !outputs.snapshot.backlog.is_empty() {
        println!();
        println!("open mapping gaps:");
        for b in &outputs.snapshot.backlog {
            println!("  {} {}", b.kind, b.code);
        }
    }
    for note in outputs.snapshot.ledger.audit() {
        println!("audit: {}: {}", note.code, note.detail);
    }
    println!();
    println!("OVERALL: {}", if gates.shippable { "PASS" } else { "FAIL" });
}

fn period_line(period: &pnl_core::Disclosure<String>) -> &str {
    match period.value() {
        Some(p) => p.as_str(),
        None => "Not disclosed",
    }
}
