// crates/pnl_cli/src/args.rs
//
// Deterministic, offline CLI argument surface.
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - Lens tokens are validated up front; an unrecognized value on any axis
//   is fatal before anything is loaded
// - --validate_only performs load + schema checks without running the engine

use clap::Parser;
use std::path::{Path, PathBuf};

use pnl_core::{FileId, Lens};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pnl",
    disable_help_subcommand = true,
    about = "Offline, deterministic CLI for the PNL governance engine"
)]
pub struct Args {
    /// Raw-rows JSON path (the parsed spreadsheet export).
    #[arg(long)]
    pub rows: PathBuf,

    /// Mapping-table JSON path (label synonyms, scales, forbidden tokens).
    #[arg(long)]
    pub mapping: PathBuf,

    /// File identity token recorded in anchors and the snapshot.
    #[arg(long, default_value = "upload")]
    pub file_id: String,

    // --- Lens axes (validated, never defaulted past these tokens) ---
    /// Comparison cycle: MONTHLY | QUARTERLY | YEARLY | ROLLING_<n>
    #[arg(long, default_value = "MONTHLY")]
    pub cycle: String,
    /// Credit terms: NET_30 | NET_70 | CUSTOM:<days>
    #[arg(long, default_value = "NET_30")]
    pub terms: String,
    /// Output emphasis: EVIDENCE_FIRST | EXECUTIVE_FIRST
    #[arg(long, default_value = "EVIDENCE_FIRST")]
    pub mode: String,
    /// Hold flag: UNKNOWN | HOLD_YES | HOLD_NO
    #[arg(long, default_value = "UNKNOWN")]
    pub hold: String,

    // --- Output & rendering ---
    /// Output directory for canonical artifacts (default: current dir).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Extra renderer(s) to emit besides snapshot/gates. Only "report".
    #[arg(long, value_parser = ["report"], num_args = 0..=1)]
    pub render: Vec<String>,

    /// UI-state descriptor JSON for the presentation-contract gate checks.
    #[arg(long)]
    pub ui: Option<PathBuf>,

    /// Validate inputs only (load + schema checks), do not run the engine.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress non-essential stdout lines.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    BadLens(String),
    BadFileId(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "non-local path rejected: {p}"),
            CliError::NotFound(p) => write!(f, "input not found: {p}"),
            CliError::BadLens(m) => write!(f, "invalid lens: {m}"),
            CliError::BadFileId(m) => write!(f, "invalid file id: {m}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Arguments after validation: typed lens + checked paths.
#[derive(Debug, Clone)]
pub struct ValidatedArgs {
    pub rows: PathBuf,
    pub mapping: PathBuf,
    pub file_id: FileId,
    pub lens: Lens,
    pub out: PathBuf,
    pub emit_report: bool,
    pub ui: Option<PathBuf>,
    pub validate_only: bool,
    pub quiet: bool,
}

fn check_local_input(path: &Path) -> Result<(), CliError> {
    let display = path.display().to_string();
    if pnl_io::looks_like_url_strict(&display) {
        return Err(CliError::NonLocalPath(display));
    }
    if !path.is_file() {
        return Err(CliError::NotFound(display));
    }
    Ok(())
}

/// Validate raw args: offline paths, existing files, strict lens tokens.
pub fn parse_and_validate(args: Args) -> Result<ValidatedArgs, CliError> {
    check_local_input(&args.rows)?;
    check_local_input(&args.mapping)?;
    if let Some(ui) = &args.ui {
        check_local_input(ui)?;
    }

    let lens = Lens::parse(&args.cycle, &args.terms, &args.mode, &args.hold)
        .map_err(|e| CliError::BadLens(e.to_string()))?;
    let file_id: FileId = args
        .file_id
        .parse()
        .map_err(|e: pnl_core::CoreError| CliError::BadFileId(e.to_string()))?;

    Ok(ValidatedArgs {
        rows: args.rows,
        mapping: args.mapping,
        file_id,
        lens,
        out: args.out,
        emit_report: args.render.iter().any(|r| r == "report"),
        ui: args.ui,
        validate_only: args.validate_only,
        quiet: args.quiet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(rows: &Path, mapping: &Path) -> Args {
        Args::parse_from([
            "pnl",
            "--rows",
            rows.to_str().unwrap(),
            "--mapping",
            mapping.to_str().unwrap(),
        ])
    }

    #[test]
    fn rejects_url_like_paths() {
        let args = Args::parse_from([
            "pnl",
            "--rows",
            "https://example.com/rows.json",
            "--mapping",
            "mapping.json",
        ]);
        assert!(matches!(parse_and_validate(args), Err(CliError::NonLocalPath(_))));
    }

    #[test]
    fn rejects_bad_lens_before_loading_anything() {
        let dir = tempfile::tempdir().unwrap();
        let rows = dir.path().join("rows.json");
        let mapping = dir.path().join("mapping.json");
        std::fs::write(&rows, "[]").unwrap();
        std::fs::write(&mapping, "[]").unwrap();

        let mut args = base(&rows, &mapping);
        args.cycle = "MOM".into();
        assert!(matches!(parse_and_validate(args), Err(CliError::BadLens(_))));
    }

    #[test]
    fn accepts_rolling_and_custom_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let rows = dir.path().join("rows.json");
        let mapping = dir.path().join("mapping.json");
        std::fs::write(&rows, "[]").unwrap();
        std::fs::write(&mapping, "[]").unwrap();

        let mut args = base(&rows, &mapping);
        args.cycle = "ROLLING_4".into();
        args.terms = "CUSTOM:45".into();
        let v = parse_and_validate(args).unwrap();
        assert_eq!(v.lens.cycle.shift(), 4);
        assert_eq!(v.lens.terms.net_days(), 45);
    }
}
