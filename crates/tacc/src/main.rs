use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use miette::{NamedSource, Report};
use tracing::{error, info};

/// Where the source is read from and where the reports go.
#[derive(Debug, Clone)]
struct Config {
    input: PathBuf,
    ast_report: PathBuf,
    symbol_report: PathBuf,
    tac_report: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: "input.txt".into(),
            ast_report: "ast.txt".into(),
            symbol_report: "symbols.txt".into(),
            tac_report: "tac.txt".into(),
        }
    }
}

fn run(config: &Config) -> anyhow::Result<ExitCode> {
    let source = fs::read_to_string(&config.input)
        .with_context(|| format!("failed to read {}", config.input.display()))?;
    info!(path = %config.input.display(), bytes = source.len(), "read source");

    let analysis = match tacc_syntax::analyze(&source) {
        Ok(analysis) => analysis,
        Err(err) => {
            error!("compilation failed");
            let name = config.input.display().to_string();
            let report = Report::new(err).with_source_code(NamedSource::new(name, source));
            eprintln!("{report:?}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Render everything first so a write never happens for a half-done run.
    let outputs = [
        (&config.ast_report, analysis.grammar_report()),
        (&config.symbol_report, analysis.symbol_report()),
        (&config.tac_report, analysis.tac_report()),
    ];
    for (path, text) in outputs {
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    run(&Config::default())
}
