//! Artifact packer CLI entrypoint.
//!
//! Dispatches between the build, name-only, hash-only, and validate modes,
//! maps every handled failure to exit status 1, and keeps all user-facing
//! output on explicit writers so the modes stay testable.

use artifact_packer::cli::{Cli, Mode};
use artifact_packer::error::{PackerError, Result};
use artifact_packer::pipeline::{compose_name, compute_hash, create_artifact, resolve_config};
use artifact_packer::validate::validate_unpacked;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let exit_code = match run(&cli, &mut stdout, &mut stderr) {
        Ok(code) => code,
        Err(err) => {
            write_line(&mut stderr, &err);
            1
        }
    };
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn run(cli: &Cli, out: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    let cwd = invocation_dir()?;
    match cli.mode() {
        Mode::Validate => run_validate(cli, &cwd, out),
        Mode::HashOnly => {
            let config = resolve_config(cli, &cwd, stderr);
            let digest = compute_hash(&config)?;
            write_line(out, &digest);
            Ok(0)
        }
        Mode::NameOnly => {
            let config = resolve_config(cli, &cwd, stderr);
            let name = compose_name(&config, chrono::Local::now().date_naive())?;
            write_line(out, &name);
            Ok(0)
        }
        Mode::Build => {
            let config = resolve_config(cli, &cwd, stderr);
            create_artifact(&config, chrono::Local::now().date_naive(), out, stderr)?;
            Ok(0)
        }
    }
}

/// Validate mode: the first positional argument names the unpacked archive
/// directory, resolved against the invocation directory (`--chdir` does not
/// apply here).
fn run_validate(cli: &Cli, cwd: &Utf8PathBuf, out: &mut dyn Write) -> Result<i32> {
    let dir = cwd.join(
        cli.dir
            .first()
            .expect("clap enforces at least one input dir"),
    );
    write_line(out, &format_args!("Validating archive in {dir}"));

    let report = validate_unpacked(&dir)?;
    if report.matches() {
        write_line(out, &format_args!("Hash OK: {}.", report.actual));
        Ok(0)
    } else {
        write_line(
            out,
            &format_args!(
                "Hash mismatch: actual {}, expected {}",
                report.actual, report.expected
            ),
        );
        Ok(1)
    }
}

fn invocation_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir()?;
    Utf8PathBuf::from_path_buf(cwd).map_err(|bad| PackerError::NonUtf8Path {
        path: bad.to_string_lossy().into_owned(),
    })
}

fn write_line(writer: &mut dyn Write, message: &dyn std::fmt::Display) {
    if writeln!(writer, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}
