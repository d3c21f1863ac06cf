use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use conddb_backend::{Backend, EntryKind, GitBackend};
use conddb_core::{CondDbError, Connection, ConnectionConfig, Content};
use conddb_types::{ConditionKey, Iov, ObjectId, TimeUnit};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Mode};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let mode = cli.mode().map_err(CondDbError::Usage)?;
    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr();

    if mode == Mode::TimeRange {
        init_tracing(cli.verbose, None);
        return print_time_range(&mut out);
    }

    let config = resolve_config(&cli)?;
    init_tracing(cli.verbose, config.log_level.as_deref());

    let mut conn = Connection::<GitBackend>::from_config(&config)?;
    execute(&conn, &mode, &mut out, &mut err)?;
    conn.close();
    Ok(())
}

/// Configuration file values, overridden by command-line arguments.
fn resolve_config(cli: &Cli) -> anyhow::Result<ConnectionConfig> {
    let mut config = match &cli.config {
        Some(path) => ConnectionConfig::load(path)?,
        None => ConnectionConfig::default(),
    };
    if let Some(repository) = &cli.repository {
        config.repository = repository.into();
    }
    if let Some(revspec) = &cli.revspec {
        config.default_tag = Some(revspec.clone());
    }
    if let Some(dirs) = cli.dirs {
        config.directory_policy = dirs.into();
    }
    Ok(config)
}

/// `-v` wins over the configured level, which wins over `RUST_LOG`.
fn init_tracing(verbose: bool, configured: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Some(level) = configured {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_time_range(out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{} [{}, {})", "TimePoint range:".bold(), Iov::MIN, Iov::MAX)?;
    for unit in TimeUnit::ALL {
        writeln!(out, "  {:<14} {:>10.3e} years", unit.to_string(), unit.span_years())?;
    }
    Ok(())
}

/// Run one query against an open connection. Results go to `out`,
/// interval reports to `err`.
pub fn execute<B: Backend>(
    conn: &Connection<B>,
    mode: &Mode,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<()> {
    match mode {
        Mode::TimeRange => print_time_range(out),
        Mode::Get { path, time } => {
            let mut key = ConditionKey::path(path.as_str());
            key.time = *time;
            let value = conn.get(&key).with_context(|| format!("reading {path}"))?;
            match &value.content {
                Content::Leaf(bytes) => out.write_all(bytes)?,
                Content::Listing(children) => {
                    for child in children {
                        writeln!(
                            out,
                            "{} {:<7} {} {}",
                            child.mode,
                            child.kind().to_string(),
                            child.object_id,
                            child.name
                        )?;
                    }
                }
            }
            if time.is_some() {
                writeln!(err, "{} {}", "iov:".cyan(), value.iov)?;
            }
            Ok(())
        }
        Mode::Boundaries { path, t0, t1 } => {
            for t in conn.boundaries(None, path, *t0, *t1)? {
                writeln!(out, "{t}")?;
            }
            Ok(())
        }
        Mode::Walk => {
            let kind = conn.inspect(None)?;
            writeln!(
                out,
                "{} is a {}",
                conn.default_tag().unwrap_or_default().yellow(),
                kind.to_string().bold()
            )?;
            let mut entries: Vec<(String, EntryKind, ObjectId)> = Vec::new();
            conn.walk_with(None, &mut entries, |acc, path, entry| {
                acc.push((path.to_string(), entry.kind(), entry.object_id));
                Ok(())
            })?;
            for (path, kind, id) in entries {
                let label = match kind {
                    EntryKind::Leaf => "leaf".normal(),
                    EntryKind::Subtree => "subtree".blue(),
                    EntryKind::ExternalLink => "link".yellow(),
                };
                writeln!(out, "{label:<7} {} {path}", id.short_hex().dimmed())?;
            }
            Ok(())
        }
        Mode::Index => {
            for path in conn.index(None)?.paths() {
                writeln!(out, "{path}")?;
            }
            Ok(())
        }
    }
}
