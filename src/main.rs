use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use tscat::config::Settings;
use tscat::{
    LocaleSet, ReportFormatter, SearchField, SearchQuery, Severity, SimpleFormatter, TsParser,
};

/// tscat - inspect and maintain Qt Linguist translation catalogs
#[derive(Parser, Debug)]
#[command(name = "tscat")]
#[command(
    author,
    version,
    about = "tscat - inspect and maintain Qt Linguist translation catalogs",
    long_about = None
)]
#[command(help_template = "{name} {version}\n{about}\n\nUSAGE:\n    {usage}\n\n{all-args}")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print debug logs to stderr (overridden by TSCAT_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate one message; prints the source text when no active translation exists
    Lookup {
        /// Catalog file (.ts)
        file: PathBuf,
        /// Context name, e.g. "MainWindow"
        context: String,
        /// Source text, e.g. "Career"
        source: String,
        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,
        /// Exit with status 1 when falling back to the source text
        #[arg(long)]
        strict: bool,
    },
    /// Search sources and translations across catalogs
    Search(SearchArgs),
    /// Check catalogs for duplicate keys, empty translations and placeholder drift
    Lint {
        /// Catalog files or directories (default: current directory)
        paths: Vec<PathBuf>,
        /// Lowest severity to report
        #[arg(long, value_enum, default_value = "info")]
        min_severity: SeverityArg,
        /// Print findings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show message counts and completion per catalog
    Stats {
        /// Catalog files or directories (default: current directory)
        paths: Vec<PathBuf>,
        /// Include a per-context breakdown
        #[arg(long)]
        contexts: bool,
        #[arg(long)]
        json: bool,
    },
    /// Rewrite a catalog in canonical lupdate layout
    Fmt {
        file: PathBuf,
        /// Write to this file instead of rewriting in place
        #[arg(short, long, conflicts_with = "check")]
        output: Option<PathBuf>,
        /// Only report whether the file would change (exit 1 if so)
        #[arg(long)]
        check: bool,
        /// Remove obsolete and vanished messages
        #[arg(long)]
        drop_obsolete: bool,
    },
    /// Print every message of a catalog as JSON
    Dump {
        file: PathBuf,
        /// Leave out obsolete, vanished and unfinished messages
        #[arg(long)]
        active_only: bool,
        /// One `context: source => translation` line per message instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// List the languages found under a resource directory
    Locales {
        /// Directory to scan (default: current directory)
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Text to search for
    #[arg(value_name = "SEARCH_TEXT")]
    text: String,

    /// Catalog files or directories (default: current directory)
    paths: Vec<PathBuf>,

    /// Case-sensitive search
    #[arg(short, long)]
    case_sensitive: bool,

    /// Treat SEARCH_TEXT as a regular expression
    #[arg(long)]
    regex: bool,

    /// Include obsolete messages
    #[arg(long)]
    obsolete: bool,

    /// Which side of the message to match
    #[arg(long, value_enum, default_value = "both")]
    field: FieldArg,

    /// Additional directory names to skip (e.g. "vendor,third_party")
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// One match per line: file:line:context:source<TAB>translation
    #[arg(long, conflicts_with = "json")]
    simple: bool,

    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FieldArg {
    Source,
    Translation,
    Both,
}

impl From<FieldArg> for SearchField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Source => SearchField::Source,
            FieldArg::Translation => SearchField::Translation,
            FieldArg::Both => SearchField::Both,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_new(&settings.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(Settings::default_filter(false)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let settings = Settings::from_env(cli.verbose, cli.no_color);
    init_logging(&settings);
    if !settings.color {
        colored::control::set_override(false);
    }

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

/// Execute a subcommand and return the process exit code
fn run(command: Command) -> Result<i32> {
    let formatter = ReportFormatter::new();
    let simple = SimpleFormatter::new();

    match command {
        Command::Lookup {
            file,
            context,
            source,
            comment,
            strict,
        } => {
            let outcome = tscat::run_lookup(&file, &context, &source, comment.as_deref())?;
            println!("{}", outcome.text);
            Ok(if strict && outcome.fell_back { 1 } else { 0 })
        }
        Command::Search(args) => {
            if args.text.trim().is_empty() {
                anyhow::bail!("search text cannot be empty");
            }
            let query = SearchQuery::new(args.text.clone())
                .with_case_sensitive(args.case_sensitive)
                .with_regex(args.regex)
                .with_obsolete(args.obsolete)
                .with_field(args.field.into())
                .with_paths(args.paths)
                .with_exclusions(args.exclude);
            let result = tscat::run_search(query)?;

            for (file, reason) in &result.skipped {
                eprintln!("{} skipped {}: {}", "warning:".yellow(), file.display(), reason);
            }

            if args.json {
                println!("{}", simple.to_json(&result.matches)?);
            } else if result.matches.is_empty() {
                println!("No matches found for '{}'", result.query);
            } else if args.simple {
                print!("{}", simple.format(&result.matches));
            } else {
                print!(
                    "{}",
                    formatter.format_matches(
                        &result.matches,
                        &result.query,
                        args.case_sensitive,
                        args.regex
                    )
                );
                println!(
                    "{} match(es) in {} catalog(s)",
                    result.matches.len(),
                    result.files_searched
                );
            }
            Ok(0)
        }
        Command::Lint {
            paths,
            min_severity,
            json,
        } => {
            let reports = tscat::run_lint(&paths)?;
            let has_errors = reports.iter().any(|(_, r)| r.has_errors());
            let reports: Vec<_> = reports
                .into_iter()
                .map(|(file, report)| (file, report.filter_severity(min_severity.into())))
                .collect();

            if json {
                println!("{}", simple.to_json(&reports)?);
            } else {
                for (file, report) in &reports {
                    print!("{}", formatter.format_lint(file, report));
                }
            }
            Ok(if has_errors { 1 } else { 0 })
        }
        Command::Stats {
            paths,
            contexts,
            json,
        } => {
            let all = tscat::run_stats(&paths)?;

            if json {
                println!("{}", simple.to_json(&all)?);
            } else {
                for (file, stats) in &all {
                    print!("{}", formatter.format_stats(file, stats));
                    if contexts {
                        for ctx in &stats.per_context {
                            println!(
                                "    {:<32} {:>4} active {:>4} obsolete {:>4} unfinished",
                                ctx.name, ctx.active, ctx.obsolete, ctx.unfinished
                            );
                        }
                    }
                }
            }
            Ok(0)
        }
        Command::Fmt {
            file,
            output,
            check,
            drop_obsolete,
        } => {
            let outcome = tscat::run_format(&file, drop_obsolete)?;
            if check {
                if outcome.changed {
                    println!("{} would be reformatted", file.display());
                    return Ok(1);
                }
                return Ok(0);
            }

            let target = output.unwrap_or_else(|| file.clone());
            fs::write(&target, &outcome.output)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            if outcome.dropped_obsolete > 0 {
                eprintln!("dropped {} obsolete message(s)", outcome.dropped_obsolete);
            }
            Ok(0)
        }
        Command::Dump {
            file,
            active_only,
            text,
        } => {
            let catalog = TsParser::parse_file(&file)?;
            let entries: Vec<_> = catalog
                .entries()
                .filter(|e| !active_only || e.status.is_active())
                .collect();
            if text {
                for entry in entries {
                    println!("{}", formatter.format_entry(entry));
                }
            } else {
                println!("{}", simple.to_json(&entries)?);
            }
            Ok(0)
        }
        Command::Locales { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let set = LocaleSet::discover(&dir)?;
            for language in set.languages() {
                let count = set.catalog(language).map(|c| c.len()).unwrap_or(0);
                let path = set
                    .path(language)
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{:<8} {:>5} messages  {}", language, count, path);
            }
            for (file, reason) in set.skipped() {
                eprintln!("{} skipped {}: {}", "warning:".yellow(), file.display(), reason);
            }
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_field_arg_conversion() {
        assert_eq!(SearchField::from(FieldArg::Source), SearchField::Source);
        assert_eq!(SearchField::from(FieldArg::Both), SearchField::Both);
    }

    #[test]
    fn test_severity_arg_conversion() {
        assert_eq!(Severity::from(SeverityArg::Warning), Severity::Warning);
    }

    #[test]
    fn test_parse_lookup_args() {
        let cli = Cli::try_parse_from(["tscat", "lookup", "zh.ts", "MainWindow", "Career", "--strict"])
            .unwrap();
        match cli.command {
            Command::Lookup { context, strict, .. } => {
                assert_eq!(context, "MainWindow");
                assert!(strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
