mod debug_report;

use layout_reducer::api::{self, Triage};
use layout_reducer::materialize::render_document;
use layout_reducer::merge::canonical_order;
use layout_reducer::reduce::CommandOracle;
use layout_reducer::rules::{MatchSummary, MatchTarget, RuleMatcher, RuleStore, default_rule_name, derive_rule};
use layout_reducer::storage::{load_subject, save_subject, scan_subjects};
use layout_reducer::{Config, Error, FileMaterializer, Result};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "LAYOUT_REDUCER_LOG";

fn main() {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    init_tracing(cli.verbosity);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

enum Command {
    Inspect { subject: PathBuf },
    Render { subject: PathBuf, out: Option<PathBuf> },
    Minify { subject: PathBuf, out: Option<PathBuf> },
    Merge { dir: PathBuf, name: Option<String> },
    Check { dir: PathBuf },
}

struct CliConfig {
    command: Command,
    config: Option<PathBuf>,
    rules: Option<PathBuf>,
    color: bool,
    verbosity: u8,
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn run(cli: &CliConfig) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(rules) = &cli.rules {
        config.rules_file = Some(rules.clone());
    }

    match &cli.command {
        Command::Inspect { subject } => inspect(&config, subject, cli.color),
        Command::Render { subject, out } => render(&config, subject, out.as_deref()),
        Command::Minify { subject, out } => minify(&config, subject, out.as_deref(), cli.color),
        Command::Merge { dir, name } => merge(&config, dir, name.as_deref(), cli.color),
        Command::Check { dir } => check(&config, dir, cli.color),
    }
}

fn load_matcher(config: &Config) -> Result<Option<RuleMatcher>> {
    let Some(path) = &config.rules_file else {
        return Ok(None);
    };
    let store = RuleStore::load(path)?;
    tracing::debug!(rules = store.len(), path = %path.display(), "rules loaded");
    Ok(Some(RuleMatcher::new(store.rules())?))
}

fn inspect(config: &Config, path: &Path, color: bool) -> Result<()> {
    let subject = load_subject(path)?;
    debug_report::print_subject(path, &subject, color);
    if let Some(matcher) = load_matcher(config)? {
        let matches = matcher.evaluate(&MatchTarget::from_subject(&subject));
        let mut summary = MatchSummary::default();
        for m in &matches {
            summary.record(m);
        }
        debug_report::print_matches(&matches, &summary, color);
    }
    Ok(())
}

fn derived_path(config: &Config, subject: &Path, suffix: &str) -> PathBuf {
    let stem = subject.file_stem().and_then(|s| s.to_str()).unwrap_or("subject");
    config.output_dir.join(format!("{stem}{suffix}"))
}

fn render(config: &Config, path: &Path, out: Option<&Path>) -> Result<()> {
    let subject = load_subject(path)?;
    let out = out.map(Path::to_path_buf).unwrap_or_else(|| derived_path(config, path, ".html"));
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&out, render_document(&subject))?;
    println!("{}", out.display());
    Ok(())
}

fn minify(config: &Config, path: &Path, out: Option<&Path>, color: bool) -> Result<()> {
    if config.oracle_command.is_empty() {
        return Err(Error::Config { message: "minify needs oracle-command in the configuration".to_string() });
    }
    let subject = load_subject(path)?;
    let matcher = if config.skip_known_bugs { load_matcher(config)? } else { None };
    let mut oracle = CommandOracle::new(
        &config.oracle_command,
        config.oracle_timeout(),
        FileMaterializer::new(&config.output_dir),
    )?;

    let triage = api::triage(subject, &mut oracle, matcher.as_ref(), &config.reduce_options())?;
    debug_report::print_triage(&triage, color);

    if let Triage::Reduced { reduction, .. } = &triage {
        let out = out.map(Path::to_path_buf).unwrap_or_else(|| derived_path(config, path, ".min.json"));
        save_subject(&out, &reduction.subject)?;
        println!("{}", out.display());
    }
    Ok(())
}

fn merge(config: &Config, dir: &Path, name: Option<&str>, color: bool) -> Result<()> {
    let mut subjects: Vec<_> = scan_subjects(dir)?.into_iter().map(|stored| stored.subject).collect();
    canonical_order(&mut subjects);

    let generalized = api::generalize_subjects(&subjects)?;
    debug_report::print_generalized(&generalized, subjects.len(), color);

    let name = name.map(str::to_string).unwrap_or_else(default_rule_name);
    let rule = derive_rule(name, &generalized);
    match &config.rules_file {
        Some(path) => {
            let added = RuleStore::append_to_file(path, rule.clone())?;
            debug_report::print_rule(&rule, Some((path.as_path(), added)), color);
        }
        None => debug_report::print_rule(&rule, None, color),
    }
    Ok(())
}

fn check(config: &Config, dir: &Path, color: bool) -> Result<()> {
    let Some(matcher) = load_matcher(config)? else {
        return Err(Error::Config { message: "check needs a rule store (--rules or rules-file)".to_string() });
    };
    let report = api::check_subjects(dir, &matcher)?;
    debug_report::print_check(&report, color);
    Ok(())
}

fn parse_args() -> std::result::Result<CliConfig, String> {
    let mut command_name: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut out: Option<PathBuf> = None;
    let mut name: Option<String> = None;
    let mut config: Option<PathBuf> = None;
    let mut rules: Option<PathBuf> = None;
    let mut color = io::stdout().is_terminal();
    let mut verbosity = 0u8;
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("layout-reducer {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "--config" => config = Some(value_of(&mut args, "--config")?.into()),
            "--rules" => rules = Some(value_of(&mut args, "--rules")?.into()),
            "--out" | "-o" => out = Some(value_of(&mut args, "--out")?.into()),
            "--name" => name = Some(value_of(&mut args, "--name")?),
            _ if arg.starts_with("--config=") => config = Some(arg.trim_start_matches("--config=").into()),
            _ if arg.starts_with("--rules=") => rules = Some(arg.trim_start_matches("--rules=").into()),
            _ if arg.starts_with("--out=") => out = Some(arg.trim_start_matches("--out=").into()),
            _ if arg.starts_with("--name=") => name = Some(arg.trim_start_matches("--name=").to_string()),
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ if command_name.is_none() => command_name = Some(arg),
            _ => positional.push(arg),
        }
    }

    let Some(command_name) = command_name else {
        return Err(format!("error: no command given\n\n{}", help_text()));
    };
    let target = match positional.as_slice() {
        [one] => PathBuf::from(one),
        [] => return Err(format!("error: '{command_name}' expects a path")),
        _ => return Err(format!("error: '{command_name}' expects exactly one path")),
    };

    let command = match command_name.as_str() {
        "inspect" => Command::Inspect { subject: target },
        "render" => Command::Render { subject: target, out },
        "minify" => Command::Minify { subject: target, out },
        "merge" => Command::Merge { dir: target, name },
        "check" => Command::Check { dir: target },
        other => return Err(format!("error: unknown command '{other}'\n\n{}", help_text())),
    };

    Ok(CliConfig { command, config, rules, color, verbosity })
}

fn value_of(args: &mut impl Iterator<Item = String>, flag: &str) -> std::result::Result<String, String> {
    args.next().ok_or_else(|| format!("error: {flag} expects a value"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "layout-reducer {version}

Shrink, generalize and recognize layout-bug test subjects.

Usage:
  layout-reducer [OPTIONS] <command> <path>

Commands:
  inspect <subject.json>     Print a subject's tree, overrides and signature,
                             and how the known-bug rules score it.
  render <subject.json>      Write the subject as an HTML page.
  minify <subject.json>      Reduce a failing subject with the configured oracle,
                             unless a known-bug rule already matches it.
  merge <dir>                Generalize every *run_subject*.json under <dir> and
                             derive a rule (appended to the rule store if set).
  check <dir>                Count the subjects under <dir> matched by the rules.

Options:
  --config <file>            JSON configuration file.
  --rules <file>             Rule store; overrides rules-file from the config.
  -o, --out <file>           Output file for render / minify.
                             Default: <output-dir>/<stem>.html or .min.json
  --name <name>              Rule name for merge. Default: current timestamp.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -v, -vv                    Log at info / debug level to stderr.
                             Otherwise {log_env} sets the filter (default: warn).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Runtime error (I/O, invalid subject or rule file, oracle failure).
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
