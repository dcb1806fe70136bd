mod commands;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use ghosttrack_core::{DomainStorage, Session, SessionConfig};
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write, stdin, stdout};
use std::path::PathBuf;

use commands::{Command, HELP, parse_line};
use report::{ReportFormat, Reporter};

#[derive(Debug, Parser)]
#[command(name = "ghosttrack", version)]
#[command(
    about = "Track ghost identifications, party counters and overlay files from line commands"
)]
struct Args {
    /// Directory holding the persisted domain files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory for overlay text files (defaults to the data directory)
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// JSON session configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Skip writing overlay text files
    #[arg(long)]
    no_export: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = build_config(&args)?;
    let input = open_input(&args)?;
    let output = OutputTarget::new(args.output.clone())?;
    let mut reporter = Reporter::new(ReportFormat::parse(&args.report), cfg.export.columns, output);

    let mut session = Session::open(&cfg);
    info!("tracking session in {}", cfg.data_dir.display());
    run(&mut session, input, &mut reporter)?;
    reporter.into_inner().flush()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_config(args: &Args) -> Result<SessionConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        cfg.data_dir.clone_from(dir);
    }
    if let Some(dir) = &args.export_dir {
        cfg.export_dir = Some(dir.clone());
    }
    if args.no_export {
        cfg.export.enabled = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn open_input(args: &Args) -> Result<Box<dyn BufRead>> {
    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(stdin()))),
    }
}

fn run<S, W>(
    session: &mut Session<S>,
    input: impl BufRead,
    reporter: &mut Reporter<W>,
) -> Result<()>
where
    S: DomainStorage,
    W: Write,
{
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                reporter.warning("<unreadable line>", &err.to_string())?;
                continue;
            }
            Err(err) => return Err(err).context("failed to read command input"),
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                reporter.warning(line.trim(), &format!("{err:#}"))?;
                continue;
            }
        };
        debug!("command: {command:?}");
        if command == Command::Quit {
            break;
        }
        execute(session, command, line.trim(), reporter)?;
    }
    Ok(())
}

fn execute<S, W>(
    session: &mut Session<S>,
    command: Command,
    line: &str,
    reporter: &mut Reporter<W>,
) -> Result<()>
where
    S: DomainStorage,
    W: Write,
{
    let outcome = match command {
        Command::Select {
            domain,
            outcome,
            ghost,
        } => session.select_outcome(domain, &ghost, outcome),
        Command::Reset(domain) => session.reset_domain(domain),
        Command::Undo(domain) => session.undo_domain(domain),
        Command::Toggle(name) => session.toggle_remaining(&name),
        Command::PartyAdd { nickname, count } => session.add_party_entry(&nickname, &count),
        Command::PartyAdjust { index, delta } => session.adjust_party_entry(index, delta),
        Command::PartyRemove(index) => session.remove_party_entry(index),
        Command::Stats => return reporter.stats("Session", session.stats()),
        Command::ExtStats => return reporter.stats("Cumulative", &session.extended_stats()),
        Command::Remaining => return reporter.remaining(session.remaining()),
        Command::Party => return reporter.party(session.party()),
        Command::Search(query) => return reporter.search(&query, &session.search_ghosts(&query)),
        Command::Help => return reporter.help(HELP),
        Command::Quit => return Ok(()),
    };
    reporter.outcome(line, &outcome)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            colored::control::set_override(false);
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghosttrack_core::{Catalog, ExportConfig, ExportWriter, MemoryStorage};

    fn base_args() -> Args {
        Args {
            data_dir: None,
            export_dir: None,
            config: None,
            script: None,
            report: "console".to_string(),
            output: None,
            verbose: false,
            no_export: false,
        }
    }

    fn session() -> Session<MemoryStorage> {
        let cfg = ExportConfig {
            enabled: false,
            ..ExportConfig::default()
        };
        Session::with_storage(
            Catalog::ghosts(),
            MemoryStorage::new(),
            ExportWriter::new(std::env::temp_dir(), cfg),
        )
    }

    #[test]
    fn flags_override_directories() {
        let args = Args {
            data_dir: Some(PathBuf::from("/tmp/ghost-data")),
            export_dir: Some(PathBuf::from("/tmp/ghost-overlay")),
            no_export: true,
            ..base_args()
        };
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/ghost-data"));
        assert_eq!(cfg.export_dir(), PathBuf::from("/tmp/ghost-overlay").as_path());
        assert!(!cfg.export.enabled);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = Args {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..base_args()
        };
        let err = build_config(&args).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn run_stops_at_quit_and_keeps_going_after_errors() {
        let mut s = session();
        let mut reporter = Reporter::new(ReportFormat::Json, 3, Vec::new());
        let script = "identify ОНИ\nbogus\n\nreject ОНИ\nquit\nidentify ДУХ\n";
        run(&mut s, script.as_bytes(), &mut reporter).unwrap();
        assert_eq!(s.stats().identified_total, 1);
        assert_eq!(s.stats().rejected_total, 1);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("unknown command"));
    }

    #[test]
    fn run_skips_lines_that_are_not_utf8() {
        let mut s = session();
        let mut reporter = Reporter::new(ReportFormat::Json, 3, Vec::new());
        let script = [
            "identify ОНИ\n".as_bytes(),
            &b"\xff\xfe\n"[..],
            "reject ОНИ\n".as_bytes(),
        ]
        .concat();
        run(&mut s, script.as_slice(), &mut reporter).unwrap();
        assert_eq!(s.stats().identified_total, 1);
        assert_eq!(s.stats().rejected_total, 1);
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("<unreadable line>"));
    }
}
