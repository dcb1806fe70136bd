use anyhow::{Context, Result, anyhow, bail};
use ghosttrack_core::{DomainId, Outcome};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select {
        domain: DomainId,
        outcome: Outcome,
        ghost: String,
    },
    Reset(DomainId),
    Undo(DomainId),
    Toggle(String),
    PartyAdd {
        nickname: String,
        count: String,
    },
    /// Zero-based party index.
    PartyAdjust {
        index: usize,
        delta: i32,
    },
    PartyRemove(usize),
    Stats,
    ExtStats,
    Remaining,
    Party,
    Search(String),
    Help,
    Quit,
}

pub const HELP: &str = "\
identify <ghost>        count an identification (session + cumulative)
reject <ghost>          count a rejection (session + cumulative)
identify-ext <ghost>    count an identification in the cumulative stats only
reject-ext <ghost>      count a rejection in the cumulative stats only
reset <domain>          reset ghosts | extended | remaining | party
undo <domain>           undo the last change of a domain
toggle <name>           cross a ghost off the remaining list, or bring it back
party add <nick> [n]    add a party member starting at n (default 0)
party inc|dec <pos>     adjust a party member by one (positions start at 1)
party rm <pos>          remove a party member
stats | ext-stats       show session or cumulative statistics
remaining | party       show the checklist or the party list
search <text>           list ghost names containing text
help | quit";

/// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
///
/// # Errors
///
/// Returns an error describing the problem when the line is not a known command.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (head, rest) = split_word(line);
    let command = match head.to_lowercase().as_str() {
        "identify" | "id" => select(DomainId::Ghosts, Outcome::Identified, rest)?,
        "reject" | "rej" => select(DomainId::Ghosts, Outcome::Rejected, rest)?,
        "identify-ext" => select(DomainId::Extended, Outcome::Identified, rest)?,
        "reject-ext" => select(DomainId::Extended, Outcome::Rejected, rest)?,
        "reset" => Command::Reset(domain(rest)?),
        "undo" => Command::Undo(domain(rest)?),
        "toggle" => Command::Toggle(required(rest, "toggle needs a ghost name")?),
        "party" if rest.is_empty() => Command::Party,
        "party" => party(rest)?,
        "stats" => Command::Stats,
        "ext-stats" => Command::ExtStats,
        "remaining" => Command::Remaining,
        "search" => Command::Search(rest.to_string()),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("unknown command `{other}` (try `help`)"),
    };
    Ok(Some(command))
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    }
}

fn required(text: &str, message: &'static str) -> Result<String> {
    if text.is_empty() {
        bail!(message);
    }
    Ok(text.to_string())
}

fn select(domain: DomainId, outcome: Outcome, rest: &str) -> Result<Command> {
    let ghost = required(rest, "expected a ghost name")?;
    Ok(Command::Select {
        domain,
        outcome,
        ghost,
    })
}

fn domain(text: &str) -> Result<DomainId> {
    let name = if text.is_empty() { "ghosts" } else { text };
    name.to_lowercase()
        .parse::<DomainId>()
        .map_err(|()| anyhow!("unknown domain `{name}`"))
}

fn position(text: &str) -> Result<usize> {
    let position: usize = text
        .parse()
        .with_context(|| format!("`{text}` is not a party position"))?;
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("party positions start at 1"))
}

/// Nickname and optional trailing count. The last word is the count only when
/// it parses as an integer, so nicknames may contain spaces.
fn split_count(text: &str) -> (&str, &str) {
    match text.rsplit_once(char::is_whitespace) {
        Some((nickname, count)) if count.parse::<i32>().is_ok() => (nickname.trim(), count),
        _ => (text, ""),
    }
}

fn party(rest: &str) -> Result<Command> {
    let (action, args) = split_word(rest);
    match action {
        "add" => {
            let (nickname, count) = split_count(args);
            Ok(Command::PartyAdd {
                nickname: required(nickname, "party add needs a nickname")?,
                count: count.to_string(),
            })
        }
        "inc" | "+" => Ok(Command::PartyAdjust {
            index: position(args)?,
            delta: 1,
        }),
        "dec" | "-" => Ok(Command::PartyAdjust {
            index: position(args)?,
            delta: -1,
        }),
        "rm" | "remove" => Ok(Command::PartyRemove(position(args)?)),
        "list" => Ok(Command::Party),
        other => bail!("unknown party action `{other}`"),
    }
}
