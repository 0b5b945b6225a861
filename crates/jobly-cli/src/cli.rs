use jobly::{CompanyFilter, JobFilter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Migrate,
    Companies,
    Jobs,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Migrate(ConnArgs),
    Companies(CompaniesCommand),
    Jobs(JobsCommand),
}

/// Where to find the database. Both fields are optional; see
/// [`crate::config::Settings::resolve`] for the fallback order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnArgs {
    pub config: Option<PathBuf>,
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub enum CompaniesCommand {
    List { conn: ConnArgs, filter: CompanyFilter },
    Get { conn: ConnArgs, handle: String },
}

impl CompaniesCommand {
    pub fn conn(&self) -> &ConnArgs {
        match self {
            Self::List { conn, .. } | Self::Get { conn, .. } => conn,
        }
    }
}

#[derive(Debug, Clone)]
pub enum JobsCommand {
    List { conn: ConnArgs, filter: JobFilter },
    Get { conn: ConnArgs, id: i32 },
}

impl JobsCommand {
    pub fn conn(&self) -> &ConnArgs {
        match self {
            Self::List { conn, .. } | Self::Get { conn, .. } => conn,
        }
    }
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "migrate" => parse_migrate(it.map(|s| s.as_str())),
        "companies" => parse_companies(it.map(|s| s.as_str())),
        "jobs" => parse_jobs(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

/// Consume `--config` / `--database` (both `--flag value` and `--flag=value`).
///
/// Returns `Ok(false)` when `token` is not a connection option.
fn take_conn_option<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
    conn: &mut ConnArgs,
) -> anyhow::Result<bool> {
    match token {
        "--config" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--config requires a value");
            };
            conn.config = Some(PathBuf::from(v));
        }
        _ if token.starts_with("--config=") => {
            conn.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
        }
        "--database" => {
            let Some(v) = it.next() else {
                anyhow::bail!("--database requires a value");
            };
            conn.database = Some(v.to_string());
        }
        _ if token.starts_with("--database=") => {
            conn.database = Some(token.trim_start_matches("--database=").to_string());
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Value of `--flag value` or `--flag=value` when `token` names `flag`.
fn take_value<'a>(
    flag: &str,
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<&'a str>> {
    if token == flag {
        let Some(v) = it.next() else {
            anyhow::bail!("{flag} requires a value");
        };
        return Ok(Some(v));
    }
    Ok(token
        .strip_prefix(flag)
        .and_then(|rest| rest.strip_prefix('=')))
}

fn parse_int(flag: &str, v: &str) -> anyhow::Result<i32> {
    v.parse::<i32>()
        .map_err(|_| anyhow::anyhow!("{flag} expects an integer, got {v:?}"))
}

fn parse_migrate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut conn = ConnArgs::default();
    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Migrate));
        }
        if !take_conn_option(token, &mut it, &mut conn)? {
            anyhow::bail!("unknown argument: {token}");
        }
    }
    Ok(Command::Migrate(conn))
}

fn parse_companies<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut conn = ConnArgs::default();
    let mut filter = CompanyFilter::default();
    let mut handle: Option<String> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Companies));
        }
        if take_conn_option(token, &mut it, &mut conn)? {
            continue;
        }
        if let Some(v) = take_value("--min-employees", token, &mut it)? {
            filter.min_employees = Some(parse_int("--min-employees", v)?);
        } else if let Some(v) = take_value("--max-employees", token, &mut it)? {
            filter.max_employees = Some(parse_int("--max-employees", v)?);
        } else if let Some(v) = take_value("--name", token, &mut it)? {
            filter.name_contains = Some(v.to_string());
        } else if token.starts_with('-') {
            anyhow::bail!("unknown argument: {token}");
        } else if subcmd.is_none() {
            subcmd = Some(token);
        } else if subcmd == Some("get") && handle.is_none() {
            handle = Some(token.to_string());
        } else {
            anyhow::bail!("unexpected argument: {token}");
        }
    }

    let cmd = match subcmd {
        None => return Ok(Command::Help(HelpTopic::Companies)),
        Some("list") => CompaniesCommand::List { conn, filter },
        Some("get") => {
            if filter != CompanyFilter::default() {
                anyhow::bail!("filters only apply to `jobly companies list`");
            }
            let Some(handle) = handle else {
                anyhow::bail!("missing <HANDLE>: expected `jobly companies get <HANDLE>`");
            };
            CompaniesCommand::Get { conn, handle }
        }
        Some(other) => anyhow::bail!("unknown subcommand: {other}"),
    };
    Ok(Command::Companies(cmd))
}

fn parse_jobs<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut subcmd: Option<&str> = None;
    let mut conn = ConnArgs::default();
    let mut filter = JobFilter::default();
    let mut id: Option<i32> = None;

    while let Some(token) = it.next() {
        if matches!(token, "-h" | "--help") {
            return Ok(Command::Help(HelpTopic::Jobs));
        }
        if take_conn_option(token, &mut it, &mut conn)? {
            continue;
        }
        if let Some(v) = take_value("--title", token, &mut it)? {
            filter.title_contains = Some(v.to_string());
        } else if let Some(v) = take_value("--min-salary", token, &mut it)? {
            filter.min_salary = Some(parse_int("--min-salary", v)?);
        } else if token == "--has-equity" {
            filter.has_equity = true;
        } else if token.starts_with('-') {
            anyhow::bail!("unknown argument: {token}");
        } else if subcmd.is_none() {
            subcmd = Some(token);
        } else if subcmd == Some("get") && id.is_none() {
            id = Some(parse_int("<ID>", token)?);
        } else {
            anyhow::bail!("unexpected argument: {token}");
        }
    }

    let cmd = match subcmd {
        None => return Ok(Command::Help(HelpTopic::Jobs)),
        Some("list") => JobsCommand::List { conn, filter },
        Some("get") => {
            if filter != JobFilter::default() {
                anyhow::bail!("filters only apply to `jobly jobs list`");
            }
            let Some(id) = id else {
                anyhow::bail!("missing <ID>: expected `jobly jobs get <ID>`");
            };
            JobsCommand::Get { conn, id }
        }
        Some(other) => anyhow::bail!("unknown subcommand: {other}"),
    };
    Ok(Command::Jobs(cmd))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - query and migrate a jobly database

USAGE:
  jobly <COMMAND> [OPTIONS]

COMMANDS:
  migrate       Apply pending schema migrations
  companies     List or show companies
  jobs          List or show jobs
  help          Print this message

GLOBAL OPTIONS:
  --config <FILE>       Config file path (default: jobly.toml if present)
  --database <URL>      Override database.url
  -h, --help            Print help

Without a config file, DATABASE_URL (and .env) is used.
Run `jobly <command> --help` for more."
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [OPTIONS]

Applies the migrations embedded in this binary.

OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Override database.url
  -h, --help            Print help"
            );
        }
        HelpTopic::Companies => {
            println!(
                "\
USAGE:
  jobly companies list [OPTIONS]
  jobly companies get <HANDLE> [OPTIONS]

LIST OPTIONS:
  --min-employees <N>   At least N employees
  --max-employees <N>   At most N employees
  --name <TEXT>         Name contains TEXT (case-insensitive)

GLOBAL OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Override database.url
  -h, --help            Print help"
            );
        }
        HelpTopic::Jobs => {
            println!(
                "\
USAGE:
  jobly jobs list [OPTIONS]
  jobly jobs get <ID> [OPTIONS]

LIST OPTIONS:
  --title <TEXT>        Title contains TEXT (case-insensitive)
  --min-salary <N>      Salary of at least N
  --has-equity          Only jobs offering equity

GLOBAL OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Override database.url
  -h, --help            Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("jobly")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_args_prints_root_help() {
        let cmd = parse_args(&args(&[])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
        let cmd = parse_args(&args(&["help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Root)));
    }

    #[test]
    fn parse_migrate_with_database() {
        let cmd = parse_args(&args(&["migrate", "--database=postgres://localhost/jobly"])).unwrap();
        let Command::Migrate(conn) = cmd else {
            panic!("expected migrate");
        };
        assert_eq!(conn.database.as_deref(), Some("postgres://localhost/jobly"));
        assert_eq!(conn.config, None);
    }

    #[test]
    fn parse_companies_list_filters() {
        let cmd = parse_args(&args(&[
            "companies",
            "list",
            "--min-employees",
            "2",
            "--max-employees=300",
            "--name",
            "net",
            "--config",
            "dev.toml",
        ]))
        .unwrap();
        let Command::Companies(CompaniesCommand::List { conn, filter }) = cmd else {
            panic!("expected companies list");
        };
        assert_eq!(conn.config, Some(PathBuf::from("dev.toml")));
        assert_eq!(
            filter,
            CompanyFilter {
                min_employees: Some(2),
                max_employees: Some(300),
                name_contains: Some("net".to_string()),
            }
        );
    }

    #[test]
    fn parse_companies_get() {
        let cmd = parse_args(&args(&["companies", "get", "c1"])).unwrap();
        let Command::Companies(CompaniesCommand::Get { handle, .. }) = cmd else {
            panic!("expected companies get");
        };
        assert_eq!(handle, "c1");

        assert!(parse_args(&args(&["companies", "get"])).is_err());
        assert!(parse_args(&args(&["companies", "get", "c1", "--name", "x"])).is_err());
    }

    #[test]
    fn parse_jobs_list_and_get() {
        let cmd = parse_args(&args(&["jobs", "list", "--min-salary", "150", "--has-equity"])).unwrap();
        let Command::Jobs(JobsCommand::List { filter, .. }) = cmd else {
            panic!("expected jobs list");
        };
        assert_eq!(filter.min_salary, Some(150));
        assert!(filter.has_equity);
        assert_eq!(filter.title_contains, None);

        let cmd = parse_args(&args(&["jobs", "get", "7"])).unwrap();
        let Command::Jobs(JobsCommand::Get { id, .. }) = cmd else {
            panic!("expected jobs get");
        };
        assert_eq!(id, 7);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["jobs", "get", "seven"])).is_err());
        assert!(parse_args(&args(&["jobs", "list", "--min-salary"])).is_err());
        assert!(parse_args(&args(&["jobs", "list", "--max-salary", "1"])).is_err());
        assert!(parse_args(&args(&["companies", "delete", "c1"])).is_err());
        assert!(parse_args(&args(&["users"])).is_err());
    }

    #[test]
    fn subcommand_help() {
        let cmd = parse_args(&args(&["jobs", "list", "--help"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Jobs)));
        let cmd = parse_args(&args(&["companies"])).unwrap();
        assert!(matches!(cmd, Command::Help(HelpTopic::Companies)));
    }
}
