//! These structs provide the CLI interface for the spendlog CLI.

use crate::error::{Error, ErrorType, Result};
use crate::model::{Amount, Category, Currency, Expense, ExpenseDraft, FilterPatch, SortBy, SortDir};
use crate::utils;
use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendlog: A command-line tool for keeping track of personal expenses.
///
/// Record what you spend, filter and sort it, and see totals per category and per month. The
/// expenses are either kept on this machine or in a REST API of your choosing, see `spendlog init`.
///
/// Every command except init, login and logout requires you to be logged in. The login is a demo:
/// any email and password will do.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and its configuration file.
    ///
    /// This is the first command you should run. By default the expenses are only kept on this
    /// machine and a new install starts with a few demo expenses. Pass --api-url to keep them in
    /// a REST API instead.
    Init(InitArgs),
    /// Log in. Any non-blank email and password is accepted.
    Login(LoginArgs),
    /// Log out.
    Logout,
    /// Start an interactive session where commands share one store, so that a deletion can be
    /// undone and filters carry over from one command to the next.
    Shell,
    #[command(flatten)]
    Store(StoreCommand),
}

/// The commands that work on the expense store. These are available both from the command line
/// and inside `spendlog shell`.
#[derive(Subcommand, Debug, Clone)]
pub enum StoreCommand {
    /// List the expenses that match the filter.
    List(FilterArgs),
    /// Record a new expense.
    Add(AddArgs),
    /// Change an existing expense.
    Edit(EditArgs),
    /// Delete an expense. Inside `spendlog shell` this can be undone for a few seconds.
    Delete(DeleteArgs),
    /// Restore the most recently deleted expense.
    Undo,
    /// Show totals for the expenses that match the filter.
    Summary(FilterArgs),
    /// Show or change the currency used to display amounts.
    Currency(CurrencyArgs),
    /// List the available categories.
    Categories,
}

impl StoreCommand {
    /// The subcommand name, as typed by the user.
    pub fn name(&self) -> &'static str {
        match self {
            StoreCommand::List(_) => "list",
            StoreCommand::Add(_) => "add",
            StoreCommand::Edit(_) => "edit",
            StoreCommand::Delete(_) => "delete",
            StoreCommand::Undo => "undo",
            StoreCommand::Summary(_) => "summary",
            StoreCommand::Currency(_) => "currency",
            StoreCommand::Categories => "categories",
        }
    }
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendlog data and configuration is held. Defaults to ~/spendlog
    #[arg(long, env = "SPENDLOG_HOME", default_value_t = default_spendlog_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `spendlog init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the expense REST API, e.g. http://localhost:3000/api. Expenses are read
    /// from and written to `<URL>/expenses`. Leave this out to keep expenses on this machine only.
    #[arg(long)]
    api_url: Option<String>,

    /// Start with an empty list instead of the demo expenses.
    #[arg(long)]
    no_seed: bool,
}

impl InitArgs {
    pub fn new(api_url: Option<String>, no_seed: bool) -> Self {
        Self { api_url, no_seed }
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    pub fn seed_demo(&self) -> bool {
        !self.no_seed
    }
}

/// Args for the `spendlog login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    password: String,
}

impl LoginArgs {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Filter and sort options shared by `list` and `summary`. Options that are left out keep their
/// current value, which inside `spendlog shell` is whatever the previous command set.
#[derive(Debug, Parser, Clone, Default)]
pub struct FilterArgs {
    /// Only show this category. Pass an empty string to show all categories.
    #[arg(long)]
    category: Option<Clearable<Category>>,

    /// Only show expenses on or after this date (YYYY-MM-DD). Pass an empty string to clear.
    #[arg(long)]
    from: Option<Clearable<NaiveDate>>,

    /// Only show expenses on or before this date (YYYY-MM-DD). Pass an empty string to clear.
    #[arg(long)]
    to: Option<Clearable<NaiveDate>>,

    /// Only show expenses whose note contains this text, ignoring case.
    #[arg(long)]
    search: Option<String>,

    #[arg(long, value_enum)]
    sort_by: Option<SortBy>,

    #[arg(long, value_enum)]
    sort_dir: Option<SortDir>,

    /// Go back to the default filter (everything, newest first) before applying the options above.
    #[arg(long)]
    reset: bool,
}

impl FilterArgs {
    pub fn reset(&self) -> bool {
        self.reset
    }

    /// The options that were given, as a patch for the current filter.
    pub fn patch(&self) -> FilterPatch {
        let mut patch = FilterPatch::new();
        if let Some(Clearable(category)) = self.category {
            patch = patch.category(category);
        }
        if let Some(Clearable(from)) = self.from {
            patch = patch.from_date(from);
        }
        if let Some(Clearable(to)) = self.to {
            patch = patch.to_date(to);
        }
        if let Some(search) = &self.search {
            let search = search.trim();
            patch = patch.search((!search.is_empty()).then(|| search.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            patch = patch.sort_by(sort_by);
        }
        if let Some(sort_dir) = self.sort_dir {
            patch = patch.sort_dir(sort_dir);
        }
        patch
    }
}

/// Args for the `spendlog add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The amount spent, at least 0.01, e.g. 12.50
    #[arg(long)]
    amount: Amount,

    /// One of Food, Travel, Bills, Shopping, Health, Other
    #[arg(long)]
    category: Category,

    /// The date of the expense (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long)]
    note: Option<String>,
}

impl AddArgs {
    pub fn new(
        amount: Amount,
        category: Category,
        date: Option<NaiveDate>,
        note: Option<String>,
    ) -> Self {
        Self {
            amount,
            category,
            date,
            note,
        }
    }

    /// Builds the draft to create, failing with `ErrorType::Validation` if the amount is too
    /// small.
    pub fn draft(&self) -> Result<ExpenseDraft> {
        let draft = ExpenseDraft::new(
            self.amount,
            self.category,
            self.note.clone(),
            self.date.unwrap_or_else(utils::today),
        );
        draft
            .validate()
            .map_err(|e| Error::new(ErrorType::Validation, e))?;
        Ok(draft)
    }
}

/// Args for the `spendlog edit` command. Options that are left out are not changed.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the expense, as shown by `spendlog list`.
    id: String,

    #[arg(long)]
    amount: Option<Amount>,

    #[arg(long)]
    category: Option<Category>,

    #[arg(long)]
    date: Option<NaiveDate>,

    /// The new note. Pass an empty string to remove the note.
    #[arg(long)]
    note: Option<String>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            amount: None,
            category: None,
            date: None,
            note: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True if no field would change.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.date.is_none() && self.note.is_none()
    }

    /// Applies the given options to `expense`, then checks the result the same way `add` does.
    pub fn apply(&self, expense: &mut Expense) -> Result<()> {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(note) = &self.note {
            expense.note = (!note.trim().is_empty()).then(|| note.clone());
        }
        expense
            .to_draft()
            .validate()
            .map_err(|e| Error::new(ErrorType::Validation, e))
    }
}

/// Args for the `spendlog delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the expense, as shown by `spendlog list`.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `spendlog currency` command.
#[derive(Debug, Parser, Clone)]
pub struct CurrencyArgs {
    /// The currency code to switch to: MUR, USD, EUR, GBP or INR. Leave out to show the current
    /// currency.
    code: Option<Currency>,
}

impl CurrencyArgs {
    pub fn new(code: Option<Currency>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<Currency> {
        self.code
    }
}

/// One line of input to `spendlog shell`.
#[derive(Debug, Parser, Clone)]
#[command(no_binary_name = true, name = "spendlog>", disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShellCommand {
    #[command(flatten)]
    Store(StoreCommand),
    /// Leave the shell.
    #[command(alias = "quit")]
    Exit,
}

impl ShellLine {
    /// Parses a line typed into the shell. Returns `Ok(None)` for a blank line. Words are split
    /// on whitespace, and single or double quotes group words together, e.g.
    /// `add --amount 5 --category Food --note "fish and chips"`.
    ///
    /// A request for help is returned as an error carrying the help text.
    pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
        let words = split_words(line).map_err(|e| Error::new(ErrorType::Request, e))?;
        if words.is_empty() {
            return Ok(None);
        }
        let parsed = ShellLine::try_parse_from(words)
            .map_err(|e| Error::new(ErrorType::Request, anyhow!("{}", e.render())))?;
        Ok(Some(parsed.command))
    }
}

fn split_words(line: &str) -> anyhow::Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.get_or_insert_with(String::new).push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.get_or_insert_with(String::new);
            }
            (None, c) if c.is_whitespace() => words.extend(current.take()),
            (None, c) => current.get_or_insert_with(String::new).push(c),
        }
    }
    if let Some(q) = quote {
        bail!("Unterminated {q} quote in '{line}'");
    }
    words.extend(current);
    Ok(words)
}

/// An option value where an empty string means "none", so that a filter option can be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clearable<T>(pub Option<T>);

impl<T> FromStr for Clearable<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Clearable(None));
        }
        T::from_str(s)
            .map(|value| Clearable(Some(value)))
            .map_err(|e| anyhow!("{e}"))
    }
}

fn default_spendlog_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendlog"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SPENDLOG_HOME instead of relying on the default \
                spendlog home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("spendlog")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demo_expenses;

    fn parse(words: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("spendlog").chain(words.iter().copied())).unwrap()
    }

    #[test]
    fn test_list_flags() {
        let args = parse(&[
            "--home",
            "/tmp/x",
            "list",
            "--category",
            "food",
            "--from",
            "2025-11-01",
            "--sort-by",
            "amount",
            "--sort-dir",
            "asc",
        ]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/x"));
        let Command::Store(StoreCommand::List(filter)) = args.command() else {
            panic!("expected list, got {:?}", args.command());
        };
        let patch = filter.patch();
        assert_eq!(patch.category, Some(Some(Category::Food)));
        assert_eq!(
            patch.from_date,
            Some(Some(NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()))
        );
        assert_eq!(patch.to_date, None);
        assert_eq!(patch.sort_by, Some(SortBy::Amount));
        assert_eq!(patch.sort_dir, Some(SortDir::Asc));
    }

    #[test]
    fn test_empty_filter_value_clears() {
        let args = parse(&["summary", "--category", "", "--search", " "]);
        let Command::Store(StoreCommand::Summary(filter)) = args.command() else {
            panic!("expected summary");
        };
        let patch = filter.patch();
        assert_eq!(patch.category, Some(None));
        assert_eq!(patch.search, Some(None));
    }

    #[test]
    fn test_bad_category_is_rejected() {
        let err = Args::try_parse_from(["spendlog", "add", "--amount", "1", "--category", "Toys"])
            .unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
    }

    #[test]
    fn test_add_draft_validates_amount() {
        let args = AddArgs::new(Amount::from_str("0.001").unwrap(), Category::Food, None, None);
        let err = args.draft().unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);

        let args = AddArgs::new(
            Amount::from_str("$1,200.50").unwrap(),
            Category::Bills,
            None,
            Some("  ".into()),
        );
        let draft = args.draft().unwrap();
        assert_eq!(draft.date, utils::today());
        assert_eq!(draft.note, None);
    }

    #[test]
    fn test_edit_apply() {
        let mut expense = demo_expenses().remove(0);
        EditArgs::new(expense.id())
            .with_category(Category::Other)
            .with_note("")
            .apply(&mut expense)
            .unwrap();
        assert_eq!(expense.category, Category::Other);
        assert_eq!(expense.note, None);

        let err = EditArgs::new(expense.id())
            .with_amount(Amount::ZERO)
            .apply(&mut expense)
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }

    #[test]
    fn test_shell_line() {
        let command = ShellLine::parse_line(r#"add --amount 5 --category Food --note "fish and chips""#)
            .unwrap()
            .unwrap();
        let ShellCommand::Store(StoreCommand::Add(add)) = command else {
            panic!("expected add");
        };
        assert_eq!(add.draft().unwrap().note.as_deref(), Some("fish and chips"));

        assert!(ShellLine::parse_line("   ").unwrap().is_none());
        assert!(matches!(
            ShellLine::parse_line("quit").unwrap(),
            Some(ShellCommand::Exit)
        ));
        let err = ShellLine::parse_line("delete 'abc").unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
        assert!(ShellLine::parse_line("init").is_err());
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words(r#"a  "b c" d'e f'g ''"#).unwrap(),
            vec!["a", "b c", "de fg", ""]
        );
    }
}
