use anyhow::{anyhow, Result};
use log::{debug, info};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use crate::account::{
    list_movements, try_close_account, try_request_loan, try_transfer, Account, AccountRepository,
    Session, SortToggle, Summary,
};
use crate::cli::commands::{Command, HELP};
use crate::cli::utils::{print_error, print_header, print_info, print_success, print_warning};
use crate::clock::Clock;
use crate::config::Config;
use crate::format::{
    format_currency, format_login_timestamp, timer_label, welcome_message, LOGGED_OUT_MESSAGE,
};
use crate::session::SessionTimer;

/// Whether the prompt loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal front end state: the accounts, who is logged in and their timer
pub struct App {
    repo: AccountRepository,
    clock: Box<dyn Clock>,
    config: Config,
    session: Option<Session>,
    timer: SessionTimer,
    remaining: Arc<AtomicU32>,
    expired: Arc<AtomicBool>,
    sort: SortToggle,
}

impl App {
    pub fn new(repo: AccountRepository, config: Config, clock: Box<dyn Clock>) -> Self {
        let timer = SessionTimer::from_config(&config.session);
        Self {
            repo,
            clock,
            remaining: Arc::new(AtomicU32::new(config.session.timeout_seconds)),
            expired: Arc::new(AtomicBool::new(false)),
            config,
            session: None,
            timer,
            sort: SortToggle::default(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn repository(&self) -> &AccountRepository {
        &self.repo
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!(
                "[{}] {}> ",
                timer_label(self.remaining.load(Ordering::SeqCst)),
                session.username()
            ),
            None => "bankist> ".to_string(),
        }
    }

    /// Log out if the session timer ran out. Returns true when it did.
    pub fn check_expiry(&mut self, out: &mut dyn Write) -> Result<bool> {
        if self.session.is_some() && self.expired.load(Ordering::SeqCst) {
            info!("Session expired, logging out");
            self.logout();
            print_warning(out, "Session expired")?;
            print_info(out, LOGGED_OUT_MESSAGE)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> Result<Flow> {
        self.check_expiry(out)?;
        debug!("Executing {:?}", command);

        match command {
            Command::Login { username, pin } => self.login(&username, pin, out)?,
            Command::Transfer { to, amount } => self.transfer(&to, amount, out)?,
            Command::Loan { amount } => self.loan(amount, out)?,
            Command::Close { username, pin } => self.close(&username, pin, out)?,
            Command::Sort => {
                self.current_account()?;
                let sorted = self.sort.toggle();
                let account = self.current_account()?;
                self.render_movements(account, sorted, out)?;
            }
            Command::Summary => {
                let account = self.current_account()?;
                self.render_summary(account, out)?;
            }
            Command::Movements => {
                let account = self.current_account()?;
                self.render_movements(account, self.sort.is_sorted(), out)?;
            }
            Command::Logout => {
                self.current_session()?;
                self.logout();
                print_info(out, LOGGED_OUT_MESSAGE)?;
            }
            Command::Help => print_info(out, HELP)?,
            Command::Quit => {
                self.logout();
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn current_session(&self) -> Result<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| anyhow!("You must be logged in to do that"))
    }

    fn current_account(&self) -> Result<&Account> {
        let session = self.current_session()?;
        self.repo
            .account(session)
            .ok_or_else(|| anyhow!("The logged in account no longer exists"))
    }

    fn restart_timer(&mut self) {
        let remaining = Arc::clone(&self.remaining);
        let expired = Arc::clone(&self.expired);

        // join the previous countdown before clearing what it wrote
        self.timer.stop();
        self.remaining.store(self.timer.timeout(), Ordering::SeqCst);
        self.expired.store(false, Ordering::SeqCst);

        self.timer.restart(
            move |left| remaining.store(left, Ordering::SeqCst),
            move || expired.store(true, Ordering::SeqCst),
        );
    }

    fn logout(&mut self) {
        self.timer.stop();
        self.session = None;
        self.sort.reset();
        self.expired.store(false, Ordering::SeqCst);
    }

    fn login(&mut self, username: &str, pin: u32, out: &mut dyn Write) -> Result<()> {
        let session = match self.repo.authenticate(username, pin, self.clock.as_ref()) {
            Some(session) => session,
            None => {
                print_error(out, "Invalid username or pin")?;
                return Ok(());
            }
        };

        self.session = Some(session);
        self.sort.reset();
        self.restart_timer();
        self.render_account(out)
    }

    fn transfer(&mut self, to: &str, amount: f64, out: &mut dyn Write) -> Result<()> {
        let session = self.current_session()?.clone();
        let result = try_transfer(&mut self.repo, &session, to, amount, self.clock.as_ref());

        // any transfer attempt counts as activity
        self.restart_timer();

        match result {
            Ok(()) => {
                print_success(out, &format!("Transferred {:.2} to {}", amount, to))?;
                self.render_account(out)
            }
            Err(rejection) => print_error(out, &format!("Transfer rejected: {}", rejection)),
        }
    }

    fn loan(&mut self, amount: f64, out: &mut dyn Write) -> Result<()> {
        let session = self.current_session()?.clone();
        let ratio = self.config.ledger.loan_ratio;

        match try_request_loan(&mut self.repo, &session, amount, ratio, self.clock.as_ref()) {
            Ok(()) => {
                self.restart_timer();
                print_success(out, &format!("Loan of {:.2} approved", amount))?;
                self.render_account(out)
            }
            Err(rejection) => print_error(out, &format!("Loan rejected: {}", rejection)),
        }
    }

    fn close(&mut self, username: &str, pin: u32, out: &mut dyn Write) -> Result<()> {
        let session = self.current_session()?.clone();

        match try_close_account(&mut self.repo, &session, username, pin) {
            Ok(account) => {
                self.logout();
                print_success(out, &format!("Account {} closed", account.username))?;
                print_info(out, LOGGED_OUT_MESSAGE)
            }
            Err(rejection) => print_error(out, &format!("Close rejected: {}", rejection)),
        }
    }

    fn render_account(&self, out: &mut dyn Write) -> Result<()> {
        let account = self.current_account()?;

        print_header(out, &welcome_message(&account.owner))?;
        print_info(
            out,
            &format!(
                "As of {}",
                format_login_timestamp(&self.clock.now(), &account.locale)
            ),
        )?;
        self.render_movements(account, self.sort.is_sorted(), out)?;
        self.render_summary(account, out)
    }

    /// Movements in the listed order reversed
    fn render_movements(&self, account: &Account, sorted: bool, out: &mut dyn Write) -> Result<()> {
        let rows = list_movements(account, sorted, self.clock.as_ref());

        print_header(out, if sorted { "Movements (sorted)" } else { "Movements" })?;
        for row in rows.iter().rev() {
            writeln!(
                out,
                "{:>3}. {:<10} {:<12} {:>14}",
                row.index,
                row.kind.as_str(),
                row.relative_date,
                format_currency(row.amount, &account.currency)
            )?;
        }
        Ok(())
    }

    fn render_summary(&self, account: &Account, out: &mut dyn Write) -> Result<()> {
        let summary = Summary::for_account(account, self.config.ledger.interest_threshold);
        let currency = &account.currency;

        writeln!(out)?;
        writeln!(out, "Balance:  {}", format_currency(summary.balance, currency))?;
        writeln!(
            out,
            "In: {}  Out: {}  Interest: {}",
            format_currency(summary.income, currency),
            format_currency(summary.outgoing, currency),
            format_currency(summary.interest, currency)
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::seed::demo_accounts;
    use chrono::{TimeZone, Utc};
    use std::thread;
    use std::time::Duration;

    fn app_with(config: Config) -> App {
        let repo = AccountRepository::new(demo_accounts().unwrap()).unwrap();
        let clock = FixedClock(Utc.with_ymd_and_hms(2021, 11, 28, 9, 30, 0).unwrap());
        App::new(repo, config, Box::new(clock))
    }

    fn app() -> App {
        app_with(Config::default())
    }

    fn short_session() -> Config {
        let mut config = Config::default();
        config.session.timeout_seconds = 1;
        config.session.tick_millis = 1;
        config
    }

    /// Poll `check_expiry` for up to five seconds
    fn wait_for_expiry(app: &mut App) -> bool {
        let mut out = Vec::new();
        for _ in 0..500 {
            if app.check_expiry(&mut out).unwrap() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    fn run(app: &mut App, line: &str) -> String {
        let mut out = Vec::new();
        let command = line.parse::<Command>().unwrap();
        if let Err(e) = app.execute(command, &mut out) {
            writeln!(out, "error: {}", e).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_login_renders_account() {
        let mut app = app();
        let output = run(&mut app, "login js 1111");

        assert!(output.contains("Welcome back, Jonas!"));
        assert!(output.contains("As of 28/11/2021, 09:30"));
        assert!(output.contains("Balance:  25952.59 EUR"));
        assert!(output.contains("2 days ago"));
        assert!(output.contains("Interest: 323.46 EUR"));
        assert_eq!(app.session().map(Session::username), Some("js"));
        assert!(app.prompt().starts_with("[05:00] js>"));
    }

    #[test]
    fn test_bad_login_keeps_logged_out() {
        let mut app = app();
        let output = run(&mut app, "login js 9999");
        assert!(output.contains("Invalid username or pin"));
        assert!(app.session().is_none());
        assert_eq!(app.prompt(), "bankist> ");
    }

    #[test]
    fn test_commands_require_login() {
        let mut app = app();
        assert!(run(&mut app, "transfer jd 10").contains("You must be logged in"));
        assert!(run(&mut app, "sort").contains("You must be logged in"));
    }

    #[test]
    fn test_transfer_and_loan() {
        let mut app = app();
        run(&mut app, "login js 1111");

        let output = run(&mut app, "transfer jd 200");
        assert!(output.contains("Transferred 200.00 to jd"));
        assert_eq!(app.repository().find_by_username("jd").unwrap().balance(), 11920.0);

        let output = run(&mut app, "transfer js 10");
        assert!(output.contains("Cannot transfer to your own account"));

        let output = run(&mut app, "loan 1000");
        assert!(output.contains("Loan of 1000.00 approved"));
    }

    #[test]
    fn test_close_logs_out() {
        let mut app = app();
        run(&mut app, "login jd 2222");

        assert!(run(&mut app, "close js 2222").contains("Username does not match"));
        let output = run(&mut app, "close jd 2222");
        assert!(output.contains("Account jd closed"));
        assert!(app.session().is_none());
        assert_eq!(app.repository().usernames(), vec!["js"]);
        assert!(run(&mut app, "login jd 2222").contains("Invalid username or pin"));
    }

    #[test]
    fn test_sort_toggles() {
        let mut app = app();
        run(&mut app, "login jd 2222");

        assert!(run(&mut app, "sort").contains("Movements (sorted)"));
        let output = run(&mut app, "sort");
        assert!(output.contains("Movements"));
        assert!(!output.contains("(sorted)"));
    }

    #[test]
    fn test_expired_session_is_logged_out() {
        let mut app = app();
        run(&mut app, "login js 1111");
        app.expired.store(true, Ordering::SeqCst);

        let output = run(&mut app, "summary");
        assert!(output.contains("Session expired"));
        assert!(output.contains(LOGGED_OUT_MESSAGE));
        assert!(output.contains("You must be logged in"));
        assert!(app.session().is_none());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        run(&mut app, "login js 1111");
        let mut out = Vec::new();
        assert_eq!(app.execute(Command::Quit, &mut out).unwrap(), Flow::Quit);
    }

    #[test]
    fn test_timer_expiry_logs_out() {
        let mut app = app_with(short_session());
        run(&mut app, "login js 1111");
        assert!(app.session().is_some());

        assert!(wait_for_expiry(&mut app));
        assert!(app.session().is_none());
        assert_eq!(app.prompt(), "bankist> ");
        assert_eq!(app.remaining.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_restart_clears_an_earlier_expiry() {
        let mut app = app_with(short_session());
        run(&mut app, "login js 1111");
        for _ in 0..500 {
            if app.expired.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(app.expired.load(Ordering::SeqCst));

        app.timer = SessionTimer::new(5, Duration::from_secs(60));
        app.restart_timer();

        assert!(!app.expired.load(Ordering::SeqCst));
        assert!(app.prompt().starts_with("[00:05] js>"));
        assert!(app.timer.is_running());
    }
}
