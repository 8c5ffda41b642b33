mod controller;
mod format;
mod host;
mod options;
mod params;
mod render;
mod repl;
mod telemetry;

use clap::{ArgAction, Parser};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use controller::{Action, Controller, apply};
use host::Host;
use params::ParamSet;
use render::Playground;
use repl::{Command, HELP, parse_command};

#[derive(Parser, Debug)]
#[command(
    name = "dtf-playground",
    version,
    about = "An Intl.DateTimeFormat() playground with shareable URL state"
)]
struct Cli {
    /// Shareable state: a query string or a full URL
    #[arg(default_value = "")]
    state: String,

    /// Set the date/time (e.g. 2024-01-15T10:30); an empty value clears everything
    #[arg(long)]
    date: Option<String>,

    /// Select a value for a format parameter
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set: Vec<(String, String)>,

    /// Clear a format parameter
    #[arg(long = "unset", value_name = "NAME")]
    unset: Vec<String>,

    /// Clear every parameter except the date
    #[arg(long)]
    reset: bool,

    /// Start an interactive session
    #[arg(short, long)]
    interactive: bool,

    /// Print only the resulting query string
    #[arg(long)]
    url_only: bool,

    /// Locale used instead of the one resolved from the environment
    #[arg(long, env = "DTF_PLAYGROUND_LOCALE")]
    locale: Option<String>,

    /// Host time zone used instead of the system one
    #[arg(long = "time-zone", env = "DTF_PLAYGROUND_TZ")]
    time_zone: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))?;
    repl::set_param(name, value)?;
    Ok((name.to_string(), value.to_string()))
}

impl Cli {
    /// Edits requested on the command line, in application order.
    fn actions(&self) -> Result<Vec<Action>, String> {
        let mut actions = Vec::new();
        if let Some(date) = &self.date {
            actions.push(Action::SetDate(date.clone()));
        }
        for (name, value) in &self.set {
            actions.push(repl::set_param(name, value)?);
        }
        for name in &self.unset {
            actions.push(repl::set_param(name, "")?);
        }
        if self.reset {
            actions.push(Action::Reset);
        }
        Ok(actions)
    }
}

fn print_state(playground: &Playground, state: &ParamSet) {
    print!("{}", playground.render(state));
    println!();
    println!("URL: ?{}", state);
}

fn print_zones(playground: &Playground, filter: Option<&str>) {
    let filter = filter.map(str::to_ascii_lowercase);
    for zone in playground.time_zones() {
        if filter
            .as_deref()
            .is_none_or(|f| zone.to_ascii_lowercase().contains(f))
        {
            println!("{}", zone);
        }
    }
}

fn run_once(playground: &Playground, state: &ParamSet, url_only: bool) -> ExitCode {
    if url_only {
        println!("{}", state);
    } else {
        print_state(playground, state);
    }
    ExitCode::SUCCESS
}

fn run_repl(playground: &Playground, state: ParamSet) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut controller = Controller::new(state);

    println!("dtf-playground v{}", env!("CARGO_PKG_VERSION"));
    println!("Type `help` for commands. Press Ctrl-D to exit.");
    println!();
    print_state(playground, controller.state());

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => match parse_command(&line) {
                Ok(Command::Edit(action)) => {
                    let state = controller.dispatch(action);
                    print_state(playground, state);
                }
                Ok(Command::Show) => print_state(playground, controller.state()),
                Ok(Command::Url) => println!("?{}", controller.state()),
                Ok(Command::Zones(filter)) => print_zones(playground, filter.as_deref()),
                Ok(Command::Help) => println!("{}", HELP),
                Ok(Command::Quit) => return ExitCode::SUCCESS,
                Err(msg) => eprintln!("{}", msg),
            },
            Err(e) => {
                eprintln!("Read error: {e}");
                return ExitCode::from(1);
            }
        }
    }

    println!();
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    let host = match Host::detect(cli.locale.as_deref(), cli.time_zone.as_deref()) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };
    let actions = match cli.actions() {
        Ok(actions) => actions,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let playground = Playground::new(host);
    let state = ParamSet::parse(&cli.state);
    tracing::debug!(params = state.len(), edits = actions.len(), "initial state");
    let state = actions
        .into_iter()
        .fold(state, |state, action| apply(&state, action));

    if cli.interactive {
        return run_repl(&playground, state);
    }
    run_once(&playground, &state, cli.url_only)
}
