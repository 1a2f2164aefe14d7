use super::*;

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["ticketwatch", "run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run { dry_run: false }));
}

#[test]
fn parses_run_dry_run() {
    let cli = Cli::try_parse_from(["ticketwatch", "run", "--dry-run"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run { dry_run: true }));
}

#[test]
fn parses_watch_with_cron() {
    let cli = Cli::try_parse_from(["ticketwatch", "watch", "--cron", "0 0 * * * *"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Watch { ref cron } if cron == "0 0 * * * *"
    ));
}

#[test]
fn parses_check_command() {
    let cli = Cli::try_parse_from(["ticketwatch", "check"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Check));
}

#[test]
fn parses_state_show_command() {
    let cli =
        Cli::try_parse_from(["ticketwatch", "state", "show"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::State {
            command: StateCommands::Show
        }
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["ticketwatch"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["ticketwatch", "run", "--forever"]).is_err());
}
