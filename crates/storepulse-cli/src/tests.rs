use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["storepulse-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_collect_command() {
    let cli = Cli::try_parse_from(["storepulse-cli", "collect"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Collect)));
}

#[test]
fn maps_defaults_to_headless_and_configured_max() {
    let cli = Cli::try_parse_from(["storepulse-cli", "maps"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Maps {
            visible: false,
            max: None
        })
    ));
}

#[test]
fn maps_accepts_visible_and_max() {
    let cli = Cli::try_parse_from(["storepulse-cli", "maps", "--visible", "--max", "120"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Maps {
            visible: true,
            max: Some(120)
        })
    ));
}

#[test]
fn maps_rejects_zero_max() {
    assert!(Cli::try_parse_from(["storepulse-cli", "maps", "--max", "0"]).is_err());
}

#[test]
fn maps_rejects_non_numeric_max() {
    assert!(Cli::try_parse_from(["storepulse-cli", "maps", "--max", "lots"]).is_err());
}

#[test]
fn collect_takes_no_flags() {
    assert!(Cli::try_parse_from(["storepulse-cli", "collect", "--visible"]).is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["storepulse-cli", "report"]).is_err());
}
