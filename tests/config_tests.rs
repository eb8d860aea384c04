use anyhow::Result;
use composebox::ComposeService;
use composebox::infra::config::{load_config, project_settings};
use composebox::test_support::MockRunner;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_configured_project_drives_every_invocation() -> Result<()> {
    // 1. Setup temp config
    let temp_dir = tempfile::tempdir()?;
    fs::write(
        temp_dir.path().join("composebox.toml"),
        r#"
[project]
name = "Orbital"
directory = "/srv/orbital"

[compose]
binary = "podman-compose"
"#,
    )?;

    // 2. Load it the way the CLI does
    let config = load_config(temp_dir.path())?;
    let settings = project_settings(&config)?;

    // 3. Wire a service over the mock and issue a command
    let mock = Arc::new(MockRunner::new());
    let service = ComposeService::new(settings, mock.clone());
    service.ps(&[])?;

    // 4. Binary, flags and directory all come from the config
    let call = mock.last_call().unwrap();
    assert_eq!(
        call.argv,
        vec!["podman-compose", "-p", "orbital", "ps"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
    assert_eq!(call.cwd.as_deref(), Some(Path::new("/srv/orbital")));

    Ok(())
}

#[test]
fn test_extra_flags_override_reaches_the_command_line() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(
        temp_dir.path().join("composebox.toml"),
        r#"
[project]
name = "Orbital"
directory = "/srv/orbital"

[compose]
extra_flags = ["-p", "orbital", "--profile", "ci"]
"#,
    )?;

    let settings = project_settings(&load_config(temp_dir.path())?)?;
    let mock = Arc::new(MockRunner::new());
    let service = ComposeService::new(settings, mock.clone());

    service.down(true)?;

    assert_eq!(
        mock.last_call().unwrap().argv,
        vec![
            "docker-compose",
            "-p",
            "orbital",
            "--profile",
            "ci",
            "down",
            "--remove-orphans",
        ]
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>()
    );

    Ok(())
}

#[test]
fn test_missing_config_dir_falls_back_to_current_directory() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    // No composebox.toml at all: project is wherever the user stands.
    let settings = project_settings(&load_config(temp_dir.path())?)?;

    let mock = Arc::new(MockRunner::new());
    let service = ComposeService::new(settings, mock.clone());
    service.ps(&[])?;

    let call = mock.last_call().unwrap();
    assert_eq!(call.cwd.as_deref(), Some(std::env::current_dir()?.as_path()));

    Ok(())
}
