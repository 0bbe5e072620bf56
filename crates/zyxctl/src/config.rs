//! Flag-aware config resolution: merges global CLI flags over the active
//! profile and produces a `RouterConfig`.

use secrecy::SecretString;

use zyxctl_config::{Config, Profile};
use zyxctl_core::RouterConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `RouterConfig` from the config file, profile, and CLI overrides.
pub fn build_router_config(global: &GlobalOpts, cfg: &Config) -> Result<RouterConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    match cfg.profiles.get(&profile_name) {
        Some(profile) => resolve_profile(profile, &profile_name, global, cfg),
        None => {
            // No profile: --host (or ZYXCTL_HOST) is required.
            let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: zyxctl_config::config_path().display().to_string(),
            })?;
            let adhoc = Profile {
                host,
                ..Profile::default()
            };
            resolve_profile(&adhoc, &profile_name, global, cfg)
        }
    }
}

/// Layer flag overrides (host, username, timeout, password) over `profile`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<RouterConfig, CliError> {
    let effective = Profile {
        host: global.host.clone().unwrap_or_else(|| profile.host.clone()),
        username: global.username.clone().or_else(|| profile.username.clone()),
        timeout: global.timeout.or(profile.timeout),
        ..profile.clone()
    };
    let password = global.password.clone().map(SecretString::from);

    Ok(zyxctl_config::profile_to_router_config(
        &effective,
        profile_name,
        &cfg.defaults,
        password,
    )?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["zyxctl"];
        argv.extend_from_slice(args);
        argv.push("traffic");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_home() -> Config {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                host: "192.168.0.1".into(),
                username: Some("admin".into()),
                password: Some("from-profile".into()),
                timeout: Some(12),
                poll_interval_ms: Some(3_000),
                ..Profile::default()
            },
        );
        cfg
    }

    #[test]
    fn profile_values_are_used_without_flags() {
        let cfg = config_with_home();
        let rc = build_router_config(&global(&["--password", "pw"]), &cfg).unwrap();

        assert_eq!(rc.url.as_str(), "http://192.168.0.1/");
        assert_eq!(rc.timeout, Duration::from_secs(12));
        assert_eq!(rc.poll_interval, Duration::from_millis(3_000));
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_home();
        let rc = build_router_config(
            &global(&[
                "--host",
                "10.0.0.1",
                "--username",
                "root",
                "--password",
                "from-flag",
                "--timeout",
                "3",
            ]),
            &cfg,
        )
        .unwrap();

        assert_eq!(rc.url.as_str(), "http://10.0.0.1/");
        assert_eq!(rc.username, "root");
        assert_eq!(rc.password.expose_secret(), "from-flag");
        assert_eq!(rc.timeout, Duration::from_secs(3));
    }

    #[test]
    fn host_flag_works_without_profile() {
        let rc = build_router_config(
            &global(&["--host", "192.168.1.1", "--password", "pw"]),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(rc.username, "admin");
        assert_eq!(rc.poll_interval, Duration::from_millis(10_000));
    }

    #[test]
    fn missing_host_and_profile_is_no_config() {
        let err = build_router_config(&global(&["--password", "pw"]), &Config::default())
            .unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }), "got: {err:?}");
    }
}
