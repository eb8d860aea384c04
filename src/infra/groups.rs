use crate::domain::{GroupMembershipError, ProcessRunner};
use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

/// System group that grants access to the container runtime socket.
pub const DOCKER_GROUP: &str = "docker";

/// Result of probing the current user's group memberships.
///
/// `Unsupported` means the host cannot answer the question, not that the
/// answer is "no" — callers must treat it as a skipped check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupProbe {
    Member,
    NotMember,
    Unsupported,
}

/// Checks whether the current user belongs to `group`.
///
/// An enumeration failure is reported as `Unsupported` after a warning:
/// introspection problems must never block a command on their own.
#[cfg(unix)]
pub fn probe_membership(group: &str) -> GroupProbe {
    match current_group_names() {
        Ok(names) => {
            if names.iter().any(|name| name == group) {
                GroupProbe::Member
            } else {
                GroupProbe::NotMember
            }
        }
        Err(err) => {
            warn!("não foi possível enumerar grupos do usuário: {err:#}");
            GroupProbe::Unsupported
        }
    }
}

#[cfg(not(unix))]
pub fn probe_membership(_group: &str) -> GroupProbe {
    GroupProbe::Unsupported
}

/// Pre-flight for `up`: fails with remediation instructions when the user is
/// not in `group`. A host without group introspection skips the check.
pub fn ensure_membership(group: &str) -> Result<()> {
    match probe_membership(group) {
        GroupProbe::Member => Ok(()),
        GroupProbe::NotMember => Err(GroupMembershipError::new(group).into()),
        GroupProbe::Unsupported => {
            debug!("introspecção de grupos indisponível, checagem ignorada");
            Ok(())
        }
    }
}

/// Adds the current user to the docker group and opens a fresh login session
/// so the new membership takes effect.
pub fn fix_up(runner: &dyn ProcessRunner) -> Result<i32> {
    let user = current_username()?;

    let adduser = vec![
        "sudo".to_string(),
        "adduser".to_string(),
        user,
        DOCKER_GROUP.to_string(),
    ];
    let code = runner.stream(&adduser, None)?;
    if code != 0 {
        return Ok(code);
    }

    let login = vec!["sudo".to_string(), "login".to_string()];
    runner.stream(&login, None)
}

/// Resolves the current user name: environment first, then the passwd entry.
pub fn current_username() -> Result<String> {
    for var in ["USER", "LOGNAME"] {
        if let Ok(user) = std::env::var(var)
            && !user.is_empty()
        {
            return Ok(user);
        }
    }

    #[cfg(unix)]
    if let Some(user) = passwd_username() {
        return Ok(user);
    }

    bail!("não foi possível determinar o usuário atual")
}

#[cfg(unix)]
fn current_group_names() -> Result<Vec<String>> {
    let count = unsafe { libc::getgroups(0, std::ptr::null_mut()) };
    if count < 0 {
        return Err(std::io::Error::last_os_error()).context("consultando número de grupos");
    }

    let mut gids = vec![0 as libc::gid_t; count as usize];
    let written = unsafe { libc::getgroups(count, gids.as_mut_ptr()) };
    if written < 0 {
        return Err(std::io::Error::last_os_error()).context("consultando grupos suplementares");
    }
    gids.truncate(written as usize);

    let mut names = Vec::with_capacity(gids.len());
    for gid in gids {
        // getgrgid hands back static storage; copy the name out immediately.
        let entry = unsafe { libc::getgrgid(gid) };
        if entry.is_null() {
            // gid sem grupo nomeado
            continue;
        }
        let name = unsafe { std::ffi::CStr::from_ptr((*entry).gr_name) };
        names.push(name.to_string_lossy().into_owned());
    }

    Ok(names)
}

#[cfg(unix)]
fn passwd_username() -> Option<String> {
    let entry = unsafe { libc::getpwuid(libc::geteuid()) };
    if entry.is_null() {
        return None;
    }
    let name = unsafe { std::ffi::CStr::from_ptr((*entry).pw_name) };
    Some(name.to_string_lossy().into_owned())
}
