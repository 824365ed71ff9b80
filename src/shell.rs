use anyhow::Result;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Top-level subcommands whose stdout is a worktree path the shell wrapper
/// should `cd` into. `workspace add`/`workspace go` are handled by a nested
/// case in the wrappers; `workspace list` and everything else pass through.
pub const CD_SUBCOMMANDS: &[&str] = &["clone", "go"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Returns the path to the shell's config file.
    fn config_path(&self) -> PathBuf {
        let home = dirs::home_dir().expect("could not determine home directory");
        match self {
            Shell::Fish => {
                if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
                    PathBuf::from(xdg).join("fish/config.fish")
                } else {
                    home.join(".config/fish/config.fish")
                }
            }
            Shell::Zsh => home.join(".zshrc"),
            Shell::Bash => home.join(".bashrc"),
        }
    }

    /// Returns the line that should be appended to the config file.
    fn setup_line(&self) -> &'static str {
        match self {
            Shell::Fish => "gitx shell-setup --fish | source",
            Shell::Bash | Shell::Zsh => r#"eval "$(gitx shell-setup)""#,
        }
    }

    fn function_output(&self) -> String {
        match self {
            Shell::Fish => fish_function(),
            Shell::Bash | Shell::Zsh => posix_function(),
        }
    }
}

/// Returns the POSIX shell function definition that wraps the `gitx` binary.
/// Subcommands in [`CD_SUBCOMMANDS`], plus `workspace add|go`, capture
/// stdout and `cd` into the result. All other subcommands run directly.
fn posix_function() -> String {
    let cases = CD_SUBCOMMANDS.join("|");
    format!(
        r#"gitx() {{
    case "$1" in
        {cases})
            local dir
            dir="$(command gitx "$@")" || return $?
            [ -n "$dir" ] && cd "$dir"
            ;;
        workspace)
            case "$2" in
                add|go)
                    local dir
                    dir="$(command gitx "$@")" || return $?
                    [ -n "$dir" ] && cd "$dir"
                    ;;
                *)
                    command gitx "$@"
                    ;;
            esac
            ;;
        *)
            command gitx "$@"
            ;;
    esac
}}"#
    )
}

/// Returns the fish shell function definition that wraps the `gitx` binary.
fn fish_function() -> String {
    let cases = CD_SUBCOMMANDS.join(" ");
    format!(
        r#"function gitx
    switch "$argv[1]"
        case {cases}
            set -l dir (command gitx $argv)
            or return $status
            if test -n "$dir"
                cd "$dir"; or return 1
            end
        case workspace
            switch "$argv[2]"
                case add go
                    set -l dir (command gitx $argv)
                    or return $status
                    if test -n "$dir"
                        cd "$dir"; or return 1
                    end
                case '*'
                    command gitx $argv
            end
        case '*'
            command gitx $argv
    end
end"#
    )
}

/// Detect the parent shell from environment variables.
fn detect_shell() -> Option<Shell> {
    // Check shell-specific version env vars first (most reliable).
    if std::env::var("FISH_VERSION").is_ok() {
        return Some(Shell::Fish);
    }
    if std::env::var("ZSH_VERSION").is_ok() {
        return Some(Shell::Zsh);
    }
    if std::env::var("BASH_VERSION").is_ok() {
        return Some(Shell::Bash);
    }
    // Fall back to $SHELL (login shell).
    if let Ok(shell) = std::env::var("SHELL") {
        if shell.ends_with("/fish") {
            return Some(Shell::Fish);
        }
        if shell.ends_with("/zsh") {
            return Some(Shell::Zsh);
        }
        if shell.ends_with("/bash") {
            return Some(Shell::Bash);
        }
    }
    None
}

/// Print the shell integration wrapper to stdout.
///
/// When stdout is a terminal and the shell can be detected, show a hint for
/// installing the setup line into the user's config file.
pub fn print_shell_setup(shell: Option<Shell>) -> Result<()> {
    let effective = shell.or_else(detect_shell);

    match effective {
        Some(s) => {
            println!("{}", s.function_output());
            if std::io::stdout().is_terminal() {
                eprintln!(
                    "# Add this to {}:",
                    crate::config::display_path(&s.config_path())
                );
                eprintln!("#   {}", s.setup_line());
            }
        }
        None => {
            // Can't detect shell, emit posix and show generic hint.
            println!("{}", posix_function());
            if std::io::stdout().is_terminal() {
                eprintln!("# Add this to your shell rc file:");
                eprintln!("#   eval \"$(gitx shell-setup)\"");
            }
        }
    }
    Ok(())
}
