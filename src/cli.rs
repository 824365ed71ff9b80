use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gitx", about = "A git worktree workspace manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Clone a repository and set up its default-branch worktree
    Clone {
        /// Repository, e.g. 'org/name' or a full git URL
        repo: String,
    },
    /// Jump to a branch's worktree, creating it if needed
    Go {
        /// Repository, e.g. 'org/name'
        repo: String,
        /// Branch to switch to
        #[arg(default_value = "main")]
        branch: String,
    },
    /// Manage worktree-based workspaces
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },
    /// Manage branches in a tracked repository
    Branch {
        #[command(subcommand)]
        command: BranchCommands,
    },
    /// Manage gitx configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Print shell integration wrapper
    ShellSetup {
        /// Emit the POSIX wrapper
        #[arg(long)]
        posix: bool,
        /// Emit the bash wrapper
        #[arg(long)]
        bash: bool,
        /// Emit the zsh wrapper
        #[arg(long)]
        zsh: bool,
        /// Emit the fish wrapper
        #[arg(long)]
        fish: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommands {
    /// Add a worktree for a branch
    Add { repo: String, branch: String },
    /// Jump to a branch's worktree, creating it if needed
    Go { repo: String, branch: String },
    /// List a repository's worktrees
    List { repo: String },
}

#[derive(Debug, Subcommand)]
pub enum BranchCommands {
    /// Create a branch from the root clone's HEAD and push it to origin
    Add { repo: String, branch: String },
    /// Delete a local branch
    Delete { repo: String, branch: String },
    /// List local branches
    List { repo: String },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value
    Get { key: String },
    /// Set a configuration value, e.g. globals.baseDir
    Set { key: String, value: String },
    /// Print the full configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_subcommand_parses() {
        let cli = Cli::try_parse_from(["gitx", "clone", "acme/widget"]).unwrap();
        assert!(matches!(cli.command, Commands::Clone { repo } if repo == "acme/widget"));
    }

    #[test]
    fn go_defaults_branch_to_main() {
        let cli = Cli::try_parse_from(["gitx", "go", "acme/widget"]).unwrap();
        assert!(
            matches!(cli.command, Commands::Go { repo, branch } if repo == "acme/widget" && branch == "main")
        );
    }

    #[test]
    fn go_with_explicit_branch() {
        let cli = Cli::try_parse_from(["gitx", "go", "acme/widget", "feature/x"]).unwrap();
        assert!(matches!(cli.command, Commands::Go { branch, .. } if branch == "feature/x"));
    }

    #[test]
    fn workspace_add_parses() {
        let cli = Cli::try_parse_from(["gitx", "workspace", "add", "acme/widget", "dev"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Workspace {
                command: WorkspaceCommands::Add { repo, branch }
            } if repo == "acme/widget" && branch == "dev"
        ));
    }

    #[test]
    fn workspace_go_parses() {
        let cli = Cli::try_parse_from(["gitx", "workspace", "go", "acme/widget", "dev"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Workspace {
                command: WorkspaceCommands::Go { .. }
            }
        ));
    }

    #[test]
    fn workspace_list_parses() {
        let cli = Cli::try_parse_from(["gitx", "workspace", "list", "acme/widget"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Workspace {
                command: WorkspaceCommands::List { repo }
            } if repo == "acme/widget"
        ));
    }

    #[test]
    fn workspace_add_requires_branch() {
        assert!(Cli::try_parse_from(["gitx", "workspace", "add", "acme/widget"]).is_err());
    }

    #[test]
    fn branch_subcommands_parse() {
        let cli = Cli::try_parse_from(["gitx", "branch", "add", "acme/widget", "dev"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Branch {
                command: BranchCommands::Add { .. }
            }
        ));

        let cli = Cli::try_parse_from(["gitx", "branch", "delete", "acme/widget", "dev"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Branch {
                command: BranchCommands::Delete { .. }
            }
        ));

        let cli = Cli::try_parse_from(["gitx", "branch", "list", "acme/widget"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Branch {
                command: BranchCommands::List { .. }
            }
        ));
    }

    #[test]
    fn config_get_set_show_parse() {
        let cli = Cli::try_parse_from(["gitx", "config", "get", "globals.editor"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Get { key }
            } if key == "globals.editor"
        ));

        let cli = Cli::try_parse_from(["gitx", "config", "set", "globals.editor", "vim"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Set { key, value }
            } if key == "globals.editor" && value == "vim"
        ));

        let cli = Cli::try_parse_from(["gitx", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Show
            }
        ));
    }

    #[test]
    fn shell_setup_flags_parse() {
        let cli = Cli::try_parse_from(["gitx", "shell-setup", "--fish"]).unwrap();
        assert!(matches!(cli.command, Commands::ShellSetup { fish: true, .. }));
    }

    #[test]
    fn no_subcommand_errors() {
        assert!(Cli::try_parse_from(["gitx"]).is_err());
    }

    #[test]
    fn help_flag_is_recognized() {
        let err = Cli::try_parse_from(["gitx", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_subcommand_errors() {
        let err = Cli::try_parse_from(["gitx", "bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }
}
