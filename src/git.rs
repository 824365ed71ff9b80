use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Every git operation the engine needs, behind a trait so workflows can be
/// driven by a fake in tests. Mutating operations run interactively
/// (inherited stdio) and report the child's exit status; status queries
/// capture their output and never mutate state.
pub trait GitOps {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<i32>;
    fn detach(&self, root: &Path) -> Result<i32>;
    fn add_worktree(&self, root: &Path, path: &Path, branch: &str) -> Result<i32>;
    fn fetch_all(&self, root: &Path) -> Result<i32>;
    fn branch_exists_local(&self, root: &Path, branch: &str) -> Result<bool>;
    fn branch_exists_remote(&self, root: &Path, branch: &str) -> Result<bool>;
    fn create_branch_from_head(&self, root: &Path, branch: &str) -> Result<i32>;
    fn push_set_upstream(&self, root: &Path, branch: &str) -> Result<i32>;
    fn delete_branch(&self, root: &Path, branch: &str) -> Result<i32>;
    fn list_branches(&self, root: &Path) -> Result<Vec<String>>;
    fn list_worktrees(&self, root: &Path) -> Result<Vec<PathBuf>>;
    fn default_branch(&self, root: &Path) -> Option<String>;
}

/// Runs git with inherited stdio so clones and pushes stay interactive
/// (progress bars, credential prompts). Returns the child's exit code.
fn run_git_interactive(dir: Option<&Path>, args: &[&str]) -> Result<i32> {
    log::debug!("running: git {}", args.join(" "));
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    let status = cmd.status().context("failed to run git - is it installed?")?;
    // Killed by signal: no code, treat as generic failure.
    Ok(status.code().unwrap_or(1))
}

/// Runs git with captured output, failing on non-zero exit.
fn run_git_captured(dir: &Path, args: &[&str]) -> Result<String> {
    log::debug!("running: git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .context("failed to run git - is it installed?")?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Runs git with captured output, reporting only whether it succeeded.
/// Used for ref-existence queries where failure is an answer, not an error.
fn git_succeeds(dir: &Path, args: &[&str]) -> Result<bool> {
    log::debug!("running: git {}", args.join(" "));
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .context("failed to run git - is it installed?")?;
    Ok(output.status.success())
}

/// Extract the path from each `worktree <path>` record line of
/// `git worktree list --porcelain`, preserving the reported order
/// (creation order, not sorted).
fn parse_worktree_list(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("worktree "))
        .map(PathBuf::from)
        .collect()
}

/// The real adapter: every operation is one blocking `git` subprocess.
pub struct GitProcess;

impl GitOps for GitProcess {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<i32> {
        let dest_str = dest.to_string_lossy();
        run_git_interactive(None, &["clone", url, &dest_str])
    }

    fn detach(&self, root: &Path) -> Result<i32> {
        run_git_interactive(Some(root), &["checkout", "--detach"])
    }

    fn add_worktree(&self, root: &Path, path: &Path, branch: &str) -> Result<i32> {
        let path_str = path.to_string_lossy();
        run_git_interactive(Some(root), &["worktree", "add", &path_str, branch])
    }

    fn fetch_all(&self, root: &Path) -> Result<i32> {
        run_git_interactive(Some(root), &["fetch", "--all"])
    }

    fn branch_exists_local(&self, root: &Path, branch: &str) -> Result<bool> {
        let ref_name = format!("refs/heads/{branch}");
        git_succeeds(root, &["show-ref", "--verify", &ref_name])
    }

    fn branch_exists_remote(&self, root: &Path, branch: &str) -> Result<bool> {
        let ref_name = format!("refs/remotes/origin/{branch}");
        git_succeeds(root, &["show-ref", "--verify", &ref_name])
    }

    fn create_branch_from_head(&self, root: &Path, branch: &str) -> Result<i32> {
        // `git branch` rather than `git checkout -b`: the root clone stays
        // detached so the new branch's ref is free for a worktree to claim.
        run_git_interactive(Some(root), &["branch", branch])
    }

    fn push_set_upstream(&self, root: &Path, branch: &str) -> Result<i32> {
        run_git_interactive(Some(root), &["push", "-u", "origin", branch])
    }

    fn delete_branch(&self, root: &Path, branch: &str) -> Result<i32> {
        run_git_interactive(Some(root), &["branch", "-D", branch])
    }

    fn list_branches(&self, root: &Path) -> Result<Vec<String>> {
        let out = run_git_captured(
            root,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
        )?;
        Ok(out.lines().map(|l| l.trim().to_string()).collect())
    }

    fn list_worktrees(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let out = run_git_captured(root, &["worktree", "list", "--porcelain"])?;
        Ok(parse_worktree_list(&out))
    }

    /// Try to detect the default branch name.
    /// Checks: main, master, then origin/HEAD symbolic ref.
    fn default_branch(&self, root: &Path) -> Option<String> {
        if git_succeeds(root, &["rev-parse", "--verify", "refs/heads/main"]).unwrap_or(false) {
            return Some("main".to_string());
        }
        if git_succeeds(root, &["rev-parse", "--verify", "refs/heads/master"]).unwrap_or(false) {
            return Some("master".to_string());
        }
        if let Ok(out) = run_git_captured(root, &["symbolic-ref", "refs/remotes/origin/HEAD"]) {
            let trimmed = out.trim();
            if let Some(branch) = trimmed.strip_prefix("refs/remotes/origin/") {
                return Some(branch.to_string());
            }
        }
        None
    }
}
