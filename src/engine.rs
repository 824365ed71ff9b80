use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{ConfigStore, WorkspaceRecord};
use crate::error::GitxError;
use crate::git::GitOps;
use crate::paths::{RepoId, is_full_url};

/// Answers an interactive yes/no question. The engine never touches a
/// terminal itself; the real prompt lives in main and tests inject canned
/// answers.
pub type Confirm<'a> = &'a dyn Fn(&str) -> Result<bool>;

/// Orchestrates PathResolver, GitOps, and ConfigStore into the workspace
/// lifecycle workflows. Config is loaded once by the caller and threaded
/// through; nothing here re-reads it from disk.
pub struct WorkspaceEngine<'a> {
    git: &'a dyn GitOps,
    confirm: Confirm<'a>,
}

fn check(status: i32, command: &str) -> Result<(), GitxError> {
    if status != 0 {
        return Err(GitxError::GitOperationFailed {
            command: command.to_string(),
            status,
        });
    }
    Ok(())
}

fn require_root(root: &Path) -> Result<(), GitxError> {
    if !root.exists() {
        return Err(GitxError::RepoRootMissing(root.to_path_buf()));
    }
    Ok(())
}

impl<'a> WorkspaceEngine<'a> {
    pub fn new(git: &'a dyn GitOps, confirm: Confirm<'a>) -> Self {
        WorkspaceEngine { git, confirm }
    }

    /// Clone workflow: clone the root, detach its checkout so the default
    /// branch ref is free, then claim that ref with the first worktree.
    /// Returns the default-branch worktree path.
    pub fn clone_workspace(&self, cfg: &mut ConfigStore, repo: &str) -> Result<PathBuf> {
        let id = RepoId::parse(repo)?;
        // A full URL is cloned verbatim (SSH stays SSH, non-GitHub hosts
        // stay put); the provider only synthesizes URLs for shorthand.
        let url = if is_full_url(repo) {
            repo.to_string()
        } else {
            id.clone_url(&cfg.globals().default_provider)?
        };
        let base = cfg.base_dir()?;
        let root = id.root_path(&base);

        if root.exists() {
            // A previous clone (possibly interrupted) left this directory.
            let overwrite = (self.confirm)(&format!(
                "Directory {} already exists. Overwrite it?",
                root.display()
            ))?;
            if !overwrite {
                return Err(GitxError::AlreadyExists(root).into());
            }
            eprintln!("removing {}...", root.display());
            fs::remove_dir_all(&root)
                .with_context(|| format!("could not remove {}", root.display()))?;
        }
        if let Some(parent) = root.parent() {
            fs::create_dir_all(parent)?;
        }

        eprintln!("cloning {} into {}...", url.bold(), root.display());
        check(self.git.clone_repo(&url, &root)?, "clone")?;

        eprintln!("detaching root checkout...");
        check(self.git.detach(&root)?, "checkout --detach")?;

        let default_branch = cfg
            .workspace(&id.id())
            .map(|record| record.default_branch)
            .filter(|branch| !branch.is_empty())
            .or_else(|| self.git.default_branch(&root))
            .ok_or(GitxError::NoDefaultBranch)?;

        let worktree = id.worktree_path(&base, &default_branch);
        eprintln!(
            "creating worktree for {} at {}...",
            default_branch.bold(),
            worktree.display()
        );
        check(
            self.git.add_worktree(&root, &worktree, &default_branch)?,
            "worktree add",
        )?;

        let record = WorkspaceRecord {
            name: id.name.clone(),
            url,
            org: Some(id.org.clone()),
            author: None,
            default_branch: default_branch.clone(),
            last_branch: default_branch,
        };
        cfg.upsert_workspace(&id.id(), &record)?;
        cfg.save()?;

        Ok(worktree)
    }

    /// Ensure-worktree workflow: fetch, establish that the branch exists
    /// (creating and pushing it after confirmation if not), then add the
    /// worktree at its deterministic path.
    pub fn ensure_worktree(
        &self,
        cfg: &mut ConfigStore,
        repo: &str,
        branch: &str,
    ) -> Result<PathBuf> {
        if branch.is_empty() {
            return Err(GitxError::EmptyBranchName.into());
        }
        let id = RepoId::parse(repo)?;
        let base = cfg.base_dir()?;
        let root = id.root_path(&base);
        require_root(&root)?;

        eprintln!("fetching remotes for {}...", id.to_string().bold());
        check(self.git.fetch_all(&root)?, "fetch --all")?;

        let exists = self.git.branch_exists_local(&root, branch)?
            || self.git.branch_exists_remote(&root, branch)?;
        if !exists {
            let create = (self.confirm)(&format!(
                "Branch '{branch}' does not exist locally or on origin. \
                 Create it from the current HEAD and push to origin?"
            ))?;
            if !create {
                return Err(GitxError::BranchCreationDeclined.into());
            }
            check(self.git.create_branch_from_head(&root, branch)?, "branch")?;
            check(
                self.git.push_set_upstream(&root, branch)?,
                "push -u origin",
            )?;
        }

        let worktree = id.worktree_path(&base, branch);
        eprintln!("creating worktree at {}...", worktree.display());
        check(self.git.add_worktree(&root, &worktree, branch)?, "worktree add")?;

        self.record_branch_switch(cfg, &id, branch)?;
        Ok(worktree)
    }

    /// Switch workflow: reuse the worktree if it exists, otherwise create it
    /// via the ensure-worktree workflow. Returns the path for the caller to
    /// cd into.
    pub fn go(&self, cfg: &mut ConfigStore, repo: &str, branch: &str) -> Result<PathBuf> {
        if branch.is_empty() {
            return Err(GitxError::EmptyBranchName.into());
        }
        let id = RepoId::parse(repo)?;
        let base = cfg.base_dir()?;
        let worktree = id.worktree_path(&base, branch);

        if !worktree.exists() {
            eprintln!("worktree does not exist, creating it...");
            return self.ensure_worktree(cfg, repo, branch);
        }

        self.record_branch_switch(cfg, &id, branch)?;
        Ok(worktree)
    }

    /// List workflow: the worktree paths exactly as git reports them.
    pub fn list(&self, cfg: &ConfigStore, repo: &str) -> Result<Vec<PathBuf>> {
        let id = RepoId::parse(repo)?;
        let base = cfg.base_dir()?;
        let root = id.root_path(&base);
        require_root(&root)?;
        self.git.list_worktrees(&root)
    }

    /// Create a branch from the root clone's HEAD and push it upstream,
    /// without creating a worktree.
    pub fn branch_add(&self, cfg: &ConfigStore, repo: &str, branch: &str) -> Result<()> {
        if branch.is_empty() {
            return Err(GitxError::EmptyBranchName.into());
        }
        let id = RepoId::parse(repo)?;
        let root = id.root_path(&cfg.base_dir()?);
        require_root(&root)?;
        check(self.git.create_branch_from_head(&root, branch)?, "branch")?;
        check(self.git.push_set_upstream(&root, branch)?, "push -u origin")?;
        Ok(())
    }

    /// Delete a local branch in the root clone.
    pub fn branch_delete(&self, cfg: &ConfigStore, repo: &str, branch: &str) -> Result<()> {
        if branch.is_empty() {
            return Err(GitxError::EmptyBranchName.into());
        }
        let id = RepoId::parse(repo)?;
        let root = id.root_path(&cfg.base_dir()?);
        require_root(&root)?;
        check(self.git.delete_branch(&root, branch)?, "branch -D")?;
        Ok(())
    }

    /// Local branch names in the root clone.
    pub fn branch_list(&self, cfg: &ConfigStore, repo: &str) -> Result<Vec<String>> {
        let id = RepoId::parse(repo)?;
        let root = id.root_path(&cfg.base_dir()?);
        require_root(&root)?;
        self.git.list_branches(&root)
    }

    /// Update the workspace record's `lastBranch` and persist. A repo that
    /// was never cloned through gitx gets a stub record with `defaultBranch`
    /// and `url` left empty, so clone-time detection still runs and no
    /// provider URL is invented.
    fn record_branch_switch(&self, cfg: &mut ConfigStore, id: &RepoId, branch: &str) -> Result<()> {
        let mut record = cfg.workspace(&id.id()).unwrap_or_else(|| WorkspaceRecord {
            name: id.name.clone(),
            org: Some(id.org.clone()),
            ..Default::default()
        });
        record.last_branch = branch.to_string();
        cfg.upsert_workspace(&id.id(), &record)?;
        cfg.save()?;
        Ok(())
    }
}
