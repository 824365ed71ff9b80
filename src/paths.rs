use std::path::{Path, PathBuf};

use crate::error::GitxError;

/// A repository identified by its org and name, as parsed from `org/name`
/// shorthand or a full git URL. All path derivation hangs off this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub org: String,
    pub name: String,
}

/// Whether the input is a full git URL rather than `org/name` shorthand.
pub fn is_full_url(input: &str) -> bool {
    input.starts_with("https://") || input.starts_with("git://") || input.starts_with("git@")
}

impl RepoId {
    /// Parse `org/name` shorthand or a full git URL.
    ///
    /// URLs are normalized by rewriting the scp-like `git@host:org/name`
    /// form into plain path segments (`:` becomes `/`), stripping a trailing
    /// `.git`, then taking the final two non-empty segments.
    pub fn parse(input: &str) -> Result<Self, GitxError> {
        if is_full_url(input) {
            return Self::parse_url(input);
        }

        let mut parts = input.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(org), Some(name), None) if !org.is_empty() && !name.is_empty() => Ok(RepoId {
                org: org.to_string(),
                name: name.to_string(),
            }),
            _ => Err(GitxError::InvalidRepoFormat(input.to_string())),
        }
    }

    fn parse_url(input: &str) -> Result<Self, GitxError> {
        // Drop the scheme, rewrite the scp-like `host:org/name` separator,
        // strip a trailing `.git`. The first remaining segment is the host.
        let cleaned = input
            .trim_start_matches("https://")
            .trim_start_matches("git://")
            .replace(':', "/");
        let cleaned = cleaned.strip_suffix(".git").unwrap_or(&cleaned);

        let segments: Vec<&str> = cleaned.split('/').filter(|s| !s.is_empty()).collect();
        // host + org + name at minimum
        if segments.len() < 3 {
            return Err(GitxError::InvalidRepoFormat(input.to_string()));
        }
        Ok(RepoId {
            org: segments[segments.len() - 2].to_string(),
            name: segments[segments.len() - 1].to_string(),
        })
    }

    /// The workspace id used to key `WorkspaceRecord`s in config.
    pub fn id(&self) -> String {
        format!("{}/{}", self.org, self.name)
    }

    /// Build the URL to clone from, for a given provider.
    pub fn clone_url(&self, provider: &str) -> Result<String, GitxError> {
        match provider {
            "github" => Ok(format!("https://github.com/{}/{}.git", self.org, self.name)),
            other => Err(GitxError::UnsupportedProvider(other.to_string())),
        }
    }

    /// `{base}/{org}/{name}` — where the root clone lives.
    pub fn root_path(&self, base: &Path) -> PathBuf {
        base.join(&self.org).join(&self.name)
    }

    /// `{base}/{org}/{name}/{name}-{suffix}` — where a branch's worktree
    /// lives, nested inside the root clone.
    pub fn worktree_path(&self, base: &Path, branch: &str) -> PathBuf {
        self.root_path(base)
            .join(format!("{}-{}", self.name, branch_suffix(branch)))
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.org, self.name)
    }
}

/// Worktree directory names must be single path segments, so branch names
/// like `feature/x` map to `feature-x`.
pub fn branch_suffix(branch: &str) -> String {
    branch.replace('/', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shorthand() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert_eq!(id.org, "acme");
        assert_eq!(id.name, "widget");
    }

    #[test]
    fn parse_https_url() {
        let id = RepoId::parse("https://github.com/acme/widget.git").unwrap();
        assert_eq!(id.org, "acme");
        assert_eq!(id.name, "widget");
    }

    #[test]
    fn parse_https_url_without_git_suffix() {
        let id = RepoId::parse("https://github.com/acme/widget").unwrap();
        assert_eq!(id, RepoId::parse("acme/widget").unwrap());
    }

    #[test]
    fn parse_scp_like_url() {
        let id = RepoId::parse("git@github.com:acme/widget.git").unwrap();
        assert_eq!(id.org, "acme");
        assert_eq!(id.name, "widget");
    }

    #[test]
    fn parse_git_protocol_url() {
        let id = RepoId::parse("git://github.com/acme/widget.git").unwrap();
        assert_eq!(id.id(), "acme/widget");
    }

    #[test]
    fn url_and_shorthand_agree() {
        let from_url = RepoId::parse("git@github.com:acme/widget.git").unwrap();
        let from_short = RepoId::parse("acme/widget").unwrap();
        assert_eq!(from_url, from_short);
    }

    #[test]
    fn parse_rejects_missing_slash() {
        assert!(matches!(
            RepoId::parse("widget"),
            Err(GitxError::InvalidRepoFormat(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!(RepoId::parse("/widget").is_err());
        assert!(RepoId::parse("acme/").is_err());
        assert!(RepoId::parse("/").is_err());
        assert!(RepoId::parse("").is_err());
    }

    #[test]
    fn parse_rejects_url_with_too_few_segments() {
        assert!(RepoId::parse("https://github.com/widget.git").is_err());
        assert!(RepoId::parse("git@github.com:widget").is_err());
    }

    #[test]
    fn parse_rejects_extra_segments_in_shorthand() {
        assert!(RepoId::parse("acme/widget/extra").is_err());
    }

    #[test]
    fn clone_url_github() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert_eq!(
            id.clone_url("github").unwrap(),
            "https://github.com/acme/widget.git"
        );
    }

    #[test]
    fn clone_url_unknown_provider() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert!(matches!(
            id.clone_url("sourcehut"),
            Err(GitxError::UnsupportedProvider(p)) if p == "sourcehut"
        ));
    }

    #[test]
    fn root_path_is_base_org_name() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert_eq!(
            id.root_path(Path::new("/ws")),
            PathBuf::from("/ws/acme/widget")
        );
    }

    #[test]
    fn worktree_path_nests_under_root() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert_eq!(
            id.worktree_path(Path::new("/ws"), "main"),
            PathBuf::from("/ws/acme/widget/widget-main")
        );
    }

    #[test]
    fn worktree_path_flattens_branch_slashes() {
        let id = RepoId::parse("acme/widget").unwrap();
        assert_eq!(
            id.worktree_path(Path::new("/ws"), "feature/x"),
            PathBuf::from("/ws/acme/widget/widget-feature-x")
        );
    }

    #[test]
    fn path_derivation_is_deterministic() {
        let id = RepoId::parse("acme/widget").unwrap();
        let base = Path::new("/ws");
        assert_eq!(id.root_path(base), id.root_path(base));
        assert_eq!(
            id.worktree_path(base, "feature/x"),
            id.worktree_path(base, "feature/x")
        );
    }

    #[test]
    fn branch_suffix_replaces_every_slash() {
        assert_eq!(branch_suffix("feature/x"), "feature-x");
        assert_eq!(branch_suffix("a/b/c"), "a-b-c");
        assert_eq!(branch_suffix("main"), "main");
        assert!(!branch_suffix("x/y/z").contains('/'));
    }
}
