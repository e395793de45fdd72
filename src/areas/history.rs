use crate::artifacts::diff::diff_text::DiffText;
use crate::artifacts::history::commit::Commit;
use crate::artifacts::history::log_format::{LOG_PRETTY_FORMAT, parse_log};
use crate::artifacts::history::since::SinceExpr;
use anyhow::Context;
use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Read access to the origin codebase's version-control history
///
/// "Nothing there" answers (unknown commit, deleted file, empty diff) are values,
/// not errors. Errors are reserved for failures to talk to the backend at all.
pub trait History: Send + Sync {
    fn validate(&self) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Commits newer than `since`, newest first
    fn commits_since(
        &self,
        since: &SinceExpr,
        all_refs: bool,
    ) -> impl Future<Output = anyhow::Result<Vec<Commit>>> + Send;

    /// The commit with its file list, or an unresolved commit when unknown
    fn commit(&self, hash: &str) -> impl Future<Output = anyhow::Result<Commit>> + Send;

    fn diff(&self, hash: &str, path: &Path) -> impl Future<Output = anyhow::Result<DiffText>> + Send;

    /// File content as of `hash`, `None` when the file does not exist there
    fn file_at(
        &self,
        hash: &str,
        path: &Path,
    ) -> impl Future<Output = anyhow::Result<Option<String>>> + Send;
}

/// `History` backed by the `git` binary
#[derive(Debug, Clone)]
pub struct GitHistory {
    path: PathBuf,
    timeout: Duration,
}

impl GitHistory {
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        GitHistory { path, timeout }
    }

    /// Stdout of a successful run, `None` when git exits with a failure status
    async fn run(&self, args: Vec<OsString>) -> anyhow::Result<Option<String>> {
        let rendered = args
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!("git {rendered}");

        let mut command = Command::new("git");
        command
            .arg("-C")
            .arg(&self.path)
            .args(["--no-pager", "-c", "core.quotepath=off", "-c", "color.ui=never"])
            .args(&args)
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                anyhow::anyhow!(
                    "git {rendered} timed out after {}s",
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("failed to run git {rendered}"))?;

        if !output.status.success() {
            tracing::warn!(
                "git {rendered} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    fn is_revision(hash: &str) -> bool {
        !hash.is_empty() && !hash.starts_with('-') && !hash.chars().any(char::is_whitespace)
    }
}

impl History for GitHistory {
    async fn validate(&self) -> anyhow::Result<()> {
        let args = vec!["rev-parse".into(), "--git-dir".into()];
        if self.run(args).await?.is_none() {
            anyhow::bail!("{} is not a git repository", self.path.display());
        }
        Ok(())
    }

    async fn commits_since(&self, since: &SinceExpr, all_refs: bool) -> anyhow::Result<Vec<Commit>> {
        let mut args: Vec<OsString> = vec![
            "log".into(),
            format!("--since={}", since.to_git_arg()).into(),
            "--name-status".into(),
            LOG_PRETTY_FORMAT.into(),
        ];
        if all_refs {
            args.push("--all".into());
        }

        match self.run(args).await? {
            Some(output) => Ok(parse_log(&output)),
            None => anyhow::bail!("git log --since={since} failed"),
        }
    }

    async fn commit(&self, hash: &str) -> anyhow::Result<Commit> {
        if !Self::is_revision(hash) {
            tracing::warn!("ignoring invalid revision '{hash}'");
            return Ok(Commit::unresolved(hash));
        }

        let args = vec![
            "log".into(),
            "-1".into(),
            "--name-status".into(),
            LOG_PRETTY_FORMAT.into(),
            hash.into(),
            "--".into(),
        ];
        let commit = self
            .run(args)
            .await?
            .and_then(|output| parse_log(&output).into_iter().next())
            .unwrap_or_else(|| Commit::unresolved(hash));

        Ok(commit)
    }

    async fn diff(&self, hash: &str, path: &Path) -> anyhow::Result<DiffText> {
        if !Self::is_revision(hash) {
            return Ok(DiffText::empty());
        }

        let args = vec![
            "show".into(),
            "--format=".into(),
            "--no-color".into(),
            "--no-ext-diff".into(),
            hash.into(),
            "--".into(),
            path.as_os_str().to_owned(),
        ];

        Ok(self
            .run(args)
            .await?
            .map(|output| DiffText::parse_unified(&output))
            .unwrap_or_default())
    }

    async fn file_at(&self, hash: &str, path: &Path) -> anyhow::Result<Option<String>> {
        if !Self::is_revision(hash) {
            return Ok(None);
        }

        let object = format!("{hash}:{}", path.to_string_lossy().replace('\\', "/"));
        self.run(vec!["show".into(), object.into()]).await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;

    /// Canned history for exercising the analysis without a repository
    #[derive(Debug, Default)]
    pub struct MemoryHistory {
        pub commits: Vec<Commit>,
        pub diffs: HashMap<(String, PathBuf), String>,
        pub files: HashMap<(String, PathBuf), String>,
        pub broken: Vec<String>,
        pub unreachable: Vec<String>,
    }

    impl MemoryHistory {
        pub fn with_commit(mut self, commit: Commit) -> Self {
            self.commits.push(commit);
            self
        }

        pub fn with_diff(mut self, hash: &str, path: &str, diff: &str) -> Self {
            self.diffs
                .insert((hash.to_string(), PathBuf::from(path)), diff.to_string());
            self
        }

        pub fn with_file(mut self, hash: &str, path: &str, content: &str) -> Self {
            self.files
                .insert((hash.to_string(), PathBuf::from(path)), content.to_string());
            self
        }

        /// Every diff request for `hash` fails
        pub fn with_broken_diffs(mut self, hash: &str) -> Self {
            self.broken.push(hash.to_string());
            self
        }

        /// Looking up `hash` fails as if the backend timed out
        pub fn with_unreachable_commit(mut self, hash: &str) -> Self {
            self.unreachable.push(hash.to_string());
            self
        }
    }

    impl History for MemoryHistory {
        async fn validate(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn commits_since(&self, _since: &SinceExpr, _all_refs: bool) -> anyhow::Result<Vec<Commit>> {
            Ok(self.commits.clone())
        }

        async fn commit(&self, hash: &str) -> anyhow::Result<Commit> {
            if self.unreachable.iter().any(|unreachable| unreachable == hash) {
                anyhow::bail!("git log -1 {hash} timed out after 0s");
            }
            Ok(self
                .commits
                .iter()
                .find(|commit| !hash.is_empty() && commit.id().starts_with(hash))
                .cloned()
                .unwrap_or_else(|| Commit::unresolved(hash)))
        }

        async fn diff(&self, hash: &str, path: &Path) -> anyhow::Result<DiffText> {
            if self.broken.iter().any(|broken| broken == hash) {
                anyhow::bail!("diff backend unavailable for {hash}");
            }
            Ok(self
                .diffs
                .get(&(hash.to_string(), path.to_path_buf()))
                .map(|diff| DiffText::parse_unified(diff))
                .unwrap_or_default())
        }

        async fn file_at(&self, hash: &str, path: &Path) -> anyhow::Result<Option<String>> {
            Ok(self.files.get(&(hash.to_string(), path.to_path_buf())).cloned())
        }
    }
}
