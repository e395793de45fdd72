use crate::artifacts::history::commit::{Author, Commit, FileChange};

const RECORD_SEPARATOR: char = '\x1e';
const FIELD_SEPARATOR: char = '\x1f';
const HEADER_FIELDS: usize = 6;

/// Pretty format handed to `git log`/`git show`
///
/// Every record starts with a record separator and every header field ends with a
/// unit separator, so subjects and bodies may contain any printable text.
/// The `--name-status` block follows the last separator.
pub const LOG_PRETTY_FORMAT: &str = "--pretty=format:%x1e%H%x1f%an%x1f%ae%x1f%aI%x1f%s%x1f%b%x1f";

/// Parse the output of `git log --name-status` run with [`LOG_PRETTY_FORMAT`]
///
/// Malformed records are skipped with a warning instead of failing the batch.
pub fn parse_log(output: &str) -> Vec<Commit> {
    output
        .split(RECORD_SEPARATOR)
        .filter(|record| !record.trim().is_empty())
        .filter_map(|record| match parse_record(record) {
            Ok(commit) => Some(commit),
            Err(err) => {
                tracing::warn!("skipping malformed log record: {err:#}");
                None
            }
        })
        .collect()
}

fn parse_record(record: &str) -> anyhow::Result<Commit> {
    let fields = record.splitn(HEADER_FIELDS + 1, FIELD_SEPARATOR).collect::<Vec<_>>();
    if fields.len() < HEADER_FIELDS + 1 {
        anyhow::bail!(
            "expected {} header fields, found {}",
            HEADER_FIELDS,
            fields.len().saturating_sub(1)
        );
    }

    let id = fields[0].trim();
    if id.is_empty() {
        anyhow::bail!("record without commit id");
    }

    let date = chrono::DateTime::parse_from_rfc3339(fields[3].trim())
        .map_err(|err| anyhow::anyhow!("invalid author date '{}': {}", fields[3], err))?;

    let files = fields[HEADER_FIELDS]
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter_map(FileChange::try_parse)
        .collect::<Vec<_>>();

    Ok(Commit::new(
        id.to_string(),
        Author::new(fields[1].to_string(), fields[2].to_string()),
        date,
        fields[4].to_string(),
        fields[5].trim().to_string(),
        files,
    ))
}
