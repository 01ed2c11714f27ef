//! Destructive command detection
//!
//! [`CommandPolicy`] decides whether a shell command must be confirmed by a
//! human before it runs. It is a heuristic: a list of case-sensitive regular
//! expressions matched against the raw command text. Missing a dangerous
//! command is possible; the list targets common idioms.
//!
//! Extra patterns can be appended from configuration
//! (`[tools] extra_destructive_patterns`).

use regex::Regex;
use thiserror::Error;

/// Built-in patterns: (label, regex)
const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("rooted rm", r"\brm\s+(?:-[A-Za-z-]+\s+)*/"),
    ("dd", r"\bdd\b"),
    ("mkfs", r"\bmkfs\b"),
    ("format", r"(?:^|[;&|])\s*format\b"),
    ("sudo", r"\bsudo\b"),
    ("chmod 777", r"\bchmod\s+(?:-[A-Za-z]+\s+)*777\b"),
    ("shred", r"\bshred\b"),
    ("wipe", r"\bwipe\b"),
    ("kill -9", r"\bkill\s+-(?:9|KILL|SIGKILL)\b"),
    ("pkill", r"\bpkill\b"),
    ("truncate", r"\btruncate\b"),
    ("redirect truncation", r"(?:^|[;|]|&&|&\s)\s*>\s*[^\s>&]"),
];

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid destructive pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
struct DestructivePattern {
    label: String,
    regex: Regex,
}

/// Ordered list of destructive-intent patterns
#[derive(Debug, Clone)]
pub struct CommandPolicy {
    patterns: Vec<DestructivePattern>,
}

impl Default for CommandPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandPolicy {
    /// A policy that never asks for confirmation
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// The built-in pattern list
    pub fn builtin() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .map(|(label, pattern)| DestructivePattern {
                label: label.to_string(),
                regex: Regex::new(pattern).expect("built-in destructive pattern must compile"),
            })
            .collect();
        Self { patterns }
    }

    /// Append a pattern; the label is the pattern text itself
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, PolicyError> {
        let regex = Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.patterns.push(DestructivePattern {
            label: pattern.to_string(),
            regex,
        });
        Ok(self)
    }

    pub fn with_patterns<I, S>(self, patterns: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .try_fold(self, |policy, p| policy.with_pattern(p.as_ref()))
    }

    /// Label of the first pattern matching `command`
    pub fn matched(&self, command: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(command))
            .map(|p| p.label.as_str())
    }

    pub fn requires_acceptance(&self, command: &str) -> bool {
        self.matched(command).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_patterns_compile() {
        assert_eq!(CommandPolicy::builtin().patterns.len(), BUILTIN_PATTERNS.len());
    }

    #[test]
    fn test_destructive_commands_require_acceptance() {
        let policy = CommandPolicy::default();
        let cases = [
            ("rm -rf /", "rooted rm"),
            ("rm /etc/passwd", "rooted rm"),
            ("rm -r -f /var/lib", "rooted rm"),
            ("sudo apt install foo", "sudo"),
            ("dd if=/dev/zero of=/dev/sda", "dd"),
            ("mkfs.ext4 /dev/sdb1", "mkfs"),
            ("format C:", "format"),
            ("chmod 777 script.sh", "chmod 777"),
            ("chmod -R 777 public", "chmod 777"),
            ("shred -u secrets.txt", "shred"),
            ("wipe -rf old", "wipe"),
            ("kill -9 1234", "kill -9"),
            ("kill -KILL 99", "kill -9"),
            ("pkill node", "pkill"),
            ("truncate -s 0 app.log", "truncate"),
            ("> app.log", "redirect truncation"),
            ("cd /tmp && > out.txt", "redirect truncation"),
            ("make; >build.log", "redirect truncation"),
            ("sleep 5 & > pid.txt", "redirect truncation"),
            ("  format D:", "format"),
        ];

        for (command, label) in cases {
            assert_eq!(policy.matched(command), Some(label), "command: {}", command);
            assert!(policy.requires_acceptance(command));
        }
    }

    #[test]
    fn test_benign_commands_pass() {
        let policy = CommandPolicy::default();
        for command in [
            "ls",
            "ls -la /tmp",
            "rm -rf build",
            "rm -rf ./target",
            "git add .",
            "cargo build --release",
            "echo hi > out.txt",
            "cargo fmt",
            "kill 1234",
            "chmod 755 script.sh",
            "git log --format=%H",
            "cargo test &>/dev/null",
            "make 2>&1 | tee build.log",
            ">> notes.txt",
            "cd /tmp && >> out.txt",
        ] {
            assert!(!policy.requires_acceptance(command), "command: {}", command);
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let policy = CommandPolicy::default();
        assert!(!policy.requires_acceptance("SUDO ls"));
        assert!(!policy.requires_acceptance("PKILL node"));
    }

    #[test]
    fn test_extra_patterns() {
        let policy = CommandPolicy::empty()
            .with_patterns(["\\bgit\\s+push\\s+--force\\b"])
            .unwrap();
        assert!(policy.requires_acceptance("git push --force origin main"));
        assert!(!policy.requires_acceptance("sudo ls"));

        let err = CommandPolicy::empty().with_pattern("(unclosed").unwrap_err();
        assert!(err.to_string().starts_with("Invalid destructive pattern '(unclosed'"));
    }
}
