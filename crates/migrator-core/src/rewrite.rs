//! Text-rewrite collaborator for namespace renames.
//!
//! Rewriting is literal prefix substitution: a `namespace` or `using`
//! keyword followed by whitespace and the old namespace is replaced, and
//! anything after the old namespace (`.Sub`, `;`, ` {`, further identifier
//! characters) is left as it was. Nothing beyond these two constructs is
//! touched.

use regex::Regex;

use crate::error::Result;

/// Rewritten text plus the number of substitutions made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changes: usize,
}

impl Rewrite {
    pub fn is_changed(&self) -> bool {
        self.changes > 0
    }
}

/// Replaces one namespace with another inside a source file's text.
pub trait NamespaceRewriter: Send + Sync {
    fn rewrite(&self, text: &str, old_namespace: &str, new_namespace: &str) -> Result<Rewrite>;
}

/// Regex implementation matching `namespace <old>` and `using <old>` as a
/// prefix, so `Old.Ns` matches `Old.Ns.Sub` and `Old.NsExtra` alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexNamespaceRewriter;

impl NamespaceRewriter for RegexNamespaceRewriter {
    fn rewrite(&self, text: &str, old_namespace: &str, new_namespace: &str) -> Result<Rewrite> {
        let pattern = Regex::new(&format!(
            r"\b(?P<keyword>namespace|using)\s+{}",
            regex::escape(old_namespace)
        ))?;

        let changes = pattern.find_iter(text).count();
        if changes == 0 {
            return Ok(Rewrite {
                text: text.to_string(),
                changes,
            });
        }

        let rewritten = pattern.replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{} {new_namespace}", &caps["keyword"])
        });

        Ok(Rewrite {
            text: rewritten.into_owned(),
            changes,
        })
    }
}
