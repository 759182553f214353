// src/validate/record.rs

use crate::exec::invoker::InvocationResult;

/// Text of a run's output record: one block per processed file, in order.
///
/// ```text
/// ==> /abs/res/raw/face.xml (exit 0)
/// <tool output>
/// ```
///
/// A run that processed nothing produces an empty record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRecord {
    text: String,
    entries: usize,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: &InvocationResult) {
        self.text.push_str(&format!(
            "==> {} (exit {})\n",
            result.target.display(),
            result.exit_code
        ));
        self.text.push_str(&result.output);
        if !result.output.is_empty() && !result.output.ends_with('\n') {
            self.text.push('\n');
        }
        self.entries += 1;
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn blocks_are_appended_in_order() {
        let mut record = OutputRecord::new();
        record.push(&InvocationResult {
            target: PathBuf::from("/r/raw/a.xml"),
            exit_code: 0,
            output: "ok".into(),
        });
        record.push(&InvocationResult {
            target: PathBuf::from("/r/raw/b.xml"),
            exit_code: 1,
            output: "line 3: unknown element\n".into(),
        });

        assert_eq!(record.entries(), 2);
        assert_eq!(
            record.as_str(),
            "==> /r/raw/a.xml (exit 0)\nok\n==> /r/raw/b.xml (exit 1)\nline 3: unknown element\n"
        );
    }

    #[test]
    fn empty_record_is_empty_text() {
        assert_eq!(OutputRecord::new().as_str(), "");
    }
}
