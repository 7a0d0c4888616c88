//! Output file naming

/// Longest stem derived from a project name
pub const MAX_STEM_CHARS: usize = 20;

/// Stem used when the project name yields nothing
pub const DEFAULT_STEM: &str = "Report";

/// File stem derived from a project name.
///
/// Non-alphanumeric ASCII characters become `_`, the result is cut to
/// [`MAX_STEM_CHARS`] characters, and an empty name yields [`DEFAULT_STEM`].
#[must_use = "returns the derived file stem"]
pub fn safe_file_stem(project_name: &str) -> String {
    let stem: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    }
}

/// `<stem>_PPR.<extension>` for a project
#[inline]
#[must_use = "returns the derived file name"]
pub fn report_file_name(project_name: &str, extension: &str) -> String {
    format!("{}_PPR.{extension}", safe_file_stem(project_name))
}
